//! Packed ARGB8888 colors.
//!
//! Every color in the pipeline is a `u32` laid out as `0xAARRGGBB`. Written
//! little-endian, that is B, G, R, A in memory, the byte order the back buffer
//! is handed to the presentation layer in.

pub const WHITE: u32 = 0xFFFFFFFF;
pub const BLACK: u32 = 0xFF000000;
pub const BACKGROUND: u32 = 0xFF1E1E1E;

#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits a packed color into `[r, g, b, a]`.
#[inline]
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Scales the RGB channels by `intensity` (clamped to [0, 1]); alpha is kept.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let i = intensity.clamp(0.0, 1.0);
    let [r, g, b, a] = unpack_rgba(color);
    let scale = |c: u8| (c as f32 * i) as u8;
    pack_rgba(scale(r), scale(g), scale(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_agree() {
        let c = pack_rgba(10, 20, 30, 40);
        assert_eq!(c, 0x280A141E);
        assert_eq!(unpack_rgba(c), [10, 20, 30, 40]);
        assert_eq!(alpha(c), 40);
    }

    #[test]
    fn little_endian_bytes_are_bgra() {
        assert_eq!(pack_rgba(1, 2, 3, 4).to_le_bytes(), [3, 2, 1, 4]);
    }

    #[test]
    fn modulate_keeps_alpha() {
        let c = modulate(pack_rgba(200, 100, 50, 128), 0.5);
        assert_eq!(unpack_rgba(c), [100, 50, 25, 128]);
    }

    #[test]
    fn modulate_clamps_intensity() {
        assert_eq!(modulate(WHITE, 2.0), WHITE);
        assert_eq!(modulate(WHITE, -1.0), BLACK);
    }
}
