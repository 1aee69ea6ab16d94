//! Renderer settings, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change:
//!
//! ```toml
//! width = 320
//! height = 240
//! light = [0.0, 10.0, 10.0]
//! dispatch = "sequential"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::colors;
use crate::engine::Dispatch;
use crate::light::PointLight;
use crate::math::vec3::Vec3;
use crate::projection::{Projection, DEFAULT_FOV, DEFAULT_Z_FAR, DEFAULT_Z_NEAR};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("frame buffer size must be non-zero, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },

    #[error("invalid depth range: near {near}, far {far}")]
    DepthRange { near: f32, far: f32 },

    #[error("field of view must be in (0, pi), got {0}")]
    FieldOfView(f32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// World-space position of the point light.
    pub light: [f32; 3],
    /// RGBA the frame is cleared to.
    pub clear_color: [u8; 4],
    pub dispatch: Dispatch,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: DEFAULT_FOV,
            z_near: DEFAULT_Z_NEAR,
            z_far: DEFAULT_Z_FAR,
            light: [0.0, 10.0, 10.0],
            clear_color: [0, 0, 0, 255],
            dispatch: Dispatch::default(),
        }
    }
}

impl RenderConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.z_near > 0.0 && self.z_far > self.z_near) {
            return Err(ConfigError::DepthRange {
                near: self.z_near,
                far: self.z_far,
            });
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        Ok(())
    }

    pub fn light(&self) -> PointLight {
        PointLight::new(Vec3::from(self.light))
    }

    pub fn projection(&self) -> Projection {
        Projection::new(
            self.fov,
            self.width as f32 / self.height as f32,
            self.z_near,
            self.z_far,
        )
    }

    /// The clear color packed as ARGB.
    pub fn clear_color(&self) -> u32 {
        let [r, g, b, a] = self.clear_color;
        colors::pack_rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_document_is_the_default() {
        let config = RenderConfig::from_toml_str("").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.clear_color(), colors::BLACK);
        assert_eq!(config.light().position, Vec3::new(0.0, 10.0, 10.0));
    }

    #[test]
    fn partial_document_overrides_given_keys() {
        let config = RenderConfig::from_toml_str(
            r#"
            width = 64
            height = 32
            light = [1.0, 2.0, 3.0]
            clear_color = [10, 20, 30, 255]
            dispatch = "sequential"
            "#,
        )
        .unwrap();
        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.dispatch, Dispatch::Sequential);
        assert_eq!(config.clear_color(), colors::pack_rgba(10, 20, 30, 255));
        assert_relative_eq!(config.projection().aspect_ratio(), 2.0);
        assert_relative_eq!(config.fov, DEFAULT_FOV);
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let err = RenderConfig::from_toml_str("width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyViewport { width: 0, .. }));
    }

    #[test]
    fn inverted_depth_range_is_rejected() {
        let err = RenderConfig::from_toml_str("z_near = 2.0\nz_far = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::DepthRange { .. }));
        let err = RenderConfig::from_toml_str("z_near = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::DepthRange { .. }));
    }

    #[test]
    fn bad_field_of_view_is_rejected() {
        let err = RenderConfig::from_toml_str("fov = 3.5").unwrap_err();
        assert!(matches!(err, ConfigError::FieldOfView(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = RenderConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RenderConfig::from_file("does/not/exist.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, PathBuf::from("does/not/exist.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
