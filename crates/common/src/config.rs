use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Projection and framing parameters for the follow camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Rest position the cursor offset is added to.
    pub base_position: Vec3,
    /// Point the camera keeps in view.
    pub look_at: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            base_position: Vec3::new(0.0, 0.0, 6.0),
            look_at: Vec3::ZERO,
        }
    }
}

/// Tunable scene parameters.
///
/// `damping` and `phase_divisor_ms` have no derivation behind them; the
/// defaults reproduce the reference look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fraction of the remaining distance the camera covers each frame.
    pub damping: f32,
    /// Elapsed milliseconds per unit of animation phase.
    pub phase_divisor_ms: f64,
    /// Upper bound on the device pixel ratio used for render buffers.
    pub max_pixel_ratio: f32,
    /// Seconds before the one-shot diagnostic prompt fires in normal mode.
    pub prompt_delay_secs: u64,
    /// World units the camera drifts per unit of normalized cursor.
    pub follow_extent: f32,
    pub camera: CameraConfig,
    pub particle_count: u32,
    pub bubble_count: u32,
    /// Seed for particle and bubble placement.
    pub seed: u64,
    /// Directory holding `particles.png` and `bubbles.png`.
    pub asset_dir: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            damping: 0.5,
            phase_divisor_ms: 1500.0,
            max_pixel_ratio: 2.0,
            prompt_delay_secs: 20,
            follow_extent: 1.0,
            camera: CameraConfig::default(),
            particle_count: 600,
            bubble_count: 80,
            seed: 7,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl SceneConfig {
    /// Load a YAML config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&data)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded scene config");
        Ok(config)
    }

    /// Load from `path` if given, else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "damping",
                reason: "must be in (0, 1]",
            });
        }
        if !(self.phase_divisor_ms > 0.0 && self.phase_divisor_ms.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "phase_divisor_ms",
                reason: "must be positive",
            });
        }
        if !(self.max_pixel_ratio > 0.0 && self.max_pixel_ratio.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_pixel_ratio",
                reason: "must be positive",
            });
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid {
                field: "camera",
                reason: "requires 0 < near < far",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.damping, 0.5);
        assert_eq!(config.phase_divisor_ms, 1500.0);
        assert_eq!(config.max_pixel_ratio, 2.0);
        assert_eq!(config.prompt_delay_secs, 20);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "damping: 0.25\nparticle_count: 10").unwrap();

        let config = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(config.damping, 0.25);
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.phase_divisor_ms, 1500.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn rejects_out_of_range_damping() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "damping: 1.5").unwrap();

        let err = SceneConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "damping", .. }));
    }

    #[test]
    fn rejects_zero_phase_divisor() {
        let config = SceneConfig {
            phase_divisor_ms: 0.0,
            ..SceneConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_preserves_config() {
        let config = SceneConfig {
            seed: 99,
            ..SceneConfig::default()
        };
        let text = config.to_yaml().unwrap();
        let back: SceneConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_or_default_without_path() {
        let config = SceneConfig::load_or_default(None).unwrap();
        assert_eq!(config, SceneConfig::default());
    }
}
