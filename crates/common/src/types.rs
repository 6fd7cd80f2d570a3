use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix for upload into a shader uniform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// How the session runs. Resolved once at startup.
///
/// `Diagnostic` wires in the live parameter panel and the frame-timing
/// overlay. Nothing else in the scene branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Normal,
    Diagnostic,
}

/// Environment variable consulted when the CLI flag is absent.
pub const MODE_ENV: &str = "JELLYSCAPE_MODE";

impl RunMode {
    pub fn is_diagnostic(self) -> bool {
        self == RunMode::Diagnostic
    }

    /// Startup resolution: the `--diagnostic` flag wins, otherwise the value
    /// of [`MODE_ENV`]. Unparseable values fall back to `Normal`.
    pub fn resolve(diagnostic_flag: bool, env_value: Option<&str>) -> RunMode {
        if diagnostic_flag {
            return RunMode::Diagnostic;
        }
        match env_value.map(str::parse::<RunMode>) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                tracing::warn!("{MODE_ENV}: {e}, using normal mode");
                RunMode::Normal
            }
            None => RunMode::Normal,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Normal => f.write_str("normal"),
            RunMode::Diagnostic => f.write_str("diagnostic"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "" => Ok(RunMode::Normal),
            "diagnostic" | "debug" => Ok(RunMode::Diagnostic),
            other => Err(format!("unknown run mode `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_translates() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn run_mode_parses_debug_alias() {
        assert_eq!("debug".parse::<RunMode>(), Ok(RunMode::Diagnostic));
        assert_eq!("Diagnostic".parse::<RunMode>(), Ok(RunMode::Diagnostic));
        assert_eq!("normal".parse::<RunMode>(), Ok(RunMode::Normal));
        assert!("fast".parse::<RunMode>().is_err());
    }

    #[test]
    fn run_mode_resolution_prefers_flag() {
        assert_eq!(RunMode::resolve(true, Some("normal")), RunMode::Diagnostic);
        assert_eq!(RunMode::resolve(false, Some("diagnostic")), RunMode::Diagnostic);
        assert_eq!(RunMode::resolve(false, Some("bogus")), RunMode::Normal);
        assert_eq!(RunMode::resolve(false, None), RunMode::Normal);
    }

    #[test]
    fn run_mode_defaults_to_normal() {
        assert_eq!(RunMode::default(), RunMode::Normal);
        assert!(!RunMode::Normal.is_diagnostic());
        assert_eq!(RunMode::Diagnostic.to_string(), "diagnostic");
    }
}
