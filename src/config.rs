//! Options exposed by the demo control panel.

use crate::ik::constraint::MAX_BALL_ANGLE;
use crate::ik::{ConstraintConfig, ConstraintKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color '{value}', expected #rrggbb")]
    InvalidColor { value: String },

    #[error("constraint angle {angle} is outside [0, 360]")]
    AngleOutOfRange { angle: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemoConfig {
    pub show_axes: bool,
    pub show_bones: bool,
    pub wireframe: bool,
    pub color: String,
    pub constraint_type: ConstraintKind,
    pub constraint_angle: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            show_axes: true,
            show_bones: true,
            wireframe: true,
            color: "#ff0077".to_string(),
            constraint_type: ConstraintKind::Ball,
            constraint_angle: MAX_BALL_ANGLE,
        }
    }
}

impl DemoConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_BALL_ANGLE).contains(&self.constraint_angle) {
            return Err(ConfigError::AngleOutOfRange {
                angle: self.constraint_angle,
            });
        }
        parse_hex_color(&self.color)?;
        Ok(())
    }

    pub fn constraint(&self) -> ConstraintConfig {
        ConstraintConfig {
            kind: self.constraint_type,
            angle: self.constraint_angle,
        }
    }

    pub fn helper(&self) -> Result<HelperSettings, ConfigError> {
        Ok(HelperSettings {
            show_axes: self.show_axes,
            show_bones: self.show_bones,
            wireframe: self.wireframe,
            color: parse_hex_color(&self.color)?,
        })
    }
}

/// What the bone visualizer draws; scenes refresh it on every config change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelperSettings {
    pub show_axes: bool,
    pub show_bones: bool,
    pub wireframe: bool,
    pub color: [f32; 4],
}

impl Default for HelperSettings {
    fn default() -> Self {
        Self {
            show_axes: true,
            show_bones: true,
            wireframe: true,
            color: [1.0, 0.0, 119.0 / 255.0, 1.0],
        }
    }
}

pub fn parse_hex_color(value: &str) -> Result<[f32; 4], ConfigError> {
    let invalid = || ConfigError::InvalidColor {
        value: value.to_string(),
    };

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|_| invalid())
    };
    Ok([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_panel() {
        let config = DemoConfig::default();
        assert_eq!(config.constraint_type, ConstraintKind::Ball);
        assert_eq!(config.constraint_angle, 360.0);
        assert_eq!(config.helper().unwrap(), HelperSettings::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            DemoConfig::from_json_str(r#"{ "constraintType": "none", "showAxes": false }"#).unwrap();

        assert_eq!(config.constraint_type, ConstraintKind::None);
        assert!(!config.show_axes);
        assert!(config.show_bones);
        assert_eq!(config.color, "#ff0077");
        assert_eq!(config.constraint().angle, 360.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            DemoConfig::from_json_str(r#"{ "constraintAngle": 400 }"#),
            Err(ConfigError::AngleOutOfRange { .. })
        ));
        assert!(matches!(
            DemoConfig::from_json_str(r##"{ "color": "#12345" }"##),
            Err(ConfigError::InvalidColor { .. })
        ));
        assert!(matches!(
            DemoConfig::from_json_str(r#"{ "constraintType": "hinge" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#ffffff").unwrap(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color("#000000").unwrap(), [0.0, 0.0, 0.0, 1.0]);
        assert!(parse_hex_color("ffffff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }
}
