// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{MriError, MriResult};

/// Protocol-level thresholds, all in SI units.
/// Missing JSON fields fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// b-values below this are unweighted [s/m^2] (default: 25e6)
    #[serde(default = "default_unweighted_threshold")]
    pub unweighted_threshold: f64,
    /// Scanner gradient amplitude used when only b-values are known [T/m] (default: 0.04)
    #[serde(default = "default_max_gradient")]
    pub max_gradient: f64,
    /// Gradient directions shorter than this are unweighted (default: 0.99)
    #[serde(default = "default_gradient_norm_limit")]
    pub gradient_norm_limit: f64,
}

fn default_unweighted_threshold() -> f64 {
    25e6
}
fn default_max_gradient() -> f64 {
    0.04
}
fn default_gradient_norm_limit() -> f64 {
    0.99
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            unweighted_threshold: default_unweighted_threshold(),
            max_gradient: default_max_gradient(),
            gradient_norm_limit: default_gradient_norm_limit(),
        }
    }
}

impl ProtocolConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> MriResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string and validate.
    pub fn from_json(contents: &str) -> MriResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MriResult<()> {
        let fields = [
            ("unweighted_threshold", self.unweighted_threshold),
            ("max_gradient", self.max_gradient),
            ("gradient_norm_limit", self.gradient_norm_limit),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                log::warn!("rejecting protocol config: {name} = {value}");
                return Err(MriError::ConfigError(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_values() {
        let cfg = ProtocolConfig::default();
        assert_eq!(cfg.unweighted_threshold, 25e6);
        assert_eq!(cfg.max_gradient, 0.04);
        assert_eq!(cfg.gradient_norm_limit, 0.99);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let cfg = ProtocolConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ProtocolConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let cfg = ProtocolConfig::from_json(r#"{"max_gradient": 0.08}"#).unwrap();
        assert!((cfg.max_gradient - 0.08).abs() < 1e-15);
        assert_eq!(cfg.unweighted_threshold, 25e6);
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = ProtocolConfig::from_json(r#"{"unweighted_threshold": 0.0}"#).unwrap_err();
        assert!(matches!(err, MriError::ConfigError(_)), "{err}");

        let cfg = ProtocolConfig {
            max_gradient: f64::NAN,
            ..ProtocolConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = ProtocolConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MriError::Json(_)), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("no_such_config.json");
        let err = ProtocolConfig::from_file(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, MriError::Io(_)), "{err}");
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("mri_types_protocol_config_test.json");
        let cfg = ProtocolConfig {
            unweighted_threshold: 50e6,
            max_gradient: 0.3,
            gradient_norm_limit: 0.5,
        };
        std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();
        let loaded = ProtocolConfig::from_file(&path.to_string_lossy()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, cfg);
    }
}
