//! Evaluation and rendering configuration.
//!
//! Settings are stored in TOML; every field has a default so a partial file
//! (or no file at all) is valid.

use crate::error::{LayoutEvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum IoU for a detection to count as a true positive.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Default outline width, in pixels, for rendered boxes.
pub const DEFAULT_LINE_WIDTH: u32 = 2;

/// Default number of decimal places in evaluation reports.
pub const DEFAULT_REPORT_DECIMALS: u32 = 3;

/// Evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Minimum IoU (inclusive) for a match
    pub iou_threshold: f64,
    /// Box outline width in pixels
    pub line_width: u32,
    /// Decimal places for ratios in the evaluation report
    pub report_decimals: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            line_width: DEFAULT_LINE_WIDTH,
            report_decimals: DEFAULT_REPORT_DECIMALS,
        }
    }
}

impl EvalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: EvalConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check every field is within its allowed range.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)?;

        if self.line_width == 0 {
            return Err(LayoutEvalError::InvalidConfig(
                "line_width must be at least 1".to_string(),
            ));
        }

        if self.report_decimals > 10 {
            return Err(LayoutEvalError::InvalidConfig(format!(
                "report_decimals must be at most 10, got {}",
                self.report_decimals
            )));
        }

        Ok(())
    }
}

/// Validate that an IoU threshold is in the range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LayoutEvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.line_width, 2);
        assert_eq!(config.report_decimals, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = EvalConfig::from_toml_str("iou_threshold = 0.75").unwrap();
        assert_eq!(config.iou_threshold, 0.75);
        assert_eq!(config.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EvalConfig::from_toml_str("iou_threshold = 1.5"),
            Err(LayoutEvalError::InvalidThreshold(_))
        ));
        assert!(matches!(
            EvalConfig::from_toml_str("line_width = 0"),
            Err(LayoutEvalError::InvalidConfig(_))
        ));
        assert!(matches!(
            EvalConfig::from_toml_str("iou_threshold = \"high\""),
            Err(LayoutEvalError::TomlError(_))
        ));
    }

    #[test]
    fn test_validate_threshold_nan() {
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "line_width = 4\nreport_decimals = 2").unwrap();

        let config = EvalConfig::load(file.path()).unwrap();
        assert_eq!(config.line_width, 4);
        assert_eq!(config.report_decimals, 2);
        assert_eq!(config.iou_threshold, DEFAULT_IOU_THRESHOLD);
    }
}
