//! Composition parameters.
//!
//! Defaults reproduce the 128x128 overworld; a JSON file can override any
//! subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, ExportError};
use crate::painter::MAX_RADIUS;

/// Largest map side whose coordinates still fit the runtime's `uint8_t`.
pub const MAX_DIMENSION: usize = 256;

/// Scattered forest patches drawn after all regions are painted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationParams {
    /// Number of draws (each may or may not produce a patch)
    pub attempts: u32,
    /// Inclusive lower bound of the square draw box, both axes
    pub min: i32,
    /// Inclusive upper bound of the square draw box, both axes
    pub max: i32,
    pub min_radius: i32,
    pub max_radius: i32,
}

impl Default for DecorationParams {
    fn default() -> Self {
        Self {
            attempts: 20,
            min: 20,
            max: 110,
            min_radius: 3,
            max_radius: 6,
        }
    }
}

impl DecorationParams {
    pub fn validate(&self) -> Result<(), ComposeError> {
        if self.min > self.max {
            return Err(ComposeError::InvalidDecoration(format!(
                "draw box min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.min_radius < 0 || self.min_radius > self.max_radius {
            return Err(ComposeError::InvalidDecoration(format!(
                "radius range {}..={} is empty or negative",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_radius > MAX_RADIUS {
            return Err(ComposeError::InvalidDecoration(format!(
                "max radius {} exceeds {}",
                self.max_radius, MAX_RADIUS
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for one composition run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub width: usize,
    pub height: usize,
    /// Decoration seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// `None` skips the decoration pass entirely
    pub decoration: Option<DecorationParams>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            seed: None,
            decoration: Some(DecorationParams::default()),
        }
    }
}

impl ComposerConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn without_decoration(mut self) -> Self {
        self.decoration = None;
        self
    }

    /// Reject dimensions and parameters before any grid is allocated.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let fits = |d: usize| (2..=MAX_DIMENSION).contains(&d);
        if !fits(self.width) || !fits(self.height) {
            return Err(ComposeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if let Some(decoration) = &self.decoration {
            decoration.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ComposerConfig::default();
        assert_eq!((config.width, config.height), (128, 128));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimensions_must_fit_eight_bits() {
        let config = ComposerConfig { width: 257, ..Default::default() };
        assert!(matches!(config.validate(), Err(ComposeError::InvalidDimensions { width: 257, .. })));

        let config = ComposerConfig { height: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = ComposerConfig { width: 256, height: 256, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_decoration_ranges_checked() {
        let bad_box = DecorationParams { min: 50, max: 10, ..Default::default() };
        assert!(bad_box.validate().is_err());

        let bad_radius = DecorationParams { min_radius: 5, max_radius: 2, ..Default::default() };
        assert!(bad_radius.validate().is_err());

        let config = ComposerConfig { decoration: Some(bad_radius), ..Default::default() };
        assert!(matches!(config.validate(), Err(ComposeError::InvalidDecoration(_))));
    }

    #[test]
    fn test_oversized_decoration_radius_rejected() {
        let config: ComposerConfig =
            serde_json::from_str(r#"{"decoration": {"max_radius": 1500000000}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidDecoration(ref msg) if msg.contains("1500000000")));

        let at_limit = DecorationParams { max_radius: MAX_RADIUS, ..Default::default() };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ComposerConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.width, 128);
        assert_eq!(config.decoration, Some(DecorationParams::default()));

        let config: ComposerConfig =
            serde_json::from_str(r#"{ "decoration": { "attempts": 5 } }"#).unwrap();
        let decoration = config.decoration.unwrap();
        assert_eq!(decoration.attempts, 5);
        assert_eq!(decoration.max_radius, 6);

        let config: ComposerConfig = serde_json::from_str(r#"{ "decoration": null }"#).unwrap();
        assert!(config.decoration.is_none());
    }
}
