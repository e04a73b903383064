//! Optional TOML configuration file.
//!
//! ```toml
//! [calibration]
//! current_offset = 26.722
//! current_scale = 0.9904
//! voltage_offset = 6.787
//! voltage_scale = 1.236
//! ```
//!
//! Missing keys keep the reference device coefficients.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{PowermeterError, Result};
use super::types::CalibrationConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowermeterConfig {
    pub calibration: CalibrationConfig,
}

impl PowermeterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.calibration;
        let coefficients = [
            ("current_offset", c.current_offset),
            ("current_scale", c.current_scale),
            ("voltage_offset", c.voltage_offset),
            ("voltage_scale", c.voltage_scale),
        ];

        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(PowermeterError::Config(format!(
                    "calibration.{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
