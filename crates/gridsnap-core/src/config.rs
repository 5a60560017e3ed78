//! Grid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid grid config: {0}")]
    Invalid(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Shape of the layout grid.
///
/// Column width is not stored: it is derived from the container width on
/// every geometry call, since the container is resized independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Number of columns (at least 1).
    pub columns: u32,
    /// Horizontal gap between columns, in pixels.
    pub column_gap: f64,
    /// Vertical gap between rows, in pixels.
    pub row_gap: f64,
    /// Height of a single cell, in pixels.
    pub cell_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            column_gap: 8.0,
            row_gap: 8.0,
            cell_height: 100.0,
        }
    }
}

impl GridConfig {
    /// Create a validated config.
    pub fn new(columns: u32, column_gap: f64, row_gap: f64, cell_height: f64) -> ConfigResult<Self> {
        let config = Self {
            columns,
            column_gap,
            row_gap,
            cell_height,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the config's numeric constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.columns == 0 {
            return Err(ConfigError::Invalid("columns must be at least 1".to_string()));
        }
        if !self.column_gap.is_finite() || self.column_gap < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "columnGap must be a non-negative number, got {}",
                self.column_gap
            )));
        }
        if !self.row_gap.is_finite() || self.row_gap < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "rowGap must be a non-negative number, got {}",
                self.row_gap
            )));
        }
        if !self.cell_height.is_finite() || self.cell_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cellHeight must be positive, got {}",
                self.cell_height
            )));
        }
        Ok(())
    }

    /// Total width taken by the gaps between columns.
    pub fn total_column_gaps(&self) -> f64 {
        self.column_gap * f64::from(self.columns.saturating_sub(1))
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded grid config from {}", path.display());
        Ok(config)
    }

    /// Write the config to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}
