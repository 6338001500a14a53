//! Generation parameters

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest allowed height or width
pub const MIN_DIMENSION: usize = 10;
/// Largest allowed height or width
pub const MAX_DIMENSION: usize = 100;
/// Lowest allowed empty-cell tolerance, percent of all cells
pub const MIN_EMPTY_PERCENT: u8 = 25;
/// Highest allowed empty-cell tolerance, percent of all cells
pub const MAX_EMPTY_PERCENT: u8 = 75;
/// Default tolerance: a quarter of the grid may stay clear
pub const DEFAULT_EMPTY_PERCENT: u8 = 25;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("height {0} is outside {min}..={max}", min = MIN_DIMENSION, max = MAX_DIMENSION)]
    Height(usize),

    #[error("width {0} is outside {min}..={max}", min = MIN_DIMENSION, max = MAX_DIMENSION)]
    Width(usize),

    #[error(
        "empty-room tolerance {0}% is outside {min}..={max}",
        min = MIN_EMPTY_PERCENT,
        max = MAX_EMPTY_PERCENT
    )]
    EmptyPercent(u8),

    #[error("attempt cap must be at least 1")]
    ZeroAttempts,
}

/// Dungeon size and acceptance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of rows
    pub height: usize,
    /// Number of columns
    pub width: usize,
    /// Largest share of cells, in percent, that may stay empty
    pub empty_percent: u8,
    /// Give up after this many attempts (only honored by `try_generate`)
    pub max_attempts: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            height: MIN_DIMENSION,
            width: MIN_DIMENSION,
            empty_percent: DEFAULT_EMPTY_PERCENT,
            max_attempts: None,
        }
    }
}

impl GenerationConfig {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            ..Self::default()
        }
    }

    pub fn with_empty_percent(mut self, percent: u8) -> Self {
        self.empty_percent = percent;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(MIN_EMPTY_PERCENT..=MAX_EMPTY_PERCENT).contains(&self.empty_percent) {
            return Err(ConfigError::EmptyPercent(self.empty_percent));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    pub fn total_cells(&self) -> usize {
        self.height * self.width
    }

    /// Most `Empty` cells an accepted layout may keep
    pub fn max_empty_cells(&self) -> usize {
        self.total_cells() * self.empty_percent as usize / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quarter_rule() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_empty_cells(), 25);

        for (h, w) in [(10, 10), (13, 17), (100, 99), (11, 10)] {
            let config = GenerationConfig::new(h, w);
            assert_eq!(config.max_empty_cells(), h * w / 4);
        }
    }

    #[test]
    fn test_percent_rounds_down() {
        let config = GenerationConfig::new(11, 13).with_empty_percent(33);
        assert_eq!(config.max_empty_cells(), 143 * 33 / 100);
        assert_eq!(config.max_empty_cells(), 47);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert_eq!(
            GenerationConfig::new(9, 10).validate(),
            Err(ConfigError::Height(9))
        );
        assert_eq!(
            GenerationConfig::new(10, 101).validate(),
            Err(ConfigError::Width(101))
        );
        assert_eq!(
            GenerationConfig::new(10, 10).with_empty_percent(80).validate(),
            Err(ConfigError::EmptyPercent(80))
        );
        assert_eq!(
            GenerationConfig::new(10, 10).with_max_attempts(0).validate(),
            Err(ConfigError::ZeroAttempts)
        );
        assert!(GenerationConfig::new(100, 100).with_empty_percent(75).validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"height": 20}"#).unwrap();
        assert_eq!(config.height, 20);
        assert_eq!(config.width, MIN_DIMENSION);
        assert_eq!(config.empty_percent, DEFAULT_EMPTY_PERCENT);
        assert_eq!(config.max_attempts, None);
    }
}
