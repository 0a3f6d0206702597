//! Per-town construction settings.
use serde::{Deserialize, Serialize};

use crate::error::TownError;

/// Chance of finding no trouble in a tough town.
pub const TOUGH_NO_TROUBLE_CHANCE: f64 = 0.66;
/// Chance of finding no trouble in a mild town.
pub const MILD_NO_TROUBLE_CHANCE: f64 = 0.33;
/// Chance a crossing item breaks when easy mode is off.
pub const ITEM_BREAK_CHANCE: f64 = 0.5;
/// Chance a dig turns up nothing but dirt.
pub const DIG_DIRT_CHANCE: f64 = 0.5;
pub const BRAWL_STAKE_MAX: i32 = 10;
pub const DIG_GOLD_MAX: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TownConfig {
    /// Probability in `[0, 1]` that the town is rolled as tough.
    #[serde(default = "TownConfig::default_toughness")]
    pub toughness: f64,
    /// Crossing items never break when set.
    #[serde(default)]
    pub easy_mode: bool,
}

impl TownConfig {
    const fn default_toughness() -> f64 {
        0.5
    }

    #[must_use]
    pub const fn new(toughness: f64, easy_mode: bool) -> Self {
        Self {
            toughness,
            easy_mode,
        }
    }

    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::ConfigParse`] for malformed JSON and
    /// [`TownError::InvalidToughness`] when the toughness is out of range.
    pub fn from_json(raw: &str) -> Result<Self, TownError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`TownError::InvalidToughness`] when toughness is non-finite or outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), TownError> {
        if self.toughness.is_finite() && (0.0..=1.0).contains(&self.toughness) {
            Ok(())
        } else {
            Err(TownError::InvalidToughness {
                value: self.toughness,
            })
        }
    }
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            toughness: Self::default_toughness(),
            easy_mode: false,
        }
    }
}
