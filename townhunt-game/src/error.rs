//! Error taxonomy for town construction and actions.
use thiserror::Error;

/// Errors raised when a town is misconfigured or an action's precondition fails.
///
/// Expected negative outcomes (blocked crossings, missing shovel, repeated
/// searches) are reported through the action outcome enums instead.
#[derive(Debug, Error, PartialEq)]
pub enum TownError {
    #[error("no hunter is present in town (attempted to {action})")]
    NoHunter { action: &'static str },
    #[error("toughness must be a probability between 0.00 and 1.00 (got {value:.2})")]
    InvalidToughness { value: f64 },
    #[error("unknown shop choice {input:?}; expected buy or sell")]
    UnknownShopChoice { input: String },
    #[error("unknown item {input:?}")]
    UnknownItem { input: String },
    #[error("unknown terrain {input:?}")]
    UnknownTerrain { input: String },
    #[error("invalid town config: {0}")]
    ConfigParse(String),
}

impl From<serde_json::Error> for TownError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
