//! Typed results of town actions.
use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::terrain::TerrainKind;
use crate::treasure::Treasure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// The hunter lacks the item the terrain demands.
    Blocked { needed: Item },
    Crossed {
        item: Item,
        terrain: TerrainKind,
        item_broke: bool,
    },
}

impl LeaveOutcome {
    #[must_use]
    pub const fn left_town(&self) -> bool {
        matches!(self, Self::Crossed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroubleOutcome {
    Quiet,
    Brawl { armed: bool, won: bool, stake: i32 },
}

impl TroubleOutcome {
    /// Signed gold change applied to the hunter.
    #[must_use]
    pub const fn gold_delta(&self) -> i32 {
        match *self {
            Self::Quiet => 0,
            Self::Brawl { won: true, stake, .. } => stake,
            Self::Brawl {
                won: false, stake, ..
            } => -stake,
        }
    }
}

/// Whether the game carries on after an action or the hunter has won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Continue,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Claim {
    /// Dust; nothing to keep.
    Worthless,
    Added,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasureOutcome {
    AlreadySearched,
    Revealed {
        treasure: Treasure,
        claim: Claim,
        progress: Progress,
    },
}

impl TreasureOutcome {
    #[must_use]
    pub const fn is_victory(&self) -> bool {
        matches!(
            self,
            Self::Revealed {
                progress: Progress::Victory,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigOutcome {
    AlreadyDug,
    NoShovel,
    Dirt,
    Gold(i32),
}
