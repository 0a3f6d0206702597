//! Treasure hidden in each town.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct treasures a hunter must collect to win.
pub const TREASURE_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Treasure {
    Crown,
    Trophy,
    Gem,
    /// Worthless find; never enters a collection.
    Dust,
}

impl Treasure {
    pub const ALL: [Self; 4] = [Self::Crown, Self::Trophy, Self::Gem, Self::Dust];

    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    #[must_use]
    pub const fn is_dust(self) -> bool {
        matches!(self, Self::Dust)
    }

    /// Narrative phrase used when the treasure is revealed.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Crown => "a crown",
            Self::Trophy => "a trophy",
            Self::Gem => "a gem",
            Self::Dust => "dust",
        }
    }
}

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
