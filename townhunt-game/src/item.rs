//! Kit items a hunter can carry.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TownError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Water,
    Rope,
    Machete,
    Horse,
    Boat,
    Boots,
    Shovel,
    Sword,
}

impl Item {
    pub const ALL: [Self; 8] = [
        Self::Water,
        Self::Rope,
        Self::Machete,
        Self::Horse,
        Self::Boat,
        Self::Boots,
        Self::Shovel,
        Self::Sword,
    ];

    /// Stable lowercase key used in kits and config files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Rope => "rope",
            Self::Machete => "machete",
            Self::Horse => "horse",
            Self::Boat => "boat",
            Self::Boots => "boots",
            Self::Shovel => "shovel",
            Self::Sword => "sword",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Rope => "Rope",
            Self::Machete => "Machete",
            Self::Horse => "Horse",
            Self::Boat => "Boat",
            Self::Boots => "Boots",
            Self::Shovel => "Shovel",
            Self::Sword => "Sword",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Item {
    type Err = TownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|item| item.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| TownError::UnknownItem {
                input: needle.to_string(),
            })
    }
}
