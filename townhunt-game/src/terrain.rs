//! Terrain surrounding a town and the item needed to cross it.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TownError;
use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Mountains,
    Ocean,
    Plains,
    Desert,
    Jungle,
    Marsh,
}

impl TerrainKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mountains => "Mountains",
            Self::Ocean => "Ocean",
            Self::Plains => "Plains",
            Self::Desert => "Desert",
            Self::Jungle => "Jungle",
            Self::Marsh => "Marsh",
        }
    }

    /// The single item that lets a hunter cross this terrain.
    #[must_use]
    pub const fn needed_item(self) -> Item {
        match self {
            Self::Mountains => Item::Rope,
            Self::Ocean => Item::Boat,
            Self::Plains => Item::Horse,
            Self::Desert => Item::Water,
            Self::Jungle => Item::Machete,
            Self::Marsh => Item::Boots,
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainKind {
    type Err = TownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TERRAIN_TABLE
            .iter()
            .map(|terrain| terrain.kind)
            .find(|kind| kind.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| TownError::UnknownTerrain {
                input: needle.to_string(),
            })
    }
}

/// A terrain and its crossing item. Serialized as the bare kind, so the
/// item always comes from [`TerrainKind::needed_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TerrainKind", into = "TerrainKind")]
pub struct Terrain {
    kind: TerrainKind,
}

/// Every terrain a town can be surrounded by, in draw order.
pub const TERRAIN_TABLE: [Terrain; 6] = [
    Terrain::of(TerrainKind::Mountains),
    Terrain::of(TerrainKind::Ocean),
    Terrain::of(TerrainKind::Plains),
    Terrain::of(TerrainKind::Desert),
    Terrain::of(TerrainKind::Jungle),
    Terrain::of(TerrainKind::Marsh),
];

impl Terrain {
    #[must_use]
    pub const fn of(kind: TerrainKind) -> Self {
        Self { kind }
    }

    /// Draw one terrain uniformly from [`TERRAIN_TABLE`].
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        TERRAIN_TABLE[rng.gen_range(0..TERRAIN_TABLE.len())]
    }

    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub const fn needed_item(&self) -> Item {
        self.kind.needed_item()
    }
}

impl From<TerrainKind> for Terrain {
    fn from(kind: TerrainKind) -> Self {
        Self::of(kind)
    }
}

impl From<Terrain> for TerrainKind {
    fn from(terrain: Terrain) -> Self {
        terrain.kind
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
