//! Townhunt Game Engine
//!
//! Platform-agnostic rules for a single town visit in the Treasure Hunter
//! text adventure: crossing the surrounding terrain, shopping, brawling,
//! searching for treasure and digging for gold. Every random decision draws
//! from a caller-supplied RNG so runs are reproducible from a seed.

pub mod config;
pub mod error;
pub mod hunter;
pub mod item;
pub mod outcome;
pub mod rng;
pub mod shop;
pub mod terrain;
pub mod town;
pub mod treasure;

// Re-export commonly used types
pub use config::TownConfig;
pub use error::TownError;
pub use hunter::{Adventurer, Hunter};
pub use item::Item;
pub use outcome::{Claim, DigOutcome, LeaveOutcome, Progress, TreasureOutcome, TroubleOutcome};
pub use rng::{CountingRng, TownRng};
pub use shop::{Shop, ShopChoice};
pub use terrain::{TERRAIN_TABLE, Terrain, TerrainKind};
pub use town::{Town, TownLayout};
pub use treasure::{TREASURE_SLOTS, Treasure};
