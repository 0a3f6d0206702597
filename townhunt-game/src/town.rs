//! A single town visit: arrival, leaving, shopping, brawling, treasure and digging.
use colored::Colorize;
use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{
    BRAWL_STAKE_MAX, DIG_DIRT_CHANCE, DIG_GOLD_MAX, ITEM_BREAK_CHANCE, MILD_NO_TROUBLE_CHANCE,
    TOUGH_NO_TROUBLE_CHANCE, TownConfig,
};
use crate::error::TownError;
use crate::hunter::Hunter;
use crate::item::Item;
use crate::outcome::{Claim, DigOutcome, LeaveOutcome, Progress, TreasureOutcome, TroubleOutcome};
use crate::shop::{Shop, ShopChoice};
use crate::terrain::Terrain;
use crate::treasure::Treasure;

/// The fixed, randomly rolled features of a town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownLayout {
    pub terrain: Terrain,
    pub tough: bool,
    pub treasure: Treasure,
}

impl TownLayout {
    /// Roll terrain, treasure and toughness, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::InvalidToughness`] when the config toughness is not a probability.
    pub fn roll<R: Rng + ?Sized>(cfg: &TownConfig, rng: &mut R) -> Result<Self, TownError> {
        cfg.validate()?;
        let terrain = Terrain::random(rng);
        let treasure = Treasure::random(rng);
        let tough = rng.r#gen::<f64>() < cfg.toughness;
        Ok(Self {
            terrain,
            tough,
            treasure,
        })
    }

    #[must_use]
    pub const fn no_trouble_chance(&self) -> f64 {
        if self.tough {
            TOUGH_NO_TROUBLE_CHANCE
        } else {
            MILD_NO_TROUBLE_CHANCE
        }
    }
}

/// A town the hunter is currently visiting.
///
/// The status message returned by [`Town::latest_news`] is replaced by every
/// action; it is never an accumulated log.
#[derive(Debug)]
pub struct Town<S, H> {
    shop: S,
    layout: TownLayout,
    easy_mode: bool,
    treasure_found: bool,
    dug: bool,
    news: String,
    hunter: Option<H>,
}

impl<S: Shop, H: Hunter> Town<S, H> {
    /// Build a town with a freshly rolled layout.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::InvalidToughness`] when the config toughness is not a probability.
    pub fn new<R: Rng + ?Sized>(shop: S, cfg: &TownConfig, rng: &mut R) -> Result<Self, TownError> {
        let layout = TownLayout::roll(cfg, rng)?;
        debug!(
            "town rolled: terrain={} tough={} treasure={:?}",
            layout.terrain, layout.tough, layout.treasure
        );
        Ok(Self::with_layout(shop, layout, cfg.easy_mode))
    }

    /// Build a town from a known layout.
    #[must_use]
    pub const fn with_layout(shop: S, layout: TownLayout, easy_mode: bool) -> Self {
        Self {
            shop,
            layout,
            easy_mode,
            treasure_found: false,
            dug: false,
            news: String::new(),
            hunter: None,
        }
    }

    #[must_use]
    pub fn latest_news(&self) -> &str {
        &self.news
    }

    #[must_use]
    pub const fn layout(&self) -> &TownLayout {
        &self.layout
    }

    #[must_use]
    pub const fn terrain(&self) -> &Terrain {
        &self.layout.terrain
    }

    #[must_use]
    pub const fn is_tough(&self) -> bool {
        self.layout.tough
    }

    #[must_use]
    pub const fn treasure(&self) -> Treasure {
        self.layout.treasure
    }

    #[must_use]
    pub const fn treasure_found(&self) -> bool {
        self.treasure_found
    }

    #[must_use]
    pub const fn dug(&self) -> bool {
        self.dug
    }

    #[must_use]
    pub const fn easy_mode(&self) -> bool {
        self.easy_mode
    }

    #[must_use]
    pub const fn hunter(&self) -> Option<&H> {
        self.hunter.as_ref()
    }

    pub fn hunter_mut(&mut self) -> Option<&mut H> {
        self.hunter.as_mut()
    }

    #[must_use]
    pub const fn shop(&self) -> &S {
        &self.shop
    }

    /// Hand the hunter back to the driver, e.g. when moving on to the next town.
    pub fn hunter_departs(&mut self) -> Option<H> {
        self.hunter.take()
    }

    /// Bind an arriving hunter and greet them. Returns whoever was present before.
    pub fn hunter_arrives(&mut self, hunter: H) -> Option<H> {
        self.news = format!("Welcome to town, {}.", hunter.name());
        if self.layout.tough {
            self.news
                .push_str("\nIt's pretty rough around here, so watch yourself.");
        } else {
            self.news
                .push_str("\nWe're just a sleepy little town with mild mannered folk.");
        }
        self.hunter.replace(hunter)
    }

    /// Try to cross the surrounding terrain.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::NoHunter`] if no hunter has arrived.
    pub fn leave_town<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<LeaveOutcome, TownError> {
        let hunter = present(&mut self.hunter, "leave town")?;
        let terrain = self.layout.terrain;
        let item = terrain.needed_item();

        if !hunter.has_item(item) {
            self.news = format!(
                "You can't leave town, {}. You don't have a {item}.",
                hunter.name()
            );
            return Ok(LeaveOutcome::Blocked { needed: item });
        }

        self.news = format!("You used your {item} to cross the {terrain}.");
        let item_broke = !self.easy_mode && item_breaks(rng);
        if item_broke {
            hunter.remove_item(item);
            self.news
                .push_str(&format!("\nUnfortunately, you lost your {item}."));
        }
        debug!("crossed {terrain} with {item} (broke: {item_broke})");
        Ok(LeaveOutcome::Crossed {
            item,
            terrain: terrain.kind(),
            item_broke,
        })
    }

    /// Let the shop run its transaction.
    ///
    /// Whatever the shop narrated is replaced with a fixed exit notice.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::NoHunter`] if no hunter has arrived.
    pub fn enter_shop(&mut self, choice: ShopChoice) -> Result<(), TownError> {
        let hunter = present(&mut self.hunter, "enter the shop")?;
        self.shop.enter(hunter, choice);
        self.news = String::from("You left the shop");
        Ok(())
    }

    /// Go looking for a brawl. Tough towns are quieter but the locals hit harder.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::NoHunter`] if no hunter has arrived.
    pub fn look_for_trouble<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<TroubleOutcome, TownError> {
        let hunter = present(&mut self.hunter, "look for trouble")?;
        let no_trouble_chance = self.layout.no_trouble_chance();

        if rng.r#gen::<f64>() < no_trouble_chance {
            self.news = String::from("You couldn't find any trouble");
            return Ok(TroubleOutcome::Quiet);
        }

        let armed = hunter.has_item(Item::Sword);
        let stake = rng.gen_range(1..=BRAWL_STAKE_MAX);
        let won = armed || rng.r#gen::<f64>() >= no_trouble_chance;
        trace!("brawl: armed={armed} won={won} stake={stake}");

        let mut news = String::new();
        if armed {
            news.push_str(&"You want trouble, stranger!  You got it!\n".red().to_string());
            news.push_str(&"Bro picked the wrong guy to fight.\n".white().to_string());
        } else {
            news.push_str(
                &"You want trouble, stranger!  You got it!\nOof! Umph! Ow!\n"
                    .red()
                    .to_string(),
            );
        }

        if won {
            news.push_str("Okay, stranger! You proved yer mettle. Here, take my gold.");
            news.push_str(&format!(
                "\nYou won the brawl and receive {} gold.",
                stake.to_string().yellow()
            ));
            hunter.change_gold(stake);
        } else {
            news.push_str("That'll teach you to go lookin' fer trouble in MY town! Now pay up!");
            news.push_str(&format!("\nYou lost the brawl and pay {stake} gold."));
            hunter.change_gold(-stake);
        }
        self.news = news;

        Ok(TroubleOutcome::Brawl { armed, won, stake })
    }

    /// Search the town for its treasure. Only the first search reveals anything.
    ///
    /// Victory is reported whenever the hunter's collection is complete after
    /// the first search, even if this town's find was dust or a duplicate. A
    /// hunter who already won gets `Progress::Victory` again in every later
    /// town, so drivers must end the game at the first victory.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::NoHunter`] if no hunter has arrived.
    pub fn find_treasure(&mut self) -> Result<TreasureOutcome, TownError> {
        let hunter = present(&mut self.hunter, "search for treasure")?;

        if self.treasure_found {
            self.news = String::from("You have already searched this town.");
            return Ok(TreasureOutcome::AlreadySearched);
        }

        let treasure = self.layout.treasure;
        self.treasure_found = true;
        let mut news = format!("You search for the treasure...\nYou found: {treasure}");

        let claim = if treasure.is_dust() {
            news.push_str("\nNo shiny treasure this time :(");
            Claim::Worthless
        } else if hunter.holds_treasure(treasure) {
            news.push_str("\nYou already have this treasure!");
            Claim::Duplicate
        } else {
            hunter.add_treasure(treasure);
            news.push_str(&format!("\nYou add {treasure} to your collection."));
            Claim::Added
        };

        let progress = if hunter.collection_complete() {
            info!("{} completed the treasure collection", hunter.name());
            news.push_str(&format!(
                "\n{}",
                "Congratulations, you have found the last of the three treasures, you win!"
                    .green()
                    .bold()
            ));
            Progress::Victory
        } else {
            Progress::Continue
        };
        self.news = news;

        Ok(TreasureOutcome::Revealed {
            treasure,
            claim,
            progress,
        })
    }

    /// Dig for gold. Needs a shovel; once a dig happens the town is spent.
    ///
    /// # Errors
    ///
    /// Returns [`TownError::NoHunter`] if no hunter has arrived.
    pub fn dig_for_gold<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DigOutcome, TownError> {
        let hunter = present(&mut self.hunter, "dig for gold")?;

        if self.dug {
            self.news = String::from("You already dug for gold in this town.");
            return Ok(DigOutcome::AlreadyDug);
        }
        if !hunter.has_item(Item::Shovel) {
            self.news = String::from("You can't dig for gold without a shovel!");
            return Ok(DigOutcome::NoShovel);
        }

        self.dug = true;
        if rng.r#gen::<f64>() < DIG_DIRT_CHANCE {
            self.news = String::from("You dug but only found dirt");
            return Ok(DigOutcome::Dirt);
        }

        let gold = rng.gen_range(1..=DIG_GOLD_MAX);
        hunter.change_gold(gold);
        self.news = format!("You dug up {} gold!", gold.to_string().yellow());
        Ok(DigOutcome::Gold(gold))
    }
}

impl<S, H> fmt::Display for Town<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This nice little town is surrounded by {}.",
            self.layout.terrain
        )
    }
}

fn present<'a, H>(hunter: &'a mut Option<H>, action: &'static str) -> Result<&'a mut H, TownError> {
    hunter.as_mut().ok_or(TownError::NoHunter { action })
}

fn item_breaks<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.r#gen::<f64>() < ITEM_BREAK_CHANCE
}
