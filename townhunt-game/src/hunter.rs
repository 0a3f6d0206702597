//! Hunter collaborator contract plus a reference implementation.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::item::Item;
use crate::treasure::{TREASURE_SLOTS, Treasure};

/// Everything a [`Town`](crate::Town) needs from the character visiting it.
pub trait Hunter {
    fn name(&self) -> &str;

    fn has_item(&self, item: Item) -> bool;

    /// Add `item` to the kit, returning `false` if it was already carried.
    fn add_item(&mut self, item: Item) -> bool;

    /// Remove `item` from the kit, returning whether it was present.
    fn remove_item(&mut self, item: Item) -> bool;

    fn gold(&self) -> i32;

    /// Apply a signed change to the gold balance.
    fn change_gold(&mut self, delta: i32);

    /// Ordered treasure slots; a filled final slot means the collection is complete.
    fn treasures(&self) -> &[Option<Treasure>];

    /// Record a newly found treasure in the next free slot.
    fn add_treasure(&mut self, treasure: Treasure);

    fn holds_treasure(&self, treasure: Treasure) -> bool {
        self.treasures().iter().flatten().any(|held| *held == treasure)
    }

    fn collection_complete(&self) -> bool {
        self.treasures()
            .get(TREASURE_SLOTS - 1)
            .is_some_and(Option::is_some)
    }
}

impl<H: Hunter + ?Sized> Hunter for &mut H {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn has_item(&self, item: Item) -> bool {
        (**self).has_item(item)
    }

    fn add_item(&mut self, item: Item) -> bool {
        (**self).add_item(item)
    }

    fn remove_item(&mut self, item: Item) -> bool {
        (**self).remove_item(item)
    }

    fn gold(&self) -> i32 {
        (**self).gold()
    }

    fn change_gold(&mut self, delta: i32) {
        (**self).change_gold(delta);
    }

    fn treasures(&self) -> &[Option<Treasure>] {
        (**self).treasures()
    }

    fn add_treasure(&mut self, treasure: Treasure) {
        (**self).add_treasure(treasure);
    }
}

/// Plain hunter with a kit, a gold purse that never goes negative, and three treasure slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventurer {
    pub name: String,
    #[serde(default)]
    pub kit: BTreeSet<Item>,
    #[serde(default)]
    pub gold: i32,
    #[serde(default)]
    pub treasures: [Option<Treasure>; TREASURE_SLOTS],
}

impl Adventurer {
    #[must_use]
    pub fn new(name: impl Into<String>, gold: i32) -> Self {
        Self {
            name: name.into(),
            kit: BTreeSet::new(),
            gold: gold.max(0),
            treasures: [None; TREASURE_SLOTS],
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.kit.extend(items);
        self
    }

    #[must_use]
    pub fn treasure_count(&self) -> usize {
        self.treasures.iter().flatten().count()
    }
}

impl Hunter for Adventurer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_item(&self, item: Item) -> bool {
        self.kit.contains(&item)
    }

    fn add_item(&mut self, item: Item) -> bool {
        self.kit.insert(item)
    }

    fn remove_item(&mut self, item: Item) -> bool {
        self.kit.remove(&item)
    }

    fn gold(&self) -> i32 {
        self.gold
    }

    fn change_gold(&mut self, delta: i32) {
        self.gold = self.gold.saturating_add(delta).max(0);
    }

    fn treasures(&self) -> &[Option<Treasure>] {
        &self.treasures
    }

    fn add_treasure(&mut self, treasure: Treasure) {
        if let Some(slot) = self.treasures.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(treasure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_never_drops_below_zero() {
        let mut hunter = Adventurer::new("Ivan", 5);
        hunter.change_gold(-8);
        assert_eq!(hunter.gold, 0);
        hunter.change_gold(12);
        assert_eq!(hunter.gold, 12);
    }

    #[test]
    fn treasures_fill_slots_in_order() {
        let mut hunter = Adventurer::new("Ivan", 0);
        assert!(!hunter.collection_complete());
        hunter.add_treasure(Treasure::Gem);
        hunter.add_treasure(Treasure::Crown);
        assert_eq!(
            hunter.treasures(),
            &[Some(Treasure::Gem), Some(Treasure::Crown), None]
        );
        assert!(hunter.holds_treasure(Treasure::Gem));
        assert!(!hunter.holds_treasure(Treasure::Trophy));
        hunter.add_treasure(Treasure::Trophy);
        assert!(hunter.collection_complete());
        hunter.add_treasure(Treasure::Dust);
        assert_eq!(hunter.treasure_count(), 3);
    }

    #[test]
    fn kit_tracks_items() {
        let mut hunter = Adventurer::new("Ivan", 0).with_items([Item::Rope]);
        assert!(hunter.has_item(Item::Rope));
        assert!(!hunter.add_item(Item::Rope));
        assert!(hunter.remove_item(Item::Rope));
        assert!(!hunter.remove_item(Item::Rope));
    }

    #[test]
    fn borrowed_hunter_forwards_calls() {
        fn reward<H: Hunter>(mut hunter: H) {
            hunter.change_gold(4);
            hunter.add_treasure(Treasure::Trophy);
        }

        let mut hunter = Adventurer::new("Ivan", 3);
        reward(&mut hunter);
        assert_eq!(hunter.gold, 7);
        assert!(hunter.holds_treasure(Treasure::Trophy));
    }
}
