//! Reference shop used by the logic scenarios.
use log::debug;
use std::collections::BTreeMap;
use townhunt_game::{Hunter, Item, Shop, ShopChoice};

/// A general store with fixed prices.
///
/// Purchases come from a wishlist the driver fills before entering; sales
/// come from a sell list. The town discards whatever the store says, so the
/// store keeps its own ledger of receipts.
#[derive(Debug, Clone)]
pub struct Outfitter {
    prices: BTreeMap<Item, i32>,
    wishlist: Vec<Item>,
    sell_list: Vec<Item>,
    ledger: Vec<String>,
}

impl Default for Outfitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Outfitter {
    #[must_use]
    pub fn new() -> Self {
        let prices = BTreeMap::from([
            (Item::Water, 2),
            (Item::Rope, 4),
            (Item::Machete, 6),
            (Item::Boots, 5),
            (Item::Horse, 12),
            (Item::Boat, 20),
            (Item::Shovel, 8),
            (Item::Sword, 10),
        ]);
        Self {
            prices,
            wishlist: Vec::new(),
            sell_list: Vec::new(),
            ledger: Vec::new(),
        }
    }

    #[must_use]
    pub fn price(&self, item: Item) -> Option<i32> {
        self.prices.get(&item).copied()
    }

    /// Queue an item for the next buying visit.
    pub fn want(&mut self, item: Item) {
        if !self.wishlist.contains(&item) {
            self.wishlist.push(item);
        }
    }

    pub fn offload(&mut self, item: Item) {
        if !self.sell_list.contains(&item) {
            self.sell_list.push(item);
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &[String] {
        &self.ledger
    }

    fn buy<H: Hunter + ?Sized>(&mut self, hunter: &mut H) {
        let mut unmet = Vec::new();
        for item in std::mem::take(&mut self.wishlist) {
            let Some(price) = self.price(item) else {
                continue;
            };
            if hunter.has_item(item) {
                continue;
            }
            if hunter.gold() < price {
                self.ledger
                    .push(format!("{} can't afford the {item}.", hunter.name()));
                unmet.push(item);
                continue;
            }
            hunter.change_gold(-price);
            hunter.add_item(item);
            debug!("sold {item} for {price}");
            self.ledger.push(format!("Sold a {item} for {price} gold."));
        }
        self.wishlist = unmet;
    }

    fn sell<H: Hunter + ?Sized>(&mut self, hunter: &mut H) {
        for item in std::mem::take(&mut self.sell_list) {
            let Some(price) = self.price(item) else {
                continue;
            };
            if hunter.remove_item(item) {
                let offer = price / 2;
                hunter.change_gold(offer);
                self.ledger
                    .push(format!("Bought a {item} back for {offer} gold."));
            }
        }
    }
}

impl Shop for Outfitter {
    fn enter<H: Hunter + ?Sized>(&mut self, hunter: &mut H, choice: ShopChoice) {
        match choice {
            ShopChoice::Buy => self.buy(hunter),
            ShopChoice::Sell => self.sell(hunter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use townhunt_game::Adventurer;

    #[test]
    fn buys_affordable_wishes_and_keeps_the_rest() {
        let mut shop = Outfitter::new();
        let mut hunter = Adventurer::new("Ivan", 10);
        shop.want(Item::Rope);
        shop.want(Item::Boat);
        shop.enter(&mut hunter, ShopChoice::Buy);
        assert!(hunter.has_item(Item::Rope));
        assert!(!hunter.has_item(Item::Boat));
        assert_eq!(hunter.gold, 6);
        assert_eq!(shop.ledger().len(), 2);

        hunter.change_gold(20);
        shop.enter(&mut hunter, ShopChoice::Buy);
        assert!(hunter.has_item(Item::Boat));
        assert_eq!(hunter.gold, 6);
    }

    #[test]
    fn sells_at_half_price() {
        let mut shop = Outfitter::new();
        let mut hunter = Adventurer::new("Ivan", 0).with_items([Item::Sword]);
        shop.offload(Item::Sword);
        shop.offload(Item::Horse);
        shop.enter(&mut hunter, ShopChoice::Sell);
        assert!(!hunter.has_item(Item::Sword));
        assert_eq!(hunter.gold, 5);
        assert_eq!(shop.ledger(), ["Bought a Sword back for 5 gold."]);
    }
}
