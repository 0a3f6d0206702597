use std::collections::HashSet;
use townhunt_game::{
    Adventurer, Claim, DigOutcome, Hunter, Item, Progress, Shop, ShopChoice, Town, TownConfig,
    TownRng, TreasureOutcome,
};

/// Sells every crossing item plus a shovel at a flat price.
#[derive(Debug, Default)]
struct GeneralStore {
    sales: u32,
}

impl Shop for GeneralStore {
    fn enter<H: Hunter + ?Sized>(&mut self, hunter: &mut H, choice: ShopChoice) {
        if choice != ShopChoice::Buy {
            return;
        }
        for item in Item::ALL {
            if item == Item::Sword || hunter.has_item(item) || hunter.gold() < 2 {
                continue;
            }
            hunter.change_gold(-2);
            hunter.add_item(item);
            self.sales += 1;
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Journal {
    towns: u32,
    news: Vec<String>,
    victory: bool,
}

fn play_campaign(seed: u64, max_towns: u32) -> (Journal, Adventurer) {
    let cfg = TownConfig::new(0.5, false);
    let mut rng = TownRng::from_user_seed(seed);
    let mut store = GeneralStore::default();
    let mut hunter = Adventurer::new("Ivan", 100);
    let mut journal = Journal::default();

    while journal.towns < max_towns {
        journal.towns += 1;
        let mut town = Town::new(&mut store, &cfg, rng.setup()).expect("valid config");
        town.hunter_arrives(hunter);
        journal.news.push(town.latest_news().to_string());

        let found = town.find_treasure().expect("hunter present");
        journal.news.push(town.latest_news().to_string());
        if let TreasureOutcome::Revealed {
            progress: Progress::Victory,
            ..
        } = found
        {
            journal.victory = true;
            hunter = town.hunter_departs().expect("hunter present");
            break;
        }

        town.look_for_trouble(rng.trouble()).expect("hunter present");
        journal.news.push(town.latest_news().to_string());
        town.enter_shop(ShopChoice::Buy).expect("hunter present");
        town.dig_for_gold(rng.dig()).expect("hunter present");
        journal.news.push(town.latest_news().to_string());

        let left = town.leave_town(rng.travel()).expect("hunter present");
        journal.news.push(town.latest_news().to_string());
        assert!(left.left_town(), "the store stocks every crossing item");
        hunter = town.hunter_departs().expect("hunter present");
    }

    (journal, hunter)
}

#[test]
fn seeded_campaign_is_reproducible() {
    let (first, first_hunter) = play_campaign(1337, 12);
    let (second, second_hunter) = play_campaign(1337, 12);
    assert_eq!(first, second);
    assert_eq!(first_hunter, second_hunter);
}

#[test]
fn campaign_reaches_victory() {
    let (journal, hunter) = play_campaign(42, 200);
    assert!(journal.victory, "three distinct treasures within 200 towns");
    assert!(hunter.collection_complete());
    let held: HashSet<_> = hunter.treasures.iter().flatten().copied().collect();
    assert_eq!(held.len(), 3);
}

#[test]
fn shovel_bought_mid_visit_allows_retry() {
    let cfg = TownConfig::default();
    let mut rng = TownRng::from_user_seed(7);
    let mut store = GeneralStore::default();
    let mut town = Town::new(&mut store, &cfg, rng.setup()).expect("valid config");
    town.hunter_arrives(Adventurer::new("Ivan", 50));

    assert_eq!(
        town.dig_for_gold(rng.dig()).expect("hunter present"),
        DigOutcome::NoShovel
    );
    assert!(!town.dug());
    town.enter_shop(ShopChoice::Buy).expect("hunter present");
    assert_eq!(town.latest_news(), "You left the shop");

    let outcome = town.dig_for_gold(rng.dig()).expect("hunter present");
    assert!(matches!(outcome, DigOutcome::Dirt | DigOutcome::Gold(_)));
    assert!(town.dug());
    assert_eq!(
        town.dig_for_gold(rng.dig()).expect("hunter present"),
        DigOutcome::AlreadyDug
    );
    drop(town);
    assert!(store.sales > 0);
}

#[test]
fn duplicate_find_reports_without_changing_collection() {
    let cfg = TownConfig::default();
    let mut rng = TownRng::from_user_seed(99);
    let mut hunter = Adventurer::new("Ivan", 0);
    for _ in 0..64 {
        let mut town: Town<GeneralStore, Adventurer> =
            Town::new(GeneralStore::default(), &cfg, rng.setup()).expect("valid config");
        let treasure = town.treasure();
        if treasure.is_dust() {
            continue;
        }
        hunter.treasures = [Some(treasure), None, None];
        town.hunter_arrives(hunter.clone());
        let outcome = town.find_treasure().expect("hunter present");
        assert_eq!(
            outcome,
            TreasureOutcome::Revealed {
                treasure,
                claim: Claim::Duplicate,
                progress: Progress::Continue,
            }
        );
        assert_eq!(
            town.hunter().expect("hunter present").treasures,
            [Some(treasure), None, None]
        );
        return;
    }
    panic!("no non-dust town rolled in 64 attempts");
}
