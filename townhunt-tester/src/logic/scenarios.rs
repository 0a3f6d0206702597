use anyhow::{Result, bail, ensure};
use std::collections::HashSet;

use townhunt_game::{
    Adventurer, Claim, DigOutcome, Hunter, Item, LeaveOutcome, Progress, ShopChoice,
    TERRAIN_TABLE, Terrain, TerrainKind, Town, TownConfig, TownError, TownLayout, TownRng,
    Treasure, TreasureOutcome, TroubleOutcome,
};

use super::outfitter::Outfitter;

const LAYOUT_ROLLS: usize = 600;
const TROUBLE_LOOKS: usize = 2000;
const CROSSINGS: usize = 1000;
const MAX_TOWNS: usize = 150;
const MAX_BRAWLS_PER_TOWN: usize = 400;
const HUNTER_NAME: &str = "Scout";
const STARTING_GOLD: i32 = 60;

/// Inputs shared by every scenario iteration.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub config: TownConfig,
}

/// Checks one seeded iteration, returning a short summary on success.
pub type ScenarioCheck = fn(&ScenarioCtx) -> Result<String>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("key", &self.key).finish()
    }
}

const CATALOG: [Scenario; 6] = [
    Scenario {
        key: "smoke",
        description: "Arrive in one town and try every action once",
        check: smoke,
    },
    Scenario {
        key: "terrain-coverage",
        description: "Rolled layouts cover every terrain and honour the toughness probability",
        check: terrain_coverage,
    },
    Scenario {
        key: "trouble-odds",
        description: "Quiet-street rates and brawl stakes match the town's toughness",
        check: trouble_odds,
    },
    Scenario {
        key: "item-attrition",
        description: "Crossing items break half the time, never in easy mode",
        check: item_attrition,
    },
    Scenario {
        key: "one-shot-latches",
        description: "Treasure searches and digs only pay out once per town",
        check: one_shot_latches,
    },
    Scenario {
        key: "treasure-run",
        description: "Travel town to town with a store-bought kit until the collection is complete",
        check: treasure_run,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description))
}

#[must_use]
pub fn scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|s| s.key.to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.key == key)
}

/// Four standard errors of a proportion estimated from `samples` draws.
fn tolerance(p: f64, samples: usize) -> f64 {
    let n = f64::from(u32::try_from(samples).unwrap_or(u32::MAX));
    4.0 * (p * (1.0 - p) / n).sqrt() + 1e-9
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let count = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
    let total = f64::from(u32::try_from(total).unwrap_or(u32::MAX));
    count / total
}

fn fixed_town(
    kind: TerrainKind,
    tough: bool,
    easy_mode: bool,
    hunter: Adventurer,
) -> Town<Outfitter, Adventurer> {
    let layout = TownLayout {
        terrain: Terrain::of(kind),
        tough,
        treasure: Treasure::Gem,
    };
    let mut town = Town::with_layout(Outfitter::new(), layout, easy_mode);
    town.hunter_arrives(hunter);
    town
}

fn smoke(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);
    let mut town: Town<Outfitter, Adventurer> =
        Town::new(Outfitter::new(), &ctx.config, rng.setup())?;

    ensure!(
        matches!(town.find_treasure(), Err(TownError::NoHunter { .. })),
        "actions before arrival must be rejected"
    );
    ensure!(!town.treasure_found(), "rejected search latched the town");

    town.hunter_arrives(Adventurer::new(HUNTER_NAME, STARTING_GOLD));
    let greeting = town.latest_news().to_string();
    ensure!(
        greeting.starts_with("Welcome to town, Scout."),
        "unexpected greeting: {greeting}"
    );
    let rough = greeting.contains("pretty rough");
    ensure!(
        rough == town.is_tough(),
        "greeting disagrees with toughness ({})",
        town.is_tough()
    );

    town.enter_shop(ShopChoice::Buy)?;
    ensure!(town.latest_news() == "You left the shop", "shop exit notice missing");

    let trouble = town.look_for_trouble(rng.trouble())?;
    ensure!(!town.latest_news().is_empty(), "brawl left no news");

    let found = town.find_treasure()?;
    ensure!(
        matches!(found, TreasureOutcome::Revealed { .. }),
        "first search should reveal the treasure"
    );

    let dug = town.dig_for_gold(rng.dig())?;
    ensure!(dug == DigOutcome::NoShovel, "dug without a shovel: {dug:?}");
    ensure!(!town.dug(), "shovel-less dig latched the town");

    let left = town.leave_town(rng.travel())?;
    let needed = town.terrain().needed_item();
    ensure!(
        left == LeaveOutcome::Blocked { needed },
        "empty-handed hunter crossed the {}",
        town.terrain()
    );

    Ok(format!("{} town, trouble {trouble:?}", town.terrain()))
}

fn terrain_coverage(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);
    let mut seen = HashSet::new();
    let mut tough = 0usize;
    for _ in 0..LAYOUT_ROLLS {
        let layout = TownLayout::roll(&ctx.config, rng.setup())?;
        ensure!(
            layout.terrain.needed_item() == layout.terrain.kind().needed_item(),
            "{} paired with the wrong item",
            layout.terrain
        );
        seen.insert(layout.terrain.kind());
        if layout.tough {
            tough += 1;
        }
    }
    ensure!(
        seen.len() == TERRAIN_TABLE.len(),
        "only {} of {} terrains rolled",
        seen.len(),
        TERRAIN_TABLE.len()
    );

    let expected = ctx.config.toughness;
    let observed = rate(tough, LAYOUT_ROLLS);
    ensure!(
        (observed - expected).abs() <= tolerance(expected, LAYOUT_ROLLS),
        "tough share {observed:.3} strays from {expected:.3}"
    );
    Ok(format!("tough share {observed:.3}"))
}

fn trouble_odds(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);
    let mut summary = Vec::new();
    for tough in [true, false] {
        for armed in [false, true] {
            let mut hunter = Adventurer::new(HUNTER_NAME, i32::MAX / 2);
            if armed {
                hunter.add_item(Item::Sword);
            }
            let mut town = fixed_town(TerrainKind::Plains, tough, false, hunter);
            let expected = town.layout().no_trouble_chance();
            let mut quiet = 0usize;
            for _ in 0..TROUBLE_LOOKS {
                match town.look_for_trouble(rng.trouble())? {
                    TroubleOutcome::Quiet => quiet += 1,
                    TroubleOutcome::Brawl { won, stake, .. } => {
                        ensure!((1..=10).contains(&stake), "stake {stake} out of range");
                        ensure!(won || !armed, "an armed hunter lost a brawl");
                    }
                }
            }
            let observed = rate(quiet, TROUBLE_LOOKS);
            ensure!(
                (observed - expected).abs() <= tolerance(expected, TROUBLE_LOOKS),
                "quiet rate {observed:.3} strays from {expected:.2} (tough: {tough})"
            );
            if !armed {
                summary.push(format!("{}={observed:.3}", if tough { "tough" } else { "mild" }));
            }
        }
    }
    Ok(summary.join(" "))
}

fn item_attrition(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);

    let mut blocked = fixed_town(
        TerrainKind::Jungle,
        false,
        false,
        Adventurer::new(HUNTER_NAME, 5).with_items([Item::Rope]),
    );
    let before = blocked.hunter().cloned();
    ensure!(
        blocked.leave_town(rng.travel())?
            == LeaveOutcome::Blocked {
                needed: Item::Machete
            },
        "crossed the jungle without a machete"
    );
    ensure!(blocked.hunter().cloned() == before, "blocked crossing changed the hunter");

    let mut broke_rate = 0.0;
    for easy_mode in [false, true] {
        let mut town = fixed_town(
            TerrainKind::Ocean,
            false,
            easy_mode,
            Adventurer::new(HUNTER_NAME, 0).with_items([Item::Boat]),
        );
        let mut broke = 0usize;
        for _ in 0..CROSSINGS {
            match town.leave_town(rng.travel())? {
                LeaveOutcome::Crossed { item_broke, .. } => {
                    if !item_broke {
                        continue;
                    }
                    ensure!(!easy_mode, "an item broke in easy mode");
                    broke += 1;
                    let Some(hunter) = town.hunter_mut() else {
                        bail!("hunter vanished mid-crossing");
                    };
                    ensure!(!hunter.has_item(Item::Boat), "broken boat still carried");
                    hunter.add_item(Item::Boat);
                }
                LeaveOutcome::Blocked { .. } => bail!("hunter with a boat was blocked"),
            }
        }
        if !easy_mode {
            broke_rate = rate(broke, CROSSINGS);
            ensure!(
                (broke_rate - 0.5).abs() <= tolerance(0.5, CROSSINGS),
                "break rate {broke_rate:.3} strays from 0.5"
            );
        }
    }
    Ok(format!("break rate {broke_rate:.3}"))
}

fn one_shot_latches(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);
    let mut outfitter = Outfitter::new();
    outfitter.want(Item::Shovel);
    outfitter.offload(Item::Shovel);

    let mut town = Town::new(&mut outfitter, &ctx.config, rng.setup())?;
    town.hunter_arrives(Adventurer::new(HUNTER_NAME, STARTING_GOLD));

    let first = town.find_treasure()?;
    let collection = town.hunter().map(|h| h.treasures);
    let second = town.find_treasure()?;
    ensure!(
        second == TreasureOutcome::AlreadySearched,
        "second search returned {second:?}"
    );
    ensure!(
        town.hunter().map(|h| h.treasures) == collection,
        "repeat search changed the collection"
    );
    if let TreasureOutcome::Revealed { treasure, claim, .. } = first {
        let expected = if treasure.is_dust() {
            Claim::Worthless
        } else {
            Claim::Added
        };
        ensure!(claim == expected, "fresh hunter got {claim:?} for {treasure}");
    } else {
        bail!("first search returned {first:?}");
    }

    ensure!(
        town.dig_for_gold(rng.dig())? == DigOutcome::NoShovel,
        "dug before buying a shovel"
    );
    town.enter_shop(ShopChoice::Buy)?;
    let gold_before = town.hunter().map_or(0, |h| h.gold);
    let dug = town.dig_for_gold(rng.dig())?;
    let gold_after = town.hunter().map_or(0, |h| h.gold);
    match dug {
        DigOutcome::Dirt => ensure!(gold_after == gold_before, "dirt changed the purse"),
        DigOutcome::Gold(found) => ensure!(
            (1..=20).contains(&found) && gold_after == gold_before + found,
            "gold dig paid {found} but purse moved {}",
            gold_after - gold_before
        ),
        other => bail!("dig with a shovel returned {other:?}"),
    }
    ensure!(
        town.dig_for_gold(rng.dig())? == DigOutcome::AlreadyDug,
        "second dig was allowed"
    );
    ensure!(
        town.hunter().map_or(0, |h| h.gold) == gold_after,
        "second dig changed the purse"
    );

    town.enter_shop(ShopChoice::Sell)?;
    ensure!(
        town.hunter().is_some_and(|h| !h.has_item(Item::Shovel) && h.gold == gold_after + 4),
        "spent shovel was not sold back at half price"
    );
    drop(town);

    ensure!(
        outfitter.ledger().len() == 2,
        "expected one sale and one buy-back, ledger: {:?}",
        outfitter.ledger()
    );
    Ok(format!("dig {dug:?}"))
}

fn treasure_run(ctx: &ScenarioCtx) -> Result<String> {
    let mut rng = TownRng::from_user_seed(ctx.seed);
    let mut outfitter = Outfitter::new();
    outfitter.want(Item::Sword);
    outfitter.want(Item::Shovel);
    let mut hunter = Adventurer::new(HUNTER_NAME, STARTING_GOLD);

    for towns in 1..=MAX_TOWNS {
        let layout = TownLayout::roll(&ctx.config, rng.setup())?;
        let needed = layout.terrain.needed_item();
        outfitter.want(needed);

        let mut town = Town::with_layout(&mut outfitter, layout, ctx.config.easy_mode);
        town.hunter_arrives(hunter);
        town.enter_shop(ShopChoice::Buy)?;

        if let TreasureOutcome::Revealed {
            progress: Progress::Victory,
            ..
        } = town.find_treasure()?
        {
            let Some(winner) = town.hunter_departs() else {
                bail!("hunter vanished at the finish");
            };
            let distinct: HashSet<_> = winner.treasures.iter().flatten().copied().collect();
            ensure!(
                distinct.len() == 3 && !distinct.contains(&Treasure::Dust),
                "victory with collection {:?}",
                winner.treasures
            );
            return Ok(format!("victory after {towns} towns with {} gold", winner.gold));
        }

        town.dig_for_gold(rng.dig())?;

        let mut brawls = 0;
        while !town.hunter().is_some_and(|h| h.has_item(needed)) {
            ensure!(
                brawls < MAX_BRAWLS_PER_TOWN,
                "stranded in a {} town after {brawls} brawls",
                town.terrain()
            );
            town.look_for_trouble(rng.trouble())?;
            town.enter_shop(ShopChoice::Buy)?;
            brawls += 1;
        }

        if !town.leave_town(rng.travel())?.left_town() {
            bail!("blocked despite carrying a {needed}");
        }
        let Some(traveller) = town.hunter_departs() else {
            bail!("hunter vanished on the road");
        };
        ensure!(traveller.gold >= 0, "purse went negative");
        hunter = traveller;
    }

    bail!(
        "no victory within {MAX_TOWNS} towns (collection {:?})",
        hunter.treasures
    )
}
