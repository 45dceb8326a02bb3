//! Fantom Dungeon Example
//!
//! Demonstrates laurel with a dungeon issuer.
//! The dungeon registers its catalog, summoners go on adventures and earn
//! achievements, and a read client lists what they earned.
//!
//! Set `LAUREL_CONFIG` to a RON registry config to use a database file,
//! and `RUST_LOG=debug` to see the registry's own logging.

use laurel_core::{AchievementLedger, Error as RegistryError, IssuerId, RegistryConfig, SummonerId};
use laurel_db::Store;
use laurel_script::{Catalog, Error as ScriptError, RegisteredCatalog};
use tracing_subscriber::EnvFilter;

const CATALOG: &str = include_str!("../dungeon.ron");

/// Award every boss the summoner defeats on this run
fn adventure(
    ledger: &dyn AchievementLedger,
    dungeon: &RegisteredCatalog,
    summoner: SummonerId,
    bosses: &[&str],
) -> laurel_script::Result<()> {
    for boss in bosses {
        match dungeon.award(ledger, summoner, boss) {
            Ok(record) => println!("  {} earned '{}' at {}", summoner, boss, record.timestamp),
            Err(ScriptError::Registry(RegistryError::Conflict { .. })) => {
                println!("  {} already holds '{}'", summoner, boss)
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Laurel Fantom Dungeon Example ===\n");

    let config = match std::env::var("LAUREL_CONFIG") {
        Ok(path) => RegistryConfig::load(path)?,
        Err(_) => RegistryConfig::default(),
    };
    let store = Store::from_config(&config)?;
    let events = store.subscribe();

    // The dungeon ships its achievements as a catalog
    let issuer = IssuerId::new("fantom-dungeon");
    let catalog = Catalog::from_ron_str(CATALOG)?;
    let dungeon = catalog.register(&store, &issuer)?;
    println!("Registered {} achievements:", dungeon.ids.len());
    for (key, id) in &dungeon.ids {
        println!("  {} -> {}", key, id);
    }

    let hero = SummonerId::new(0);
    let squire = SummonerId::new(1);

    println!("\nAdventures:");
    adventure(&store, &dungeon, hero, &["first_monster", "miniboss", "final_boss"])?;
    adventure(&store, &dungeon, squire, &["first_monster"])?;
    adventure(&store, &dungeon, hero, &["first_monster"])?;

    // Another issuer cannot hand out the dungeon's achievements
    let rival = IssuerId::new("rival-tavern");
    let final_boss = dungeon.id("final_boss")?;
    match store.award_achievement(&rival, squire, final_boss) {
        Err(e) => println!("  {} refused: {}", rival, e),
        Ok(_) => println!("  {} unexpectedly awarded {}", rival, final_boss),
    }

    println!("\nScores:");
    for summoner in [hero, squire] {
        println!(
            "  {}: {} points ({} from the dungeon)",
            summoner,
            store.get_points(summoner, &[])?,
            dungeon.points(&store, summoner)?,
        );
    }

    println!("\nAchievements of {}:", hero);
    for entry in store.get_achievements(hero, &[], 0, 9999)? {
        println!(
            "  [{}] {} ({} points, {}) from {}",
            entry.metadata.id,
            entry.metadata.title,
            entry.metadata.points,
            entry.metadata.difficulty,
            entry.metadata.source_name,
        );
    }

    println!(
        "\n{} holds the miniboss: {}",
        squire,
        store.has_achievement(squire, dungeon.id("miniboss")?)?
    );

    let notified = events.try_iter().count();
    println!("Award notifications received: {}", notified);

    let registry = store.load_registry(&config)?;
    print!("\n{}", registry.audit());

    Ok(())
}
