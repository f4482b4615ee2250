//! Gearsmith - Entry Point
//!
//! Command-line access to the catalog loader, the refine simulator and the
//! effect aggregator.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::runtime::Runtime;

use gearsmith::catalog::{load_catalog, CatalogBundle, CatalogSource, DirSource, HttpSource};
use gearsmith::core::config::{set_config, GearConfig};
use gearsmith::core::error::{GearError, Result};
use gearsmith::core::types::{Part, SlotId};
use gearsmith::effects::aggregate_effects;
use gearsmith::refine::{get_prob, get_refine_cost, tables, FailGuard, LogFilter, RefineSession, RefineState};

#[derive(Parser, Debug)]
#[command(name = "gearsmith")]
#[command(about = "Equipment catalog, effect aggregation and refine simulation")]
struct Args {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and print counts per part
    Catalog {
        /// Read data files from a local directory
        #[arg(long, conflicts_with = "url")]
        dir: Option<PathBuf>,

        /// Base URL of the data files (defaults to the configured one)
        #[arg(long)]
        url: Option<String>,
    },

    /// Run refine attempts and print the log and totals
    Refine {
        /// Starting level (0-9)
        #[arg(long, default_value_t = 0)]
        from: i64,

        /// Starting guard (0-2)
        #[arg(long, default_value_t = 0)]
        guard: u8,

        /// Number of attempts
        #[arg(long, default_value_t = 10)]
        attempts: u32,

        /// Random seed for deterministic runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Aggregate the effect text in the given files
    Aggregate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the probability and cost table
    Odds,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gearsmith=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GearConfig::load(path)?,
        None => GearConfig::default(),
    }
    .with_env_overrides();
    config.validate().map_err(GearError::Config)?;
    let _ = set_config(config.clone());

    match args.command {
        Command::Catalog { dir, url } => {
            let rt = Runtime::new()?;
            let bundle = match dir {
                Some(dir) => rt.block_on(load(&DirSource::new(dir)))?,
                None => {
                    let source = match url {
                        Some(url) => HttpSource::new(url),
                        None => HttpSource::from_config(&config),
                    };
                    rt.block_on(load(&source))?
                }
            };
            print_catalog(&bundle);
        }
        Command::Refine {
            from,
            guard,
            attempts,
            seed,
        } => run_refine(&config, from, FailGuard::from(guard), attempts, seed),
        Command::Aggregate { files } => {
            let texts = files
                .iter()
                .map(std::fs::read_to_string)
                .collect::<std::io::Result<Vec<_>>>()?;
            let summary = aggregate_effects(texts.iter().map(String::as_str));
            println!("{}", summary.render());
        }
        Command::Odds => print_odds(),
    }

    Ok(())
}

async fn load<S: CatalogSource>(source: &S) -> Result<CatalogBundle> {
    Ok(load_catalog(source).await?)
}

fn print_catalog(bundle: &CatalogBundle) {
    println!("characters: {}", bundle.characters.len());
    println!("items:      {}", bundle.items.len());
    println!("weapons:    {}", bundle.weapons.len());
    println!();
    for slot in SlotId::ALL {
        let def = slot.def();
        let count = match def.part {
            Some(part) => bundle.items_for_part(part).count(),
            None => bundle.weapons.len(),
        };
        println!("  {:<8} {}", def.label, count);
    }
    let unplaced = bundle
        .items
        .iter()
        .filter(|i| !i.raw.item_type.expected_parts().contains(&i.part))
        .count();
    if unplaced > 0 {
        println!("  ({} items outside their type's parts, fallback {})", unplaced, Part::FALLBACK.label());
    }
}

fn run_refine(config: &GearConfig, from: i64, guard: FailGuard, attempts: u32, seed: Option<u64>) {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = RefineSession::new(config.refine_log_capacity);
    session.reset_to(RefineState::new(from, guard));

    println!("seed {seed}, start +{} ({})", session.state().level, session.guard_label());
    for _ in 0..attempts {
        session.attempt(&mut rng);
    }

    let mut entries: Vec<_> = session.logs(LogFilter::All).collect();
    entries.reverse();
    for entry in entries {
        println!(
            "#{:<4} +{} -> +{}  {}  (roll {:.2})",
            entry.attempt_no, entry.prev.level, entry.next.level, entry.outcome, entry.roll
        );
    }

    let totals = session.totals();
    println!();
    println!(
        "now +{} ({}), best +{}, {} attempts",
        session.state().level,
        session.guard_label(),
        session.max_level(),
        session.attempts()
    );
    println!(
        "stone {}  catalyst {}  rion {}  gold {}  terra {:.0}",
        totals.stone, totals.catalyst, totals.rion, totals.gold, totals.terra
    );
}

fn print_odds() {
    println!("lvl  guard  success  keep  fail  break   stone  cat  rion        gold       terra");
    for level in 0..=i64::from(tables::MAX_LEVEL) {
        let cost = get_refine_cost(level);
        for guard in FailGuard::ALL {
            let p = get_prob(level, guard);
            println!(
                "{:>3}  {:>5}  {:>7}  {:>4}  {:>4}  {:>5}   {:>5}  {:>3}  {:>4}  {:>10}  {:>10.1}",
                level,
                guard.index(),
                p.success,
                p.keep,
                p.fail,
                p.destroy,
                cost.stone,
                cost.catalyst,
                cost.rion,
                cost.gold,
                cost.terra
            );
        }
    }
}
