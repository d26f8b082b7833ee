#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Delve run headlessly.

mod autopilot;
mod map;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::Event;
use delve_world::{apply, query, GameConfig, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Turn cap used when none is given on the command line.
const DEFAULT_TURNS: u64 = 2_000;

/// Command-line arguments accepted by the `delve` binary.
#[derive(Debug, Parser)]
#[command(name = "delve", about = "Plays a Delve run with the autopilot")]
struct CliArgs {
    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with run configuration.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,
    /// Maximum number of turns to play.
    #[arg(long, default_value_t = DEFAULT_TURNS)]
    turns: u64,
    /// Writes the final floor layout as JSON to this path.
    #[arg(long, value_name = "JSON")]
    export: Option<PathBuf>,
    /// Prints the explored map when the run stops.
    #[arg(long)]
    map: bool,
}

/// Entry point for the Delve command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    let mut events = Vec::new();
    let mut world = World::new(&config, &mut events).context("failed to start the run")?;
    print_messages(&events);
    info!(seed = config.seed, "run started");

    while query::turn(&world) < args.turns {
        let Some(command) = autopilot::next_command(&world) else {
            break;
        };
        events.clear();
        apply(&mut world, command, &mut events);
        print_messages(&events);
    }

    if args.map {
        print!("{}", map::render(&world));
    }

    if let Some(path) = &args.export {
        let json = serde_json::to_string_pretty(query::layout(&world))
            .context("failed to serialise the floor layout")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write layout to {}", path.display()))?;
        info!(path = %path.display(), "exported floor layout");
    }

    let summary = query::summary(&world);
    println!(
        "Run ended after {} turns on floor {}: level {}, {} kills, {} gold{}",
        query::turn(&world),
        summary.floor,
        summary.level,
        summary.kills,
        summary.gold,
        if query::is_game_over(&world) {
            " (died)"
        } else {
            ""
        },
    );
    Ok(())
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GameConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn print_messages(events: &[Event]) {
    for event in events {
        if let Event::Message { text } = event {
            println!("{text}");
        }
    }
}
