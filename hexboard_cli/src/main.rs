//! Generates, inspects and validates hex board maps from the command line.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use hexboard_lib::{
    board::HexBoard,
    geometry::Orientation,
    map::MapDefinition,
    world_gen::{GenerationConfig, DEFAULT_NOISE_SCALE},
};
use rand::{rngs::SmallRng, SeedableRng};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

mod pool;

#[derive(Parser, Debug)]
#[command(name = "hexboard")]
#[command(about = "Generate, inspect and validate hex board maps")]
struct Args {
    /// Log more; repeat for even more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map and write it as JSON
    Generate {
        /// Exact number of hexes to place
        #[arg(long, default_value = "91")]
        hexes: usize,

        /// Center-to-corner size of each hex
        #[arg(long, default_value = "40")]
        hex_size: f64,

        /// Either "pointy" or "flat"
        #[arg(long, default_value = "pointy")]
        orientation: Orientation,

        /// Frequency of the territory noise; higher gives smaller territories
        #[arg(long, default_value_t = DEFAULT_NOISE_SCALE)]
        noise_scale: f64,

        /// Where to write the map (stdout if not specified)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print a summary of a map file
    Inspect {
        /// The map file to read
        path: PathBuf,

        /// Also print every positioned hex as JSON
        #[arg(long)]
        positions: bool,
    },
    /// Check that a map file loads, exiting non-zero if it does not
    Validate {
        /// The map file to read
        path: PathBuf,
    },
    /// Draw items from a weighted pool description
    Draw {
        /// JSON file of the form {"category": {"weight": 1.0, "items": [...]}}
        #[arg(long)]
        pool: PathBuf,

        /// How many items to draw
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Random seed
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    match args.command {
        Command::Generate {
            hexes,
            hex_size,
            orientation,
            noise_scale,
            out,
        } => generate(
            GenerationConfig {
                hex_count: hexes,
                hex_size,
                orientation,
                noise_scale,
                ..Default::default()
            },
            out.as_deref(),
        ),
        Command::Inspect { path, positions } => inspect(&path, positions),
        Command::Validate { path } => validate(&path),
        Command::Draw { pool, count, seed } => draw(&pool, count, seed),
    }
}

/// Sends log events to stderr, filtered by `RUST_LOG` or else by verbosity.
fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<MapDefinition> {
    MapDefinition::from_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn generate(config: GenerationConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let map = config.generate().context("invalid generation settings")?;
    let json = map.to_json()?;

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!("Wrote {} hexes to {}", map.hexes.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn inspect(path: &Path, positions: bool) -> anyhow::Result<()> {
    let board = HexBoard::new(load(path)?);
    let map = board.map();
    let bounds = board.bounds();

    println!("{} ({}), version {}", map.name, map.id, map.version);
    println!(
        "grid: {} hexes of size {}",
        map.grid.orientation(),
        map.grid.hex_size()
    );
    println!("hexes: {}", map.hexes.len());
    println!("territories: {}", map.territories.len());
    for territory in &map.territories {
        let neighbors = board
            .territory_neighbors(&territory.id)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {} ({} hexes, {}): borders [{}]",
            territory.id,
            territory.hex_ids.len(),
            territory.display_color,
            neighbors
        );
    }
    println!("chunks: {}", board.chunks().len());
    println!(
        "bounds: x {:.2}..{:.2}, y {:.2}..{:.2}",
        bounds.min_x,
        bounds.max_x(),
        bounds.min_y,
        bounds.max_y()
    );
    println!(
        "territory labels: {}",
        if map.display_settings().show_territory_labels {
            "shown"
        } else {
            "hidden"
        }
    );

    if positions {
        println!("{}", serde_json::to_string_pretty(board.positioned_hexes())?);
    }

    Ok(())
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let map = load(path)?;
    println!(
        "{} is valid: {} hexes, {} territories",
        path.display(),
        map.hexes.len(),
        map.territories.len()
    );

    Ok(())
}

fn draw(path: &Path, count: usize, seed: u64) -> anyhow::Result<()> {
    let mut pool = pool::load_pool(path)?;
    let mut rng = SmallRng::seed_from_u64(seed);

    let drawn = pool.draw_many(count, &mut rng);
    if drawn.len() < count {
        info!("Pool ran dry after {} of {count} draws", drawn.len());
    }
    for (category, item) in drawn {
        println!("{}", serde_json::json!({ "category": category, "item": item }));
    }

    Ok(())
}
