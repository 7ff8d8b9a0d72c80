//! Bomber Arena - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bomber_core::config::GameConfig;
use bomber_core::grid::CellKind;
use bomber_core::seed_finder::{find_seeds, FinderOptions, SeedCriteria, WorldSummary};
use bomber_core::worldgen;

use bomber_tools::fixtures::FixtureSet;

#[derive(Parser)]
#[command(name = "bomber-tools")]
#[command(about = "Development tools for the bomber arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and print it
    Generate {
        /// World seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Grid width
        #[arg(long, default_value = "13")]
        width: u32,

        /// Grid height
        #[arg(long, default_value = "11")]
        height: u32,

        /// Soft-block density
        #[arg(long, default_value = "0.5")]
        density: f32,

        /// Print the summary as JSON instead of ASCII terrain
        #[arg(long)]
        json: bool,
    },

    /// Search seeds matching world criteria
    FindSeeds {
        /// Minimum soft-block count
        #[arg(long)]
        min_soft: Option<usize>,

        /// Maximum soft-block count
        #[arg(long)]
        max_soft: Option<usize>,

        /// Minimum largest-cluster size
        #[arg(long)]
        min_cluster: Option<usize>,

        /// Require an open center
        #[arg(long)]
        open_center: bool,

        /// Candidate seeds to try
        #[arg(long, default_value = "1000")]
        attempts: u64,

        /// Number of matching seeds to report
        #[arg(long, default_value = "5")]
        count: usize,

        /// First candidate seed
        #[arg(long, default_value = "1")]
        start: u64,
    },

    /// Curate the standard fixture seed set
    Fixtures {
        /// Candidate seeds to try per criterion
        #[arg(long, default_value = "2000")]
        attempts: u64,

        /// Output JSON path
        #[arg(short, long, default_value = "fixtures.json")]
        output: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            seed,
            width,
            height,
            density,
            json,
        } => cmd_generate(seed, width, height, density, json),
        Commands::FindSeeds {
            min_soft,
            max_soft,
            min_cluster,
            open_center,
            attempts,
            count,
            start,
        } => {
            let criteria = SeedCriteria {
                min_soft_blocks: min_soft,
                max_soft_blocks: max_soft,
                min_cluster_size: min_cluster,
                open_center,
            };
            let options = FinderOptions {
                max_attempts: attempts,
                max_results: count,
                start_seed: start,
            };
            cmd_find_seeds(&criteria, &options);
        }
        Commands::Fixtures { attempts, output } => cmd_fixtures(attempts, &output),
    }
}

fn cmd_generate(seed: u64, width: u32, height: u32, density: f32, json: bool) {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_dimensions(width, height)
        .with_soft_density(density);
    let grid = worldgen::generate(&config);
    if json {
        let summary = WorldSummary::of(&grid);
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!("failed to encode summary: {e}"),
        }
        return;
    }
    for y in 0..grid.height() as i32 {
        let row: String = (0..grid.width() as i32)
            .map(|x| match grid.get(x, y) {
                Some(CellKind::Hard) => '#',
                Some(CellKind::Soft) => '+',
                _ => '.',
            })
            .collect();
        println!("{row}");
    }
}

fn cmd_find_seeds(criteria: &SeedCriteria, options: &FinderOptions) {
    let hits = find_seeds(&GameConfig::default(), criteria, options);
    if hits.is_empty() {
        tracing::warn!(
            attempts = options.max_attempts,
            "no seed satisfied the criteria"
        );
        return;
    }
    for hit in hits {
        println!(
            "seed {:>8}  soft {:>3}  cluster {:>2}  open_center {}",
            hit.seed,
            hit.summary.soft_blocks,
            hit.summary.largest_cluster,
            hit.summary.open_center
        );
    }
}

fn cmd_fixtures(attempts: u64, output: &std::path::Path) {
    let set = FixtureSet::curate(&GameConfig::default(), attempts);
    match set.save(output) {
        Ok(()) => tracing::info!(
            path = %output.display(),
            fixtures = set.fixtures.len(),
            "fixture set written"
        ),
        Err(e) => {
            tracing::error!("failed to write fixture set: {e}");
            std::process::exit(1);
        }
    }
}
