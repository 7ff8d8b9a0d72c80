//! Headless bomber arena runner.
//!
//! Runs matches without any frontend: seeded-random or scripted
//! controllers play full games for CI verification, seed sweeps, and
//! replay capture.
//!
//! # Usage
//!
//! ```bash
//! # Run a single match and print the final board
//! cargo run -p bomber_headless -- run --seed 12345
//!
//! # Run a scripted match from a RON move list
//! cargo run -p bomber_headless -- run --seed 12345 --script moves.ron
//!
//! # Sweep seeds in parallel
//! cargo run -p bomber_headless -- batch --count 500 --seed 1 --output results/
//!
//! # Verify a seed reproduces the same hash across runs
//! cargo run -p bomber_headless -- verify --seed 12345 --runs 5
//!
//! # Re-simulate a recorded match and check its hash
//! cargo run -p bomber_headless -- replay --file match.replay
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bomber_core::config::GameConfig;
use bomber_core::decision::Decider;
use bomber_core::replay::Replay;

use bomber_headless::ascii;
use bomber_headless::batch::{run_batch, BatchConfig};
use bomber_headless::match_runner::MatchRunner;
use bomber_headless::strategies::{RandomDecider, ScriptedDecider, StayDecider};

#[derive(Parser)]
#[command(name = "bomber_headless")]
#[command(about = "Headless bomber arena runner for controller testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single match
    Run {
        /// World seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Round cap
        #[arg(long, default_value = "100")]
        rounds: u32,

        /// Scripted move list (RON); unscripted slots stay put
        #[arg(long)]
        script: Option<PathBuf>,

        /// Record the match to this replay file
        #[arg(long)]
        record: Option<PathBuf>,

        /// Print the final board as ASCII
        #[arg(long)]
        render: bool,
    },

    /// Run a parallel seed sweep
    Batch {
        /// Number of matches
        #[arg(short, long, default_value = "100")]
        count: u64,

        /// Starting seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Round cap per match
        #[arg(long, default_value = "200")]
        rounds: u32,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Verify determinism by running the same seed multiple times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,

        /// Round cap per run
        #[arg(long, default_value = "50")]
        rounds: u32,
    },

    /// Re-simulate a recorded match
    Replay {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,

        /// Print the final board as ASCII
        #[arg(long)]
        render: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for results.
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let result = match cli.command {
        Commands::Run {
            seed,
            rounds,
            script,
            record,
            render,
        } => cmd_run(seed, rounds, script, record, render),
        Commands::Batch {
            count,
            seed,
            rounds,
            output,
        } => cmd_batch(count, seed, rounds, output),
        Commands::Verify { seed, runs, rounds } => cmd_verify(seed, runs, rounds),
        Commands::Replay { file, render } => cmd_replay(&file, render),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn controllers_for(seed: u64, count: u8, script: Option<ScriptedDecider>) -> Vec<Box<dyn Decider>> {
    match script {
        Some(script) => {
            // The script drives slot 1; the rest idle.
            let mut controllers: Vec<Box<dyn Decider>> = vec![Box::new(script)];
            controllers
                .extend((1..count).map(|_| Box::new(StayDecider) as Box<dyn Decider>));
            controllers
        }
        None => (0..u64::from(count))
            .map(|i| Box::new(RandomDecider::new(seed ^ i)) as Box<dyn Decider>)
            .collect(),
    }
}

fn cmd_run(
    seed: u64,
    rounds: u32,
    script: Option<PathBuf>,
    record: Option<PathBuf>,
    render: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::default().with_seed(seed).with_max_rounds(rounds);
    let script = script.map(ScriptedDecider::load).transpose()?;
    let controllers = controllers_for(seed, config.agent_count, script);

    let mut runner = MatchRunner::new(config, controllers);
    if record.is_some() {
        runner = runner.with_recording();
    }
    let outcome = runner.run()?;

    if let (Some(path), Some(replay)) = (record, runner.take_replay()) {
        replay.save(&path)?;
        tracing::info!(path = %path.display(), moves = replay.move_count(), "replay saved");
    }
    if render {
        print!("{}", ascii::render(&runner.arena().snapshot()));
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn cmd_batch(
    count: u64,
    seed: u64,
    rounds: u32,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BatchConfig {
        game: GameConfig::default().with_max_rounds(rounds),
        match_count: count,
        seed_start: seed,
        output_dir: output.clone(),
    };
    let results = run_batch(&config);
    let path = output.join("batch.json");
    results.save(&path)?;
    println!("{}", serde_json::to_string_pretty(&results.summary)?);
    tracing::info!(path = %path.display(), "batch results saved");
    Ok(())
}

fn cmd_verify(seed: u64, runs: u32, rounds: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut hashes = Vec::with_capacity(runs as usize);
    for _ in 0..runs {
        let config = GameConfig::default().with_seed(seed).with_max_rounds(rounds);
        let controllers = controllers_for(seed, config.agent_count, None);
        let mut runner = MatchRunner::new(config, controllers);
        runner.run()?;
        hashes.push(runner.arena().state_hash());
    }
    let deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    println!(
        "{}",
        serde_json::json!({
            "seed": seed,
            "runs": runs,
            "deterministic": deterministic,
            "hashes": hashes,
        })
    );
    if deterministic {
        Ok(())
    } else {
        Err("determinism verification failed".into())
    }
}

fn cmd_replay(file: &Path, render: bool) -> Result<(), Box<dyn std::error::Error>> {
    let replay = Replay::load(file)?;
    let arena = replay.replay()?;
    tracing::info!(
        rounds = arena.round_count(),
        moves = replay.move_count(),
        "replay verified"
    );
    if render {
        print!("{}", ascii::render(&arena.snapshot()));
    }
    println!(
        "{}",
        serde_json::json!({
            "rounds": arena.round_count(),
            "final_hash": arena.state_hash(),
            "verified": true,
        })
    );
    Ok(())
}
