mod config;
mod render;
mod stats;

use clap::{Parser, Subcommand};
use config::{load_config, ConfigError, RollerConfig};
use dnotation_roll::{parse, parse_and_evaluate, systems, BaseRoller, RollError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "roll", version, about = "Dice notation and threshold pool roller")]
struct Cli {
    /// TOML file with a [roller] section
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible rolls, overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a dice notation expression, e.g. `5d10 + 2 * (2d12 - 3d4)`
    Eval {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Six-sided pool with hits on 5+, exploding sixes and glitches
    D6 {
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Ten-sided pool; prefix with 8again, 9again or chance
    D10 {
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Roll an expression repeatedly and store the result histogram as .npy
    Stats {
        expression: String,
        #[arg(long, default_value_t = 10_000)]
        samples: u32,
        #[arg(long, default_value = "rolls.npy")]
        out: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Roll(#[from] RollError),
    #[error(transparent)]
    Histogram(#[from] stats::HistogramError),
    #[error("unable to encode json: {0}")]
    Json(#[from] serde_json::Error),
}

fn build_roller(config: &RollerConfig, seed: Option<u64>) -> BaseRoller {
    let roller = match seed.or(config.seed) {
        Some(seed) => {
            log::info!("using seeded roller ({})", seed);
            BaseRoller::seeded(seed)
        }
        None => BaseRoller::from_entropy(),
    };
    roller.with_max_dice(config.max_dice)
}

fn output<T: Serialize>(json: bool, value: &T, text: String) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RollerConfig::default(),
    };
    let roller = build_roller(&config, cli.seed);
    match cli.command {
        Command::Eval { expression } => {
            let result = parse_and_evaluate(&roller, &expression.join(" "))?;
            output(cli.json, &result, render::expression(&result))
        }
        Command::D6 { expression } => {
            let rolled = systems::d6::roll_pool_expression(&roller, &expression.join(" "))?;
            output(cli.json, &rolled, render::d6_pool(&rolled))
        }
        Command::D10 { tokens } => {
            let rolled = systems::d10::roll_pool(&roller, tokens.as_slice())?;
            output(cli.json, &rolled, render::d10_pool(&rolled))
        }
        Command::Stats {
            expression,
            samples,
            out,
        } => {
            let parsed = parse(&expression).map_err(RollError::from)?;
            let histogram =
                stats::Histogram::sample(&roller, &parsed, samples).map_err(RollError::from)?;
            histogram.write_npy(&out)?;
            log::info!("wrote {} samples of {} to {}", samples, parsed, out.display());
            Ok(())
        }
    }
}

fn main() {
    pretty_env_logger::init();
    log::info!("logger created");
    if let Err(err) = run(Cli::parse()) {
        log::warn!("roll failed: {:?}", err);
        eprintln!("Sorry, I couldn't do that: {}", err);
        std::process::exit(1);
    }
}
