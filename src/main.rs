//! Envoy command line.
//!
//! Plans one phase for one power (or every power) and prints the orders as
//! DSON, one line per power.
//!
//! Usage:
//!   envoy --dfen <DFEN> [OPTIONS]
//!
//! Options:
//!   --dfen DFEN       Board snapshot (required)
//!   --power NAME      Power to plan for, or `all` (default: all)
//!   --seed N          Random seed (default: 0)
//!   --config FILE     JSON planner configuration
//!   --commit ORDER    Committed DSON order, repeatable
//!   --dmz PROV        Demilitarized province, repeatable
//!
//! Logging goes to stderr and is controlled by RUST_LOG.

use std::env;
use std::path::PathBuf;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use envoy::board::{Power, Province};
use envoy::protocol::{format_orders, parse_dfen, parse_order, DfenError, DsonError};
use envoy::{Commitments, ConfigError, PlanError, Planner, PlannerConfig};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid DFEN: {0}")]
    Dfen(#[from] DfenError),

    #[error("invalid committed order: {0}")]
    Dson(#[from] DsonError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

#[derive(Debug, Default)]
struct Args {
    dfen: Option<String>,
    power: Option<Power>,
    seed: u64,
    config: Option<PathBuf>,
    commits: Vec<String>,
    dmz: Vec<Province>,
}

fn usage() -> &'static str {
    "usage: envoy --dfen <DFEN> [--power <name|all>] [--seed N] [--config FILE] [--commit ORDER]... [--dmz PROV]..."
}

fn parse_args(raw: &[String]) -> Result<Option<Args>, CliError> {
    let mut args = Args::default();
    let mut iter = raw.iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| CliError::Usage(format!("{name} needs a value")))
        };
        match flag.as_str() {
            "--dfen" => args.dfen = Some(value("--dfen")?),
            "--power" => {
                let name = value("--power")?.to_lowercase();
                args.power = match name.as_str() {
                    "all" => None,
                    _ => Some(
                        Power::from_name(&name)
                            .ok_or_else(|| CliError::Usage(format!("unknown power '{name}'")))?,
                    ),
                };
            }
            "--seed" => {
                let raw = value("--seed")?;
                args.seed = raw
                    .parse()
                    .map_err(|_| CliError::Usage(format!("invalid --seed value '{raw}'")))?;
            }
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--commit" => args.commits.push(value("--commit")?),
            "--dmz" => {
                let abbr = value("--dmz")?.to_lowercase();
                let prov = Province::from_abbr(&abbr)
                    .ok_or_else(|| CliError::Usage(format!("unknown province '{abbr}'")))?;
                args.dmz.push(prov);
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(CliError::Usage(format!("unknown argument '{other}'"))),
        }
    }
    Ok(Some(args))
}

fn run(args: Args) -> Result<(), CliError> {
    let dfen = args
        .dfen
        .ok_or_else(|| CliError::Usage("--dfen is required".to_string()))?;
    let state = parse_dfen(&dfen)?;
    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    let mut commitments = Commitments::new();
    for text in &args.commits {
        commitments.commit(parse_order(text)?);
    }
    for prov in args.dmz {
        commitments.demilitarize(prov);
    }
    let planner = Planner::new(config).with_commitments(commitments);

    info!(
        year = state.year,
        season = ?state.season,
        phase = ?state.phase,
        seed = args.seed,
        "planning snapshot"
    );

    let plans = match args.power {
        Some(power) => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            vec![(power, planner.plan(power, &state, &mut rng)?)]
        }
        None => planner.plan_all(&state, args.seed)?,
    };

    for (power, orders) in plans {
        println!("{power}: {}", format_orders(&orders));
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = env::args().collect();
    let result = parse_args(&raw).and_then(|args| match args {
        Some(args) => run(args),
        None => {
            println!("{}", usage());
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        if matches!(e, CliError::Usage(_)) {
            eprintln!("{}", usage());
        }
        process::exit(1);
    }
}
