//! apportion CLI: seat apportionment and coalition distortion sampling.
//!
//! Modes:
//!   --mode=single                 Apportion with every method, estimate alpha once each (default)
//!   --mode=sweep                  Threshold sweep: thresholds x repetitions x methods
//!
//! Options:
//!   --input=<file>                CSV of id,population rows (default: data/state_populations.csv)
//!   --config=<file.json>          Experiment configuration; flags below override it
//!   --seats=<N>                   Seats to apportion (default: 435)
//!   --samples=<N>                 Subsets drawn per estimate (default: 100000000)
//!   --seed=<N>                    Base RNG seed (default: from config, else clock)
//!   --threads=<N>                 Rayon worker threads (default: all cores)
//!   --threshold=<P>               Inclusion probability for single mode (default: uniform)
//!   --methods=<a,b,...>           Restrict to these methods
//!   --json                        Print results as JSON instead of text
//!
//! Logging is controlled with RUST_LOG (e.g. RUST_LOG=info).

use std::fs;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use apportionment_core_rs::experiment::{run_single, Experiment, ExperimentConfig, SingleRun};
use apportionment_core_rs::loader::load_or_empty;
use apportionment_core_rs::report;
use apportionment_core_rs::{InclusionMode, Method, SamplerConfig};

const DEFAULT_INPUT: &str = "data/state_populations.csv";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Single,
    Sweep,
}

/// CLI configuration parsed from command-line arguments.
struct CliConfig {
    mode: Mode,
    input: String,
    config_file: Option<String>,
    seats: Option<u64>,
    samples: Option<u64>,
    seed: Option<u64>,
    threads: Option<usize>,
    threshold: Option<f64>,
    methods: Option<Vec<Method>>,
    json: bool,
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("--{}=", name);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
}

fn parse_flag<T>(args: &[String], name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    flag_value(args, name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid --{}={}: {}", name, raw, e))
        })
        .transpose()
}

fn parse_args(args: &[String]) -> Result<CliConfig> {
    let mode = match flag_value(args, "mode") {
        None | Some("single") => Mode::Single,
        Some("sweep") => Mode::Sweep,
        Some(other) => bail!("unknown --mode={} (expected single or sweep)", other),
    };

    let methods = flag_value(args, "methods")
        .map(|list| {
            list.split(',')
                .map(|name| name.trim().parse::<Method>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    Ok(CliConfig {
        mode,
        input: flag_value(args, "input").unwrap_or(DEFAULT_INPUT).to_string(),
        config_file: flag_value(args, "config").map(str::to_string),
        seats: parse_flag(args, "seats")?,
        samples: parse_flag(args, "samples")?,
        seed: parse_flag(args, "seed")?,
        threads: parse_flag(args, "threads")?,
        threshold: parse_flag(args, "threshold")?,
        methods,
        json: args.iter().any(|a| a == "--json"),
    })
}

/// Start from the config file (or defaults) and apply flag overrides.
fn build_config(cli: &CliConfig) -> Result<ExperimentConfig> {
    let mut config = match &cli.config_file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str::<ExperimentConfig>(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => ExperimentConfig::default(),
    };

    if let Some(seats) = cli.seats {
        config.total_seats = seats;
    }
    if let Some(samples) = cli.samples {
        config.sampler.num_samples = samples;
    }
    if let Some(methods) = &cli.methods {
        config.methods = methods.clone();
    }
    match cli.seed {
        Some(seed) => config.sampler.seed = seed,
        None if cli.config_file.is_none() => {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1);
            config.sampler.seed = nanos;
            info!("no --seed given, using {}", nanos);
        }
        None => {}
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run_single_mode(cli: &CliConfig, config: &ExperimentConfig) -> Result<()> {
    let mut table = load_or_empty(&cli.input);
    if table.is_empty() {
        bail!("no entities loaded from {}", cli.input);
    }
    let total_population = table
        .total_population()
        .context("total population does not fit in 64 bits")?;
    info!(
        "loaded {} entities, total population {}",
        table.len(),
        total_population
    );

    if let Some(p) = cli.threshold {
        if !(0.0..=1.0).contains(&p) {
            bail!("--threshold={} is outside [0, 1]", p);
        }
    }
    let sampler = SamplerConfig {
        mode: cli
            .threshold
            .map_or(InclusionMode::Uniform, |probability| InclusionMode::Threshold { probability }),
        ..config.sampler.clone()
    };

    let mut runs: Vec<SingleRun> = Vec::new();
    for &method in &config.methods {
        match run_single(&mut table, method, config.total_seats, &sampler) {
            Ok(run) => {
                if !cli.json {
                    print!("{}", report::apportionment_listing(method.name(), &table));
                    print!("{}", report::estimate_summary(&run.estimate));
                }
                runs.push(run);
            }
            Err(e) => warn!("{} failed: {}", method, e),
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else if !runs.is_empty() {
        println!("\nMethod comparison");
        print!("{}", report::seat_comparison(&runs));
    }

    if runs.is_empty() {
        bail!("every method failed");
    }
    Ok(())
}

fn run_sweep_mode(cli: &CliConfig, config: ExperimentConfig) -> Result<()> {
    let mut table = load_or_empty(&cli.input);
    if table.is_empty() {
        bail!("no entities loaded from {}", cli.input);
    }

    let experiment = Experiment::new(config)?;
    let results = experiment
        .run(&mut table)
        .context("Threshold sweep failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", report::alpha_series(&results));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = build_config(&cli)?;
    info!(
        "{} seats, {} samples per estimate, {} method(s)",
        config.total_seats,
        config.sampler.num_samples,
        config.methods.len()
    );

    match cli.mode {
        Mode::Single => run_single_mode(&cli, &config),
        Mode::Sweep => run_sweep_mode(&cli, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_default_input_is_bundled_census() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.mode, Mode::Single);
        assert_eq!(cli.input, DEFAULT_INPUT);

        let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        assert!(workspace_root.join(&cli.input).is_file());
    }

    #[test]
    fn test_flag_overrides() {
        let cli = parse_args(&args(&[
            "--mode=sweep",
            "--input=other.csv",
            "--seats=10",
            "--methods=hamilton,adams",
            "--json",
        ]))
        .unwrap();

        assert_eq!(cli.mode, Mode::Sweep);
        assert_eq!(cli.input, "other.csv");
        assert_eq!(cli.seats, Some(10));
        assert_eq!(cli.methods, Some(vec![Method::Hamilton, Method::Adams]));
        assert!(cli.json);
    }

    #[test]
    fn test_bad_flags_rejected() {
        assert!(parse_args(&args(&["--mode=batch"])).is_err());
        assert!(parse_args(&args(&["--seats=many"])).is_err());
        assert!(parse_args(&args(&["--methods=borda"])).is_err());
    }
}
