//! CLI subcommand modules.
//!
//! This module contains the implementations for all sintra CLI subcommands
//! and the configuration layering they share.

pub(crate) mod factors;
pub(crate) mod fundamentals;
pub(crate) mod run;
pub(crate) mod universe;

use anyhow::{Context, Result};
use serde::Serialize;
use sintra::StudyConfig;
use tracing::debug;

use crate::{OutputFormat, StudyArgs};

/// Defaults, then the config file, then the environment, then the flags.
pub(crate) fn load_config(args: &StudyArgs) -> Result<StudyConfig> {
    let config = match &args.config {
        Some(path) => StudyConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => StudyConfig::default(),
    };
    let mut config = config.with_env();

    if let Some(prices) = &args.prices {
        config.prices_path = Some(prices.clone());
    }
    if let Some(fundamentals) = &args.fundamentals {
        config.fundamentals_path = Some(fundamentals.clone());
    }
    if let Some(year) = args.formation_year {
        config.formation_year = year;
    }
    if let Some(year) = args.outcome_year {
        config.outcome_year = year;
    }
    if let Some(buckets) = args.buckets {
        config.buckets = buckets;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate()?;
    debug!(
        prices = ?config.prices_path,
        fundamentals = ?config.fundamentals_path,
        formation_year = config.formation_year,
        outcome_year = config.outcome_year,
        buckets = config.buckets,
        seed = config.seed,
        "resolved study configuration"
    );
    Ok(config)
}

/// Print `value` as JSON when requested. Returns whether it did.
pub(crate) fn emit_json<T: Serialize>(format: OutputFormat, value: &T) -> Result<bool> {
    if format != OutputFormat::Json {
        return Ok(false);
    }
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(true)
}

pub(crate) fn print_banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

pub(crate) fn print_section(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

/// Fixed-precision number, `N/A` when absent.
pub(crate) fn fmt_opt(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v),
        None => format!("{:>width$}", "N/A"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args() -> StudyArgs {
        StudyArgs {
            config: None,
            prices: Some(PathBuf::from("prices.csv")),
            fundamentals: Some(PathBuf::from("fundamentals.csv")),
            formation_year: Some(2022),
            outcome_year: Some(2023),
            buckets: Some(3),
            seed: Some(7),
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = load_config(&args()).unwrap();
        assert_eq!(config.prices_path, Some(PathBuf::from("prices.csv")));
        assert_eq!(config.fundamentals_path, Some(PathBuf::from("fundamentals.csv")));
        assert_eq!(config.years(), [2022, 2023]);
        assert_eq!(config.buckets, 3);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let args = StudyArgs {
            formation_year: Some(2024),
            outcome_year: Some(2024),
            ..args()
        };
        assert!(load_config(&args).is_err());
    }
}
