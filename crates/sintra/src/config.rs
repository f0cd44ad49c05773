//! Study configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! the environment (`SINTRA_PRICES`, `SINTRA_FUNDAMENTALS`, also read from a
//! `.env` file), then whatever the caller overrides last.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sintra_data::{DuplicatePolicy, FundamentalsSchema, PriceSchema};
use sintra_eval::InferenceConfig;
use sintra_traits::{Result, StudyError};

/// Environment variable holding the price file path.
pub const PRICES_ENV: &str = "SINTRA_PRICES";

/// Environment variable holding the fundamentals file path.
pub const FUNDAMENTALS_ENV: &str = "SINTRA_FUNDAMENTALS";

/// Settings of one study run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Daily price history CSV
    pub prices_path: Option<PathBuf>,
    /// Fundamentals snapshot CSV
    pub fundamentals_path: Option<PathBuf>,
    /// Year momentum is measured over (default: 2023)
    pub formation_year: i32,
    /// Year returns are explained over (default: 2024)
    pub outcome_year: i32,
    /// Quantile buckets per factor (default: 5)
    pub buckets: usize,
    /// Price observations required per year (default: 1)
    pub min_price_points: usize,
    /// Handling of tickers with several fundamentals rows
    pub duplicate_policy: DuplicatePolicy,
    /// Bootstrap resamples of each spread; zero disables (default: 1000)
    pub bootstrap_resamples: usize,
    /// Bootstrap seed (default: 42)
    pub seed: u64,
    /// Column aliases of the price file
    pub price_schema: PriceSchema,
    /// Column aliases of the fundamentals file
    pub fundamentals_schema: FundamentalsSchema,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            prices_path: None,
            fundamentals_path: None,
            formation_year: 2023,
            outcome_year: 2024,
            buckets: 5,
            min_price_points: 1,
            duplicate_policy: DuplicatePolicy::Drop,
            bootstrap_resamples: 1000,
            seed: 42,
            price_schema: PriceSchema::default(),
            fundamentals_schema: FundamentalsSchema::default(),
        }
    }
}

impl StudyConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Config`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| StudyError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| StudyError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Overlay paths from the process environment and a `.env` file.
    #[must_use]
    pub fn with_env(self) -> Self {
        let _ = dotenvy::dotenv();
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay paths from `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        if let Some(prices) = path(PRICES_ENV) {
            self.prices_path = Some(prices);
        }
        if let Some(fundamentals) = path(FUNDAMENTALS_ENV) {
            self.fundamentals_path = Some(fundamentals);
        }
        self
    }

    /// Reject settings no study can run with.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Config`] for zero buckets, a formation year not
    /// before the outcome year, or a zero observation minimum.
    pub fn validate(&self) -> Result<()> {
        if self.buckets == 0 {
            return Err(StudyError::Config("buckets must be at least 1".to_string()));
        }
        if self.formation_year >= self.outcome_year {
            return Err(StudyError::Config(format!(
                "formation year {} must precede outcome year {}",
                self.formation_year, self.outcome_year
            )));
        }
        if self.min_price_points == 0 {
            return Err(StudyError::Config(
                "min_price_points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Calendar years the price window keeps.
    #[must_use]
    pub const fn years(&self) -> [i32; 2] {
        [self.formation_year, self.outcome_year]
    }

    /// Inference settings derived from this configuration.
    #[must_use]
    pub const fn inference(&self) -> InferenceConfig {
        InferenceConfig {
            bootstrap_resamples: self.bootstrap_resamples,
            seed: self.seed,
        }
    }

    /// Price file path.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Config`] when no path is configured.
    pub fn prices_path(&self) -> Result<&Path> {
        self.prices_path.as_deref().ok_or_else(|| {
            StudyError::Config(format!("price file not set (use --prices or {PRICES_ENV})"))
        })
    }

    /// Fundamentals file path.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Config`] when no path is configured.
    pub fn fundamentals_path(&self) -> Result<&Path> {
        self.fundamentals_path.as_deref().ok_or_else(|| {
            StudyError::Config(format!(
                "fundamentals file not set (use --fundamentals or {FUNDAMENTALS_ENV})"
            ))
        })
    }
}
