//! Study pipeline.
//!
//! Load → reconcile → factor table → portfolios → inference. Every stage is
//! public so callers can stop early (the CLI's `universe` and `factors`
//! commands do).

use polars::prelude::DataFrame;
use sintra_data::{FundamentalsCoverage, FundamentalsTable, PriceTable, ReconciledData, Reconciler, read_csv};
use sintra_eval::{DistributionStats, InferenceEngine, build_portfolios, compare_spreads, shapiro_wilk};
use sintra_factors::{FactorTable, FactorTableBuilder, MomentumFactor, ValueFactor};
use sintra_traits::{Factor, Result};
use tracing::info;

use crate::config::StudyConfig;
use crate::report::{FactorReport, StudyReport};

/// One configured momentum/value study.
#[derive(Debug, Clone)]
pub struct Study {
    config: StudyConfig,
}

impl Study {
    /// Study with the given configuration.
    #[must_use]
    pub const fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Run the full study from the configured files.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, unreadable or malformed input files,
    /// an empty common universe or an empty factor table.
    pub fn run(&self) -> Result<StudyReport> {
        self.config.validate()?;
        let (prices, fundamentals) = self.load()?;
        self.analyze(&prices, &fundamentals)
    }

    /// Run the full study from in-memory frames.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`], minus file access.
    pub fn from_frames(&self, prices: &DataFrame, fundamentals: &DataFrame) -> Result<StudyReport> {
        self.config.validate()?;
        let prices = PriceTable::from_frame(prices, &self.config.price_schema)?;
        let fundamentals = FundamentalsTable::from_frame(fundamentals, &self.config.fundamentals_schema)?;
        self.analyze(&prices, &fundamentals)
    }

    /// Parse both configured files.
    ///
    /// # Errors
    ///
    /// Fails when a path is not configured, a file cannot be read, or a
    /// required column is missing.
    pub fn load(&self) -> Result<(PriceTable, FundamentalsTable)> {
        let prices_path = self.config.prices_path()?;
        let fundamentals_path = self.config.fundamentals_path()?;
        info!(prices = %prices_path.display(), fundamentals = %fundamentals_path.display(), "Loading inputs");

        let prices = PriceTable::from_csv(prices_path, &self.config.price_schema)?;
        let fundamentals = FundamentalsTable::from_csv(fundamentals_path, &self.config.fundamentals_schema)?;
        Ok((prices, fundamentals))
    }

    /// Coverage report of the configured fundamentals file.
    ///
    /// # Errors
    ///
    /// Fails when the path is not configured, the file cannot be read or the
    /// ticker or P/E column is missing.
    pub fn fundamentals_coverage(&self) -> Result<FundamentalsCoverage> {
        let frame = read_csv(self.config.fundamentals_path()?)?;
        FundamentalsCoverage::analyze(&frame, &self.config.fundamentals_schema)
    }

    /// Restrict to the study years and the common universe.
    ///
    /// # Errors
    ///
    /// Propagates [`Reconciler::reconcile`] errors.
    pub fn reconcile(&self, prices: &PriceTable, fundamentals: &FundamentalsTable) -> Result<ReconciledData> {
        Reconciler::new(self.config.years())
            .with_duplicate_policy(self.config.duplicate_policy)
            .reconcile(prices, fundamentals)
    }

    /// Join momentum, P/E and outcome.
    ///
    /// # Errors
    ///
    /// Propagates [`FactorTableBuilder::build`] errors.
    pub fn factor_table(&self, data: &ReconciledData) -> Result<FactorTable> {
        FactorTableBuilder::new(self.config.formation_year, self.config.outcome_year)
            .with_min_points(self.config.min_price_points)
            .build(&data.prices, &data.fundamentals)
    }

    /// The momentum factor of this study.
    pub fn momentum_factor(&self) -> MomentumFactor {
        MomentumFactor::new(self.config.formation_year, self.config.outcome_year)
    }

    /// The value factor of this study.
    #[must_use]
    pub const fn value_factor(&self) -> ValueFactor {
        ValueFactor::new(self.config.outcome_year)
    }

    fn analyze(&self, prices: &PriceTable, fundamentals: &FundamentalsTable) -> Result<StudyReport> {
        let data = self.reconcile(prices, fundamentals)?;
        let table = self.factor_table(&data)?;

        let engine = InferenceEngine::new(self.config.inference());
        let momentum = self.factor_report(&engine, &table, &self.momentum_factor())?;
        let value = self.factor_report(&engine, &table, &self.value_factor())?;
        let comparison = compare_spreads(&momentum.test, &value.test);

        let outcomes = table.outcome_values();
        let outcome_distribution = DistributionStats::from_values(&outcomes);
        let normality = shapiro_wilk(&outcomes)?;

        info!(
            stocks = table.len(),
            stronger = %comparison.stronger,
            "Study complete"
        );

        Ok(StudyReport {
            formation_year: self.config.formation_year,
            outcome_year: self.config.outcome_year,
            buckets: self.config.buckets,
            reconciliation: data.diagnostics,
            legs: table.legs().clone(),
            summary: table.summary(),
            correlations: table.correlations(),
            rows: table.rows().to_vec(),
            momentum,
            value,
            comparison,
            outcome_distribution,
            normality,
        })
    }

    fn factor_report(
        &self,
        engine: &InferenceEngine,
        table: &FactorTable,
        factor: &dyn Factor,
    ) -> Result<FactorReport> {
        let portfolios = build_portfolios(table.rows(), factor, self.config.buckets)?;
        let test = engine.test_factor(table.rows(), factor, &portfolios)?;
        Ok(FactorReport { portfolios, test })
    }
}
