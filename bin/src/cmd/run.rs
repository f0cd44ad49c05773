//! Run command implementation.

use anyhow::Result;
use sintra::eval::{DistributionStats, NormalityTest, Portfolio, TestOutcome};
use sintra::{FactorReport, Study, StudyReport};

use crate::{OutputFormat, StudyArgs};
use crate::cmd::factors::{print_correlations, print_legs, print_summary};
use crate::cmd::universe::print_diagnostics;
use crate::cmd::{fmt_opt, load_config, print_banner, print_section};

/// Run the full study and print the report.
pub(crate) fn run_study(args: &StudyArgs) -> Result<()> {
    let study = Study::new(load_config(args)?);
    let report = study.run()?;

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &StudyReport) {
    print_banner("Momentum vs Value Factor Study");
    println!(
        "Formation year: {}   Outcome year: {}   Buckets: {}",
        report.formation_year, report.outcome_year, report.buckets
    );
    println!();

    print_diagnostics(&report.reconciliation);
    print_legs(&report.legs, report.formation_year, report.outcome_year);
    print_summary(&report.summary);
    print_correlations(&report.correlations);

    print_factor("MOMENTUM", &report.momentum);
    print_factor("VALUE (P/E)", &report.value);

    print_distribution(&report.outcome_distribution, &report.normality, report.outcome_year);

    print_section("COMPARISON");
    println!(
        "  {:<16} spread {:>8.4}",
        report.comparison.stronger, report.comparison.stronger_spread
    );
    println!(
        "  {:<16} spread {:>8.4}",
        report.comparison.weaker, report.comparison.weaker_spread
    );
    println!();
    println!(
        "  Larger spread: {} (descriptive, not a significance test)",
        report.comparison.stronger
    );
    println!();
}

fn print_factor(title: &str, factor: &FactorReport) {
    let test = &factor.test;
    print_section(&format!("{} ({})", title, test.factor));

    if factor.portfolios.len() < factor.portfolios.requested {
        println!(
            "  {} of {} buckets realized (tied factor values)",
            factor.portfolios.len(),
            factor.portfolios.requested
        );
        println!();
    }

    println!(
        "  {:<12} {:>6} {:>12} {:>12} {:>10} {:>10} {:>10}",
        "bucket", "count", "from", "to", "mean", "std", "se"
    );
    for portfolio in &factor.portfolios.portfolios {
        print_portfolio(portfolio);
    }
    println!();

    println!("  H0: {}", test.null_hypothesis);
    println!("  H1: {}", test.alternative_hypothesis);
    println!();
    println!(
        "  {} mean:       {:>8.4}",
        pad(&test.favoured_label),
        test.favoured_mean
    );
    println!(
        "  {} mean:       {:>8.4}",
        pad(&test.disfavoured_label),
        test.disfavoured_mean
    );
    println!("  Spread:                  {:>8.4}", test.spread);

    match &test.welch.outcome {
        TestOutcome::Computed {
            statistic,
            df,
            p_one_sided,
            p_two_sided,
        } => {
            println!("  t-statistic:             {:>8.4}", statistic);
            println!("  Degrees of freedom:      {:>8.2}", df);
            println!("  p-value (one-sided):     {:>8.4}", p_one_sided);
            println!("  p-value (two-sided):     {:>8.4}", p_two_sided);
        }
        TestOutcome::Skipped { reason } => {
            println!("  t-test skipped:          {}", reason);
        }
    }
    println!("  Rank IC:                 {}", fmt_opt(test.rank_ic, 8, 4));
    if let Some(interval) = &test.bootstrap {
        println!(
            "  Spread {:.0}% CI:           [{:.4}, {:.4}] ({} resamples)",
            interval.confidence * 100.0,
            interval.lower,
            interval.upper,
            interval.resamples
        );
    }
    println!();
    println!("  {}", test.conclusion());
    println!();
}

fn print_portfolio(portfolio: &Portfolio) {
    println!(
        "  {:<12} {:>6} {:>12.4} {:>12.4} {:>10.4} {} {}",
        portfolio.label,
        portfolio.count,
        portfolio.lower,
        portfolio.upper,
        portfolio.mean,
        fmt_opt(portfolio.std, 10, 4),
        fmt_opt(portfolio.std_error, 10, 4),
    );
}

fn print_distribution(stats: &DistributionStats, normality: &NormalityTest, year: i32) {
    print_section(&format!("RETURN DISTRIBUTION ({})", year));
    println!("  Observations:            {:>8}", stats.count);
    println!("  Mean:                    {}", fmt_opt(stats.mean, 8, 4));
    println!("  Variance:                {}", fmt_opt(stats.variance, 8, 4));
    println!("  Std deviation:           {}", fmt_opt(stats.std, 8, 4));
    println!("  Skewness:                {}", fmt_opt(stats.skewness, 8, 4));
    println!("  Excess kurtosis:         {}", fmt_opt(stats.excess_kurtosis, 8, 4));
    match normality {
        NormalityTest::ShapiroWilk { statistic, p_value } => {
            println!("  Shapiro-Wilk W:          {:>8.4}", statistic);
            println!("  Shapiro-Wilk p-value:    {:>8.4}", p_value);
        }
        NormalityTest::Skipped { reason } => {
            println!("  Shapiro-Wilk skipped:    {}", reason);
        }
    }
    println!();
}

fn pad(label: &str) -> String {
    format!("{:<10}", label)
}
