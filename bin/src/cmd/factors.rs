//! Factors command implementation.

use anyhow::Result;
use serde::Serialize;
use sintra::Study;
use sintra::factors::{CorrelationMatrix, FactorSummary, LegSizes};
use sintra::traits::FactorRow;
use sintra::traits::stats::ColumnSummary;

use crate::StudyArgs;
use crate::cmd::{emit_json, fmt_opt, load_config, print_banner, print_section};

#[derive(Serialize)]
struct FactorsOutput<'a> {
    legs: &'a LegSizes,
    summary: FactorSummary,
    correlations: CorrelationMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<&'a [FactorRow]>,
}

/// Build the factor table and show its summary.
pub(crate) fn show_factors(args: &StudyArgs, show_rows: bool) -> Result<()> {
    let study = Study::new(load_config(args)?);
    let (prices, fundamentals) = study.load()?;
    let data = study.reconcile(&prices, &fundamentals)?;
    let table = study.factor_table(&data)?;

    let output = FactorsOutput {
        legs: table.legs(),
        summary: table.summary(),
        correlations: table.correlations(),
        rows: show_rows.then(|| table.rows()),
    };
    if emit_json(args.format, &output)? {
        return Ok(());
    }

    print_banner("Factor Table");
    println!(
        "Momentum year: {}   Outcome year: {}   Stocks: {}",
        table.formation_year(),
        table.outcome_year(),
        table.len()
    );
    println!();

    print_legs(output.legs, table.formation_year(), table.outcome_year());
    print_summary(&output.summary);
    print_correlations(&output.correlations);

    if let Some(rows) = output.rows {
        print_rows(rows);
    }
    Ok(())
}

pub(crate) fn print_legs(legs: &LegSizes, formation_year: i32, outcome_year: i32) {
    print_section("FACTOR LEGS");
    println!(
        "  Momentum ({}):       {:>6} tickers ({} excluded)",
        formation_year, legs.momentum, legs.momentum_excluded
    );
    println!("  Valid P/E:             {:>6} tickers", legs.value);
    println!(
        "  Return ({}):         {:>6} tickers ({} excluded)",
        outcome_year, legs.outcome, legs.outcome_excluded
    );
    println!();
}

pub(crate) fn print_summary(summary: &FactorSummary) {
    print_section("SUMMARY STATISTICS");
    println!(
        "  {:<10} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for (name, column) in [
        ("momentum", &summary.momentum),
        ("pe", &summary.pe),
        ("outcome", &summary.outcome),
    ] {
        print_column(name, column);
    }
    println!();
}

fn print_column(name: &str, column: &ColumnSummary) {
    println!(
        "  {:<10} {:>6} {} {} {} {} {} {} {}",
        name,
        column.count,
        fmt_opt(column.mean, 9, 4),
        fmt_opt(column.std, 9, 4),
        fmt_opt(column.min, 9, 4),
        fmt_opt(column.q25, 9, 4),
        fmt_opt(column.median, 9, 4),
        fmt_opt(column.q75, 9, 4),
        fmt_opt(column.max, 9, 4),
    );
}

pub(crate) fn print_correlations(correlations: &CorrelationMatrix) {
    print_section("CORRELATIONS");
    print!("  {:<10}", "");
    for name in &correlations.columns {
        print!(" {:>9}", name);
    }
    println!();
    for (name, row) in correlations.columns.iter().zip(&correlations.values) {
        print!("  {:<10}", name);
        for value in row {
            print!(" {}", fmt_opt(*value, 9, 4));
        }
        println!();
    }
    println!();
}

fn print_rows(rows: &[FactorRow]) {
    print_section("ROWS");
    println!("  {:<14} {:>10} {:>10} {:>10}", "ticker", "momentum", "pe", "outcome");
    for row in rows {
        println!(
            "  {:<14} {:>10.4} {:>10.2} {:>10.4}",
            row.ticker, row.momentum, row.pe, row.outcome
        );
    }
    println!();
}
