//! Universe command implementation.

use anyhow::Result;
use sintra::Study;
use sintra::data::ReconcileDiagnostics;

use crate::StudyArgs;
use crate::cmd::{emit_json, load_config, print_banner, print_section};

/// Load both files, reconcile them and show the resulting universe.
pub(crate) fn show_universe(args: &StudyArgs) -> Result<()> {
    let study = Study::new(load_config(args)?);
    let (prices, fundamentals) = study.load()?;
    let data = study.reconcile(&prices, &fundamentals)?;

    if emit_json(args.format, &data.diagnostics)? {
        return Ok(());
    }

    print_banner("Ticker Universe");
    print_diagnostics(&data.diagnostics);
    Ok(())
}

pub(crate) fn print_diagnostics(diagnostics: &ReconcileDiagnostics) {
    print_section("DATA RECONCILIATION");

    let years: Vec<String> = diagnostics.years.iter().map(i32::to_string).collect();
    println!("Years:                  {}", years.join(", "));
    println!("Price rows:             {:>8}", diagnostics.price_rows);
    println!("  dropped at load:      {:>8}", diagnostics.price_rows_dropped);
    println!("  inside years:         {:>8}", diagnostics.price_rows_in_window);
    match (diagnostics.first_date, diagnostics.last_date) {
        (Some(first), Some(last)) => println!("Date range:             {} to {}", first, last),
        _ => println!("Date range:             N/A"),
    }
    println!();

    println!("Unique tickers:");
    println!("  prices:               {:>8}", diagnostics.price_tickers);
    println!("  fundamentals:         {:>8}", diagnostics.fundamental_tickers);
    println!("  common:               {:>8}", diagnostics.common_tickers);
    println!();

    println!("Samples:");
    println!("  prices:               {}", diagnostics.price_sample.join(", "));
    println!("  fundamentals:         {}", diagnostics.fundamental_sample.join(", "));
    println!("  common:               {}", diagnostics.common_sample.join(", "));

    if !diagnostics.duplicate_fundamentals.is_empty() {
        println!();
        println!(
            "Duplicate fundamentals ({} tickers, excluded from value):",
            diagnostics.duplicate_fundamentals.len()
        );
        println!("  {}", diagnostics.duplicate_fundamentals.join(", "));
    }
    println!();
}
