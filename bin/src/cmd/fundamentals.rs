//! Fundamentals command implementation.

use anyhow::Result;
use sintra::Study;

use crate::StudyArgs;
use crate::cmd::{emit_json, fmt_opt, load_config, print_banner, print_section};

/// Show what the fundamentals file can support on its own.
pub(crate) fn show_coverage(args: &StudyArgs) -> Result<()> {
    let study = Study::new(load_config(args)?);
    let coverage = study.fundamentals_coverage()?;

    if emit_json(args.format, &coverage)? {
        return Ok(());
    }

    print_banner("Fundamentals Coverage");
    println!("Rows:    {}", coverage.rows);
    println!("Columns: {}", coverage.columns.join(", "));
    println!();

    print_section("COLUMN PRESENCE");
    println!("Price-like columns:");
    for (name, present) in &coverage.price_columns {
        println!("  {:<26} {}", name, if *present { "yes" } else { "no" });
    }
    println!();
    println!("Metric columns:");
    for (name, present) in &coverage.metric_columns {
        println!("  {:<26} {}", name, if *present { "yes" } else { "no" });
    }
    println!();

    print_section("COVERAGE");
    println!("  Unique symbols:          {:>8}", coverage.unique_symbols);
    println!("  Symbols on several rows: {:>8}", coverage.multi_entry_symbols);
    println!("  Previous close present:  {:>8}", coverage.previous_close_non_null);
    println!("  P/E present:             {:>8}", coverage.pe_non_null);
    println!("  P/E positive:            {:>8}", coverage.positive_pe);
    println!("  Complete rows:           {:>8}", coverage.complete_rows);
    println!(
        "  corr(P/E, growth):       {}",
        fmt_opt(coverage.pe_growth_correlation, 8, 4)
    );
    println!();

    if coverage.previous_close_non_null > 0 {
        println!("The file carries one close per stock: it supports cross-sectional");
        println!("factor sorts but no multi-period return analysis on its own.");
    } else {
        println!("The file carries no price column: returns need a separate price history.");
    }
    println!();
    Ok(())
}
