use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::queries::{IndustryTotal, RankedIndustry};

/// Totals table for console output. Empty input yields a header-only table.
pub fn totals_table(totals: &[IndustryTotal]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Industry", "Total emissions (MtCO2e)"]);

    for row in totals {
        table.add_row(vec![
            Cell::new(&row.industry),
            Cell::new(format!("{:.2}", row.total_emissions)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Top-5 ranking table for console output.
pub fn top5_table(ranked: &[RankedIndustry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rank", "Industry", "Total emissions (MtCO2e)"]);

    for row in ranked {
        table.add_row(vec![
            Cell::new(row.emissions_rank).set_alignment(CellAlignment::Right),
            Cell::new(&row.industry),
            Cell::new(format!("{:.2}", row.total_emissions)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Print the latest year and both tables. An empty store renders as a
/// "none" year and header-only tables, never an error.
pub fn print_report(
    latest_year: Option<i64>,
    totals: &[IndustryTotal],
    ranked: &[RankedIndustry],
) {
    match latest_year {
        Some(year) => println!("Most recent year: {year}"),
        None => println!("Most recent year: none (store is empty)"),
    }

    println!("\nTotal emissions by industry (most recent year):");
    println!("{}", totals_table(totals));

    println!("\nTop 5 highest emitting industries:");
    println!("{}", top5_table(ranked));
}
