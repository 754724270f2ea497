use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::db::{self, DbPool};
use crate::error::Result;
use crate::loader;
use crate::queries::{self, IndustryTotal, RankedIndustry};
use crate::report;

/// Explicit configuration for one pipeline run. Every phase receives its
/// paths from here rather than from ambient state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub chart_path: PathBuf,
    pub html_path: Option<PathBuf>,
}

/// What a completed run produced, for logging and assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReceipt {
    pub rows_loaded: usize,
    pub latest_year: Option<i64>,
    pub industries: usize,
    pub chart_path: String,
    pub html_path: Option<String>,
}

/// The three aggregation results, read in one store pass.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub latest_year: Option<i64>,
    pub totals: Vec<IndustryTotal>,
    pub ranked: Vec<RankedIndustry>,
}

/// Run the three aggregation queries against an open store.
pub async fn fetch_aggregates(pool: &DbPool) -> Result<Aggregates> {
    Ok(Aggregates {
        latest_year: queries::most_recent_year(pool).await?,
        totals: queries::totals_for_latest_year(pool).await?,
        ranked: queries::top5_ranked(pool).await?,
    })
}

/// Execute the full pipeline: load the CSV into the store, aggregate, then
/// render the console report, the chart, and (when configured) the HTML
/// page.
///
/// Phases run strictly in sequence, each owning its store handle for exactly
/// the phase's duration; the handle is closed whether the phase succeeds or
/// fails. Any failure aborts the run.
pub async fn run(config: &PipelineConfig) -> Result<PipelineReceipt> {
    // The CSV is read before the store is opened: a missing or malformed
    // input aborts the run without touching (or creating) the database.
    let records = loader::read_records(&config.csv_path)?;

    let pool = db::connect(&config.db_path).await?;
    let load_result = loader::initialize_store(&pool, &records).await;
    pool.close().await;
    let summary = load_result?;
    info!(rows = summary.rows_inserted, "load phase complete");

    let pool = db::connect(&config.db_path).await?;
    let query_result = fetch_aggregates(&pool).await;
    pool.close().await;
    let aggregates = query_result?;
    info!(
        latest_year = ?aggregates.latest_year,
        industries = aggregates.totals.len(),
        "aggregation phase complete"
    );

    report::console::print_report(
        aggregates.latest_year,
        &aggregates.totals,
        &aggregates.ranked,
    );

    report::chart::render_top5_chart(
        &aggregates.ranked,
        aggregates.latest_year,
        &config.chart_path,
    )?;
    println!("\nSaved bar chart to: {}", config.chart_path.display());

    let html_path = match &config.html_path {
        Some(path) => {
            report::html::write_page(
                path,
                aggregates.latest_year,
                &aggregates.totals,
                &aggregates.ranked,
                &report::html::chart_file_name(&config.chart_path),
            )?;
            println!("Saved HTML report to: {}", path.display());
            Some(path.display().to_string())
        }
        None => None,
    };

    Ok(PipelineReceipt {
        rows_loaded: summary.rows_inserted,
        latest_year: aggregates.latest_year,
        industries: aggregates.totals.len(),
        chart_path: config.chart_path.display().to_string(),
        html_path,
    })
}
