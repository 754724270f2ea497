//! Static HTML report generation.
//!
//! Produces a self-contained page (inline CSS, no scripts) embedding the
//! top-5 chart image and the two result tables, suitable for static hosting.

use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::queries::{IndustryTotal, RankedIndustry};

/// Render the report page as a string.
///
/// `chart_file` is the file name of the chart PNG; the page references it by
/// relative path, so both are expected to sit in the same directory.
pub fn render_page(
    latest_year: Option<i64>,
    totals: &[IndustryTotal],
    ranked: &[RankedIndustry],
    chart_file: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Industry Emissions Report</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {chart}
        {totals_section}
        {top5_section}
        {footer}
    </div>
</body>
</html>"#,
        css = inline_css(),
        header = render_header(latest_year),
        chart = render_chart_section(chart_file),
        totals_section = render_totals_section(totals),
        top5_section = render_top5_section(ranked),
        footer = render_footer(),
    )
}

/// File name the page uses to reference the chart; the page and the chart
/// are expected to share a directory.
pub fn chart_file_name(chart_path: &Path) -> String {
    chart_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| chart_path.display().to_string())
}

/// Render the page and write it to `path`.
pub fn write_page(
    path: &Path,
    latest_year: Option<i64>,
    totals: &[IndustryTotal],
    ranked: &[RankedIndustry],
    chart_file: &str,
) -> Result<()> {
    let page = render_page(latest_year, totals, ranked, chart_file);
    std::fs::write(path, page)?;
    Ok(())
}

fn render_header(latest_year: Option<i64>) -> String {
    let year_line = match latest_year {
        Some(year) => format!("Most recent year in the dataset: <strong>{year}</strong>"),
        None => "The dataset is empty; no reporting year is available.".to_string(),
    };

    format!(
        r#"<header>
            <h1>Industry Greenhouse-Gas Emissions</h1>
            <p class="meta">Emissions are reported in million metric tons of
            CO2-equivalent (MtCO2e), aggregated per industry for the most
            recent year in the underlying data. {year_line}</p>
        </header>"#
    )
}

fn render_chart_section(chart_file: &str) -> String {
    format!(
        r#"<section>
            <h2>Top 5 Highest Emitting Industries</h2>
            <img src="{src}" alt="Horizontal bar chart of the five highest emitting industries">
        </section>"#,
        src = escape(chart_file),
    )
}

fn render_totals_section(totals: &[IndustryTotal]) -> String {
    let rows: String = totals
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{:.2}</td></tr>\n",
                escape(&row.industry),
                row.total_emissions,
            )
        })
        .collect();

    format!(
        r#"<section>
            <h2>Total Emissions by Industry</h2>
            <table>
                <thead><tr><th>Industry</th><th class="num">Total emissions (MtCO2e)</th></tr></thead>
                <tbody>
{rows}                </tbody>
            </table>
        </section>"#
    )
}

fn render_top5_section(ranked: &[RankedIndustry]) -> String {
    let rows: String = ranked
        .iter()
        .map(|row| {
            format!(
                "<tr><td class=\"num\">{}</td><td>{}</td><td class=\"num\">{:.2}</td></tr>\n",
                row.emissions_rank,
                escape(&row.industry),
                row.total_emissions,
            )
        })
        .collect();

    format!(
        r#"<section>
            <h2>Top 5 Ranking</h2>
            <table>
                <thead><tr><th class="num">Rank</th><th>Industry</th><th class="num">Total emissions (MtCO2e)</th></tr></thead>
                <tbody>
{rows}                </tbody>
            </table>
        </section>"#
    )
}

fn render_footer() -> String {
    format!(
        r#"<footer>
            <p>Generated at {timestamp} from the emissions store.</p>
        </footer>"#,
        timestamp = Utc::now().to_rfc3339(),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 960px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 2rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 0.5rem;
}

header .meta {
    color: #6b7280;
    font-size: 0.875rem;
}

section {
    margin-bottom: 2rem;
}

section h2 {
    font-size: 1.25rem;
    margin-bottom: 0.75rem;
}

section img {
    max-width: 100%;
    border: 1px solid #e5e7eb;
}

table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.875rem;
}

th, td {
    padding: 0.5rem 0.75rem;
    border: 1px solid #e5e7eb;
    text-align: left;
}

th {
    background: #f9fafb;
    font-weight: 600;
}

td.num, th.num {
    text-align: right;
    font-variant-numeric: tabular-nums;
}

tbody tr:nth-child(even) {
    background: #f9fafb;
}

footer {
    color: #6b7280;
    font-size: 0.75rem;
    border-top: 1px solid #e5e7eb;
    padding-top: 1rem;
}
"#
}
