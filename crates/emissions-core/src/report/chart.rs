use std::path::Path;

use plotters::prelude::*;

use crate::error::{PipelineError, Result};
use crate::queries::RankedIndustry;

const CHART_SIZE: (u32, u32) = (900, 500);
const BAR_COLOR: RGBColor = RGBColor(178, 24, 43);

fn render_err<E: std::error::Error>(err: E) -> PipelineError {
    PipelineError::Render(err.to_string())
}

fn caption_for(latest_year: Option<i64>) -> String {
    match latest_year {
        Some(year) => format!("Top 5 Highest Emitting Industries ({year})"),
        None => "Top 5 Highest Emitting Industries (no data)".to_string(),
    }
}

/// Render the top-5 ranking as a horizontal bar chart PNG at `path`.
///
/// Value runs along the horizontal axis, industry along the vertical axis,
/// with the largest bar at the top. An empty ranking produces a captioned
/// blank chart rather than an error.
pub fn render_top5_chart(
    ranked: &[RankedIndustry],
    latest_year: Option<i64>,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let caption = caption_for(latest_year);

    if ranked.is_empty() {
        let titled = root
            .titled(&caption, ("sans-serif", 24))
            .map_err(render_err)?;
        titled.present().map_err(render_err)?;
        return Ok(());
    }

    let n = ranked.len();
    let max_total = ranked
        .iter()
        .map(|row| row.total_emissions)
        .fold(0.0_f64, f64::max);
    let x_max = if max_total > 0.0 { max_total * 1.05 } else { 1.0 };

    let labels: Vec<&str> = ranked.iter().map(|row| row.industry.as_str()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(180)
        .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        // Ranked rows are ordered largest-first; segment 0 sits at the
        // bottom of the chart, so slot indexes are reversed.
        .y_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(idx) if *idx < n => labels[n - 1 - *idx].to_string(),
            _ => String::new(),
        })
        .x_desc("Emissions (MtCO2e)")
        .y_desc("Industry")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(ranked.iter().enumerate().map(|(i, row)| {
            let slot = n - 1 - i;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (row.total_emissions, SegmentValue::Exact(slot + 1)),
                ],
                BAR_COLOR.mix(0.75).filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;

    Ok(())
}
