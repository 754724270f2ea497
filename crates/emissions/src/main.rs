use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use emissions_core::pipeline::{self, PipelineConfig};
use emissions_core::{db, loader, report};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Industry emissions analytics pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the emissions CSV into the SQLite store
    Load(LoadArgs),
    /// Print the latest year, totals, and top-5 ranking to the console
    Report(StoreArgs),
    /// Render the top-5 bar chart PNG
    Chart(ChartArgs),
    /// Render the chart and the static HTML report page
    Html(HtmlArgs),
    /// Run the full pipeline: load, report, chart, optional HTML page
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input CSV of industry emissions by year
    #[arg(long, default_value = "emissions.csv")]
    csv: PathBuf,
    /// SQLite store to rebuild
    #[arg(long, default_value = "emissions.db")]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// SQLite store to query
    #[arg(long, default_value = "emissions.db")]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// SQLite store to query
    #[arg(long, default_value = "emissions.db")]
    db: PathBuf,
    /// Output path for the chart PNG
    #[arg(long, default_value = "top5_emissions.png")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct HtmlArgs {
    /// SQLite store to query
    #[arg(long, default_value = "emissions.db")]
    db: PathBuf,
    /// Output path for the chart PNG the page embeds
    #[arg(long, default_value = "top5_emissions.png")]
    chart: PathBuf,
    /// Output path for the HTML page
    #[arg(long, default_value = "index.html")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input CSV of industry emissions by year
    #[arg(long, default_value = "emissions.csv")]
    csv: PathBuf,
    /// SQLite store to rebuild
    #[arg(long, default_value = "emissions.db")]
    db: PathBuf,
    /// Output path for the chart PNG
    #[arg(long, default_value = "top5_emissions.png")]
    chart: PathBuf,
    /// Also write the static HTML report page to this path
    #[arg(long)]
    html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Load(args) => handle_load(args).await,
        Command::Report(args) => handle_report(args).await,
        Command::Chart(args) => handle_chart(args).await,
        Command::Html(args) => handle_html(args).await,
        Command::Run(args) => handle_run(args).await,
    }
}

async fn handle_load(args: LoadArgs) -> Result<()> {
    let records = loader::read_records(&args.csv)
        .with_context(|| format!("reading {}", args.csv.display()))?;

    let pool = db::connect(&args.db).await?;
    let result = loader::initialize_store(&pool, &records).await;
    pool.close().await;

    let summary = result.with_context(|| format!("loading {}", args.csv.display()))?;
    println!(
        "Loaded {} rows into {}",
        summary.rows_inserted,
        args.db.display()
    );
    Ok(())
}

async fn handle_report(args: StoreArgs) -> Result<()> {
    let pool = db::connect(&args.db).await?;
    let result = pipeline::fetch_aggregates(&pool).await;
    pool.close().await;

    let aggregates = result.context("querying the emissions store")?;
    report::console::print_report(
        aggregates.latest_year,
        &aggregates.totals,
        &aggregates.ranked,
    );
    Ok(())
}

async fn handle_chart(args: ChartArgs) -> Result<()> {
    let pool = db::connect(&args.db).await?;
    let result = pipeline::fetch_aggregates(&pool).await;
    pool.close().await;

    let aggregates = result.context("querying the emissions store")?;
    report::chart::render_top5_chart(&aggregates.ranked, aggregates.latest_year, &args.out)?;
    println!("Saved bar chart to: {}", args.out.display());
    Ok(())
}

async fn handle_html(args: HtmlArgs) -> Result<()> {
    let pool = db::connect(&args.db).await?;
    let result = pipeline::fetch_aggregates(&pool).await;
    pool.close().await;

    let aggregates = result.context("querying the emissions store")?;
    report::chart::render_top5_chart(&aggregates.ranked, aggregates.latest_year, &args.chart)?;

    report::html::write_page(
        &args.out,
        aggregates.latest_year,
        &aggregates.totals,
        &aggregates.ranked,
        &report::html::chart_file_name(&args.chart),
    )?;

    println!("Saved bar chart to: {}", args.chart.display());
    println!("Saved HTML report to: {}", args.out.display());
    Ok(())
}

async fn handle_run(args: RunArgs) -> Result<()> {
    let config = PipelineConfig {
        csv_path: args.csv,
        db_path: args.db,
        chart_path: args.chart,
        html_path: args.html,
    };

    let receipt = pipeline::run(&config).await?;
    info!(receipt = %serde_json::to_string(&receipt)?, "pipeline finished");
    Ok(())
}
