use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::error::Result;

/// Total emissions for one industry across the latest year in the store.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct IndustryTotal {
    pub industry: String,
    pub total_emissions: f64,
}

/// A totals row with its `RANK()` position. Ties share a rank and the next
/// rank skips accordingly; equal ranks order by industry name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RankedIndustry {
    pub industry: String,
    pub total_emissions: f64,
    pub emissions_rank: i64,
}

const TOTALS_FOR_LATEST_YEAR: &str = r#"
    WITH latest_year AS (
        SELECT MAX(year) AS year FROM emissions
    ), totals AS (
        SELECT e.industry,
               SUM(e.emissions_mtco2e) AS total_emissions
        FROM emissions e
        JOIN latest_year ly ON e.year = ly.year
        GROUP BY e.industry
    )
    SELECT industry, total_emissions
    FROM totals
    ORDER BY total_emissions DESC, industry ASC
"#;

const TOP5_RANKED: &str = r#"
    WITH latest_year AS (
        SELECT MAX(year) AS year FROM emissions
    ), totals AS (
        SELECT e.industry,
               SUM(e.emissions_mtco2e) AS total_emissions
        FROM emissions e
        JOIN latest_year ly ON e.year = ly.year
        GROUP BY e.industry
    ), ranked AS (
        SELECT industry,
               total_emissions,
               RANK() OVER (ORDER BY total_emissions DESC) AS emissions_rank
        FROM totals
    )
    SELECT industry, total_emissions, emissions_rank
    FROM ranked
    WHERE emissions_rank <= 5
    ORDER BY emissions_rank, industry
"#;

/// Scalar `MAX(year)` over the stored records; `None` when the table is
/// empty.
pub async fn most_recent_year(pool: &DbPool) -> Result<Option<i64>> {
    let year: Option<i64> = sqlx::query_scalar("SELECT MAX(year) FROM emissions")
        .fetch_one(pool)
        .await?;

    Ok(year)
}

/// Total emissions per industry for the latest year, ordered by total
/// descending (industry name breaks exact ties deterministically).
pub async fn totals_for_latest_year(pool: &DbPool) -> Result<Vec<IndustryTotal>> {
    let rows = sqlx::query_as(TOTALS_FOR_LATEST_YEAR).fetch_all(pool).await?;
    Ok(rows)
}

/// The rank-five-or-better subset of the latest-year totals, ordered by
/// `(rank, industry)`.
pub async fn top5_ranked(pool: &DbPool) -> Result<Vec<RankedIndustry>> {
    let rows = sqlx::query_as(TOP5_RANKED).fetch_all(pool).await?;
    Ok(rows)
}
