use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::DbPool;
use crate::error::{PipelineError, Result};

/// One row of the input CSV: an industry's emissions for a single year, in
/// million metric tons of CO2-equivalent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmissionRecord {
    pub industry: String,
    pub year: i64,
    pub emissions_mtco2e: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub rows_inserted: usize,
}

const DROP_TABLE: &str = "DROP TABLE IF EXISTS emissions";

const CREATE_TABLE: &str = r#"
    CREATE TABLE emissions (
        industry TEXT NOT NULL,
        year INTEGER NOT NULL,
        emissions_mtco2e REAL NOT NULL
    )
"#;

// (industry, year) uniqueness is assumed, not enforced: duplicate input rows
// inflate the totals for that industry.
const CREATE_YEAR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_emissions_year ON emissions(year)";
const CREATE_INDUSTRY_YEAR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_emissions_industry_year ON emissions(industry, year)";

/// Read the emissions CSV into typed records.
///
/// Fails with [`PipelineError::MissingInput`] before any store mutation if
/// the file is absent. A malformed row (non-numeric value, missing year) is
/// a fatal CSV error; rows are never silently skipped or repaired.
pub fn read_records(csv_path: &Path) -> Result<Vec<EmissionRecord>> {
    if !csv_path.exists() {
        return Err(PipelineError::MissingInput(csv_path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: EmissionRecord = row?;
        records.push(record);
    }

    Ok(records)
}

/// Drop and recreate the `emissions` table, bulk-insert `records`, and build
/// the two secondary indexes, all inside a single transaction.
///
/// There is no incremental update: every load rebuilds the table from
/// scratch, so a failed load leaves the previous table contents untouched.
pub async fn initialize_store(pool: &DbPool, records: &[EmissionRecord]) -> Result<LoadSummary> {
    let mut tx = pool.begin().await?;

    sqlx::query(DROP_TABLE).execute(tx.as_mut()).await?;
    sqlx::query(CREATE_TABLE).execute(tx.as_mut()).await?;

    for record in records {
        sqlx::query(
            "INSERT INTO emissions (industry, year, emissions_mtco2e) VALUES (?1, ?2, ?3)",
        )
        .bind(&record.industry)
        .bind(record.year)
        .bind(record.emissions_mtco2e)
        .execute(tx.as_mut())
        .await?;
    }

    sqlx::query(CREATE_YEAR_INDEX).execute(tx.as_mut()).await?;
    sqlx::query(CREATE_INDUSTRY_YEAR_INDEX)
        .execute(tx.as_mut())
        .await?;

    tx.commit().await?;

    info!(rows = records.len(), "emissions table rebuilt");

    Ok(LoadSummary {
        rows_inserted: records.len(),
    })
}
