use anyhow::Result;
use emissions_core::db::{self, DbPool};
use emissions_core::loader::{self, EmissionRecord};
use emissions_core::queries;

async fn seeded_store(rows: &[(&str, i64, f64)]) -> Result<DbPool> {
    let pool = db::connect_in_memory().await?;
    let records: Vec<EmissionRecord> = rows
        .iter()
        .map(|(industry, year, value)| EmissionRecord {
            industry: industry.to_string(),
            year: *year,
            emissions_mtco2e: *value,
        })
        .collect();
    loader::initialize_store(&pool, &records).await?;
    Ok(pool)
}

#[tokio::test]
async fn two_industries_across_two_years() -> Result<()> {
    let pool = seeded_store(&[("A", 2020, 10.0), ("B", 2020, 30.0), ("A", 2019, 5.0)]).await?;

    assert_eq!(queries::most_recent_year(&pool).await?, Some(2020));

    let totals = queries::totals_for_latest_year(&pool).await?;
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].industry, "B");
    assert_eq!(totals[0].total_emissions, 30.0);
    assert_eq!(totals[1].industry, "A");
    assert_eq!(totals[1].total_emissions, 10.0);

    let ranked = queries::top5_ranked(&pool).await?;
    assert_eq!(ranked.len(), 2);
    assert_eq!(
        (ranked[0].industry.as_str(), ranked[0].emissions_rank),
        ("B", 1)
    );
    assert_eq!(
        (ranked[1].industry.as_str(), ranked[1].emissions_rank),
        ("A", 2)
    );
    Ok(())
}

#[tokio::test]
async fn empty_store_yields_empty_results() -> Result<()> {
    let pool = seeded_store(&[]).await?;

    assert_eq!(queries::most_recent_year(&pool).await?, None);
    assert!(queries::totals_for_latest_year(&pool).await?.is_empty());
    assert!(queries::top5_ranked(&pool).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn latest_year_is_maximum_year_present() -> Result<()> {
    let pool = seeded_store(&[
        ("Energy", 1990, 1.0),
        ("Energy", 2031, 2.0),
        ("Agriculture", 2005, 3.0),
    ])
    .await?;

    assert_eq!(queries::most_recent_year(&pool).await?, Some(2031));
    Ok(())
}

#[tokio::test]
async fn totals_sum_matches_latest_year_values() -> Result<()> {
    let rows = [
        ("Energy", 2023, 100.5),
        ("Energy", 2023, 50.25),
        ("Agriculture", 2023, 30.0),
        ("Energy", 2022, 999.0),
    ];
    let pool = seeded_store(&rows).await?;

    let totals = queries::totals_for_latest_year(&pool).await?;
    let total_sum: f64 = totals.iter().map(|row| row.total_emissions).sum();
    let expected: f64 = rows
        .iter()
        .filter(|(_, year, _)| *year == 2023)
        .map(|(_, _, value)| value)
        .sum();

    assert!((total_sum - expected).abs() < 1e-9);
    // Duplicate (industry, year) rows inflate that industry's total.
    assert_eq!(totals[0].industry, "Energy");
    assert!((totals[0].total_emissions - 150.75).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn ties_share_a_rank_and_order_alphabetically() -> Result<()> {
    let pool = seeded_store(&[
        ("Beta", 2023, 30.0),
        ("Alpha", 2023, 30.0),
        ("Gamma", 2023, 10.0),
    ])
    .await?;

    let ranked = queries::top5_ranked(&pool).await?;
    assert_eq!(ranked.len(), 3);
    assert_eq!(
        (ranked[0].industry.as_str(), ranked[0].emissions_rank),
        ("Alpha", 1)
    );
    assert_eq!(
        (ranked[1].industry.as_str(), ranked[1].emissions_rank),
        ("Beta", 1)
    );
    // RANK() semantics: the next rank skips the slot consumed by the tie.
    assert_eq!(
        (ranked[2].industry.as_str(), ranked[2].emissions_rank),
        ("Gamma", 3)
    );
    Ok(())
}

#[tokio::test]
async fn ranking_cuts_at_rank_five() -> Result<()> {
    let pool = seeded_store(&[
        ("A", 2023, 70.0),
        ("B", 2023, 60.0),
        ("C", 2023, 50.0),
        ("D", 2023, 40.0),
        ("E", 2023, 30.0),
        ("F", 2023, 20.0),
        ("G", 2023, 10.0),
    ])
    .await?;

    let ranked = queries::top5_ranked(&pool).await?;
    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[4].industry, "E");
    assert_eq!(ranked[4].emissions_rank, 5);

    let totals = queries::totals_for_latest_year(&pool).await?;
    assert_eq!(totals.len(), 7);
    // Every ranked row's total equals the corresponding totals-row total.
    for row in &ranked {
        let matching = totals
            .iter()
            .find(|total| total.industry == row.industry)
            .expect("ranked industry present in totals");
        assert_eq!(matching.total_emissions, row.total_emissions);
    }
    Ok(())
}

#[tokio::test]
async fn tie_spanning_the_cutoff_excludes_the_skipped_rank() -> Result<()> {
    let pool = seeded_store(&[
        ("A", 2023, 60.0),
        ("B", 2023, 50.0),
        ("C", 2023, 50.0),
        ("D", 2023, 40.0),
        ("E", 2023, 30.0),
        ("F", 2023, 20.0),
    ])
    .await?;

    let ranked = queries::top5_ranked(&pool).await?;
    let ranks: Vec<i64> = ranked.iter().map(|row| row.emissions_rank).collect();
    assert_eq!(ranks, vec![1, 2, 2, 4, 5]);
    assert_eq!(ranked[4].industry, "E");
    Ok(())
}

#[tokio::test]
async fn reloading_the_same_data_is_idempotent() -> Result<()> {
    let rows = [
        ("Energy", 2023, 1520.5),
        ("Transportation", 2023, 1310.2),
        ("Agriculture", 2023, 890.7),
        ("Energy", 2022, 1495.0),
    ];

    let first = seeded_store(&rows).await?;
    let second = seeded_store(&rows).await?;

    assert_eq!(
        queries::most_recent_year(&first).await?,
        queries::most_recent_year(&second).await?
    );
    assert_eq!(
        queries::totals_for_latest_year(&first).await?,
        queries::totals_for_latest_year(&second).await?
    );
    assert_eq!(
        queries::top5_ranked(&first).await?,
        queries::top5_ranked(&second).await?
    );
    Ok(())
}
