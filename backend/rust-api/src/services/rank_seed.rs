use anyhow::Result;
use uuid::Uuid;

use crate::models::Rank;
use crate::store::Store;

const DEFAULT_RANKS: &[(&str, &str, i32, Option<i32>)] = &[
    ("Cadet", "CDT", 0, Some(100)),
    ("Pilot", "PLT", 100, Some(500)),
    ("Commander", "CMD", 500, Some(2000)),
    ("Admiral", "ADM", 2000, None),
];

/// Seed the default rank ladder when the table is empty, so registration
/// and promotion have bands to resolve against on a fresh deployment.
pub async fn bootstrap(store: &dyn Store) -> Result<()> {
    if store.first_configured_rank().await?.is_some() {
        tracing::debug!("rank table already populated, skipping seed");
        return Ok(());
    }

    for (title, abbreviation, min_points, max_points) in DEFAULT_RANKS {
        store
            .save_rank(Rank {
                id: Uuid::new_v4(),
                title: (*title).to_string(),
                abbreviation: Some((*abbreviation).to_string()),
                min_points: *min_points,
                max_points: *max_points,
            })
            .await?;
    }
    tracing::info!("seeded {} default ranks", DEFAULT_RANKS.len());
    Ok(())
}
