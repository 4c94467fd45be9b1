//! One sync run: token check, fetch, flatten, persist
//!
//! ```text
//! token ──empty──▶ MissingToken
//!   │
//! fetch ──error──▶ FetchFailed        (no database access)
//!   │
//! flatten ──error──▶ Err(MalformedResponse)
//!   │
//! insert ──error──▶ PersistFailed     (batch rolled back)
//!   │
//! Completed
//! ```

use crate::client::AdvertClient;
use crate::config::SyncConfig;
use crate::error::{IngestError, Result};
use crate::flatten::flatten;
use crate::storage::{AdvertStore, InsertSummary};
use adsync_common::CampaignRecord;
use tracing::{info, instrument};

/// How a sync run ended
///
/// Every variant is a normal termination; only a malformed API response is
/// returned as an error from [`run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// No API token configured; nothing was fetched or written
    MissingToken,
    /// The API request failed; the database was not touched
    FetchFailed(IngestError),
    /// The batch could not be written; nothing from it was kept
    PersistFailed(IngestError),
    Completed(InsertSummary),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Run one sync cycle
#[instrument(skip_all)]
pub async fn run(config: &SyncConfig) -> Result<RunOutcome> {
    if config.api.token.is_empty() {
        return Ok(RunOutcome::MissingToken);
    }

    let client = match AdvertClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => return Ok(RunOutcome::FetchFailed(e)),
    };

    let raw = match client.fetch_advert_data().await {
        Ok(raw) => raw,
        Err(e) => return Ok(RunOutcome::FetchFailed(e)),
    };

    let records = flatten(raw)?;
    info!(records = records.len(), "Flattened campaign groups");

    let store = match AdvertStore::connect(&config.database).await {
        Ok(store) => store,
        Err(e) => return Ok(RunOutcome::PersistFailed(e)),
    };

    let outcome = persist(&store, config, &records).await;
    store.close().await;

    Ok(outcome)
}

async fn persist(
    store: &AdvertStore,
    config: &SyncConfig,
    records: &[CampaignRecord],
) -> RunOutcome {
    if config.database.auto_create_tables {
        if let Err(e) = store.create_tables().await {
            return RunOutcome::PersistFailed(e);
        }
    }

    match store.insert_records(records).await {
        Ok(summary) => RunOutcome::Completed(summary),
        Err(e) => RunOutcome::PersistFailed(e),
    }
}

/// Create the adverts table without fetching anything
#[instrument(skip_all)]
pub async fn provision(config: &SyncConfig) -> Result<()> {
    let store = AdvertStore::connect(&config.database).await?;
    let result = store.create_tables().await;
    store.close().await;
    result
}
