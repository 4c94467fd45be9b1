//! adsync Ingest Library
//!
//! Pulls advertising campaign metadata from the advert API and appends it to
//! a SQLite table.
//!
//! # Modules
//!
//! - **credentials**: API token lookup
//! - **config**: run configuration loaded once at startup
//! - **client**: the authenticated API request
//! - **flatten**: grouped listing to flat campaign records
//! - **storage**: all-or-nothing batch insert and schema provisioning
//! - **pipeline**: one complete sync run
//!
//! # Example
//!
//! ```no_run
//! use adsync_ingest::{config::SyncConfig, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SyncConfig::load()?;
//!     let outcome = pipeline::run(&config).await?;
//!     tracing::info!(completed = outcome.is_completed(), "Sync finished");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod storage;

pub use error::{FailureKind, IngestError, Result};
pub use pipeline::RunOutcome;
