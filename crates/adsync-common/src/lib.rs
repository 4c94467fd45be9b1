//! adsync Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the adsync workspace.
//!
//! # Overview
//!
//! - **Types**: the [`CampaignRecord`](types::CampaignRecord) entity produced by a sync run
//! - **Error Handling**: the base error type and result alias
//! - **Logging**: tracing subscriber setup driven by environment variables
//!
//! # Example
//!
//! ```no_run
//! use adsync_common::logging::{init_logging, LogConfig};
//! use adsync_common::types::CampaignRecord;
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!
//!     let record = CampaignRecord::new(42, 8, 9, "2024-01-01T00:00:00Z");
//!     info!(advert_id = record.advert_id, "Built record");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{AdsyncError, Result};
pub use types::CampaignRecord;
