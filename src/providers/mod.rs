//! Provider fetch clients
//!
//! Upstream data providers deliver fixture observations in their own
//! shapes; each client maps its provider's payloads and status strings to
//! [`IncomingFixture`] before anything reaches the reconciliation engine.

pub mod football_data;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ProviderError;
use crate::models::incoming::IncomingFixture;

pub use football_data::FootballDataProvider;

/// A provider fetch client.
///
/// A provider failure degrades that provider's contribution to zero records
/// for the run; it never aborts other providers or the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Tag used for trust ranking and recorded on contributed records.
    fn source_tag(&self) -> &'static str;

    /// Fetch all fixtures with kickoff dates in `[from, to]`.
    async fn fetch_window(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<IncomingFixture>, ProviderError>;
}
