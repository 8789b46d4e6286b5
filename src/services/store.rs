use async_trait::async_trait;
use thiserror::Error;
use crate::models::{DonationRecord, DonationStatus, NgoProfile};

/// Errors that can occur when reading from the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Conjunctive filter over donation records; unset fields match anything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub organization_id: Option<String>,
    pub status: Option<DonationStatus>,
    pub city: Option<String>,
    /// Ask for the most recently created records first
    pub newest_first: bool,
}

impl RecordFilter {
    /// Donations delivered to the given organization
    pub fn delivered_to(organization_id: &str) -> Self {
        Self {
            organization_id: Some(organization_id.to_string()),
            status: Some(DonationStatus::Delivered),
            city: None,
            newest_first: true,
        }
    }

    /// Donations currently up for grabs in the given city
    pub fn available_in(city: &str) -> Self {
        Self {
            organization_id: None,
            status: Some(DonationStatus::Available),
            city: Some(city.to_string()),
            newest_first: false,
        }
    }

    pub fn matches(&self, record: &DonationRecord) -> bool {
        if let Some(organization_id) = &self.organization_id {
            if record.ngo_id.as_deref() != Some(organization_id.as_str()) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if record.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Read-only access to organization profiles and donation records
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up an organization profile; `Ok(None)` when the id is unknown
    async fn get_organization_profile(&self, id: &str) -> Result<Option<NgoProfile>, StoreError>;

    /// Fetch every donation record matching `filter`, newest first when asked
    async fn query_records(&self, filter: &RecordFilter) -> Result<Vec<DonationRecord>, StoreError>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<bool, StoreError>;
}
