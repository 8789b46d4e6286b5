use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use crate::models::{DonationRecord, NgoProfile};
use super::store::{RecordFilter, RecordStore, StoreError};

/// In-memory record store
///
/// Holds profiles and donations behind a lock so tests and local runs can
/// seed data without a hosted database. Records come back in insertion order
/// unless the filter asks for newest first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    profiles: HashMap<String, NgoProfile>,
    donations: Vec<DonationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an organization profile
    pub fn insert_profile(&self, profile: NgoProfile) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.profiles.insert(profile.id.clone(), profile);
    }

    pub fn insert_donation(&self, donation: DonationRecord) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.donations.push(donation);
    }

    pub fn extend_donations<I>(&self, donations: I)
    where
        I: IntoIterator<Item = DonationRecord>,
    {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.donations.extend(donations);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_organization_profile(&self, id: &str) -> Result<Option<NgoProfile>, StoreError> {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(data.profiles.get(id).cloned())
    }

    async fn query_records(&self, filter: &RecordFilter) -> Result<Vec<DonationRecord>, StoreError> {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        let mut records: Vec<DonationRecord> = data
            .donations
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        if filter.newest_first {
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        Ok(records)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
