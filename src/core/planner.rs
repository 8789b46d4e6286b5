use chrono::{DateTime, Utc};
use std::sync::Arc;
use crate::core::{
    demand::predict_demand,
    grouping::group_by_proximity,
    scheduler::build_schedule,
    scoring::rank_donations,
};
use crate::error::MatchError;
use crate::models::{DonationRecord, DonationStatus, GeoPoint, MatchResult, MatchingParams, ScoringWeights};
use crate::services::{RecordFilter, RecordStore};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Load the organization profile, its delivered history and open candidates
/// 2. Predict demand from the history
/// 3. Score and rank candidates, keeping the top few
/// 4. Group the top candidates by proximity
/// 5. Give each group a pickup slot and a visiting route
///
/// Nothing is cached between runs; every call works from a fresh snapshot.
#[derive(Clone)]
pub struct Planner {
    store: Arc<dyn RecordStore>,
    params: MatchingParams,
    weights: ScoringWeights,
}

impl Planner {
    pub fn new(store: Arc<dyn RecordStore>, params: MatchingParams, weights: ScoringWeights) -> Self {
        Self { store, params, weights }
    }

    pub fn with_defaults(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, MatchingParams::default(), ScoringWeights::default())
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn params(&self) -> &MatchingParams {
        &self.params
    }

    /// Find matches for an organization using the current time
    pub async fn find_optimal_matches(&self, ngo_id: &str) -> Result<MatchResult, MatchError> {
        self.find_optimal_matches_at(ngo_id, Utc::now()).await
    }

    /// Find matches for an organization relative to a fixed reference instant
    ///
    /// # Errors
    /// * `MatchError::InvalidRequest` - empty organization id
    /// * `MatchError::NotFound` - no profile for the id
    /// * `MatchError::InvalidProfile` - profile lacks a city or location
    /// * `MatchError::Store` - a read against the record store failed
    pub async fn find_optimal_matches_at(
        &self,
        ngo_id: &str,
        now: DateTime<Utc>,
    ) -> Result<MatchResult, MatchError> {
        if ngo_id.trim().is_empty() {
            return Err(MatchError::InvalidRequest("organization id is required".to_string()));
        }

        let history_filter = RecordFilter::delivered_to(ngo_id);
        let (profile, history) = tokio::try_join!(
            self.store.get_organization_profile(ngo_id),
            self.store.query_records(&history_filter),
        )?;

        let profile = profile
            .ok_or_else(|| MatchError::NotFound(format!("organization {} not found", ngo_id)))?;

        let city = profile
            .city
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MatchError::InvalidProfile(format!("organization {} has no city", ngo_id)))?;
        let location = profile
            .location
            .ok_or_else(|| MatchError::InvalidProfile(format!("organization {} has no location", ngo_id)))?;

        let candidates = self
            .store
            .query_records(&RecordFilter::available_in(city))
            .await?;

        // Food-type ties resolve by first appearance; newest deliveries come first
        let mut history = retain_status(history, DonationStatus::Delivered);
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let candidates = retain_status(candidates, DonationStatus::Available);

        tracing::debug!(
            "Organization {} has {} delivered donations and {} candidates in {}",
            ngo_id,
            history.len(),
            candidates.len(),
            city
        );

        let result = self.plan(location, &history, candidates, now);

        tracing::info!(
            "Planned {} pickups from {} recommendations for organization {}",
            result.schedule.len(),
            result.recommendations.len(),
            ngo_id
        );

        Ok(result)
    }

    /// Run the pure matching pipeline over already loaded records
    pub fn plan(
        &self,
        ngo_location: GeoPoint,
        history: &[DonationRecord],
        candidates: Vec<DonationRecord>,
        now: DateTime<Utc>,
    ) -> MatchResult {
        let offset = self.params.offset();
        let predictions = predict_demand(history, now, &self.params);

        let mut recommendations =
            rank_donations(candidates, &predictions, &ngo_location, &self.weights, &offset);
        recommendations.truncate(self.params.top_n);

        let top: Vec<DonationRecord> = recommendations.iter().map(|s| s.donation.clone()).collect();
        let groups = group_by_proximity(&top, self.params.group_radius_km);
        let group_count = groups.len();

        let schedule = build_schedule(groups, ngo_location, &self.params);

        tracing::debug!(
            "Formed {} pickup groups, scheduled {}",
            group_count,
            schedule.len()
        );

        MatchResult {
            predictions,
            recommendations,
            schedule,
        }
    }
}

/// Drop records the store returned with an unexpected status
fn retain_status(records: Vec<DonationRecord>, status: DonationStatus) -> Vec<DonationRecord> {
    let before = records.len();
    let kept: Vec<DonationRecord> = records.into_iter().filter(|r| r.status == status).collect();

    if kept.len() != before {
        tracing::warn!(
            "Discarded {} records not in {} status",
            before - kept.len(),
            status.as_str()
        );
    }

    kept
}
