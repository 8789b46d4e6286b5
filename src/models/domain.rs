use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Lifecycle state of a donation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Available,
    Accepted,
    PickedUp,
    Delivered,
    Cancelled,
}

impl DonationStatus {
    /// Wire value as stored in the record store
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Available => "available",
            DonationStatus::Accepted => "accepted",
            DonationStatus::PickedUp => "pickedup",
            DonationStatus::Delivered => "delivered",
            DonationStatus::Cancelled => "cancelled",
        }
    }
}

/// A single donation, either historical (delivered) or an active candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub id: String,
    pub food_type: String,
    pub quantity: f64,
    pub location: GeoPoint,
    #[serde(default)]
    pub available_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub status: DonationStatus,
    #[serde(default)]
    pub ngo_id: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl DonationRecord {
    /// Pickup window, if both ends are known
    pub fn availability_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.available_start_time, self.available_end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Receiving organization as stored in the record store
///
/// `city` and `location` are optional on the wire; matching refuses
/// profiles that lack either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgoProfile {
    pub id: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// One of the busiest pickup hours in an organization's history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupHour {
    pub hour: u32,
    pub probability: f64,
}

/// Demand summary derived from an organization's delivered donations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandProfile {
    pub estimated_quantity: f64,
    pub preferred_food_types: Vec<String>,
    pub best_pickup_times: Vec<PickupHour>,
    pub urgency_score: f64,
}

impl DemandProfile {
    pub fn is_preferred_food_type(&self, food_type: &str) -> bool {
        self.preferred_food_types.iter().any(|t| t == food_type)
    }

    pub fn is_best_pickup_hour(&self, hour: u32) -> bool {
        self.best_pickup_times.iter().any(|t| t.hour == hour)
    }
}

/// Candidate donation annotated with its match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDonation {
    #[serde(flatten)]
    pub donation: DonationRecord,
    pub match_score: f64,
}

/// Donations collected together on one pickup run
pub type PickupGroup = Vec<DonationRecord>;

/// A scheduled pickup run with its visiting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub donations: PickupGroup,
    pub pickup_time: DateTime<Utc>,
    pub route: Vec<GeoPoint>,
}

/// Output of a full matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub predictions: DemandProfile,
    pub recommendations: Vec<ScoredDonation>,
    pub schedule: Vec<ScheduleEntry>,
}

/// Scoring weights, in points out of 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub food_type: f64,
    pub quantity: f64,
    pub distance: f64,
    /// Points lost per kilometre of distance
    pub distance_decay_per_km: f64,
    pub pickup_hour: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            food_type: 30.0,
            quantity: 20.0,
            distance: 30.0,
            distance_decay_per_km: 3.0,
            pickup_hour: 20.0,
        }
    }
}

/// Upper bound for slot step and separation: one week
pub const MAX_SLOT_MINUTES: i64 = 7 * 24 * 60;

/// Upper bound for the urgency look-back window
pub const MAX_RECENT_WINDOW_DAYS: i64 = 366;

/// Tunable constants of the matching pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingParams {
    pub top_n: usize,
    pub group_radius_km: f64,
    pub slot_step_minutes: i64,
    pub slot_separation_minutes: i64,
    pub recent_window_days: i64,
    /// Offset used to derive weekday and hour-of-day buckets
    pub utc_offset_minutes: i32,
}

impl MatchingParams {
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Distance between consecutive candidate slots, at least one minute
    pub fn slot_step(&self) -> Duration {
        Duration::minutes(self.slot_step_minutes.clamp(1, MAX_SLOT_MINUTES))
    }

    /// Minimum gap to keep from already booked slots
    pub fn slot_separation(&self) -> Duration {
        Duration::minutes(self.slot_separation_minutes.clamp(0, MAX_SLOT_MINUTES))
    }

    pub fn recent_window_days(&self) -> i64 {
        self.recent_window_days.clamp(1, MAX_RECENT_WINDOW_DAYS)
    }

    /// Pull out-of-range values back into the ranges the pipeline accepts
    pub fn clamped(self) -> Self {
        Self {
            slot_step_minutes: self.slot_step_minutes.clamp(1, MAX_SLOT_MINUTES),
            slot_separation_minutes: self.slot_separation_minutes.clamp(0, MAX_SLOT_MINUTES),
            recent_window_days: self.recent_window_days(),
            ..self
        }
    }
}

impl Default for MatchingParams {
    fn default() -> Self {
        Self {
            top_n: 5,
            group_radius_km: 5.0,
            slot_step_minutes: 30,
            slot_separation_minutes: 30,
            recent_window_days: 7,
            utc_offset_minutes: 0,
        }
    }
}
