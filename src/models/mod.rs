// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DemandProfile, DonationRecord, DonationStatus, GeoPoint, MatchResult, MatchingParams,
    NgoProfile, PickupGroup, PickupHour, ScheduleEntry, ScoredDonation, ScoringWeights,
    MAX_RECENT_WINDOW_DAYS, MAX_SLOT_MINUTES,
};
pub use requests::FindMatchesRequest;
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse};
