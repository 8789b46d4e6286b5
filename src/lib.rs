//! Donation Matcher - matching and pickup scheduling for food-rescue organizations
//!
//! This library turns an organization's delivery history and the donations
//! currently on offer in its city into ranked recommendations and a pickup
//! schedule with visiting routes.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Planner, distance::distance_km};
pub use error::MatchError;
pub use models::{DemandProfile, DonationRecord, GeoPoint, MatchResult, MatchingParams, NgoProfile, ScoringWeights};
pub use services::{RecordFilter, RecordStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(distance_km(&origin, &origin), 0.0);
        assert_eq!(MatchingParams::default().top_n, 5);
    }
}
