use chrono::{FixedOffset, Timelike};
use crate::models::{DemandProfile, DonationRecord, GeoPoint, ScoredDonation, ScoringWeights};
use crate::core::distance::distance_km;

/// Calculate a match score (0-100) for a candidate donation
///
/// Scoring formula (default weights):
/// score = (
///     food_type_score      # 30 if the food type is preferred
///   + quantity_score       # up to 20, closeness to the estimated quantity
///   + distance_score       # up to 30, minus 3 per km from the organization
///   + pickup_hour_score    # 20 if the window opens at a best pickup hour
/// )
///
/// `offset` is the timezone in which the donation's start hour is read.
pub fn calculate_match_score(
    donation: &DonationRecord,
    profile: &DemandProfile,
    ngo_location: &GeoPoint,
    weights: &ScoringWeights,
    offset: &FixedOffset,
) -> f64 {
    let food_type_score = if profile.is_preferred_food_type(&donation.food_type) {
        weights.food_type
    } else {
        0.0
    };

    let quantity_score =
        calculate_quantity_score(donation.quantity, profile.estimated_quantity, weights.quantity);

    let distance = distance_km(&donation.location, ngo_location);
    let distance_score =
        calculate_distance_score(distance, weights.distance, weights.distance_decay_per_km);

    let pickup_hour_score = match donation.available_start_time {
        Some(start) if profile.is_best_pickup_hour(start.with_timezone(offset).hour()) => {
            weights.pickup_hour
        }
        _ => 0.0,
    };

    let total_score = food_type_score.max(0.0)
        + quantity_score
        + distance_score
        + pickup_hour_score.max(0.0);

    total_score.clamp(0.0, 100.0)
}

/// Score every candidate and sort by score, highest first
///
/// Equal scores keep their input order.
pub fn rank_donations(
    candidates: Vec<DonationRecord>,
    profile: &DemandProfile,
    ngo_location: &GeoPoint,
    weights: &ScoringWeights,
    offset: &FixedOffset,
) -> Vec<ScoredDonation> {
    let mut scored: Vec<ScoredDonation> = candidates
        .into_iter()
        .map(|donation| {
            let match_score =
                calculate_match_score(&donation, profile, ngo_location, weights, offset);
            ScoredDonation { donation, match_score }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}

/// Closeness of the offered quantity to the expected one
/// Zero when there is no estimate to compare against
#[inline]
fn calculate_quantity_score(quantity: f64, estimated: f64, max_points: f64) -> f64 {
    if estimated == 0.0 {
        return 0.0;
    }

    let relative_diff = (quantity - estimated).abs() / estimated;
    (max_points - max_points * relative_diff).max(0.0)
}

/// Linear decay with distance, reaching zero at `max_points / decay_per_km` km
#[inline]
fn calculate_distance_score(distance_km: f64, max_points: f64, decay_per_km: f64) -> f64 {
    (max_points - decay_per_km * distance_km).max(0.0)
}
