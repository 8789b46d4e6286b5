use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use crate::models::{DemandProfile, DonationRecord, MatchingParams, PickupHour};

/// Number of food types and pickup hours kept in a profile
const PROFILE_TOP_K: usize = 3;

/// Build a demand profile from an organization's delivered donations
///
/// Weekday and hour buckets are taken in the offset configured on `params`.
/// `now` is the reference instant for the weekday estimate and the urgency
/// window. Empty history yields the zero profile.
pub fn predict_demand(
    history: &[DonationRecord],
    now: DateTime<Utc>,
    params: &MatchingParams,
) -> DemandProfile {
    if history.is_empty() {
        return DemandProfile::default();
    }

    let offset = params.offset();
    let mut by_day = [0usize; 7];
    let mut by_hour = [0usize; 24];

    for record in history {
        let local = record.created_at.with_timezone(&offset);
        by_day[local.weekday().num_days_from_sunday() as usize] += 1;
        by_hour[local.hour() as usize] += 1;
    }

    let weekday = now.with_timezone(&offset).weekday().num_days_from_sunday() as usize;
    let estimated_quantity = (by_day[weekday] as f64 / history.len() as f64 * 100.0).round();

    DemandProfile {
        estimated_quantity,
        preferred_food_types: top_food_types(history, PROFILE_TOP_K),
        best_pickup_times: peak_hours(&by_hour, PROFILE_TOP_K),
        urgency_score: urgency_score(history, now, params.recent_window_days()),
    }
}

/// Most frequent food types, most frequent first; ties keep first-seen order
fn top_food_types(history: &[DonationRecord], limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for record in history {
        match counts.iter_mut().find(|(food_type, _)| *food_type == record.food_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.food_type.as_str(), 1)),
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(limit)
        .map(|(food_type, _)| food_type.to_string())
        .collect()
}

/// Busiest hours, normalized against the busiest one; ties go to the earlier hour
///
/// All 24 buckets compete, so sparse history is padded with the earliest
/// empty hours at probability zero.
fn peak_hours(by_hour: &[usize; 24], limit: usize) -> Vec<PickupHour> {
    let peak = by_hour.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return Vec::new();
    }

    let mut hours: Vec<(u32, usize)> = by_hour
        .iter()
        .enumerate()
        .map(|(hour, count)| (hour as u32, *count))
        .collect();

    hours.sort_by(|a, b| b.1.cmp(&a.1));

    hours
        .into_iter()
        .take(limit)
        .map(|(hour, count)| PickupHour {
            hour,
            probability: count as f64 / peak as f64,
        })
        .collect()
}

/// Urgency in [0, 100]: fewer recent pickups means a hungrier organization
fn urgency_score(history: &[DonationRecord], now: DateTime<Utc>, window_days: i64) -> f64 {
    let window = Duration::days(window_days);

    let recent = history
        .iter()
        .filter(|record| now.signed_duration_since(record.created_at) < window)
        .count();

    (100.0 * (1.0 - recent as f64 / window_days as f64))
        .round()
        .clamp(0.0, 100.0)
}
