// Integration tests for Donation Matcher

use donation_matcher::core::Planner;
use donation_matcher::error::MatchError;
use donation_matcher::models::{DonationRecord, DonationStatus, GeoPoint, MatchingParams, NgoProfile, ScoringWeights};
use donation_matcher::services::MemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

// Wednesday morning
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 7, 0, 0).unwrap()
}

fn ngo_location() -> GeoPoint {
    GeoPoint::new(19.0760, 72.8777) // Mumbai
}

fn create_record(
    id: &str,
    food_type: &str,
    quantity: f64,
    location: GeoPoint,
    window: (DateTime<Utc>, DateTime<Utc>),
    created_at: DateTime<Utc>,
    status: DonationStatus,
) -> DonationRecord {
    DonationRecord {
        id: id.to_string(),
        food_type: food_type.to_string(),
        quantity,
        location,
        available_start_time: Some(window.0),
        available_end_time: Some(window.1),
        created_at,
        status,
        ngo_id: if status == DonationStatus::Delivered { Some("ngo-1".to_string()) } else { None },
        city: Some("Mumbai".to_string()),
    }
}

fn hours(start: u32, end: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2024, 6, 12, start, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 12, end, 0, 0).unwrap(),
    )
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(NgoProfile {
        id: "ngo-1".to_string(),
        city: Some("Mumbai".to_string()),
        location: Some(ngo_location()),
    });

    // Two Wednesday deliveries out of four, mostly rice, mostly at 9:00
    let history = [
        ("h1", "Rice", Utc.with_ymd_and_hms(2024, 5, 29, 9, 0, 0).unwrap()),
        ("h2", "Rice", Utc.with_ymd_and_hms(2024, 6, 5, 9, 15, 0).unwrap()),
        ("h3", "Veg", Utc.with_ymd_and_hms(2024, 6, 7, 18, 0, 0).unwrap()),
        ("h4", "Rice", Utc.with_ymd_and_hms(2024, 6, 8, 9, 40, 0).unwrap()),
    ];
    for (id, food_type, created_at) in history {
        store.insert_donation(create_record(
            id,
            food_type,
            50.0,
            ngo_location(),
            hours(9, 10),
            created_at,
            DonationStatus::Delivered,
        ));
    }

    store
}

#[tokio::test]
async fn test_integration_end_to_end_matching() {
    let store = seeded_store();
    let created = now() - Duration::hours(1);
    let near = GeoPoint::new(19.0800, 72.8777);
    let near_too = GeoPoint::new(19.0850, 72.8800);
    let across_town = GeoPoint::new(19.2000, 72.8777);

    store.extend_donations(vec![
        create_record("rice-near", "Rice", 50.0, near, hours(9, 11), created, DonationStatus::Available),
        create_record("veg-near", "Veg", 45.0, near_too, hours(9, 12), created, DonationStatus::Available),
        create_record("bread-far", "Bread", 10.0, across_town, hours(9, 10), created, DonationStatus::Available),
        create_record("pending", "Rice", 50.0, near, hours(9, 11), created, DonationStatus::Pending),
    ]);

    let planner = Planner::with_defaults(store);
    let result = planner.find_optimal_matches_at("ngo-1", now()).await.unwrap();

    // Profile
    assert_eq!(result.predictions.estimated_quantity, 50.0);
    assert_eq!(result.predictions.preferred_food_types, vec!["Rice", "Veg"]);
    assert_eq!(result.predictions.best_pickup_times[0].hour, 9);
    // h2, h3 and h4 fall in the trailing week
    assert_eq!(result.predictions.urgency_score, 57.0);

    // Recommendations: only available donations, best first
    let ids: Vec<&str> = result.recommendations.iter().map(|s| s.donation.id.as_str()).collect();
    assert_eq!(ids, vec!["rice-near", "veg-near", "bread-far"]);
    for pair in result.recommendations.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }

    // Two nearby donations ride together, the far one gets its own slot
    assert_eq!(result.schedule.len(), 2);
    assert_eq!(result.schedule[0].donations.len(), 2);
    assert_eq!(result.schedule[0].pickup_time, hours(9, 10).0);
    assert_eq!(result.schedule[0].route, vec![ngo_location(), near, near_too]);
    assert_eq!(result.schedule[1].donations[0].id, "bread-far");
    assert_eq!(
        result.schedule[1].pickup_time,
        hours(9, 10).0 + Duration::minutes(30)
    );
}

#[tokio::test]
async fn test_no_candidates_in_city() {
    let store = seeded_store();
    let mut elsewhere = create_record(
        "pune",
        "Rice",
        50.0,
        GeoPoint::new(18.52, 73.85),
        hours(9, 10),
        now(),
        DonationStatus::Available,
    );
    elsewhere.city = Some("Pune".to_string());
    store.insert_donation(elsewhere);

    let planner = Planner::with_defaults(store);
    let result = planner.find_optimal_matches_at("ngo-1", now()).await.unwrap();

    assert!(result.recommendations.is_empty());
    assert!(result.schedule.is_empty());
    assert!(!result.predictions.preferred_food_types.is_empty());
}

#[tokio::test]
async fn test_unknown_organization_is_not_found() {
    let planner = Planner::with_defaults(seeded_store());
    let err = planner.find_optimal_matches_at("ngo-404", now()).await.unwrap_err();

    assert!(matches!(err, MatchError::NotFound(_)));
}

#[tokio::test]
async fn test_overlapping_windows_collide_and_drop() {
    let store = seeded_store();
    let created = now() - Duration::hours(1);
    let window = (
        Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 12, 9, 20, 0).unwrap(),
    );

    // Far apart, each with a 20 minute window: only the first gets a slot
    store.extend_donations(vec![
        create_record("a", "Rice", 50.0, ngo_location(), window, created, DonationStatus::Available),
        create_record("b", "Rice", 50.0, GeoPoint::new(19.3, 72.8777), window, created, DonationStatus::Available),
    ]);

    let planner = Planner::with_defaults(store);
    let result = planner.find_optimal_matches_at("ngo-1", now()).await.unwrap();

    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.schedule.len(), 1);
    assert_eq!(result.schedule[0].donations[0].id, "a");
}

#[tokio::test]
async fn test_custom_params_limit_recommendations() {
    let store = seeded_store();
    let created = now() - Duration::hours(1);
    store.extend_donations((0..6).map(|i| {
        create_record(
            &format!("d{}", i),
            "Rice",
            50.0,
            GeoPoint::new(19.0760 + i as f64 * 0.1, 72.8777),
            hours(9, 12),
            created,
            DonationStatus::Available,
        )
    }));

    let params = MatchingParams {
        top_n: 2,
        ..MatchingParams::default()
    };
    let planner = Planner::new(store, params, ScoringWeights::default());
    let result = planner.find_optimal_matches_at("ngo-1", now()).await.unwrap();

    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.recommendations[0].donation.id, "d0");
}

#[test]
fn test_result_serializes_camel_case() {
    let planner = Planner::with_defaults(Arc::new(MemoryStore::new()));
    let result = planner.plan(ngo_location(), &[], vec![], now());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["predictions"]["estimatedQuantity"].is_number());
    assert!(json["predictions"]["preferredFoodTypes"].is_array());
    assert!(json["recommendations"].is_array());
    assert!(json["schedule"].is_array());
}
