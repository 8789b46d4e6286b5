use chrono::{DateTime, Utc};
use crate::models::{DonationRecord, GeoPoint, MatchingParams, PickupGroup, ScheduleEntry};
use crate::core::routing::optimize_route;

/// Find the earliest pickup instant that suits every donation in a group
///
/// Candidates are `start`, `start + step`, ... up to `end` inclusive, where
/// `[start, end]` is the intersection of the members' availability windows.
/// A candidate is rejected when it lies closer than the configured separation
/// to any booked slot. Returns `None` when a member has no window, the windows
/// do not overlap, or every candidate collides.
pub fn find_pickup_time(
    group: &[DonationRecord],
    booked_slots: &[DateTime<Utc>],
    params: &MatchingParams,
) -> Option<DateTime<Utc>> {
    let mut windows = group.iter().map(DonationRecord::availability_window);

    let (mut start, mut end) = windows.next()??;
    for window in windows {
        let (member_start, member_end) = window?;
        start = start.max(member_start);
        end = end.min(member_end);
    }

    if start >= end {
        return None;
    }

    let step = params.slot_step();
    let separation = params.slot_separation();

    let mut candidate = start;
    while candidate <= end {
        let collides = booked_slots.iter().any(|slot| {
            let gap = if *slot > candidate { *slot - candidate } else { candidate - *slot };
            gap < separation
        });

        if !collides {
            return Some(candidate);
        }

        candidate = match candidate.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }

    None
}

/// Schedule groups in order, routing each one from the organization's location
///
/// Slots booked for earlier groups constrain later ones. Groups without a
/// feasible slot are left out.
pub fn build_schedule(
    groups: Vec<PickupGroup>,
    ngo_location: GeoPoint,
    params: &MatchingParams,
) -> Vec<ScheduleEntry> {
    let mut booked_slots: Vec<DateTime<Utc>> = Vec::new();
    let mut schedule = Vec::with_capacity(groups.len());

    for group in groups {
        let Some(pickup_time) = find_pickup_time(&group, &booked_slots, params) else {
            tracing::debug!("No feasible pickup slot for group of {} donations", group.len());
            continue;
        };

        let stops: Vec<GeoPoint> = group.iter().map(|d| d.location).collect();
        let route = optimize_route(&stops, ngo_location);

        booked_slots.push(pickup_time);
        schedule.push(ScheduleEntry {
            donations: group,
            pickup_time,
            route,
        });
    }

    schedule
}
