use crate::models::{DonationRecord, PickupGroup};
use crate::core::distance::distance_km;

/// Partition donations into pickup groups by proximity
///
/// Single greedy pass in input order: each unprocessed donation anchors a new
/// group and pulls in every other unprocessed donation within `radius_km` of
/// the anchor. Groups are star-shaped around their anchor, so two members of
/// the same group can be up to twice the radius apart.
pub fn group_by_proximity(donations: &[DonationRecord], radius_km: f64) -> Vec<PickupGroup> {
    let mut processed = vec![false; donations.len()];
    let mut groups = Vec::new();

    for (i, anchor) in donations.iter().enumerate() {
        if processed[i] {
            continue;
        }
        processed[i] = true;

        let mut group = vec![anchor.clone()];

        for (j, other) in donations.iter().enumerate().skip(i + 1) {
            if processed[j] {
                continue;
            }

            if distance_km(&anchor.location, &other.location) <= radius_km {
                group.push(other.clone());
                processed[j] = true;
            }
        }

        groups.push(group);
    }

    groups
}
