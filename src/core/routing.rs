use crate::models::GeoPoint;
use crate::core::distance::distance_km;

/// Order stops with the nearest-neighbor heuristic
///
/// The route starts at `start` and repeatedly moves to the closest unvisited
/// point. On equal distances the point listed first wins. Points identical to
/// `start` are already visited and are not repeated; every other input point
/// appears exactly once after `start`.
pub fn optimize_route(points: &[GeoPoint], start: GeoPoint) -> Vec<GeoPoint> {
    let mut route = Vec::with_capacity(points.len() + 1);
    route.push(start);

    let mut remaining: Vec<GeoPoint> = points.iter().copied().filter(|p| *p != start).collect();
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_distance = distance_km(&current, &remaining[0]);

        for (i, point) in remaining.iter().enumerate().skip(1) {
            let distance = distance_km(&current, point);
            if distance < nearest_distance {
                nearest = i;
                nearest_distance = distance;
            }
        }

        current = remaining.remove(nearest);
        route.push(current);
    }

    route
}
