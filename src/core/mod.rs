// Core algorithm exports
pub mod demand;
pub mod distance;
pub mod grouping;
pub mod planner;
pub mod routing;
pub mod scheduler;
pub mod scoring;

pub use demand::predict_demand;
pub use distance::{distance_km, haversine_distance};
pub use grouping::group_by_proximity;
pub use planner::Planner;
pub use routing::optimize_route;
pub use scheduler::{build_schedule, find_pickup_time};
pub use scoring::{calculate_match_score, rank_donations};
