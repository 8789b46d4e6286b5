use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to compute matches and a pickup schedule for an organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "ngo_id", rename = "ngoId")]
    pub ngo_id: String,
}
