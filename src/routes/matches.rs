use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::Planner;
use crate::error::MatchError;
use crate::models::{ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: Planner,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.planner.store().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Record store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "ngoId": "string"
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Finding matches for organization: {} (request {})", req.ngo_id, request_id);

    match state.planner.find_optimal_matches(&req.ngo_id).await {
        Ok(result) => HttpResponse::Ok().json(FindMatchesResponse { request_id, result }),
        Err(e) => {
            if matches!(e, MatchError::Store(_)) {
                tracing::error!("Matching failed for {}: {}", req.ngo_id, e);
            } else {
                tracing::info!("Matching rejected for {}: {}", req.ngo_id, e);
            }
            error_response(&e)
        }
    }
}

/// Map a matching error onto an HTTP error response
pub fn error_response(err: &MatchError) -> HttpResponse {
    let (status, error) = match err {
        MatchError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
        MatchError::NotFound(_) => (StatusCode::NOT_FOUND, "Organization not found"),
        MatchError::InvalidProfile(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Invalid organization profile"),
        MatchError::Store(_) => (StatusCode::BAD_GATEWAY, "Record store unavailable"),
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}
