use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{DiscoveryFilters, Matchmaker, MatchmakerError};
use crate::models::{
    CreateProfileRequest, CreateProfileResponse, DiscoverQuery, DiscoverResponse, ErrorResponse,
    HealthResponse, SwipeRequest, SwipeResponse, UserId,
};
use crate::services::TokenVerifier;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matchmaker: Matchmaker,
    pub tokens: Arc<TokenVerifier>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(create_profile))
        .route("/discover", web::get().to(discover))
        .route("/swipe", web::post().to(swipe));
}

/// Resolve the requester identity from the bearer token
fn authenticate(state: &AppState, req: &HttpRequest) -> Result<UserId, HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    state.tokens.verify_header(header).map_err(|e| {
        tracing::debug!("Rejected request to {}: {}", req.path(), e);
        HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthenticated"))
    })
}

/// Map an engine error to a response; storage detail is logged, never returned
fn error_response(err: MatchmakerError, failure: &str) -> HttpResponse {
    match err {
        MatchmakerError::Validation(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message))
        }
        MatchmakerError::NotFound(what) => {
            tracing::info!("{}: {}", failure, what);
            HttpResponse::NotFound().json(ErrorResponse::new("user not found"))
        }
        MatchmakerError::Storage(e) => {
            tracing::error!("{}: {}", failure, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.matchmaker.health_check().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Profile creation endpoint
///
/// POST /api/v1/profiles
///
/// Request body:
/// ```json
/// {
///   "name": "Alice",
///   "gender": "female",
///   "date_of_birth": "1990-01-01",
///   "latitude": 51.5074,
///   "longitude": -0.1278
/// }
/// ```
async fn create_profile(
    state: web::Data<AppState>,
    body: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for profile request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid request payload"));
    }

    match state.matchmaker.create_profile(body.into_inner().into()).await {
        Ok(id) => HttpResponse::Created().json(CreateProfileResponse { id }),
        Err(e) => error_response(e, "Failed to create profile"),
    }
}

/// Discover endpoint
///
/// GET /api/v1/discover?age={age}&gender={gender}
///
/// Returns other users' profiles ranked by attractiveness, excluding every
/// profile the requester has already swiped on.
async fn discover(
    state: web::Data<AppState>,
    query: web::Query<DiscoverQuery>,
    req: HttpRequest,
) -> impl Responder {
    let requester = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let filters = match DiscoveryFilters::from_query(&query) {
        Ok(filters) => filters,
        Err(e) => return error_response(e, "failed to get matches"),
    };

    tracing::info!("Discovering candidates for user {} ({:?})", requester, filters);

    match state.matchmaker.discover(requester, &filters).await {
        Ok(results) => HttpResponse::Ok().json(DiscoverResponse { results }),
        Err(e) => error_response(e, "failed to get matches"),
    }
}

/// Swipe endpoint
///
/// POST /api/v1/swipe
///
/// Request body:
/// ```json
/// {
///   "other_user_id": 4,
///   "like": true
/// }
/// ```
async fn swipe(
    state: web::Data<AppState>,
    body: web::Json<SwipeRequest>,
    req: HttpRequest,
) -> impl Responder {
    let requester = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for swipe request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid request payload"));
    }

    match state
        .matchmaker
        .swipe(requester, body.other_user_id, body.like)
        .await
    {
        Ok(results) => HttpResponse::Ok().json(SwipeResponse { results }),
        Err(e) => error_response(e, "Failed to process swipe request"),
    }
}
