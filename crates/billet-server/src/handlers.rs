//! HTTP request handlers.
//!
//! Each handler locks the shared service, runs one operation and converts
//! the result to a JSON body. Holding the lock for the whole operation
//! serializes writers, so concurrent applies cannot interleave. Cohort
//! optimization only holds the lock while loading the roster; the pairing
//! itself runs on a blocking thread.

use crate::dto::{
    AckResponse, ApplyRequest, ApplyResponse, AssignmentDto, CreateSupervisorAssignmentRequest,
    OptimizeRequest, OptimizeResponse, PeerSuggestionsResponse, RateRequest,
    SupervisorPoolParams, SupervisorSuggestionsResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use billet_domain::traits::{CohortQuery, SupervisorQuery};
use billet_domain::{AssignmentId, PersonId, StaffRole};
use billet_service::{plan_cohort, AssignmentService, RoomPlan, ServiceError};
use billet_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Service type served over HTTP
pub type SharedService = Arc<Mutex<AssignmentService<SqliteStore>>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Assignment service behind a writer lock
    pub service: SharedService,
}

impl AppState {
    /// Wrap a service for sharing across handlers
    pub fn new(service: AssignmentService<SqliteStore>) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Server version
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Error from the service layer
    Service(ServiceError),
    /// Malformed path or query value
    BadRequest(String),
    /// Background task failure
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Service(e @ ServiceError::NotFound { .. }) => (StatusCode::NOT_FOUND, e.to_string()),
            AppError::Service(e @ ServiceError::InvalidInput(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::Service(e @ ServiceError::Store(_)) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /people/:id/peer-suggestions - Ranked roommate candidates
async fn peer_suggestions(
    State(state): State<AppState>,
    Path(person_id): Path<u64>,
) -> Result<Json<PeerSuggestionsResponse>, AppError> {
    let service = state.service.lock().await;
    let result = service.get_peer_suggestions(PersonId::new(person_id))?;
    Ok(Json(PeerSuggestionsResponse::from(&result)))
}

/// POST /cohorts/optimize - Propose rooms without persisting them
async fn optimize_cohort(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let filter = CohortQuery {
        group_tag: request.group_tag,
        limit: request.limit,
    };
    let (cohort, config) = {
        let service = state.service.lock().await;
        (service.load_cohort(&filter)?, service.config().clone())
    };

    let plan = tokio::task::spawn_blocking(move || plan_cohort(&cohort, &config))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;
    Ok(Json(OptimizeResponse::from(&plan)))
}

/// POST /cohorts/apply - Persist accepted rooms
async fn apply_pairing(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let rooms: Vec<RoomPlan> = request.proposals.iter().map(RoomPlan::from).collect();
    let mut service = state.service.lock().await;
    let applied = service.apply_pairing(&rooms)?;
    Ok(Json(ApplyResponse { applied }))
}

/// GET /people/:id/supervisor-suggestions - Ranked supervisors
///
/// Optional query parameters: `role`, `max_load`, `top_k`.
async fn supervisor_suggestions(
    State(state): State<AppState>,
    Path(person_id): Path<u64>,
    Query(params): Query<SupervisorPoolParams>,
) -> Result<Json<SupervisorSuggestionsResponse>, AppError> {
    let role = params
        .role
        .as_deref()
        .map(|r| r.parse::<StaffRole>().map_err(|e| AppError::BadRequest(e.to_string())))
        .transpose()?;
    let pool = SupervisorQuery {
        role,
        max_load: params.max_load,
    };

    let service = state.service.lock().await;
    let result = service.get_supervisor_suggestions(PersonId::new(person_id), &pool, params.top_k)?;
    Ok(Json(SupervisorSuggestionsResponse::from(&result)))
}

/// POST /supervisor-assignments - Assign a supervisor
///
/// Responds 201 for a new assignment and 200 when the pair already had an
/// active one.
async fn create_supervisor_assignment(
    State(state): State<AppState>,
    Json(request): Json<CreateSupervisorAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentDto>), AppError> {
    let mut service = state.service.lock().await;
    let outcome = service.create_supervisor_assignment(
        PersonId::new(request.person_id),
        PersonId::new(request.supervisor_id),
    )?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(AssignmentDto::from(&outcome.assignment))))
}

/// POST /supervisor-assignments/:id/rating - Record effectiveness feedback
async fn rate_supervisor_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    Json(request): Json<RateRequest>,
) -> Result<Json<AckResponse>, AppError> {
    let id = AssignmentId::from_string(&assignment_id).map_err(AppError::BadRequest)?;
    let mut service = state.service.lock().await;
    service.rate_supervisor_assignment(id, request.rating, request.notes)?;
    Ok(Json(AckResponse::ok()))
}

/// GET /people/:id/assignments - Assignment history for a person
async fn list_assignments(
    State(state): State<AppState>,
    Path(person_id): Path<u64>,
) -> Result<Json<Vec<AssignmentDto>>, AppError> {
    let service = state.service.lock().await;
    let assignments = service.list_assignments(PersonId::new(person_id))?;
    Ok(Json(assignments.iter().map(AssignmentDto::from).collect()))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/people/:id/peer-suggestions", get(peer_suggestions))
        .route("/people/:id/supervisor-suggestions", get(supervisor_suggestions))
        .route("/people/:id/assignments", get(list_assignments))
        .route("/cohorts/optimize", post(optimize_cohort))
        .route("/cohorts/apply", post(apply_pairing))
        .route("/supervisor-assignments", post(create_supervisor_assignment))
        .route("/supervisor-assignments/:id/rating", post(rate_supervisor_assignment))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use billet_service::ServiceConfig;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = SqliteStore::new(":memory:").unwrap();
        AppState::new(AssignmentService::new(store, ServiceConfig::default()))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_person_is_404() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/people/17/peer-suggestions")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_assignment_id_is_422() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/supervisor-assignments/not-a-uuid/rating")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"rating": 3}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_task_failure_is_500() {
        let response = AppError::Internal("Task join error: panicked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_is_500() {
        let response = AppError::Service(ServiceError::Store("disk full".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
