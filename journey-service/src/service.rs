use axum::{
    Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use journey_flow::{
    InMemorySessionStorage, JourneyAction, JourneyError, JourneyRunner, JourneySession,
    JourneySettings, SessionStorage, build_journey_graph,
    catalog::search_products,
    dashboard::{
        AgentStats, LeadFilter, branches, filter_leads, find_policy, seeded_agents, seeded_leads,
    },
    proposal::{proposal_filename, render_proposal_html},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::models::{
    ActionResponse, CatalogQuery, CatalogResponse, JumpRequest, LeadsQuery, LeadsResponse,
    PolicyResponse, SessionView,
};

pub type ApiResult<T> = Result<Json<T>, ApiError>;
pub type ApiError = (StatusCode, Json<Value>);

const CORRELATION_HEADER: &str = "x-correlation-id";

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "id": id
        })),
    )
}

fn unprocessable_error(message: &str, session_id: &str) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": message,
            "session_id": session_id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn journey_error(session_id: &str, err: JourneyError) -> ApiError {
    match err {
        JourneyError::SessionNotFound(_) => not_found_error("Session not found", session_id),
        JourneyError::InvalidStep(_)
        | JourneyError::IllegalTransition { .. }
        | JourneyError::UnsupportedAction { .. }
        | JourneyError::ProductNotFound(_) => {
            warn!(session_id, error = %err, "Request refused");
            unprocessable_error(&err.to_string(), session_id)
        }
        JourneyError::ScreenNotFound(_) | JourneyError::StorageError(_) => {
            error!(session_id, error = %err, "Journey failure");
            internal_error("Journey failure", &err.to_string())
        }
    }
}

/// Session ids are issued as v4 UUIDs; anything else is rejected up front
fn validate_session_id(session_id: &str) -> Result<(), ApiError> {
    if Uuid::parse_str(session_id).is_err() {
        return Err(bad_request_error("Invalid session id format"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AppState {
    pub runner: JourneyRunner,
}

impl AppState {
    pub fn new(settings: JourneySettings) -> Self {
        let session_storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
        let graph = Arc::new(build_journey_graph(settings));
        Self {
            runner: JourneyRunner::new(graph, session_storage),
        }
    }

    fn view(&self, session: JourneySession) -> SessionView {
        let allowed = self.runner.graph().allowed_transitions(&session);
        SessionView::new(session, allowed)
    }
}

pub fn create_app(settings: JourneySettings) -> Router {
    build_router(AppState::new(settings))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/journeys", post(create_journey))
        .route(
            "/journeys/{session_id}",
            get(get_journey).delete(delete_journey),
        )
        .route("/journeys/{session_id}/actions", post(apply_action))
        .route("/journeys/{session_id}/step", post(jump_to_step))
        .route("/journeys/{session_id}/reset", post(reset_journey))
        .route("/journeys/{session_id}/proposal", get(download_proposal))
        .route("/catalog", get(list_catalog))
        .route("/dashboard/leads", get(list_leads))
        .route("/dashboard/branches", get(list_branches))
        .route("/dashboard/agents", get(list_agents))
        .route("/dashboard/stats", get(agent_stats))
        .route("/dashboard/policies/{policy_id}", get(get_policy))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

/// Tags every request with a correlation id (reusing the caller's when sent)
/// and runs it inside a span carrying that id.
async fn correlation_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&correlation_id).ok();
    if let Some(value) = header_value.clone() {
        request.headers_mut().insert(CORRELATION_HEADER, value);
    }

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = header_value {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Loan Journey Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Assisted loan application with insurance add-ons, \
                        customer confirmation and OTP verification",
        "endpoints": {
            "POST /journeys": "Start a new journey",
            "GET /journeys/{session_id}": "Current step, state and allowed transitions",
            "DELETE /journeys/{session_id}": "Discard the journey",
            "POST /journeys/{session_id}/actions": "Apply one action on the current step",
            "POST /journeys/{session_id}/step": "Jump to a step, if the transition is legal",
            "POST /journeys/{session_id}/reset": "Reset the journey to its defaults",
            "GET /journeys/{session_id}/proposal": "Download the proposal document",
            "GET /catalog": "Insurance products, grouped by category",
            "GET /dashboard/leads": "Leads filtered by search, branch and status",
            "GET /dashboard/branches": "Branches present in the lead data",
            "GET /dashboard/agents": "Agents",
            "GET /dashboard/stats": "Admin headline numbers",
            "GET /dashboard/policies/{policy_id}": "Policy details",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn create_journey(State(state): State<AppState>) -> ApiResult<SessionView> {
    let session = state.runner.start().await.map_err(|e| {
        error!(error = %e, "Failed to create session");
        internal_error("Failed to create journey", &e.to_string())
    })?;
    info!(session_id = %session.id, "Journey started");
    Ok(Json(state.view(session)))
}

async fn get_journey(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionView> {
    validate_session_id(&session_id)?;
    let session = state
        .runner
        .load(&session_id)
        .await
        .map_err(|e| journey_error(&session_id, e))?;
    Ok(Json(state.view(session)))
}

async fn delete_journey(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    validate_session_id(&session_id)?;
    state
        .runner
        .discard(&session_id)
        .await
        .map_err(|e| journey_error(&session_id, e))?;
    info!(session_id = %session_id, "Journey discarded");
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_action(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(action): Json<JourneyAction>,
) -> ApiResult<ActionResponse> {
    validate_session_id(&session_id)?;
    info!(session_id = %session_id, action = action.name(), "Applying action");

    let (result, session) = state
        .runner
        .run(&session_id, action)
        .await
        .map_err(|e| journey_error(&session_id, e))?;
    info!(
        session_id = %session_id,
        step = %result.step,
        status = ?result.status,
        "Action applied"
    );
    Ok(Json(ActionResponse::new(result, state.view(session))))
}

async fn jump_to_step(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<JumpRequest>,
) -> ApiResult<SessionView> {
    validate_session_id(&session_id)?;
    let session = state
        .runner
        .jump(&session_id, request.step)
        .await
        .map_err(|e| journey_error(&session_id, e))?;
    Ok(Json(state.view(session)))
}

async fn reset_journey(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionView> {
    validate_session_id(&session_id)?;
    let session = state
        .runner
        .reset(&session_id)
        .await
        .map_err(|e| journey_error(&session_id, e))?;
    Ok(Json(state.view(session)))
}

async fn download_proposal(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    let session = state
        .runner
        .load(&session_id)
        .await
        .map_err(|e| journey_error(&session_id, e))?;

    let html = render_proposal_html(&session.state, chrono::Utc::now().date_naive());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        proposal_filename(&session.state)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}

async fn list_catalog(Query(query): Query<CatalogQuery>) -> Json<CatalogResponse> {
    let products = search_products(query.search.as_deref().unwrap_or_default());
    Json(CatalogResponse::new(&products))
}

async fn list_leads(Query(query): Query<LeadsQuery>) -> Json<LeadsResponse> {
    let filter = LeadFilter::from_query(
        query.search.as_deref(),
        query.branch.as_deref(),
        query.status.as_deref(),
    );
    let all = seeded_leads();
    let leads: Vec<_> = filter_leads(all, &filter).into_iter().cloned().collect();
    Json(LeadsResponse {
        showing: leads.len(),
        total: all.len(),
        leads,
    })
}

async fn list_branches() -> Json<Vec<String>> {
    Json(branches(seeded_leads()))
}

async fn list_agents() -> Json<Value> {
    Json(json!({ "agents": seeded_agents() }))
}

async fn agent_stats() -> Json<AgentStats> {
    Json(AgentStats::compute(seeded_agents(), seeded_leads()))
}

async fn get_policy(Path(policy_id): Path<String>) -> ApiResult<PolicyResponse> {
    let (lead, policy) = find_policy(seeded_leads(), &policy_id)
        .ok_or_else(|| not_found_error("Policy not found", &policy_id))?;
    Ok(Json(PolicyResponse {
        lead_id: lead.id.clone(),
        customer_name: lead.customer_name.clone(),
        covering_loan: lead.covering_loan.clone(),
        policy: policy.clone(),
    }))
}
