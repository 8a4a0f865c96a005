//! Rolemine REST API Server
//!
//! Run with: cargo run --features server --bin rolemine-server
//!
//! Endpoints:
//!   POST   /load              - Load a user/group matrix and generate candidates
//!   GET    /users             - List users with their committed roles
//!   GET    /groups            - Groups, most-assigned first
//!   GET    /candidates        - Candidates, highest score first
//!   GET    /cell              - Highlight for one cell (?user=&group=)
//!   POST   /toggle            - Toggle an unassigned cell
//!   POST   /hover             - Set or clear the hover preview
//!   POST   /commit            - Commit a candidate
//!   POST   /recompute         - Regenerate candidates from the matrix
//!   GET    /snapshots         - List saved snapshots
//!   POST   /snapshots/:name   - Save the session
//!   PUT    /snapshots/:name   - Restore a saved session
//!   DELETE /snapshots/:name   - Delete a snapshot

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rolemine::{
    AssignmentState, CandidateView, CellHighlight, CommitOutcome, Config, Error, RoleId, Session,
    SnapshotStore,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    // one lock per request keeps commands serialized
    session: Arc<Mutex<Option<Session>>>,
    store: Arc<SnapshotStore>,
}

impl AppState {
    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|p| p.into_inner())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct UserReq {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct AssignmentReq {
    user: String,
    group: String,
    state: AssignmentState,
}

#[derive(Deserialize)]
struct LoadReq {
    users: Vec<UserReq>,
    groups: Vec<String>,
    assignments: Vec<AssignmentReq>,
}

#[derive(Deserialize)]
struct CellReq {
    user: String,
    group: String,
}

#[derive(Deserialize)]
struct HoverReq {
    role: Option<RoleId>,
}

#[derive(Deserialize)]
struct CommitReq {
    role: RoleId,
}

#[derive(Serialize)]
struct UserInfo {
    id: String,
    name: String,
    active_groups: Vec<String>,
    committed_roles: Vec<RoleId>,
}

#[derive(Serialize)]
struct GroupInfo {
    id: String,
    assigned: usize,
}

#[derive(Serialize)]
struct CellInfo {
    state: AssignmentState,
    editable: bool,
    highlight: CellHighlight,
}

#[derive(Serialize)]
struct CommitInfo {
    role: RoleId,
    members: usize,
    narrowed: Vec<RoleId>,
    pruned: Vec<RoleId>,
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

// ============================================================================
// Helpers
// ============================================================================

fn ok<T>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

fn fail<T>(e: Error) -> Reply<T> {
    let code = match e {
        Error::UnknownCell { .. } | Error::UnknownUser(_) | Error::UnknownRole(_) => {
            StatusCode::NOT_FOUND
        }
        Error::AlreadyUsed(_) => StatusCode::CONFLICT,
        Error::InvalidTransition { .. } | Error::InvalidMatrix(_) => StatusCode::BAD_REQUEST,
        Error::Store(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(ApiResponse::err(e.to_string())))
}

fn no_session<T>() -> Reply<T> {
    (StatusCode::CONFLICT, Json(ApiResponse::err("no matrix loaded")))
}

fn with_session<T, F>(state: &AppState, f: F) -> Reply<T>
where
    F: FnOnce(&mut Session) -> Result<T, Error>,
{
    let mut guard = state.session();
    match guard.as_mut() {
        None => no_session(),
        Some(s) => match f(s) {
            Ok(v) => ok(v),
            Err(e) => fail(e),
        },
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn post_load(State(state): State<AppState>, Json(req): Json<LoadReq>) -> Reply<usize> {
    let users = req.users.into_iter().map(|u| (u.id, u.name)).collect();
    let cells = req.assignments.into_iter().map(|a| (a.user, a.group, a.state));
    match Session::load(users, req.groups, cells) {
        Ok(s) => {
            let n = s.pool().len();
            *state.session() = Some(s);
            ok(n)
        }
        Err(e) => fail(e),
    }
}

async fn get_users(State(state): State<AppState>) -> Reply<Vec<UserInfo>> {
    with_session(&state, |s| {
        let s = &*s;
        s.list_users()
            .iter()
            .map(|u| {
                Ok(UserInfo {
                    id: u.id.clone(),
                    name: u.name.clone(),
                    active_groups: s.active_groups(&u.id)?,
                    committed_roles: u.committed_roles().to_vec(),
                })
            })
            .collect()
    })
}

async fn get_groups(State(state): State<AppState>) -> Reply<Vec<GroupInfo>> {
    with_session(&state, |s| {
        Ok(s.groups_by_assignment_count()
            .into_iter()
            .map(|g| GroupInfo { assigned: s.assignment_count(&g), id: g })
            .collect())
    })
}

async fn get_candidates(State(state): State<AppState>) -> Reply<Vec<CandidateView>> {
    with_session(&state, |s| {
        Ok(s.ordered_candidates().into_iter().map(CandidateView::from).collect())
    })
}

async fn get_cell(State(state): State<AppState>, Query(req): Query<CellReq>) -> Reply<CellInfo> {
    with_session(&state, |s| {
        Ok(CellInfo {
            state: s.cell_state(&req.user, &req.group)?,
            editable: s.is_editable(&req.user, &req.group)?,
            highlight: s.cell_highlight(&req.user, &req.group)?,
        })
    })
}

async fn post_toggle(
    State(state): State<AppState>,
    Json(req): Json<CellReq>,
) -> Reply<AssignmentState> {
    with_session(&state, |s| s.toggle_cell(&req.user, &req.group))
}

async fn post_hover(State(state): State<AppState>, Json(req): Json<HoverReq>) -> Reply<bool> {
    with_session(&state, |s| Ok(s.set_hover(req.role.as_deref())))
}

async fn post_commit(
    State(state): State<AppState>,
    Json(req): Json<CommitReq>,
) -> Reply<CommitInfo> {
    with_session(&state, |s| {
        let CommitOutcome { members, narrowed, pruned } = s.commit(&req.role)?;
        Ok(CommitInfo { role: req.role.clone(), members, narrowed, pruned })
    })
}

async fn post_recompute(State(state): State<AppState>) -> Reply<usize> {
    with_session(&state, |s| {
        s.recompute();
        Ok(s.pool().len())
    })
}

async fn get_snapshots(State(state): State<AppState>) -> Reply<Vec<String>> {
    match state.store.list() {
        Ok(names) => ok(names),
        Err(e) => fail(e),
    }
}

async fn save_snapshot(State(state): State<AppState>, Path(name): Path<String>) -> Reply<u64> {
    let store = state.store.clone();
    with_session(&state, |s| store.save(&name, s))
}

async fn restore_snapshot(State(state): State<AppState>, Path(name): Path<String>) -> Reply<usize> {
    match state.store.load(&name) {
        Ok(Some(s)) => {
            let n = s.pool().len();
            *state.session() = Some(s);
            ok(n)
        }
        Ok(None) => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::err(format!("no snapshot {}", name))))
        }
        Err(e) => fail(e),
    }
}

async fn delete_snapshot(State(state): State<AppState>, Path(name): Path<String>) -> Reply<bool> {
    match state.store.delete(&name) {
        Ok(r) => ok(r),
        Err(e) => fail(e),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(db = %config.db_path.display(), "initializing snapshot store");
    let store = SnapshotStore::open(&config.db_path, config.map_size)?;

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let state = AppState { session: Arc::new(Mutex::new(None)), store: Arc::new(store) };

    let app = Router::new()
        .route("/load", post(post_load))
        .route("/users", get(get_users))
        .route("/groups", get(get_groups))
        .route("/candidates", get(get_candidates))
        .route("/cell", get(get_cell))
        .route("/toggle", post(post_toggle))
        .route("/hover", post(post_hover))
        .route("/commit", post(post_commit))
        .route("/recompute", post(post_recompute))
        .route("/snapshots", get(get_snapshots))
        .route(
            "/snapshots/:name",
            post(save_snapshot).put(restore_snapshot).delete(delete_snapshot),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = config.addr();
    info!("rolemine server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
