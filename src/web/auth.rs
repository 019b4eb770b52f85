use crate::domain::auth::{AuthError, AuthSession, AuthSnapshot};
use crate::services::latency::DelayWindow;
use crate::state::SharedState;
use crate::web::session::{self, SessionWorkspace};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/clear-error", post(clear_error))
        .route("/state", get(auth_state))
        .with_state(state)
}

/// Runs the mock login. Clients without a session get a fresh workspace and cookie,
/// whatever the outcome, so the error banner can be read back afterwards.
async fn login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, StatusCode> {
    let mut response_headers = HeaderMap::new();
    let handle = match session::resolve(&state, &headers).await {
        Some((_, handle)) => handle,
        None => {
            let (id, handle) = state.open_workspace().await;
            let token = session::sign_session(id, state.config.session_ttl_hours, &state.session_key)
                .map_err(|e| {
                    tracing::error!("Failed to sign session: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                })?;
            response_headers.insert(
                axum::http::header::SET_COOKIE,
                session::session_cookie(&token, state.config.secure_cookies)?,
            );
            handle
        }
    };

    {
        let mut ws = handle.lock().await;
        ws.touch(Utc::now());
        ws.auth.begin_login().map_err(|e| {
            tracing::warn!("Login for {} rejected: {}", payload.email, e);
            StatusCode::CONFLICT
        })?;
    }

    // settles in its own task so a dropped request cannot leave the workspace authenticating
    let pacer = state.pacer.clone();
    let settle = tokio::spawn(async move {
        pacer.pause(DelayWindow::LOGIN).await;
        let mut ws = handle.lock().await;
        let now = Utc::now();
        let status = match ws.auth.finish_login(&payload.email, &payload.password, now) {
            Ok(user) => {
                tracing::info!("User {} signed in as {:?}", user.email, user.role);
                StatusCode::OK
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::warn!("Failed login attempt for {}", payload.email);
                StatusCode::UNAUTHORIZED
            }
            Err(e) => {
                tracing::warn!("Login for {} failed: {}", payload.email, e);
                StatusCode::CONFLICT
            }
        };
        (status, ws.auth.snapshot(now))
    });

    let (status, snapshot) = settle.await.map_err(|e| {
        tracing::error!("Login task failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok((status, response_headers, Json(snapshot)).into_response())
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Json<AuthSnapshot> {
    let now = Utc::now();
    match session::resolve(&state, &headers).await {
        Some((id, handle)) => {
            let mut ws = handle.lock().await;
            ws.sign_out();
            ws.touch(now);
            tracing::info!("Workspace {} signed out", id);
            Json(ws.auth.snapshot(now))
        }
        None => Json(AuthSession::new().snapshot(now)),
    }
}

async fn clear_error(SessionWorkspace { handle, .. }: SessionWorkspace) -> Json<AuthSnapshot> {
    let mut ws = handle.lock().await;
    ws.auth.clear_error();
    Json(ws.auth.snapshot(Utc::now()))
}

async fn auth_state(State(state): State<SharedState>, headers: HeaderMap) -> Json<AuthSnapshot> {
    let now = Utc::now();
    match session::resolve(&state, &headers).await {
        Some((_, handle)) => {
            let mut ws = handle.lock().await;
            ws.touch(now);
            Json(ws.auth.snapshot(now))
        }
        None => Json(AuthSession::new().snapshot(now)),
    }
}
