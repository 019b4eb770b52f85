use crate::state::{SharedState, WorkspaceHandle};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, HeaderValue, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub workspace_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
}

pub fn sign_session(workspace_id: Uuid, ttl_hours: i64, key: &[u8]) -> Result<String, SessionError> {
    let exp = Utc::now() + Duration::hours(ttl_hours);
    let payload = format!("{}|{}", workspace_id, exp.timestamp());
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    let token = format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    );
    Ok(token)
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::STANDARD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let (id, exp) = payload.split_once('|').ok_or(SessionError::Invalid)?;
    let workspace_id = Uuid::parse_str(id).map_err(|_| SessionError::Invalid)?;
    let exp: i64 = exp.parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { workspace_id })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    if let Some(cookie) = headers.get(axum::http::header::COOKIE) {
        if let Ok(val) = cookie.to_str() {
            for pair in val.split(';') {
                let trimmed = pair.trim();
                if let Some(rest) = trimmed.strip_prefix("session=") {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, StatusCode> {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("session={token}; HttpOnly; SameSite=Lax; Path=/{secure_flag}")
        .parse()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Looks up the workspace a request's token points at, if any.
pub async fn resolve(state: &SharedState, headers: &HeaderMap) -> Option<(Uuid, WorkspaceHandle)> {
    let token = extract_token(headers)?;
    let claims = verify_session(&token, &state.session_key)
        .map_err(|e| tracing::warn!("Session verification failed: {}", e))
        .ok()?;
    let handle = state.workspace(claims.workspace_id).await?;
    Some((claims.workspace_id, handle))
}

// ============================================
// Axum extractors
// ============================================

/// Any workspace with a valid session token, signed in or not.
pub struct SessionWorkspace {
    pub id: Uuid,
    pub handle: WorkspaceHandle,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionWorkspace
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = SharedState::from_ref(state);
        let (id, handle) = resolve(&shared_state, &parts.headers)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;
        handle.lock().await.touch(Utc::now());
        Ok(SessionWorkspace { id, handle })
    }
}

/// A workspace whose user has completed login.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(Authenticated(ws): Authenticated) -> Result<...> {
///     let ws = ws.lock().await;
/// }
/// ```
pub struct Authenticated(pub WorkspaceHandle);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionWorkspace { id, handle } =
            SessionWorkspace::from_request_parts(parts, state).await?;
        if !handle.lock().await.auth.is_authenticated() {
            tracing::debug!("Workspace {} is not signed in", id);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Authenticated(handle))
    }
}
