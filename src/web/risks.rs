use crate::domain::risk::{filter_register, summarize, RiskCategory, RiskItem, RiskSummary, UploadedFile};
use crate::services::triage::{self, UploadError, UploadListing};
use crate::state::SharedState;
use crate::web::session::Authenticated;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct RegisterQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterView {
    pub risks: Vec<&'static RiskItem>,
    pub summary: RiskSummary,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(register))
        .route(
            "/uploads",
            get(list_uploads).post(upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/uploads/:id", delete(remove_upload))
        .with_state(state)
}

fn upload_status(e: &UploadError) -> StatusCode {
    match e {
        UploadError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        UploadError::NoFiles | UploadError::Malformed(_) => StatusCode::BAD_REQUEST,
        UploadError::NotFound => StatusCode::NOT_FOUND,
    }
}

fn malformed(e: MultipartError) -> StatusCode {
    let err = UploadError::Malformed(e.to_string());
    tracing::warn!("{}", err);
    upload_status(&err)
}

async fn register(
    Authenticated(ws): Authenticated,
    Query(query): Query<RegisterQuery>,
) -> Result<Json<RegisterView>, StatusCode> {
    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => Some(RiskCategory::parse(raw).ok_or_else(|| {
            tracing::warn!("Unknown risk category filter: {}", raw);
            StatusCode::BAD_REQUEST
        })?),
    };
    let summary = summarize(ws.lock().await.uploads.stats());
    Ok(Json(RegisterView {
        risks: filter_register(category),
        summary,
    }))
}

async fn list_uploads(Authenticated(ws): Authenticated) -> Json<UploadListing> {
    Json(ws.lock().await.uploads.listing())
}

/// Accepts every file part of a multipart form. Records come back in `analyzing` state and
/// resolve in the background. Only name, type and size are kept; content is counted and
/// discarded as it streams in.
async fn upload(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<UploadedFile>>), StatusCode> {
    let mut admitted = Vec::new();
    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await.map_err(malformed)? {
            size += chunk.len() as u64;
        }
        let file = triage::admit(&name, size, &mime_type).map_err(|e| {
            tracing::warn!("Upload rejected: {}", e);
            upload_status(&e)
        })?;
        admitted.push(file);
    }
    if admitted.is_empty() {
        return Err(upload_status(&UploadError::NoFiles));
    }

    {
        let mut guard = ws.lock().await;
        for file in &admitted {
            guard.uploads.add(file.clone());
        }
    }
    tracing::info!("Queued {} file(s) for risk analysis", admitted.len());

    tokio::spawn(triage::run_analysis(
        ws.clone(),
        state.pacer.clone(),
        state.rng.clone(),
        state.config.analysis_failure_rate,
        admitted.clone(),
    ));

    Ok((StatusCode::ACCEPTED, Json(admitted)))
}

async fn remove_upload(
    Authenticated(ws): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    ws.lock()
        .await
        .uploads
        .remove(id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| upload_status(&e))
}
