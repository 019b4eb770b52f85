use crate::domain::catalog::DUE_DILIGENCE_PHASE;
use crate::domain::mitigation::{mitigation_items, overview, MitigationOverview};
use crate::services::report::{build_report, report_filename};
use crate::state::SharedState;
use crate::web::session::Authenticated;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::Utc;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/mitigation-plan", get(download_plan))
        .route("/mitigation-plan/overview", get(plan_overview))
        .with_state(state)
}

/// The mitigation plan as a JSON attachment, stamped with the phase currently on screen
/// (Due Diligence while the dashboard itself is shown).
async fn download_plan(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
) -> Result<(HeaderMap, Vec<u8>), StatusCode> {
    let phase_id = ws
        .lock()
        .await
        .navigator
        .displayed_phase()
        .unwrap_or(DUE_DILIGENCE_PHASE)
        .to_string();
    let phase = state.catalog.phase(&phase_id).ok_or_else(|| {
        tracing::error!("Displayed phase {} missing from catalog", phase_id);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let now = Utc::now();
    let bytes = build_report(phase, now).map_err(|e| {
        tracing::error!("Failed to build mitigation report: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", report_filename(now.date_naive()))
            .parse()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    );
    tracing::info!("Exported mitigation plan for phase {}", phase.id);
    Ok((headers, bytes))
}

async fn plan_overview(_auth: Authenticated) -> Json<MitigationOverview> {
    Json(overview(&mitigation_items()))
}

#[cfg(test)]
mod tests {
    use crate::web::testing::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_download_defaults_to_due_diligence() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;

        let req = Request::builder()
            .uri("/reports/mitigation-plan")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"mitigation-plan-"));
        assert!(disposition.ends_with(".json\""));

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report["title"], "Due Diligence Risk Mitigation Plan");
        assert_eq!(report["phaseId"], "due-diligence");
        assert_eq!(report["totalEstimatedCost"], 340_000);
    }

    #[tokio::test]
    async fn test_download_uses_displayed_phase() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        call(&app, "POST", "/navigation/phase/stabilization", Some(&cookie), None).await;
        let (_, _, report) =
            call(&app, "GET", "/reports/mitigation-plan", Some(&cookie), None).await;
        assert_eq!(report["phaseId"], "stabilization");
    }

    #[tokio::test]
    async fn test_overview() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        let (status, _, body) =
            call(&app, "GET", "/reports/mitigation-plan/overview", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalMitigations"], 5);
        assert_eq!(body["blocked"], 1);
        assert_eq!(body["totalCost"], 340_000);
    }
}
