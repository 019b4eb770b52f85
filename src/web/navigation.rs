use crate::domain::navigation::{NavTarget, NavigationError, NavigationView, Transition};
use crate::services::latency::DelayWindow;
use crate::state::{SharedState, WorkspaceHandle};
use crate::web::session::Authenticated;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(current_view))
        .route("/phase/:id", post(select_phase))
        .route("/dashboard", post(back_to_dashboard))
        .with_state(state)
}

async fn current_view(Authenticated(ws): Authenticated) -> Json<NavigationView> {
    Json(ws.lock().await.navigator.view())
}

async fn select_phase(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<NavigationView>, StatusCode> {
    if state.catalog.phase(&id).is_none() {
        tracing::warn!("{}", NavigationError::UnknownPhase(id));
        return Err(StatusCode::NOT_FOUND);
    }
    navigate(&state, &ws, NavTarget::Phase(id), DelayWindow::PHASE_SELECT).await
}

async fn back_to_dashboard(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
) -> Result<Json<NavigationView>, StatusCode> {
    navigate(&state, &ws, NavTarget::Dashboard, DelayWindow::DASHBOARD_RETURN).await
}

/// `idle -> loading -> idle`; the lock is not held across the delay so reads still see
/// the loading state. The delay and completion run in their own task, so a dropped request
/// cannot leave the workspace stuck in `loading`.
async fn navigate(
    state: &SharedState,
    ws: &WorkspaceHandle,
    target: NavTarget,
    window: DelayWindow,
) -> Result<Json<NavigationView>, StatusCode> {
    let ticket = {
        let mut guard = ws.lock().await;
        let transition = guard.navigator.begin(target.clone()).map_err(|e| {
            tracing::warn!("Navigation to {:?} refused: {}", target, e);
            StatusCode::CONFLICT
        })?;
        match transition {
            Transition::Unchanged => return Ok(Json(guard.navigator.view())),
            Transition::Started(ticket) => ticket,
        }
    };

    let pacer = state.pacer.clone();
    let workspace = ws.clone();
    let settle = tokio::spawn(async move {
        pacer.pause(window).await;
        let mut guard = workspace.lock().await;
        if let Err(e) = guard.navigator.complete(ticket) {
            // signed out while loading
            tracing::debug!("Navigation result dropped: {}", e);
        }
        guard.navigator.view()
    });

    settle.await.map(Json).map_err(|e| {
        tracing::error!("Navigation task failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::navigation::NavTarget;
    use crate::web::testing::*;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[tokio::test]
    async fn test_select_and_return() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;

        let (status, _, body) =
            call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["displayed"]["kind"], "phase");
        assert_eq!(body["displayed"]["phaseId"], "reports");
        assert!(body["loading"].is_null());
        assert_eq!(body["controlsEnabled"], true);

        let (_, _, body) =
            call(&app, "POST", "/navigation/dashboard", Some(&cookie), None).await;
        assert_eq!(body["displayed"]["kind"], "dashboard");
    }

    #[tokio::test]
    async fn test_reselect_is_noop() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await;
        let (status, _, body) =
            call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["displayed"]["phaseId"], "reports");
    }

    #[tokio::test]
    async fn test_busy_while_loading() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        let ws = workspace_of(&state, &cookie).await;
        ws.lock()
            .await
            .navigator
            .begin(NavTarget::Phase("data-cleanup".into()))
            .unwrap();

        let (status, _, _) =
            call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, body) = call(&app, "GET", "/navigation", Some(&cookie), None).await;
        assert_eq!(body["loading"]["phaseId"], "data-cleanup");
        assert_eq!(body["controlsEnabled"], false);
    }

    #[tokio::test]
    async fn test_unknown_phase_rejected() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        let (status, _, _) =
            call(&app, "POST", "/navigation/phase/missing", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, _, body) = call(&app, "GET", "/navigation", Some(&cookie), None).await;
        assert_eq!(body["displayed"]["kind"], "dashboard");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_navigation_still_settles() {
        let state = paced_state();
        let app = app(&state);
        let cookie = login(&app).await;

        let request = {
            let (app, cookie) = (app.clone(), cookie.clone());
            tokio::spawn(async move {
                call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let (_, _, body) = call(&app, "GET", "/navigation", Some(&cookie), None).await;
        assert_eq!(body["loading"]["phaseId"], "reports");

        // client went away mid-delay
        request.abort();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let (_, _, body) = call(&app, "GET", "/navigation", Some(&cookie), None).await;
        assert!(body["loading"].is_null());
        assert_eq!(body["displayed"]["phaseId"], "reports");
        assert_eq!(body["controlsEnabled"], true);

        let (status, _, _) =
            call(&app, "POST", "/navigation/dashboard", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_navigation_does_not_cut_new_one_short() {
        let state = paced_state();
        let app = app(&state);
        let cookie = login(&app).await;

        let first = {
            let (app, cookie) = (app.clone(), cookie.clone());
            tokio::spawn(async move {
                call(&app, "POST", "/navigation/phase/reports", Some(&cookie), None).await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        call(&app, "POST", "/auth/logout", Some(&cookie), None).await;

        // same workspace starts loading the same phase before the old delay ends
        let ws = workspace_of(&state, &cookie).await;
        ws.lock()
            .await
            .navigator
            .begin(NavTarget::Phase("reports".into()))
            .unwrap();

        let (status, _, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["displayed"]["kind"], "dashboard");
        assert_eq!(body["loading"]["phaseId"], "reports");
        assert!(ws.lock().await.navigator.is_loading());
    }
}
