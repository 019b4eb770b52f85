use crate::domain::catalog::CatalogSummary;
use crate::domain::models::{Metric, Phase, TransitionFramework, Trend};
use crate::domain::phase_view::{
    assess_risks, default_tab, tabs_for, timeline, PhaseRisk, PhaseTab, TimelineEvent,
};
use crate::state::SharedState;
use crate::web::session::Authenticated;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct PhaseOverview {
    pub framework: TransitionFramework,
    pub summary: CatalogSummary,
    pub phases: Vec<Phase>,
}

#[derive(Serialize)]
pub struct TabView {
    pub id: PhaseTab,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct MetricView {
    #[serde(flatten)]
    pub metric: Metric,
    pub trend: Option<Trend>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDetail {
    pub phase: Phase,
    pub status_label: &'static str,
    pub metrics: Vec<MetricView>,
    pub tabs: Vec<TabView>,
    pub default_tab: PhaseTab,
    pub risks: Vec<PhaseRisk>,
    pub timeline: Vec<TimelineEvent>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_phases))
        .route("/:id", get(phase_detail))
        .with_state(state)
}

async fn list_phases(
    _auth: Authenticated,
    State(state): State<SharedState>,
) -> Json<PhaseOverview> {
    Json(PhaseOverview {
        framework: state.catalog.framework().clone(),
        summary: state.catalog.summary(),
        phases: state.catalog.phases().to_vec(),
    })
}

async fn phase_detail(
    _auth: Authenticated,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<PhaseDetail>, StatusCode> {
    let phase = state.catalog.phase(&id).ok_or_else(|| {
        tracing::warn!("Unknown phase requested: {}", id);
        StatusCode::NOT_FOUND
    })?;
    Ok(Json(PhaseDetail {
        phase: phase.clone(),
        status_label: phase.status.label(),
        metrics: phase
            .key_metrics
            .iter()
            .map(|m| MetricView {
                metric: m.clone(),
                trend: m.trend(),
            })
            .collect(),
        tabs: tabs_for(phase)
            .into_iter()
            .map(|tab| TabView {
                id: tab,
                label: tab.label(),
            })
            .collect(),
        default_tab: default_tab(phase),
        risks: assess_risks(phase),
        timeline: timeline(phase),
    }))
}
