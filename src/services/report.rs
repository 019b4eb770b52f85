use crate::domain::mitigation::{mitigation_items, MitigationItem, MitigationStatus};
use crate::domain::models::Phase;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "Due Diligence Risk Mitigation Plan";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialise report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MitigationReport {
    pub title: String,
    pub generated_date: String,
    pub phase: String,
    pub phase_id: String,
    pub phase_progress: u8,
    pub total_mitigations: usize,
    pub completed_mitigations: usize,
    pub total_estimated_cost: u64,
    pub mitigations: Vec<MitigationItem>,
}

impl MitigationReport {
    pub fn assemble(phase: &Phase, now: DateTime<Utc>) -> Self {
        let mitigations = mitigation_items();
        Self {
            title: REPORT_TITLE.to_string(),
            generated_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            phase: phase.name.clone(),
            phase_id: phase.id.clone(),
            phase_progress: phase.progress,
            total_mitigations: mitigations.len(),
            completed_mitigations: mitigations
                .iter()
                .filter(|m| m.status == MitigationStatus::Completed)
                .count(),
            total_estimated_cost: mitigations.iter().map(MitigationItem::cost_value).sum(),
            mitigations,
        }
    }
}

/// Pretty-printed JSON, ready to be served as a download.
pub fn build_report(phase: &Phase, now: DateTime<Utc>) -> Result<Vec<u8>, ReportError> {
    let report = MitigationReport::assemble(phase, now);
    Ok(serde_json::to_vec_pretty(&report)?)
}

pub fn report_filename(date: NaiveDate) -> String {
    format!("mitigation-plan-{}.json", date.format("%Y-%m-%d"))
}
