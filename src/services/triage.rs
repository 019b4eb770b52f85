//! Simulated risk triage for uploaded documents.
use crate::domain::risk::{
    is_accepted, AnalysisStatus, Finding, RiskBand, UploadStats, UploadedFile,
};
use crate::services::latency::{DelayWindow, Pacer, RandomSource};
use crate::state::WorkspaceHandle;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub const MITIGATION_SUGGESTIONS: [&str; 5] = [
    "Implement additional security controls and access restrictions",
    "Update compliance documentation and procedures",
    "Establish data validation and cleansing protocols",
    "Optimize performance monitoring and alerting systems",
    "Conduct regular security audits and assessments",
];

pub const ANALYSIS_FAILED_WARNING: &str = "Analysis failed. Please try uploading the file again.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("no files in upload")]
    NoFiles,
    #[error("uploaded file not found")]
    NotFound,
    #[error("malformed upload: {0}")]
    Malformed(String),
}

/// Rejects anything outside the accepted document types.
pub fn admit(name: &str, size: u64, mime_type: &str) -> Result<UploadedFile, UploadError> {
    if !is_accepted(name, mime_type) {
        return Err(UploadError::UnsupportedType(name.to_string()));
    }
    Ok(UploadedFile::analyzing(name, size, mime_type))
}

/// Resolves an `analyzing` record into `completed` or, rarely, `failed`.
pub fn analyze(file: &mut UploadedFile, rng: &dyn RandomSource, failure_rate: f64) {
    if rng.chance(failure_rate) {
        file.status = AnalysisStatus::Failed;
        file.warning = Some(ANALYSIS_FAILED_WARNING.to_string());
        return;
    }

    let score = rng.below(100) as u8;
    let band = RiskBand::from_score(score);
    let finding = |category: &str, upper: u32, severity: RiskBand| Finding {
        category: category.to_string(),
        count: rng.below(upper),
        severity,
    };

    file.risk_score = score;
    file.risk_level = band;
    file.findings = vec![
        finding("Security Vulnerabilities", 10, band),
        finding("Compliance Issues", 5, RiskBand::Medium),
        finding("Data Quality Issues", 8, RiskBand::Low),
        finding("Performance Risks", 6, RiskBand::Medium),
    ];
    file.mitigation_suggestions = MITIGATION_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    file.status = AnalysisStatus::Completed;
}

/// Uploaded files of one workspace plus the aggregate over completed analyses.
///
/// Removing a file does not roll its contribution back out of the stats.
#[derive(Debug, Default)]
pub struct UploadBoard {
    files: Vec<UploadedFile>,
    stats: UploadStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadListing {
    pub files: Vec<UploadedFile>,
    pub stats: UploadStats,
}

impl UploadBoard {
    pub fn add(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn remove(&mut self, id: Uuid) -> Result<UploadedFile, UploadError> {
        let idx = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or(UploadError::NotFound)?;
        Ok(self.files.remove(idx))
    }

    /// Replaces the record in place; completed analyses feed the stats.
    /// Returns false when the file was removed while it was being analysed.
    pub fn resolve(&mut self, analyzed: UploadedFile) -> bool {
        let Some(slot) = self.files.iter_mut().find(|f| f.id == analyzed.id) else {
            return false;
        };
        if analyzed.status == AnalysisStatus::Completed {
            self.stats.record(&analyzed);
        }
        *slot = analyzed;
        true
    }

    pub fn stats(&self) -> &UploadStats {
        &self.stats
    }

    pub fn listing(&self) -> UploadListing {
        UploadListing {
            files: self.files.clone(),
            stats: self.stats.clone(),
        }
    }
}

/// Works through the files of one upload in order, each after its own analysis delay.
pub async fn run_analysis(
    workspace: WorkspaceHandle,
    pacer: Arc<dyn Pacer>,
    rng: Arc<dyn RandomSource>,
    failure_rate: f64,
    pending: Vec<UploadedFile>,
) {
    for mut file in pending {
        pacer.pause(DelayWindow::FILE_ANALYSIS).await;
        analyze(&mut file, rng.as_ref(), failure_rate);

        let (id, name, status, score) = (file.id, file.name.clone(), file.status, file.risk_score);
        let mut ws = workspace.lock().await;
        if ws.uploads.resolve(file) {
            match status {
                AnalysisStatus::Failed => tracing::warn!("Analysis of {} ({}) failed", name, id),
                _ => tracing::info!("Analysed {} ({}), risk score {}", name, id, score),
            }
        } else {
            tracing::debug!("File {} removed before analysis finished", id);
        }
    }
}
