use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Risk register (due diligence findings)
// ============================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskCategory {
    Technical,
    Operational,
    Compliance,
    Security,
    Financial,
    Timeline,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Technical,
        RiskCategory::Operational,
        RiskCategory::Compliance,
        RiskCategory::Security,
        RiskCategory::Financial,
        RiskCategory::Timeline,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| format!("{c:?}").eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskStatus {
    Identified,
    Mitigated,
    #[serde(rename = "In Progress")]
    InProgress,
    Accepted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    pub id: &'static str,
    pub category: RiskCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub probability: u8,
    pub impact: u8,
    pub risk_score: f64,
    pub status: RiskStatus,
    pub mitigation_strategy: &'static str,
    pub ai_recommendation: &'static str,
    pub detected_by: &'static str,
    pub timeline: &'static str,
}

pub static RISK_REGISTER: [RiskItem; 5] = [
    RiskItem {
        id: "DD-001",
        category: RiskCategory::Technical,
        title: "Legacy System Integration Complexity",
        description: "Multiple legacy systems with outdated APIs pose integration challenges during transition",
        severity: Severity::High,
        probability: 75,
        impact: 80,
        risk_score: 60.0,
        status: RiskStatus::Mitigated,
        mitigation_strategy: "Implement API gateway with transformation layers and gradual migration approach",
        ai_recommendation: "Deploy microservices architecture with containerization for seamless integration",
        detected_by: "Automated document analysis",
        timeline: "2024-02-05",
    },
    RiskItem {
        id: "DD-002",
        category: RiskCategory::Compliance,
        title: "Data Privacy Regulation Gaps",
        description: "Current data handling processes may not fully comply with GDPR and regional privacy laws",
        severity: Severity::Critical,
        probability: 60,
        impact: 95,
        risk_score: 57.0,
        status: RiskStatus::InProgress,
        mitigation_strategy: "Implement comprehensive data governance framework with automated compliance monitoring",
        ai_recommendation: "Deploy AI-powered data classification and privacy protection automation",
        detected_by: "Compliance checking systems",
        timeline: "2024-02-08",
    },
    RiskItem {
        id: "DD-003",
        category: RiskCategory::Security,
        title: "Insufficient Access Control Mechanisms",
        description: "Current role-based access control lacks granular permissions and audit trails",
        severity: Severity::High,
        probability: 70,
        impact: 75,
        risk_score: 52.5,
        status: RiskStatus::Mitigated,
        mitigation_strategy: "Implement zero-trust security model with multi-factor authentication",
        ai_recommendation: "Deploy behavioral analytics for anomaly detection and automated threat response",
        detected_by: "Risk assessment algorithms",
        timeline: "2024-02-10",
    },
    RiskItem {
        id: "DD-004",
        category: RiskCategory::Financial,
        title: "Budget Overrun Risk Due to Scope Creep",
        description: "Initial requirements analysis indicates potential for significant scope expansion",
        severity: Severity::Medium,
        probability: 65,
        impact: 60,
        risk_score: 39.0,
        status: RiskStatus::Identified,
        mitigation_strategy: "Establish strict change control processes with impact assessment protocols",
        ai_recommendation: "Implement predictive cost modeling with real-time budget tracking",
        detected_by: "Gap analysis automation",
        timeline: "2024-02-12",
    },
    RiskItem {
        id: "DD-005",
        category: RiskCategory::Operational,
        title: "Knowledge Transfer Dependencies",
        description: "Critical business knowledge concentrated in key personnel poses continuity risk",
        severity: Severity::High,
        probability: 55,
        impact: 85,
        risk_score: 46.75,
        status: RiskStatus::InProgress,
        mitigation_strategy: "Accelerated knowledge documentation and cross-training programs",
        ai_recommendation: "Deploy AI-powered knowledge extraction and automated documentation generation",
        detected_by: "Automated document analysis",
        timeline: "2024-02-15",
    },
];

/// `None` means every category.
pub fn filter_register(category: Option<RiskCategory>) -> Vec<&'static RiskItem> {
    RISK_REGISTER
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total: u32,
    pub critical: usize,
    pub high: usize,
    pub mitigated: usize,
    pub avg_risk_score: i64,
}

/// Register figures blended with whatever the uploaded files contributed.
pub fn summarize(uploads: &UploadStats) -> RiskSummary {
    let register_total: f64 = RISK_REGISTER.iter().map(|r| r.risk_score).sum();
    let register_len = RISK_REGISTER.len() as f64;
    let avg = if uploads.total_files > 0 {
        let files = uploads.total_files as f64;
        (register_total + uploads.average_risk_score as f64 * files) / (register_len + files)
    } else {
        register_total / register_len
    };

    RiskSummary {
        total: RISK_REGISTER.len() as u32 + uploads.total_risks,
        critical: RISK_REGISTER.iter().filter(|r| r.severity == Severity::Critical).count(),
        high: RISK_REGISTER.iter().filter(|r| r.severity == Severity::High).count(),
        mitigated: RISK_REGISTER.iter().filter(|r| r.status == RiskStatus::Mitigated).count(),
        avg_risk_score: avg.round() as i64,
    }
}

// ============================================
// Uploaded file triage records
// ============================================

pub const ACCEPTED_EXTENSIONS: [&str; 8] = ["pdf", "doc", "docx", "xls", "xlsx", "txt", "csv", "json"];

const ACCEPTED_MIME_TYPES: [&str; 8] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "text/csv",
    "application/json",
];

/// The extension decides; the MIME type is only consulted when the name has none.
pub fn is_accepted(file_name: &str, mime_type: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => ACCEPTED_MIME_TYPES.contains(&mime_type),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => RiskBand::Low,
            25..=49 => RiskBand::Medium,
            50..=74 => RiskBand::High,
            _ => RiskBand::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub category: String,
    pub count: u32,
    pub severity: RiskBand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    /// Human-readable size, e.g. "1.5 KB".
    #[serde(default)]
    pub size_label: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub upload_date: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub risk_score: u8,
    pub risk_level: RiskBand,
    pub findings: Vec<Finding>,
    pub mitigation_suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl UploadedFile {
    pub fn analyzing(name: &str, size: u64, mime_type: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size,
            size_label: format_size(size),
            mime_type: mime_type.to_string(),
            upload_date: Utc::now(),
            status: AnalysisStatus::Analyzing,
            risk_score: 0,
            risk_level: RiskBand::Low,
            findings: Vec::new(),
            mitigation_suggestions: Vec::new(),
            warning: None,
        }
    }

    pub fn total_findings(&self) -> u32 {
        self.findings.iter().map(|f| f.count).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadStats {
    pub total_files: u32,
    pub total_risks: u32,
    pub average_risk_score: u32,
    pub total_mitigations: u32,
}

impl UploadStats {
    /// Folds one completed analysis in; the running average is rounded at every step.
    pub fn record(&mut self, file: &UploadedFile) {
        let prior = self.average_risk_score as f64 * self.total_files as f64;
        self.average_risk_score =
            ((prior + file.risk_score as f64) / (self.total_files + 1) as f64).round() as u32;
        self.total_files += 1;
        self.total_risks += file.total_findings();
        self.total_mitigations += file.mitigation_suggestions.len() as u32;
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[exp])
}
