use crate::domain::catalog::{DATA_CLEANUP_PHASE, DUE_DILIGENCE_PHASE, KNOWLEDGE_PHASE};
use crate::domain::models::{Phase, PhaseStatus};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseTab {
    Overview,
    Metrics,
    Ai,
    Risks,
    Timeline,
    AgenticAiRisks,
    MitigationPlan,
    KnowledgeAiAssist,
}

impl PhaseTab {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseTab::Overview => "Overview",
            PhaseTab::Metrics => "Detailed Metrics",
            PhaseTab::Ai => "Agentic AI Analysis",
            PhaseTab::Risks => "Risk Assessment",
            PhaseTab::Timeline => "Timeline",
            PhaseTab::AgenticAiRisks => "Risk Agentic AI",
            PhaseTab::MitigationPlan => "Mitigation Plan",
            PhaseTab::KnowledgeAiAssist => "Transition Risk Agentic AI",
        }
    }
}

/// Tabs in display order; the first entry is the default tab.
pub fn tabs_for(phase: &Phase) -> Vec<PhaseTab> {
    match phase.id.as_str() {
        DUE_DILIGENCE_PHASE => vec![
            PhaseTab::AgenticAiRisks,
            PhaseTab::MitigationPlan,
            PhaseTab::Timeline,
        ],
        KNOWLEDGE_PHASE => vec![
            PhaseTab::Overview,
            PhaseTab::KnowledgeAiAssist,
            PhaseTab::Metrics,
            PhaseTab::Risks,
            PhaseTab::Timeline,
        ],
        _ => vec![
            PhaseTab::Overview,
            PhaseTab::Metrics,
            PhaseTab::Ai,
            PhaseTab::Risks,
            PhaseTab::Timeline,
        ],
    }
}

/// The knowledge phase opens on its assistant tab rather than on the first tab.
pub fn default_tab(phase: &Phase) -> PhaseTab {
    if phase.id == KNOWLEDGE_PHASE {
        return PhaseTab::KnowledgeAiAssist;
    }
    tabs_for(phase)
        .first()
        .copied()
        .unwrap_or(PhaseTab::Overview)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseRisk {
    pub category: &'static str,
    pub level: RiskLevel,
    pub description: &'static str,
    pub mitigation: &'static str,
}

pub fn assess_risks(phase: &Phase) -> Vec<PhaseRisk> {
    let technical = if phase.progress > 70 {
        RiskLevel::Low
    } else if phase.progress > 40 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };
    let timeline = match phase.status {
        PhaseStatus::Completed => RiskLevel::Low,
        PhaseStatus::InProgress => RiskLevel::Medium,
        _ => RiskLevel::High,
    };
    let data_quality = if phase.id == DATA_CLEANUP_PHASE {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    vec![
        PhaseRisk {
            category: "Technical",
            level: technical,
            description: "Integration complexity and technical debt mitigation",
            mitigation: "Regular code reviews and automated testing",
        },
        PhaseRisk {
            category: "Timeline",
            level: timeline,
            description: "Potential delays in phase completion",
            mitigation: "Agile methodology and continuous monitoring",
        },
        PhaseRisk {
            category: "Resource",
            level: RiskLevel::Medium,
            description: "Team capacity and skill availability",
            mitigation: "Cross-training and external consultation",
        },
        PhaseRisk {
            category: "Data Quality",
            level: data_quality,
            description: "Data integrity and migration challenges",
            mitigation: "AI-powered data validation and cleanup",
        },
    ]
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Completed,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: &'static str,
    pub status: EventStatus,
    pub description: &'static str,
}

fn staged(progress: u8, done_above: u8, active_above: Option<u8>) -> EventStatus {
    if progress > done_above {
        EventStatus::Completed
    } else if active_above.is_some_and(|a| progress > a) {
        EventStatus::InProgress
    } else {
        EventStatus::Pending
    }
}

pub fn timeline(phase: &Phase) -> Vec<TimelineEvent> {
    let p = phase.progress;
    let events = [
        (
            phase.start_date.clone(),
            "Phase Initiation",
            EventStatus::Completed,
            "Project kickoff and team assembly",
        ),
        (
            Some("2024-02-01".to_string()),
            "Requirements Gathering",
            EventStatus::Completed,
            "Stakeholder interviews and documentation",
        ),
        (
            Some("2024-02-15".to_string()),
            "AI Implementation Planning",
            staged(p, 30, None),
            "Technology stack selection and architecture design",
        ),
        (
            Some("2024-03-01".to_string()),
            "Development Phase",
            staged(p, 50, Some(30)),
            "Core development and testing",
        ),
        (
            Some("2024-03-15".to_string()),
            "Testing & Validation",
            staged(p, 70, Some(50)),
            "Comprehensive testing and quality assurance",
        ),
        (
            phase.end_date.clone(),
            "Phase Completion",
            if phase.status == PhaseStatus::Completed {
                EventStatus::Completed
            } else {
                EventStatus::Pending
            },
            "Final deliverables and handover",
        ),
    ];

    events
        .into_iter()
        .filter_map(|(date, event, status, description)| {
            date.map(|date| TimelineEvent {
                date,
                event,
                status,
                description,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::PhaseCatalog;

    #[test]
    fn test_tabs_per_phase() {
        let catalog = PhaseCatalog::global();
        let dd = catalog.phase(DUE_DILIGENCE_PHASE).unwrap();
        assert_eq!(default_tab(dd), PhaseTab::AgenticAiRisks);
        assert_eq!(tabs_for(dd).len(), 3);

        let knowledge = catalog.phase(KNOWLEDGE_PHASE).unwrap();
        assert_eq!(default_tab(knowledge), PhaseTab::KnowledgeAiAssist);

        let reports = catalog.phase("reports").unwrap();
        assert_eq!(default_tab(reports), PhaseTab::Overview);
        assert!(tabs_for(reports).contains(&PhaseTab::Ai));
    }

    #[test]
    fn test_risk_levels_follow_progress_and_status() {
        let catalog = PhaseCatalog::global();
        let risks = assess_risks(catalog.phase(DUE_DILIGENCE_PHASE).unwrap());
        assert_eq!(risks[0].level, RiskLevel::Low);
        assert_eq!(risks[1].level, RiskLevel::Low);

        let risks = assess_risks(catalog.phase("stabilization").unwrap());
        assert_eq!(risks[0].level, RiskLevel::High);
        assert_eq!(risks[1].level, RiskLevel::High);

        let risks = assess_risks(catalog.phase(DATA_CLEANUP_PHASE).unwrap());
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert_eq!(risks[3].level, RiskLevel::High);
    }

    #[test]
    fn test_timeline_drops_undated_events() {
        let mut phase = PhaseCatalog::global().phase(KNOWLEDGE_PHASE).unwrap().clone();
        let events = timeline(&phase);
        assert_eq!(events.len(), 6);
        // progress 60: development done, testing underway
        assert_eq!(events[3].status, EventStatus::Completed);
        assert_eq!(events[4].status, EventStatus::InProgress);
        assert_eq!(events[5].status, EventStatus::Pending);

        phase.end_date = None;
        assert_eq!(timeline(&phase).len(), 5);
    }
}
