use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MitigationStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MitigationItem {
    pub id: String,
    pub risk_id: String,
    pub risk_title: String,
    pub priority: Priority,
    pub strategy: String,
    pub actions: Vec<String>,
    pub owner: String,
    pub timeline: String,
    pub status: MitigationStatus,
    pub estimated_cost: String,
    pub expected_outcome: String,
}

impl MitigationItem {
    /// Cost strings look like "$120,000"; every digit counts, anything else is ignored.
    pub fn cost_value(&self) -> u64 {
        self.estimated_cost
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0u64, |acc, d| acc * 10 + d as u64)
    }
}

struct SeedMitigation<'a> {
    id: &'a str,
    risk_id: &'a str,
    risk_title: &'a str,
    priority: Priority,
    strategy: &'a str,
    actions: [&'a str; 5],
    owner: &'a str,
    timeline: &'a str,
    status: MitigationStatus,
    estimated_cost: &'a str,
    expected_outcome: &'a str,
}

const SEED_MITIGATIONS: [SeedMitigation<'static>; 5] = [
    SeedMitigation {
        id: "MIT-001",
        risk_id: "DD-001",
        risk_title: "Legacy System Integration Complexity",
        priority: Priority::High,
        strategy: "Implement API gateway with transformation layers and gradual migration approach",
        actions: [
            "Deploy containerized microservices architecture",
            "Implement API gateway for legacy system integration",
            "Create data transformation middleware",
            "Establish rollback procedures for critical systems",
            "Conduct phased migration testing",
        ],
        owner: "Technical Architecture Team",
        timeline: "6-8 weeks",
        status: MitigationStatus::InProgress,
        estimated_cost: "$120,000",
        expected_outcome: "Seamless integration with 99.5% uptime during transition",
    },
    SeedMitigation {
        id: "MIT-002",
        risk_id: "DD-002",
        risk_title: "Data Privacy Regulation Gaps",
        priority: Priority::Critical,
        strategy: "Implement comprehensive data governance framework with automated compliance monitoring",
        actions: [
            "Deploy AI-powered data classification system",
            "Implement automated privacy protection controls",
            "Establish data lineage tracking",
            "Create compliance monitoring dashboard",
            "Conduct regular compliance audits",
        ],
        owner: "Compliance & Legal Team",
        timeline: "4-6 weeks",
        status: MitigationStatus::NotStarted,
        estimated_cost: "$85,000",
        expected_outcome: "100% compliance with GDPR and regional privacy laws",
    },
    SeedMitigation {
        id: "MIT-003",
        risk_id: "DD-003",
        risk_title: "Insufficient Access Control Mechanisms",
        priority: Priority::High,
        strategy: "Implement zero-trust security model with multi-factor authentication",
        actions: [
            "Deploy behavioral analytics for anomaly detection",
            "Implement multi-factor authentication system",
            "Create role-based access control matrix",
            "Establish automated threat response protocols",
            "Conduct security awareness training",
        ],
        owner: "Cybersecurity Team",
        timeline: "3-4 weeks",
        status: MitigationStatus::Completed,
        estimated_cost: "$45,000",
        expected_outcome: "Zero security breaches with enhanced user access monitoring",
    },
    SeedMitigation {
        id: "MIT-004",
        risk_id: "DD-004",
        risk_title: "Budget Overrun Risk Due to Scope Creep",
        priority: Priority::Medium,
        strategy: "Establish strict change control processes with impact assessment protocols",
        actions: [
            "Implement predictive cost modeling system",
            "Create real-time budget tracking dashboard",
            "Establish change request approval workflow",
            "Conduct weekly budget review meetings",
            "Deploy automated cost alerting system",
        ],
        owner: "Project Management Office",
        timeline: "2-3 weeks",
        status: MitigationStatus::InProgress,
        estimated_cost: "$25,000",
        expected_outcome: "Budget variance reduced to <5% with improved project predictability",
    },
    SeedMitigation {
        id: "MIT-005",
        risk_id: "DD-005",
        risk_title: "Knowledge Transfer Dependencies",
        priority: Priority::High,
        strategy: "Accelerated knowledge documentation and cross-training programs",
        actions: [
            "Deploy AI-powered knowledge extraction tools",
            "Create automated documentation generation system",
            "Establish cross-functional training programs",
            "Implement knowledge repository with search capabilities",
            "Conduct knowledge validation sessions",
        ],
        owner: "Knowledge Management Team",
        timeline: "5-7 weeks",
        status: MitigationStatus::Blocked,
        estimated_cost: "$65,000",
        expected_outcome: "95% knowledge retention with reduced dependency on key personnel",
    },
];

pub fn mitigation_items() -> Vec<MitigationItem> {
    SEED_MITIGATIONS
        .iter()
        .map(|s| MitigationItem {
            id: s.id.to_string(),
            risk_id: s.risk_id.to_string(),
            risk_title: s.risk_title.to_string(),
            priority: s.priority,
            strategy: s.strategy.to_string(),
            actions: s.actions.iter().map(|a| a.to_string()).collect(),
            owner: s.owner.to_string(),
            timeline: s.timeline.to_string(),
            status: s.status,
            estimated_cost: s.estimated_cost.to_string(),
            expected_outcome: s.expected_outcome.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MitigationOverview {
    pub total_mitigations: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub total_cost: u64,
}

pub fn overview(items: &[MitigationItem]) -> MitigationOverview {
    let count = |status: MitigationStatus| items.iter().filter(|m| m.status == status).count();
    MitigationOverview {
        total_mitigations: items.len(),
        completed: count(MitigationStatus::Completed),
        in_progress: count(MitigationStatus::InProgress),
        blocked: count(MitigationStatus::Blocked),
        total_cost: items.iter().map(MitigationItem::cost_value).sum(),
    }
}
