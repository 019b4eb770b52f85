use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl PhaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseStatus::NotStarted => "NOT STARTED",
            PhaseStatus::InProgress => "IN PROGRESS",
            PhaseStatus::Completed => "COMPLETED",
            PhaseStatus::OnHold => "ON HOLD",
        }
    }
}

/// A metric value is shown verbatim, so both textual ("99.8%") and numeric values are kept.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

impl Metric {
    /// Empty change strings are treated as "no indicator".
    pub fn new(label: &str, value: &str, change: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            change: (!change.is_empty()).then(|| change.to_string()),
        }
    }

    pub fn trend(&self) -> Option<Trend> {
        self.change.as_deref().map(|c| {
            if c.starts_with('+') {
                Trend::Up
            } else {
                Trend::Down
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: PhaseStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub ai_implementations: Vec<String>,
    pub key_metrics: Vec<Metric>,
}

impl Phase {
    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.key_metrics.iter().find(|m| m.label == label)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransitionFramework {
    pub id: String,
    pub name: String,
    pub description: String,
    pub overall_progress: u8,
    pub start_date: String,
    pub estimated_end_date: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Analyst,
    Viewer,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub message: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ChatMessage {
    pub fn new(message: impl Into<String>, sender: Sender, context: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            sender,
            timestamp: Utc::now(),
            context: context.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_change_indicator() {
        let up = Metric::new("Compliance Score", "94%", "+8%");
        let down = Metric::new("Risks Identified", "47", "-12%");
        let none = Metric::new("Error Rate", "TBD", "");

        assert_eq!(up.trend(), Some(Trend::Up));
        assert_eq!(down.trend(), Some(Trend::Down));
        assert_eq!(none.change, None);
        assert_eq!(none.trend(), None);
    }

    #[test]
    fn test_metric_value_accepts_numbers_and_strings() {
        let parsed: Metric =
            serde_json::from_str(r#"{"label":"Incidents","value":3}"#).unwrap();
        assert_eq!(parsed.value, MetricValue::Number(3.0));
        assert_eq!(parsed.value.to_string(), "3");

        let parsed: Metric =
            serde_json::from_str(r#"{"label":"Uptime","value":"99.8%","change":"+0.2%"}"#).unwrap();
        assert_eq!(parsed.value.to_string(), "99.8%");
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PhaseStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let role: UserRole = serde_json::from_str("\"analyst\"").unwrap();
        assert_eq!(role, UserRole::Analyst);
    }
}
