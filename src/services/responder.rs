//! Canned assistant replies chosen by ordered keyword ladders.
//!
//! Each ladder is evaluated top to bottom and the first rule with a matching keyword wins,
//! so overlapping keywords resolve by position. Keep the order when editing.
use crate::domain::catalog::{PhaseCatalog, DASHBOARD_PHASE, DUE_DILIGENCE_PHASE, KNOWLEDGE_PHASE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DASHBOARD_CONTEXT: &str = "AI Transition Dashboard";
pub const DUE_DILIGENCE_CONTEXT: &str = "Due Diligence";
pub const KNOWLEDGE_CONTEXT: &str = "Knowledge Acquisition";

pub trait ResponseStrategy: Send + Sync {
    fn greeting(&self, context: Option<&str>) -> String;

    /// Deterministic for a given `(text, context)` and catalog.
    fn respond(&self, text: &str, context: Option<&str>) -> String;

    /// Prompts offered while the conversation holds only the greeting.
    fn suggestions(&self) -> &'static [&'static str] {
        &[]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssistantKind {
    #[default]
    Platform,
    Knowledge,
}

impl AssistantKind {
    pub fn strategy(self, catalog: &'static PhaseCatalog) -> Arc<dyn ResponseStrategy> {
        match self {
            AssistantKind::Platform => Arc::new(PlatformAssistant::new(catalog)),
            AssistantKind::Knowledge => Arc::new(KnowledgeAssistant),
        }
    }
}

/// `text` is the caller's message as typed, for templates that quote it back.
type Template = fn(&PhaseCatalog, &str) -> String;

struct Rule {
    keywords: &'static [&'static str],
    reply: Template,
}

fn first_match<'r>(rules: &'r [Rule], lowered: &str) -> Option<&'r Rule> {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
}

fn metric_or(catalog: &PhaseCatalog, phase_id: &str, label: &str, default: &str) -> String {
    catalog
        .phase(phase_id)
        .and_then(|p| p.metric(label))
        .map(|m| m.value.to_string())
        .unwrap_or_else(|| default.to_string())
}

fn progress_or(catalog: &PhaseCatalog, phase_id: &str, default: u8) -> u8 {
    catalog.phase(phase_id).map(|p| p.progress).unwrap_or(default)
}

// ============================================
// Platform assistant
// ============================================

const DASHBOARD_RULES: &[Rule] = &[
    Rule {
        keywords: &["metric", "kpi"],
        reply: |catalog, _| {
            let uptime = metric_or(catalog, DASHBOARD_PHASE, "System Uptime", "99.8%");
            let speed = metric_or(catalog, DASHBOARD_PHASE, "Data Processing Speed", "2.3s");
            let satisfaction = metric_or(catalog, DASHBOARD_PHASE, "User Satisfaction", "4.7/5");
            format!(
                "For Dashboard Management, key metrics include system uptime (currently {uptime}), data processing speed ({speed}), and user satisfaction ({satisfaction}). I can help you analyze trends and set up automated alerts for any metric thresholds."
            )
        },
    },
    Rule {
        keywords: &["ai", "implementation"],
        reply: |_, _| {
            "AI implementations in this phase include predictive analytics for resource allocation, automated alert systems, real-time performance monitoring, and intelligent data visualization. Would you like me to explain any specific implementation?".to_string()
        },
    },
];

const DUE_DILIGENCE_RULES: &[Rule] = &[Rule {
    keywords: &["risk", "compliance"],
    reply: |catalog, _| {
        let risks = metric_or(catalog, DUE_DILIGENCE_PHASE, "Risks Identified", "47");
        let compliance = metric_or(catalog, DUE_DILIGENCE_PHASE, "Compliance Score", "94%");
        let documents = metric_or(catalog, DUE_DILIGENCE_PHASE, "Documents Analyzed", "12,450");
        format!(
            "Our AI-powered due diligence has identified {risks} risks with a {compliance} compliance score. The automated document analysis has processed {documents} documents. I can provide detailed risk breakdowns or compliance gap analysis."
        )
    },
}];

const KNOWLEDGE_RULES: &[Rule] = &[Rule {
    keywords: &["knowledge", "documentation"],
    reply: |catalog, _| {
        let items = metric_or(catalog, KNOWLEDGE_PHASE, "Knowledge Items", "8,920");
        let accuracy = metric_or(catalog, KNOWLEDGE_PHASE, "Accuracy Rate", "92%");
        format!(
            "We've extracted {items} knowledge items with {accuracy} accuracy. The AI uses NLP for documentation, generates knowledge graphs, and creates automated training materials. Need help with specific knowledge areas?"
        )
    },
}];

const GENERAL_RULES: &[Rule] = &[
    Rule {
        keywords: &["progress", "status"],
        reply: |catalog, _| {
            let overall = catalog.framework().overall_progress;
            let dashboard = progress_or(catalog, DASHBOARD_PHASE, 75);
            let due_diligence = progress_or(catalog, DUE_DILIGENCE_PHASE, 100);
            let knowledge = progress_or(catalog, KNOWLEDGE_PHASE, 60);
            format!(
                "The overall Cognizant Neuro AI Transition Platform is {overall}% complete. AI Transition Dashboard ({dashboard}%), Due Diligence ({due_diligence}%), and Knowledge Acquisition ({knowledge}%) are the most advanced phases. Would you like details on any specific phase?"
            )
        },
    },
    Rule {
        keywords: &["ai", "artificial intelligence"],
        reply: |_, _| {
            "Cognizant Neuro AI is integrated across all transition phases to reduce dependency, control costs, and improve effectiveness. Each phase uses specialized AI implementations like predictive analytics, NLP, automated testing, and intelligent monitoring.".to_string()
        },
    },
    Rule {
        keywords: &["help", "assistance"],
        reply: |_, _| {
            "I can help you with: \n• Phase-specific guidance and metrics\n• AI implementation strategies\n• Risk assessment and mitigation\n• Progress tracking and reporting\n• Best practices for transition management\n\nWhat would you like to explore?".to_string()
        },
    },
];

const PLATFORM_FALLBACK: &str = "I understand you're asking about the Cognizant Neuro AI Transition Platform. Could you be more specific about which phase or aspect you'd like to discuss? I can provide insights on progress, AI implementations, metrics, or best practices.";

fn context_rules(context: &str) -> Option<&'static [Rule]> {
    match context {
        DASHBOARD_CONTEXT => Some(DASHBOARD_RULES),
        DUE_DILIGENCE_CONTEXT => Some(DUE_DILIGENCE_RULES),
        KNOWLEDGE_CONTEXT => Some(KNOWLEDGE_RULES),
        _ => None,
    }
}

/// General-purpose transition assistant. Metric figures come from the catalog at call time.
pub struct PlatformAssistant {
    catalog: &'static PhaseCatalog,
}

impl PlatformAssistant {
    pub fn new(catalog: &'static PhaseCatalog) -> Self {
        Self { catalog }
    }
}

impl ResponseStrategy for PlatformAssistant {
    fn greeting(&self, context: Option<&str>) -> String {
        let tail = match context {
            Some(label) => format!("I can help you with questions about the {label} phase."),
            None => "How can I help you today?".to_string(),
        };
        format!("Hello! I'm your Cognizant Neuro AI assistant for the transition platform. {tail}")
    }

    fn respond(&self, text: &str, context: Option<&str>) -> String {
        let lowered = text.to_lowercase();
        let contextual = context
            .and_then(context_rules)
            .and_then(|rules| first_match(rules, &lowered));

        contextual
            .or_else(|| first_match(GENERAL_RULES, &lowered))
            .map(|rule| (rule.reply)(self.catalog, text))
            .unwrap_or_else(|| PLATFORM_FALLBACK.to_string())
    }
}

// ============================================
// Knowledge base assistant
// ============================================

const KNOWLEDGE_ASSISTANT_RULES: &[Rule] = &[
    Rule {
        keywords: &["extraction", "recent"],
        reply: |_, _| {
            "Here are the recent extractions: 1,240 knowledge items processed this week with 94% accuracy. Key domains include system architecture (35%), business processes (28%), and technical documentation (37%).".to_string()
        },
    },
    Rule {
        keywords: &["workflow", "process"],
        reply: |_, _| {
            "Our workflow process includes: 1) Document ingestion → 2) AI-powered analysis → 3) Knowledge extraction → 4) Quality validation → 5) Knowledge base integration. Average processing time is 1.2 hours per document.".to_string()
        },
    },
    Rule {
        keywords: &["summary", "overview"],
        reply: |_, _| {
            "Knowledge Base Summary: 8,920 total items, 92% accuracy rate, covering 15 business domains. Top categories: Technical docs (40%), Process guides (30%), Policy documents (20%), Training materials (10%).".to_string()
        },
    },
    Rule {
        keywords: &["help", "what can you do"],
        reply: |_, _| {
            "I can assist with: Knowledge extraction status, Document analysis results, Process documentation, Technical queries, System architecture insights, and Business process explanations.".to_string()
        },
    },
];

/// Knowledge-base assistant shown on the knowledge acquisition tab. Ignores the context label.
pub struct KnowledgeAssistant;

impl ResponseStrategy for KnowledgeAssistant {
    fn greeting(&self, _context: Option<&str>) -> String {
        "Hello! I'm your Transition Risk AI Assistant. I can help you with finding specific documentation, explaining business processes, knowledge extraction insights, and technical documentation queries. What would you like to know?".to_string()
    }

    fn respond(&self, text: &str, _context: Option<&str>) -> String {
        let lowered = text.to_lowercase();
        match first_match(KNOWLEDGE_ASSISTANT_RULES, &lowered) {
            Some(rule) => (rule.reply)(PhaseCatalog::global(), text),
            None => format!(
                "I understand you're asking about \"{text}\". Based on our knowledge base, I can provide insights on knowledge extraction, documentation analysis, and process optimization. Could you be more specific about what aspect you'd like to explore?"
            ),
        }
    }

    fn suggestions(&self) -> &'static [&'static str] {
        &[
            "Show me recent extractions",
            "Explain workflow process",
            "Knowledge base summary",
        ]
    }
}
