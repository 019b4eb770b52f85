pub mod chat;
pub mod latency;
pub mod report;
pub mod responder;
pub mod triage;
