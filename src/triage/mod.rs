//! AI triage chat — protocol types, status-header parsing, and the
//! conversation session.
//!
//! The external model is asked to lead its reply with a structured status
//! line; [`parser`] extracts it and strips it from the displayed advice,
//! degrading to the verbatim text when the protocol is absent or
//! malformed. [`session`] owns the transient message log and the
//! fixed-fallback policy for capability failures.

pub mod parser;
pub mod session;

pub use parser::{filter_grounding_chunks, parse_status_header, StatusHeader};
pub use session::TriageSession;

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Greeting seeded into every new triage conversation.
pub const GREETING: &str = "Hello. I am Dr. Gemini, your dedicated medical agent. I can see your location and help find nearby care if needed. \n\nPlease describe your symptoms in detail.";

/// Fixed safety message substituted when the triage capability is
/// unreachable. Deliberately not urgent — the system does not escalate on
/// its own failure.
pub const FALLBACK_ADVICE: &str =
    "I am having trouble connecting to my medical systems. If you are in pain, please call 911.";

/// An external citation (place/result link) attached to an AI response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingReference {
    pub title: String,
    pub uri: String,
}

/// One chat bubble. Transient — never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub is_urgent: bool,
    pub grounding_references: Vec<GroundingReference>,
}

/// Outcome of one triage exchange, after protocol parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageAssessment {
    pub severity: i64,
    pub requires_emergency: bool,
    pub advice: String,
    pub grounding_references: Vec<GroundingReference>,
}
