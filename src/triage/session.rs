//! Triage conversation flow.
//!
//! Owns the transient message log for one chat. Each exchange snapshots
//! the history, asks the assessor, runs the protocol parser over the raw
//! reply, and appends a display-ready message. A failed capability call
//! appends the fixed safety message instead — non-urgent by policy, since
//! the system must not escalate on its own failure.

use uuid::Uuid;

use crate::ai::{Coordinates, CrisisAssessor};
use crate::models::Role;

use super::parser::parse_status_header;
use super::{TriageAssessment, TriageMessage, FALLBACK_ADVICE, GREETING};

pub struct TriageSession {
    messages: Vec<TriageMessage>,
    location: Option<Coordinates>,
}

impl TriageSession {
    /// New conversation, seeded with the agent's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![TriageMessage {
                id: "init".to_string(),
                role: Role::Model,
                text: GREETING.to_string(),
                is_urgent: false,
                grounding_references: Vec::new(),
            }],
            location: None,
        }
    }

    pub fn messages(&self) -> &[TriageMessage] {
        &self.messages
    }

    /// Attach (or clear) best-effort coordinates for Maps grounding.
    pub fn set_location(&mut self, location: Option<Coordinates>) {
        self.location = location;
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Conversation so far as speaker-labelled lines for the model.
    fn history_lines(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|m| match m.role {
                Role::Model => format!("Doctor: {}", m.text),
                Role::User => format!("Patient: {}", m.text),
            })
            .collect()
    }

    /// Send one patient message and append the model's reply.
    ///
    /// The history handed to the assessor excludes the message being sent
    /// (it travels separately). Always appends exactly two messages: the
    /// patient's and either the parsed reply or the fixed fallback.
    pub async fn send(
        &mut self,
        assessor: &dyn CrisisAssessor,
        input: &str,
    ) -> TriageAssessment {
        let history = self.history_lines();

        self.messages.push(TriageMessage {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            text: input.to_string(),
            is_urgent: false,
            grounding_references: Vec::new(),
        });

        let assessment = match assessor.assess_crisis(input, &history, self.location).await {
            Ok(raw) => {
                let (header, advice) = parse_status_header(&raw.text);
                TriageAssessment {
                    severity: header.severity,
                    requires_emergency: header.requires_emergency,
                    advice,
                    grounding_references: raw.grounding,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Crisis assessment failed — using safety fallback");
                TriageAssessment {
                    severity: 0,
                    requires_emergency: false,
                    advice: FALLBACK_ADVICE.to_string(),
                    grounding_references: Vec::new(),
                }
            }
        };

        self.messages.push(TriageMessage {
            id: Uuid::new_v4().to_string(),
            role: Role::Model,
            text: assessment.advice.clone(),
            is_urgent: assessment.requires_emergency,
            grounding_references: assessment.grounding_references.clone(),
        });

        assessment
    }
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
