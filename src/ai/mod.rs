//! External AI and geolocation capabilities.
//!
//! The core consumes these as traits so tests (and a future on-device
//! model) can stand in for the hosted service. [`gemini`] is the real
//! implementation; [`prompts`] holds the instruction templates.

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::JournalEntry;
use crate::triage::GroundingReference;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI capability not configured: {0}")]
    NotConfigured(String),

    #[error("AI capability unavailable: {0}")]
    Unavailable(String),
}

/// Best-effort device position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw triage reply: model text plus the grounding references that came
/// with it. Status-header parsing happens in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssessment {
    pub text: String,
    pub grounding: Vec<GroundingReference>,
}

/// Decoded generated scene image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Conversational symptom triage.
#[async_trait]
pub trait CrisisAssessor: Send + Sync {
    /// Assess the patient's message in the context of the conversation so
    /// far. May fail; the triage session substitutes the fixed safety
    /// message on failure.
    async fn assess_crisis(
        &self,
        message: &str,
        history: &[String],
        location: Option<Coordinates>,
    ) -> Result<RawAssessment, CapabilityError>;
}

/// Journal trend analysis.
#[async_trait]
pub trait PatternAnalyst: Send + Sync {
    /// Summarize triggers and correlations across entries. Never fails:
    /// an empty journal yields a fixed message without any network call,
    /// and request failures yield a fixed "unable to analyze" message.
    async fn analyze_patterns(&self, entries: &[JournalEntry]) -> String;
}

/// Relaxation-scene image generation.
#[async_trait]
pub trait SceneGenerator: Send + Sync {
    /// Generate a background for the given theme. Absent on any failure;
    /// callers must tolerate `None`.
    async fn generate_scene(&self, theme: &str) -> Option<SceneImage>;
}

/// Best-effort device geolocation.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Option<Coordinates>;
}

/// Permission-denied fallback: triage proceeds without coordinates.
pub struct NoGeolocation;

#[async_trait]
impl GeolocationProvider for NoGeolocation {
    async fn current_position(&self) -> Option<Coordinates> {
        None
    }
}
