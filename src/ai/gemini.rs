//! Gemini REST client — the hosted implementation of the AI capabilities.
//!
//! One thin `generateContent` wrapper per capability, with the failure
//! policies the rest of the core relies on: triage failures surface as
//! [`CapabilityError`] (the session substitutes its fixed safety message),
//! analysis failures collapse to fixed strings, and image failures
//! collapse to `None`.

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::JournalEntry;
use crate::triage::parser::filter_grounding_chunks;

use super::prompts;
use super::{
    CapabilityError, Coordinates, CrisisAssessor, PatternAnalyst, RawAssessment, SceneGenerator,
    SceneImage,
};

pub const TRIAGE_MODEL: &str = "gemini-2.5-flash";
pub const ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reply text used when the service answers without any text part.
const NO_TEXT_REPLY: &str = "I am unable to process your request at this moment.";
const EMPTY_JOURNAL_REPLY: &str = "No journal entries to analyze yet.";
const NO_PATTERNS_REPLY: &str = "No patterns detected yet.";
const ANALYSIS_FAILED_REPLY: &str = "Unable to analyze patterns at this time.";

// ═══════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<Value>,
}

// ═══════════════════════════════════════════
// Client
// ═══════════════════════════════════════════

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the key from `API_KEY` (or `GEMINI_API_KEY`).
    pub fn from_env() -> Result<Self, CapabilityError> {
        std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map(Self::new)
            .map_err(|_| {
                CapabilityError::NotConfigured("API_KEY is not set".to_string())
            })
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CapabilityError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

// ═══════════════════════════════════════════
// Request builders / response readers
// ═══════════════════════════════════════════

fn triage_request(
    message: &str,
    history: &[String],
    location: Option<Coordinates>,
) -> GenerateContentRequest {
    let history_context = history.join("\n");
    let mut parts = vec![Part {
        text: prompts::triage_prompt(&history_context),
    }];
    if !message.is_empty() {
        parts.push(Part {
            text: message.to_string(),
        });
    }

    GenerateContentRequest {
        contents: vec![Content { parts }],
        tools: Some(json!([{ "googleMaps": {} }])),
        tool_config: location.map(|loc| {
            json!({
                "retrievalConfig": {
                    "latLng": { "latitude": loc.latitude, "longitude": loc.longitude }
                }
            })
        }),
        generation_config: None,
    }
}

fn analysis_request(entries: &[JournalEntry]) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompts::analysis_prompt(&prompts::format_entries_for_analysis(entries)),
            }],
        }],
        tools: None,
        tool_config: None,
        generation_config: None,
    }
}

fn scene_request(theme: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompts::scene_prompt(theme),
            }],
        }],
        tools: None,
        tool_config: None,
        generation_config: Some(json!({
            "imageConfig": { "aspectRatio": "16:9", "imageSize": "1K" }
        })),
    }
}

fn first_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.text.clone())
}

fn grounding_chunks(response: &GenerateContentResponse) -> Vec<Value> {
    response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.clone())
        .unwrap_or_default()
}

fn first_inline_image(response: &GenerateContentResponse) -> Option<SceneImage> {
    let parts = &response.candidates.first()?.content.as_ref()?.parts;
    for part in parts {
        let Some(inline) = &part.inline_data else {
            continue;
        };
        let Some(data) = &inline.data else { continue };
        match base64::engine::general_purpose::STANDARD.decode(data) {
            Ok(bytes) => {
                return Some(SceneImage {
                    mime_type: inline
                        .mime_type
                        .clone()
                        .unwrap_or_else(|| "image/png".to_string()),
                    bytes,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Undecodable inline image part — skipping");
            }
        }
    }
    None
}

// ═══════════════════════════════════════════
// Capability implementations
// ═══════════════════════════════════════════

#[async_trait]
impl CrisisAssessor for GeminiClient {
    async fn assess_crisis(
        &self,
        message: &str,
        history: &[String],
        location: Option<Coordinates>,
    ) -> Result<RawAssessment, CapabilityError> {
        let request = triage_request(message, history, location);
        let response = self.generate(TRIAGE_MODEL, &request).await?;

        let text = first_text(&response).unwrap_or_else(|| NO_TEXT_REPLY.to_string());
        let grounding = filter_grounding_chunks(&grounding_chunks(&response));
        Ok(RawAssessment { text, grounding })
    }
}

#[async_trait]
impl PatternAnalyst for GeminiClient {
    async fn analyze_patterns(&self, entries: &[JournalEntry]) -> String {
        if entries.is_empty() {
            return EMPTY_JOURNAL_REPLY.to_string();
        }

        let request = analysis_request(entries);
        match self.generate(ANALYSIS_MODEL, &request).await {
            Ok(response) => {
                first_text(&response).unwrap_or_else(|| NO_PATTERNS_REPLY.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "Pattern analysis failed");
                ANALYSIS_FAILED_REPLY.to_string()
            }
        }
    }
}

#[async_trait]
impl SceneGenerator for GeminiClient {
    async fn generate_scene(&self, theme: &str) -> Option<SceneImage> {
        let request = scene_request(theme);
        match self.generate(IMAGE_MODEL, &request).await {
            Ok(response) => first_inline_image(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Scene generation failed");
                None
            }
        }
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
