//! Status-header extraction from raw model output.
//!
//! The model is instructed to start its reply with
//! `STATUS: {"severity": N, "requiresEmergency": B}` followed by advice in
//! natural language. The object is located with a brace-balanced scan
//! (string-literal and escape aware) rather than a first-`}` match, so
//! nested objects and braces inside strings do not truncate it. Every
//! failure mode degrades to the verbatim text with a neutral header —
//! parsing problems must never become user-facing errors.

use serde_json::Value;

use super::GroundingReference;

/// Marker the model leads its status line with.
pub const STATUS_MARKER: &str = "STATUS:";

/// Structured severity/emergency payload embedded in model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusHeader {
    pub severity: i64,
    pub requires_emergency: bool,
}

/// Split raw model text into its status header and the display advice.
///
/// Absent marker or an unparseable object yields the neutral header and
/// the original text verbatim; a parsed header is removed from the advice
/// along with the marker, and the remainder is whitespace-trimmed.
pub fn parse_status_header(text: &str) -> (StatusHeader, String) {
    let Some((span_start, span_end, object)) = extract_status_span(text) else {
        return (StatusHeader::default(), text.to_string());
    };

    match serde_json::from_str::<Value>(object) {
        Ok(status) => {
            let header = StatusHeader {
                severity: status.get("severity").and_then(Value::as_i64).unwrap_or(0),
                requires_emergency: status
                    .get("requiresEmergency")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            };
            let advice = format!("{}{}", &text[..span_start], &text[span_end..])
                .trim()
                .to_string();
            (header, advice)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Malformed status header — showing raw text");
            (StatusHeader::default(), text.to_string())
        }
    }
}

/// Locate the first `STATUS:` marker and the brace-delimited object after
/// it. Returns the byte span of marker-through-closing-brace plus the
/// object slice.
fn extract_status_span(text: &str) -> Option<(usize, usize, &str)> {
    let marker_start = text.find(STATUS_MARKER)?;
    let after_marker = marker_start + STATUS_MARKER.len();

    let gap = text[after_marker..].find(|c: char| !c.is_whitespace())?;
    let object_start = after_marker + gap;
    if !text[object_start..].starts_with('{') {
        return None;
    }

    let object_len = balanced_object_len(&text[object_start..])?;
    let span_end = object_start + object_len;
    Some((marker_start, span_end, &text[object_start..span_end]))
}

/// Byte length of the `{…}` object opening at the start of `s`, honoring
/// nesting, string literals, and escapes. `None` when the braces never
/// balance.
fn balanced_object_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Keep only grounding chunks that expose both a title and a reference
/// link; anything incomplete or malformed is dropped silently.
pub fn filter_grounding_chunks(chunks: &[Value]) -> Vec<GroundingReference> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let title = web.get("title")?.as_str()?;
            let uri = web.get("uri")?.as_str()?;
            if title.is_empty() || uri.is_empty() {
                return None;
            }
            Some(GroundingReference {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
