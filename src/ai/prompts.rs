//! Instruction templates for the hosted model.

use chrono::NaiveDate;

use crate::models::JournalEntry;

/// System framing for the triage conversation. The status line it demands
/// is what `triage::parser` extracts.
pub fn triage_prompt(history_context: &str) -> String {
    format!(
        r#"You are Dr. Gemini, an expert Hematologist and dedicated medical AI agent specializing in Sickle Cell Disease.

Patient History Context:
{history_context}

INSTRUCTIONS:
1. Analyze the input for pain severity (0-10) and emergency symptoms.
2. If the user asks for hospitals, doctors, or help nearby, USE the Google Maps tool to find real locations based on their coordinates.
3. **CRITICAL OUTPUT FORMAT**:
   Start your response strictly with a status line in this format:
   "STATUS: {{ "severity": 7, "requiresEmergency": true }}"

   Then provide your empathetic, clinical advice and map details (if applicable) in natural language below that line.

Red Flags (Emergency): Chest pain, fever > 101F, difficulty breathing, seizure, inability to move."#
    )
}

/// Pattern-recognition task over the formatted journal lines.
pub fn analysis_prompt(entries_text: &str) -> String {
    format!(
        r#"Analyze these Sickle Cell pain journal entries for patterns and correlations.

Data:
{entries_text}

Tasks:
1. Identify correlation between pain and specific days of the week (e.g., Work days vs Weekends).
2. Identify context triggers (School, Work, Exercise).
3. Look for weather or hydration patterns in the notes.

Output a helpful, medical-style summary in 3 concise paragraphs. Use bolding for key findings."#
    )
}

/// Image-generation instruction for a relaxation background.
pub fn scene_prompt(theme: &str) -> String {
    format!(
        "Generate a high-quality, photorealistic, serene, wide-angle image for VR meditation. \
         Theme: {theme}. Soft lighting, calming colors, no text, atmospheric."
    )
}

/// One journal entry per line, weekday spelled out so the model can spot
/// day-of-week correlations.
pub fn format_entries_for_analysis(entries: &[JournalEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let weekday = NaiveDate::parse_from_str(&e.date, "%Y-%m-%d")
                .map(|d| d.format("%A").to_string())
                .unwrap_or_else(|_| "Unknown".to_string());
            format!(
                "Date: {} ({}), Context: {}, Pain Level: {}, Notes: {}",
                e.date, weekday, e.activity_context, e.pain_level, e.notes
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityContext;

    #[test]
    fn triage_prompt_embeds_history_and_protocol() {
        let prompt = triage_prompt("Patient: my knees ache");
        assert!(prompt.contains("Patient: my knees ache"));
        assert!(prompt.contains(r#""STATUS: { "severity": 7, "requiresEmergency": true }""#));
    }

    #[test]
    fn entries_format_with_weekday_names() {
        let entry = JournalEntry {
            id: "e1".into(),
            date: "2025-03-03".into(), // a Monday
            pain_level: 6,
            notes: "long shift".into(),
            activity_context: ActivityContext::Work,
            ..Default::default()
        };
        let text = format_entries_for_analysis(&[entry]);
        assert_eq!(
            text,
            "Date: 2025-03-03 (Monday), Context: Work, Pain Level: 6, Notes: long shift"
        );
    }

    #[test]
    fn unparseable_date_formats_as_unknown_weekday() {
        let entry = JournalEntry {
            date: "someday".into(),
            ..Default::default()
        };
        let text = format_entries_for_analysis(&[entry]);
        assert!(text.contains("(Unknown)"));
    }

    #[test]
    fn scene_prompt_wraps_theme() {
        let prompt = scene_prompt("bioluminescent beach at dusk");
        assert!(prompt.contains("bioluminescent beach at dusk"));
        assert!(prompt.contains("no text"));
    }
}
