use serde::{Deserialize, Serialize};

use super::enums::ActivityContext;

/// One symptom journal entry. A user's entry collection holds at most one
/// entry per calendar `date`; writing again for the same date replaces the
/// existing entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalEntry {
    pub id: String,
    /// Calendar day, ISO `YYYY-MM-DD`. Lexicographic order on this string
    /// is chronological order.
    pub date: String,
    /// 0–10; 0 is a wellness day.
    pub pain_level: u8,
    /// Reserved for future trigger tagging.
    pub triggers: Vec<String>,
    pub notes: String,
    pub activity_context: ActivityContext,
    pub is_crisis: bool,
    pub meds_taken: bool,
}
