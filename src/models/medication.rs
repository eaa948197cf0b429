use serde::{Deserialize, Serialize};

/// A medication in the patient's regimen.
///
/// `taken_today` is a plain toggle; it is never time-partitioned and is
/// independent of the journal's per-day `meds_taken` flag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub taken_today: bool,
}
