//! Medication regimen transforms.
//!
//! Append / filter-out / map-with-flip over the medication list. Each
//! function returns a new collection; the coordinator persists it as part
//! of the whole user document.

use uuid::Uuid;

use crate::models::Medication;

/// Frequency recorded when the entry form leaves it blank.
pub const DEFAULT_FREQUENCY: &str = "Daily";

/// Construct a medication from form fields.
///
/// The only validation the form performs: an empty name builds nothing.
/// A blank frequency falls back to [`DEFAULT_FREQUENCY`]; `taken_today`
/// always starts false.
pub fn build_medication(name: &str, dosage: &str, frequency: &str) -> Option<Medication> {
    if name.is_empty() {
        return None;
    }
    Some(Medication {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        dosage: dosage.to_string(),
        frequency: if frequency.is_empty() {
            DEFAULT_FREQUENCY.to_string()
        } else {
            frequency.to_string()
        },
        taken_today: false,
    })
}

/// Append a medication.
pub fn add_medication(medications: &[Medication], medication: Medication) -> Vec<Medication> {
    let mut next = medications.to_vec();
    next.push(medication);
    next
}

/// Remove by id. An unknown id is a no-op, never an error.
pub fn remove_medication(medications: &[Medication], id: &str) -> Vec<Medication> {
    medications
        .iter()
        .filter(|m| m.id != id)
        .cloned()
        .collect()
}

/// Flip the daily "taken" toggle on the matching medication.
pub fn toggle_taken(medications: &[Medication], id: &str) -> Vec<Medication> {
    medications
        .iter()
        .map(|m| {
            if m.id == id {
                let mut flipped = m.clone();
                flipped.taken_today = !flipped.taken_today;
                flipped
            } else {
                m.clone()
            }
        })
        .collect()
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
