use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::DEFAULT_SICKLE_CELL_TYPE;
use super::journal::JournalEntry;
use super::medication::Medication;

/// Public identity shape. The account password lives only in the store's
/// internal user table and is never part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Care-team and emergency details, all optional free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInfo {
    pub doctor_name: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub blood_type: String,
}

/// The full per-user persisted aggregate: regimen, journal, condition
/// code, and patient info. One document per account, overwritten whole on
/// every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub medications: Vec<Medication>,
    pub entries: Vec<JournalEntry>,
    pub sickle_cell_type: String,
    pub patient_info: PatientInfo,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            medications: Vec::new(),
            entries: Vec::new(),
            sickle_cell_type: DEFAULT_SICKLE_CELL_TYPE.to_string(),
            patient_info: PatientInfo::default(),
        }
    }
}

impl UserData {
    /// Deep-merge a stored document over the default shape.
    ///
    /// Documents written by older client versions may miss fields added
    /// since (`patientInfo` arrived after launch); the merge back-fills
    /// every default field without clobbering anything the stored document
    /// already carries. A document that no longer deserializes after the
    /// merge degrades to the default shape.
    pub fn merged_with_defaults(stored: Value) -> Self {
        let mut base = serde_json::to_value(UserData::default())
            .expect("default document serializes");
        deep_merge(&mut base, stored);
        serde_json::from_value(base).unwrap_or_default()
    }
}

/// Recursive object merge: overlay values win, nested objects merge
/// field-by-field, `null` overlay values are ignored so they cannot erase
/// a defaulted field.
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
