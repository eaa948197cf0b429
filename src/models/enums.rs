use serde::{Deserialize, Serialize};

/// Which screen the client is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewState {
    #[default]
    Dashboard,
    Triage,
    Immersive,
    Journal,
    Profile,
}

/// Where the patient was when symptoms occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivityContext {
    School,
    Work,
    #[default]
    Home,
    Exercise,
    Other,
}

impl ActivityContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "School",
            Self::Work => "Work",
            Self::Home => "Home",
            Self::Exercise => "Exercise",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ActivityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a triage chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Calendar-day indicator bucket derived from a day's pain level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainIndicator {
    Severe,
    Moderate,
    Wellness,
    Mild,
}

/// Genotype code stored when a new account is created.
pub const DEFAULT_SICKLE_CELL_TYPE: &str = "SS";

/// Genotype codes with their display labels, in form order.
pub const SICKLE_CELL_TYPES: &[(&str, &str)] = &[
    ("SS", "HbSS (Sickle Cell Anemia)"),
    ("SC", "HbSC Disease"),
    ("S-Beta0", "HbS Beta-Zero Thalassemia"),
    ("S-Beta+", "HbS Beta-Plus Thalassemia"),
    ("SD", "HbSD"),
    ("SE", "HbSE"),
    ("Trait", "Sickle Cell Trait (AS)"),
    ("Other", "Other"),
];

pub const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Display label for a genotype code, falling back to the code itself.
pub fn sickle_cell_type_label(code: &str) -> &str {
    SICKLE_CELL_TYPES
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
