//! What the user asked to send.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of emergency buttons. Each is the same flow with a different
/// default message and enrichment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyCategory {
    General,
    Medical,
    Accident,
    Violence,
    Fire,
}

impl EmergencyCategory {
    pub const ALL: [Self; 5] =
        [Self::General, Self::Medical, Self::Accident, Self::Violence, Self::Fire];

    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::General => "Emergency! Help needed!",
            Self::Medical => "Medical emergency! Immediate assistance needed!",
            Self::Accident => "Accident! Need help urgently!",
            Self::Violence => "Violence incident! Please send help!",
            Self::Fire => "Fire emergency! Immediate assistance required!",
        }
    }

    /// Medical and accident alerts list nearby hospitals unless told otherwise.
    #[must_use]
    pub const fn enriches_by_default(self) -> bool {
        matches!(self, Self::Medical | Self::Accident)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Medical => "medical",
            Self::Accident => "accident",
            Self::Violence => "violence",
            Self::Fire => "fire",
        }
    }
}

impl fmt::Display for EmergencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmergencyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted || (wanted == "sos" && *c == Self::General))
            .ok_or_else(|| format!("unknown emergency category '{s}'"))
    }
}

/// One user action's worth of alert parameters. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub category: EmergencyCategory,
    pub template: String,
    pub enrich_with_facilities: bool,
}

impl AlertRequest {
    /// The category's default message and enrichment choice.
    #[must_use]
    pub fn for_category(category: EmergencyCategory) -> Self {
        Self {
            category,
            template: category.template().to_owned(),
            enrich_with_facilities: category.enriches_by_default(),
        }
    }

    #[must_use]
    pub fn new(template: impl Into<String>, enrich_with_facilities: bool) -> Self {
        Self { category: EmergencyCategory::General, template: template.into(), enrich_with_facilities }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    #[must_use]
    pub const fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich_with_facilities = enrich;
        self
    }
}
