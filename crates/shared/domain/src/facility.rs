use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// A point of interest returned by the facility directory. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub location: Coordinate,
    pub name: Option<String>,
    pub category: Option<String>,
}

impl Facility {
    /// Name for display, `"Unknown"` when the directory had none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Unknown")
    }
}
