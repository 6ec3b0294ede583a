//! Outcome types of a location resolution.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSource {
    /// Last-known position cached by the device.
    Cached,
    /// A one-shot live request answered.
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub source: FixSource,
}

/// Why no coordinate could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoFix {
    PositioningDisabled,
    Timeout,
    Provider(String),
}

impl fmt::Display for NoFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositioningDisabled => f.write_str("positioning disabled"),
            Self::Timeout => f.write_str("live fix timed out"),
            Self::Provider(reason) => write!(f, "location provider error: {reason}"),
        }
    }
}
