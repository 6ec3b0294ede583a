//! # Domain Models
//!
//! Pure SOS types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or async. Validation that only needs the
//! value itself (coordinate ranges, phone format) lives here so every slice
//! shares one definition.

pub mod alert;
pub mod capability;
pub mod config;
pub mod contact;
pub mod dispatch;
pub mod facility;
pub mod geo;
pub mod location;

pub use alert::{AlertRequest, EmergencyCategory};
pub use capability::Capabilities;
pub use contact::{Contact, ContactDraft, ContactId, InvalidContact, PhoneNumber, UserId};
pub use dispatch::{AbortReason, DispatchResult, DispatchStage, DispatchState, EscalationOutcome};
pub use facility::Facility;
pub use geo::{Coordinate, InvalidCoordinate, distance};
pub use location::{Fix, FixSource, NoFix};
pub use config::SosConfig;
