//! Facade crate for the SOS feature slices and shared modules.
//! Re-exports domain/kernel primitives and every slice under one name.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! Applications depend on `sos` alone and reach slices through [`features`],
//! or pull the usual names in with `use sos::prelude::*`.

pub use sos_domain as domain;
pub use sos_kernel as kernel;
pub use sos_signals as signals;
pub use sos_storage as storage;

/// The vertical slices, leaf first.
pub mod features {
    pub use sos_alerts as alerts;
    pub use sos_contacts as contacts;
    pub use sos_dispatch as dispatch;
    pub use sos_facilities as facilities;
    pub use sos_location as location;
}

pub mod prelude {
    pub use sos_contacts::{ContactRepository, StoredContactRepository};
    pub use sos_dispatch::{DispatchOrchestrator, DispatchOutcome, DispatchPorts};
    pub use sos_domain::config::SosConfig;
    pub use sos_domain::{
        AlertRequest, Capabilities, Contact, ContactDraft, ContactId, Coordinate, DispatchStage,
        DispatchState, EmergencyCategory, UserId,
    };
    pub use sos_facilities::{FacilityLookupClient, OverpassDirectory};
    pub use sos_location::{FixedLocation, LocationResolver};
    pub use sos_signals::SignalBus;
    pub use sos_storage::Storage;
}
