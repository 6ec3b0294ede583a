//! # Dispatch
//!
//! The emergency alert pipeline. One user action becomes one
//! [`DispatchOrchestrator::dispatch`] call, which checks grants, fixes the
//! location, optionally lists nearby hospitals, texts every emergency contact
//! and finally calls the priority contact.
//!
//! Fatal problems (missing grants, no fix, no contacts) end the run as
//! [`sos_domain::DispatchState::Aborted`]. Problems local to one recipient or to
//! enrichment are absorbed and reported in the [`sos_domain::DispatchResult`].
//!
//! The device-facing collaborators are traits in [`boundary`]; [`local`] holds
//! fixed and log-backed implementations.

pub mod boundary;
mod error;
pub mod local;
mod orchestrator;
mod outcome;
pub mod segment;

pub use crate::error::{DispatchError, DispatchErrorExt};
pub use crate::orchestrator::{DispatchOrchestrator, DispatchPorts};
pub use crate::outcome::DispatchOutcome;
pub use crate::segment::segment_message;
