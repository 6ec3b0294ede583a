//! # Location
//!
//! Turns a device [`LocationSource`] into a single [`sos_domain::Fix`] per
//! dispatch with [`LocationResolver`].

mod error;
mod resolver;
mod source;

pub use crate::error::{LocationError, LocationErrorExt};
pub use crate::resolver::LocationResolver;
pub use crate::source::{FixedLocation, LocationSource};
