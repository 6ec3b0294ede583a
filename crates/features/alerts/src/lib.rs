//! # Alerts
//!
//! Pure text composition for outgoing alerts. No I/O, no clocks, no randomness:
//! the same inputs always produce the same message.

mod composer;

pub use crate::composer::{AlertComposer, FACILITIES_HEADER, MAP_SEARCH_URL, map_link};
