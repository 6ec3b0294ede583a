//! # Facilities
//!
//! Nearby-facility enrichment for alerts.
//!
//! * [`FacilityDirectory`] is the remote boundary; [`OverpassDirectory`] talks
//!   to an Overpass API interpreter over HTTP.
//! * [`FacilityLookupClient`] ranks the answer by great-circle distance, keeps
//!   the nearest few and swallows every failure into an empty list.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), sos_facilities::FacilityError> {
//! use sos_domain::Coordinate;
//! use sos_facilities::{FacilityLookupClient, OverpassDirectory};
//! use std::{sync::Arc, time::Duration};
//!
//! let directory = OverpassDirectory::new("https://overpass-api.de/api/interpreter", Duration::from_secs(10))?;
//! let lookup = FacilityLookupClient::new(Arc::new(directory));
//! let here = Coordinate::try_new(12.9, 77.6).expect("valid");
//! let hospitals = lookup.find_nearby(here, 2000, "hospital").await;
//! assert!(hospitals.len() <= 5);
//! # Ok(())
//! # }
//! ```

mod directory;
mod error;
mod lookup;
pub mod overpass;

pub use crate::directory::{FacilityDirectory, OverpassDirectory};
pub use crate::error::{FacilityError, FacilityErrorExt};
pub use crate::lookup::{DEFAULT_LIMIT, FacilityLookupClient, rank_by_distance};
