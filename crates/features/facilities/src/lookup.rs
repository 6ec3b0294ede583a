use crate::directory::FacilityDirectory;
use sos_domain::{Coordinate, Facility, distance};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default, and upper bound, for the number of facilities kept after ranking.
pub const DEFAULT_LIMIT: usize = 5;

/// Best-effort nearest-facility search on top of a [`FacilityDirectory`].
///
/// Never fails: any directory error degrades to an empty list so that
/// enrichment cannot block alert delivery.
#[derive(Clone)]
pub struct FacilityLookupClient {
    directory: Arc<dyn FacilityDirectory>,
    limit: usize,
}

impl std::fmt::Debug for FacilityLookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacilityLookupClient").field("limit", &self.limit).finish_non_exhaustive()
    }
}

impl FacilityLookupClient {
    #[must_use]
    pub fn new(directory: Arc<dyn FacilityDirectory>) -> Self {
        Self { directory, limit: DEFAULT_LIMIT }
    }

    /// Keeps at most `limit` facilities, never more than [`DEFAULT_LIMIT`].
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit < DEFAULT_LIMIT { limit } else { DEFAULT_LIMIT };
        self
    }

    /// Up to `limit` facilities, nearest first.
    pub async fn find_nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Vec<Facility> {
        match self.directory.query(center, radius_meters, category).await {
            Ok(found) => {
                let total = found.len();
                let ranked = rank_by_distance(center, found, self.limit);
                debug!(total, kept = ranked.len(), "Facilities ranked");
                ranked
            },
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Facility lookup failed, continuing without");
                Vec::new()
            },
        }
    }
}

/// Sorts ascending by great-circle distance to `center` and keeps `limit`.
/// Ties keep directory order.
#[must_use]
pub fn rank_by_distance(center: Coordinate, facilities: Vec<Facility>, limit: usize) -> Vec<Facility> {
    let mut keyed: Vec<(f64, Facility)> =
        facilities.into_iter().map(|f| (distance(center, f.location), f)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().take(limit).map(|(_, f)| f).collect()
}
