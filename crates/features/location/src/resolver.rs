use crate::source::LocationSource;
use sos_domain::config::LocationConfig;
use sos_domain::{Fix, FixSource, NoFix};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Produces exactly one coordinate per call, preferring the cached fix.
///
/// Order of attempts:
/// 1. cached last-known fix, returned as-is;
/// 2. if none, and the live provider is enabled, one live request bounded by
///    `live_timeout`;
/// 3. otherwise [`NoFix::PositioningDisabled`].
///
/// There is no retry. A failed resolution needs a new user action.
#[derive(Clone)]
pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    live_timeout: Duration,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver").field("live_timeout", &self.live_timeout).finish()
    }
}

impl LocationResolver {
    #[must_use]
    pub fn new(source: Arc<dyn LocationSource>, live_timeout: Duration) -> Self {
        Self { source, live_timeout }
    }

    #[must_use]
    pub fn from_config(source: Arc<dyn LocationSource>, config: &LocationConfig) -> Self {
        Self::new(source, config.live_fix_timeout())
    }

    /// # Errors
    /// [`NoFix`] when neither the cache nor a live request produced a position.
    pub async fn resolve(&self) -> Result<Fix, NoFix> {
        match self.source.last_known().await {
            Ok(Some(coordinate)) => {
                debug!(source = "cached", "Location resolved");
                return Ok(Fix { coordinate, source: FixSource::Cached });
            },
            Ok(None) => {},
            // A broken cache must not hide a working GPS.
            Err(e) => warn!(error = %e, "Cached location unavailable, trying live fix"),
        }

        if !self.source.live_provider_enabled().await {
            debug!("No cached fix and live positioning disabled");
            return Err(NoFix::PositioningDisabled);
        }

        match tokio::time::timeout(self.live_timeout, self.source.request_single_fix()).await {
            Ok(Ok(coordinate)) => {
                debug!(source = "live", "Location resolved");
                Ok(Fix { coordinate, source: FixSource::Live })
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Live fix failed");
                Err(NoFix::Provider(e.to_string()))
            },
            Err(_) => {
                warn!(timeout_ms = self.live_timeout.as_millis(), "Live fix timed out");
                Err(NoFix::Timeout)
            },
        }
    }
}
