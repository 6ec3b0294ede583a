use crate::error::LocationError;
use async_trait::async_trait;
use sos_domain::Coordinate;

/// Device positioning boundary.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// The cached last-known position, if the device has one.
    async fn last_known(&self) -> Result<Option<Coordinate>, LocationError>;

    /// Whether a live positioning provider (GPS) is switched on.
    async fn live_provider_enabled(&self) -> bool;

    /// One-shot live request. Resolves once, with a position or an error.
    async fn request_single_fix(&self) -> Result<Coordinate, LocationError>;
}

/// A source that always reports the same position, or nothing at all.
///
/// Used by the CLI, where the operator passes the coordinate on the command
/// line, and as the simplest stand-in for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    position: Option<Coordinate>,
}

impl FixedLocation {
    #[must_use]
    pub const fn at(position: Coordinate) -> Self {
        Self { position: Some(position) }
    }

    /// No cached fix and positioning switched off.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn last_known(&self) -> Result<Option<Coordinate>, LocationError> {
        Ok(self.position)
    }

    async fn live_provider_enabled(&self) -> bool {
        self.position.is_some()
    }

    async fn request_single_fix(&self) -> Result<Coordinate, LocationError> {
        self.position.ok_or_else(|| LocationError::Provider {
            message: "no position configured".into(),
            context: None,
        })
    }
}
