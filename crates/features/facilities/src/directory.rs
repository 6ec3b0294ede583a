use crate::error::{FacilityError, FacilityErrorExt};
use crate::overpass;
use async_trait::async_trait;
use sos_domain::config::FacilitiesConfig;
use sos_domain::{Coordinate, Facility};
use std::time::Duration;
use tracing::debug;

/// Remote geospatial directory of points of interest.
#[async_trait]
pub trait FacilityDirectory: Send + Sync {
    /// Unordered facilities of `category` within `radius_meters` of `center`.
    async fn query(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<Facility>, FacilityError>;
}

/// HTTP client for an Overpass API interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassDirectory {
    client: reqwest::Client,
    endpoint: String,
}

impl OverpassDirectory {
    /// # Errors
    /// [`FacilityError::Http`] if the HTTP client cannot be initialised.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FacilityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sos/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    /// # Errors
    /// See [`OverpassDirectory::new`].
    pub fn from_config(config: &FacilitiesConfig) -> Result<Self, FacilityError> {
        Self::new(config.endpoint.clone(), config.timeout())
    }
}

#[async_trait]
impl FacilityDirectory for OverpassDirectory {
    async fn query(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<Facility>, FacilityError> {
        let query = overpass::build_query(center, radius_meters, category)?;
        debug!(endpoint = %self.endpoint, radius_meters, category, "Querying facility directory");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await
            .context("Sending Overpass query")?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Status {
                status: status.as_u16(),
                context: status.canonical_reason().map(Into::into),
            });
        }

        let body = response.bytes().await.context("Reading Overpass body")?;
        overpass::parse_response(&body)
    }
}
