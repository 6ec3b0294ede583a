use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration shared by every slice.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SosConfigInner {
    pub storage: StorageConfig,
    pub facilities: FacilitiesConfig,
    pub location: LocationConfig,
    pub dispatch: DispatchConfig,
    pub sms: SmsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct SosConfig {
    #[serde(flatten, default)]
    inner: Arc<SosConfigInner>,
}

impl Deref for SosConfig {
    type Target = SosConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SosConfig {
    fn deref_mut(&mut self) -> &mut SosConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where contact documents live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Nearby-facility directory (Overpass-compatible).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FacilitiesConfig {
    pub endpoint: String,
    pub radius_meters: u32,
    pub category: String,
    pub limit: usize,
    pub timeout_secs: u64,
}

impl FacilitiesConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Upper bound on the single live-fix wait.
    pub live_fix_timeout_secs: u64,
}

impl LocationConfig {
    #[must_use]
    pub const fn live_fix_timeout(&self) -> Duration {
        Duration::from_secs(self.live_fix_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Send to all contacts at once instead of one after another.
    pub concurrent_delivery: bool,
    /// Call the priority contact after texting.
    pub escalation: bool,
}

/// Segment limits of the text transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub single_segment_gsm: usize,
    pub multipart_segment_gsm: usize,
    pub single_segment_ucs2: usize,
    pub multipart_segment_ucs2: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data") }
    }
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_owned(),
            radius_meters: 2000,
            category: "hospital".to_owned(),
            limit: 5,
            timeout_secs: 10,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self { live_fix_timeout_secs: 30 }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { concurrent_delivery: true, escalation: true }
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            single_segment_gsm: 160,
            multipart_segment_gsm: 153,
            single_segment_ucs2: 70,
            multipart_segment_ucs2: 67,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_directory_contract() {
        let cfg = SosConfig::default();
        assert_eq!(cfg.facilities.radius_meters, 2000);
        assert_eq!(cfg.facilities.category, "hospital");
        assert_eq!(cfg.facilities.limit, 5);
        assert_eq!(cfg.sms.single_segment_gsm, 160);
        assert!(cfg.dispatch.escalation);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let raw = json!({
            "facilities": { "endpoint": "http://127.0.0.1:9000/interpreter" },
            "dispatch": { "escalation": false }
        });
        let cfg: SosConfig = serde_json::from_value(raw).expect("config deserialize");
        assert_eq!(cfg.facilities.endpoint, "http://127.0.0.1:9000/interpreter");
        assert_eq!(cfg.facilities.limit, 5);
        assert!(!cfg.dispatch.escalation);
        assert!(cfg.dispatch.concurrent_delivery);
        assert_eq!(cfg.location.live_fix_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn deref_mut_copies_on_write() {
        let original = SosConfig::default();
        let mut edited = original.clone();
        edited.location.live_fix_timeout_secs = 5;
        assert_eq!(original.location.live_fix_timeout_secs, 30);
        assert_eq!(edited.location.live_fix_timeout_secs, 5);
    }
}
