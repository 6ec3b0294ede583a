use async_trait::async_trait;
use sos_domain::{Coordinate, FixSource, NoFix};
use sos_location::{FixedLocation, LocationError, LocationResolver, LocationSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn here() -> Coordinate {
    Coordinate::try_new(12.9, 77.6).expect("valid coordinate")
}

/// Scripted device: each answer is configurable and live requests are counted.
#[derive(Default)]
struct ScriptedSource {
    cached: Option<Result<Coordinate, &'static str>>,
    provider_enabled: bool,
    live: Option<Result<Coordinate, &'static str>>,
    live_delay: Duration,
    live_calls: AtomicUsize,
}

#[async_trait]
impl LocationSource for ScriptedSource {
    async fn last_known(&self) -> Result<Option<Coordinate>, LocationError> {
        match self.cached {
            None => Ok(None),
            Some(Ok(c)) => Ok(Some(c)),
            Some(Err(e)) => Err(LocationError::Provider { message: e.into(), context: None }),
        }
    }

    async fn live_provider_enabled(&self) -> bool {
        self.provider_enabled
    }

    async fn request_single_fix(&self) -> Result<Coordinate, LocationError> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.live_delay).await;
        match self.live {
            Some(Ok(c)) => Ok(c),
            Some(Err(e)) => Err(LocationError::Provider { message: e.into(), context: None }),
            None => std::future::pending().await,
        }
    }
}

fn resolver(source: &Arc<ScriptedSource>) -> LocationResolver {
    LocationResolver::new(Arc::clone(source) as Arc<dyn LocationSource>, Duration::from_secs(30))
}

#[tokio::test]
async fn cached_fix_wins_without_live_request() {
    let source = Arc::new(ScriptedSource {
        cached: Some(Ok(here())),
        provider_enabled: true,
        live: Some(Ok(here())),
        ..Default::default()
    });

    let fix = resolver(&source).resolve().await.expect("fix");
    assert_eq!(fix.coordinate, here());
    assert_eq!(fix.source, FixSource::Cached);
    assert_eq!(source.live_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn falls_back_to_one_live_request() {
    let source = Arc::new(ScriptedSource {
        provider_enabled: true,
        live: Some(Ok(here())),
        ..Default::default()
    });

    let fix = resolver(&source).resolve().await.expect("fix");
    assert_eq!(fix.source, FixSource::Live);
    assert_eq!(source.live_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn disabled_provider_means_no_fix() {
    let source = Arc::new(ScriptedSource::default());
    let err = resolver(&source).resolve().await.expect_err("no fix");
    assert_eq!(err, NoFix::PositioningDisabled);
    assert_eq!(err.to_string(), "positioning disabled");
    assert_eq!(source.live_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn live_provider_error_is_reported_once() {
    let source = Arc::new(ScriptedSource {
        provider_enabled: true,
        live: Some(Err("gps hardware fault")),
        ..Default::default()
    });

    let err = resolver(&source).resolve().await.expect_err("no fix");
    assert!(matches!(err, NoFix::Provider(ref m) if m.contains("gps hardware fault")));
    assert_eq!(source.live_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn live_request_is_bounded() {
    let source = Arc::new(ScriptedSource { provider_enabled: true, ..Default::default() });
    let err = resolver(&source).resolve().await.expect_err("timeout");
    assert_eq!(err, NoFix::Timeout);
}

#[tokio::test(start_paused = true)]
async fn slow_answer_inside_the_bound_still_counts() {
    let source = Arc::new(ScriptedSource {
        provider_enabled: true,
        live: Some(Ok(here())),
        live_delay: Duration::from_secs(29),
        ..Default::default()
    });
    assert!(resolver(&source).resolve().await.is_ok());
}

#[tokio::test]
async fn broken_cache_does_not_block_live_fix() {
    let source = Arc::new(ScriptedSource {
        cached: Some(Err("cache corrupted")),
        provider_enabled: true,
        live: Some(Ok(here())),
        ..Default::default()
    });
    let fix = resolver(&source).resolve().await.expect("fix");
    assert_eq!(fix.source, FixSource::Live);
}

#[tokio::test]
async fn fixed_location_sources() {
    let fixed = LocationResolver::new(Arc::new(FixedLocation::at(here())), Duration::from_secs(1));
    assert_eq!(fixed.resolve().await.map(|f| f.coordinate), Ok(here()));

    let none = LocationResolver::new(Arc::new(FixedLocation::unavailable()), Duration::from_secs(1));
    assert_eq!(none.resolve().await, Err(NoFix::PositioningDisabled));
}
