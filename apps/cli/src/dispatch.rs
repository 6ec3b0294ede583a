use crate::args::DispatchArgs;
use anyhow::{Context, Result, bail};
use sos::domain::config::SosConfig;
use sos::domain::{
    AlertRequest, Coordinate, DispatchStage, DispatchState, EscalationOutcome, UserId,
};
use sos::features::contacts::ContactRepository;
use sos::features::dispatch::local::{
    LogDialer, LogTransport, StaticConnectivity, StaticPermissions, StaticSession,
};
use sos::features::dispatch::{DispatchOrchestrator, DispatchOutcome, DispatchPorts};
use sos::features::facilities::{FacilityLookupClient, OverpassDirectory};
use sos::features::location::{FixedLocation, LocationResolver};
use sos::signals::{SignalBus, SignalReceiverExt};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Builds the request from the category plus any overrides.
#[must_use]
pub fn request_for(args: &DispatchArgs) -> AlertRequest {
    let mut request = AlertRequest::for_category(args.category);
    if let Some(message) = &args.message {
        request = request.with_template(message.clone());
    }
    if let Some(enrich) = args.enrichment() {
        request = request.with_enrichment(enrich);
    }
    request
}

/// Wires the pipeline with a fixed (or absent) position and log-backed transports.
///
/// # Errors
/// Invalid coordinates or an HTTP client that cannot be built.
pub fn orchestrator(
    config: &SosConfig,
    contacts: Arc<dyn ContactRepository>,
    args: &DispatchArgs,
) -> Result<DispatchOrchestrator> {
    let source = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            FixedLocation::at(Coordinate::try_new(lat, lon).context("Invalid --lat/--lon")?)
        },
        _ => FixedLocation::unavailable(),
    };
    let directory = OverpassDirectory::from_config(&config.facilities)?;

    let ports = DispatchPorts {
        session: Arc::new(StaticSession(UserId::parse(&args.user))),
        permissions: Arc::new(StaticPermissions(args.grants())),
        location: LocationResolver::from_config(Arc::new(source), &config.location),
        connectivity: Arc::new(StaticConnectivity(!args.offline)),
        facilities: FacilityLookupClient::new(Arc::new(directory)).with_limit(config.facilities.limit),
        contacts,
        transport: Arc::new(LogTransport),
        dialer: Arc::new(LogDialer),
    };
    Ok(DispatchOrchestrator::new(ports, config))
}

/// Runs one dispatch, printing stage progress and the final status.
///
/// # Errors
/// Wiring failures, and aborted runs so the process exits non-zero.
pub async fn run(
    config: &SosConfig,
    contacts: Arc<dyn ContactRepository>,
    args: &DispatchArgs,
    out: &mut impl Write,
) -> Result<DispatchOutcome> {
    let bus = SignalBus::new();
    let pipeline = orchestrator(config, contacts, args)?.with_signals(bus.clone());

    let mut stages = bus.watch(DispatchStage::Idle)?;
    let progress = tokio::spawn(async move {
        while let Some(stage) = stages.next_signal().await {
            debug!(%stage, "Stage");
        }
    });

    let outcome = pipeline.dispatch(&request_for(args)).await;
    bus.shutdown();
    progress.await?;

    report(&outcome, out)?;
    if let DispatchState::Aborted(reason) = &outcome.state {
        bail!("{}: {}", outcome.status, reason.detail());
    }
    Ok(outcome)
}

fn report(outcome: &DispatchOutcome, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", outcome.status)?;
    for (id, reason) in &outcome.result.failed {
        writeln!(out, "  failed {id}: {reason}")?;
    }
    match &outcome.result.escalation {
        EscalationOutcome::NotApplicable => {},
        EscalationOutcome::Placed => writeln!(out, "  priority contact called")?,
        EscalationOutcome::PermissionDenied => writeln!(out, "  call permission missing, priority contact not called")?,
        EscalationOutcome::Failed(reason) => writeln!(out, "  call failed: {reason}")?,
    }
    writeln!(out, "  run {}", outcome.run_id)?;
    Ok(())
}
