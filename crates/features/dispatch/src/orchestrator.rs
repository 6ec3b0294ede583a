use crate::boundary::{ConnectivityProbe, MessageTransport, PermissionGate, SessionProvider, VoiceDialer};
use crate::error::{DispatchError, DispatchErrorExt};
use crate::outcome::DispatchOutcome;
use crate::segment::segment_message;
use futures::future::join_all;
use sos_alerts::AlertComposer;
use sos_contacts::{ContactError, ContactRepository};
use sos_domain::config::{DispatchConfig, FacilitiesConfig, SmsConfig, SosConfig};
use sos_domain::{
    AbortReason, AlertRequest, Capabilities, Contact, Coordinate, DispatchResult, DispatchStage,
    DispatchState, EscalationOutcome, Facility,
};
use sos_facilities::FacilityLookupClient;
use sos_kernel::safe_nanoid;
use sos_location::LocationResolver;
use sos_signals::SignalBus;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// The collaborators a run needs.
#[derive(Clone)]
pub struct DispatchPorts {
    pub session: Arc<dyn SessionProvider>,
    pub permissions: Arc<dyn PermissionGate>,
    pub location: LocationResolver,
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub facilities: FacilityLookupClient,
    pub contacts: Arc<dyn ContactRepository>,
    pub transport: Arc<dyn MessageTransport>,
    pub dialer: Arc<dyn VoiceDialer>,
}

impl std::fmt::Debug for DispatchPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPorts")
            .field("location", &self.location)
            .field("facilities", &self.facilities)
            .finish_non_exhaustive()
    }
}

/// Runs the alert pipeline, one independent run per [`DispatchOrchestrator::dispatch`] call.
///
/// Stages run one after another:
///
/// 1. capability check (`SEND_SMS | FINE_LOCATION`)
/// 2. location fix
/// 3. facility enrichment, only when requested and online; failures degrade to none
/// 4. message composition
/// 5. contact list
/// 6. fan-out delivery, each recipient isolated from the others
/// 7. voice escalation to the single priority contact
///
/// Stages 1, 2 and 5 can abort the run. Nothing after stage 5 can.
#[derive(Debug, Clone)]
pub struct DispatchOrchestrator {
    ports: DispatchPorts,
    composer: AlertComposer,
    facilities: FacilitiesConfig,
    dispatch: DispatchConfig,
    sms: SmsConfig,
    signals: Option<SignalBus>,
}

/// Stop the run with `reason`.
type Stage<T> = Result<T, AbortReason>;

impl DispatchOrchestrator {
    #[must_use]
    pub fn new(ports: DispatchPorts, config: &SosConfig) -> Self {
        Self {
            ports,
            composer: AlertComposer::new(),
            facilities: config.facilities.clone(),
            dispatch: config.dispatch.clone(),
            sms: config.sms,
            signals: None,
        }
    }

    /// Publishes [`DispatchStage`] updates and the final [`DispatchOutcome`] on `bus`.
    #[must_use]
    pub fn with_signals(mut self, bus: SignalBus) -> Self {
        self.signals = Some(bus);
        self
    }

    /// Runs the whole pipeline for `request` and reports exactly one outcome.
    pub async fn dispatch(&self, request: &AlertRequest) -> DispatchOutcome {
        let run_id = safe_nanoid!();
        let span = info_span!("dispatch", run_id = %run_id, category = %request.category);

        async {
            info!(enrich = request.enrich_with_facilities, "Dispatch started");
            let mut result = DispatchResult::default();
            let state = match self.run(request, &mut result).await {
                Ok(()) => result.delivery_state(),
                Err(reason) => {
                    warn!(%reason, detail = %reason.detail(), "Dispatch aborted");
                    DispatchState::Aborted(reason)
                },
            };

            let outcome = DispatchOutcome::new(run_id.clone(), request.category, state, result);
            info!(
                status = %outcome.status,
                delivered = outcome.result.delivered.len(),
                failed = outcome.result.failed.len(),
                escalation = ?outcome.result.escalation,
                "Dispatch finished"
            );

            self.stage(DispatchStage::Finished);
            if let Err(e) = self.publish(&outcome) {
                warn!(error = %e, "Outcome not published");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &AlertRequest, result: &mut DispatchResult) -> Stage<()> {
        self.stage(DispatchStage::CheckingPermissions);
        self.check_permissions()?;

        self.stage(DispatchStage::ResolvingLocation);
        let fix = self.ports.location.resolve().await.map_err(AbortReason::NoLocation)?;
        debug!(source = ?fix.source, "Location fixed");

        let facilities = if request.enrich_with_facilities {
            self.stage(DispatchStage::Enriching);
            self.enrich(fix.coordinate).await
        } else {
            Vec::new()
        };

        self.stage(DispatchStage::Composing);
        let message = self.composer.compose(&request.template, fix.coordinate, &facilities);
        let parts = segment_message(&message, &self.sms);
        debug!(chars = message.chars().count(), parts = parts.len(), "Alert composed");

        self.stage(DispatchStage::LoadingContacts);
        let contacts = self.load_contacts().await?;

        self.stage(DispatchStage::Delivering);
        self.deliver(&contacts, &parts, result).await;

        result.escalation = if self.dispatch.escalation {
            self.escalate(&contacts).await
        } else {
            EscalationOutcome::NotApplicable
        };
        Ok(())
    }

    fn check_permissions(&self) -> Stage<()> {
        let missing = self.ports.permissions.granted().missing(Capabilities::DISPATCH);
        if missing.is_empty() {
            return Ok(());
        }
        self.ports.permissions.request(missing);
        Err(AbortReason::PermissionDenied { missing })
    }

    async fn enrich(&self, center: Coordinate) -> Vec<Facility> {
        if !self.ports.connectivity.is_online().await {
            info!("Offline, sending without nearby facilities");
            return Vec::new();
        }
        let found = self
            .ports
            .facilities
            .find_nearby(center, self.facilities.radius_meters, &self.facilities.category)
            .await;
        debug!(count = found.len(), "Facilities attached");
        found
    }

    async fn load_contacts(&self) -> Stage<Vec<Contact>> {
        let user = self.ports.session.current_user().ok_or(AbortReason::Unauthenticated)?;

        let contacts = match self.ports.contacts.list(&user).await {
            Ok(contacts) => contacts,
            Err(ContactError::Unauthenticated { .. }) => return Err(AbortReason::Unauthenticated),
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Contact list unavailable");
                return Err(AbortReason::ContactsUnavailable(e.to_string()));
            },
        };

        if contacts.is_empty() {
            return Err(AbortReason::NoContacts);
        }
        Ok(contacts)
    }

    async fn deliver(&self, contacts: &[Contact], parts: &[String], result: &mut DispatchResult) {
        let transport = self.ports.transport.as_ref();

        let outcomes = if self.dispatch.concurrent_delivery {
            join_all(contacts.iter().map(|contact| send_to(transport, contact, parts))).await
        } else {
            let mut outcomes = Vec::with_capacity(contacts.len());
            for contact in contacts {
                outcomes.push(send_to(transport, contact, parts).await);
            }
            outcomes
        };

        for (contact, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    debug!(id = %contact.id, to = %contact.phone.masked(), "Delivered");
                    result.delivered.insert(contact.id.clone());
                },
                Err(e) => {
                    warn!(id = %contact.id, to = %contact.phone.masked(), error = %e, "Delivery failed");
                    result.failed.insert(contact.id.clone(), e.to_string());
                },
            }
        }
    }

    async fn escalate(&self, contacts: &[Contact]) -> EscalationOutcome {
        let mut flagged = contacts.iter().filter(|c| c.is_priority);
        let (Some(priority), None) = (flagged.next(), flagged.next()) else {
            debug!("No single priority contact, skipping escalation");
            return EscalationOutcome::NotApplicable;
        };

        self.stage(DispatchStage::Escalating);
        if !self.ports.permissions.granted().contains(Capabilities::CALL_PHONE) {
            self.ports.permissions.request(Capabilities::CALL_PHONE);
            info!(id = %priority.id, "Escalation skipped, call permission missing");
            return EscalationOutcome::PermissionDenied;
        }

        match self.ports.dialer.dial(&priority.phone).await {
            Ok(()) => {
                info!(id = %priority.id, to = %priority.phone.masked(), "Escalation call placed");
                EscalationOutcome::Placed
            },
            Err(e) => {
                warn!(id = %priority.id, error = %e, "Escalation call failed");
                EscalationOutcome::Failed(e.to_string())
            },
        }
    }

    fn stage(&self, stage: DispatchStage) {
        if let Some(bus) = &self.signals {
            if let Err(e) = bus.set_state(stage) {
                warn!(error = %e, %stage, "Stage not published");
            }
        }
    }

    fn publish(&self, outcome: &DispatchOutcome) -> Result<usize, DispatchError> {
        let Some(bus) = &self.signals else {
            return Ok(0);
        };
        bus.emit(outcome.clone()).context("Publishing dispatch outcome")
    }
}

async fn send_to<'c>(
    transport: &dyn MessageTransport,
    contact: &'c Contact,
    parts: &[String],
) -> (&'c Contact, Result<(), DispatchError>) {
    (contact, transport.send(&contact.phone, parts).await)
}
