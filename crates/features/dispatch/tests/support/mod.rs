#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sos_contacts::{ContactError, ContactRepository};
use sos_dispatch::DispatchError;
use sos_dispatch::boundary::{MessageTransport, PermissionGate, VoiceDialer};
use sos_dispatch::local::{StaticConnectivity, StaticSession};
use sos_dispatch::{DispatchOrchestrator, DispatchPorts};
use sos_domain::config::SosConfig;
use sos_domain::{
    Capabilities, Contact, ContactDraft, ContactId, Coordinate, Facility, PhoneNumber, UserId,
};
use sos_facilities::{FacilityDirectory, FacilityError, FacilityLookupClient};
use sos_location::{FixedLocation, LocationResolver, LocationSource};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn here() -> Coordinate {
    Coordinate::try_new(12.9, 77.6).expect("valid coordinate")
}

pub fn contact(id: &str, name: &str, phone: &str, priority: bool) -> Contact {
    ContactDraft::new(name, phone).priority(priority).into_contact(ContactId::from(id)).expect("valid")
}

/// Records every send; numbers in `failing` are refused.
#[derive(Default)]
pub struct RecordingTransport {
    pub failing: HashSet<String>,
    pub sent: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingTransport {
    pub fn failing_for(numbers: &[&str]) -> Self {
        Self { failing: numbers.iter().map(|n| (*n).to_owned()).collect(), ..Self::default() }
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, to: &PhoneNumber, parts: &[String]) -> Result<(), DispatchError> {
        tokio::task::yield_now().await;
        if self.failing.contains(to.as_str()) {
            return Err(DispatchError::Transport { message: "generic failure".into(), context: None });
        }
        self.sent.lock().push((to.as_str().to_owned(), parts.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDialer {
    pub fail: bool,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl VoiceDialer for RecordingDialer {
    async fn dial(&self, to: &PhoneNumber) -> Result<(), DispatchError> {
        self.calls.lock().push(to.as_str().to_owned());
        if self.fail {
            return Err(DispatchError::Dialer { message: "line busy".into(), context: None });
        }
        Ok(())
    }
}

pub struct RecordingGate {
    pub granted: Capabilities,
    pub requested: Mutex<Vec<Capabilities>>,
}

impl RecordingGate {
    pub fn new(granted: Capabilities) -> Self {
        Self { granted, requested: Mutex::new(Vec::new()) }
    }
}

impl PermissionGate for RecordingGate {
    fn granted(&self) -> Capabilities {
        self.granted
    }

    fn request(&self, missing: Capabilities) {
        self.requested.lock().push(missing);
    }
}

/// Directory returning a fixed answer and counting queries.
pub struct CountingDirectory {
    pub answer: Result<Vec<Facility>, u16>,
    pub queries: Mutex<Vec<(u32, String)>>,
}

impl CountingDirectory {
    pub fn with(facilities: Vec<Facility>) -> Self {
        Self { answer: Ok(facilities), queries: Mutex::new(Vec::new()) }
    }

    pub fn failing(status: u16) -> Self {
        Self { answer: Err(status), queries: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl FacilityDirectory for CountingDirectory {
    async fn query(
        &self,
        _center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<Facility>, FacilityError> {
        self.queries.lock().push((radius_meters, category.to_owned()));
        match &self.answer {
            Ok(found) => Ok(found.clone()),
            Err(status) => Err(FacilityError::Status { status: *status, context: None }),
        }
    }
}

/// In-memory contact list; `broken` makes every read fail.
#[derive(Default)]
pub struct MemoryContacts {
    pub contacts: Mutex<Vec<Contact>>,
    pub broken: bool,
    pub reads: AtomicUsize,
}

impl MemoryContacts {
    pub fn with(contacts: Vec<Contact>) -> Self {
        Self { contacts: Mutex::new(contacts), ..Self::default() }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactRepository for MemoryContacts {
    async fn list(&self, _user: &UserId) -> Result<Vec<Contact>, ContactError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(ContactError::Conflict { message: "backend offline".into(), context: None });
        }
        Ok(self.contacts.lock().clone())
    }

    async fn add(&self, _user: &UserId, draft: ContactDraft) -> Result<Contact, ContactError> {
        let id = ContactId::new(format!("c{}", self.contacts.lock().len() + 1));
        let contact = draft.into_contact(id)?;
        self.contacts.lock().push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        _user: &UserId,
        _id: &ContactId,
        _draft: ContactDraft,
    ) -> Result<Contact, ContactError> {
        Err(ContactError::NotFound { message: "read-only fake".into(), context: None })
    }

    async fn delete(&self, _user: &UserId, _id: &ContactId) -> Result<(), ContactError> {
        Err(ContactError::NotFound { message: "read-only fake".into(), context: None })
    }

    async fn set_priority(&self, _user: &UserId, _id: &ContactId) -> Result<(), ContactError> {
        Err(ContactError::NotFound { message: "read-only fake".into(), context: None })
    }
}

/// Every collaborator of one test run, kept so assertions can inspect them.
pub struct Harness {
    pub config: SosConfig,
    pub location: Arc<dyn LocationSource>,
    pub session: Option<UserId>,
    pub online: bool,
    pub gate: Arc<RecordingGate>,
    pub directory: Arc<CountingDirectory>,
    pub contacts: Arc<MemoryContacts>,
    pub transport: Arc<RecordingTransport>,
    pub dialer: Arc<RecordingDialer>,
}

impl Harness {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            config: SosConfig::default(),
            location: Arc::new(FixedLocation::at(here())),
            session: UserId::parse("user-1"),
            online: true,
            gate: Arc::new(RecordingGate::new(Capabilities::ALL)),
            directory: Arc::new(CountingDirectory::with(Vec::new())),
            contacts: Arc::new(MemoryContacts::with(contacts)),
            transport: Arc::new(RecordingTransport::default()),
            dialer: Arc::new(RecordingDialer::default()),
        }
    }

    pub fn orchestrator(&self) -> DispatchOrchestrator {
        let ports = DispatchPorts {
            session: Arc::new(StaticSession(self.session.clone())),
            permissions: self.gate.clone(),
            location: LocationResolver::new(Arc::clone(&self.location), Duration::from_secs(1)),
            connectivity: Arc::new(StaticConnectivity(self.online)),
            facilities: FacilityLookupClient::new(self.directory.clone()),
            contacts: self.contacts.clone(),
            transport: self.transport.clone(),
            dialer: self.dialer.clone(),
        };
        DispatchOrchestrator::new(ports, &self.config)
    }
}
