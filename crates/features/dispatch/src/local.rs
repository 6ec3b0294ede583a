//! Process-local implementations of the boundaries: fixed answers and
//! log-backed transports for operators and tests.

use crate::boundary::{ConnectivityProbe, MessageTransport, PermissionGate, SessionProvider, VoiceDialer};
use crate::error::DispatchError;
use async_trait::async_trait;
use sos_domain::{Capabilities, PhoneNumber, UserId};
use tracing::{debug, info, warn};

/// Grants decided up front.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions(pub Capabilities);

impl PermissionGate for StaticPermissions {
    fn granted(&self) -> Capabilities {
        self.0
    }

    fn request(&self, missing: Capabilities) {
        warn!(%missing, "Capabilities required but not granted");
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct StaticSession(pub Option<UserId>);

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<UserId> {
        self.0.clone()
    }
}

/// Writes every outgoing part to the log instead of a radio.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send(&self, to: &PhoneNumber, parts: &[String]) -> Result<(), DispatchError> {
        info!(to = %to.masked(), parts = parts.len(), "Text message sent");
        for (index, part) in parts.iter().enumerate() {
            debug!(to = %to.masked(), part = index + 1, text = %part, "Message part");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDialer;

#[async_trait]
impl VoiceDialer for LogDialer {
    async fn dial(&self, to: &PhoneNumber) -> Result<(), DispatchError> {
        info!(to = %to.masked(), "Voice call placed");
        Ok(())
    }
}
