//! Collaborators the pipeline talks to but does not own.

use crate::error::DispatchError;
use async_trait::async_trait;
use sos_domain::{Capabilities, PhoneNumber, UserId};

/// Delivers one text message, already split into provider-sized parts.
///
/// Parts are sent in order. An error means the recipient may have received
/// none, some, or all parts; the pipeline counts it as a failure either way.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, to: &PhoneNumber, parts: &[String]) -> Result<(), DispatchError>;
}

/// Places a voice call.
#[async_trait]
pub trait VoiceDialer: Send + Sync {
    async fn dial(&self, to: &PhoneNumber) -> Result<(), DispatchError>;
}

/// Current capability grants and a way to ask for the missing ones.
pub trait PermissionGate: Send + Sync {
    fn granted(&self) -> Capabilities;

    /// Called when a run needs `missing`. Re-prompting is up to the implementor.
    fn request(&self, missing: Capabilities);
}

/// Whether a network path exists right now.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// The signed-in user, if any.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}
