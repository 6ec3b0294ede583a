//! Results of one dispatch run.

use crate::capability::Capabilities;
use crate::contact::ContactId;
use crate::location::NoFix;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Outcome of the optional voice call to the priority contact. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// Disabled, aborted before delivery, or not exactly one priority contact.
    #[default]
    NotApplicable,
    Placed,
    PermissionDenied,
    Failed(String),
}

/// Why a run stopped before any message could be attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    PermissionDenied { missing: Capabilities },
    NoLocation(NoFix),
    NoContacts,
    Unauthenticated,
    ContactsUnavailable(String),
}

impl AbortReason {
    /// Longer explanation for logs and verbose output.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::PermissionDenied { missing } => format!("missing grants: {missing}"),
            Self::NoLocation(no_fix) => no_fix.to_string(),
            Self::NoContacts => "the contact list is empty".to_owned(),
            Self::Unauthenticated => "no authenticated user".to_owned(),
            Self::ContactsUnavailable(reason) => reason.clone(),
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PermissionDenied { .. } => "permission denied",
            Self::NoLocation(_) => "no location",
            Self::NoContacts => "no contacts",
            Self::Unauthenticated => "not signed in",
            Self::ContactsUnavailable(_) => "contacts unavailable",
        })
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Success,
    /// Some or all recipients failed; `delivered` may be empty.
    PartialFailure,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub delivered: BTreeSet<ContactId>,
    pub failed: BTreeMap<ContactId, String>,
    pub escalation: EscalationOutcome,
}

impl DispatchResult {
    /// State implied by the fan-out; only meaningful once delivery ran.
    #[must_use]
    pub fn delivery_state(&self) -> DispatchState {
        if self.failed.is_empty() { DispatchState::Success } else { DispatchState::PartialFailure }
    }
}

/// The single user-facing line for a finished run.
#[must_use]
pub fn status_line(state: &DispatchState, result: &DispatchResult) -> String {
    match state {
        DispatchState::Success => "SOS delivered to all contacts".to_owned(),
        DispatchState::PartialFailure => {
            format!("SOS delivered with {} failure(s)", result.failed.len())
        },
        DispatchState::Aborted(reason) => format!("SOS aborted: {reason}"),
    }
}

/// Pipeline stage currently executing, for progress displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchStage {
    #[default]
    Idle,
    CheckingPermissions,
    ResolvingLocation,
    Enriching,
    Composing,
    LoadingContacts,
    Delivering,
    Escalating,
    Finished,
}

impl DispatchStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingPermissions => "checking_permissions",
            Self::ResolvingLocation => "resolving_location",
            Self::Enriching => "enriching",
            Self::Composing => "composing",
            Self::LoadingContacts => "loading_contacts",
            Self::Delivering => "delivering",
            Self::Escalating => "escalating",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
