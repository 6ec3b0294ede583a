use chrono::{DateTime, Utc};
use sos_domain::dispatch::status_line;
use sos_domain::{DispatchResult, DispatchState, EmergencyCategory};

/// Everything a caller learns about one finished run.
///
/// Returned from [`crate::DispatchOrchestrator::dispatch`] and broadcast on
/// the signal bus when one is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub run_id: String,
    pub category: EmergencyCategory,
    pub state: DispatchState,
    pub result: DispatchResult,
    /// The one user-facing line for this run.
    pub status: String,
    pub finished_at: DateTime<Utc>,
}

impl DispatchOutcome {
    pub(crate) fn new(
        run_id: String,
        category: EmergencyCategory,
        state: DispatchState,
        result: DispatchResult,
    ) -> Self {
        let status = status_line(&state, &result);
        Self { run_id, category, state, result, status, finished_at: Utc::now() }
    }
}
