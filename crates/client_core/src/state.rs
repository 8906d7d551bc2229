//! Session state and its reducer.
//!
//! Every fact a frontend may render lives in [`SessionState`]; the only
//! way to change it is to run a [`SessionEvent`] through [`reduce`],
//! which returns a new state value and never mutates in place.

use shared::domain::{Atm, CashStatus, Report, ServiceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Search box text, tracked separately from the submitted pincode.
    pub pincode_input: String,
    /// Pincode of the most recently started search.
    pub last_pincode: Option<String>,
    /// Current listing; replaced wholesale by a successful search.
    pub atms: Vec<Atm>,
    pub phase: SearchPhase,
    /// User-visible, non-blocking error banner.
    pub banner: Option<String>,
    /// Confirmation line after a successful submit.
    pub notice: Option<String>,
    /// Detail-panel selection.
    pub selected: Option<Atm>,
    /// In-progress report draft. Carries over across selections.
    pub draft: Report,
    /// Highest search sequence number issued; completions carrying an
    /// older token are discarded.
    pub search_token: u64,
}

/// A single typed field of the report draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Cash(CashStatus),
    Deposit(ServiceStatus),
    Passbook(ServiceStatus),
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    PincodeEdited(String),
    SearchStarted { token: u64, pincode: String },
    SearchSucceeded { token: u64, atms: Vec<Atm> },
    SearchFailed { token: u64, message: String },
    AtmSelected(Atm),
    SelectionCleared,
    DraftFieldSet(ReportField),
    DraftReset,
    SubmitSucceeded { notice: String },
    SubmitFailed { message: String },
}

pub fn reduce(state: &SessionState, event: SessionEvent) -> SessionState {
    let mut next = state.clone();
    match event {
        SessionEvent::PincodeEdited(text) => next.pincode_input = text,
        SessionEvent::SearchStarted { token, pincode } => {
            // Tokens only move forward; a late Started from a superseded
            // caller must not regress the latest marker.
            if token > next.search_token {
                next.search_token = token;
                next.last_pincode = Some(pincode);
                next.phase = SearchPhase::Loading;
                next.banner = None;
            }
        }
        SessionEvent::SearchSucceeded { token, atms } => {
            if token == next.search_token {
                next.atms = atms;
                next.selected = None;
                next.phase = SearchPhase::Loaded;
            }
        }
        SessionEvent::SearchFailed { token, message } => {
            // Stale failures are dropped too; the previous listing stays
            // visible either way.
            if token == next.search_token {
                next.phase = SearchPhase::Failed;
                next.banner = Some(message);
            }
        }
        SessionEvent::AtmSelected(atm) => next.selected = Some(atm),
        SessionEvent::SelectionCleared => next.selected = None,
        SessionEvent::DraftFieldSet(field) => match field {
            ReportField::Cash(value) => next.draft.cash_status = value,
            ReportField::Deposit(value) => next.draft.deposit_status = value,
            ReportField::Passbook(value) => next.draft.passbook_status = value,
        },
        SessionEvent::DraftReset => next.draft = Report::default(),
        SessionEvent::SubmitSucceeded { notice } => {
            next.notice = Some(notice);
            next.banner = None;
        }
        SessionEvent::SubmitFailed { message } => {
            next.banner = Some(message);
            next.notice = None;
        }
    }
    next
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
