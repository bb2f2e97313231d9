//! Engine error taxonomy: validation, not-found, conflict, and internal failures.

use thiserror::Error;

/// Errors surfaced by engine operations. Validation and not-found variants
/// leave state untouched; conflict variants describe precondition failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("missing or malformed field: {0}")]
    Validation(String),
    #[error("unknown call type: {0:?}")]
    InvalidCallType(String),
    #[error("unknown ambulance status: {0:?}")]
    InvalidStatus(String),
    #[error("hospital not found: {0:?}")]
    HospitalNotFound(String),
    #[error("ambulance not found")]
    AmbulanceNotFound,
    #[error("transport request not found")]
    RequestNotFound,
    #[error("notification not found: {0}")]
    NotificationNotFound(u64),
    #[error("no ambulances are available")]
    NoAvailableAmbulances,
    #[error("no eligible ambulance for the requested tier")]
    NoEligibleAmbulance,
    #[error("ambulance is not available")]
    AmbulanceBusy,
    #[error("break requested too early: {hours_on_shift:.1}h on shift, {required_hours:.0}h required")]
    BreakTooEarly {
        hours_on_shift: f64,
        required_hours: f64,
    },
    #[error("assignment commit lost the candidate race")]
    CommitConflict,
    #[error("malformed supply usage payload: {0}")]
    MalformedSupplyUsage(String),
}
