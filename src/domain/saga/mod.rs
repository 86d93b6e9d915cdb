//! Generic saga runner - ordered steps with reverse-order compensation.
//!
//! A saga is an explicit list of `{action, compensation}` pairs. Steps run
//! sequentially in one request; when an action fails, the compensations of
//! every previously-succeeded step run in reverse order and the runner
//! returns a single aggregated error.
//!
//! Compensation failures are logged and collected, never re-thrown: the
//! runner is already on an error-recovery path and a partially-compensated
//! outcome is an accepted, visible limitation.

mod runner;

pub use runner::{
    CompensationFailure, FailurePolicy, Saga, SagaError, SagaReport, SagaStep, ToleratedFailure,
};
