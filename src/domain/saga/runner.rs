//! Saga step and runner implementation.

use std::fmt;

use futures::future::BoxFuture;
use futures::FutureExt;

/// What the runner does when a step's action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the saga and compensate previously-succeeded steps.
    Abort,

    /// Record the failure and keep going. Used where leaving the earlier
    /// steps' effects in place is an explicit policy decision.
    Tolerate,
}

type StepFn<E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), E>> + Send>;

/// One step of a saga: a named action with an optional compensation.
pub struct SagaStep<E> {
    name: &'static str,
    policy: FailurePolicy,
    action: StepFn<E>,
    compensation: Option<StepFn<E>>,
}

impl<E> SagaStep<E> {
    /// Creates a step with the given action, no compensation, and the
    /// default `Abort` failure policy.
    pub fn new<F, Fut>(name: &'static str, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), E>> + Send + 'static,
    {
        Self {
            name,
            policy: FailurePolicy::Abort,
            action: Box::new(move || action().boxed()),
            compensation: None,
        }
    }

    /// Attaches a compensation that undoes this step's effect.
    pub fn with_compensation<F, Fut>(mut self, compensation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), E>> + Send + 'static,
    {
        self.compensation = Some(Box::new(move || compensation().boxed()));
        self
    }

    /// Marks this step's failure as tolerated rather than fatal.
    pub fn tolerate_failure(mut self) -> Self {
        self.policy = FailurePolicy::Tolerate;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A compensation that itself failed while rolling back.
#[derive(Debug)]
pub struct CompensationFailure<E> {
    pub step: &'static str,
    pub error: E,
}

/// A tolerated step failure the saga kept going past.
#[derive(Debug)]
pub struct ToleratedFailure<E> {
    pub step: &'static str,
    pub error: E,
}

/// Aggregated saga failure: the failing step plus whatever went wrong while
/// compensating.
#[derive(Debug)]
pub struct SagaError<E> {
    pub failed_step: &'static str,
    pub source: E,
    pub compensation_failures: Vec<CompensationFailure<E>>,
}

impl<E: fmt::Display> fmt::Display for SagaError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "saga step '{}' failed: {}", self.failed_step, self.source)?;
        if !self.compensation_failures.is_empty() {
            write!(
                f,
                " ({} compensation(s) also failed)",
                self.compensation_failures.len()
            )?;
        }
        Ok(())
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for SagaError<E> {}

/// Outcome of a saga that ran to completion.
#[derive(Debug, Default)]
pub struct SagaReport<E> {
    /// Failures that were tolerated by step policy.
    pub tolerated: Vec<ToleratedFailure<E>>,
}

impl<E> SagaReport<E> {
    fn new() -> Self {
        Self { tolerated: Vec::new() }
    }
}

/// Ordered list of steps executed with compensation semantics.
pub struct Saga<E> {
    name: &'static str,
    steps: Vec<SagaStep<E>>,
}

impl<E: fmt::Display + Send> Saga<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Appends a step. Steps run in insertion order.
    pub fn step(mut self, step: SagaStep<E>) -> Self {
        self.steps.push(step);
        self
    }

    /// Runs the saga to completion or to the first fatal failure.
    ///
    /// On a fatal failure, compensations of all previously-succeeded steps
    /// run in reverse order. Compensation errors are logged and carried in
    /// the returned [`SagaError`]; they never mask the original failure.
    pub async fn run(self) -> Result<SagaReport<E>, SagaError<E>> {
        let saga_name = self.name;
        let mut completed: Vec<(&'static str, StepFn<E>)> = Vec::new();
        let mut report = SagaReport::new();

        for step in self.steps {
            let step_name = step.name;
            match (step.action)().await {
                Ok(()) => {
                    if let Some(compensation) = step.compensation {
                        completed.push((step_name, compensation));
                    }
                }
                Err(error) => match step.policy {
                    FailurePolicy::Tolerate => {
                        tracing::warn!(
                            saga = saga_name,
                            step = step_name,
                            error = %error,
                            "saga step failed; tolerated by policy"
                        );
                        report.tolerated.push(ToleratedFailure {
                            step: step_name,
                            error,
                        });
                    }
                    FailurePolicy::Abort => {
                        tracing::error!(
                            saga = saga_name,
                            step = step_name,
                            error = %error,
                            "saga step failed; compensating in reverse order"
                        );
                        let mut compensation_failures = Vec::new();
                        for (name, compensation) in completed.into_iter().rev() {
                            if let Err(comp_error) = compensation().await {
                                tracing::error!(
                                    saga = saga_name,
                                    step = name,
                                    error = %comp_error,
                                    "compensation failed; state may be partially compensated"
                                );
                                compensation_failures.push(CompensationFailure {
                                    step: name,
                                    error: comp_error,
                                });
                            }
                        }
                        return Err(SagaError {
                            failed_step: step_name,
                            source: error,
                            compensation_failures,
                        });
                    }
                },
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct StepError(&'static str);

    impl fmt::Display for StepError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    fn trace_step(
        name: &'static str,
        log: &Arc<Mutex<Vec<String>>>,
        fail: bool,
    ) -> SagaStep<StepError> {
        let action_log = log.clone();
        let comp_log = log.clone();
        SagaStep::new(name, move || async move {
            if fail {
                return Err(StepError("boom"));
            }
            action_log.lock().unwrap().push(format!("do:{}", name));
            Ok(())
        })
        .with_compensation(move || async move {
            comp_log.lock().unwrap().push(format!("undo:{}", name));
            Ok(())
        })
    }

    #[tokio::test]
    async fn all_steps_run_in_order_on_success() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let report = Saga::new("test")
            .step(trace_step("a", &log, false))
            .step(trace_step("b", &log, false))
            .step(trace_step("c", &log, false))
            .run()
            .await
            .unwrap();

        assert!(report.tolerated.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["do:a", "do:b", "do:c"]);
    }

    #[tokio::test]
    async fn failure_compensates_completed_steps_in_reverse_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let err = Saga::new("test")
            .step(trace_step("a", &log, false))
            .step(trace_step("b", &log, false))
            .step(trace_step("c", &log, true))
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.failed_step, "c");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["do:a", "do:b", "undo:b", "undo:a"]
        );
    }

    #[tokio::test]
    async fn steps_without_compensation_are_skipped_during_rollback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let verify_log = log.clone();

        let err = Saga::new("test")
            .step(SagaStep::new("verify", move || {
                let log = verify_log.clone();
                async move {
                    log.lock().unwrap().push("do:verify".to_string());
                    Ok(())
                }
            }))
            .step(trace_step("persist", &log, false))
            .step(trace_step("link", &log, true))
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.failed_step, "link");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["do:verify", "do:persist", "undo:persist"]
        );
    }

    #[tokio::test]
    async fn tolerated_failure_keeps_earlier_effects_in_place() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let report = Saga::new("test")
            .step(trace_step("persist", &log, false))
            .step(trace_step("link", &log, true).tolerate_failure())
            .run()
            .await
            .unwrap();

        assert_eq!(report.tolerated.len(), 1);
        assert_eq!(report.tolerated[0].step, "link");
        // No undo entries: persist stays in place.
        assert_eq!(*log.lock().unwrap(), vec!["do:persist"]);
    }

    #[tokio::test]
    async fn compensation_failures_are_collected_not_rethrown() {
        let comp_calls = Arc::new(AtomicUsize::new(0));
        let calls = comp_calls.clone();

        let err = Saga::new("test")
            .step(
                SagaStep::new("persist", || async { Ok(()) }).with_compensation(move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(StepError("undo failed"))
                    }
                }),
            )
            .step(SagaStep::new("link", || async { Err(StepError("boom")) }))
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.failed_step, "link");
        assert_eq!(err.source, StepError("boom"));
        assert_eq!(err.compensation_failures.len(), 1);
        assert_eq!(err.compensation_failures[0].step, "persist");
        assert_eq!(comp_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_fatal_failure_stops_later_steps() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let _ = Saga::new("test")
            .step(trace_step("a", &log, true))
            .step(trace_step("b", &log, false))
            .run()
            .await;

        assert!(log.lock().unwrap().is_empty());
    }
}
