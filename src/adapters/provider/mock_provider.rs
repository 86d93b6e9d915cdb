//! Mock payment provider for testing.
//!
//! Configurable `PaymentProvider` implementation supporting pre-loaded
//! canonical objects, error injection, and call tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreatePreapprovalRequest, Payment, PaymentError, PaymentProvider, Preapproval,
};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.put_preapproval(Preapproval { id: "pre-1".into(), ... });
///
/// let fetched = mock.fetch_preapproval("pre-1").await?;
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Pre-loaded preapprovals by id.
    preapprovals: HashMap<String, Preapproval>,

    /// Pre-loaded payments by id.
    payments: HashMap<String, Payment>,

    /// Next checkout session returned by `create_preapproval`.
    next_checkout: Option<CheckoutSession>,

    /// Error returned by the next call, regardless of method.
    next_error: Option<PaymentError>,

    /// Recorded calls for assertions.
    call_log: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_preapproval(&self, preapproval: Preapproval) {
        let mut state = self.inner.lock().expect("mock state lock");
        state.preapprovals.insert(preapproval.id.clone(), preapproval);
    }

    pub fn put_payment(&self, payment: Payment) {
        let mut state = self.inner.lock().expect("mock state lock");
        state.payments.insert(payment.id.clone(), payment);
    }

    pub fn set_next_checkout(&self, checkout: CheckoutSession) {
        self.inner.lock().expect("mock state lock").next_checkout = Some(checkout);
    }

    pub fn set_next_error(&self, error: PaymentError) {
        self.inner.lock().expect("mock state lock").next_error = Some(error);
    }

    /// Calls recorded so far, as "method:argument" strings.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().expect("mock state lock").call_log.clone()
    }

    fn take_error(&self, call: String) -> Option<PaymentError> {
        let mut state = self.inner.lock().expect("mock state lock");
        state.call_log.push(call);
        state.next_error.take()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn fetch_preapproval(&self, preapproval_id: &str) -> Result<Preapproval, PaymentError> {
        if let Some(error) = self.take_error(format!("fetch_preapproval:{}", preapproval_id)) {
            return Err(error);
        }
        let state = self.inner.lock().expect("mock state lock");
        state
            .preapprovals
            .get(preapproval_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(preapproval_id.to_string()))
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        if let Some(error) = self.take_error(format!("fetch_payment:{}", payment_id)) {
            return Err(error);
        }
        let state = self.inner.lock().expect("mock state lock");
        state
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))
    }

    async fn create_preapproval(
        &self,
        request: CreatePreapprovalRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if let Some(error) =
            self.take_error(format!("create_preapproval:{}", request.external_reference))
        {
            return Err(error);
        }
        let mut state = self.inner.lock().expect("mock state lock");
        Ok(state.next_checkout.take().unwrap_or(CheckoutSession {
            preapproval_id: "pre-mock".to_string(),
            init_point: "https://provider.test/checkout/pre-mock".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PaymentStatus, PreapprovalStatus};

    #[tokio::test]
    async fn preloaded_preapproval_is_returned() {
        let mock = MockPaymentProvider::new();
        mock.put_preapproval(Preapproval {
            id: "pre-1".to_string(),
            status: PreapprovalStatus::Authorized,
            external_reference: "ref".to_string(),
            end_date: None,
        });

        let fetched = mock.fetch_preapproval("pre-1").await.unwrap();

        assert_eq!(fetched.status, PreapprovalStatus::Authorized);
        assert_eq!(mock.calls(), vec!["fetch_preapproval:pre-1"]);
    }

    #[tokio::test]
    async fn missing_objects_report_not_found() {
        let mock = MockPaymentProvider::new();
        assert!(matches!(
            mock.fetch_payment("nope").await,
            Err(PaymentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn injected_error_is_returned_once() {
        let mock = MockPaymentProvider::new();
        mock.put_payment(Payment {
            id: "pay-1".to_string(),
            status: PaymentStatus::Approved,
            external_reference: None,
        });
        mock.set_next_error(PaymentError::Request("down".to_string()));

        assert!(mock.fetch_payment("pay-1").await.is_err());
        assert!(mock.fetch_payment("pay-1").await.is_ok());
    }
}
