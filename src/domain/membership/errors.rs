//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | CustomerNotFound | 404 |
//! | MembershipNotFound | 404 |
//! | SubscriptionNotFound | 404 |
//! | DuplicateExternalId | 409 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Correlation | 422 (never surfaced from the webhook path) |
//! | LinkCreationFailed | 500 |
//! | PaymentFailed | 402 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};

use super::PlanTier;

/// Errors raised by subscription lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The customer identity does not exist.
    CustomerNotFound(CustomerId),

    /// No plan exists for the given tier.
    MembershipNotFound(PlanTier),

    /// The subscription does not exist.
    SubscriptionNotFound(String),

    /// A subscription with this provider id already exists.
    DuplicateExternalId(String),

    /// The external reference could not be correlated to local state.
    ///
    /// Terminal inside webhook reconciliation: a malformed reference will
    /// never become valid on retry.
    Correlation(String),

    /// The customer-subscription link could not be created.
    ///
    /// Named and monitorable rather than silently swallowed; the fallback
    /// customer-id scan still discovers the subscription.
    LinkCreationFailed(String),

    /// Invalid status for the requested transition.
    InvalidState { current: String, attempted: String },

    /// The payment provider call failed.
    PaymentFailed { reason: String },

    /// Request-level validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn customer_not_found(id: CustomerId) -> Self {
        SubscriptionError::CustomerNotFound(id)
    }

    pub fn membership_not_found(tier: PlanTier) -> Self {
        SubscriptionError::MembershipNotFound(tier)
    }

    pub fn subscription_not_found(id: impl Into<String>) -> Self {
        SubscriptionError::SubscriptionNotFound(id.into())
    }

    pub fn duplicate_external_id(external_id: impl Into<String>) -> Self {
        SubscriptionError::DuplicateExternalId(external_id.into())
    }

    pub fn correlation(message: impl Into<String>) -> Self {
        SubscriptionError::Correlation(message.into())
    }

    pub fn link_creation_failed(message: impl Into<String>) -> Self {
        SubscriptionError::LinkCreationFailed(message.into())
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        SubscriptionError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        SubscriptionError::PaymentFailed {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::CustomerNotFound(_) => ErrorCode::CustomerNotFound,
            SubscriptionError::MembershipNotFound(_) => ErrorCode::MembershipNotFound,
            SubscriptionError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::DuplicateExternalId(_) => ErrorCode::DuplicateExternalId,
            SubscriptionError::Correlation(_) => ErrorCode::CorrelationFailed,
            SubscriptionError::LinkCreationFailed(_) => ErrorCode::LinkCreationFailed,
            SubscriptionError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            SubscriptionError::PaymentFailed { .. } => ErrorCode::PaymentProviderError,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::CustomerNotFound(id) => {
                format!("Customer not found: {}", id)
            }
            SubscriptionError::MembershipNotFound(tier) => {
                format!("No membership plan found for tier: {}", tier)
            }
            SubscriptionError::SubscriptionNotFound(id) => {
                format!("Subscription not found: {}", id)
            }
            SubscriptionError::DuplicateExternalId(external_id) => {
                format!("A subscription already exists for provider id {}", external_id)
            }
            SubscriptionError::Correlation(message) => {
                format!("Could not correlate provider state: {}", message)
            }
            SubscriptionError::LinkCreationFailed(message) => {
                format!("Customer-subscription link creation failed: {}", message)
            }
            SubscriptionError::InvalidState { current, attempted } => {
                format!("Cannot move subscription from {} to {}", current, attempted)
            }
            SubscriptionError::PaymentFailed { reason } => {
                format!("Payment provider call failed: {}", reason)
            }
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(message) => format!("Error: {}", message),
        }
    }

    /// Returns true if the error occurred before any mutation could happen.
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            SubscriptionError::CustomerNotFound(_)
                | SubscriptionError::MembershipNotFound(_)
                | SubscriptionError::ValidationFailed { .. }
                | SubscriptionError::Correlation(_)
        )
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DuplicateExternalId => SubscriptionError::DuplicateExternalId(
                err.details
                    .get("external_id")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ErrorCode::ValidationFailed => SubscriptionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SubscriptionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_not_found_maps_to_its_code() {
        let id = CustomerId::new();
        let err = SubscriptionError::customer_not_found(id);
        assert!(matches!(err, SubscriptionError::CustomerNotFound(i) if i == id));
        assert_eq!(err.code(), ErrorCode::CustomerNotFound);
    }

    #[test]
    fn membership_not_found_names_the_tier() {
        let err = SubscriptionError::membership_not_found(PlanTier::Elite);
        assert!(err.message().contains("elite"));
        assert_eq!(err.code(), ErrorCode::MembershipNotFound);
    }

    #[test]
    fn duplicate_external_id_round_trips_through_domain_error() {
        let domain = DomainError::new(ErrorCode::DuplicateExternalId, "conflict")
            .with_detail("external_id", "pre-9");
        let err = SubscriptionError::from(domain);
        assert!(matches!(err, SubscriptionError::DuplicateExternalId(id) if id == "pre-9"));
    }

    #[test]
    fn pre_mutation_errors_are_flagged() {
        assert!(SubscriptionError::customer_not_found(CustomerId::new()).is_pre_mutation());
        assert!(SubscriptionError::validation("name", "bad").is_pre_mutation());
        assert!(!SubscriptionError::link_creation_failed("down").is_pre_mutation());
        assert!(!SubscriptionError::infrastructure("down").is_pre_mutation());
    }

    #[test]
    fn display_uses_message() {
        let err = SubscriptionError::payment_failed("timeout");
        assert_eq!(format!("{}", err), "Payment provider call failed: timeout");
    }
}
