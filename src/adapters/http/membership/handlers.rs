//! HTTP handlers for the membership endpoints.
//!
//! Connects axum routes to the application layer command/query handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, info, warn};

use crate::application::handlers::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreateSubscriptionHandler,
    GetMySubscriptionsHandler, GetMySubscriptionsQuery, GetPlanAnalyticsHandler,
    ListMembershipsHandler, ReconcileWebhookCommand, ReconcileWebhookHandler,
    StartCheckoutCommand, StartCheckoutHandler, UpdateMembershipCommand, UpdateMembershipHandler,
};
use crate::domain::foundation::{CustomerId, Money, SubscriptionId};
use crate::domain::membership::{ProviderEvent, SubscriptionError};
use crate::ports::{
    CustomerDirectory, MembershipRepository, PaymentProvider, SubscriptionLinker,
    SubscriptionStore,
};

use super::dto::{
    CancelSubscriptionRequest, CheckoutResponse, ErrorResponse, MembershipResponse,
    PlanAnalyticsResponse, StartCheckoutRequest, SubscriptionResponse, UpdateMembershipRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; everything inside is Arc-wrapped.
#[derive(Clone)]
pub struct MembershipAppState {
    pub customer_directory: Arc<dyn CustomerDirectory>,
    pub membership_repository: Arc<dyn MembershipRepository>,
    pub subscription_store: Arc<dyn SubscriptionStore>,
    pub subscription_linker: Arc<dyn SubscriptionLinker>,
    pub payment_provider: Arc<dyn PaymentProvider>,

    /// Where the provider sends the customer after checkout.
    pub checkout_back_url: String,
}

impl MembershipAppState {
    /// Create handlers on demand from the shared state.
    pub fn list_memberships_handler(&self) -> ListMembershipsHandler {
        ListMembershipsHandler::new(self.membership_repository.clone())
    }

    pub fn update_membership_handler(&self) -> UpdateMembershipHandler {
        UpdateMembershipHandler::new(self.membership_repository.clone())
    }

    pub fn my_subscriptions_handler(&self) -> GetMySubscriptionsHandler {
        GetMySubscriptionsHandler::new(
            self.subscription_store.clone(),
            self.subscription_linker.clone(),
        )
    }

    pub fn analytics_handler(&self) -> GetPlanAnalyticsHandler {
        GetPlanAnalyticsHandler::new(
            self.membership_repository.clone(),
            self.subscription_store.clone(),
        )
    }

    pub fn checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(
            self.customer_directory.clone(),
            self.membership_repository.clone(),
            self.payment_provider.clone(),
            self.checkout_back_url.clone(),
        )
    }

    pub fn cancel_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.subscription_store.clone())
    }

    pub fn webhook_handler(&self) -> ReconcileWebhookHandler {
        let creator = Arc::new(CreateSubscriptionHandler::new(
            self.customer_directory.clone(),
            self.membership_repository.clone(),
            self.subscription_store.clone(),
            self.subscription_linker.clone(),
        ));
        ReconcileWebhookHandler::new(
            self.payment_provider.clone(),
            self.subscription_store.clone(),
            creator,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Customer Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated customer context extracted from the request.
///
/// In production this would come from a session or JWT validated by auth
/// middleware; for development and testing an X-Customer-Id header is
/// accepted.
#[derive(Debug, Clone)]
pub struct AuthenticatedCustomer {
    pub customer_id: CustomerId,
}

/// Rejection type for AuthenticatedCustomer extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedCustomer
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let customer_id = parts
                .headers
                .get("X-Customer-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| CustomerId::from_str(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedCustomer { customer_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /membership - List all membership plans
pub async fn list_memberships(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let plans = state.list_memberships_handler().handle().await?;
    let response: Vec<MembershipResponse> =
        plans.into_iter().map(MembershipResponse::from).collect();
    Ok(Json(response))
}

/// GET /membership/subscription/me - Current customer's active subscriptions
pub async fn get_my_subscriptions(
    State(state): State<MembershipAppState>,
    customer: AuthenticatedCustomer,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.my_subscriptions_handler();
    let subscriptions = handler
        .handle(GetMySubscriptionsQuery {
            customer_id: customer.customer_id,
        })
        .await?;

    let response: Vec<SubscriptionResponse> = subscriptions
        .into_iter()
        .map(SubscriptionResponse::from)
        .collect();
    Ok(Json(response))
}

/// GET /membership/subscription/analytics - Per-plan aggregates
pub async fn get_plan_analytics(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let rows = state.analytics_handler().handle().await?;
    let response: Vec<PlanAnalyticsResponse> =
        rows.into_iter().map(PlanAnalyticsResponse::from).collect();
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// PUT /membership - Partially update a membership plan
pub async fn update_membership(
    State(state): State<MembershipAppState>,
    Json(request): Json<UpdateMembershipRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let price = request
        .price_cents
        .map(Money::from_cents)
        .transpose()
        .map_err(|e| SubscriptionError::validation("price_cents", e.to_string()))?;

    let handler = state.update_membership_handler();
    let result = handler
        .handle(UpdateMembershipCommand {
            id: request.id,
            name: request.name,
            description: request.description,
            price,
        })
        .await?;

    Ok(Json(MembershipResponse::from(result.plan)))
}

/// POST /membership/subscription/checkout - Start the checkout flow
pub async fn start_checkout(
    State(state): State<MembershipAppState>,
    customer: AuthenticatedCustomer,
    Json(request): Json<StartCheckoutRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.checkout_handler();
    let result = handler
        .handle(StartCheckoutCommand {
            customer_id: customer.customer_id,
            membership_id: request.membership_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(result))))
}

/// POST /membership/subscription/cancel - Cancel a subscription
pub async fn cancel_subscription(
    State(state): State<MembershipAppState>,
    customer: AuthenticatedCustomer,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let subscription_id = SubscriptionId::from_str(&request.subscription_id)
        .map_err(|_| SubscriptionError::validation("subscription_id", "not a valid id"))?;

    let handler = state.cancel_handler();
    let cancelled = handler
        .handle(CancelSubscriptionCommand {
            customer_id: customer.customer_id,
            subscription_id,
        })
        .await?;

    Ok(Json(SubscriptionResponse::from(cancelled)))
}

/// POST /membership/subscription - Payment provider webhook
///
/// Always acknowledges with 200 and an empty JSON body. The provider treats
/// anything else as a delivery failure and retries; reconciliation problems
/// are logged and resolved out of band, not signalled back.
pub async fn handle_provider_webhook(
    State(state): State<MembershipAppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let event: ProviderEvent = match serde_json::from_value(payload) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "unparseable provider event acknowledged");
            return Json(serde_json::json!({}));
        }
    };

    match state
        .webhook_handler()
        .handle(ReconcileWebhookCommand { event })
        .await
    {
        Ok(outcome) => info!(outcome = ?outcome, "provider event reconciled"),
        Err(e) => error!(error = %e, "provider event reconciliation failed"),
    }

    Json(serde_json::json!({}))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct MembershipApiError(SubscriptionError);

impl From<SubscriptionError> for MembershipApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for MembershipApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(SubscriptionError::from(err))
    }
}

impl IntoResponse for MembershipApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            SubscriptionError::CustomerNotFound(_) => {
                (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND")
            }
            SubscriptionError::MembershipNotFound(_) => {
                (StatusCode::NOT_FOUND, "MEMBERSHIP_NOT_FOUND")
            }
            SubscriptionError::SubscriptionNotFound(_) => {
                (StatusCode::NOT_FOUND, "SUBSCRIPTION_NOT_FOUND")
            }
            SubscriptionError::DuplicateExternalId(_) => {
                (StatusCode::CONFLICT, "DUPLICATE_EXTERNAL_ID")
            }
            SubscriptionError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            SubscriptionError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            SubscriptionError::Correlation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CORRELATION_FAILED")
            }
            SubscriptionError::PaymentFailed { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_PROVIDER_ERROR")
            }
            SubscriptionError::LinkCreationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "LINK_CREATION_FAILED")
            }
            SubscriptionError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
