//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payments_types::{
    AppError, CardPaymentCharger, CustomerRepository, PaymentId, PaymentRepository,
    PaymentRequest, RegistrationRequest,
};

use crate::{PaymentService, RegistrationService};

/// Application state shared across handlers.
pub struct AppState<C, P, G>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    pub registration: RegistrationService<C>,
    pub payments: PaymentService<C, P, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Validation(_) | AppError::UnsupportedCurrency(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ChargeDeclined => StatusCode::PAYMENT_REQUIRED,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::PaymentNotRecorded(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::Validation(rejection.body_text()))
    }
}

/// JSON body extractor whose rejections use the API error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Register a customer (idempotent for identical name and phone number).
#[tracing::instrument(skip(state, req), fields(phone_number = %req.phone_number))]
pub async fn register_customer<C, P, G>(
    State(state): State<Arc<AppState<C, P, G>>>,
    ApiJson(req): ApiJson<RegistrationRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    let customer = state.registration.register(req).await?;
    Ok(Json(customer))
}

/// Charge a customer's card.
#[tracing::instrument(
    skip(state, req),
    fields(customer_id = ?req.customer_id, amount = %req.amount, currency = %req.currency)
)]
pub async fn make_payment<C, P, G>(
    State(state): State<Arc<AppState<C, P, G>>>,
    ApiJson(req): ApiJson<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    let customer_id = req
        .customer_id
        .ok_or_else(|| AppError::Validation("customer_id is required".into()))?;

    let payment = state.payments.charge_card(customer_id, req).await?;
    Ok(Json(payment))
}

/// Get payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<C, P, G>(
    State(state): State<Arc<AppState<C, P, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardPaymentCharger,
{
    let payment_id: PaymentId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("Not a payment id: {}", id)))?;

    let payment = state
        .payments
        .find_payment_by_id(payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {}", payment_id)))?;
    Ok(Json(payment))
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}
