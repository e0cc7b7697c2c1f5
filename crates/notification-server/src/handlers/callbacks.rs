//! Payment notification callbacks.
//!
//! Each handler parses the notification, verifies its signature and only then
//! publishes it. A mismatched notification is answered with 401 and dropped.

use axum::extract::{Form, Query, State};
use axum::Json;
use fawry_core::signing::{SignedNotification, Verification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::events::PaymentEvent;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub status: String,
    /// Subscribers the event reached. Zero means nobody was listening.
    pub delivered: usize,
}

type Pairs = Vec<(String, String)>;

/// `POST /callbacks/v2` with a JSON body.
pub async fn receive_v2(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<AcceptedResponse>> {
    let verification = state.verifier.verify_v2_json(&body)?;
    accept(&state, verification)
}

/// `GET /callbacks/v1` with the notification in the query string.
pub async fn receive_v1_query(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Pairs>,
) -> ApiResult<Json<AcceptedResponse>> {
    let verification = state.verifier.verify_v1_pairs(pairs)?;
    accept(&state, verification)
}

/// `POST /callbacks/v1` with a form-encoded body.
pub async fn receive_v1_form(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Pairs>,
) -> ApiResult<Json<AcceptedResponse>> {
    let verification = state.verifier.verify_v1_pairs(pairs)?;
    accept(&state, verification)
}

fn accept<N>(state: &AppState, verification: Verification<N>) -> ApiResult<Json<AcceptedResponse>>
where
    N: SignedNotification,
    PaymentEvent: From<N>,
{
    let Some(notification) = verification.into_matched() else {
        warn!(operation = %N::OPERATION, "Rejected notification with bad signature");
        return Err(ApiError::SignatureMismatch);
    };

    let event = PaymentEvent::from(notification);
    let fawry_ref = event.fawry_ref_number.clone();
    let status = event.order_status;
    let delivered = state.publish(event);

    if delivered == 0 {
        warn!(
            operation = %N::OPERATION,
            fawry_ref = %fawry_ref,
            status = %status,
            "Authenticated payment notification had no subscribers"
        );
    }

    info!(
        operation = %N::OPERATION,
        fawry_ref = %fawry_ref,
        status = %status,
        subscribers = delivered,
        "Payment notification accepted"
    );

    Ok(Json(AcceptedResponse {
        status: "accepted".to_string(),
        delivered,
    }))
}
