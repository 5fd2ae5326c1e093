//! Swap creation

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use std::fmt::Write;
use std::sync::Arc;
use submarine_payreq::{p2sh_p2wsh_address, swap_script, validate_swap};

use super::SwapForm;
use crate::{AppState, WebResult};

/// Create a swap
#[utoipa::path(
    post,
    path = "/swap",
    request_body(content = SwapForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Invoice, deposit script and deposit address", body = String, content_type = "text/plain"),
        (status = 422, description = "Per-field validation errors", body = String, content_type = "text/plain")
    ),
    tag = "swap"
)]
pub async fn create_swap(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SwapForm>,
) -> WebResult<Response> {
    let request = match validate_swap(&form.deposit, &form.invoice) {
        Ok(request) => request,
        Err(errors) => {
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()).into_response());
        }
    };

    let script = swap_script(
        &request.payreq,
        state.swap_expiry,
        &state.broker_key,
        &state.user_key,
    )?;
    let address = p2sh_p2wsh_address(&request.deposit, &script);

    tracing::info!(
        deposit = %request.deposit,
        payment_hash = %hex::encode(request.payreq.payment_hash),
        %address,
        "swap created"
    );

    let mut body = String::new();
    // Writing to a String cannot fail.
    let _ = write!(body, "invoice:\n{}\n\n", request.payreq);
    let _ = write!(body, "deposit script:\n{}\n\n", hex::encode(&script));
    let _ = write!(body, "deposit address:\n{}\n\n", address);
    if let Some(amount) = request.deposit_amount() {
        let _ = write!(body, "deposit amount:\n{} ({})\n", amount, request.deposit.name);
    }

    Ok(body.into_response())
}
