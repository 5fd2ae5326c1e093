//! Cross-validation endpoint used by the swap form

use axum::Form;
use submarine_payreq::validate_swap;

use super::SwapForm;

/// Cross-validate the swap form.
///
/// Answers with an empty body when the pair is acceptable, otherwise with a
/// single message for the form to show: the invoice problem if there is one,
/// else the deposit problem.
#[utoipa::path(
    post,
    path = "/ajaxvalidateform",
    request_body(content = SwapForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Empty when valid, else the error message", body = String, content_type = "text/plain")
    ),
    tag = "swap"
)]
pub async fn validate_form(Form(form): Form<SwapForm>) -> String {
    match validate_swap(&form.deposit, &form.invoice) {
        Ok(_) => String::new(),
        Err(errors) => errors.first().unwrap_or_default().to_string(),
    }
}
