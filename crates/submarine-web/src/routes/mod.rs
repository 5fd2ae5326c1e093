//! HTTP routes

pub mod health;
pub mod pages;
pub mod refund;
pub mod swap;
pub mod validate;

use serde::Deserialize;
use utoipa::ToSchema;

/// Fields posted by the swap form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SwapForm {
    /// Deposit currency HRP, or the placeholder option text
    pub deposit: String,
    /// BOLT11 Lightning invoice
    pub invoice: String,
}
