//! Validation of a swap request: deposit currency plus Lightning invoice

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::currency::{currency_from_invoice, Currency};
use crate::invoice::{decode_invoice_at, PayReq};

pub const DEPOSIT_NOT_SUPPORTED: &str = "Deposit currency is not supported";
pub const NETWORK_MISMATCH: &str = "Both deposit and invoice currencies must be on same network";

/// A swap request whose fields all passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub deposit: Currency,
    pub payreq: PayReq,
}

impl SwapRequest {
    /// Deposit owed for the invoice, in the deposit currency's smallest unit
    pub fn deposit_amount(&self) -> Option<u64> {
        let sat = self.payreq.amount_sat()?;
        let rate = self.payreq.currency.rate_to(&self.deposit)?;
        Some((sat as f64 * rate).ceil() as u64)
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwapErrors {
    pub deposit: Option<String>,
    pub invoice: Option<String>,
}

impl SwapErrors {
    pub fn is_empty(&self) -> bool {
        self.deposit.is_none() && self.invoice.is_none()
    }

    /// The message a single-field form shows: invoice first, then deposit
    pub fn first(&self) -> Option<&str> {
        self.invoice.as_deref().or(self.deposit.as_deref())
    }
}

impl fmt::Display for SwapErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.deposit {
            writeln!(f, "deposit: {}", msg)?;
        }
        if let Some(msg) = &self.invoice {
            writeln!(f, "invoice: {}", msg)?;
        }
        Ok(())
    }
}

/// Validate a deposit currency HRP and BOLT11 invoice together
pub fn validate_swap(deposit: &str, invoice: &str) -> Result<SwapRequest, SwapErrors> {
    validate_swap_at(deposit, invoice, Utc::now())
}

pub fn validate_swap_at(
    deposit: &str,
    invoice: &str,
    now: DateTime<Utc>,
) -> Result<SwapRequest, SwapErrors> {
    let invoice = invoice.trim();
    let mut errors = SwapErrors::default();

    let deposit = match Currency::from_hrp(deposit.trim()) {
        Ok(c) => Some(c),
        Err(_) => {
            errors.deposit = Some(DEPOSIT_NOT_SUPPORTED.to_string());
            None
        }
    };

    match currency_from_invoice(invoice) {
        Ok(inv_currency) => {
            if let Some(dep) = deposit {
                if dep.network != inv_currency.network {
                    errors.invoice = Some(NETWORK_MISMATCH.to_string());
                }
            }
        }
        Err(e) => errors.invoice = Some(e.to_string()),
    }

    let payreq = match decode_invoice_at(invoice, now) {
        Ok(p) => Some(p),
        Err(e) => {
            if errors.invoice.is_none() {
                errors.invoice = Some(e.to_string());
            }
            None
        }
    };

    match (deposit, payreq) {
        (Some(deposit), Some(payreq)) if errors.is_empty() => Ok(SwapRequest { deposit, payreq }),
        _ => {
            tracing::debug!(?errors, "swap request rejected");
            Err(errors)
        }
    }
}
