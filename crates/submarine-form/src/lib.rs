//! Swap form validation
//!
//! Models the swap page's form: a Lightning invoice input and a deposit
//! currency select, the markers shown on them, and whether a submit may go
//! through. Required-field checks run locally; the combination of both fields
//! is judged by the server's `ajaxvalidateform` endpoint.
//!
//! ```text
//!  blur ──────────► has-val marker
//!  focus ─────────► clear invalid marker
//!  change ──┐
//!  submit ──┴─────► check_valid ──► CrossValidator (HTTP, timeout, policy)
//!                        │
//!                        └──► invoice FieldState { invalid, message }
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod remote;
pub mod validator;

pub use config::{FormConfig, TransportPolicy};
pub use error::{FormError, Result};
pub use field::{Field, FieldId, FieldKind, FieldState, InvoiceForm, DEPOSIT_PLACEHOLDER, INVOICE_REQUIRED};
pub use remote::{CrossValidator, HttpCrossValidator, ValidationRequest, Verdict};
pub use validator::{FormValidator, Submission};
