//! Form fields and their validation markers

use serde::Serialize;

pub use submarine_payreq::DEPOSIT_PLACEHOLDER;

/// Message the invoice field carries whenever it is not showing a remote error
pub const INVOICE_REQUIRED: &str = "Lightning invoice is required";

pub const DEPOSIT_REQUIRED: &str = "Deposit currency is required";

/// Validation marker of a field's wrapper: whether it is shown as invalid,
/// and the message it would display.
///
/// Both parts live together so that every update is applied as one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub invalid: bool,
    pub message: String,
}

impl FieldState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            invalid: false,
            message: message.into(),
        }
    }
}

/// Which of the form's fields an event targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Invoice,
    Deposit,
}

/// How a field is rendered, which decides the generic handlers it receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Floating-label text input
    Text,
    /// Select-style dropdown; a change clears its own invalid marker
    Select,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    value: String,
    /// Floating-label marker, set on blur when the field holds text
    has_val: bool,
    state: FieldState,
}

impl Field {
    pub fn text(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            value: String::new(),
            has_val: false,
            state: FieldState::new(message),
        }
    }

    pub fn select(name: &'static str, initial: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name,
            kind: FieldKind::Select,
            value: initial.into(),
            has_val: false,
            state: FieldState::new(message),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn has_val(&self) -> bool {
        self.has_val
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn is_invalid(&self) -> bool {
        self.state.invalid
    }

    pub fn message(&self) -> &str {
        &self.state.message
    }

    pub fn on_blur(&mut self) {
        self.has_val = !self.value.trim().is_empty();
    }

    /// Focus hides the marker but keeps the stored message
    pub fn on_focus(&mut self) {
        self.hide_validate();
    }

    /// Generic select-style reset; no-op for text inputs
    pub fn on_selection_changed(&mut self) {
        if self.kind == FieldKind::Select {
            self.hide_validate();
        }
    }

    pub fn show_validate(&mut self) {
        self.state.invalid = true;
    }

    pub fn hide_validate(&mut self) {
        self.state.invalid = false;
    }

    /// Replace the message and mark the field invalid
    pub fn alert(&mut self, message: impl Into<String>) {
        self.state = FieldState {
            invalid: true,
            message: message.into(),
        };
    }

    /// Replace the message and clear the marker
    pub fn reset(&mut self, message: impl Into<String>) {
        self.state = FieldState {
            invalid: false,
            message: message.into(),
        };
    }
}

/// The swap form: a Lightning invoice input and a deposit currency select
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceForm {
    pub invoice: Field,
    pub deposit: Field,
}

impl InvoiceForm {
    pub fn new(invoice: Field, deposit: Field) -> Self {
        Self { invoice, deposit }
    }

    pub fn field(&self, id: FieldId) -> &Field {
        match id {
            FieldId::Invoice => &self.invoice,
            FieldId::Deposit => &self.deposit,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        match id {
            FieldId::Invoice => &mut self.invoice,
            FieldId::Deposit => &mut self.deposit,
        }
    }
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new(
            Field::text("invoice", INVOICE_REQUIRED),
            Field::select("deposit", DEPOSIT_PLACEHOLDER, DEPOSIT_REQUIRED),
        )
    }
}
