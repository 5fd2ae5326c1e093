//! The swap form's validation behaviour
//!
//! Local required-field checks decorate the field they concern. Everything
//! the server reports lands on the invoice field, whichever field the server
//! actually objected to.

use serde::Serialize;
use std::sync::Arc;

use crate::config::{FormConfig, TransportPolicy};
use crate::error::FormError;
use crate::field::{Field, FieldId, InvoiceForm, DEPOSIT_PLACEHOLDER, INVOICE_REQUIRED};
use crate::remote::{CrossValidator, ValidationRequest, Verdict};

/// Whether the form may be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Submission {
    Allowed,
    Blocked,
}

impl Submission {
    pub fn is_allowed(self) -> bool {
        self == Submission::Allowed
    }
}

pub struct FormValidator {
    form: InvoiceForm,
    validator: Arc<dyn CrossValidator>,
    config: FormConfig,
}

impl FormValidator {
    pub fn new(form: InvoiceForm, validator: Arc<dyn CrossValidator>, config: FormConfig) -> Self {
        Self {
            form,
            validator,
            config,
        }
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    pub fn invoice(&self) -> &Field {
        &self.form.invoice
    }

    pub fn deposit(&self) -> &Field {
        &self.form.deposit
    }

    pub fn on_blur(&mut self, id: FieldId) {
        self.form.field_mut(id).on_blur();
    }

    pub fn on_focus(&mut self, id: FieldId) {
        self.form.field_mut(id).on_focus();
    }

    /// New invoice text: re-run the cross-validation
    pub async fn on_invoice_changed(&mut self, value: impl Into<String>) {
        self.on_changed(FieldId::Invoice, value.into()).await;
    }

    /// New deposit selection: re-run the cross-validation, then clear the
    /// select's own marker
    pub async fn on_deposit_changed(&mut self, value: impl Into<String>) {
        self.on_changed(FieldId::Deposit, value.into()).await;
    }

    async fn on_changed(&mut self, id: FieldId, value: String) {
        self.form.field_mut(id).set_value(value);
        self.revalidate().await;
        self.form.field_mut(id).on_selection_changed();
    }

    /// Decide whether the form may be submitted, marking every problem found
    pub async fn on_submit(&mut self) -> Submission {
        let mut check = true;

        if self.form.invoice.value().trim().is_empty() {
            self.form.invoice.show_validate();
            check = false;
        }

        if self.form.deposit.value() == DEPOSIT_PLACEHOLDER {
            self.form.deposit.show_validate();
            check = false;
        }

        if let Verdict::Invalid(msg) = self.check_valid().await {
            self.alert_invalid(msg);
            check = false;
        }

        let submission = if check {
            Submission::Allowed
        } else {
            Submission::Blocked
        };
        tracing::debug!(?submission, "form submit");
        submission
    }

    /// Ask the server about the current deposit/invoice pair.
    ///
    /// No request is made unless a deposit is chosen and the invoice is
    /// non-empty. The invoice is not trimmed here, unlike the submit check.
    pub async fn check_valid(&self) -> Verdict {
        let deposit = self.form.deposit.value();
        let invoice = self.form.invoice.value();
        if deposit == DEPOSIT_PLACEHOLDER || invoice.is_empty() {
            return Verdict::Valid;
        }

        let request = ValidationRequest {
            deposit: deposit.to_string(),
            invoice: invoice.to_string(),
        };

        let outcome = match tokio::time::timeout(self.config.timeout, self.validator.validate(&request)).await {
            Ok(result) => result,
            Err(_) => Err(FormError::Timeout(self.config.timeout)),
        };

        match outcome {
            Ok(verdict) => verdict,
            Err(err) => self.transport_failure(err),
        }
    }

    fn transport_failure(&self, err: FormError) -> Verdict {
        match self.config.on_transport_failure {
            TransportPolicy::FailOpen => {
                tracing::warn!(error = %err, "cross-validation failed, treating form as valid");
                Verdict::Valid
            }
            TransportPolicy::FailClosed => {
                tracing::warn!(error = %err, "cross-validation failed, blocking form");
                Verdict::Invalid(self.config.transport_failure_message.clone())
            }
        }
    }

    async fn revalidate(&mut self) {
        match self.check_valid().await {
            Verdict::Invalid(msg) => self.alert_invalid(msg),
            Verdict::Valid => self.hide_invalid(),
        }
    }

    fn alert_invalid(&mut self, message: String) {
        self.form.invoice.alert(message);
    }

    fn hide_invalid(&mut self) {
        self.form.invoice.reset(INVOICE_REQUIRED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replies with a fixed body and records every request it sees
    struct Scripted {
        reply: Mutex<Result<String, u16>>,
        delay: Duration,
        calls: AtomicUsize,
        /// Calls that ran to the end
        finished: AtomicUsize,
        seen: Mutex<Vec<ValidationRequest>>,
    }

    impl Scripted {
        fn replying(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(body.to_string())),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Err(status)),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(String::new())),
                delay,
                calls: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn set_reply(&self, body: &str) {
            *self.reply.lock().unwrap() = Ok(body.to_string());
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CrossValidator for Scripted {
        async fn validate(&self, request: &ValidationRequest) -> crate::Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply.lock().unwrap().clone();
            match reply {
                Ok(body) => Ok(Verdict::from_body(body)),
                Err(status) => Err(FormError::Status(status)),
            }
        }
    }

    fn validator_with(remote: Arc<Scripted>, config: FormConfig) -> FormValidator {
        FormValidator::new(InvoiceForm::default(), remote, config)
    }

    fn validator(remote: Arc<Scripted>) -> FormValidator {
        validator_with(remote, FormConfig::default())
    }

    #[tokio::test]
    async fn test_empty_invoice_blocks_submit() {
        let remote = Scripted::replying("");
        let mut form = validator(remote.clone());
        form.on_deposit_changed("bc").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert!(form.invoice().is_invalid());
        assert_eq!(form.invoice().message(), INVOICE_REQUIRED);
        assert!(!form.deposit().is_invalid());
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_invoice_blocks_but_still_validates_remotely() {
        let remote = Scripted::replying("Invalid index of 1");
        let mut form = validator(remote.clone());
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("   ").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert_eq!(form.invoice().message(), "Invalid index of 1");
        // once for the change, once for the submit
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_placeholder_deposit_blocks_submit() {
        let remote = Scripted::replying("");
        let mut form = validator(remote.clone());
        form.on_invoice_changed("lnbc1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert!(form.deposit().is_invalid());
        assert!(!form.invoice().is_invalid());
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_pair_allows_submit() {
        let remote = Scripted::replying("");
        let mut form = validator(remote.clone());
        form.on_deposit_changed("tb").await;
        form.on_invoice_changed("lntb1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Allowed);
        assert!(!form.invoice().is_invalid());
        assert!(!form.deposit().is_invalid());

        let seen = remote.seen.lock().unwrap();
        assert_eq!(
            seen.last(),
            Some(&ValidationRequest {
                deposit: "tb".into(),
                invoice: "lntb1invoice".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_remote_error_blocks_submit() {
        let remote = Scripted::replying("Invalid invoice");
        let mut form = validator(remote);
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert_eq!(
            form.invoice().state(),
            &FieldState {
                invalid: true,
                message: "Invalid invoice".into()
            }
        );
    }

    #[tokio::test]
    async fn test_no_request_without_both_fields() {
        let remote = Scripted::replying("Invalid invoice");
        let mut form = validator(remote.clone());

        assert_eq!(form.check_valid().await, Verdict::Valid);
        form.on_invoice_changed("lnbc1invoice").await;
        assert_eq!(form.check_valid().await, Verdict::Valid);

        form.on_invoice_changed("").await;
        form.on_deposit_changed("bc").await;
        assert_eq!(form.check_valid().await, Verdict::Valid);

        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_focus_clears_marker_only() {
        let remote = Scripted::replying("Invalid invoice");
        let mut form = validator(remote);
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;
        assert!(form.invoice().is_invalid());

        form.on_focus(FieldId::Invoice);
        assert!(!form.invoice().is_invalid());
        assert_eq!(form.invoice().message(), "Invalid invoice");
    }

    #[tokio::test]
    async fn test_change_to_valid_resets_message() {
        let remote = Scripted::replying("Invoice has already expired");
        let mut form = validator(remote.clone());
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1old").await;
        assert_eq!(form.invoice().message(), "Invoice has already expired");

        remote.set_reply("");
        form.on_invoice_changed("lnbc1new").await;
        assert_eq!(form.invoice().state(), &FieldState::new(INVOICE_REQUIRED));
    }

    #[tokio::test]
    async fn test_deposit_change_clears_its_marker() {
        let remote = Scripted::replying("");
        let mut form = validator(remote);
        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert!(form.deposit().is_invalid());

        form.on_deposit_changed("ltc").await;
        assert!(!form.deposit().is_invalid());
    }

    #[tokio::test]
    async fn test_blur_marks_filled_fields() {
        let remote = Scripted::replying("");
        let mut form = validator(remote);
        form.on_invoice_changed("lnbc1invoice").await;
        form.on_blur(FieldId::Invoice);
        assert!(form.invoice().has_val());

        form.on_invoice_changed("  ").await;
        form.on_blur(FieldId::Invoice);
        assert!(!form.invoice().has_val());
    }

    #[tokio::test]
    async fn test_transport_failure_fails_closed() {
        let remote = Scripted::failing(502);
        let mut form = validator(remote);
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert_eq!(
            form.invoice().message(),
            FormConfig::default().transport_failure_message
        );
    }

    #[tokio::test]
    async fn test_transport_failure_fails_open() {
        let remote = Scripted::failing(502);
        let config = FormConfig {
            on_transport_failure: TransportPolicy::FailOpen,
            ..FormConfig::default()
        };
        let mut form = validator_with(remote, config);
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Allowed);
        assert!(!form.invoice().is_invalid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_transport_failure() {
        let remote = Scripted::slow(Duration::from_secs(60));
        let config = FormConfig {
            timeout: Duration::from_secs(1),
            ..FormConfig::default()
        };
        let mut form = validator_with(remote, config);
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;

        assert_eq!(form.on_submit().await, Submission::Blocked);
        assert!(form.invoice().is_invalid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_cancels_request() {
        let remote = Scripted::slow(Duration::from_secs(5));
        let mut form = validator(remote.clone());
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;
        form.on_blur(FieldId::Invoice);
        assert_eq!((remote.calls(), remote.finished()), (1, 1));

        let invoice = form.invoice().clone();
        let deposit = form.deposit().clone();

        tokio::select! {
            _ = form.on_submit() => panic!("submit finished before the slow reply"),
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
        assert_eq!(remote.calls(), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(remote.finished(), 1);
        assert_eq!(Arc::strong_count(&remote), 2);
        assert_eq!(form.invoice().state(), invoice.state());
        assert_eq!(form.invoice().has_val(), invoice.has_val());
        assert_eq!(form.deposit().state(), deposit.state());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_check_leaves_no_work_behind() {
        let remote = Scripted::slow(Duration::from_secs(5));
        let mut form = validator(remote.clone());
        form.on_deposit_changed("bc").await;
        form.on_invoice_changed("lnbc1invoice").await;

        tokio::select! {
            _ = form.check_valid() => panic!("check finished before the slow reply"),
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!((remote.calls(), remote.finished()), (2, 1));
    }
}
