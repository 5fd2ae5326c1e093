//! Swap form checker
//!
//! Fills the swap form the way a browser would and reports whether the
//! server would let it through.
//!
//! # Usage
//!
//! ```bash
//! submarine-check --invoice lntb2500u1... --deposit tltc
//! submarine-check --url http://swap.local/swap --invoice lnbc1... --deposit bc --format json
//! ```
//!
//! # Exit status
//!
//! - `0`: the form would be submitted
//! - `1`: the form would be blocked. With the default fail-closed policy this
//!   includes an unreachable service, an error status, or a timeout.
//! - `2`: `--url` is not a valid URL

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submarine_form::{
    FieldId, FieldState, FormConfig, FormValidator, HttpCrossValidator, InvoiceForm, Submission,
    TransportPolicy, DEPOSIT_PLACEHOLDER,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "submarine-check")]
#[command(version)]
#[command(about = "Check a swap form submission against a running swap service", long_about = None)]
struct Cli {
    /// URL of the page hosting the swap form
    #[arg(long, env = "SUBMARINE_URL", default_value = "http://localhost:8080/swap")]
    url: String,

    /// Lightning invoice to enter
    #[arg(long, default_value = "")]
    invoice: String,

    /// Deposit currency HRP to select
    #[arg(long, default_value = DEPOSIT_PLACEHOLDER)]
    deposit: String,

    /// Cross-validation timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Let the submission through when the service cannot be reached
    #[arg(long)]
    fail_open: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    format: OutputFormat,
}

const EXIT_BLOCKED: i32 = 1;
const EXIT_BAD_URL: i32 = 2;

fn exit_status(submission: Submission) -> i32 {
    if submission.is_allowed() {
        0
    } else {
        EXIT_BLOCKED
    }
}

#[derive(Serialize)]
struct Report<'a> {
    submission: Submission,
    invoice: &'a FieldState,
    deposit: &'a FieldState,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = FormConfig {
        timeout: Duration::from_millis(cli.timeout_ms),
        on_transport_failure: if cli.fail_open {
            TransportPolicy::FailOpen
        } else {
            TransportPolicy::FailClosed
        },
        ..FormConfig::default()
    };

    let remote = match HttpCrossValidator::new(&cli.url, config.timeout) {
        Ok(remote) => remote,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_BAD_URL);
        }
    };

    let mut form = FormValidator::new(InvoiceForm::default(), Arc::new(remote), config);
    form.on_deposit_changed(cli.deposit).await;
    form.on_blur(FieldId::Deposit);
    form.on_invoice_changed(cli.invoice).await;
    form.on_blur(FieldId::Invoice);
    let submission = form.on_submit().await;

    let report = Report {
        submission,
        invoice: form.invoice().state(),
        deposit: form.deposit().state(),
    };

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        OutputFormat::Table => {
            println!("{:<10} {:<8} MESSAGE", "FIELD", "INVALID");
            for (name, state) in [("invoice", report.invoice), ("deposit", report.deposit)] {
                println!("{:<10} {:<8} {}", name, state.invalid, state.message);
            }
            println!("submission: {:?}", report.submission);
        }
    }

    std::process::exit(exit_status(submission));
}
