//! Form validation settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a failed cross-validation request means for the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportPolicy {
    /// Treat the failure as an invalid invoice and block submission
    #[default]
    FailClosed,
    /// Treat the failure as a valid response
    FailOpen,
}

/// Form validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Upper bound for a single cross-validation call
    #[serde(with = "millis")]
    pub timeout: Duration,
    pub on_transport_failure: TransportPolicy,
    /// Message shown on the invoice field when a fail-closed call fails
    pub transport_failure_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            on_transport_failure: TransportPolicy::FailClosed,
            transport_failure_message: "Unable to validate invoice, please try again".into(),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
