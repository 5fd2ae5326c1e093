//! Server-side cross-validation of the invoice and deposit fields

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::error::{FormError, Result};

/// Path of the cross-validation endpoint, relative to the form's page
pub const VALIDATE_PATH: &str = "ajaxvalidateform";

/// Body posted to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRequest {
    pub deposit: String,
    pub invoice: String,
}

/// Outcome of a cross-validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "message", rename_all = "lowercase")]
pub enum Verdict {
    Valid,
    /// Message to show on the invoice field, verbatim
    Invalid(String),
}

impl Verdict {
    /// An empty body means valid; anything else is the error message
    pub fn from_body(body: impl Into<String>) -> Self {
        let body = body.into();
        if body.is_empty() {
            Verdict::Valid
        } else {
            Verdict::Invalid(body)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(msg) => Some(msg),
        }
    }
}

/// Anything that can judge a deposit/invoice pair
#[async_trait]
pub trait CrossValidator: Send + Sync {
    async fn validate(&self, request: &ValidationRequest) -> Result<Verdict>;
}

/// Cross-validator backed by the swap service's HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpCrossValidator {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpCrossValidator {
    /// `base` is the URL of the page hosting the form
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = reqwest::Url::parse(base).map_err(|e| FormError::InvalidEndpoint(e.to_string()))?;
        let endpoint = base
            .join(VALIDATE_PATH)
            .map_err(|e| FormError::InvalidEndpoint(e.to_string()))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl CrossValidator for HttpCrossValidator {
    async fn validate(&self, request: &ValidationRequest) -> Result<Verdict> {
        tracing::debug!(endpoint = %self.endpoint, deposit = %request.deposit, "cross-validating form");

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(Verdict::from_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ValidationRequest {
        ValidationRequest {
            deposit: "tb".into(),
            invoice: "lntb1invoice".into(),
        }
    }

    #[test]
    fn test_verdict_from_body() {
        assert_eq!(Verdict::from_body(""), Verdict::Valid);
        assert_eq!(Verdict::from_body(" "), Verdict::Invalid(" ".into()));
        assert_eq!(Verdict::from_body("Invalid invoice").message(), Some("Invalid invoice"));
    }

    #[test]
    fn test_endpoint_is_relative_to_page() {
        let validator = HttpCrossValidator::new("http://localhost:8080/swap", Duration::from_secs(1)).unwrap();
        assert_eq!(validator.endpoint().as_str(), "http://localhost:8080/ajaxvalidateform");

        assert!(matches!(
            HttpCrossValidator::new("not a url", Duration::from_secs(1)),
            Err(FormError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_posts_form_and_reads_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ajaxvalidateform"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("deposit=tb"))
            .and(body_string_contains("invoice=lntb1invoice"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Invalid invoice"))
            .expect(1)
            .mount(&server)
            .await;

        let validator = HttpCrossValidator::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        let verdict = validator.validate(&request()).await.unwrap();
        assert_eq!(verdict, Verdict::Invalid("Invalid invoice".into()));
    }

    #[tokio::test]
    async fn test_empty_body_is_valid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ajaxvalidateform"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let validator = HttpCrossValidator::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(validator.validate(&request()).await.unwrap(), Verdict::Valid);
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let validator = HttpCrossValidator::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            validator.validate(&request()).await,
            Err(FormError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let validator =
            HttpCrossValidator::new(&format!("{}/", server.uri()), Duration::from_millis(100)).unwrap();
        assert!(matches!(
            validator.validate(&request()).await,
            Err(FormError::Transport(_))
        ));
    }
}
