#![forbid(unsafe_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use vc_core::validate::NationalIdVerdict;

pub const DEFAULT_CPF_ENDPOINT: &str = "https://api.brasilaberto.com/v1/cpf";

/// Confirms a national id (CPF, 11 digits, punctuation already stripped) with an
/// external authority.
#[async_trait]
pub trait NationalIdVerifier: Send + Sync {
    async fn verify(&self, digits: &str) -> NationalIdVerdict;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HttpVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpVerifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn url_for(&self, digits: &str) -> String {
        format!("{}/{digits}", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl NationalIdVerifier for HttpVerifier {
    async fn verify(&self, digits: &str) -> NationalIdVerdict {
        let response = match self
            .client
            .get(self.url_for(digits))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "national id lookup failed");
                return NationalIdVerdict::Unknown;
            }
        };

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            warn!(status = status.as_u16(), "national id service unavailable");
            return NationalIdVerdict::Unknown;
        }
        if status.is_client_error() {
            debug!(status = status.as_u16(), "national id rejected by service");
            return NationalIdVerdict::Invalid;
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "unexpected national id response");
            return NationalIdVerdict::Unknown;
        }

        match response.json::<VerifyResponse>().await {
            Ok(body) if body.status.as_deref() == Some("OK") => NationalIdVerdict::Valid,
            Ok(_) => NationalIdVerdict::Invalid,
            Err(err) => {
                warn!(error = %err, "national id response body unreadable");
                NationalIdVerdict::Unknown
            }
        }
    }
}

/// Never reaches the network. Every lookup is [`NationalIdVerdict::Unknown`], so the
/// configured policy alone decides.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineVerifier;

#[async_trait]
impl NationalIdVerifier for OfflineVerifier {
    async fn verify(&self, _digits: &str) -> NationalIdVerdict {
        NationalIdVerdict::Unknown
    }
}
