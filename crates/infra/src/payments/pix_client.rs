use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// A consolidated PIX charge issued by the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PixCharge {
    pub payment_url: String,
    pub qr_code_text: String,
    pub qr_code_image: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("payment provider credentials are not configured")]
    MissingCredentials,

    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider returned status {status}")]
    Provider { status: u16 },
}

#[derive(Debug, Serialize)]
struct ChargeRequest<'a> {
    amount_minor: i64,
    description: &'a str,
}

/// Minimal PIX charge client built on reqwest. Every call is bounded by the
/// client-wide timeout; a missing API key short-circuits before any request.
pub struct PixClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl PixClient {
    pub fn new(api_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_url,
            api_key,
        })
    }

    pub async fn create_pix_charge(
        &self,
        amount_minor: i64,
        description: &str,
    ) -> Result<PixCharge, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials)?;

        let url = format!("{}/v1/pix/charges", self.api_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&ChargeRequest {
                amount_minor,
                description,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = match resp.text().await {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => "<empty response body>".to_string(),
                Err(err) => format!("<failed to read response body: {err}>"),
            };

            error!(
                status,
                response_body = %body,
                "pix api request failed"
            );

            return Err(ProviderError::Provider { status });
        }

        let charge: PixCharge = resp.json().await?;
        Ok(charge)
    }
}
