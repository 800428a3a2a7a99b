//! HTTP transport for form-encoded NVP calls

use crate::error::TransportError;
use crate::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Sends one form-encoded POST and returns the raw response body
#[async_trait]
pub trait NvpTransport: Send + Sync {
    async fn post_form(
        &self,
        url: &str,
        pairs: &[(String, String)],
    ) -> std::result::Result<String, TransportError>;
}

/// reqwest-backed transport; the client is reused across calls
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with an optional request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| PaymentError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NvpTransport for HttpTransport {
    async fn post_form(
        &self,
        url: &str,
        pairs: &[(String, String)],
    ) -> std::result::Result<String, TransportError> {
        let response = self.client.post(url).form(pairs).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
