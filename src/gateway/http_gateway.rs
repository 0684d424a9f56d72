use async_trait::async_trait;
use reqwest::Client;

use crate::gateway::{PaymentGateway, TransportError};
use crate::models::PaymentRequest;

const EXECUTE_PATH: &str = "/payment/execute";

/// Gateway talking JSON over HTTP to the remote payment processor.
///
/// No retries and no request timeout: a hung processor call hangs its batch.
pub struct HttpPaymentGateway {
    client: Client,
    endpoint: String
}

impl HttpPaymentGateway {
    /// Creates a gateway for the processor at `base_url`, keeping up to
    /// `connection_pool_size` idle connections open.
    pub fn new(base_url: &str, connection_pool_size: usize) -> Result<Self, TransportError> {
        let client = Client::builder()
            .pool_max_idle_per_host(connection_pool_size)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), EXECUTE_PATH)
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn submit(&self, payment: &PaymentRequest) -> Result<bool, TransportError> {
        let response = self.client.post(&self.endpoint)
            .json(payment)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        Ok(response.json::<bool>().await?)
    }
}
