mod errors;
mod http_gateway;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::PaymentRequest;

pub use errors::TransportError;
pub use http_gateway::HttpPaymentGateway;

/// Remote payment processor: one call per payment, `true` when executed.
///
/// The contract is asynchronous. Blocking and future-returning callers go
/// through [`GatewayHandle`] instead of requiring every implementation to
/// support each convention natively.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn submit(&self, payment: &PaymentRequest) -> Result<bool, TransportError>;
}

/// A gateway bound to the runtime that drives its calls.
#[derive(Clone)]
pub struct GatewayHandle {
    gateway: Arc<dyn PaymentGateway>,
    runtime: Handle
}

impl GatewayHandle {
    pub fn new(gateway: Arc<dyn PaymentGateway>, runtime: Handle) -> Self {
        Self {
            gateway,
            runtime
        }
    }

    /// Binds the gateway to the runtime of the calling task.
    pub fn current(gateway: Arc<dyn PaymentGateway>) -> Result<Self, TryCurrentError> {
        Ok(Self::new(gateway, Handle::try_current()?))
    }

    /// Suspends the calling task until the processor answers.
    pub async fn submit(&self, payment: &PaymentRequest) -> Result<bool, TransportError> {
        debug!("Executing payment {}", payment.reference);
        self.gateway.submit(payment).await
    }

    /// Blocks the calling OS thread until the processor answers.
    ///
    /// Must not be called from a runtime worker thread.
    pub fn submit_blocking(&self, payment: &PaymentRequest) -> Result<bool, TransportError> {
        self.block_on(self.submit(payment))
    }

    /// Starts the call on the runtime and hands back its pending completion.
    pub fn submit_deferred(&self, payment: PaymentRequest) -> JoinHandle<(PaymentRequest, Result<bool, TransportError>)> {
        let handle = self.clone();

        self.runtime.spawn(async move {
            let result = handle.submit(&payment).await;
            (payment, result)
        })
    }

    /// Drives an arbitrary future to completion from a plain OS thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
