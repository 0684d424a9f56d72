//! Shared fixtures for the unit tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::gateway::{PaymentGateway, TransportError};
use crate::models::{PaymentBatch, PaymentReference, PaymentRequest};
use crate::strategies::DispatchLimits;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Approve,
    Decline,
    Fail,
    Panic
}

/// In-process gateway with scripted answers that also counts concurrent entries.
pub struct ScriptedGateway {
    default: Behavior,
    overrides: HashMap<PaymentReference, Behavior>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize
}

impl ScriptedGateway {
    pub fn new(default: Behavior) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0)
        }
    }

    pub fn approving() -> Self {
        Self::new(Behavior::Approve)
    }

    pub fn declining() -> Self {
        Self::new(Behavior::Decline)
    }

    pub fn with(mut self, reference: PaymentReference, behavior: Behavior) -> Self {
        self.overrides.insert(reference, behavior);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn submit(&self, payment: &PaymentRequest) -> Result<bool, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.overrides.get(&payment.reference).copied().unwrap_or(self.default) {
            Behavior::Approve => Ok(true),
            Behavior::Decline => Ok(false),
            Behavior::Fail => Err(TransportError::Unavailable(format!("processor unreachable for {}", payment.reference))),
            Behavior::Panic => panic!("injected fault for payment {}", payment.reference)
        }
    }
}

pub fn create_payment(amount: Decimal) -> PaymentRequest {
    PaymentRequest {
        reference: Uuid::new_v4(),
        debit_acc: "01-002-000003".to_string(),
        credit_acc: "04-005-000006".to_string(),
        amount
    }
}

pub fn create_batch(amounts: &[Decimal]) -> PaymentBatch {
    PaymentBatch::new(10, amounts.iter().copied().map(create_payment).collect())
}

/// Caps small enough to observe with a handful of delayed payments.
pub fn small_limits() -> DispatchLimits {
    DispatchLimits {
        fixed_pool_size: 4,
        merge_max_in_flight: 5,
        cooperative_permits: 3,
        lightweight_thread_permits: 3
    }
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(address)
}
