mod callback;
mod cooperative;
mod errors;
mod lightweight_threads;
mod parallel_stream;
mod sequential;
mod streaming_merge;
mod thread_pool;

use std::fmt::{self, Display, Formatter};
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error};

use crate::aggregator::OutcomeAggregator;
use crate::gateway::{GatewayHandle, TransportError};
use crate::models::{PaymentRequest, PaymentStatus};
use crate::sync::WorkerPool;

pub use errors::{DispatchError, UnknownStrategy};

/// Concurrency discipline used to fan a batch out to the gateway.
///
/// Every variant records exactly one outcome per payment into the aggregator
/// and only returns once all of them are recorded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DispatchStrategy {
    /// One call at a time, in input order.
    Sequential,
    /// Platform-parallelism OS workers draining a shared queue.
    ParallelStream,
    /// Long-lived pool of `fixed_pool_size` OS workers.
    FixedPool,
    /// A fresh OS thread for every payment.
    UnboundedPool,
    /// Deferred calls completed through a shared callback and a latch.
    Callback,
    /// Async calls merged with at most `merge_max_in_flight` in flight.
    StreamingMerge,
    /// Runtime tasks gated by `cooperative_permits` semaphore permits.
    Cooperative,
    /// Small-stack OS threads gated by `lightweight_thread_permits` permits.
    LightweightThreads
}

impl DispatchStrategy {
    pub const ALL: [DispatchStrategy; 8] = [
        DispatchStrategy::Sequential,
        DispatchStrategy::ParallelStream,
        DispatchStrategy::FixedPool,
        DispatchStrategy::UnboundedPool,
        DispatchStrategy::Callback,
        DispatchStrategy::StreamingMerge,
        DispatchStrategy::Cooperative,
        DispatchStrategy::LightweightThreads
    ];

    /// Value of the `Router` header selecting this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            DispatchStrategy::Sequential => "SEQ",
            DispatchStrategy::ParallelStream => "PARALLEL_STREAM",
            DispatchStrategy::FixedPool => "PARALLEL_FIX_100",
            DispatchStrategy::UnboundedPool => "PARALLEL_NO_LIM",
            DispatchStrategy::Callback => "ASYNC",
            DispatchStrategy::StreamingMerge => "REACTIVE",
            DispatchStrategy::Cooperative => "COROUTINES",
            DispatchStrategy::LightweightThreads => "VIRTUAL_THREADS"
        }
    }

    /// Dispatches every payment and records its outcome.
    pub async fn run(self, context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
        match self {
            DispatchStrategy::Sequential => sequential::dispatch(context, payments, aggregator).await,
            DispatchStrategy::ParallelStream => parallel_stream::dispatch(context, payments, aggregator).await,
            DispatchStrategy::FixedPool => thread_pool::dispatch_fixed(context, payments, aggregator).await,
            DispatchStrategy::UnboundedPool => thread_pool::dispatch_unbounded(context, payments, aggregator).await,
            DispatchStrategy::Callback => callback::dispatch(context, payments, aggregator).await,
            DispatchStrategy::StreamingMerge => streaming_merge::dispatch(context, payments, aggregator).await,
            DispatchStrategy::Cooperative => cooperative::dispatch(context, payments, aggregator).await,
            DispatchStrategy::LightweightThreads => lightweight_threads::dispatch(context, payments, aggregator).await
        }
    }
}

impl FromStr for DispatchStrategy {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DispatchStrategy::ALL.into_iter()
            .find(|strategy| strategy.name() == value)
            .ok_or_else(|| UnknownStrategy(value.to_string()))
    }
}

impl Display for DispatchStrategy {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Admission caps of the bounded strategies. A cap of zero is treated as one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchLimits {
    pub fixed_pool_size: usize,
    pub merge_max_in_flight: usize,
    pub cooperative_permits: usize,
    pub lightweight_thread_permits: usize
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            fixed_pool_size: 100,
            merge_max_in_flight: 3000,
            cooperative_permits: 3000,
            lightweight_thread_permits: 2000
        }
    }
}

/// Everything a strategy needs besides the payments themselves.
pub struct DispatchContext {
    pub gateway: GatewayHandle,
    pub limits: DispatchLimits,
    fixed_pool: WorkerPool
}

impl DispatchContext {
    /// Starts the long-lived fixed worker pool alongside the gateway.
    pub fn new(gateway: GatewayHandle, limits: DispatchLimits) -> io::Result<Self> {
        let fixed_pool = WorkerPool::new(limits.fixed_pool_size, "payment-worker")?;

        Ok(Self {
            gateway,
            limits,
            fixed_pool
        })
    }
}

/// Maps one gateway answer to its outcome. Transport errors never escape a strategy.
pub(crate) fn resolve_status(payment: &PaymentRequest, result: Result<bool, TransportError>) -> PaymentStatus {
    match result {
        Ok(true) => PaymentStatus::Success,
        Ok(false) => {
            debug!("Payment {} declined by processor", payment.reference);
            PaymentStatus::Failure
        }
        Err(transport_error) => {
            error!("Payment execution error for {}: {transport_error}", payment.reference);
            PaymentStatus::Failure
        }
    }
}

/// Body shared by the OS-thread strategies: blocking call, then record.
fn execute_blocking(gateway: &GatewayHandle, payment: PaymentRequest, aggregator: &OutcomeAggregator) {
    let result = gateway.submit_blocking(&payment);
    let status = resolve_status(&payment, result);
    aggregator.record(payment, status);
}
