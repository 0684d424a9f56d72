use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::aggregator::{build_result, OutcomeAggregator, Partition};
use crate::gateway::{GatewayHandle, PaymentGateway};
use crate::models::{BatchResult, PaymentBatch, PaymentStatus};
use crate::strategies::{DispatchContext, DispatchError, DispatchLimits, DispatchStrategy};

/// Runs payment batches through a selected strategy and classifies the result.
///
/// The caller always gets a well-formed [`BatchResult`]. Failures of single
/// payment calls become `Failure` outcomes inside the strategies; anything that
/// breaks the orchestration itself collapses the batch to `Error`.
pub struct BatchDispatcher {
    context: Arc<DispatchContext>
}

impl BatchDispatcher {
    /// Binds the dispatcher to the current runtime and starts the fixed worker pool.
    pub fn new(gateway: Arc<dyn PaymentGateway>, limits: DispatchLimits) -> Result<Self, DispatchError> {
        let gateway = GatewayHandle::current(gateway)?;

        Ok(Self {
            context: Arc::new(DispatchContext::new(gateway, limits)?)
        })
    }

    /// Dispatches the whole batch and resolves once every payment has an outcome.
    pub async fn dispatch(&self, strategy: DispatchStrategy, batch: PaymentBatch) -> BatchResult {
        let size = batch.payments.len();
        let timer = Instant::now();

        info!("Dispatching batch of {size} payments with strategy [{strategy}]");

        match self.run(strategy, batch).await {
            Ok(partition) => {
                let result = build_result(partition);
                info!("Batch of {size} payments finished as {:?} with {} succeeded in {:?}",
                    result.classification, result.count(PaymentStatus::Success), timer.elapsed());
                result
            }
            Err(dispatch_error) => {
                error!("Payments processing failed with strategy [{strategy}]: {dispatch_error}");
                BatchResult::error()
            }
        }
    }

    async fn run(&self, strategy: DispatchStrategy, batch: PaymentBatch) -> Result<Partition, DispatchError> {
        //NOTE: The declared count is informational only; a mismatch is reported but never rejected
        if !batch.is_count_consistent() {
            warn!("Batch declares {} payments but carries {}", batch.number_of_payments, batch.payments.len());
        }

        let expected = batch.payments.len();
        let aggregator = Arc::new(OutcomeAggregator::new());
        let context = self.context.clone();
        let recorder = aggregator.clone();

        //NOTE: Running the strategy in its own task turns a panic anywhere in the orchestration into a JoinError
        tokio::spawn(async move {
            strategy.run(&context, batch.payments, &recorder).await
        }).await??;

        let recorded = aggregator.recorded();

        if recorded != expected {
            return Err(DispatchError::Incomplete { expected, recorded });
        }

        Ok(aggregator.take())
    }
}
