use std::sync::Arc;
use std::thread::Builder;

use tracing::error;

use crate::aggregator::OutcomeAggregator;
use crate::models::PaymentRequest;
use crate::strategies::{execute_blocking, DispatchContext, DispatchError};
use crate::sync::{CompletionLatch, CompletionSignal};

/// Queues every payment onto the long-lived fixed worker pool.
pub(super) async fn dispatch_fixed(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    start_all(payments, |payment, signal| {
        let gateway = context.gateway.clone();
        let aggregator = aggregator.clone();

        let accepted = context.fixed_pool.execute(move || {
            let _signal = signal;
            execute_blocking(&gateway, payment, &aggregator);
        });

        if accepted { Ok(()) } else { Err(DispatchError::PoolClosed) }
    }).await
}

/// Starts a new OS thread for every payment, without any admission limit.
pub(super) async fn dispatch_unbounded(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    start_all(payments, |payment, signal| {
        let gateway = context.gateway.clone();
        let aggregator = aggregator.clone();

        Builder::new()
            .name("payment-unbounded".to_string())
            .spawn(move || {
                let _signal = signal;
                execute_blocking(&gateway, payment, &aggregator);
            })?;

        Ok(())
    }).await
}

/// Hands each payment to `start` together with its completion signal, then
/// waits for all of them.
///
/// `start` must drop the signal when it fails. After the first failure no
/// further payments are started, but every payment already started is still
/// awaited before the failure is returned.
pub(super) async fn start_all<F>(payments: Vec<PaymentRequest>, mut start: F) -> Result<(), DispatchError>
where
    F: FnMut(PaymentRequest, CompletionSignal) -> Result<(), DispatchError>,
{
    let latch = Arc::new(CompletionLatch::new(payments.len()));
    let mut unstarted = payments.len();
    let mut failure = None;

    for payment in payments {
        unstarted -= 1;

        if let Err(start_error) = start(payment, latch.signal()) {
            error!("Failed to start payment, waiting for the ones already started: {start_error}");
            failure = Some(start_error);
            break;
        }
    }

    for _ in 0..unstarted {
        latch.count_down();
    }

    latch.wait().await;

    match failure {
        Some(failure) => Err(failure),
        None => Ok(())
    }
}
