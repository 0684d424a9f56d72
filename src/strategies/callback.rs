use std::sync::Arc;

use tracing::error;

use crate::aggregator::OutcomeAggregator;
use crate::gateway::TransportError;
use crate::models::PaymentRequest;
use crate::strategies::{resolve_status, DispatchContext, DispatchError};
use crate::sync::CompletionLatch;

/// Fires every call up front and lets a completion callback record each
/// answer. The latch is the only barrier; nothing limits calls in flight.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    let latch = Arc::new(CompletionLatch::new(payments.len()));

    let on_complete = {
        let aggregator = aggregator.clone();
        Arc::new(move |payment: PaymentRequest, result: Result<bool, TransportError>| {
            let status = resolve_status(&payment, result);
            aggregator.record(payment, status);
        })
    };

    for payment in payments {
        let pending = context.gateway.submit_deferred(payment);
        let on_complete = on_complete.clone();
        let signal = latch.signal();

        tokio::spawn(async move {
            let _signal = signal;

            match pending.await {
                Ok((payment, result)) => on_complete(payment, result),
                Err(join_error) => error!("Payment completion was lost: {join_error}")
            }
        });
    }

    latch.wait().await;

    Ok(())
}
