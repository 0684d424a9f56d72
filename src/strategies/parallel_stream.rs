use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::task::spawn_blocking;

use crate::aggregator::OutcomeAggregator;
use crate::models::PaymentRequest;
use crate::strategies::{execute_blocking, DispatchContext, DispatchError};

/// Splits the batch across as many OS workers as the platform reports
/// parallelism for. There is no cap beyond that.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    let gateway = context.gateway.clone();
    let aggregator = aggregator.clone();

    spawn_blocking(move || {
        let parallelism = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);
        let workers = parallelism.min(payments.len());
        let queue = Mutex::new(payments.into_iter());

        //NOTE: Scoped workers propagate a panic to this closure, which surfaces as a JoinError to the caller
        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let next = match queue.lock() {
                        Ok(mut queue) => queue.next(),
                        Err(_) => None
                    };

                    let Some(payment) = next else {
                        break;
                    };

                    execute_blocking(&gateway, payment, &aggregator);
                });
            }
        });
    }).await?;

    Ok(())
}
