use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::aggregator::OutcomeAggregator;
use crate::models::{PaymentRequest, PaymentStatus};
use crate::strategies::{resolve_status, DispatchContext, DispatchError};

/// One runtime task per payment. Waiting for a permit parks the task, not the
/// OS thread beneath it.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    let gate = Arc::new(Semaphore::new(context.limits.cooperative_permits.max(1)));

    let tasks = payments.into_iter().map(|payment| {
        let gate = gate.clone();
        let gateway = context.gateway.clone();

        tokio::spawn(async move {
            let _permit = gate.acquire().await?;
            let result = gateway.submit(&payment).await;

            Ok::<_, DispatchError>((resolve_status(&payment, result), payment))
        })
    }).collect::<Vec<_>>();

    let mut groups = HashMap::<PaymentStatus, Vec<PaymentRequest>>::new();

    for joined in join_all(tasks).await {
        let (status, payment) = joined??;
        groups.entry(status).or_default().push(payment);
    }

    for (status, payments) in groups {
        aggregator.extend(status, payments);
    }

    Ok(())
}
