use std::collections::HashMap;
use std::sync::Arc;

use futures::{stream, StreamExt};
use tracing::info;

use crate::aggregator::OutcomeAggregator;
use crate::models::{PaymentRequest, PaymentStatus};
use crate::strategies::{resolve_status, DispatchContext, DispatchError};

/// Merges the calls into one stream with a bounded number in flight, groups
/// the answers by status, then hands the groups to the aggregator.
///
/// Transport errors become `Failure` entries inside the stream, so they land
/// in the failed group like any declined payment.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    let max_in_flight = context.limits.merge_max_in_flight.max(1);
    let gateway = &context.gateway;

    let groups = stream::iter(payments)
        .map(move |payment| async move {
            let result = gateway.submit(&payment).await;
            (resolve_status(&payment, result), payment)
        })
        .buffer_unordered(max_in_flight)
        .fold(HashMap::<PaymentStatus, Vec<PaymentRequest>>::new(), |mut groups, (status, payment)| async move {
            groups.entry(status).or_default().push(payment);
            groups
        })
        .await;

    info!("All payments processed");

    for (status, payments) in groups {
        aggregator.extend(status, payments);
    }

    Ok(())
}
