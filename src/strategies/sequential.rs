use std::sync::Arc;

use crate::aggregator::OutcomeAggregator;
use crate::models::PaymentRequest;
use crate::strategies::{resolve_status, DispatchContext, DispatchError};

/// Baseline: one suspended call at a time, in input order.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    for payment in payments {
        let result = context.gateway.submit(&payment).await;
        let status = resolve_status(&payment, result);
        aggregator.record(payment, status);
    }

    Ok(())
}
