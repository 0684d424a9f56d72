use rust_decimal::Decimal;
use tracing::error;

use crate::aggregator::Partition;
use crate::models::{BatchClassification, BatchResult, PaymentOutcome, PaymentRequest, PaymentStatus};

/// Turns a succeeded/failed partition into the classified batch result.
///
/// The total covers succeeded payments only and is summed exactly. A total
/// that overflows `Decimal` cannot be reported, so the batch becomes `Error`.
pub fn build_result(partition: Partition) -> BatchResult {
    let Partition { succeeded, failed } = partition;
    let classification = BatchClassification::classify(succeeded.len(), failed.len());

    let Some(total_amount) = succeeded.iter()
        .try_fold(Decimal::ZERO, |total, payment| total.checked_add(payment.amount)) else {
        error!("Total amount of {} succeeded payments overflowed", succeeded.len());
        return BatchResult::error();
    };

    let outcomes = tag(succeeded, PaymentStatus::Success)
        .chain(tag(failed, PaymentStatus::Failure))
        .collect();

    BatchResult {
        classification,
        total_amount,
        outcomes
    }
}

fn tag(payments: Vec<PaymentRequest>, status: PaymentStatus) -> impl Iterator<Item = PaymentOutcome> {
    payments.into_iter().map(move |payment| PaymentOutcome {
        reference: payment.reference,
        status
    })
}
