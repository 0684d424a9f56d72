use dashmap::DashMap;

use crate::models::{PaymentRequest, PaymentStatus};

/// Thread-safe accumulator partitioning dispatched payments by status.
///
/// Any number of tasks or OS threads may record concurrently; each payment is
/// stored exactly once per `record` call.
#[derive(Debug, Default)]
pub struct OutcomeAggregator {
    partitions: DashMap<PaymentStatus, Vec<PaymentRequest>>
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self {
            partitions: DashMap::new()
        }
    }

    pub fn record(&self, payment: PaymentRequest, status: PaymentStatus) {
        self.partitions.entry(status).or_default().push(payment);
    }

    /// Records a group of payments that share one status.
    pub fn extend(&self, status: PaymentStatus, payments: Vec<PaymentRequest>) {
        self.partitions.entry(status).or_default().extend(payments);
    }

    /// Number of outcomes recorded so far.
    pub fn recorded(&self) -> usize {
        self.partitions.iter().map(|partition| partition.value().len()).sum()
    }

    /// Drains everything recorded so far into a partition.
    pub fn take(&self) -> Partition {
        Partition {
            succeeded: self.drain(PaymentStatus::Success),
            failed: self.drain(PaymentStatus::Failure)
        }
    }

    fn drain(&self, status: PaymentStatus) -> Vec<PaymentRequest> {
        self.partitions.remove(&status).map(|(_, payments)| payments).unwrap_or_default()
    }
}

/// Succeeded/failed split of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub succeeded: Vec<PaymentRequest>,
    pub failed: Vec<PaymentRequest>
}

#[cfg(test)]
impl Partition {
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
