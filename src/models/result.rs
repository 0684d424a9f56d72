use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BatchClassification, PaymentReference, PaymentStatus};

/// Per-payment entry of a batch result.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub reference: PaymentReference,
    #[serde(rename = "paymentProcessingResult")]
    pub status: PaymentStatus
}

/// Classified outcome of one dispatched batch.
///
/// The order of `outcomes` is not tied to the order of the inbound batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(rename = "batchProcessingResult")]
    pub classification: BatchClassification,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,
    #[serde(rename = "paymentResults")]
    pub outcomes: Vec<PaymentOutcome>
}

impl BatchResult {
    /// The result returned when a batch could not be classified safely.
    pub fn error() -> Self {
        Self {
            classification: BatchClassification::Error,
            total_amount: Decimal::ZERO,
            outcomes: Vec::new()
        }
    }

    pub fn count(&self, status: PaymentStatus) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.status == status).count()
    }
}
