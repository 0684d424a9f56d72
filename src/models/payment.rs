use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PaymentReference;

/// A single payment instruction, submitted to the processor as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Unique reference of the payment.
    pub reference: PaymentReference,
    pub debit_acc: String,
    pub credit_acc: String,
    /// Exact amount; travels as a JSON number without float rounding.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal
}

/// Inbound batch of independent payment instructions.
///
/// `number_of_payments` and `priority` are informational only. The dispatcher
/// never reconciles the declared count against `payments.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBatch {
    pub number_of_payments: i32,
    pub priority: i32,
    /// Creation time, carried as epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub payments: Vec<PaymentRequest>
}

impl PaymentBatch {
    /// Builds a batch whose declared count matches the payments it carries.
    pub fn new(priority: i32, payments: Vec<PaymentRequest>) -> Self {
        Self {
            number_of_payments: i32::try_from(payments.len()).unwrap_or(i32::MAX),
            priority,
            date: Utc::now(),
            payments
        }
    }

    /// Whether the declared `numberOfPayments` agrees with the actual list.
    pub fn is_count_consistent(&self) -> bool {
        usize::try_from(self.number_of_payments).is_ok_and(|declared| declared == self.payments.len())
    }
}
