mod payment;
mod result;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use payment::{PaymentBatch, PaymentRequest};
pub use result::{BatchResult, PaymentOutcome};

pub type PaymentReference = Uuid;

/// Outcome of a single gateway call as seen by the aggregator.
///
/// Declined payments and payments whose call failed in transport are both `Failure`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Failure
}

/// Batch level summary derived from the succeeded/failed partition.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchClassification {
    All,
    Partial,
    None,
    Error
}

impl BatchClassification {
    /// Classifies a partition by its sizes. An empty batch is `None`.
    pub fn classify(succeeded: usize, failed: usize) -> Self {
        if failed == 0 && succeeded > 0 {
            BatchClassification::All
        } else if succeeded == 0 {
            BatchClassification::None
        } else {
            BatchClassification::Partial
        }
    }
}
