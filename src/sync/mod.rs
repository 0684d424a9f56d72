mod completion_latch;
#[cfg(test)]
mod tests;
mod worker_pool;

pub use completion_latch::{CompletionLatch, CompletionSignal};
pub use worker_pool::WorkerPool;
