//! Batch payment router: fans a batch of independent payment instructions out
//! to a remote processor under a selectable concurrency discipline and
//! classifies the aggregate outcome.

pub mod aggregator;
pub mod api;
pub mod engine;
pub mod gateway;
pub mod models;
pub mod settings;
pub mod strategies;
pub mod sync;
#[cfg(test)]
mod testing;
