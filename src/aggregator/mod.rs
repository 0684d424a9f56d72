mod outcome_aggregator;
mod result_builder;

pub use outcome_aggregator::{OutcomeAggregator, Partition};
pub use result_builder::build_result;
