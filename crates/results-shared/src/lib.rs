//! Data model shared by the harness and anything consuming its result files:
//! raw records, configuration identifiers, the aggregation store and its summary.

mod configuration;
mod record;
mod store;
mod summary;

pub use configuration::ConfigurationId;
pub use record::{Metric, RawRecord, TEST_FIELD};
pub use store::{AggregationStore, ConfigurationCells};
pub use summary::{SUMMARY_DECIMALS, Summary, TestSummary, summarize};
