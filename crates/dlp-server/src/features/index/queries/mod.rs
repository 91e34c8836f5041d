//! Read operations against the search index

pub mod query_records;
pub mod statistics;

pub use query_records::{RecordsQueryError, RecordsQueryRequest};
pub use statistics::{StatisticsError, StatisticsQuery, StatisticsResponse};
