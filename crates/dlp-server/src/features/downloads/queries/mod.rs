//! Read operations for download jobs

pub mod get;
pub mod list;

pub use get::{GetDownloadJobError, GetDownloadJobQuery};
pub use list::{ListDownloadJobsError, ListDownloadJobsQuery};
