//! Write operations against the search index

pub mod delete_record;

pub use delete_record::{DeleteRecordCommand, DeleteRecordError};
