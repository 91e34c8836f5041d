//! Write operations for download jobs

pub mod prerender;
pub mod request;

pub use prerender::{PrerenderCommand, PrerenderError};
pub use request::{RequestDownloadCommand, RequestDownloadError};
