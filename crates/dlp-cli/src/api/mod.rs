//! HTTP API access for the DLP server

pub mod client;
pub mod endpoints;

pub use client::ApiClient;
