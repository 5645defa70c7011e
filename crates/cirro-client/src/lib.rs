//! HTTP transport for the Cirro Cloud control-plane API.
//!
//! The control plane speaks JSON over REST with HTTP Basic auth (an API
//! key/secret pair). This crate owns everything between a resource module
//! and the wire:
//!
//! - [`ClientConfig`] - endpoint, credentials, timeout, and retry policy
//! - [`ApiClient`] - request execution with rate-limit backoff
//! - [`Page`] - the collection envelope with cursor pagination
//!
//! Absent resources are not errors here: 404 and 204 responses surface as
//! `Ok(None)` so the reconciliation layer can treat "not found" as an
//! ordinary current state.

pub mod client;
pub mod config;
pub mod error;
pub mod page;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use page::{Page, PageMetadata};
