//! Declarative provisioning modules for the Cirro Cloud control plane.
//!
//! Each resource module (environments, clusters, service accounts, API
//! keys, users, role bindings, connectors) exposes two operations:
//!
//! - `apply` - converge the remote resource toward a desired spec and
//!   report whether anything changed
//! - `find` - list the collection, narrowed by filter predicates
//!
//! The shared convergence logic lives in [`engine`]: resolve identity in
//! the listed collection, plan create/update/delete/no-op from the
//! structural diff, and gate writes behind check mode.

pub mod api_key;
pub mod cluster;
pub mod connector;
pub mod engine;
pub mod environment;
pub mod ping;
pub mod role_binding;
pub mod service_account;
pub mod user;

pub use engine::{Action, Mode, Outcome};

/// Errors produced by provisioning operations.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Core(#[from] cirro_core::CoreError),

    #[error(transparent)]
    Api(#[from] cirro_client::ApiError),
}

/// Convenience result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
