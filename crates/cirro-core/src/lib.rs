pub mod diff;
pub mod error;
pub mod selector;
pub mod state;

pub use error::{CoreError, ErrorCategory, Result};
pub use selector::Selector;
pub use state::DesiredState;
