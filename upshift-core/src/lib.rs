//! Upshift core library — domain types, run configuration, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and file classification
//! - [`config`] — [`RunConfig`] and `upshift.yaml` loading
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::RunConfig;
pub use error::ConfigError;
pub use types::{EntryKind, TreeName};
