//! # upshift-sync
//!
//! Incremental mirror of a source tree: millisecond-granularity staleness
//! checks, metadata-preserving copies, and pruning of mirror entries whose
//! source counterpart is gone.
//!
//! Call [`synchronize`] once per subtree; the returned [`SyncReport`]
//! carries the mirror files that still need the conversion pass.

pub mod error;
pub mod freshness;
pub mod mirror;

pub use error::SyncError;
pub use mirror::{synchronize, SyncOptions, SyncReport};
