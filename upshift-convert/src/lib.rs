//! # upshift-convert
//!
//! Batch conversion of mirrored source trees: the external fixer behind a
//! narrow seam, an all-or-nothing-per-file batch runner with interrupt
//! cleanup, and the per-subtree run pipeline.

pub mod cancel;
pub mod error;
pub mod pipeline;
pub mod prepass;
pub mod runner;
pub mod transformer;

pub use cancel::CancelToken;
pub use error::ConvertError;
pub use pipeline::{run, RunOptions, RunSummary, TreeReport};
pub use runner::{convert_all, ConvertReport, FileTiming};
pub use transformer::{FixerCommand, PassOutput, Transformer, DEFAULT_FIXERS};
