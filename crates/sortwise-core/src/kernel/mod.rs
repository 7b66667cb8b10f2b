//! # Sortwise Core Kernel
//!
//! Crate-wide constants and the aggregated error type.
//!
//! - **Core Constants**: tag names, markers and defaults shared by the
//!   metadata, validity and storage modules live in `constants`.
//! - **Error Handling**: [`Error`](error::Error) wraps every subsystem error and
//!   `Result` is the crate-wide alias.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
