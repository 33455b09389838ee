//! Build jobs and their execution.
//!
//! A [`BuildJob`] compiles one (os, arch) target through the external
//! toolchain. Jobs are independent: there is no dependency graph, only a flat
//! list fanned out over a [`pool::WorkerPool`].
//!
//! # Submodules
//!
//! - [`template`] - Output filename templating
//! - [`execute`] - The per-job procedure (rename, compile, verify, hash)
//! - [`pool`] - Fixed-size worker pool with shared job and result queues

pub mod execute;
pub mod pool;
pub mod template;
mod types;

pub use types::*;
