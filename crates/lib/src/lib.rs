//! crossbuild-lib: concurrent cross-compilation orchestration.
//!
//! Given a toolchain and a matrix of requested operating systems and
//! architectures, this crate:
//! - `catalog`: discovers the (os, arch) pairs the toolchain supports
//! - `dispatch`: expands the request into validated build jobs
//! - `build`: runs the jobs on a bounded worker pool, renaming and hashing
//!   each artifact
//! - `report`: collects one result per job into the final report
//!
//! [`run::run`] ties the stages together.

pub mod build;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod report;
pub mod run;
pub mod toolchain;
pub mod util;

pub use config::{RunConfig, RunMode};
pub use run::{RunError, RunOutcome, run};
