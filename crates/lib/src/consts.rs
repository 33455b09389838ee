//! Defaults shared across the crate.

/// Default filename template applied to the value following the output flag.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{name}_{os}_{arch}";

/// Capacity of both the job queue and the result queue.
///
/// Large enough that dispatch never blocks for any realistic target matrix
/// (`go tool dist list` reports fewer than 100 pairs).
pub const QUEUE_CAPACITY: usize = 512;

/// Suffix appended to artifacts built for the executable-suffix OS.
pub const EXE_SUFFIX: &str = ".exe";

/// Read buffer size used when streaming artifacts through the hasher.
pub const HASH_BUFFER_SIZE: usize = 8192;
