//! rxwire: build-time static analysis and dispatch code generation for
//! reactive property observation.
//!
//! The pipeline is a pure transformation over immutable descriptors, staged
//! across the workspace crates:
//!
//! - [`rxwire_syntax`] parses selector expressions and models call-sites
//! - [`rxwire_binder`] resolves symbols and notification capabilities
//! - [`rxwire_checker`] extracts property paths and classifies invocations
//! - [`rxwire_emitter`] groups by shape, picks strategies, and emits dispatch
//!   source plus the registration table
//!
//! This facade crate adds the host boundary: [`snapshot`] deserializes a
//! compilation snapshot, [`pipeline::run_generation`] runs one pass, and the
//! `rxwire` binary drives both from the command line.

pub use rxwire_binder as binder;
pub use rxwire_checker as checker;
pub use rxwire_common as common;
pub use rxwire_emitter as emitter;
pub use rxwire_syntax as syntax;

pub mod pipeline;
pub use pipeline::{GenerationStatus, GenerationSummary, run_generation};

pub mod snapshot;
pub use snapshot::{CompilationSnapshot, LoadedSnapshot, SnapshotArgument, SnapshotInvocation};

pub mod tracing_config;
