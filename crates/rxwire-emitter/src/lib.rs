//! Strategy selection and dispatch source emission.
//!
//! Classified invocations are grouped by structural signature so identical
//! dispatch shapes share one generated function, a strategy is chosen per
//! property path, and the fused dispatch code plus a registration table are
//! written to the host's output sink. For a fixed set of descriptors the
//! emitted text is byte-identical across runs; the host's incremental
//! pipeline relies on that.

pub mod writer;
pub use writer::SourceWriter;

pub mod output;
pub use output::{GeneratedFile, MemoryOutputSink, OutputSink};

pub mod strategy;
pub use strategy::{FusedStrategy, PathStrategy, adapter_function, select_strategy};

pub mod dispatch;
pub use dispatch::{BindingShape, DispatchGroup, ShapeSignature, group_invocations};

pub mod emit;
pub use emit::{EmitSummary, Emitter, REGISTRATION_FILE};
