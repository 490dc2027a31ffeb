//! Path extraction and invocation classification.
//!
//! Given a call-site and the semantic snapshot, this crate validates each
//! selector into a `PropertyPath` and folds the whole invocation into an
//! immutable, value-equal descriptor. Every guard failure is a tagged
//! rejection that silently skips the invocation; nothing here aborts a pass.

pub mod paths;
pub use paths::{PathSegment, PropertyPath, extract_path};

pub mod descriptors;
pub use descriptors::{BindingInvocationDescriptor, ClassifiedInvocation, InvocationDescriptor};

pub mod classify;
pub use classify::{classify, methods};
