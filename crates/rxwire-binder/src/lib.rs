//! Symbol catalog for the rxwire dispatch generator.
//!
//! The host compilation hands the generator a semantic snapshot of the types
//! involved at observation call-sites. This crate models those symbols,
//! resolves the small set of well-known capability markers exactly once per
//! compilation, and projects compiler symbols into plain value descriptors
//! the moment they are consulted — nothing downstream ever holds a symbol
//! handle, so every descriptor is a stable incremental-cache key.

pub mod symbols;
pub use symbols::{
    Accessibility, Compilation, CompilationId, MemberKind, MemberSymbol, TypeSymbol,
};

pub mod catalog;
pub use catalog::{SymbolCatalog, WellKnownError, WellKnownSymbols, well_known};

pub mod descriptors;
pub use descriptors::{
    NotificationKind, PropertyDescriptor, PropertyFilter, TypeDescriptor, classify_notification,
    describe_type, extract_properties,
};
