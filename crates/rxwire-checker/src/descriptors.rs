//! Invocation descriptors.
//!
//! A descriptor captures everything the emitter needs about one call-site as
//! plain strings and value objects — no symbol handles — so it doubles as an
//! incremental-cache key. Equality is full structural equality over every
//! field including the paths, element by element.

use crate::paths::PropertyPath;
use rxwire_common::{CallerLocation, EquatableSequence};
use serde::Serialize;

/// One classified observation call-site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct InvocationDescriptor {
    pub method_name: String,
    pub source_type_name: String,
    pub return_type_name: String,
    /// Property paths in exact argument order. Order is semantically
    /// significant: it becomes the combinator argument order.
    pub property_paths: EquatableSequence<PropertyPath>,
    pub caller_location: CallerLocation,
    /// Whether the call-site supplied an explicit combining function.
    pub has_combiner: bool,
}

impl InvocationDescriptor {
    pub fn paths(&self) -> &[PropertyPath] {
        self.property_paths.as_slice()
    }
}

/// A two-endpoint binding call-site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BindingInvocationDescriptor {
    pub base: InvocationDescriptor,
    pub target_type_name: String,
    pub target_path: PropertyPath,
    pub is_two_way: bool,
    pub has_converter: bool,
    pub has_scheduler: bool,
}

/// Output of classification: either a plain observation or a binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassifiedInvocation {
    Observe(InvocationDescriptor),
    Binding(BindingInvocationDescriptor),
}

impl ClassifiedInvocation {
    /// The observation descriptor shared by both forms.
    pub fn descriptor(&self) -> &InvocationDescriptor {
        match self {
            ClassifiedInvocation::Observe(d) => d,
            ClassifiedInvocation::Binding(b) => &b.base,
        }
    }
}
