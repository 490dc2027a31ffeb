//! Structural grouping of invocations.
//!
//! Call-sites needing an identical dispatch shape — same method, source type,
//! return type, and path shape — share one generated function that branches
//! on the caller's location. Generated output size is therefore linear in
//! distinct shapes, not in call-site count.

use indexmap::IndexMap;
use rxwire_checker::{ClassifiedInvocation, InvocationDescriptor};
use rxwire_common::element_hash;
use tracing::debug;

/// Structural signature of a dispatch shape.
///
/// `Ord` gives the deterministic emission order; two runs over the same
/// descriptor set emit groups (and files) in the same sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeSignature {
    pub method_name: String,
    pub source_type_name: String,
    pub return_type_name: String,
    /// Depth of each property path, in argument order.
    pub path_depths: Vec<usize>,
    /// Leaf value type of each path, in argument order. Part of the shape
    /// because it fixes the combining function's parameter types, which must
    /// be uniform across every call-site sharing the generated overload.
    pub path_leaf_types: Vec<String>,
    pub has_combiner: bool,
    pub binding: Option<BindingShape>,
}

/// The binding-specific half of a signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingShape {
    pub target_type_name: String,
    pub target_depth: usize,
    pub target_leaf_type: String,
    pub is_two_way: bool,
    pub has_converter: bool,
    pub has_scheduler: bool,
}

/// Lowercase a name into identifier-safe characters.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

impl ShapeSignature {
    fn base(descriptor: &InvocationDescriptor) -> ShapeSignature {
        ShapeSignature {
            method_name: descriptor.method_name.clone(),
            source_type_name: descriptor.source_type_name.clone(),
            return_type_name: descriptor.return_type_name.clone(),
            path_depths: descriptor.paths().iter().map(|p| p.depth()).collect(),
            path_leaf_types: descriptor
                .paths()
                .iter()
                .map(|p| p.leaf().property_type_name.clone())
                .collect(),
            has_combiner: descriptor.has_combiner,
            binding: None,
        }
    }

    pub fn of(invocation: &ClassifiedInvocation) -> ShapeSignature {
        match invocation {
            ClassifiedInvocation::Observe(descriptor) => ShapeSignature::base(descriptor),
            ClassifiedInvocation::Binding(binding) => {
                let mut signature = ShapeSignature::base(&binding.base);
                signature.binding = Some(BindingShape {
                    target_type_name: binding.target_type_name.clone(),
                    target_depth: binding.target_path.depth(),
                    target_leaf_type: binding.target_path.leaf().property_type_name.clone(),
                    is_two_way: binding.is_two_way,
                    has_converter: binding.has_converter,
                    has_scheduler: binding.has_scheduler,
                });
                signature
            }
        }
    }

    /// Short type name for identifiers (`demo::ViewModel` -> `viewmodel`).
    fn short_source(&self) -> String {
        sanitize(
            self.source_type_name
                .rsplit("::")
                .next()
                .unwrap_or(&self.source_type_name),
        )
    }

    /// Deterministic discriminator over the full signature, so shapes that
    /// share a short name still get distinct identifiers.
    fn discriminator(&self) -> u64 {
        element_hash(self)
    }

    /// Name of the generated dispatch function for this shape.
    pub fn function_name(&self) -> String {
        format!(
            "{}_{}_{:016x}",
            sanitize(&self.method_name),
            self.short_source(),
            self.discriminator()
        )
    }

    /// Name of the generated file holding this shape's dispatch function.
    pub fn file_name(&self) -> String {
        format!("{}.g.rs", self.function_name())
    }
}

/// One dispatch shape and its call-sites.
#[derive(Clone, Debug)]
pub struct DispatchGroup {
    pub signature: ShapeSignature,
    /// Call-sites sorted by caller location; value-equal duplicates removed.
    pub invocations: Vec<ClassifiedInvocation>,
}

/// Bucket invocations by structural signature and order everything
/// deterministically.
pub fn group_invocations(invocations: &[ClassifiedInvocation]) -> Vec<DispatchGroup> {
    let mut buckets: IndexMap<ShapeSignature, Vec<ClassifiedInvocation>> = IndexMap::new();
    for invocation in invocations {
        buckets
            .entry(ShapeSignature::of(invocation))
            .or_default()
            .push(invocation.clone());
    }

    let mut groups: Vec<DispatchGroup> = buckets
        .into_iter()
        .map(|(signature, mut invocations)| {
            invocations.sort_by(|a, b| {
                a.descriptor()
                    .caller_location
                    .cmp(&b.descriptor().caller_location)
            });
            invocations.dedup();
            DispatchGroup {
                signature,
                invocations,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.signature.cmp(&b.signature));
    debug!(groups = groups.len(), "grouped invocations");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxwire_checker::{PathSegment, PropertyPath};
    use rxwire_common::{CallerLocation, EquatableSequence};

    fn path(names: &[&str]) -> PropertyPath {
        PropertyPath::new(
            names
                .iter()
                .map(|n| PathSegment {
                    property_name: n.to_string(),
                    property_type_name: "String".to_string(),
                    declaring_type_name: "demo::VM".to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn observe(paths: Vec<PropertyPath>, file: &str, line: u32) -> ClassifiedInvocation {
        ClassifiedInvocation::Observe(InvocationDescriptor {
            method_name: "observe".to_string(),
            source_type_name: "demo::VM".to_string(),
            return_type_name: "String".to_string(),
            property_paths: EquatableSequence::new(paths),
            caller_location: CallerLocation::new(file, line, 1),
            has_combiner: false,
        })
    }

    #[test]
    fn test_identical_shapes_share_a_group() {
        let invocations = vec![
            observe(vec![path(&["Name"])], "b.rs", 5),
            observe(vec![path(&["Title"])], "a.rs", 9),
        ];
        let groups = group_invocations(&invocations);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].invocations.len(), 2);
        // Sites ordered by caller location.
        assert_eq!(
            groups[0].invocations[0].descriptor().caller_location.file,
            "a.rs"
        );
    }

    #[test]
    fn test_different_depth_is_a_different_shape() {
        let invocations = vec![
            observe(vec![path(&["Name"])], "a.rs", 1),
            observe(vec![path(&["Child", "Name"])], "a.rs", 2),
        ];
        let groups = group_invocations(&invocations);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_value_equal_duplicates_collapse() {
        let one = observe(vec![path(&["Name"])], "a.rs", 1);
        let groups = group_invocations(&[one.clone(), one]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].invocations.len(), 1);
    }

    #[test]
    fn test_function_names_are_distinct_and_stable() {
        let shallow = ShapeSignature::of(&observe(vec![path(&["Name"])], "a.rs", 1));
        let deep = ShapeSignature::of(&observe(vec![path(&["Child", "Name"])], "a.rs", 2));
        assert_ne!(shallow.function_name(), deep.function_name());
        assert_eq!(shallow.function_name(), shallow.function_name());
        assert!(shallow.function_name().starts_with("observe_vm_"));
        assert!(shallow.file_name().ends_with(".g.rs"));
        // The discriminator is the whole 64-bit signature hash.
        let suffix = shallow.function_name();
        let suffix = suffix.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("demo::ViewModel"), "demo_viewmodel");
        assert_eq!(sanitize("Vec<String>"), "vec_string");
    }
}
