//! Invocation classification.
//!
//! Turns a call-site plus the semantic snapshot into an immutable descriptor,
//! or a tagged rejection. Every guard is scoped to the one invocation: a
//! rejected call-site never aborts the pass.

use crate::descriptors::{
    BindingInvocationDescriptor, ClassifiedInvocation, InvocationDescriptor,
};
use crate::paths::{PropertyPath, extract_path};
use rxwire_binder::{Compilation, WellKnownSymbols};
use rxwire_common::{EquatableSequence, Outcome, RejectReason};
use rxwire_syntax::{Argument, InvocationSite};
use tracing::debug;

/// Method names the generator dispatches on.
pub mod methods {
    /// Observe one or more property paths on the receiver.
    pub const OBSERVE: &str = "observe";
    /// One-way binding from a source path to a target path.
    pub const BIND: &str = "bind";
    /// Two-way binding between a source path and a target path.
    pub const BIND_TWO_WAY: &str = "bind_two_way";
}

/// Classify one call-site.
///
/// Guards, in order (each a silent skip):
/// 1. the method must be declared on our extension class — a same-named
///    method on an unrelated extension class is someone else's API;
/// 2. the method name must be one the generator handles;
/// 3. every selector argument must extract to a valid path; one bad selector
///    skips the whole invocation;
/// 4. binding forms need a resolved target type and a target selector.
///
/// Multi-property paths are collected in exact argument order; that order
/// becomes the combinator argument order in emitted code.
pub fn classify(
    site: &InvocationSite,
    compilation: &Compilation,
    well_known: &WellKnownSymbols,
) -> Outcome<ClassifiedInvocation> {
    if site.declaring_type_name != well_known.extension_class {
        debug!(
            method = %site.method_name,
            declaring = %site.declaring_type_name,
            "skipping invocation of foreign extension class"
        );
        return Outcome::Rejected(RejectReason::ForeignExtensionClass);
    }

    match site.method_name.as_str() {
        methods::OBSERVE => classify_observe(site, compilation),
        methods::BIND => classify_binding(site, compilation, false),
        methods::BIND_TWO_WAY => classify_binding(site, compilation, true),
        _ => Outcome::Rejected(RejectReason::UnknownMethod),
    }
}

fn extract_selector_paths(
    site: &InvocationSite,
    compilation: &Compilation,
    root_type: &str,
) -> Outcome<Vec<PropertyPath>> {
    let mut paths = Vec::new();
    for argument in &site.arguments {
        let Argument::Selector(selector) = argument else {
            continue;
        };
        match extract_path(selector, compilation, root_type) {
            Outcome::Accepted(path) => paths.push(path),
            Outcome::Rejected(reason) => {
                debug!(
                    method = %site.method_name,
                    selector = %selector.text,
                    ?reason,
                    "skipping invocation: selector rejected"
                );
                return Outcome::Rejected(reason);
            }
        }
    }
    Outcome::Accepted(paths)
}

fn base_descriptor(site: &InvocationSite, paths: Vec<PropertyPath>) -> InvocationDescriptor {
    InvocationDescriptor {
        method_name: site.method_name.clone(),
        source_type_name: site.source_type_name.clone(),
        return_type_name: site.return_type_name.clone(),
        property_paths: EquatableSequence::new(paths),
        caller_location: site.location.clone(),
        has_combiner: site.arguments.iter().any(Argument::is_function),
    }
}

fn classify_observe(
    site: &InvocationSite,
    compilation: &Compilation,
) -> Outcome<ClassifiedInvocation> {
    let paths = match extract_selector_paths(site, compilation, &site.source_type_name) {
        Outcome::Accepted(paths) => paths,
        Outcome::Rejected(reason) => return Outcome::Rejected(reason),
    };
    if paths.is_empty() {
        return Outcome::Rejected(RejectReason::MissingSelector);
    }

    // Merging streams requires a uniform element type; only a combining
    // function can reconcile differently-typed paths.
    let has_combiner = site.arguments.iter().any(Argument::is_function);
    if !has_combiner && paths.len() > 1 {
        let leaf = &paths[0].leaf().property_type_name;
        if paths.iter().any(|p| &p.leaf().property_type_name != leaf) {
            debug!(
                method = %site.method_name,
                "skipping invocation: mixed path types without a combiner"
            );
            return Outcome::Rejected(RejectReason::MixedPathTypes);
        }
    }
    Outcome::Accepted(ClassifiedInvocation::Observe(base_descriptor(site, paths)))
}

fn classify_binding(
    site: &InvocationSite,
    compilation: &Compilation,
    is_two_way: bool,
) -> Outcome<ClassifiedInvocation> {
    let Some(target_type) = site.target_type_name.clone() else {
        return Outcome::Rejected(RejectReason::MissingTarget);
    };

    // Binding forms take the source selector first, the target selector
    // second; converters and schedulers follow.
    let selectors: Vec<_> = site.selectors().collect();
    if selectors.len() < 2 {
        return Outcome::Rejected(RejectReason::MissingSelector);
    }

    let source_path = match extract_path(selectors[0], compilation, &site.source_type_name) {
        Outcome::Accepted(path) => path,
        Outcome::Rejected(reason) => return Outcome::Rejected(reason),
    };
    let target_path = match extract_path(selectors[1], compilation, &target_type) {
        Outcome::Accepted(path) => path,
        Outcome::Rejected(reason) => return Outcome::Rejected(reason),
    };

    let base = base_descriptor(site, vec![source_path]);
    Outcome::Accepted(ClassifiedInvocation::Binding(BindingInvocationDescriptor {
        base,
        target_type_name: target_type,
        target_path,
        is_two_way,
        has_converter: site.arguments.iter().any(Argument::is_function),
        has_scheduler: site
            .arguments
            .iter()
            .any(|a| matches!(a, Argument::Scheduler { .. })),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxwire_binder::{
        Accessibility, CompilationId, MemberKind, MemberSymbol, TypeSymbol, well_known,
    };
    use rxwire_common::CallerLocation;
    use rxwire_syntax::parse_selector;

    fn property(name: &str, type_name: &str) -> MemberSymbol {
        MemberSymbol {
            name: name.to_string(),
            kind: MemberKind::Property {
                type_name: type_name.to_string(),
                has_getter: true,
                has_setter: true,
                is_indexer: false,
            },
            is_static: false,
            accessibility: Accessibility::Public,
        }
    }

    fn marker(name: &str) -> TypeSymbol {
        TypeSymbol {
            name: name.to_string(),
            base_type: None,
            implements: vec![],
            members: vec![],
        }
    }

    fn fixture() -> Compilation {
        Compilation::new(
            CompilationId(9),
            vec![
                marker(well_known::NOTIFY_PROPERTY_CHANGED),
                marker(well_known::EXTENSION_CLASS),
                TypeSymbol {
                    name: "demo::ViewModel".to_string(),
                    base_type: None,
                    implements: vec![well_known::NOTIFY_PROPERTY_CHANGED.to_string()],
                    members: vec![
                        property("Name", "String"),
                        property("Age", "i32"),
                        property("Child", "demo::ViewModel"),
                    ],
                },
                TypeSymbol {
                    name: "demo::Label".to_string(),
                    base_type: None,
                    implements: vec![],
                    members: vec![property("Text", "String")],
                },
            ],
        )
    }

    fn well_known_symbols() -> WellKnownSymbols {
        WellKnownSymbols {
            notify_changed: well_known::NOTIFY_PROPERTY_CHANGED.to_string(),
            notify_changing: None,
            dependency_object: None,
            kvo_object: None,
            extension_class: well_known::EXTENSION_CLASS.to_string(),
        }
    }

    fn selector(text: &str) -> Argument {
        Argument::Selector(parse_selector(text).unwrap())
    }

    fn site(method: &str, declaring: &str, arguments: Vec<Argument>) -> InvocationSite {
        InvocationSite {
            method_name: method.to_string(),
            declaring_type_name: declaring.to_string(),
            source_type_name: "demo::ViewModel".to_string(),
            return_type_name: "String".to_string(),
            target_type_name: Some("demo::Label".to_string()),
            arguments,
            location: CallerLocation::new("app.rs", 20, 9),
        }
    }

    #[test]
    fn test_classify_single_selector() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name")],
        );
        let classified = classify(&site, &fixture(), &well_known_symbols())
            .accepted()
            .unwrap();
        let descriptor = classified.descriptor();
        assert_eq!(descriptor.paths().len(), 1);
        assert_eq!(descriptor.paths()[0].dotted(), "Name");
        assert!(!descriptor.has_combiner);
    }

    #[test]
    fn test_shadowed_extension_class_is_skipped() {
        let site = site(
            methods::OBSERVE,
            "other::FancyExtensions",
            vec![selector("x => x.Name")],
        );
        assert_eq!(
            classify(&site, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::ForeignExtensionClass)
        );
    }

    #[test]
    fn test_one_bad_selector_skips_whole_invocation() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name"), selector("x => x")],
        );
        assert_eq!(
            classify(&site, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::IdentitySelector)
        );
    }

    #[test]
    fn test_argument_order_is_preserved() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![
                selector("x => x.Age"),
                selector("x => x.Name"),
                Argument::Function {
                    text: "|a, n| format!(\"{n}:{a}\")".to_string(),
                },
            ],
        );
        let classified = classify(&site, &fixture(), &well_known_symbols())
            .accepted()
            .unwrap();
        let descriptor = classified.descriptor();
        let dotted: Vec<String> = descriptor.paths().iter().map(|p| p.dotted()).collect();
        assert_eq!(dotted, vec!["Age", "Name"]);
        assert!(descriptor.has_combiner);
    }

    #[test]
    fn test_mixed_path_types_without_combiner_are_skipped() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name"), selector("x => x.Age")],
        );
        assert_eq!(
            classify(&site, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::MixedPathTypes)
        );
    }

    #[test]
    fn test_mixed_path_types_with_combiner_are_accepted() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![
                selector("x => x.Name"),
                selector("x => x.Age"),
                Argument::Function {
                    text: "|n, a| format!(\"{n}:{a}\")".to_string(),
                },
            ],
        );
        assert!(classify(&site, &fixture(), &well_known_symbols()).is_accepted());
    }

    #[test]
    fn test_same_typed_paths_without_combiner_are_accepted() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name"), selector("x => x.Child.Name")],
        );
        let classified = classify(&site, &fixture(), &well_known_symbols())
            .accepted()
            .unwrap();
        assert_eq!(classified.descriptor().paths().len(), 2);
        assert!(!classified.descriptor().has_combiner);
    }

    #[test]
    fn test_unknown_method_is_skipped() {
        let site = site(
            "observe_errors",
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name")],
        );
        assert_eq!(
            classify(&site, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::UnknownMethod)
        );
    }

    #[test]
    fn test_classify_two_way_binding() {
        let site = site(
            methods::BIND_TWO_WAY,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name"), selector("t => t.Text")],
        );
        let classified = classify(&site, &fixture(), &well_known_symbols())
            .accepted()
            .unwrap();
        match classified {
            ClassifiedInvocation::Binding(binding) => {
                assert!(binding.is_two_way);
                assert!(!binding.has_converter);
                assert!(!binding.has_scheduler);
                assert_eq!(binding.target_type_name, "demo::Label");
                assert_eq!(binding.target_path.dotted(), "Text");
                assert_eq!(binding.base.paths()[0].dotted(), "Name");
            }
            other => panic!("expected binding, got {other:?}"),
        }
    }

    #[test]
    fn test_binding_without_target_type_is_skipped() {
        let mut s = site(
            methods::BIND,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Name"), selector("t => t.Text")],
        );
        s.target_type_name = None;
        assert_eq!(
            classify(&s, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::MissingTarget)
        );
    }

    #[test]
    fn test_observe_without_selectors_is_skipped() {
        let site = site(methods::OBSERVE, well_known::EXTENSION_CLASS, vec![]);
        assert_eq!(
            classify(&site, &fixture(), &well_known_symbols()).reject_reason(),
            Some(RejectReason::MissingSelector)
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let site = site(
            methods::OBSERVE,
            well_known::EXTENSION_CLASS,
            vec![selector("x => x.Child.Name")],
        );
        let compilation = fixture();
        let wk = well_known_symbols();
        let a = classify(&site, &compilation, &wk).accepted().unwrap();
        let b = classify(&site, &compilation, &wk).accepted().unwrap();
        assert_eq!(a, b);
    }
}
