//! Observation strategy selection.
//!
//! The runtime collaborator supports exactly four shapes: depth-1 direct
//! subscription, switch-style deep-chain resubscription, merge, and
//! combine-latest. Nothing else may be requested of it.

use rxwire_binder::{Compilation, NotificationKind, WellKnownSymbols, classify_notification};
use rxwire_checker::{InvocationDescriptor, PropertyPath};

/// How one property path is observed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathStrategy {
    /// Depth 1: subscribe directly to the root object's notification source,
    /// filtered by property-name equality (an empty name means any property).
    Direct,
    /// Depth > 1: observe the first segment, and on every intermediate value
    /// project to the next segment and resubscribe, discarding the previous
    /// inner subscription. Intermediate nulls stop the chain without
    /// throwing; emitted code never assumes non-null.
    Switch,
}

impl PathStrategy {
    pub fn for_path(path: &PropertyPath) -> PathStrategy {
        if path.depth() == 1 {
            PathStrategy::Direct
        } else {
            PathStrategy::Switch
        }
    }
}

/// The fused strategy for a whole invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FusedStrategy {
    /// One path, no fusion.
    Single(PathStrategy),
    /// Independent same-typed paths, no combining function: any one changing
    /// re-emits its value, with no alignment across sources.
    Merge(Vec<PathStrategy>),
    /// Explicit combining function: re-invoke the selector whenever a
    /// complete set of latest values is available. Selector arguments are
    /// positional, in path argument order.
    CombineLatest(Vec<PathStrategy>),
}

/// Choose the fused strategy for an invocation. The per-path strategy depends
/// only on depth; the fusion depends only on path count and whether the
/// call-site supplied a combining function.
pub fn select_strategy(descriptor: &InvocationDescriptor) -> FusedStrategy {
    let per_path: Vec<PathStrategy> = descriptor
        .paths()
        .iter()
        .map(PathStrategy::for_path)
        .collect();
    match (per_path.len(), descriptor.has_combiner) {
        (1, _) => FusedStrategy::Single(per_path[0]),
        (_, true) => FusedStrategy::CombineLatest(per_path),
        (_, false) => FusedStrategy::Merge(per_path),
    }
}

/// The runtime adapter function observing one segment, chosen from the
/// declaring type's notification capability. The mechanism itself lives in
/// the platform adapters; this layer only needs the classification.
pub fn adapter_function(
    compilation: &Compilation,
    well_known: &WellKnownSymbols,
    declaring_type_name: &str,
) -> &'static str {
    match classify_notification(compilation, declaring_type_name, well_known) {
        NotificationKind::EventBased => "observe_property",
        NotificationKind::CapabilityObject => "observe_platform_property",
        NotificationKind::None => "observe_snapshot",
    }
}
