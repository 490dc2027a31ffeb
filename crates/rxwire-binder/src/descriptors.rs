//! Value descriptors projected from the semantic model.
//!
//! Everything downstream of the catalog works on these plain value types;
//! compiler symbols never leak past this module.

use crate::catalog::WellKnownSymbols;
use crate::symbols::{Compilation, MemberKind, TypeSymbol};
use serde::Serialize;
use tracing::debug;

/// How instances of a type announce property changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NotificationKind {
    /// The type implements the event-based change-notification marker.
    EventBased,
    /// The type derives from a platform base whose properties notify through
    /// callback registration or key-value observing.
    CapabilityObject,
    /// No recognized notification mechanism; only the current value can be
    /// observed.
    None,
}

/// One observable property of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
    pub is_readable: bool,
    pub is_dependency_property: bool,
    pub is_indexer: bool,
}

/// The catalog's view of one type: identity, notification capability, and
/// its qualifying properties in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub fully_qualified_name: String,
    pub short_name: String,
    pub notification_kind: NotificationKind,
    pub has_pre_change_notification: bool,
    pub properties: Vec<PropertyDescriptor>,
}

/// Which declared properties qualify for the catalog.
#[derive(Copy, Clone, Debug, Default)]
pub struct PropertyFilter {
    /// Include `internal` properties in addition to `public` ones.
    pub include_internal: bool,
}

/// Walk a type's declared instance properties into descriptors.
///
/// Static and write-only properties are excluded; indexers are included and
/// flagged. A property is marked as a dependency property when a same-named
/// `<Name>Property` static sibling exists on the type or a base.
///
/// A type with zero qualifying properties yields an empty vec, not an error.
pub fn extract_properties(
    compilation: &Compilation,
    ty: &TypeSymbol,
    filter: PropertyFilter,
) -> Vec<PropertyDescriptor> {
    let mut properties = Vec::new();
    for member in &ty.members {
        if member.is_static {
            continue;
        }
        let MemberKind::Property {
            type_name,
            has_getter,
            has_setter: _,
            is_indexer,
        } = &member.kind
        else {
            continue;
        };
        if !has_getter {
            // Write-only properties have nothing to observe.
            continue;
        }
        let visible = match member.accessibility {
            crate::symbols::Accessibility::Public => true,
            crate::symbols::Accessibility::Internal => filter.include_internal,
            _ => false,
        };
        if !visible {
            continue;
        }

        let backing_field = format!("{}Property", member.name);
        let is_dependency_property = compilation
            .resolve_static_member(&ty.name, &backing_field)
            .is_some();

        properties.push(PropertyDescriptor {
            name: member.name.clone(),
            type_name: type_name.clone(),
            is_readable: true,
            is_dependency_property,
            is_indexer: *is_indexer,
        });
    }
    properties
}

/// Classify how a type announces property changes.
pub fn classify_notification(
    compilation: &Compilation,
    type_name: &str,
    well_known: &WellKnownSymbols,
) -> NotificationKind {
    if compilation.implements_marker(type_name, &well_known.notify_changed) {
        return NotificationKind::EventBased;
    }
    let derives_platform = |base: &Option<String>| {
        base.as_deref()
            .is_some_and(|b| compilation.derives_from(type_name, b))
    };
    if derives_platform(&well_known.dependency_object) || derives_platform(&well_known.kvo_object) {
        return NotificationKind::CapabilityObject;
    }
    NotificationKind::None
}

/// Produce the full descriptor for one type.
pub fn describe_type(
    compilation: &Compilation,
    ty: &TypeSymbol,
    well_known: &WellKnownSymbols,
    filter: PropertyFilter,
) -> TypeDescriptor {
    let notification_kind = classify_notification(compilation, &ty.name, well_known);
    let has_pre_change_notification = well_known
        .notify_changing
        .as_deref()
        .is_some_and(|marker| compilation.implements_marker(&ty.name, marker));
    debug!(
        type_name = %ty.name,
        kind = ?notification_kind,
        "described type"
    );
    TypeDescriptor {
        fully_qualified_name: ty.name.clone(),
        short_name: ty.short_name().to_string(),
        notification_kind,
        has_pre_change_notification,
        properties: extract_properties(compilation, ty, filter),
    }
}
