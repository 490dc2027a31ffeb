//! Semantic model of the types visible at observation call-sites.
//!
//! This is the generator's view of the host compilation: types with members,
//! base types and implemented markers, keyed by fully qualified name. The
//! model is immutable once constructed and serializable so a host can hand it
//! over as a snapshot.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Declared accessibility of a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
}

impl Accessibility {
    /// Public or internal — the accessibility a path segment may have.
    pub fn is_observable(self) -> bool {
        matches!(self, Accessibility::Public | Accessibility::Internal)
    }
}

/// What kind of member a symbol is. Path extraction only accepts properties;
/// fields and methods are modelled so the extractor can tell them apart from
/// a missing member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberKind {
    Property {
        type_name: String,
        has_getter: bool,
        has_setter: bool,
        #[serde(default)]
        is_indexer: bool,
    },
    Field {
        type_name: String,
    },
    Method {
        return_type_name: String,
    },
}

/// One declared member of a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSymbol {
    pub name: String,
    #[serde(flatten)]
    pub kind: MemberKind,
    #[serde(default)]
    pub is_static: bool,
    pub accessibility: Accessibility,
}

impl MemberSymbol {
    pub fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property { .. })
    }

    /// The member's value type (property/field type or method return type).
    pub fn type_name(&self) -> &str {
        match &self.kind {
            MemberKind::Property { type_name, .. } => type_name,
            MemberKind::Field { type_name } => type_name,
            MemberKind::Method { return_type_name } => return_type_name,
        }
    }
}

/// One type in the semantic snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    /// Fully qualified name, e.g. `demo::ViewModel`.
    pub name: String,
    /// Base type's fully qualified name, if any.
    #[serde(default)]
    pub base_type: Option<String>,
    /// Fully qualified names of implemented marker interfaces.
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberSymbol>,
}

impl TypeSymbol {
    /// The name without its module path.
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Look up a declared instance member by name (no base-chain walk).
    pub fn find_instance_member(&self, name: &str) -> Option<&MemberSymbol> {
        self.members
            .iter()
            .find(|m| !m.is_static && m.name == name)
    }

    /// Look up a declared static member by name.
    pub fn find_static_member(&self, name: &str) -> Option<&MemberSymbol> {
        self.members.iter().find(|m| m.is_static && m.name == name)
    }
}

/// Identity of one compilation pass. Well-known symbol resolution is cached
/// per identity; a new pass gets a fresh resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilationId(pub u64);

/// The semantic snapshot for one compilation pass.
#[derive(Clone, Debug)]
pub struct Compilation {
    id: CompilationId,
    types: FxHashMap<String, TypeSymbol>,
}

impl Compilation {
    pub fn new(id: CompilationId, types: Vec<TypeSymbol>) -> Self {
        let types = types.into_iter().map(|t| (t.name.clone(), t)).collect();
        Compilation { id, types }
    }

    pub fn id(&self) -> CompilationId {
        self.id
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeSymbol> {
        self.types.get(name)
    }

    /// Resolve an instance member, walking the base-type chain.
    pub fn resolve_instance_member(
        &self,
        type_name: &str,
        member_name: &str,
    ) -> Option<&MemberSymbol> {
        let mut current = self.get_type(type_name);
        while let Some(ty) = current {
            if let Some(member) = ty.find_instance_member(member_name) {
                return Some(member);
            }
            current = ty.base_type.as_deref().and_then(|base| self.get_type(base));
        }
        None
    }

    /// Resolve a static member, walking the base-type chain.
    pub fn resolve_static_member(
        &self,
        type_name: &str,
        member_name: &str,
    ) -> Option<&MemberSymbol> {
        let mut current = self.get_type(type_name);
        while let Some(ty) = current {
            if let Some(member) = ty.find_static_member(member_name) {
                return Some(member);
            }
            current = ty.base_type.as_deref().and_then(|base| self.get_type(base));
        }
        None
    }

    /// Whether `type_name` implements `marker` anywhere along its base chain.
    pub fn implements_marker(&self, type_name: &str, marker: &str) -> bool {
        let mut current = self.get_type(type_name);
        while let Some(ty) = current {
            if ty.implements.iter().any(|i| i == marker) {
                return true;
            }
            current = ty.base_type.as_deref().and_then(|base| self.get_type(base));
        }
        false
    }

    /// Whether `type_name` is or derives from `base`.
    pub fn derives_from(&self, type_name: &str, base: &str) -> bool {
        if type_name == base {
            return true;
        }
        let mut current = self.get_type(type_name);
        while let Some(ty) = current {
            if ty.name == base {
                return true;
            }
            current = ty.base_type.as_deref().and_then(|b| self.get_type(b));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn compilation() -> Compilation {
        Compilation::new(
            CompilationId(1),
            vec![
                TypeSymbol {
                    name: "demo::Base".to_string(),
                    base_type: None,
                    implements: vec!["rt::Notify".to_string()],
                    members: vec![property("Inherited", "i32")],
                },
                TypeSymbol {
                    name: "demo::Derived".to_string(),
                    base_type: Some("demo::Base".to_string()),
                    implements: vec![],
                    members: vec![property("Own", "String")],
                },
            ],
        )
    }

    #[test]
    fn test_member_resolution_walks_base_chain() {
        let c = compilation();
        assert!(c.resolve_instance_member("demo::Derived", "Own").is_some());
        assert!(
            c.resolve_instance_member("demo::Derived", "Inherited")
                .is_some()
        );
        assert!(c.resolve_instance_member("demo::Derived", "Nope").is_none());
    }

    #[test]
    fn test_marker_inherited_from_base() {
        let c = compilation();
        assert!(c.implements_marker("demo::Derived", "rt::Notify"));
        assert!(!c.implements_marker("demo::Derived", "rt::Other"));
    }

    #[test]
    fn test_derives_from() {
        let c = compilation();
        assert!(c.derives_from("demo::Derived", "demo::Base"));
        assert!(c.derives_from("demo::Base", "demo::Base"));
        assert!(!c.derives_from("demo::Base", "demo::Derived"));
    }

    #[test]
    fn test_short_name() {
        let ty = TypeSymbol {
            name: "a::b::Widget".to_string(),
            base_type: None,
            implements: vec![],
            members: vec![],
        };
        assert_eq!(ty.short_name(), "Widget");
    }
}
