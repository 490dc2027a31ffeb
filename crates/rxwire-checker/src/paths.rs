//! Property-path extraction from selector expressions.
//!
//! A selector names a chain of property accesses rooted at its parameter.
//! Extraction walks the chain root-to-leaf, resolving every segment against
//! the semantic snapshot, and rejects anything that is not a non-static,
//! public-or-internal property.

use rxwire_binder::{Compilation, MemberKind};
use rxwire_common::{EquatableSequence, Outcome, RejectReason};
use rxwire_syntax::{Expr, SelectorBody, SelectorLambda};
use smallvec::SmallVec;
use tracing::debug;

/// One validated property access in a path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PathSegment {
    pub property_name: String,
    pub property_type_name: String,
    pub declaring_type_name: String,
}

/// A non-empty chain of validated property accesses, root first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PropertyPath {
    segments: EquatableSequence<PathSegment>,
}

impl PropertyPath {
    /// Construct from root-to-leaf segments. Returns `None` when `segments`
    /// is empty; a path always has at least one segment.
    pub fn new(segments: Vec<PathSegment>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(PropertyPath {
            segments: EquatableSequence::new(segments),
        })
    }

    /// Number of segments (the path's depth). Always ≥ 1 for extracted paths.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    /// The first segment, rooted at the call-site's source object.
    pub fn root(&self) -> &PathSegment {
        &self.segments.as_slice()[0]
    }

    /// The last segment; its type is the observed value type.
    pub fn leaf(&self) -> &PathSegment {
        let slice = self.segments.as_slice();
        &slice[slice.len() - 1]
    }

    /// Dotted property names, for logging and generated comments.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.property_name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Flatten a member-access chain into property names, root first.
///
/// Null-forgiving wrappers are unwrapped at every level. The chain must
/// bottom out at the selector's own parameter.
fn flatten_chain<'a>(
    expr: &'a Expr,
    parameter: &str,
) -> Result<SmallVec<[&'a str; 4]>, RejectReason> {
    let mut names: SmallVec<[&str; 4]> = SmallVec::new();
    let mut current = expr.unwrap_trivia();
    loop {
        match current {
            Expr::Member { base, name } => {
                names.push(name.as_str());
                current = base.unwrap_trivia();
            }
            Expr::Parameter(name) if name == parameter => break,
            Expr::Parameter(_) => return Err(RejectReason::UnsupportedExpression),
            Expr::NullForgiving(_) => unreachable!("unwrapped above"),
        }
    }
    names.reverse();
    Ok(names)
}

/// Extract a validated property path from a selector.
///
/// Rejections (all silent skips at the call-site):
/// - block bodies
/// - identity selectors (`x => x`)
/// - accesses that resolve to fields or methods
/// - private/protected properties
/// - static properties
/// - unresolvable members or intermediate types
pub fn extract_path(
    selector: &SelectorLambda,
    compilation: &Compilation,
    root_type_name: &str,
) -> Outcome<PropertyPath> {
    let expr = match &selector.body {
        SelectorBody::Block(_) => return Outcome::Rejected(RejectReason::BlockBody),
        SelectorBody::Expr(expr) => expr,
    };

    let names = match flatten_chain(expr, &selector.parameter) {
        Ok(names) => names,
        Err(reason) => return Outcome::Rejected(reason),
    };
    if names.is_empty() {
        return Outcome::Rejected(RejectReason::IdentitySelector);
    }

    let mut segments = Vec::with_capacity(names.len());
    let mut current_type = root_type_name.to_string();
    for name in names {
        if compilation.get_type(&current_type).is_none() {
            return Outcome::Rejected(RejectReason::UnknownType);
        }
        let member = match compilation.resolve_instance_member(&current_type, name) {
            Some(member) => member,
            None => {
                // Distinguish a static property from a missing member so the
                // reason survives for future diagnostics.
                let reason = match compilation.resolve_static_member(&current_type, name) {
                    Some(m) if m.is_property() => RejectReason::StaticProperty,
                    _ => RejectReason::UnknownMember,
                };
                debug!(selector = %selector.text, segment = name, ?reason, "path rejected");
                return Outcome::Rejected(reason);
            }
        };
        let MemberKind::Property { type_name, .. } = &member.kind else {
            return Outcome::Rejected(RejectReason::NotAProperty);
        };
        if !member.accessibility.is_observable() {
            return Outcome::Rejected(RejectReason::Inaccessible);
        }

        segments.push(PathSegment {
            property_name: name.to_string(),
            property_type_name: type_name.clone(),
            declaring_type_name: current_type.clone(),
        });
        current_type = type_name.clone();
    }

    match PropertyPath::new(segments) {
        Some(path) => Outcome::Accepted(path),
        None => Outcome::Rejected(RejectReason::IdentitySelector),
    }
}
