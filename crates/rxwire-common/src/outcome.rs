//! Tagged outcomes for extraction and classification stages.
//!
//! Every stage that can skip a call-site returns `Outcome` instead of a bare
//! `Option`. Skips are silent by contract: no diagnostics are emitted, but
//! the pass summary counts rejections per reason, and carrying the reason
//! means diagnostics can be added later without restructuring control flow.

use serde::Serialize;

/// Why a selector or invocation was rejected.
///
/// All of these cause a silent skip of the affected invocation, never a hard
/// failure of the pass: most of them indicate a call that belongs to an
/// unrelated same-named API rather than a malformed binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RejectReason {
    /// The invoked method resolved to an extension class that is not ours.
    ForeignExtensionClass,
    /// The method name is not one the generator handles.
    UnknownMethod,
    /// The selector body is a statement block, not a single expression.
    BlockBody,
    /// The selector returns its parameter verbatim; there is no path.
    IdentitySelector,
    /// A member access resolved to a field or method, not a property.
    NotAProperty,
    /// The accessed property is private or protected.
    Inaccessible,
    /// The accessed property is static.
    StaticProperty,
    /// A member access could not be resolved against the semantic model.
    UnknownMember,
    /// A type name in the chain could not be resolved.
    UnknownType,
    /// The expression shape is not a member-access chain rooted at the
    /// selector parameter.
    UnsupportedExpression,
    /// An argument expected to be a selector was something else.
    NotASelector,
    /// Multiple paths with no combining function disagree on their leaf value
    /// type; merge requires a uniform element type.
    MixedPathTypes,
    /// The invocation has no selector arguments at all.
    MissingSelector,
    /// A binding form is missing its target-side information.
    MissingTarget,
}

impl RejectReason {
    /// Stable lowercase name, used for skip counters in the pass summary.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::ForeignExtensionClass => "foreign_extension_class",
            RejectReason::UnknownMethod => "unknown_method",
            RejectReason::BlockBody => "block_body",
            RejectReason::IdentitySelector => "identity_selector",
            RejectReason::NotAProperty => "not_a_property",
            RejectReason::Inaccessible => "inaccessible",
            RejectReason::StaticProperty => "static_property",
            RejectReason::UnknownMember => "unknown_member",
            RejectReason::UnknownType => "unknown_type",
            RejectReason::UnsupportedExpression => "unsupported_expression",
            RejectReason::NotASelector => "not_a_selector",
            RejectReason::MixedPathTypes => "mixed_path_types",
            RejectReason::MissingSelector => "missing_selector",
            RejectReason::MissingTarget => "missing_target",
        }
    }
}

/// Result of one pipeline stage for one call-site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The stage produced a value; the pipeline continues.
    Accepted(T),
    /// The stage skipped this call-site for the given reason.
    Rejected(RejectReason),
}

impl<T> Outcome<T> {
    /// True when the stage produced a value.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// The rejection reason, if any.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(reason) => Some(*reason),
        }
    }

    /// Map the accepted value, preserving rejections.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Accepted(value) => Outcome::Accepted(f(value)),
            Outcome::Rejected(reason) => Outcome::Rejected(reason),
        }
    }

    /// Convert into an `Option`, discarding the reason.
    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }
}
