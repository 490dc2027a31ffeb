//! Syntax model for selector lambdas and call-sites.

use rxwire_common::CallerLocation;

/// A selector expression: member accesses rooted at the lambda parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Reference to the lambda's parameter.
    Parameter(String),
    /// `base.name`
    Member { base: Box<Expr>, name: String },
    /// `inner!` — a trivial wrapper the extractor unwraps before inspection.
    NullForgiving(Box<Expr>),
}

impl Expr {
    /// Strip null-forgiving wrappers off the outside of this expression.
    pub fn unwrap_trivia(&self) -> &Expr {
        let mut expr = self;
        while let Expr::NullForgiving(inner) = expr {
            expr = inner;
        }
        expr
    }
}

/// Body of a selector lambda.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorBody {
    /// A single expression — the only shape the generator dispatches on.
    Expr(Expr),
    /// A statement block. Never inspected; the classifier skips these.
    Block(String),
}

/// A single-parameter selector lambda, e.g. `x => x.Child.Name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorLambda {
    /// The parameter name the body must be rooted at.
    pub parameter: String,
    pub body: SelectorBody,
    /// Original source text, kept for logging.
    pub text: String,
}

/// One argument at a call-site, as classified by the host semantic model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    /// A selector lambda naming a property path.
    Selector(SelectorLambda),
    /// A combining/converter function; the generator passes it through.
    Function { text: String },
    /// A scheduler reference on binding forms.
    Scheduler { text: String },
    /// Anything else (literals, flags); never inspected.
    Other { text: String },
}

impl Argument {
    pub fn as_selector(&self) -> Option<&SelectorLambda> {
        match self {
            Argument::Selector(lambda) => Some(lambda),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Argument::Function { .. })
    }
}

/// A call-site requesting observation, with the semantic facts the host
/// compilation already resolved: the method, the extension class it belongs
/// to, and the static types involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationSite {
    /// Name of the invoked method (`observe`, `bind`, ...).
    pub method_name: String,
    /// Fully qualified name of the extension class the method resolved to.
    /// Used to ignore unrelated same-named extension methods.
    pub declaring_type_name: String,
    /// Static type of the receiver (the observation source).
    pub source_type_name: String,
    /// Element type of the resulting observation stream.
    pub return_type_name: String,
    /// Static type of the binding target, for two-endpoint forms.
    pub target_type_name: Option<String>,
    pub arguments: Vec<Argument>,
    pub location: CallerLocation,
}

impl InvocationSite {
    /// Iterate the selector arguments in argument order.
    pub fn selectors(&self) -> impl Iterator<Item = &SelectorLambda> {
        self.arguments.iter().filter_map(Argument::as_selector)
    }
}
