//! Selector-expression parsing and the call-site syntax model.
//!
//! The generator never sees whole source files; the host compilation hands it
//! call-sites whose selector arguments are small single-parameter lambda
//! expressions (`x => x.Child.Name`). This crate scans and parses those
//! selectors into an expression tree and models the call-site shape the
//! classifier consumes.

pub mod ast;
pub use ast::{Argument, Expr, InvocationSite, SelectorBody, SelectorLambda};

pub mod scanner;
pub use scanner::{Token, TokenKind, scan};

pub mod parser;
pub use parser::{ParseError, parse_selector};
