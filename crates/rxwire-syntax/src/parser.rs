//! Recursive-descent parser for selector lambdas.
//!
//! Grammar (whitespace-insensitive):
//!
//! ```text
//! selector := param "=>" body
//! param    := identifier | "(" identifier ")"
//! body     := "{" ... "}" | expr
//! expr     := primary ( "." identifier | "!" )*
//! primary  := identifier | "(" expr ")"
//! ```
//!
//! Block bodies are captured verbatim and never inspected; the classifier
//! rejects them downstream. Anything outside this grammar is a parse error,
//! which the pipeline treats as an unsupported-expression skip.

use crate::ast::{Expr, SelectorBody, SelectorLambda};
use crate::scanner::{Token, TokenKind, scan};
use smallvec::SmallVec;
use tracing::debug;

/// A selector that does not fit the supported grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the selector text, where known.
    pub offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    source: &'a str,
    tokens: SmallVec<[Token; 16]>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(ParseError::new(format!("expected {what}"), token.start)),
            None => Err(ParseError::new(
                format!("expected {what}, found end of selector"),
                self.source.len(),
            )),
        }
    }

    fn parse_parameter(&mut self) -> Result<String, ParseError> {
        if self.peek().map(|t| t.kind) == Some(TokenKind::OpenParen) {
            self.advance();
            let name = self.expect(TokenKind::Identifier, "parameter name")?;
            let text = name.text(self.source).to_string();
            self.expect(TokenKind::CloseParen, "`)` after parameter")?;
            Ok(text)
        } else {
            let name = self.expect(TokenKind::Identifier, "parameter name")?;
            Ok(name.text(self.source).to_string())
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(token) if token.kind == TokenKind::Identifier => {
                Ok(Expr::Parameter(token.text(self.source).to_string()))
            }
            Some(token) if token.kind == TokenKind::OpenParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                Ok(inner)
            }
            Some(token) => Err(ParseError::new("expected expression", token.start)),
            None => Err(ParseError::new(
                "expected expression, found end of selector",
                self.source.len(),
            )),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Dot) => {
                    self.advance();
                    let name = self.expect(TokenKind::Identifier, "property name after `.`")?;
                    expr = Expr::Member {
                        base: Box::new(expr),
                        name: name.text(self.source).to_string(),
                    };
                }
                Some(TokenKind::Bang) => {
                    self.advance();
                    expr = Expr::NullForgiving(Box::new(expr));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Capture a brace-balanced block body verbatim.
    fn parse_block(&mut self) -> Result<String, ParseError> {
        let open = self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut depth = 1usize;
        let mut end = open.end;
        while depth > 0 {
            match self.advance() {
                Some(token) => {
                    match token.kind {
                        TokenKind::OpenBrace => depth += 1,
                        TokenKind::CloseBrace => depth -= 1,
                        _ => {}
                    }
                    end = token.end;
                }
                None => {
                    return Err(ParseError::new("unterminated block body", self.source.len()));
                }
            }
        }
        Ok(self.source[open.start..end].to_string())
    }
}

/// Parse a selector lambda such as `x => x.Child.Name!`.
///
/// Block bodies parse successfully into [`SelectorBody::Block`]; the decision
/// to skip them belongs to the classifier, not the parser.
pub fn parse_selector(source: &str) -> Result<SelectorLambda, ParseError> {
    let mut parser = Parser {
        source,
        tokens: scan(source),
        pos: 0,
    };

    let parameter = parser.parse_parameter()?;
    parser.expect(TokenKind::Arrow, "`=>`")?;

    let body = if parser.peek().map(|t| t.kind) == Some(TokenKind::OpenBrace) {
        SelectorBody::Block(parser.parse_block()?)
    } else {
        SelectorBody::Expr(parser.parse_expr()?)
    };

    if let Some(trailing) = parser.peek() {
        let err = ParseError::new("unexpected trailing tokens", trailing.start);
        debug!(selector = source, error = %err, "selector parse failed");
        return Err(err);
    }

    Ok(SelectorLambda {
        parameter,
        body,
        text: source.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(base: Expr, name: &str) -> Expr {
        Expr::Member {
            base: Box::new(base),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_single_property() {
        let lambda = parse_selector("x => x.Name").unwrap();
        assert_eq!(lambda.parameter, "x");
        assert_eq!(
            lambda.body,
            SelectorBody::Expr(member(Expr::Parameter("x".to_string()), "Name"))
        );
    }

    #[test]
    fn test_parse_deep_chain() {
        let lambda = parse_selector("v => v.Child.Owner.Name").unwrap();
        let expected = member(
            member(member(Expr::Parameter("v".to_string()), "Child"), "Owner"),
            "Name",
        );
        assert_eq!(lambda.body, SelectorBody::Expr(expected));
    }

    #[test]
    fn test_parse_identity_selector() {
        let lambda = parse_selector("x => x").unwrap();
        assert_eq!(
            lambda.body,
            SelectorBody::Expr(Expr::Parameter("x".to_string()))
        );
    }

    #[test]
    fn test_parse_null_forgiving_suffix() {
        let lambda = parse_selector("x => x.Owner!.Name").unwrap();
        let expected = member(
            Expr::NullForgiving(Box::new(member(
                Expr::Parameter("x".to_string()),
                "Owner",
            ))),
            "Name",
        );
        assert_eq!(lambda.body, SelectorBody::Expr(expected));
    }

    #[test]
    fn test_parse_parenthesized_parameter_and_body() {
        let lambda = parse_selector("(x) => (x.Name)").unwrap();
        assert_eq!(lambda.parameter, "x");
        assert_eq!(
            lambda.body,
            SelectorBody::Expr(member(Expr::Parameter("x".to_string()), "Name"))
        );
    }

    #[test]
    fn test_parse_block_body() {
        let lambda = parse_selector("x => { return x.Name }").unwrap();
        match lambda.body {
            SelectorBody::Block(text) => assert_eq!(text, "{ return x.Name }"),
            other => panic!("expected block body, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_block_body() {
        let lambda = parse_selector("x => { if (x) { return x.A } }").unwrap();
        assert!(matches!(lambda.body, SelectorBody::Block(_)));
    }

    #[test]
    fn test_parse_rejects_trailing_tokens() {
        assert!(parse_selector("x => x.Name extra").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_arrow() {
        assert!(parse_selector("x x.Name").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        assert!(parse_selector("x => x.A + x.B").is_err());
    }

    #[test]
    fn test_parse_rejects_unterminated_block() {
        assert!(parse_selector("x => { return x.A").is_err());
    }
}
