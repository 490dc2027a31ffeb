//! Token scanner for selector expressions.
//!
//! Selectors are tiny, so the scanner materializes all tokens up front rather
//! than streaming. Identifiers follow the usual `[A-Za-z_][A-Za-z0-9_]*`
//! shape; everything the parser cares about beyond that is punctuation.

use smallvec::SmallVec;

/// Kind of a scanned token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier (parameter name or property name).
    Identifier,
    /// `=>`
    Arrow,
    /// `.`
    Dot,
    /// `!` (null-forgiving suffix)
    Bang,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// Any other character the selector grammar does not know.
    Unknown,
}

/// One token with its byte range in the selector text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The token's text within `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Scan a selector string into tokens, skipping whitespace.
pub fn scan(source: &str) -> SmallVec<[Token; 16]> {
    let mut tokens = SmallVec::new();
    let bytes = source.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = source[pos..].chars().next().unwrap_or('\0');
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        let start = pos;
        let kind = if is_ident_start(ch) {
            pos += ch.len_utf8();
            while pos < bytes.len() {
                let next = source[pos..].chars().next().unwrap_or('\0');
                if !is_ident_continue(next) {
                    break;
                }
                pos += next.len_utf8();
            }
            TokenKind::Identifier
        } else if ch == '=' && source[pos..].starts_with("=>") {
            pos += 2;
            TokenKind::Arrow
        } else {
            pos += ch.len_utf8();
            match ch {
                '.' => TokenKind::Dot,
                '!' => TokenKind::Bang,
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '{' => TokenKind::OpenBrace,
                '}' => TokenKind::CloseBrace,
                _ => TokenKind::Unknown,
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: pos,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_member_chain() {
        assert_eq!(
            kinds("x => x.Child.Name"),
            vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_scan_null_forgiving_and_braces() {
        assert_eq!(
            kinds("v => v.Owner!.Name"),
            vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Bang,
                TokenKind::Dot,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(
            kinds("{ }"),
            vec![TokenKind::OpenBrace, TokenKind::CloseBrace]
        );
    }

    #[test]
    fn test_token_text() {
        let source = "x => x.Name";
        let tokens = scan(source);
        assert_eq!(tokens[0].text(source), "x");
        assert_eq!(tokens.last().unwrap().text(source), "Name");
    }

    #[test]
    fn test_unknown_character() {
        let tokens = scan("x + y");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
    }
}
