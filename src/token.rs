//! Tokens produced by the lexer and consumed by the validator.

use std::fmt;

/// Token class. Declaration order matches the lexer's rule priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// The literal digit `0`.
    ZeroDigit,
    /// A digit `1`..=`9`.
    NonzeroDigit,
    /// Any digit `0`..=`9`. Shadowed by the two rules above, so the default rules never produce it.
    AnyDigit,
    Colon,
    Comma,
    /// Fallback: any other single character.
    Byte,
}

impl TokenKind {
    /// Digits that may appear in a length field.
    pub fn is_length_digit(self) -> bool {
        matches!(self, TokenKind::ZeroDigit | TokenKind::NonzeroDigit)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::ZeroDigit => "'0'",
            TokenKind::NonzeroDigit => "digit 1-9",
            TokenKind::AnyDigit => "digit",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Byte => "byte",
        };
        f.write_str(s)
    }
}

/// A lexed token borrowing its text from the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    /// Character offset of the token's first character in the line.
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: &'a str, position: usize) -> Self {
        Token { kind, value, position }
    }
}
