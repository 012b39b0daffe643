//! Diagnostics: hard parse errors that abort a run, and structural violations that truncate it.

use crate::lexer::LexError;
use crate::token::TokenKind;
use std::fmt;

/// What the parser found where it needed a specific token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Token(TokenKind),
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(kind) => kind.fmt(f),
            Found::EndOfInput => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unmatched ':' after length field, found {0}")]
    MissingColon(Found),
    #[error("unmatched ',', found {0}; netstring contents possibly longer than the length field indicated")]
    MissingTerminator(Found),
    #[error("unmatched ',' closing a container, found {0}")]
    MissingClose(Found),
    #[error("unexpected end of input inside a netstring of declared length {declared}")]
    UnexpectedEnd { declared: usize },
}

/// A hard mismatch. Aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (token {index})")]
pub struct ParseError {
    pub kind: ErrorKind,
    /// Token count at the failure, in the same unit as container boundaries.
    pub index: usize,
    /// Character offset of the offending token, when there was one.
    pub position: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, index: usize, position: Option<usize>) -> Self {
        ParseError {
            kind,
            index,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViolationKind {
    #[error("container of size {size} exceeds enclosing boundary at token {boundary}")]
    ContainerExceedsBoundary { size: usize, boundary: usize },
    #[error("netstring of size {size} exceeds enclosing boundary at token {boundary}")]
    StringExceedsBoundary { size: usize, boundary: usize },
    #[error("expected a nested netstring after nonzero-size container declaration")]
    ExpectedNestedNetstring,
    #[error("unexpected close with no open length-prefix")]
    CloseWithoutLengthPrefix,
    #[error("container content too short: declared to end at token {boundary}")]
    ContainerTooShort { boundary: usize },
    #[error("length field out of range")]
    LengthOutOfRange,
    #[error("input ended with {open} container(s) still open")]
    UnclosedContainer { open: usize },
}

/// A structural violation. The run stops but the validated prefix is still returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Token count when the violation was detected.
    pub index: usize,
    pub position: Option<usize>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token {})", self.kind, self.index)
    }
}
