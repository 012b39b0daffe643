//! # netstring-parser — validator for netstrings with nested containers
//!
//! Classic netstrings are length-prefixed byte strings, `<len>:<bytes>,`. This crate
//! extends them with containers: a length prefix starting with a literal `0`
//! (`0<len>:`, or `0:` for an empty container) declares a region that must hold zero or
//! more complete netstrings instead of raw bytes, closed by its own `,`.
//!
//! [`parse`] validates one line and returns the validated text:
//!
//! - well-formed input comes back unchanged;
//! - anything after the outermost netstring is dropped;
//! - a declared size that does not fit its enclosing container stops the run and the
//!   prefix validated so far is returned ([`validate`] also reports the [`Violation`]);
//! - a token that cannot continue the grammar at all is a [`ParseError`].
//!
//! ```
//! use netstring_parser::{parse, validate, ViolationKind};
//!
//! assert_eq!(parse("024:011:3:abc,2:cd,,5:abcde,,").unwrap(), "024:011:3:abc,2:cd,,5:abcde,,");
//! assert_eq!(parse("5:hello,xyz").unwrap(), "5:hello,");
//!
//! let v = validate("04:0:,,,").unwrap();
//! assert_eq!(v.text, "04:0:,");
//! assert!(matches!(v.violation.unwrap().kind, ViolationKind::ContainerTooShort { .. }));
//!
//! assert!(parse("3:abcd,").is_err());
//! ```
//!
//! ## Grammar tool
//!
//! [`grammar`] and [`ll1`] form an offline checker for the grammar itself: FIRST/FOLLOW
//! sets, the LL(1) table, conflicts, and the counted split used for byte runs. The
//! `ll1_table` binary prints them; `netstring_check` validates input line by line.

pub mod dump;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod ll1;
pub mod options;
pub mod parser;
pub mod token;

pub use error::{ErrorKind, Found, ParseError, Violation, ViolationKind};
pub use grammar::{parse_grammar, Grammar, GrammarError, Production, NETSTRING_GRAMMAR};
pub use lexer::{LexError, LexRule, Lexer};
pub use ll1::{Analysis, Conflict, ParseTable};
pub use options::ParserOptions;
pub use parser::{parse, validate, validate_tokens, NetstringParser, Validated};
pub use token::{Token, TokenKind};
