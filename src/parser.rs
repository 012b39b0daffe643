//! Recursive-descent validator for netstrings with nested containers.
//!
//! A raw netstring is `<len>:<bytes>,`. A length prefix starting with `0` opens a
//! container (`0<len>:` or `0:`) whose body must be a sequence of complete netstrings
//! spanning exactly `<len>` tokens, followed by its own closing `,`.
//!
//! All sizes and boundaries are counted in consumed tokens. With the default lexer
//! every token is one non-whitespace character, so a declared length is the number of
//! characters in the body once whitespace is skipped.
//!
//! The grammar only ever needs one token of lookahead, and every production ends in a
//! tail position, so the descent runs as a loop over [`Branch`] with the open container
//! boundaries kept on an explicit stack.
//!
//! Two failure tiers:
//! - a token that does not match the only admissible alternative is a [`ParseError`];
//! - a size that does not fit its enclosing boundary ends the run with a [`Violation`],
//!   and the input validated so far is still returned.

use crate::error::{ErrorKind, Found, ParseError, Violation, ViolationKind};
use crate::lexer::{LexError, Lexer};
use crate::options::ParserOptions;
use crate::token::{Token, TokenKind};

/// Result of a validation run that did not hit a hard mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// The validated input, rebuilt from the consumed tokens.
    pub text: String,
    /// Why the run stopped early, if it did.
    pub violation: Option<Violation>,
}

impl Validated {
    pub fn is_complete(&self) -> bool {
        self.violation.is_none()
    }

    /// True when part of the input was dropped because of a structural violation.
    pub fn is_truncated(&self) -> bool {
        matches!(&self.violation, Some(v) if !matches!(v.kind, ViolationKind::UnclosedContainer { .. }))
    }
}

/// Validator entry point. Holds configuration only; every call gets its own parse state,
/// so a single parser can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct NetstringParser {
    options: ParserOptions,
}

impl NetstringParser {
    pub fn new(options: ParserOptions) -> Self {
        NetstringParser { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Validate one line, returning the validated text together with any violation.
    pub fn validate(&self, line: &str) -> Result<Validated, ParseError> {
        validate_tokens(Lexer::new(line, self.options.skip_whitespace))
    }

    /// Validate one line, returning only the validated (possibly truncated) text.
    pub fn parse(&self, line: &str) -> Result<String, ParseError> {
        self.validate(line).map(|v| v.text)
    }
}

/// [`NetstringParser::parse`] with default options.
pub fn parse(line: &str) -> Result<String, ParseError> {
    NetstringParser::default().parse(line)
}

/// [`NetstringParser::validate`] with default options.
pub fn validate(line: &str) -> Result<Validated, ParseError> {
    NetstringParser::default().validate(line)
}

/// Run the validator over any token source.
pub fn validate_tokens<'a, I>(tokens: I) -> Result<Validated, ParseError>
where
    I: Iterator<Item = Result<Token<'a>, LexError>>,
{
    ParseState::new(tokens).run()
}

/// The production selected by the lookahead token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// `0` opens a container.
    Container,
    /// `1`-`9` starts a raw netstring.
    Raw,
    /// Anything else must close the innermost container.
    Close,
}

impl Branch {
    fn select(kind: TokenKind) -> Self {
        match kind {
            TokenKind::ZeroDigit => Branch::Container,
            TokenKind::NonzeroDigit => Branch::Raw,
            _ => Branch::Close,
        }
    }
}

enum Step {
    Continue,
    Truncate(ViolationKind),
}

/// State of one validation run. Never outlives the call that created it.
struct ParseState<'a, I> {
    tokens: I,
    /// Next unconsumed token. Only valid while `fetched` is set.
    lookahead: Option<Token<'a>>,
    /// Tokens are pulled on demand, so nothing past the outermost boundary is ever lexed.
    fetched: bool,
    /// Number of tokens consumed so far.
    cur_pos: usize,
    /// Token count at which the outermost netstring ends. Set once, at the first length prefix.
    outer_boundary: Option<usize>,
    /// Token counts at which the open containers close, innermost last.
    boundaries: Vec<usize>,
    /// A nonzero-size container was just opened and must hold a nested netstring.
    expect_nested: bool,
    out: String,
}

impl<'a, I> ParseState<'a, I>
where
    I: Iterator<Item = Result<Token<'a>, LexError>>,
{
    fn new(tokens: I) -> Self {
        ParseState {
            tokens,
            lookahead: None,
            fetched: false,
            cur_pos: 0,
            outer_boundary: None,
            boundaries: Vec::new(),
            expect_nested: false,
            out: String::new(),
        }
    }

    fn run(mut self) -> Result<Validated, ParseError> {
        let violation = loop {
            if self.outer_boundary.is_some_and(|outer| self.cur_pos >= outer) {
                break None;
            }
            let Some(token) = self.peek()? else {
                // The outermost boundary entry has no closing comma of its own.
                let open = self.boundaries.len().saturating_sub(1);
                break (open > 0).then(|| self.violation(ViolationKind::UnclosedContainer { open }));
            };
            let branch = Branch::select(token.kind);
            tracing::trace!(?branch, index = self.cur_pos, "production");
            let mark = self.out.len();
            let step = match branch {
                Branch::Container => self.container(token)?,
                Branch::Raw => self.raw()?,
                Branch::Close => self.close()?,
            };
            match step {
                Step::Continue => self.check_invariants(),
                Step::Truncate(kind) => {
                    self.out.truncate(mark);
                    break Some(self.violation(kind));
                }
            }
        };
        if let Some(v) = &violation {
            tracing::debug!(index = v.index, reason = %v.kind, "netstring validation stopped early");
        }
        Ok(Validated {
            text: self.out,
            violation,
        })
    }

    fn container(&mut self, zero: Token<'a>) -> Result<Step, ParseError> {
        self.shift(zero);
        let Some(size) = self.length_field()? else {
            return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
        };
        self.expect_nested = size != 0;
        let Some(end) = size.checked_add(self.cur_pos) else {
            return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
        };
        if self.outer_boundary.is_none() {
            // One extra token for the outermost closing comma.
            let Some(outer) = end.checked_add(1) else {
                return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
            };
            self.outer_boundary = Some(outer);
            self.boundaries.push(outer);
        }
        if let Some(&boundary) = self.boundaries.last() {
            if end >= boundary {
                return Ok(Step::Truncate(ViolationKind::ContainerExceedsBoundary {
                    size,
                    boundary,
                }));
            }
        }
        self.boundaries.push(end);
        Ok(Step::Continue)
    }

    fn raw(&mut self) -> Result<Step, ParseError> {
        self.expect_nested = false;
        let Some(size) = self.length_field()? else {
            return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
        };
        let Some(end) = size.checked_add(self.cur_pos) else {
            return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
        };
        if let Some(&boundary) = self.boundaries.last() {
            if end >= boundary {
                return Ok(Step::Truncate(ViolationKind::StringExceedsBoundary {
                    size,
                    boundary,
                }));
            }
        }
        if self.outer_boundary.is_none() {
            let Some(outer) = end.checked_add(1) else {
                return Ok(Step::Truncate(ViolationKind::LengthOutOfRange));
            };
            self.outer_boundary = Some(outer);
        }
        self.bytes(size)?;
        Ok(Step::Continue)
    }

    fn close(&mut self) -> Result<Step, ParseError> {
        if self.expect_nested {
            return Ok(Step::Truncate(ViolationKind::ExpectedNestedNetstring));
        }
        let Some(&boundary) = self.boundaries.last() else {
            return Ok(Step::Truncate(ViolationKind::CloseWithoutLengthPrefix));
        };
        self.expect(TokenKind::Comma, ErrorKind::MissingClose)?;
        if boundary >= self.cur_pos {
            return Ok(Step::Truncate(ViolationKind::ContainerTooShort { boundary }));
        }
        self.boundaries.pop();
        Ok(Step::Continue)
    }

    /// Digits up to and including the colon. `None` if the number does not fit in `usize`.
    ///
    /// An empty digit run reads as zero; only the `0:` container prefix gets here with no digits.
    fn length_field(&mut self) -> Result<Option<usize>, ParseError> {
        let mut digits = String::new();
        while let Some(token) = self.peek()?.filter(|t| t.kind.is_length_digit()) {
            digits.push_str(token.value);
            self.shift(token);
        }
        self.expect(TokenKind::Colon, ErrorKind::MissingColon)?;
        if digits.is_empty() {
            return Ok(Some(0));
        }
        Ok(digits.parse().ok())
    }

    /// Exactly `n` tokens of any kind, then the terminating comma.
    fn bytes(&mut self, n: usize) -> Result<(), ParseError> {
        for _ in 0..n {
            match self.peek()? {
                Some(token) => self.shift(token),
                None => {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedEnd { declared: n },
                        self.cur_pos + 1,
                        None,
                    ))
                }
            }
        }
        self.expect(TokenKind::Comma, ErrorKind::MissingTerminator)
    }

    fn expect(&mut self, kind: TokenKind, mismatch: fn(Found) -> ErrorKind) -> Result<(), ParseError> {
        match self.peek()? {
            Some(token) if token.kind == kind => {
                self.shift(token);
                Ok(())
            }
            Some(token) => Err(ParseError::new(
                mismatch(Found::Token(token.kind)),
                self.cur_pos + 1,
                Some(token.position),
            )),
            None => Err(ParseError::new(
                mismatch(Found::EndOfInput),
                self.cur_pos + 1,
                None,
            )),
        }
    }

    /// Consume the lookahead token.
    fn shift(&mut self, token: Token<'a>) {
        self.cur_pos += 1;
        self.out.push_str(token.value);
        self.fetched = false;
    }

    fn peek(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if !self.fetched {
            self.lookahead = self.tokens.next().transpose().map_err(|e| {
                ParseError::new(ErrorKind::Lex(e), self.cur_pos + 1, Some(e.position))
            })?;
            self.fetched = true;
        }
        Ok(self.lookahead)
    }

    fn violation(&mut self, kind: ViolationKind) -> Violation {
        Violation {
            kind,
            index: self.cur_pos,
            position: self.peek().ok().flatten().map(|t| t.position),
        }
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.boundaries.windows(2).all(|w| w[0] > w[1]),
            "boundaries must strictly decrease towards the innermost: {:?}",
            self.boundaries
        );
        debug_assert!(
            self.boundaries.last().map_or(true, |&top| top >= self.cur_pos),
            "consumed past the innermost boundary: {:?} at {}",
            self.boundaries,
            self.cur_pos
        );
    }
}
