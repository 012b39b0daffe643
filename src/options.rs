//! Parser configuration.

/// Options for [`NetstringParser`](crate::NetstringParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Skip whitespace between tokens. Skipped whitespace never appears in the
    /// validated output and does not count towards declared lengths.
    pub skip_whitespace: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            skip_whitespace: true,
        }
    }
}
