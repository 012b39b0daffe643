//! Rule-table tokenizer for netstring lines.
//!
//! Each rule is a regular expression anchored at the current offset. All rules are tried;
//! the longest match wins and ties go to the rule declared first. With the default table
//! every token is one character long, so declaration order alone decides, and the
//! `[0-9]` rule ([`TokenKind::AnyDigit`]) never fires because `0` and `[1-9]` come first.
//!
//! Whitespace between tokens is skipped unless disabled, and skipped characters still
//! count towards token positions.

use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// No rule matched the character at `position` (a character offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("lexer error at position {position}")]
pub struct LexError {
    pub position: usize,
}

/// One entry of the lexer's rule table.
#[derive(Debug, Clone)]
pub struct LexRule {
    pattern: Regex,
    kind: TokenKind,
}

impl LexRule {
    pub fn new(pattern: &str, kind: TokenKind) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(LexRule { pattern, kind })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Length in bytes of the match at the start of `input`, if any.
    fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern.find(input).map(|m| m.end()).filter(|&len| len > 0)
    }
}

const DEFAULT_RULES: [(&str, TokenKind); 6] = [
    ("0", TokenKind::ZeroDigit),
    ("[1-9]", TokenKind::NonzeroDigit),
    ("[0-9]", TokenKind::AnyDigit),
    (":", TokenKind::Colon),
    (",", TokenKind::Comma),
    (".", TokenKind::Byte),
];

static DEFAULT_RULE_TABLE: Lazy<Vec<LexRule>> = Lazy::new(|| {
    DEFAULT_RULES
        .iter()
        .map(|&(pattern, kind)| LexRule::new(pattern, kind).expect("default lexer rule compiles"))
        .collect()
});

/// The netstring token rules, in priority order.
pub fn default_rules() -> &'static [LexRule] {
    &DEFAULT_RULE_TABLE
}

/// Pull-style tokenizer over one line. Fused after the first [`LexError`].
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset into `input`.
    offset: usize,
    /// Character offset matching `offset`.
    position: usize,
    rules: &'a [LexRule],
    skip_whitespace: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, skip_whitespace: bool) -> Self {
        Self::with_rules(input, default_rules(), skip_whitespace)
    }

    pub fn with_rules(input: &'a str, rules: &'a [LexRule], skip_whitespace: bool) -> Self {
        Lexer {
            input,
            offset: 0,
            position: 0,
            rules,
            skip_whitespace,
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        for c in self.input[self.offset..].chars() {
            if !c.is_whitespace() {
                break;
            }
            self.offset += c.len_utf8();
            self.position += 1;
        }
    }

    fn longest_match(&self) -> Option<(TokenKind, usize)> {
        let rest = &self.input[self.offset..];
        let mut best: Option<(TokenKind, usize)> = None;
        for rule in self.rules {
            if let Some(len) = rule.match_len(rest) {
                // Strictly longer only: on a tie the earlier rule keeps the match.
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((rule.kind, len));
                }
            }
        }
        best
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.skip_whitespace {
            self.skip_whitespace();
        }
        if self.offset >= self.input.len() {
            return None;
        }
        match self.longest_match() {
            Some((kind, len)) => {
                let value = &self.input[self.offset..self.offset + len];
                let token = Token::new(kind, value, self.position);
                self.offset += len;
                self.position += value.chars().count();
                Some(Ok(token))
            }
            None => {
                self.failed = true;
                Some(Err(LexError {
                    position: self.position,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input, true)
            .map(|t| t.expect("lex").kind)
            .collect()
    }

    #[test]
    fn classifies_each_character() {
        use TokenKind::*;
        assert_eq!(
            kinds("05:a,"),
            vec![ZeroDigit, NonzeroDigit, Colon, Byte, Comma]
        );
    }

    #[test]
    fn any_digit_is_unreachable_with_default_rules() {
        let all = kinds("0123456789");
        assert!(all.iter().all(|k| *k != TokenKind::AnyDigit));
        assert_eq!(all[0], TokenKind::ZeroDigit);
        assert!(all[1..].iter().all(|k| *k == TokenKind::NonzeroDigit));
    }

    #[test]
    fn skips_whitespace_but_counts_it_in_positions() {
        let tokens: Vec<_> = Lexer::new(" 1 :\tx ,", true).map(|t| t.unwrap()).collect();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 3, 5, 7]);
        let text: String = tokens.iter().map(|t| t.value).collect();
        assert_eq!(text, "1:x,");
    }

    #[test]
    fn positions_are_character_offsets() {
        let tokens: Vec<_> = Lexer::new("é:ü,", true).map(|t| t.unwrap()).collect();
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[2].value, "ü");
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn newline_is_a_lex_error_without_whitespace_skipping() {
        let mut lexer = Lexer::new("1:\n,", false);
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_ok());
        assert_eq!(lexer.next(), Some(Err(LexError { position: 2 })));
        assert_eq!(lexer.next(), None, "lexer is fused after an error");
    }

    #[test]
    fn spaces_are_bytes_without_whitespace_skipping() {
        let tokens: Vec<_> = Lexer::new("a b", false).map(|t| t.unwrap()).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Byte);
    }

    #[test]
    fn longest_match_beats_declaration_order() {
        let rules = vec![
            LexRule::new("0", TokenKind::ZeroDigit).unwrap(),
            LexRule::new("[0-9]+", TokenKind::AnyDigit).unwrap(),
        ];
        let tokens: Vec<_> = Lexer::with_rules("05", &rules, true)
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(tokens, vec![Token::new(TokenKind::AnyDigit, "05", 0)]);

        let tokens: Vec<_> = Lexer::with_rules("0", &rules, true)
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(tokens[0].kind, TokenKind::ZeroDigit, "tie goes to first rule");
    }

    #[test]
    fn invalid_rule_pattern_is_reported() {
        assert!(LexRule::new("[", TokenKind::Byte).is_err());
    }
}
