//! Context-free grammars for the offline LL(1) checker, parsed from text using PEST.
//!
//! ```text
//! # netstring grammar
//! S = 0 D : R ,
//! S = 1 D : T ,
//! R = S R | ε
//! ```
//!
//! Symbols are separated by whitespace. Nonterminals are the symbols that appear on a
//! left-hand side; every other symbol is a terminal. The first left-hand side is the
//! start symbol.

use pest::Parser;
use pest_derive::Parser as PestParser;
use std::fmt;
use std::path::Path;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct GrammarParser;

/// End-of-input marker used in FOLLOW sets and as the last table column.
pub const END_MARKER: &str = "$";

/// Written alone on a right-hand side, stands for the empty sequence.
pub const EPSILON: &str = "ε";

/// The netstring grammar checked by the validator's design: `b` is any byte.
pub const NETSTRING_GRAMMAR: &str = "\
S = 0 D : R ,
S = 1 D : T ,
R = S R | ε
T = b T | ε
D = 0 D | 1 D | ε
";

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("Parse error: {0}")]
    Syntax(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("grammar has no productions")]
    Empty,
    #[error("symbol {0:?} is reserved")]
    ReservedSymbol(String),
    #[error("{0:?} is not a terminal of the grammar")]
    UnknownTerminal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: String,
    /// Empty for an epsilon production.
    pub rhs: Vec<String>,
}

impl Production {
    pub fn new(lhs: &str, rhs: &[&str]) -> Self {
        Production {
            lhs: lhs.to_string(),
            rhs: rhs.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " {}", EPSILON);
        }
        for s in &self.rhs {
            write!(f, " {}", s)?;
        }
        Ok(())
    }
}

/// Productions plus their nonterminals and terminals, both in order of first appearance.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    nonterminals: Vec<String>,
    terminals: Vec<String>,
}

impl Grammar {
    pub fn new(productions: Vec<Production>) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::Empty);
        }
        let mut nonterminals: Vec<String> = Vec::new();
        for p in &productions {
            if p.lhs == END_MARKER {
                return Err(GrammarError::ReservedSymbol(p.lhs.clone()));
            }
            if !nonterminals.contains(&p.lhs) {
                nonterminals.push(p.lhs.clone());
            }
        }
        let mut terminals: Vec<String> = Vec::new();
        for s in productions.iter().flat_map(|p| &p.rhs) {
            if s == END_MARKER || s == EPSILON {
                return Err(GrammarError::ReservedSymbol(s.clone()));
            }
            if !nonterminals.contains(s) && !terminals.contains(s) {
                terminals.push(s.clone());
            }
        }
        Ok(Grammar {
            productions,
            nonterminals,
            terminals,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let source = std::fs::read_to_string(path)?;
        parse_grammar(&source)
    }

    /// The built-in netstring grammar.
    pub fn netstring() -> Self {
        parse_grammar(NETSTRING_GRAMMAR).expect("built-in grammar parses")
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn nonterminals(&self) -> &[String] {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn start(&self) -> &str {
        &self.productions[0].lhs
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.nonterminals.iter().any(|n| n == symbol)
    }
}

/// Parse grammar source into a [`Grammar`].
pub fn parse_grammar(source: &str) -> Result<Grammar, GrammarError> {
    let pairs = GrammarParser::parse(Rule::grammar, source)
        .map_err(|e| GrammarError::Syntax(e.to_string()))?;
    let pair = pairs.into_iter().next().ok_or(GrammarError::Empty)?;
    let mut productions = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::production {
            productions.extend(build_production(inner)?);
        }
    }
    Grammar::new(productions)
}

/// One line can hold several alternatives; each becomes its own production.
fn build_production(pair: pest::iterators::Pair<Rule>) -> Result<Vec<Production>, GrammarError> {
    let mut inner = pair.into_inner();
    let lhs = inner
        .next()
        .ok_or_else(|| GrammarError::Syntax("production: missing left-hand side".to_string()))?
        .as_str()
        .trim()
        .to_string();
    let mut out = Vec::new();
    for alternative in inner.filter(|p| p.as_rule() == Rule::alternative) {
        let mut rhs: Vec<String> = alternative
            .into_inner()
            .map(|s| s.as_str().to_string())
            .collect();
        if rhs.len() == 1 && rhs[0] == EPSILON {
            rhs.clear();
        }
        out.push(Production {
            lhs: lhs.clone(),
            rhs,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_alternatives_and_epsilon() {
        let g = parse_grammar("E = T X\nX = + T X |\nT = n").unwrap();
        assert_eq!(g.productions().len(), 4);
        assert_eq!(g.productions()[2], Production::new("X", &[]));
        assert_eq!(g.nonterminals(), ["E", "X", "T"]);
        assert_eq!(g.terminals(), ["+", "n"]);
        assert_eq!(g.start(), "E");
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let src = "# header\n\nS = a S   # recursive\n  \nS =\n";
        let g = parse_grammar(src).unwrap();
        assert_eq!(g.productions().len(), 2);
        assert!(g.productions()[1].is_epsilon());
    }

    #[test]
    fn netstring_grammar_symbols() {
        let g = Grammar::netstring();
        assert_eq!(g.productions().len(), 9);
        assert_eq!(g.terminals(), ["0", ":", ",", "1", "b"]);
        assert!(g.is_nonterminal("R"));
        assert!(!g.is_nonterminal("N"));
        assert!(!g.is_nonterminal("b"));
    }

    #[test]
    fn production_display() {
        assert_eq!(Production::new("S", &["0", "D", ":"]).to_string(), "S -> 0 D :");
        assert_eq!(Production::new("T", &[]).to_string(), "T -> ε");
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(matches!(parse_grammar("S a b"), Err(GrammarError::Syntax(_))));
    }

    #[test]
    fn rejects_empty_and_reserved() {
        assert!(matches!(parse_grammar("# nothing\n"), Err(GrammarError::Empty)));
        assert!(matches!(
            parse_grammar("S = a $"),
            Err(GrammarError::ReservedSymbol(_))
        ));
    }
}
