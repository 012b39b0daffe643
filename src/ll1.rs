//! LL(1) analysis: nullable symbols, FIRST and FOLLOW sets, the predictive parse table
//! and its conflicts.
//!
//! A grammar is LL(1) when no table cell holds more than one production. Grammars that
//! read counted byte runs (such as netstrings, where `,` is both a byte and the string
//! terminator) collide on purpose; [`ParseTable::split_counted`] splits the byte rows on
//! whether the remaining count is zero, which is how the validator resolves it.

use crate::grammar::{Grammar, GrammarError, END_MARKER};
use std::collections::{BTreeMap, BTreeSet};

/// Nullable set plus FIRST and FOLLOW sets for every nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub nullable: BTreeSet<String>,
    pub first: BTreeMap<String, BTreeSet<String>>,
    pub follow: BTreeMap<String, BTreeSet<String>>,
}

impl Analysis {
    /// Fixpoint computation over all productions.
    pub fn new(grammar: &Grammar) -> Self {
        let mut nullable = BTreeSet::new();
        let mut first: BTreeMap<String, BTreeSet<String>> = grammar
            .nonterminals()
            .iter()
            .map(|n| (n.clone(), BTreeSet::new()))
            .collect();
        let mut follow = first.clone();
        if let Some(start) = follow.get_mut(grammar.start()) {
            start.insert(END_MARKER.to_string());
        }

        loop {
            let mut changed = false;
            for p in grammar.productions() {
                if !nullable.contains(&p.lhs) && p.rhs.iter().all(|s| nullable.contains(s)) {
                    nullable.insert(p.lhs.clone());
                    changed = true;
                }

                let (rhs_first, _) = first_of_sequence(&first, &nullable, &p.rhs);
                if let Some(set) = first.get_mut(&p.lhs) {
                    for t in rhs_first {
                        changed |= set.insert(t);
                    }
                }

                for (i, symbol) in p.rhs.iter().enumerate() {
                    if !follow.contains_key(symbol) {
                        continue;
                    }
                    let (mut trailer, trailer_nullable) =
                        first_of_sequence(&first, &nullable, &p.rhs[i + 1..]);
                    if trailer_nullable {
                        trailer.extend(follow[&p.lhs].iter().cloned());
                    }
                    if let Some(set) = follow.get_mut(symbol) {
                        for t in trailer {
                            changed |= set.insert(t);
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        Analysis {
            nullable,
            first,
            follow,
        }
    }

    /// FIRST of a symbol sequence and whether the whole sequence can derive ε.
    pub fn first_of(&self, symbols: &[String]) -> (BTreeSet<String>, bool) {
        first_of_sequence(&self.first, &self.nullable, symbols)
    }

    pub fn is_nullable(&self, symbol: &str) -> bool {
        self.nullable.contains(symbol)
    }
}

/// Symbols without a FIRST entry are terminals.
fn first_of_sequence(
    first: &BTreeMap<String, BTreeSet<String>>,
    nullable: &BTreeSet<String>,
    symbols: &[String],
) -> (BTreeSet<String>, bool) {
    let mut out = BTreeSet::new();
    for s in symbols {
        match first.get(s) {
            Some(set) => {
                out.extend(set.iter().cloned());
                if !nullable.contains(s) {
                    return (out, false);
                }
            }
            None => {
                out.insert(s.clone());
                return (out, false);
            }
        }
    }
    (out, true)
}

/// Which side of a counted split a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Bytes remain to be read.
    Positive,
    /// The declared count is exhausted.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub nonterminal: String,
    pub counter: Option<Counter>,
    /// Terminal to production indices; more than one index is a conflict.
    pub cells: BTreeMap<String, Vec<usize>>,
}

impl Row {
    fn new(nonterminal: &str) -> Self {
        Row {
            nonterminal: nonterminal.to_string(),
            counter: None,
            cells: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> String {
        match self.counter {
            None => self.nonterminal.clone(),
            Some(Counter::Positive) => format!("{} (acc > 0)", self.nonterminal),
            Some(Counter::Zero) => format!("{} (acc == 0)", self.nonterminal),
        }
    }

    pub fn get(&self, terminal: &str) -> &[usize] {
        self.cells.get(terminal).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub row: String,
    pub terminal: String,
    pub productions: Vec<usize>,
}

/// Predictive parse table: one row per nonterminal, one column per terminal plus `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ParseTable {
    pub fn build(grammar: &Grammar, analysis: &Analysis) -> Self {
        let mut columns: Vec<String> = grammar.terminals().to_vec();
        columns.push(END_MARKER.to_string());
        let mut rows: Vec<Row> = grammar.nonterminals().iter().map(|n| Row::new(n)).collect();

        for (i, p) in grammar.productions().iter().enumerate() {
            let (mut lookahead, nullable) = analysis.first_of(&p.rhs);
            if nullable {
                if let Some(follow) = analysis.follow.get(&p.lhs) {
                    lookahead.extend(follow.iter().cloned());
                }
            }
            if let Some(row) = rows.iter_mut().find(|r| r.nonterminal == p.lhs) {
                for t in lookahead {
                    row.cells.entry(t).or_default().push(i);
                }
            }
        }

        let table = ParseTable { columns, rows };
        for c in table.conflicts() {
            tracing::warn!(row = %c.row, terminal = %c.terminal, productions = ?c.productions, "LL(1) conflict");
        }
        table
    }

    /// Analyse `grammar` and build its table in one go.
    pub fn for_grammar(grammar: &Grammar) -> (Analysis, Self) {
        let analysis = Analysis::new(grammar);
        let table = ParseTable::build(grammar, &analysis);
        (analysis, table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Entries of the first row for `nonterminal` under `terminal`.
    pub fn get(&self, nonterminal: &str, terminal: &str) -> &[usize] {
        self.rows
            .iter()
            .find(|r| r.nonterminal == nonterminal)
            .map(|r| r.get(terminal))
            .unwrap_or(&[])
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut out = Vec::new();
        for row in &self.rows {
            for (terminal, productions) in &row.cells {
                if productions.len() > 1 {
                    out.push(Conflict {
                        row: row.label(),
                        terminal: terminal.clone(),
                        productions: productions.clone(),
                    });
                }
            }
        }
        out
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts().is_empty()
    }

    /// Split every row with an entry under `byte` into an `acc > 0` row, which keeps all
    /// entries except the one under `end`, and an `acc == 0` row holding only that one.
    pub fn split_counted(&self, byte: &str, end: &str) -> Result<ParseTable, GrammarError> {
        for symbol in [byte, end] {
            if symbol == END_MARKER || !self.columns.iter().any(|c| c == symbol) {
                return Err(GrammarError::UnknownTerminal(symbol.to_string()));
            }
        }
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        for row in &self.rows {
            if row.get(byte).is_empty() {
                rows.push(row.clone());
                continue;
            }
            let mut counting = row.clone();
            counting.counter = Some(Counter::Positive);
            let end_entry = counting.cells.remove(end);

            let mut exhausted = Row::new(&row.nonterminal);
            exhausted.counter = Some(Counter::Zero);
            if let Some(entry) = end_entry {
                exhausted.cells.insert(end.to_string(), entry);
            }
            rows.push(counting);
            rows.push(exhausted);
        }
        Ok(ParseTable {
            columns: self.columns.clone(),
            rows,
        })
    }
}
