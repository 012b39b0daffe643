//! Text output: FIRST/FOLLOW sets, parse tables and per-line validation reports.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::ll1::{Analysis, ParseTable};
use crate::parser::Validated;
use std::collections::BTreeSet;

fn format_set(set: &BTreeSet<String>) -> String {
    let items: Vec<&str> = set.iter().map(String::as_str).collect();
    format!("{{ {} }}", items.join(", "))
}

/// One line per nonterminal: nullable flag, FIRST and FOLLOW.
pub fn format_sets(grammar: &Grammar, analysis: &Analysis) -> String {
    let width = grammar.nonterminals().iter().map(|n| n.chars().count()).max().unwrap_or(0);
    let empty = BTreeSet::new();
    let mut out = String::new();
    for n in grammar.nonterminals() {
        let first = analysis.first.get(n).unwrap_or(&empty);
        let follow = analysis.follow.get(n).unwrap_or(&empty);
        out.push_str(&format!(
            "{:<width$}  nullable={:<5}  FIRST={}  FOLLOW={}\n",
            n,
            analysis.is_nullable(n),
            format_set(first),
            format_set(follow),
            width = width
        ));
    }
    out
}

/// Render the table as a text grid. Conflicting cells list every production, separated by ` / `.
pub fn format_table(grammar: &Grammar, table: &ParseTable) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.rows().len() + 1);
    let mut header = vec![String::new()];
    header.extend(table.columns().iter().cloned());
    grid.push(header);
    for row in table.rows() {
        let mut line = vec![row.label()];
        for column in table.columns() {
            let cell: Vec<String> = row
                .get(column)
                .iter()
                .filter_map(|&i| grammar.productions().get(i))
                .map(|p| p.to_string())
                .collect();
            line.push(cell.join(" / "));
        }
        grid.push(line);
    }

    let columns = grid[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| grid.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();
    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{}+\n", rule);

    let mut out = rule.clone();
    for (i, r) in grid.iter().enumerate() {
        let cells: Vec<String> = r
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!(" {:<w$} ", cell, w = w))
            .collect();
        out.push_str(&format!("|{}|\n", cells.join("|")));
        if i == 0 {
            out.push_str(&rule);
        }
    }
    out.push_str(&rule);
    out
}

/// One-line summary of a validation run.
pub fn format_outcome(result: &Result<Validated, ParseError>) -> String {
    match result {
        Ok(v) => match &v.violation {
            None => format!("ok: {}", v.text),
            Some(violation) if v.is_truncated() => {
                format!("truncated: {} ({})", v.text, violation)
            }
            Some(violation) => format!("incomplete: {} ({})", v.text, violation),
        },
        Err(e) => match e.position {
            Some(position) => format!("error: {} at position {}", e, position),
            None => format!("error: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_grammar;
    use crate::parser::validate;

    #[test]
    fn sets_are_listed_per_nonterminal() {
        let g = parse_grammar("S = a B\nB = b |").unwrap();
        let a = Analysis::new(&g);
        let text = format_sets(&g, &a);
        assert!(text.contains("S  nullable=false  FIRST={ a }  FOLLOW={ $ }"), "{}", text);
        assert!(text.contains("B  nullable=true   FIRST={ b }  FOLLOW={ $ }"), "{}", text);
    }

    #[test]
    fn table_grid_has_header_and_rows() {
        let g = parse_grammar("S = a | b").unwrap();
        let (_, table) = ParseTable::for_grammar(&g);
        let text = format_table(&g, &table);
        let lines: Vec<&str> = text.lines().collect();
        // rule, header, rule, one row, rule
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains(" a ") && lines[1].contains(" $ "));
        assert!(lines[3].contains("S -> a") && lines[3].contains("S -> b"));
    }

    #[test]
    fn conflicting_cell_lists_both_productions() {
        let g = parse_grammar("S = a b | a c").unwrap();
        let (_, table) = ParseTable::for_grammar(&g);
        assert!(format_table(&g, &table).contains("S -> a b / S -> a c"));
    }

    #[test]
    fn outcome_lines() {
        assert_eq!(format_outcome(&validate("0:,")), "ok: 0:,");
        assert!(format_outcome(&validate("03:abc,")).starts_with("truncated: 03: (expected a nested netstring"));
        assert!(format_outcome(&validate("03:")).starts_with("incomplete: 03: (input ended"));
        assert!(format_outcome(&validate("2:abc,")).starts_with("error: unmatched ','"));
    }
}
