//! Print nullable/FIRST/FOLLOW sets and the LL(1) parse table of a grammar.
//!
//! Usage:
//!   ll1_table [OPTIONS] [FILE ...]
//!   ll1_table < grammar.txt
//!
//! Options:
//!   --netstring, -n       Check the built-in netstring grammar (in addition to any files)
//!   --split BYTE END      Also print the table split on the byte counter (`acc > 0` / `acc == 0`)
//!
//! Exit code 1 if any grammar has a conflict.

use anyhow::Context;
use netstring_parser::dump::{format_sets, format_table};
use netstring_parser::{parse_grammar, Grammar, ParseTable};
use std::io::{self, Read};

fn report(name: &str, grammar: &Grammar, split: Option<(&str, &str)>) -> anyhow::Result<bool> {
    let (analysis, table) = ParseTable::for_grammar(grammar);
    println!("== {}", name);
    println!("Productions:");
    for (i, p) in grammar.productions().iter().enumerate() {
        println!("  {:>2}: {}", i, p);
    }
    println!("\nSets:");
    print!("{}", format_sets(grammar, &analysis));
    println!("\nParse table:");
    print!("{}", format_table(grammar, &table));

    if let Some((byte, end)) = split {
        let split_table = table
            .split_counted(byte, end)
            .with_context(|| format!("{}: cannot split on {:?}/{:?}", name, byte, end))?;
        println!("\nCounted parse table (byte {:?}, end {:?}):", byte, end);
        print!("{}", format_table(grammar, &split_table));
    }

    let conflicts = table.conflicts();
    if conflicts.is_empty() {
        println!("\n{}: LL(1)", name);
        return Ok(true);
    }
    println!("\n{}: not LL(1), {} conflict(s)", name, conflicts.len());
    for c in &conflicts {
        let productions: Vec<String> = c
            .productions
            .iter()
            .filter_map(|&i| grammar.productions().get(i))
            .map(|p| p.to_string())
            .collect();
        println!("  [{}, {}]: {}", c.row, c.terminal, productions.join(" / "));
    }
    Ok(false)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let builtin = if let Some(pos) = args.iter().position(|a| a == "--netstring" || a == "-n") {
        args.remove(pos);
        true
    } else {
        false
    };
    let split = if let Some(pos) = args.iter().position(|a| a == "--split") {
        if args.len() < pos + 3 {
            anyhow::bail!("--split needs two arguments: BYTE END");
        }
        let end = args.remove(pos + 2);
        let byte = args.remove(pos + 1);
        args.remove(pos);
        Some((byte, end))
    } else {
        None
    };
    let split = split.as_ref().map(|(b, e)| (b.as_str(), e.as_str()));

    let mut all_ll1 = true;
    if builtin {
        all_ll1 &= report("netstring", &Grammar::netstring(), split)?;
    }
    if args.is_empty() && !builtin {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        let grammar = parse_grammar(&src).context("<stdin>")?;
        all_ll1 &= report("<stdin>", &grammar, split)?;
    }
    for path in &args {
        let grammar = Grammar::from_file(path).with_context(|| path.clone())?;
        all_ll1 &= report(path, &grammar, split)?;
    }

    if !all_ll1 {
        std::process::exit(1);
    }
    Ok(())
}
