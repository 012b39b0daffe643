//! Validate netstrings line by line.
//!
//! Usage:
//!   netstring_check [OPTIONS] [FILE ...]
//!   netstring_check < lines.txt
//!
//! Every input line is validated on its own and reported as `ok`, `truncated` (a
//! structural violation cut it short), `incomplete` (input ended inside a container) or
//! `error` (hard mismatch).
//!
//! Options:
//!   --keep-whitespace, -w  Treat whitespace as bytes instead of skipping it
//!   --human, -H            Human-readable output
//!
//! Exit code 1 if any line had a hard error. Set `RUST_LOG=debug` to trace each run.

use anyhow::Context;
use netstring_parser::dump::format_outcome;
use netstring_parser::{NetstringParser, ParseError, ParserOptions, Validated};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

#[derive(Default)]
struct Totals {
    ok: usize,
    truncated: usize,
    incomplete: usize,
    errors: usize,
}

impl Totals {
    fn record(&mut self, result: &Result<Validated, ParseError>) {
        match result {
            Ok(v) if v.is_complete() => self.ok += 1,
            Ok(v) if v.is_truncated() => self.truncated += 1,
            Ok(_) => self.incomplete += 1,
            Err(_) => self.errors += 1,
        }
    }
}

fn print_outcome(source: &str, line_no: usize, line: &str, result: &Result<Validated, ParseError>, style: OutputStyle) {
    match style {
        OutputStyle::Compact => println!("{}:{}: {}", source, line_no, format_outcome(result)),
        OutputStyle::Human => {
            println!("  {}:{}", source, line_no);
            println!("    input:  {}", line);
            println!("    result: {}", format_outcome(result));
        }
    }
}

fn check_lines(
    parser: &NetstringParser,
    source: &str,
    reader: impl BufRead,
    style: OutputStyle,
    totals: &mut Totals,
) -> anyhow::Result<()> {
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("{}: read failed", source))?;
        let result = parser.validate(&line);
        totals.record(&result);
        print_outcome(source, i + 1, &line, &result, style);
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let skip_whitespace = if let Some(pos) = args.iter().position(|a| a == "--keep-whitespace" || a == "-w") {
        args.remove(pos);
        false
    } else {
        true
    };
    let style = if let Some(pos) = args.iter().position(|a| a == "--human" || a == "-H") {
        args.remove(pos);
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };

    let parser = NetstringParser::new(ParserOptions { skip_whitespace });
    let mut totals = Totals::default();

    if args.is_empty() {
        check_lines(&parser, "<stdin>", io::stdin().lock(), style, &mut totals)?;
    } else {
        for path in &args {
            let path = Path::new(path);
            let file = match std::fs::File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    totals.errors += 1;
                    continue;
                }
            };
            let display_path = path.display().to_string();
            check_lines(&parser, &display_path, BufReader::new(file), style, &mut totals)?;
        }
    }

    eprintln!(
        "netstring_check: {} ok, {} truncated, {} incomplete, {} error(s)",
        totals.ok, totals.truncated, totals.incomplete, totals.errors
    );
    if totals.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
