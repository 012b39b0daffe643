//! Benchmark: validate deeply nested containers, long raw strings and many siblings,
//! plus building the LL(1) table for the netstring grammar.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netstring_parser::{Grammar, Lexer, NetstringParser, ParseTable};

/// `depth` containers wrapped around one raw netstring.
fn nested(depth: usize) -> String {
    let mut s = "3:abc,".to_string();
    for _ in 0..depth {
        s = format!("0{}:{},", s.len(), s);
    }
    s
}

/// One container holding `n` short raw netstrings.
fn siblings(n: usize) -> String {
    let body: String = (0..n).map(|i| format!("2:{:02},", i % 100)).collect();
    format!("0{}:{},", body.len(), body)
}

fn bench_validate(c: &mut Criterion) {
    let parser = NetstringParser::default();
    let deep = nested(200);
    let wide = siblings(2_000);
    let long_raw = format!("{}:{},", 50_000, "x".repeat(50_000));
    for (name, input) in [("deep", &deep), ("wide", &wide), ("long_raw", &long_raw)] {
        assert_eq!(parser.parse(input).expect("valid"), *input, "{} must round-trip", name);
    }
    eprintln!(
        "validate: deep {} bytes, wide {} bytes, long_raw {} bytes",
        deep.len(),
        wide.len(),
        long_raw.len()
    );

    c.bench_function("validate_nested_200", |b| {
        b.iter(|| black_box(parser.validate(black_box(&deep))))
    });

    c.bench_function("validate_siblings_2000", |b| {
        b.iter(|| black_box(parser.validate(black_box(&wide))))
    });

    c.bench_function("validate_raw_50k", |b| {
        b.iter(|| black_box(parser.validate(black_box(&long_raw))))
    });

    c.bench_function("lex_only_siblings_2000", |b| {
        b.iter(|| black_box(Lexer::new(black_box(&wide), true).count()))
    });

    let grammar = Grammar::netstring();
    c.bench_function("ll1_table_netstring", |b| {
        b.iter(|| black_box(ParseTable::for_grammar(black_box(&grammar))))
    });
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
