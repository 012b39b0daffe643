//! Property tests: generated well-formed netstrings round-trip, trailing input is dropped,
//! and validating the validated text again changes nothing.
//!
//! The parser checks its boundary stack with debug assertions after every production, so
//! these also exercise the stack invariants on every generated input.

use netstring_parser::{parse, validate};
use quickcheck::{Arbitrary, Gen, QuickCheck};

const BYTES: &[char] = &['a', 'b', 'z', '0', '1', '9', ':', ',', '-', 'é'];

/// A well-formed netstring tree.
#[derive(Debug, Clone)]
enum Node {
    Raw(String),
    Container(Vec<Node>),
}

impl Node {
    fn encode(&self) -> String {
        match self {
            Node::Raw(body) => format!("{}:{},", body.chars().count(), body),
            Node::Container(children) => {
                let body: String = children.iter().map(Node::encode).collect();
                match body.chars().count() {
                    0 => "0:,".to_string(),
                    len => format!("0{}:{},", len, body),
                }
            }
        }
    }
}

impl Arbitrary for Node {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_node(g: &mut Gen, depth: usize) -> Node {
            if depth == 0 || bool::arbitrary(g) {
                let len = 1 + usize::arbitrary(g) % 12;
                Node::Raw((0..len).map(|_| *g.choose(BYTES).unwrap_or(&'a')).collect())
            } else {
                let n = usize::arbitrary(g) % 4;
                Node::Container((0..n).map(|_| gen_node(g, depth - 1)).collect())
            }
        }
        gen_node(g, 4)
    }
}

/// Short strings over the characters that drive the grammar.
#[derive(Debug, Clone)]
struct NetstringLike(String);

impl Arbitrary for NetstringLike {
    fn arbitrary(g: &mut Gen) -> Self {
        const ALPHABET: &[char] = &['0', '1', '2', '3', ':', ',', 'a', 'b'];
        let len = usize::arbitrary(g) % 16;
        NetstringLike((0..len).map(|_| *g.choose(ALPHABET).unwrap_or(&'0')).collect())
    }
}

#[test]
fn well_formed_round_trips() {
    fn prop(node: Node) -> bool {
        let encoded = node.encode();
        match validate(&encoded) {
            Ok(v) => v.text == encoded && v.is_complete(),
            Err(_) => false,
        }
    }
    QuickCheck::new().tests(2_000).quickcheck(prop as fn(Node) -> bool);
}

#[test]
fn trailing_input_is_dropped() {
    fn prop(node: Node, suffix: String) -> bool {
        let encoded = node.encode();
        parse(&format!("{}{}", encoded, suffix)).ok() == Some(encoded)
    }
    QuickCheck::new().tests(1_000).quickcheck(prop as fn(Node, String) -> bool);
}

#[test]
fn validated_text_is_a_prefix() {
    fn prop(input: NetstringLike) -> bool {
        match parse(&input.0) {
            Ok(text) => input.0.starts_with(&text),
            Err(_) => true,
        }
    }
    QuickCheck::new().tests(5_000).quickcheck(prop as fn(NetstringLike) -> bool);
}

#[test]
fn truncation_is_idempotent() {
    fn prop(input: NetstringLike) -> bool {
        match parse(&input.0) {
            Ok(text) => parse(&text).ok() == Some(text),
            Err(_) => true,
        }
    }
    QuickCheck::new().tests(5_000).quickcheck(prop as fn(NetstringLike) -> bool);
}
