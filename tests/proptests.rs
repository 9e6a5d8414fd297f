#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cmp::Ordering;

use packed_cbor::{compare, encode_double_minimal, hash, Document, MinimalFloat};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Tree {
    Uint(u64),
    Neg(u64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Tree>),
    Map(Vec<(Tree, Tree)>),
    Tag(u64, Box<Tree>),
    Float(f64),
    Simple(u8),
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        any::<u64>().prop_map(Tree::Uint),
        any::<u64>().prop_map(Tree::Neg),
        proptest::collection::vec(any::<u8>(), 0..12).prop_map(Tree::Bytes),
        ".{0,8}".prop_map(Tree::Text),
        any::<f64>().prop_map(Tree::Float),
        any::<f32>().prop_map(|f| Tree::Float(f64::from(f))),
        any::<u8>().prop_map(Tree::Simple),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Tree::Array),
            proptest::collection::vec((inner.clone(), inner.clone()), 0..4).prop_map(Tree::Map),
            (0u64..1_000, inner).prop_map(|(t, v)| Tree::Tag(t, Box::new(v))),
        ]
    })
}

/// Head with the argument always stored in the 8-byte form when it exceeds 23.
fn head_wide(out: &mut Vec<u8>, major: u8, arg: u64) {
    if arg < 24 {
        out.push((major << 5) | u8::try_from(arg).unwrap());
    } else {
        out.push((major << 5) | 27);
        out.extend_from_slice(&arg.to_be_bytes());
    }
}

fn head_len(out: &mut Vec<u8>, major: u8, len: usize) {
    head_wide(out, major, u64::try_from(len).unwrap());
}

fn write_simple(out: &mut Vec<u8>, code: u8) {
    if code < 24 {
        out.push(0xe0 | code);
    } else {
        out.extend_from_slice(&[0xf8, code]);
    }
}

/// Definite lengths, wide arguments, floats always as 64-bit.
fn write_definite(out: &mut Vec<u8>, t: &Tree) {
    match t {
        Tree::Uint(v) => head_wide(out, 0, *v),
        Tree::Neg(v) => head_wide(out, 1, *v),
        Tree::Bytes(b) => {
            head_len(out, 2, b.len());
            out.extend_from_slice(b);
        }
        Tree::Text(s) => {
            head_len(out, 3, s.len());
            out.extend_from_slice(s.as_bytes());
        }
        Tree::Array(items) => {
            head_len(out, 4, items.len());
            for item in items {
                write_definite(out, item);
            }
        }
        Tree::Map(pairs) => {
            head_len(out, 5, pairs.len());
            for (k, v) in pairs {
                write_definite(out, k);
                write_definite(out, v);
            }
        }
        Tree::Tag(tag, v) => {
            head_wide(out, 6, *tag);
            write_definite(out, v);
        }
        Tree::Float(f) => {
            out.push(0xfb);
            out.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Tree::Simple(code) => write_simple(out, *code),
    }
}

fn split_at_char(s: &str) -> (&str, &str) {
    let mut mid = s.len() / 2;
    while !s.is_char_boundary(mid) {
        mid += 1;
    }
    s.split_at(mid)
}

/// Indefinite containers and two-chunk strings everywhere they are allowed.
fn write_indefinite(out: &mut Vec<u8>, t: &Tree) {
    match t {
        Tree::Bytes(b) => {
            out.push(0x5f);
            let (x, y) = b.split_at(b.len() / 2);
            for chunk in [x, y] {
                head_len(out, 2, chunk.len());
                out.extend_from_slice(chunk);
            }
            out.push(0xff);
        }
        Tree::Text(s) => {
            out.push(0x7f);
            let (x, y) = split_at_char(s);
            for chunk in [x, y] {
                head_len(out, 3, chunk.len());
                out.extend_from_slice(chunk.as_bytes());
            }
            out.push(0xff);
        }
        Tree::Array(items) => {
            out.push(0x9f);
            for item in items {
                write_indefinite(out, item);
            }
            out.push(0xff);
        }
        Tree::Map(pairs) => {
            out.push(0xbf);
            for (k, v) in pairs {
                write_indefinite(out, k);
                write_indefinite(out, v);
            }
            out.push(0xff);
        }
        Tree::Tag(tag, v) => {
            head_wide(out, 6, *tag);
            write_indefinite(out, v);
        }
        other => write_definite(out, other),
    }
}

fn definite(t: &Tree) -> Document {
    let mut wire = Vec::new();
    write_definite(&mut wire, t);
    Document::decode(&wire).unwrap()
}

proptest! {
    #[test]
    fn encode_is_minimal_and_idempotent(t in arb_tree()) {
        let doc = definite(&t);
        let wire = doc.encode().unwrap();
        let again = Document::decode(&wire).unwrap();
        prop_assert_eq!(again.as_packed(), doc.as_packed());
        prop_assert_eq!(again.encode().unwrap(), wire.clone());

        let mut wide = Vec::new();
        write_definite(&mut wide, &t);
        prop_assert!(wire.len() <= wide.len());
    }

    #[test]
    fn indefinite_input_packs_like_definite(t in arb_tree()) {
        let mut wire = Vec::new();
        write_indefinite(&mut wire, &t);
        let doc = Document::decode(&wire).unwrap();
        let expected = definite(&t);
        prop_assert_eq!(doc.as_packed(), expected.as_packed());
    }

    #[test]
    fn packed_buffers_revalidate(t in arb_tree()) {
        let doc = definite(&t);
        let again = Document::from_packed(doc.clone().into_packed()).unwrap();
        prop_assert_eq!(again, doc);
    }

    #[test]
    fn f32_values_never_need_double(x in any::<f32>()) {
        prop_assume!(!x.is_nan());
        let minimal = encode_double_minimal(f64::from(x));
        prop_assert!(!matches!(minimal, MinimalFloat::Double(_)));
        prop_assert_eq!(minimal.to_f64().to_bits(), f64::from(x).to_bits());
    }

    #[test]
    fn comparator_is_a_total_order(a in arb_tree(), b in arb_tree(), c in arb_tree()) {
        let (a, b, c) = (definite(&a), definite(&b), definite(&c));
        prop_assert_eq!(compare(&a, &a), Ordering::Equal);
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
            prop_assert_ne!(compare(&a, &c), Ordering::Greater);
        }
    }

    #[test]
    fn equal_documents_hash_equal(t in arb_tree()) {
        let mut wire = Vec::new();
        write_indefinite(&mut wire, &t);
        let a = Document::decode(&wire).unwrap();
        let b = Document::decode(&a.encode().unwrap()).unwrap();
        prop_assert_eq!(compare(&a, &b), Ordering::Equal);
        prop_assert_eq!(hash(&a), hash(&b));
    }
}
