#![allow(clippy::unwrap_used, clippy::expect_used)]

use packed_cbor::Document;

fn render(bytes: &[u8]) -> String {
    Document::decode(bytes).unwrap().to_diagnostic()
}

#[test]
fn renders_integers() {
    assert_eq!(render(&[0x00]), "0");
    assert_eq!(render(&[0x20]), "-1");
    assert_eq!(render(&[0x38, 0x63]), "-100");
    assert_eq!(
        render(&[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        "18446744073709551615"
    );
    assert_eq!(
        render(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        "-18446744073709551616"
    );
    assert_eq!(
        render(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]),
        "-18446744073709551615"
    );
}

#[test]
fn renders_strings() {
    assert_eq!(render(&[0x61, b'a']), "\"a\"");
    assert_eq!(render(&[0x44, 0x01, 0x02, 0x03, 0x04]), "h'01020304'");
    assert_eq!(render(&[0x42, 0xab, 0xff]), "h'abff'");
    assert_eq!(render(&[0x40]), "h''");
    assert_eq!(render(&[0x62, 0xc3, 0xbc]), "\"\u{fc}\"");
}

#[test]
fn escapes_text() {
    let text = "q\"b\\s\u{8}f\u{c}n\nr\rt\t";
    let mut wire = vec![0x60 | u8::try_from(text.len()).unwrap()];
    wire.extend_from_slice(text.as_bytes());
    assert_eq!(render(&wire), r#""q\"b\\s\bf\fn\nr\rt\t""#);
}

#[test]
fn renders_containers_in_stored_order() {
    assert_eq!(render(&[0x80]), "[]");
    assert_eq!(render(&[0xa0]), "{}");
    assert_eq!(render(&[0x83, 0x01, 0x02, 0x03]), "[1, 2, 3]");
    assert_eq!(
        render(&[0xa2, 0x61, b'b', 0x01, 0x01, 0x82, 0x02, 0x03]),
        r#"{"b": 1, 1: [2, 3]}"#
    );
    assert_eq!(
        render(&[0x82, 0x61, b'a', 0xa1, 0x61, b'b', 0x61, b'c']),
        r#"["a", {"b": "c"}]"#
    );
}

#[test]
fn renders_tags() {
    assert_eq!(render(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]), "1(1363896240)");
    assert_eq!(
        render(&[0xd8, 0x20, 0x63, b'a', b'/', b'b']),
        "32(\"a/b\")"
    );
    assert_eq!(render(&[0xc2, 0xc3, 0x80]), "2(3([]))");
}

#[test]
fn renders_floats_distinctly_from_integers() {
    assert_eq!(render(&[0xf9, 0x3c, 0x00]), "1.0");
    assert_eq!(render(&[0xf9, 0x3e, 0x00]), "1.5");
    assert_eq!(render(&[0xf9, 0x80, 0x00]), "-0.0");
    assert_eq!(render(&[0xfa, 0x47, 0xc3, 0x50, 0x00]), "100000.0");
    assert_eq!(
        render(&[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]),
        "1.1"
    );
    assert_eq!(
        render(&[0xfb, 0x7e, 0x37, 0xe4, 0x3c, 0x88, 0x00, 0x75, 0x9c]),
        "1e300"
    );
}

#[test]
fn renders_non_finite_floats() {
    assert_eq!(render(&[0xf9, 0x7e, 0x00]), "NaN");
    assert_eq!(render(&[0xf9, 0x7c, 0x00]), "Infinity");
    assert_eq!(render(&[0xf9, 0xfc, 0x00]), "-Infinity");
}

#[test]
fn renders_simple_values() {
    assert_eq!(render(&[0xf4]), "false");
    assert_eq!(render(&[0xf5]), "true");
    assert_eq!(render(&[0xf6]), "null");
    assert_eq!(render(&[0xf7]), "undefined");
    assert_eq!(render(&[0xf0]), "simple(16)");
    assert_eq!(render(&[0xf8, 0xff]), "simple(255)");
}

#[test]
fn display_and_debug_agree_with_diagnostic() {
    let doc = Document::decode(&[0x82, 0xf5, 0x61, b'x']).unwrap();
    assert_eq!(doc.to_string(), doc.to_diagnostic());
    assert_eq!(format!("{doc:?}"), "Document([true, \"x\"])");
    assert_eq!(format!("{:?}", doc.root()), "[true, \"x\"]");
}
