#![allow(clippy::unwrap_used, clippy::expect_used)]

use packed_cbor::Document;

fn reencode(bytes: &[u8]) -> Vec<u8> {
    Document::decode(bytes).unwrap().encode().unwrap()
}

fn assert_minimal(input: &[u8], expected: &[u8]) {
    assert_eq!(reencode(input), expected, "input {input:02x?}");
}

#[test]
fn integers_use_narrowest_width() {
    assert_minimal(&[0x00], &[0x00]);
    assert_minimal(&[0x18, 0x17], &[0x17]);
    assert_minimal(&[0x18, 0x18], &[0x18, 0x18]);
    assert_minimal(&[0x1b, 0, 0, 0, 0, 0, 0, 0x01, 0x00], &[0x19, 0x01, 0x00]);
    assert_minimal(&[0x1a, 0, 0x01, 0, 0], &[0x1a, 0, 0x01, 0, 0]);
    assert_minimal(
        &[0x1b, 0, 0, 0, 0x01, 0, 0, 0, 0],
        &[0x1b, 0, 0, 0, 0x01, 0, 0, 0, 0],
    );
    assert_minimal(&[0x39, 0x00, 0x00], &[0x20]);
    assert_minimal(&[0x38, 0x63], &[0x38, 0x63]);
    assert_minimal(
        &[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        &[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
    );
}

#[test]
fn indefinite_forms_become_definite() {
    assert_minimal(&[0x9f, 0x01, 0x02, 0xff], &[0x82, 0x01, 0x02]);
    assert_minimal(&[0x9f, 0xff], &[0x80]);
    assert_minimal(&[0xbf, 0x61, b'a', 0x01, 0xff], &[0xa1, 0x61, b'a', 0x01]);
    assert_minimal(
        &[0x7f, 0x61, b'a', 0x61, b'b', 0xff],
        &[0x62, b'a', b'b'],
    );
    assert_minimal(&[0x5f, 0xff], &[0x40]);
    assert_minimal(
        &[0x9f, 0x5f, 0x41, 0x01, 0xff, 0xbf, 0xff, 0xff],
        &[0x82, 0x41, 0x01, 0xa0],
    );
}

#[test]
fn string_lengths_use_narrowest_width() {
    let mut long = vec![0x79, 0x00, 0x18];
    long.extend(std::iter::repeat(b'x').take(24));
    let mut expected = vec![0x78, 0x18];
    expected.extend(std::iter::repeat(b'x').take(24));
    assert_minimal(&long, &expected);
}

#[test]
fn floats_use_narrowest_exact_width() {
    // RFC 8949 appendix A.
    assert_minimal(&[0xfb, 0, 0, 0, 0, 0, 0, 0, 0], &[0xf9, 0x00, 0x00]);
    assert_minimal(&[0xfb, 0x80, 0, 0, 0, 0, 0, 0, 0], &[0xf9, 0x80, 0x00]);
    assert_minimal(&[0xfb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0], &[0xf9, 0x3c, 0x00]);
    assert_minimal(
        &[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a],
        &[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a],
    );
    assert_minimal(&[0xfa, 0x3f, 0xc0, 0, 0], &[0xf9, 0x3e, 0x00]);
    assert_minimal(&[0xfa, 0x47, 0x7f, 0xe0, 0x00], &[0xf9, 0x7b, 0xff]);
    assert_minimal(&[0xfa, 0x47, 0xc3, 0x50, 0x00], &[0xfa, 0x47, 0xc3, 0x50, 0x00]);
    assert_minimal(&[0xfa, 0x7f, 0x7f, 0xff, 0xff], &[0xfa, 0x7f, 0x7f, 0xff, 0xff]);
    assert_minimal(
        &[0xfb, 0x7e, 0x37, 0xe4, 0x3c, 0x88, 0x00, 0x75, 0x9c],
        &[0xfb, 0x7e, 0x37, 0xe4, 0x3c, 0x88, 0x00, 0x75, 0x9c],
    );
    assert_minimal(&[0xf9, 0x00, 0x01], &[0xf9, 0x00, 0x01]);
    assert_minimal(&[0xf9, 0x04, 0x00], &[0xf9, 0x04, 0x00]);
    assert_minimal(&[0xfb, 0xc0, 0x10, 0, 0, 0, 0, 0, 0], &[0xf9, 0xc4, 0x00]);
    assert_minimal(
        &[0xfb, 0xc0, 0x10, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66],
        &[0xfb, 0xc0, 0x10, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66],
    );
}

#[test]
fn non_finite_floats_encode_as_half() {
    assert_minimal(&[0xfb, 0x7f, 0xf0, 0, 0, 0, 0, 0, 0], &[0xf9, 0x7c, 0x00]);
    assert_minimal(&[0xfa, 0xff, 0x80, 0, 0], &[0xf9, 0xfc, 0x00]);
    assert_minimal(&[0xfb, 0x7f, 0xf8, 0, 0, 0, 0, 0, 0x2a], &[0xf9, 0x7e, 0x00]);
}

#[test]
fn simple_values_and_tags_round_trip() {
    assert_minimal(&[0xf4], &[0xf4]);
    assert_minimal(&[0xf7], &[0xf7]);
    assert_minimal(&[0xf8, 0x10], &[0xf0]);
    assert_minimal(&[0xf8, 0xff], &[0xf8, 0xff]);
    assert_minimal(
        &[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0],
        &[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0],
    );
    assert_minimal(&[0xd8, 0x20, 0x61, b'u'], &[0xd8, 0x20, 0x61, b'u']);
}

#[test]
fn canonical_form_is_idempotent() {
    let inputs: &[&[u8]] = &[
        &[0xbf, 0x61, b'a', 0x9f, 0x01, 0xfa, 0x3f, 0xc0, 0, 0, 0xff, 0xff],
        &[0x7f, 0x61, b'a', 0x60, 0xff],
        &[0xc2, 0x5f, 0x41, 0x01, 0xff],
        &[0x83, 0xf5, 0xf6, 0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
    ];
    for input in inputs {
        let first = Document::decode(input).unwrap();
        let wire = first.encode().unwrap();
        let second = Document::decode(&wire).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_packed(), second.as_packed());
        assert_eq!(second.encode().unwrap(), wire);
    }
}

#[cfg(feature = "sha2")]
#[test]
fn sha256_covers_the_minimal_encoding() {
    let a = Document::decode(&[0x9f, 0x01, 0x02, 0xff]).unwrap();
    let b = Document::decode(&[0x82, 0x01, 0x02]).unwrap();
    assert_eq!(a.sha256().unwrap(), b.sha256().unwrap());
    let c = Document::decode(&[0x82, 0x01, 0x03]).unwrap();
    assert_ne!(a.sha256().unwrap(), c.sha256().unwrap());
}
