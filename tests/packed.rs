#![allow(clippy::unwrap_used, clippy::expect_used)]

use packed_cbor::{DecodeLimits, Document, ErrorCode, DEFAULT_MAX_DEPTH};

fn packed(wire: &[u8]) -> Vec<u8> {
    Document::decode(wire).unwrap().into_packed()
}

fn rejected(buf: Vec<u8>) -> (ErrorCode, usize) {
    let err = Document::from_packed(buf).unwrap_err();
    (err.code, err.offset)
}

#[test]
fn packed_layout_of_containers() {
    assert_eq!(
        packed(&[0x81, 0x01]),
        [0x10, 0, 0, 0x80, 1, 0, 0, 0, 8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        packed(&[0xc1, 0x05]),
        [0x14, 0, 0, 0xc0, 1, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0]
    );

    let mut map = vec![0x24, 0, 0, 0xa0, 1, 0, 0, 0];
    map.extend_from_slice(&[8, 0, 0, 0x60, 0x18, 0, 0, 0xe0]);
    map.extend_from_slice(&[1, 0, 0, 0, b'a', 0, 0, 0]);
    map.extend_from_slice(&[1, 21, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(packed(&[0xa1, 0x61, b'a', 0xf5]), map);
}

#[test]
fn packed_buffers_round_trip() {
    let inputs: &[&[u8]] = &[
        &[0x00],
        &[0x40],
        &[0x80],
        &[0xa0],
        &[0xbf, 0x61, b'a', 0x9f, 0x01, 0xf9, 0x7e, 0x00, 0xff, 0x61, b'b', 0xc1, 0x43, 1, 2, 3, 0xff],
        &[0x83, 0xf4, 0xf8, 0xff, 0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a],
    ];
    for input in inputs {
        let doc = Document::decode(input).unwrap();
        let again = Document::from_packed(doc.clone().into_packed()).unwrap();
        assert_eq!(again.as_packed(), doc.as_packed());
        assert_eq!(again, doc);
        assert_eq!(again.encode().unwrap(), doc.encode().unwrap());
    }
}

#[test]
fn rejects_short_and_truncated_buffers() {
    assert_eq!(rejected(Vec::new()), (ErrorCode::MalformedDocument, 0));
    assert_eq!(rejected(vec![8, 0, 0]), (ErrorCode::MalformedDocument, 0));

    let mut buf = packed(&[0x05]);
    buf.pop();
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 0));

    let mut buf = packed(&[0x05]);
    buf.push(0);
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 0));
}

#[test]
fn rejects_wrong_integer_width() {
    // Root entry claims a 4-byte unsigned.
    assert_eq!(
        rejected(vec![4, 0, 0, 0, 5, 0, 0, 0]),
        (ErrorCode::MalformedDocument, 4)
    );
}

#[test]
fn rejects_bad_string_regions() {
    let mut buf = packed(&[0x61, b'a']);
    buf[9] = 1;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 9));

    let mut buf = packed(&[0x61, b'a']);
    buf[4] = 5;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));

    let mut buf = packed(&[0x61, b'a']);
    buf[8] = 0xff;
    assert_eq!(rejected(buf), (ErrorCode::Utf8Invalid, 8));

    // Byte strings carry no UTF-8 requirement.
    let mut buf = packed(&[0x41, b'a']);
    buf[8] = 0xff;
    assert!(Document::from_packed(buf).is_ok());
}

#[test]
fn rejects_bad_scalar_slots() {
    let mut buf = packed(&[0xf5]);
    buf[4] = 2;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));

    let mut buf = packed(&[0xf5]);
    buf[19] = 1;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));

    let mut buf = packed(&[0xf9, 0x3c, 0x00]);
    buf[5] = 1;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));

    // A NaN with a payload never comes out of the decoder.
    let mut buf = packed(&[0xf9, 0x7e, 0x00]);
    buf[12] = 1;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));
}

#[test]
fn rejects_bad_entry_tables() {
    // [1]: root entry, count, one entry, one u64.
    let good = packed(&[0x81, 0x01]);
    assert_eq!(good.len(), 4 + 4 + 4 + 8);
    assert!(Document::from_packed(good.clone()).is_ok());

    let mut buf = good.clone();
    buf[8] = 9;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 8));

    let mut buf = good.clone();
    buf[8] = 4;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 12));

    // Count claims more entries than fit in the region.
    let mut buf = good;
    buf[4] = 9;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));
}

#[test]
fn rejects_truncated_tags() {
    let good = packed(&[0xc1, 0x01]);
    assert_eq!(good.len(), 4 + 12 + 8);
    let mut buf = good;
    // Child entry end points past the region.
    buf[12] = 9;
    assert_eq!(rejected(buf), (ErrorCode::MalformedDocument, 4));
}

#[test]
fn reloads_deep_documents_with_their_own_depth_limit() {
    let mut wire = vec![0x81; 1200];
    wire.push(0x00);
    let limits = DecodeLimits {
        max_depth: 2000,
        ..DecodeLimits::default()
    };
    let doc = Document::decode_with_limits(&wire, limits).unwrap();

    let err = Document::from_packed(doc.clone().into_packed()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);

    let again = Document::from_packed_with_depth(doc.clone().into_packed(), 2000).unwrap();
    assert_eq!(again.as_packed(), doc.as_packed());
    assert_eq!(
        Document::from_packed_with_depth(doc.into_packed(), 1199).unwrap_err().code,
        ErrorCode::DepthLimitExceeded
    );

    let shallow = packed(&[0x81, 0x81, 0x00]);
    assert!(Document::from_packed_with_depth(shallow.clone(), 2).is_ok());
    assert!(Document::from_packed_with_depth(shallow, DEFAULT_MAX_DEPTH).is_ok());
}
