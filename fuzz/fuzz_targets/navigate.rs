#![no_main]

use libfuzzer_sys::fuzz_target;

use packed_cbor::{DecodeLimits, Document};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (path, wire) = rest.split_at(usize::from(split).min(rest.len()));
    let Ok(doc) = Document::decode_with_limits(wire, DecodeLimits::for_bytes(wire.len())) else {
        return;
    };
    let tokens: Vec<String> = String::from_utf8_lossy(path)
        .split('/')
        .map(str::to_owned)
        .collect();

    match doc.extract_path(&tokens) {
        Ok(Some(sub)) => {
            let _ = sub.encode().expect("encode");
        }
        Ok(None) => {}
        Err(err) => assert!(err.is_invalid_operation()),
    }
    if let Some(first) = tokens.first() {
        let _ = doc.object_field(first);
        let _ = doc.exists_any(&tokens);
    }
    let _ = doc.array_element(usize::from(split));
});
