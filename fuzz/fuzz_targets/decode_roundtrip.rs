#![no_main]

use libfuzzer_sys::fuzz_target;

use packed_cbor::{hash, DecodeLimits, Document};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    // Tight enough to avoid pathological allocations while still exploring structure.
    let max = input_len.min(1 << 20);
    DecodeLimits {
        max_input_bytes: max,
        max_depth: 64,
        max_total_items: 1 << 16,
        max_array_len: 1 << 12,
        max_map_len: 1 << 12,
        max_bytes_len: max,
        max_text_len: max,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = Document::decode_with_limits(data, fuzz_limits(data.len())) else {
        return;
    };
    // Minimal re-encoding must decode back to the same packed bytes, and stay fixed after that.
    let wire = doc.encode().expect("encode");
    let again = Document::decode(&wire).expect("re-decode");
    assert_eq!(again.as_packed(), doc.as_packed());
    assert_eq!(again.encode().expect("re-encode"), wire);
    assert_eq!(hash(&again), hash(&doc));

    let _ = doc.to_diagnostic();
    let reloaded = Document::from_packed(doc.clone().into_packed()).expect("revalidate");
    assert_eq!(reloaded, doc);
});
