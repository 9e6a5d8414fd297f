#![no_main]

use libfuzzer_sys::fuzz_target;

use packed_cbor::Document;

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = Document::from_packed(data.to_vec()) {
        // Anything that validates must be safe to walk, render and encode.
        let _ = doc.to_diagnostic();
        let wire = doc.encode().expect("encode");
        let again = Document::decode(&wire).expect("re-decode");
        assert_eq!(again, doc);
    }
});
