#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use packed_cbor::{hash, Document};

fn sample_small() -> Vec<u8> {
    vec![0xa1, 0x61, 0x61, 0x01] // {"a":1}
}

fn sample_medium() -> Vec<u8> {
    let doc = Document::build(|b| {
        b.map(|m| {
            for i in 0..64_i64 {
                m.text(&format!("k{i:03}"))?;
                m.array(|a| {
                    a.int(i - 32)?;
                    a.float(f64::from(i32::try_from(i).unwrap()) * 0.5)?;
                    a.bool(i % 2 == 0)
                })?;
            }
            Ok(())
        })
    })
    .unwrap();
    doc.encode().unwrap()
}

fn bench_codec(c: &mut Criterion) {
    let small = sample_small();
    c.bench_function("decode_small", |b| {
        b.iter(|| black_box(Document::decode(black_box(&small)).unwrap()))
    });

    let medium = sample_medium();
    c.bench_function("decode_medium", |b| {
        b.iter(|| black_box(Document::decode(black_box(&medium)).unwrap()))
    });

    let doc = Document::decode(&medium).unwrap();
    c.bench_function("encode_medium", |b| {
        b.iter(|| black_box(doc.encode().unwrap()))
    });

    c.bench_function("hash_medium", |b| b.iter(|| black_box(hash(black_box(&doc)))));

    c.bench_function("object_field_last_key", |b| {
        b.iter(|| black_box(doc.object_field(black_box("k063")).unwrap()))
    });

    let packed = doc.as_packed().to_vec();
    c.bench_function("from_packed_medium", |b| {
        b.iter(|| black_box(Document::from_packed(black_box(packed.clone())).unwrap()))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
