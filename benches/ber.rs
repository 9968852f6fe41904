//! Codec benchmarks: message marshal and unmarshal.

use bytes::Bytes;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use snmp_client::{CommunityMessage, Oid, Pdu, Value, VarBind};

fn sample_response() -> CommunityMessage {
    let varbinds: Vec<VarBind> = (1..=10u64)
        .map(|i| {
            VarBind::new(
                Oid::new([1, 3, 6, 1, 2, 1, 2, 2, 1, 2, i]),
                Value::OctetString(Bytes::from(format!("eth{}", i))),
            )
        })
        .collect();

    CommunityMessage::v2c(b"public".as_slice(), Pdu::response(42, varbinds))
}

fn bench_encode(c: &mut Criterion) {
    let msg = sample_response();
    c.bench_function("encode_response_10_varbinds", |b| {
        b.iter(|| black_box(&msg).encode().unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = sample_response().encode().unwrap();
    c.bench_function("decode_response_10_varbinds", |b| {
        b.iter(|| CommunityMessage::decode(black_box(bytes.clone())).unwrap())
    });
}

fn bench_oid(c: &mut Criterion) {
    let oid = Oid::new([1, 3, 6, 1, 4, 1, 2021, 10, 1, 3, 1]);
    c.bench_function("oid_to_ber", |b| b.iter(|| black_box(&oid).to_ber()));

    let ber = oid.to_ber();
    c.bench_function("oid_from_ber", |b| {
        b.iter(|| Oid::from_ber(black_box(&ber)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_oid);
criterion_main!(benches);
