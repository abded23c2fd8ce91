use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use eth_wire::core::rlp;
use eth_wire::core::value::Value;

fn nested_value(width: usize, depth: usize, leaf_size: usize) -> Value {
    if depth == 0 {
        return Value::bytes(vec![0xab; leaf_size]);
    }
    Value::list((0..width).map(|_| nested_value(width, depth - 1, leaf_size)).collect())
}

#[allow(clippy::unwrap_used)]
fn bench_value_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_encode_decode");
    let shapes = [("flat", 256usize, 1usize, 32usize), ("tree", 4, 5, 32), ("blob", 1, 1, 1024 * 1024)];

    for (name, width, depth, leaf_size) in shapes {
        let value = nested_value(width, depth, leaf_size);
        let encoded = value.to_bytes();
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_function(format!("encode_{name}"), |b| {
            b.iter_batched(
                || value.clone(),
                |value| value.to_bytes(),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{name}"), |b| {
            b.iter(|| rlp::decode_exact::<Value>(&encoded).unwrap())
        });
        group.bench_function(format!("span_{name}"), |b| {
            b.iter(|| rlp::item_span(&encoded).unwrap())
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_integers(c: &mut Criterion) {
    let mut group = c.benchmark_group("integers");
    let numbers: Vec<u64> = (0..1024u64).map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15)).collect();
    let encoded = rlp::encode(&numbers).unwrap();

    group.bench_function("encode_u64_list", |b| b.iter(|| rlp::encode(&numbers).unwrap()));
    group.bench_function("decode_u64_list", |b| {
        b.iter(|| rlp::decode_exact::<Vec<u64>>(&encoded).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_value_encode_decode, bench_integers);
criterion_main!(benches);
