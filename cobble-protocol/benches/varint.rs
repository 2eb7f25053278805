use cobble_protocol::types::{VarInt, MAX_VAR_INT_BYTES};
use cobble_protocol::{ProtocolRead, ProtocolWrite};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("VarInt Write");

    for input in [0, 65536, i32::MIN] {
        let id = BenchmarkId::new("write_to", format!("{input:?}"));

        group.bench_with_input(id, &input, |b, i| {
            let mut buf = [0u8; MAX_VAR_INT_BYTES];

            b.iter(|| VarInt::from(black_box(*i)).write_to(black_box(&mut &mut buf[..])))
        });
    }

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("VarInt Read");

    for input in [0, 65536, i32::MIN] {
        let id = BenchmarkId::new("read_from", format!("{input:?}"));

        let mut buf = [0u8; MAX_VAR_INT_BYTES];
        VarInt::from(input).write_to(&mut &mut buf[..]);

        group.bench_with_input(id, &buf, |b, bytes| {
            b.iter(|| VarInt::read_from(black_box(&mut &bytes[..])))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
