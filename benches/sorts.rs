use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rosterbench::Variant;

mod support;

fn bench_sorts(c: &mut Criterion) {
    let sizes = [1_000usize, 10_000, 100_000];
    let mut group = c.benchmark_group("birthdate_sort");
    group.sample_size(support::usize_env("ROSTERBENCH_BENCH_SAMPLE_SIZE", 20));

    for &n in &sizes {
        let students = support::roster(n, 10);
        group.throughput(Throughput::Elements(n as u64));
        for variant in Variant::ALL {
            let id = format!("{variant}/{n}");
            group.bench_function(BenchmarkId::new("stable", &id), |b| {
                b.iter_batched(
                    || support::build_db(variant, &students),
                    |mut db| {
                        db.sort_by_birthdate();
                        db
                    },
                    BatchSize::LargeInput,
                );
            });
            group.bench_function(BenchmarkId::new("heap", &id), |b| {
                b.iter_batched(
                    || support::build_db(variant, &students),
                    |mut db| {
                        db.heap_sort_by_birthdate();
                        db
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sorts);
criterion_main!(benches);
