use bucketmap::HashTable;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Number of result slots offered to each `get`, as in the stress driver
const NUM_VALS: usize = 10;

fn random_pairs(count: usize) -> Vec<(i32, i32)> {
    let mut rng = StdRng::seed_from_u64(2);
    (0..count).map(|_| (rng.gen(), rng.gen())).collect()
}

fn filled_table(pairs: &[(i32, i32)]) -> HashTable {
    let mut table = HashTable::new(pairs.len()).expect("allocating bench table");
    for &(key, value) in pairs {
        table.put(key, value).expect("inserting bench pair");
    }
    table
}

fn table_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("table");
    for size in [1_000, 100_000, 1_000_000].iter() {
        let pairs = random_pairs(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("put", size), &pairs, |b, pairs| {
            b.iter(|| filled_table(pairs))
        });

        let table = filled_table(&pairs);
        group.bench_with_input(BenchmarkId::new("get", size), &pairs, |b, pairs| {
            let mut vals = [0; NUM_VALS];
            b.iter(|| {
                pairs
                    .iter()
                    .map(|&(key, _)| table.get(key, &mut vals))
                    .sum::<usize>()
            })
        });

        group.bench_with_input(BenchmarkId::new("erase", size), &pairs, |b, pairs| {
            b.iter_batched(
                || filled_table(pairs),
                |mut table| {
                    for &(key, _) in pairs {
                        table.erase(key);
                    }
                    table
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, table_bench);
criterion_main!(benches);
