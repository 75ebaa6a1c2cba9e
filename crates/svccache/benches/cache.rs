use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use svccache::{BoundedCache, IndexedSearch};
use svcstore::ServiceRecord;

fn catalog(size: usize) -> Vec<ServiceRecord> {
    (0..size)
        .map(|i| {
            ServiceRecord::new(
                format!("Service {}", i),
                format!("managed security offering number {}", i),
                ["network", "endpoint", "cloud", "identity"][i % 4],
            )
        })
        .collect()
}

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let mut cache = BoundedCache::try_new(1000).unwrap();
        for i in 0..1000u64 {
            cache.put(i, vec![b'x'; 64]);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_put_with_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_put");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_evicting", |b| {
        let mut cache = BoundedCache::try_new(100).unwrap();

        let mut counter = 0u64;
        b.iter(|| {
            // Every insert past the first 100 evicts
            black_box(cache.put(counter, counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("search_cached", |b| {
        let mut search = IndexedSearch::new(catalog(1000));
        search.search("cloud");

        b.iter(|| {
            black_box(search.search("cloud"));
        });
    });

    group.bench_function("search_scan", |b| {
        // Capacity 1 with alternating queries forces a scan every time
        let mut search = IndexedSearch::with_cache_capacity(catalog(1000), 1).unwrap();

        let mut counter = 0u64;
        b.iter(|| {
            let query = if counter % 2 == 0 { "cloud" } else { "number 9" };
            black_box(search.search(query));
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_put_with_eviction, bench_search);
criterion_main!(benches);
