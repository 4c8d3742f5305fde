use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use incidence::algs::random_one_to_many;
use incidence::relation::ManyToMany;

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    for &n in &[1_000usize, 10_000] {
        let rel = random_one_to_many(n, n / 4, 0.01, Some(7));
        group.bench_with_input(BenchmarkId::from_parameter(n), &rel, |b, rel| {
            b.iter(|| rel.transpose())
        });
    }
    group.finish();
}

fn bench_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("product");
    for &n in &[500usize, 5_000] {
        let a = random_one_to_many(n, n, 0.01, Some(8));
        let b_rel = random_one_to_many(n, 64, 0.05, Some(9));
        group.bench_with_input(BenchmarkId::from_parameter(n), &(a, b_rel), |b, (a, b_rel)| {
            b.iter(|| a.multiply(b_rel))
        });
    }
    group.finish();
}

fn bench_synchronize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronize");
    for &n in &[1_000usize, 10_000] {
        let rel = random_one_to_many(n, n / 4, 0.01, Some(10));
        group.bench_with_input(BenchmarkId::from_parameter(n), &rel, |b, rel| {
            b.iter(|| {
                let mut m = ManyToMany::from(rel.clone());
                m.synchronize();
                m
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transpose, bench_product, bench_synchronize);
criterion_main!(benches);
