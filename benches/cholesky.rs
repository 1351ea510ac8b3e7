use criterion::black_box;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use gpcomp::linalg::{cholesky_decomposition, Cholesky, Matrix};

/// Tridiagonal SPD matrix with 2 on the diagonal and -1 beside it
fn laplacian(n: usize) -> Matrix {
    Matrix::from_fn(n, n, |i, j| {
        if i == j {
            2.0
        } else if i.abs_diff(j) == 1 {
            -1.0
        } else {
            0.0
        }
    })
}

fn bench_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cholesky decomposition");
    for n in [10, 50, 100, 200] {
        let a = laplacian(n);
        group.bench_function(format!("{} dims", n), |b| {
            b.iter(|| black_box(cholesky_decomposition(&a)))
        });
    }
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cholesky solve");
    for n in [10, 50, 100, 200] {
        let chol = Cholesky::new(&laplacian(n)).unwrap();
        let y = vec![1.0; n];
        group.bench_function(format!("{} dims", n), |b| {
            b.iter(|| black_box(chol.solve(&y)))
        });
    }
}

criterion_group!(cholesky_benches, bench_decomposition, bench_solve);
criterion_main!(cholesky_benches);
