//! Benchmarks for the merge-join engine against a plain dense loop
//!
//! Run with: cargo bench --bench merge_join

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sparsejoin::iterator::collect_entries;
use sparsejoin::{DispatchConfig, Dispatcher, Matrix, Order, SparseMatrixCSR, SparseVector};
use std::hint::black_box;

/// Banded matrix with `nnz_per_row` entries per row, shifted by `offset`
fn banded_csr(n: usize, nnz_per_row: usize, offset: usize) -> SparseMatrixCSR<f64> {
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::with_capacity(n * nnz_per_row);
    let mut values = Vec::with_capacity(n * nnz_per_row);

    row_ptr.push(0);
    for i in 0..n {
        let mut cols: Vec<usize> = (0..nnz_per_row).map(|k| (i + offset + k * 7) % n).collect();
        cols.sort_unstable();
        cols.dedup();
        for col in cols {
            col_idx.push(col);
            values.push((col % 5 + 1) as f64);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

fn strided_vector(len: usize, stride: usize, offset: usize) -> SparseVector<f64> {
    let dense: Vec<f64> = (0..len)
        .map(|i| if (i + offset) % stride == 0 { 1.0 } else { 0.0 })
        .collect();
    SparseVector::from_dense(&dense)
}

fn bench_vector_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_union");

    for len in [1_000usize, 100_000] {
        let a = strided_vector(len, 10, 0);
        let b = strided_vector(len, 15, 3);
        let (dense_a, dense_b) = (a.to_dense(), b.to_dense());

        group.bench_with_input(BenchmarkId::new("merge_join", len), &len, |bench, _| {
            bench.iter(|| {
                let mut merged = a.non_zero_iter().or_else_add(b.non_zero_iter());
                black_box(collect_entries(&mut merged).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("dense_loop", len), &len, |bench, _| {
            bench.iter(|| {
                let sum: Vec<f64> = dense_a.iter().zip(&dense_b).map(|(x, y)| x + y).collect();
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_matrix_dispatch(c: &mut Criterion) {
    let dispatcher = Dispatcher::standard(DispatchConfig::default());
    let mut group = c.benchmark_group("matrix_add");
    group.sample_size(20);

    for n in [200usize, 1_000] {
        let a = banded_csr(n, 8, 0);
        let b = banded_csr(n, 8, 3);

        let csr_csr = (Matrix::from(a.clone()), Matrix::from(b.clone()));
        let csr_csc = (Matrix::from(a.clone()), Matrix::from(b.to_csc()));
        let dense_dense = (Matrix::from(a.to_dense()), Matrix::from(b.to_dense()));

        for (label, (left, right)) in [("csr+csr", &csr_csr), ("csr+csc", &csr_csc), ("dense+dense", &dense_dense)] {
            group.bench_with_input(BenchmarkId::new(label, n), &n, |bench, _| {
                bench.iter(|| black_box(dispatcher.add(left, right).unwrap()))
            });
        }

        group.bench_with_input(BenchmarkId::new("mixed_order_cursor", n), &n, |bench, _| {
            let csc = b.to_csc();
            bench.iter(|| {
                let mut merged = a
                    .non_zero_iter(Order::RowMajor)
                    .or_else_add(csc.non_zero_iter(Order::RowMajor));
                black_box(collect_entries(&mut merged).unwrap().len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vector_union, bench_matrix_dispatch);
criterion_main!(benches);
