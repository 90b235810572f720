use sparsejoin::iterator::collect_entries;
use sparsejoin::{
    CursorIterator, DispatchConfig, Dispatcher, Matrix, MatrixKind, Order, SparseMatrixCSC, SparseMatrixCSR,
    SparseVector, Vector,
};
use tracing_subscriber::EnvFilter;

fn main() -> sparsejoin::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("sparsejoin {}", sparsejoin::VERSION);

    // Merge two sparse vectors directly
    let a = SparseVector::from_dense(&[2.0, 0.0, 5.0, 0.0, 2.0]);
    let b = SparseVector::from_dense(&[0.0, 3.0, 5.0, 0.0, 0.0]);

    println!("\nVector A: {:?}", a);
    println!("Vector B: {:?}", b);

    let mut union = a.non_zero_iter().or_else_add(b.non_zero_iter());
    println!("\nPlan: {}", union.tree().describe());
    println!("  A ∪+ B = {:?}", collect_entries(&mut union)?);

    let mut intersection = a.non_zero_iter().and_also_mul(b.non_zero_iter())?;
    println!("  A ∩* B = {:?}", collect_entries(&mut intersection)?);

    // Row-major CSR joined with column-major CSC
    let m = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 4.0]);
    let n = SparseMatrixCSC::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 2.0]);

    println!("\nMatrix M:");
    println!("{:?}", m);
    println!("\nMatrix N:");
    println!("{:?}", n);

    println!("\nRow-major merge of M and N:");
    {
        let mut merged = m.non_zero_iter(Order::RowMajor).or_else_add(n.non_zero_iter(Order::RowMajor));
        while merged.has_next() {
            merged.advance()?;
            println!("  {} = {}", merged.cell(), merged.value());
        }
    }

    // The same operation through the dispatcher, for every kind pair
    let dispatcher = Dispatcher::<Matrix<f64>>::standard(DispatchConfig::default());
    let m: Matrix<f64> = m.into();
    let n: Matrix<f64> = n.into();

    println!("\nDispatched M + N:");
    for left_kind in MatrixKind::ALL {
        for right_kind in MatrixKind::ALL {
            let left = convert(&dispatcher, &m, left_kind)?;
            let right = convert(&dispatcher, &n, right_kind)?;
            let sum = dispatcher.add(&left, &right)?;
            println!(
                "  ({}, {}) -> {} {:?}",
                left_kind,
                right_kind,
                sum.kind(),
                sum.to_dense().into_array().into_raw_vec()
            );
        }
    }

    let vectors = Dispatcher::<Vector<f64>>::standard(DispatchConfig::strict());
    println!(
        "\nStrict vector dispatcher leaves {} combinations unhandled",
        vectors.missing_combinations().len()
    );

    Ok(())
}

fn convert(dispatcher: &Dispatcher<Matrix<f64>>, matrix: &Matrix<f64>, kind: MatrixKind) -> sparsejoin::Result<Matrix<f64>> {
    let (n_rows, n_cols) = matrix.shape();
    let mut out = Matrix::blank(kind, n_rows, n_cols);
    dispatcher.copy_into(matrix, &mut out)?;
    Ok(out)
}
