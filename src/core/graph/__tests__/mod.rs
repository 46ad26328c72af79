
use nalgebra::DMatrix;
use sprs::CsMat;

/// 작은 희소 행렬을 고유값 검증용 밀집 행렬로 변환
pub(crate) fn dense(matrix: &CsMat<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::<f64>::zeros(matrix.rows(), matrix.cols());
    for (i, row) in matrix.outer_iterator().enumerate() {
        for (j, &v) in row.iter() {
            out[(i, j)] += v;
        }
    }
    out
}

pub(crate) fn eigenvalues(matrix: &CsMat<f64>) -> Vec<f64> {
    let eig = nalgebra::SymmetricEigen::new(dense(matrix));
    let mut values: Vec<f64> = eig.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    values
}
