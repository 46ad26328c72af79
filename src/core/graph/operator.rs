//! # 희소 연산자
//!
//! 스케일된 라플라시안을 런타임 정밀도로 보관하고 [B, P, C] 신호에 적용한다.

use ndarray::{Array1, Array3, ArrayView1, ArrayView3, Axis};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

/// 정방 CSR 연산자
#[derive(Debug, Clone)]
pub struct SparseOperator<T: SphereFloat> {
    matrix: CsMat<T>,
}

impl<T: SphereFloat> SparseOperator<T> {
    /// f64 CSR 행렬을 T 정밀도로 변환
    pub fn from_csr(source: &CsMat<f64>) -> SphereResult<Self> {
        let (rows, cols) = source.shape();
        if rows != cols {
            return Err(SphereError::shape(format!(
                "operator must be square, got {}x{}",
                rows, cols
            )));
        }
        let mut tri = TriMat::<T>::with_capacity((rows, cols), source.nnz());
        for (i, row) in source.outer_iterator().enumerate() {
            for (j, &v) in row.iter() {
                tri.add_triplet(i, j, scalar::<T>(v));
            }
        }
        Ok(Self { matrix: tri.to_csr() })
    }

    pub fn size(&self) -> usize {
        self.matrix.rows()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn matrix(&self) -> &CsMat<T> {
        &self.matrix
    }

    /// 화소 i 행의 (열, 값) 목록
    pub fn row_entries(&self, i: usize) -> Vec<(usize, T)> {
        match self.matrix.outer_view(i) {
            Some(row) => row.iter().map(|(j, &v)| (j, v)).collect(),
            None => Vec::new(),
        }
    }

    /// 배치 신호 [B, P, C] 에 적용: out[b] = A · x[b]
    pub fn apply(&self, x: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let (batch, pixels, channels) = x.dim();
        if pixels != self.size() {
            return Err(SphereError::shape(format!(
                "signal has {} pixels but the operator is {}x{}",
                pixels,
                self.size(),
                self.size()
            )));
        }

        let mut out = Array3::<T>::zeros((batch, pixels, channels));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(x.axis_iter(Axis(0)).into_par_iter())
            .for_each(|(mut out_b, x_b)| {
                for (i, row) in self.matrix.outer_iterator().enumerate() {
                    let mut target = out_b.row_mut(i);
                    for (j, &v) in row.iter() {
                        target.scaled_add(v, &x_b.row(j));
                    }
                }
            });
        Ok(out)
    }

    /// 단일 벡터에 적용
    pub fn apply_vec(&self, x: ArrayView1<T>) -> SphereResult<Array1<T>> {
        if x.len() != self.size() {
            return Err(SphereError::shape(format!(
                "vector has {} entries but the operator is {}x{}",
                x.len(),
                self.size(),
                self.size()
            )));
        }
        let mut y = Array1::<T>::zeros(self.size());
        for (i, row) in self.matrix.outer_iterator().enumerate() {
            let mut acc = T::zero();
            for (j, &v) in row.iter() {
                acc += v * x[j];
            }
            y[i] = acc;
        }
        Ok(y)
    }
}
