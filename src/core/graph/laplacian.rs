//! # 그래프 라플라시안
//!
//! 조합형 L = D − W, 정규화형 L = I − D^{-1/2} W D^{-1/2}

use log::debug;
use sprs::{CsMat, TriMat};

use super::builder::{row_sums, SphereGraph};
use crate::core::healpix::ResolutionLevel;
use crate::core::systems::config::LaplacianKind;
use crate::core::systems::errors::{SphereError, SphereResult};

/// 희소 라플라시안
#[derive(Debug, Clone)]
pub struct Laplacian {
    kind: LaplacianKind,
    matrix: CsMat<f64>,
    level: Option<ResolutionLevel>,
}

impl Laplacian {
    pub fn kind(&self) -> LaplacianKind {
        self.kind
    }

    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// 그래프에서 만들어진 경우 해당 레벨
    pub fn level(&self) -> Option<ResolutionLevel> {
        self.level
    }

    pub fn size(&self) -> usize {
        self.matrix.rows()
    }
}

/// 인접 행렬 → 라플라시안 변환기
pub struct LaplacianBuilder;

impl LaplacianBuilder {
    /// 그래프로부터 라플라시안 생성
    pub fn from_graph(graph: &SphereGraph, kind: LaplacianKind) -> SphereResult<Laplacian> {
        let mut laplacian = Self::build(graph.weights(), kind)?;
        laplacian.level = Some(graph.level());
        Ok(laplacian)
    }

    /// 정방 CSR 인접 행렬만 받는다
    pub fn build(adjacency: &CsMat<f64>, kind: LaplacianKind) -> SphereResult<Laplacian> {
        let (rows, cols) = adjacency.shape();
        if rows != cols {
            return Err(SphereError::shape(format!(
                "adjacency must be square, got {}x{}",
                rows, cols
            )));
        }
        if !adjacency.is_csr() {
            return Err(SphereError::shape("adjacency must be stored in CSR order"));
        }

        let degrees = row_sums(adjacency);
        // 차수 0 (고립 화소)은 역제곱근을 0 으로 둔다
        let inv_sqrt: Vec<f64> = degrees
            .iter()
            .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
            .collect();

        let mut tri = TriMat::<f64>::with_capacity((rows, rows), adjacency.nnz() + rows);
        for (i, row) in adjacency.outer_iterator().enumerate() {
            let mut self_weight = 0.0;
            for (j, &w) in row.iter() {
                if j == i {
                    self_weight += w;
                    continue;
                }
                let value = match kind {
                    LaplacianKind::Combinatorial => -w,
                    LaplacianKind::Normalized => -w * inv_sqrt[i] * inv_sqrt[j],
                };
                tri.add_triplet(i, j, value);
            }
            let diagonal = match kind {
                LaplacianKind::Combinatorial => degrees[i] - self_weight,
                LaplacianKind::Normalized => 1.0 - self_weight * inv_sqrt[i] * inv_sqrt[i],
            };
            tri.add_triplet(i, i, diagonal);
        }
        let matrix: CsMat<f64> = tri.to_csr();

        debug!("{:?} 라플라시안: {}x{}, nnz={}", kind, rows, rows, matrix.nnz());
        Ok(Laplacian { kind, matrix, level: None })
    }
}
