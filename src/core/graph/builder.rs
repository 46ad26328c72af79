//! # 구면 이웃 그래프 생성기
//!
//! 화소 중심 좌표와 HEALPix 8-이웃으로 희소 대칭 가중 인접 행렬을 만든다.
//! 가중치: w_ij = exp(-d²/(4·h)), h 는 해상도별 최적 커널 폭

use std::collections::BTreeMap;

use log::{debug, info};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use crate::core::healpix::{
    all_pixel_vectors, neighbours, squared_distance, ResolutionLevel, NO_NEIGHBOUR,
};
use crate::core::systems::errors::{SphereError, SphereResult};

/// 8-이웃 그래프용 최적 커널 폭
///
/// nside 32~2048 은 표값, 그보다 거친 레벨은 0.025·32/nside 로 외삽,
/// 더 세밀한 레벨은 0.8/nside 로 외삽한다.
pub fn kernel_width(level: ResolutionLevel) -> f64 {
    match level.nside() {
        n if n <= 32 => 0.025 * 32.0 / n as f64,
        64 => 0.01228,
        128 => 0.00614,
        256 => 0.00307,
        512 => 0.00154,
        1024 => 0.00077,
        2048 => 0.00038,
        n => 0.8 / n as f64,
    }
}

/// 한 해상도 레벨의 가중 이웃 그래프
#[derive(Debug, Clone)]
pub struct SphereGraph {
    level: ResolutionLevel,
    weights: CsMat<f64>,
    coords: Vec<[f64; 3]>,
    kernel_width: f64,
}

impl SphereGraph {
    pub fn level(&self) -> ResolutionLevel {
        self.level
    }

    /// CSR 인접 행렬 W
    pub fn weights(&self) -> &CsMat<f64> {
        &self.weights
    }

    /// 화소 중심 단위 벡터 (중첩 순서)
    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    pub fn kernel_width(&self) -> f64 {
        self.kernel_width
    }

    pub fn npix(&self) -> usize {
        self.weights.rows()
    }

    /// 방향 간선 수 (대칭이므로 무향 간선 수의 2배)
    pub fn nnz(&self) -> usize {
        self.weights.nnz()
    }

    /// 차수 벡터 d = rowsum(W)
    pub fn degrees(&self) -> Vec<f64> {
        row_sums(&self.weights)
    }

    /// 화소의 그래프 이웃 (오름차순)
    pub fn neighbours_of(&self, pix: usize) -> Vec<usize> {
        match self.weights.outer_view(pix) {
            Some(row) => row.iter().map(|(j, _)| j).collect(),
            None => Vec::new(),
        }
    }

    /// w_ij (간선이 없으면 0)
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights.get(i, j).copied().unwrap_or(0.0)
    }
}

/// CSR 행렬의 행 합
pub(crate) fn row_sums(matrix: &CsMat<f64>) -> Vec<f64> {
    matrix
        .outer_iterator()
        .map(|row| row.iter().map(|(_, &v)| v).sum())
        .collect()
}

/// 그래프 생성기
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    level: ResolutionLevel,
    kernel_width: Option<f64>,
}

impl GraphBuilder {
    pub fn new(level: ResolutionLevel) -> Self {
        Self { level, kernel_width: None }
    }

    /// nside 로 생성 (2의 거듭제곱이 아니면 구성 오류)
    pub fn for_nside(nside: u32) -> SphereResult<Self> {
        Ok(Self::new(ResolutionLevel::new(nside)?))
    }

    /// 커널 폭 직접 지정
    pub fn with_kernel_width(mut self, width: f64) -> SphereResult<Self> {
        if !(width > 0.0) || !width.is_finite() {
            return Err(SphereError::config(format!("kernel width must be positive, got {}", width)));
        }
        self.kernel_width = Some(width);
        Ok(self)
    }

    pub fn build(&self) -> SphereResult<SphereGraph> {
        let level = self.level;
        let npix = level.npix();
        let h = self.kernel_width.unwrap_or_else(|| kernel_width(level));
        let coords = all_pixel_vectors(level)?;

        // 화소별 유효 이웃과 가중치 (-1 표식과 중복은 제외)
        let rows: Vec<Vec<(usize, f64)>> = (0..npix)
            .into_par_iter()
            .map(|pix| -> SphereResult<Vec<(usize, f64)>> {
                let nbrs = neighbours(level, pix as u64)?;
                let mut row: Vec<(usize, f64)> = Vec::with_capacity(8);
                for &n in nbrs.iter() {
                    if n == NO_NEIGHBOUR {
                        continue;
                    }
                    let j = n as usize;
                    if j == pix || row.iter().any(|&(k, _)| k == j) {
                        continue;
                    }
                    let d2 = squared_distance(&coords[pix], &coords[j]);
                    row.push((j, (-d2 / (4.0 * h)).exp()));
                }
                Ok(row)
            })
            .collect::<SphereResult<Vec<_>>>()?;

        // 양방향으로 넣어 대칭을 보장
        let mut edges: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            for &(j, w) in row {
                edges.insert((i, j), w);
                edges.insert((j, i), w);
            }
        }

        let mut tri = TriMat::<f64>::with_capacity((npix, npix), edges.len());
        for (&(i, j), &w) in &edges {
            tri.add_triplet(i, j, w);
        }
        let weights: CsMat<f64> = tri.to_csr();

        info!(
            "그래프 생성 완료: {} ({} 화소, {} 간선, h={:.5})",
            level,
            npix,
            weights.nnz() / 2,
            h
        );
        debug!("평균 차수: {:.3}", weights.nnz() as f64 / npix as f64);

        Ok(SphereGraph { level, weights, coords, kernel_width: h })
    }
}
