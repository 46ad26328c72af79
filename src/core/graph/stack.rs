//! # 레벨별 라플라시안 묶음
//!
//! 모델 생성 시 한 번 계산되어 모든 순전파에서 읽기 전용으로 공유된다.

use std::sync::Arc;

use log::info;
use rayon::prelude::*;

use super::builder::GraphBuilder;
use super::laplacian::LaplacianBuilder;
use super::operator::SparseOperator;
use super::spectral::{SpectralEstimate, SpectralNormalizer};
use crate::core::healpix::ResolutionLevel;
use crate::core::systems::config::LaplacianKind;
use crate::core::systems::errors::{NumericalWarning, SphereError, SphereResult};
use crate::core::types::SphereFloat;

/// 한 레벨의 준비된 연산자
#[derive(Debug, Clone)]
pub struct LevelOperator<T: SphereFloat> {
    pub level: ResolutionLevel,
    pub operator: Arc<SparseOperator<T>>,
    pub estimate: SpectralEstimate,
}

#[derive(Debug, Clone)]
pub struct LaplacianStack<T: SphereFloat> {
    kind: LaplacianKind,
    entries: Vec<LevelOperator<T>>,
    warnings: Vec<NumericalWarning>,
}

impl<T: SphereFloat> LaplacianStack<T> {
    /// 주어진 레벨마다 그래프 → 라플라시안 → 스케일 → 연산자
    pub fn build(
        levels: &[ResolutionLevel],
        kind: LaplacianKind,
        normalizer: &SpectralNormalizer,
    ) -> SphereResult<Self> {
        let prepared = levels
            .par_iter()
            .map(|&level| -> SphereResult<(LevelOperator<T>, Vec<NumericalWarning>)> {
                let graph = GraphBuilder::new(level).build()?;
                let laplacian = LaplacianBuilder::from_graph(&graph, kind)?;
                let scaled = normalizer.normalize(&laplacian)?;
                let operator = Arc::new(scaled.to_operator::<T>()?);
                Ok((
                    LevelOperator { level, operator, estimate: *scaled.estimate() },
                    scaled.warnings().to_vec(),
                ))
            })
            .collect::<SphereResult<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(prepared.len());
        let mut warnings = Vec::new();
        for (entry, level_warnings) in prepared {
            info!(
                "라플라시안 준비: {} λmax={:.5} ({} 단계)",
                entry.level, entry.estimate.lambda_max, entry.estimate.iterations
            );
            entries.push(entry);
            warnings.extend(level_warnings);
        }

        Ok(Self { kind, entries, warnings })
    }

    pub fn kind(&self) -> LaplacianKind {
        self.kind
    }

    pub fn levels(&self) -> Vec<ResolutionLevel> {
        self.entries.iter().map(|e| e.level).collect()
    }

    pub fn entries(&self) -> &[LevelOperator<T>] {
        &self.entries
    }

    pub fn warnings(&self) -> &[NumericalWarning] {
        &self.warnings
    }

    /// 레벨의 공유 연산자
    pub fn operator(&self, level: ResolutionLevel) -> SphereResult<Arc<SparseOperator<T>>> {
        self.entries
            .iter()
            .find(|e| e.level == level)
            .map(|e| Arc::clone(&e.operator))
            .ok_or_else(|| SphereError::config(format!("no Laplacian prepared for {}", level)))
    }
}
