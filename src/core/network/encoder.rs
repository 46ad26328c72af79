//! # 검출기별 인코더
//!
//! 다운 블록: conv1 → ELU → conv2 → ELU (스킵 저장) → pool

use ndarray::{Array3, ArrayView3};
use rand::Rng;

use crate::core::graph::LaplacianStack;
use crate::core::healpix::ResolutionLevel;
use crate::core::layers::{elu_inplace, ChebConv, SpherePooling};
use crate::core::systems::config::ModelConfig;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::SphereFloat;

/// 인코더 결과
#[derive(Debug, Clone)]
pub struct EncoderOutput<T: SphereFloat> {
    /// 레벨별 스킵 텐서 (가장 세밀한 레벨부터)
    pub skips: Vec<Array3<T>>,
    /// 가장 거친 레벨로 풀링된 코드
    pub code: Array3<T>,
}

#[derive(Debug, Clone)]
pub struct DownBlock<T: SphereFloat> {
    level: ResolutionLevel,
    conv1: ChebConv<T>,
    conv2: ChebConv<T>,
}

impl<T: SphereFloat> DownBlock<T> {
    pub fn level(&self) -> ResolutionLevel {
        self.level
    }

    pub fn convs(&self) -> [&ChebConv<T>; 2] {
        [&self.conv1, &self.conv2]
    }

    pub fn convs_mut(&mut self) -> [&mut ChebConv<T>; 2] {
        [&mut self.conv1, &mut self.conv2]
    }

    /// 풀링 전 활성값 [B, P, F]
    fn forward(&self, x: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let mut h = self.conv1.forward(x)?;
        elu_inplace(&mut h);
        let mut h = self.conv2.forward(h.view())?;
        elu_inplace(&mut h);
        Ok(h)
    }
}

/// 단일 채널 입력을 받는 인코더 타워
#[derive(Debug, Clone)]
pub struct Encoder<T: SphereFloat> {
    blocks: Vec<DownBlock<T>>,
    pooling: SpherePooling,
}

impl<T: SphereFloat> Encoder<T> {
    pub fn new<R: Rng + ?Sized>(
        stack: &LaplacianStack<T>,
        config: &ModelConfig,
        rng: &mut R,
    ) -> SphereResult<Self> {
        let levels = stack.levels();
        if levels.len() != config.feature_widths.len() {
            return Err(SphereError::config(format!(
                "{} Laplacian levels for {} feature widths",
                levels.len(),
                config.feature_widths.len()
            )));
        }

        let mut blocks = Vec::with_capacity(levels.len());
        let mut in_channels = 1;
        for (&level, &width) in levels.iter().zip(&config.feature_widths) {
            let laplacian = stack.operator(level)?;
            let k = config.kernel_size;
            let conv1 = ChebConv::new(laplacian.clone(), in_channels, width, k, config.use_bias, rng)?;
            let conv2 = ChebConv::new(laplacian, width, width, k, config.use_bias, rng)?;
            blocks.push(DownBlock { level, conv1, conv2 });
            in_channels = width;
        }

        Ok(Self { blocks, pooling: SpherePooling::new(config.pooling) })
    }

    pub fn blocks(&self) -> &[DownBlock<T>] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [DownBlock<T>] {
        &mut self.blocks
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.conv1.parameter_count() + b.conv2.parameter_count())
            .sum()
    }

    /// [B, P, 1] → 스킵들 + 코드
    pub fn forward(&self, x: ArrayView3<T>) -> SphereResult<EncoderOutput<T>> {
        let mut skips = Vec::with_capacity(self.blocks.len());
        let mut current = x.to_owned();
        for block in &self.blocks {
            let skip = block.forward(current.view())?;
            current = self.pooling.pool(skip.view())?;
            skips.push(skip);
        }
        Ok(EncoderOutput { skips, code: current })
    }
}
