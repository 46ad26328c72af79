//! # 디코더
//!
//! 업 블록: unpool → conv1 → (+ 융합 스킵) → ELU → conv2 → ELU
//! 가장 거친 레벨부터 입력 해상도까지 올라간다.

use ndarray::{Array3, ArrayView3};
use rand::Rng;

use crate::core::graph::LaplacianStack;
use crate::core::healpix::ResolutionLevel;
use crate::core::layers::{elu_inplace, ChebConv, SpherePooling};
use crate::core::systems::config::ModelConfig;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::SphereFloat;

#[derive(Debug, Clone)]
pub struct UpBlock<T: SphereFloat> {
    level: ResolutionLevel,
    conv1: ChebConv<T>,
    conv2: ChebConv<T>,
}

impl<T: SphereFloat> UpBlock<T> {
    pub fn level(&self) -> ResolutionLevel {
        self.level
    }

    pub fn convs(&self) -> [&ChebConv<T>; 2] {
        [&self.conv1, &self.conv2]
    }

    pub fn convs_mut(&mut self) -> [&mut ChebConv<T>; 2] {
        [&mut self.conv1, &mut self.conv2]
    }
}

#[derive(Debug, Clone)]
pub struct Decoder<T: SphereFloat> {
    /// 가장 거친 레벨부터
    blocks: Vec<UpBlock<T>>,
    pooling: SpherePooling,
    out_channels: usize,
}

impl<T: SphereFloat> Decoder<T> {
    pub fn new<R: Rng + ?Sized>(
        stack: &LaplacianStack<T>,
        config: &ModelConfig,
        rng: &mut R,
    ) -> SphereResult<Self> {
        let levels = stack.levels();
        let widths = &config.feature_widths;
        if levels.is_empty() || levels.len() != widths.len() {
            return Err(SphereError::config(format!(
                "{} Laplacian levels for {} feature widths",
                levels.len(),
                widths.len()
            )));
        }

        let depth = levels.len();
        let mut blocks = Vec::with_capacity(depth);
        for i in (0..depth).rev() {
            let laplacian = stack.operator(levels[i])?;
            let in_channels = if i + 1 < depth { widths[i + 1] } else { widths[i] };
            let out_channels = if i == 0 { config.out_channels } else { widths[i] };
            let k = config.kernel_size;
            let conv1 = ChebConv::new(laplacian.clone(), in_channels, widths[i], k, config.use_bias, rng)?;
            let conv2 = ChebConv::new(laplacian, widths[i], out_channels, k, config.use_bias, rng)?;
            blocks.push(UpBlock { level: levels[i], conv1, conv2 });
        }

        let decoder = Self {
            blocks,
            pooling: SpherePooling::new(config.pooling),
            out_channels: config.out_channels,
        };
        decoder.check_output()?;
        Ok(decoder)
    }

    /// 마지막 블록은 정확히 1 채널을 내야 한다
    fn check_output(&self) -> SphereResult<()> {
        let produced = self.blocks.last().map(|b| b.conv2.out_channels());
        if produced != Some(1) || self.out_channels != 1 {
            return Err(SphereError::config(format!(
                "final decoder block must produce 1 channel, got {:?}",
                produced
            )));
        }
        Ok(())
    }

    pub fn blocks(&self) -> &[UpBlock<T>] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [UpBlock<T>] {
        &mut self.blocks
    }

    pub fn parameter_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.conv1.parameter_count() + b.conv2.parameter_count())
            .sum()
    }

    /// `fused` 는 가장 세밀한 레벨부터의 융합 스킵
    pub fn forward(&self, code: ArrayView3<T>, fused: &[Array3<T>]) -> SphereResult<Array3<T>> {
        if fused.len() != self.blocks.len() {
            return Err(SphereError::shape(format!(
                "decoder has {} blocks but received {} fused skips",
                self.blocks.len(),
                fused.len()
            )));
        }

        let mut current = code.to_owned();
        for (block, skip) in self.blocks.iter().zip(fused.iter().rev()) {
            let up = self.pooling.unpool(current.view());
            let mut h = block.conv1.forward(up.view())?;
            if h.dim() != skip.dim() {
                return Err(SphereError::shape(format!(
                    "fused skip at {} is {:?}, decoder activation is {:?}",
                    block.level,
                    skip.dim(),
                    h.dim()
                )));
            }
            h += skip;
            elu_inplace(&mut h);
            let mut h = block.conv2.forward(h.view())?;
            elu_inplace(&mut h);
            current = h;
        }
        Ok(current)
    }
}
