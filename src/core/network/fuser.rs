//! # 스킵 연결 융합
//!
//! 레벨마다 채널별 1×1 선형 변환을 적용한 뒤 채널 축으로 합산한다.

use ndarray::Array3;
use rand::Rng;

use crate::core::healpix::ResolutionLevel;
use crate::core::layers::ChannelLinear;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::SphereFloat;

#[derive(Debug, Clone)]
pub struct SkipFuser<T: SphereFloat> {
    level: ResolutionLevel,
    /// 입력 채널마다 하나
    mixers: Vec<ChannelLinear<T>>,
}

impl<T: SphereFloat> SkipFuser<T> {
    pub fn new<R: Rng + ?Sized>(
        level: ResolutionLevel,
        in_channels: usize,
        width: usize,
        use_bias: bool,
        rng: &mut R,
    ) -> SphereResult<Self> {
        if in_channels == 0 {
            return Err(SphereError::config("skip fuser needs at least one input channel"));
        }
        let mixers = (0..in_channels)
            .map(|_| ChannelLinear::new(width, width, use_bias, rng))
            .collect::<SphereResult<Vec<_>>>()?;
        Ok(Self { level, mixers })
    }

    pub fn level(&self) -> ResolutionLevel {
        self.level
    }

    pub fn mixers(&self) -> &[ChannelLinear<T>] {
        &self.mixers
    }

    pub fn mixers_mut(&mut self) -> &mut [ChannelLinear<T>] {
        &mut self.mixers
    }

    pub fn parameter_count(&self) -> usize {
        self.mixers.iter().map(|m| m.parameter_count()).sum()
    }

    /// 채널별 스킵 [B, P, F] N개 → 융합 스킵 [B, P, F]
    pub fn forward(&self, skips: &[&Array3<T>]) -> SphereResult<Array3<T>> {
        if skips.len() != self.mixers.len() {
            return Err(SphereError::shape(format!(
                "skip fuser at {} expects {} channels, got {}",
                self.level,
                self.mixers.len(),
                skips.len()
            )));
        }
        let mut fused: Option<Array3<T>> = None;
        for (mixer, skip) in self.mixers.iter().zip(skips) {
            let mixed = mixer.forward(skip.view())?;
            fused = Some(match fused {
                None => mixed,
                Some(acc) if acc.dim() == mixed.dim() => acc + &mixed,
                Some(acc) => {
                    return Err(SphereError::shape(format!(
                        "skip tensors disagree at {}: {:?} vs {:?}",
                        self.level,
                        acc.dim(),
                        mixed.dim()
                    )))
                }
            });
        }
        fused.ok_or_else(|| SphereError::shape("no skip tensors to fuse"))
    }
}
