//! # 구면 U-Net 모델
//!
//! N개 인코더 → 레벨별 스킵 융합 + 병목 → 디코더 → 단일 채널 복원 신호
//!
//! 라플라시안은 생성 시 한 번만 만들어 모든 레이어가 `Arc` 로 공유한다.
//! 순전파는 가중치를 바꾸지 않으며 호출마다 새 텐서를 할당한다.

use log::info;
use ndarray::{s, Array1, Array3, ArrayView1, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bottleneck::Bottleneck;
use super::decoder::Decoder;
use super::encoder::{Encoder, EncoderOutput};
use super::fuser::SkipFuser;
use crate::core::graph::{LaplacianStack, SpectralNormalizer};
use crate::core::healpix::ResolutionLevel;
use crate::core::systems::config::{ModelConfig, Precision};
use crate::core::systems::errors::{NumericalWarning, SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

#[derive(Debug, Clone)]
pub struct SphericalUNet<T: SphereFloat> {
    config: ModelConfig,
    levels: Vec<ResolutionLevel>,
    laplacians: LaplacianStack<T>,
    encoders: Vec<Encoder<T>>,
    fusers: Vec<SkipFuser<T>>,
    bottleneck: Bottleneck,
    decoder: Decoder<T>,
}

impl<T: SphereFloat> SphericalUNet<T> {
    pub fn new(config: &ModelConfig) -> SphereResult<Self> {
        config.validate()?;
        let levels = ResolutionLevel::hierarchy(config.nside)?;
        let normalizer = SpectralNormalizer::from_config(&config.spectral)?;
        let laplacians = LaplacianStack::<T>::build(&levels, config.laplacian_kind, &normalizer)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let encoders = (0..config.in_channels)
            .map(|_| Encoder::new(&laplacians, config, &mut rng))
            .collect::<SphereResult<Vec<_>>>()?;
        let fusers = levels
            .iter()
            .zip(&config.feature_widths)
            .map(|(&level, &width)| {
                SkipFuser::new(level, config.in_channels, width, config.use_bias, &mut rng)
            })
            .collect::<SphereResult<Vec<_>>>()?;
        let decoder = Decoder::new(&laplacians, config, &mut rng)?;

        let model = Self {
            config: config.clone(),
            levels,
            laplacians,
            encoders,
            fusers,
            bottleneck: Bottleneck::new(),
            decoder,
        };
        info!(
            "구면 U-Net 생성: nside={} 채널={} K={} 레벨={} 파라미터={} 경고={}",
            config.nside,
            config.in_channels,
            config.kernel_size,
            model.levels.len(),
            model.parameter_count(),
            model.warnings().len()
        );
        Ok(model)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// 합성곱이 일어나는 레벨 (가장 세밀한 것부터)
    pub fn levels(&self) -> &[ResolutionLevel] {
        &self.levels
    }

    pub fn laplacians(&self) -> &LaplacianStack<T> {
        &self.laplacians
    }

    /// 생성 중 수집된 λmax 수렴 경고
    pub fn warnings(&self) -> &[NumericalWarning] {
        self.laplacians.warnings()
    }

    pub fn encoders(&self) -> &[Encoder<T>] {
        &self.encoders
    }

    pub fn encoders_mut(&mut self) -> &mut [Encoder<T>] {
        &mut self.encoders
    }

    pub fn fusers(&self) -> &[SkipFuser<T>] {
        &self.fusers
    }

    pub fn fusers_mut(&mut self) -> &mut [SkipFuser<T>] {
        &mut self.fusers
    }

    pub fn decoder(&self) -> &Decoder<T> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut Decoder<T> {
        &mut self.decoder
    }

    pub fn parameter_count(&self) -> usize {
        self.encoders.iter().map(|e| e.parameter_count()).sum::<usize>()
            + self.fusers.iter().map(|f| f.parameter_count()).sum::<usize>()
            + self.decoder.parameter_count()
    }

    /// [B, N, P] → [B, 1, P]
    pub fn forward(&self, input: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let (_, channels, pixels) = input.dim();
        if channels != self.config.in_channels {
            return Err(SphereError::shape(format!(
                "model expects {} input channels, got {}",
                self.config.in_channels, channels
            )));
        }
        let npix = self.levels.first().map_or(0, |l| l.npix());
        if pixels != npix {
            return Err(SphereError::shape(format!(
                "input has {} pixels but nside={} needs {}",
                pixels, self.config.nside, npix
            )));
        }

        let outputs = self
            .encoders
            .iter()
            .enumerate()
            .map(|(c, encoder)| {
                let x = input.slice(s![.., c, ..]).insert_axis(Axis(2));
                encoder.forward(x)
            })
            .collect::<SphereResult<Vec<EncoderOutput<T>>>>()?;

        let fused = self
            .fusers
            .iter()
            .enumerate()
            .map(|(level, fuser)| {
                let skips: Vec<&Array3<T>> = outputs.iter().map(|o| &o.skips[level]).collect();
                fuser.forward(&skips)
            })
            .collect::<SphereResult<Vec<_>>>()?;

        let codes: Vec<&Array3<T>> = outputs.iter().map(|o| &o.code).collect();
        let bottom = self.bottleneck.forward(&codes)?;
        let decoded = self.decoder.forward(bottom.view(), &fused)?;

        // [B, P, 1] → [B, 1, P]
        Ok(decoded.permuted_axes([0, 2, 1]).as_standard_layout().into_owned())
    }

    /// 배치 없는 단일 표본: 채널별 P 화소 배열 N개 → P 화소
    pub fn forward_single(&self, channels: &[ArrayView1<T>]) -> SphereResult<Array1<T>> {
        let pixels = channels.first().map_or(0, |c| c.len());
        if let Some(bad) = channels.iter().find(|c| c.len() != pixels) {
            return Err(SphereError::shape(format!(
                "channel arrays disagree in length: {} vs {}",
                pixels,
                bad.len()
            )));
        }
        let mut input = Array3::<T>::zeros((1, channels.len(), pixels));
        for (c, values) in channels.iter().enumerate() {
            input.slice_mut(s![0, c, ..]).assign(values);
        }
        let out = self.forward(input.view())?;
        Ok(out.slice(s![0, 0, ..]).to_owned())
    }
}

/// 설정의 정밀도로 결정되는 모델
#[derive(Debug, Clone)]
pub enum AnyModel {
    F32(SphericalUNet<f32>),
    F64(SphericalUNet<f64>),
}

impl AnyModel {
    pub fn from_config(config: &ModelConfig) -> SphereResult<Self> {
        match config.precision {
            Precision::Single => Ok(AnyModel::F32(SphericalUNet::new(config)?)),
            Precision::Double => Ok(AnyModel::F64(SphericalUNet::new(config)?)),
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            AnyModel::F32(_) => Precision::Single,
            AnyModel::F64(_) => Precision::Double,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        match self {
            AnyModel::F32(m) => m.config(),
            AnyModel::F64(m) => m.config(),
        }
    }

    pub fn parameter_count(&self) -> usize {
        match self {
            AnyModel::F32(m) => m.parameter_count(),
            AnyModel::F64(m) => m.parameter_count(),
        }
    }

    pub fn warnings(&self) -> &[NumericalWarning] {
        match self {
            AnyModel::F32(m) => m.warnings(),
            AnyModel::F64(m) => m.warnings(),
        }
    }

    /// f64 입력을 모델 정밀도로 변환해 실행하고 f64 로 돌려준다
    pub fn forward(&self, input: ArrayView3<f64>) -> SphereResult<Array3<f64>> {
        match self {
            AnyModel::F32(m) => Ok(m.forward(input.mapv(scalar::<f32>).view())?.mapv(f64::from)),
            AnyModel::F64(m) => m.forward(input),
        }
    }
}
