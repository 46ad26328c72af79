//! # 모델 구성 설정
//!
//! 생성 시점에 소비되는 설정: 입력 채널 수, 입력 해상도, 라플라시안 종류,
//! 체비쇼프 커널 크기, 레벨별 특징 폭, 수치 정밀도

use serde::{Deserialize, Serialize};

use super::errors::{SphereError, SphereResult};
use crate::core::healpix::ResolutionLevel;

/// 라플라시안 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianKind {
    /// D − W
    Combinatorial,
    /// I − D^{-1/2} W D^{-1/2}
    Normalized,
}

/// 풀링 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingMode {
    Average,
    Max,
}

/// 수치 정밀도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Single,
    Double,
}

/// 스펙트럼 정규화 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// λmax 추정 허용 오차
    pub tolerance: f64,
    /// 목표 스케일 (L' = (2·scale/λmax)·L − I)
    pub scale: f64,
    /// 최대 Lanczos 단계 수
    pub max_lanczos_steps: usize,
    /// 수렴 실패 시 2·tol 에 곱하는 여유 배수
    pub fallback_margin: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            tolerance: 5e-3,
            scale: 1.0,
            max_lanczos_steps: 100,
            fallback_margin: 10.0,
        }
    }
}

impl SpectralConfig {
    pub fn validate(&self) -> SphereResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(SphereError::config(format!(
                "spectral tolerance must lie in (0, 0.5), got {}",
                self.tolerance
            )));
        }
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(SphereError::config(format!("spectral scale must be positive, got {}", self.scale)));
        }
        if self.max_lanczos_steps == 0 {
            return Err(SphereError::config("max_lanczos_steps must be at least 1"));
        }
        if !(self.fallback_margin >= 1.0) {
            return Err(SphereError::config(format!(
                "fallback_margin must be >= 1, got {}",
                self.fallback_margin
            )));
        }
        Ok(())
    }
}

/// 구면 U-Net 전체 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 입력 채널(검출기) 수
    pub in_channels: usize,
    /// 입력 해상도 (2의 거듭제곱)
    pub nside: u32,
    pub laplacian_kind: LaplacianKind,
    /// 체비쇼프 커널 크기 K
    pub kernel_size: usize,
    /// 레벨별 특징 폭 (가장 세밀한 레벨부터)
    pub feature_widths: Vec<usize>,
    /// 디코더 최종 출력 채널 수 (반드시 1)
    pub out_channels: usize,
    pub pooling: PoolingMode,
    pub precision: Precision,
    pub use_bias: bool,
    /// 가중치 초기화 시드 (없으면 엔트로피 사용)
    pub seed: Option<u64>,
    pub spectral: SpectralConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            in_channels: 2,
            nside: 2,
            laplacian_kind: LaplacianKind::Normalized,
            kernel_size: 3,
            feature_widths: vec![4],
            out_channels: 1,
            pooling: PoolingMode::Average,
            precision: Precision::Single,
            use_bias: true,
            seed: None,
            spectral: SpectralConfig::default(),
        }
    }
}

impl ModelConfig {
    /// 모든 레벨에 같은 특징 폭을 쓰는 설정
    pub fn uniform(in_channels: usize, nside: u32, kernel_size: usize, width: usize) -> Self {
        let depth = if nside.is_power_of_two() { nside.trailing_zeros() as usize } else { 0 };
        Self {
            in_channels,
            nside,
            kernel_size,
            feature_widths: vec![width; depth],
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// JSON 문자열에서 설정 로드 후 검증
    pub fn from_json_str(json: &str) -> SphereResult<Self> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| SphereError::config(format!("invalid model config json: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> SphereResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SphereError::config(format!("config serialization failed: {}", e)))
    }

    /// 입력 해상도
    pub fn input_level(&self) -> SphereResult<ResolutionLevel> {
        ResolutionLevel::new(self.nside)
    }

    /// 다운 블록 수 = log2(nside)
    pub fn depth(&self) -> usize {
        self.nside.trailing_zeros() as usize
    }

    pub fn validate(&self) -> SphereResult<()> {
        let level = self.input_level()?;
        if level.order() == 0 {
            return Err(SphereError::config(
                "input nside must be at least 2 so that one pooling level exists",
            ));
        }
        if self.in_channels == 0 {
            return Err(SphereError::config("in_channels must be at least 1"));
        }
        if self.kernel_size == 0 {
            return Err(SphereError::config("kernel_size must be at least 1"));
        }
        if self.feature_widths.len() != self.depth() {
            return Err(SphereError::config(format!(
                "feature_widths has {} entries but nside={} needs {}",
                self.feature_widths.len(),
                self.nside,
                self.depth()
            )));
        }
        if let Some(pos) = self.feature_widths.iter().position(|&w| w == 0) {
            return Err(SphereError::config(format!("feature width at level {} is zero", pos)));
        }
        if self.out_channels != 1 {
            return Err(SphereError::config(format!(
                "decoder must produce exactly 1 output channel, got {}",
                self.out_channels
            )));
        }
        self.spectral.validate()
    }
}
