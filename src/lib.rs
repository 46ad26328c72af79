//! 구면 U-Net (Spherical U-Net) 라이브러리
//!
//! 여러 검출기의 잡음 섞인 구면 신호(HEALPix NESTED)에서 단일 목표 신호를 복원하는
//! 체비쇼프 그래프 합성곱 인코더-디코더

pub mod core;

// 핵심 모듈들 재수출
pub use core::{
    // 설정과 오류
    LaplacianKind, ModelConfig, NumericalWarning, PoolingMode, Precision, SpectralConfig,
    SphereError, SphereResult,
    // 그래프와 레이어
    ChebConv, LaplacianStack, ResolutionLevel, SpherePooling, SphereFloat,
    // 모델
    AnyModel, SphericalUNet,
};
