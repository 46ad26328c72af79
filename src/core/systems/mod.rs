//! # 시스템 공통 모듈
//!
//! 모델 구성 설정과 오류 체계

pub mod config;
pub mod errors;

// 설정 관련 재수출
pub use config::{LaplacianKind, ModelConfig, PoolingMode, Precision, SpectralConfig};

// 오류 재수출
pub use errors::{NumericalWarning, SphereError, SphereResult};

// 테스트 모듈들
#[cfg(test)]
pub mod __tests__;
