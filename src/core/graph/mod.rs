//! # 그래프와 스펙트럼 연산자
//!
//! 그래프 생성 → 라플라시안 → 스펙트럼 정규화 → 희소 연산자

pub mod builder;
pub mod laplacian;
pub mod spectral;
pub mod operator;
pub mod stack;

#[cfg(test)]
mod __tests__;

pub use builder::{kernel_width, GraphBuilder, SphereGraph};
pub use laplacian::{Laplacian, LaplacianBuilder};
pub use spectral::{ScaledLaplacian, SpectralEstimate, SpectralNormalizer};
pub use operator::SparseOperator;
pub use stack::{LaplacianStack, LevelOperator};
