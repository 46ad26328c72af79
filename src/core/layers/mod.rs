//! # 구면 신경망 레이어
//!
//! 체비쇼프 그래프 합성곱, 계층 풀링, ELU, 채널 선형 변환

pub mod activation;
pub mod chebyshev;
pub mod linear;
pub mod pooling;

#[cfg(test)]
mod __tests__;

pub use activation::{elu, elu_inplace, elu_scalar};
pub use chebyshev::{ChebConv, BIAS_INIT};
pub use linear::ChannelLinear;
pub use pooling::SpherePooling;
