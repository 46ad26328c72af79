//! # 구면 U-Net 핵심 라이브러리 모듈
//!
//! HEALPix 그래프 스펙트럼 합성곱 인코더-디코더의 구성 요소들

pub mod types;
pub mod systems;
pub mod healpix;
pub mod graph;
pub mod layers;
pub mod network;
pub mod preprocess;

// 주요 타입들 재수출
pub use types::{scalar, PixelSignal, SphereFloat};
pub use systems::*;
pub use healpix::ResolutionLevel;
pub use graph::{LaplacianStack, SparseOperator, SpectralNormalizer};
pub use layers::{ChebConv, ChannelLinear, SpherePooling};
pub use network::{AnyModel, EncoderOutput, SphericalUNet};
pub use preprocess::{ExtremaScanner, ExtremaStats, MapCache, Scaler, ScalingMethod};
