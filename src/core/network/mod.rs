//! # 구면 U-Net 네트워크
//!
//! 검출기별 인코더, 스킵 융합, 병목, 디코더와 이를 묶는 모델

pub mod bottleneck;
pub mod decoder;
pub mod encoder;
pub mod fuser;
pub mod model;


pub use bottleneck::Bottleneck;
pub use decoder::{Decoder, UpBlock};
pub use encoder::{DownBlock, Encoder, EncoderOutput};
pub use fuser::SkipFuser;
pub use model::{AnyModel, SphericalUNet};
