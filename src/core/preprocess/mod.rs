//! # 입력 전처리 도우미
//!
//! 스케일링 전략, 극값 통계 스캔, 검출기별 맵 캐시

pub mod cache;
pub mod extrema;
pub mod scaling;


pub use cache::MapCache;
pub use extrema::{ExtremaScanner, ExtremaStats};
pub use scaling::{Scaler, ScalingMethod};
