//! # 신호 스케일링
//!
//! 최소/최대 통계로 [min, max] ↔ [0, 1] 을 변환한다.
//! 부호 대칭(abs-max) 방식은 의미가 확정되지 않아 지원하지 않는다.

use ndarray::{Array, Dimension};
use serde::{Deserialize, Serialize};

use super::extrema::ExtremaStats;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    MinMax,
    Symmetric,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    method: ScalingMethod,
    stats: ExtremaStats,
}

impl Scaler {
    pub fn new(method: ScalingMethod, stats: ExtremaStats) -> SphereResult<Self> {
        match method {
            ScalingMethod::MinMax => {}
            ScalingMethod::Symmetric => {
                return Err(SphereError::Unsupported(
                    "symmetric scaling is not defined; use min_max".to_string(),
                ))
            }
        }
        if !stats.min.is_finite() || !stats.max.is_finite() {
            return Err(SphereError::config(format!(
                "scaling needs finite extrema, got [{}, {}]",
                stats.min, stats.max
            )));
        }
        if !(stats.max > stats.min) {
            return Err(SphereError::config(format!(
                "degenerate scaling range [{}, {}]",
                stats.min, stats.max
            )));
        }
        Ok(Self { method, stats })
    }

    pub fn method(&self) -> ScalingMethod {
        self.method
    }

    pub fn stats(&self) -> ExtremaStats {
        self.stats
    }

    /// (x − min) / (max − min)
    pub fn forward<T: SphereFloat, D: Dimension>(&self, x: &Array<T, D>) -> Array<T, D> {
        let min = scalar::<T>(self.stats.min);
        let span = scalar::<T>(self.stats.range());
        x.mapv(|v| (v - min) / span)
    }

    /// y·(max − min) + min
    pub fn inverse<T: SphereFloat, D: Dimension>(&self, y: &Array<T, D>) -> Array<T, D> {
        let min = scalar::<T>(self.stats.min);
        let span = scalar::<T>(self.stats.range());
        y.mapv(|v| v * span + min)
    }
}
