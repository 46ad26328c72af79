use serde::{Deserialize, Serialize};

use crate::core::systems::errors::{SphereError, SphereResult};

/// 지원하는 최대 nside (2^13)
pub const MAX_NSIDE: u32 = 1 << 13;

/// 자식 화소 수 (인접 레벨 간 분기 계수)
pub const BRANCHING: usize = 4;

/// 해상도 레벨 - 2의 거듭제곱 nside 하나로 식별되는 타일링 밀도
///
/// 생성 후 불변이며 레벨 0 (nside=1, 12화소)이 가장 거친 기본 타일링이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolutionLevel {
    nside: u32,
}

impl ResolutionLevel {
    pub fn new(nside: u32) -> SphereResult<Self> {
        if nside == 0 || !nside.is_power_of_two() {
            return Err(SphereError::config(format!(
                "nside must be a power of two, got {}",
                nside
            )));
        }
        if nside > MAX_NSIDE {
            return Err(SphereError::config(format!(
                "nside {} exceeds the supported maximum {}",
                nside, MAX_NSIDE
            )));
        }
        Ok(Self { nside })
    }

    /// 레벨 번호(order)로 생성: nside = 2^order
    pub fn from_order(order: u32) -> SphereResult<Self> {
        if order > MAX_NSIDE.trailing_zeros() {
            return Err(SphereError::config(format!("order {} is too fine", order)));
        }
        Self::new(1 << order)
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// log2(nside)
    pub fn order(&self) -> u32 {
        self.nside.trailing_zeros()
    }

    /// 화소 수 = 12·nside²
    pub fn npix(&self) -> usize {
        12 * (self.nside as usize) * (self.nside as usize)
    }

    /// 면(face)당 화소 수 = nside²
    pub fn pixels_per_face(&self) -> usize {
        (self.nside as usize) * (self.nside as usize)
    }

    /// 한 단계 거친 레벨 (nside=1 이면 None)
    pub fn coarser(&self) -> Option<Self> {
        if self.nside > 1 {
            Some(Self { nside: self.nside / 2 })
        } else {
            None
        }
    }

    /// 한 단계 세밀한 레벨
    pub fn finer(&self) -> Option<Self> {
        if self.nside < MAX_NSIDE {
            Some(Self { nside: self.nside * 2 })
        } else {
            None
        }
    }

    /// 합성곱이 일어나는 레벨들: nside_input, nside_input/2, …, 2 (세밀한 순서)
    ///
    /// 항목 수는 log2(nside_input) 이다.
    pub fn hierarchy(nside_input: u32) -> SphereResult<Vec<Self>> {
        let finest = Self::new(nside_input)?;
        let mut levels = Vec::with_capacity(finest.order() as usize);
        let mut current = finest;
        while current.nside > 1 {
            levels.push(current);
            current = Self { nside: current.nside / 2 };
        }
        Ok(levels)
    }
}

impl std::fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nside={}", self.nside)
    }
}
