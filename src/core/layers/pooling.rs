//! # 계층적 풀링
//!
//! NESTED 순서에서 부모 p 의 자식은 4p..4p+4 로 연속이므로
//! 풀링은 연속된 4개 화소의 축약, 언풀링은 4배 복제다.

use ndarray::{s, Array3, ArrayView3, Axis, Zip};

use crate::core::healpix::BRANCHING;
use crate::core::systems::config::PoolingMode;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpherePooling {
    mode: PoolingMode,
}

impl SpherePooling {
    pub fn new(mode: PoolingMode) -> Self {
        Self { mode }
    }

    pub fn average() -> Self {
        Self::new(PoolingMode::Average)
    }

    pub fn max() -> Self {
        Self::new(PoolingMode::Max)
    }

    pub fn mode(&self) -> PoolingMode {
        self.mode
    }

    /// [B, 4P, C] → [B, P, C]
    pub fn pool<T: SphereFloat>(&self, x: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let (batch, pixels, channels) = x.dim();
        if pixels == 0 || pixels % BRANCHING != 0 {
            return Err(SphereError::shape(format!(
                "cannot pool {} pixels into groups of {}",
                pixels, BRANCHING
            )));
        }
        let parents = pixels / BRANCHING;
        let quarter = scalar::<T>(0.25);
        let mut out = Array3::<T>::zeros((batch, parents, channels));

        for (b, mut out_b) in out.axis_iter_mut(Axis(0)).enumerate() {
            let x_b = x.index_axis(Axis(0), b);
            for (p, mut row) in out_b.axis_iter_mut(Axis(0)).enumerate() {
                let group = x_b.slice(s![BRANCHING * p..BRANCHING * (p + 1), ..]);
                let (c0, c1, c2, c3) = (group.row(0), group.row(1), group.row(2), group.row(3));
                match self.mode {
                    // 짝 합산: 같은 값 4개의 평균이 정확히 원래 값이 된다
                    PoolingMode::Average => {
                        Zip::from(&mut row).and(&c0).and(&c1).and(&c2).and(&c3).for_each(
                            |o, &a, &b, &c, &d| *o = ((a + b) + (c + d)) * quarter,
                        );
                    }
                    PoolingMode::Max => {
                        Zip::from(&mut row).and(&c0).and(&c1).and(&c2).and(&c3).for_each(
                            |o, &a, &b, &c, &d| *o = a.max(b).max(c.max(d)),
                        );
                    }
                }
            }
        }
        Ok(out)
    }

    /// [B, P, C] → [B, 4P, C], 부모 값을 네 자식에 복제 (두 모드 공통)
    pub fn unpool<T: SphereFloat>(&self, x: ArrayView3<T>) -> Array3<T> {
        let (batch, pixels, channels) = x.dim();
        let mut out = Array3::<T>::zeros((batch, pixels * BRANCHING, channels));
        for k in 0..BRANCHING {
            out.slice_mut(s![.., k..;BRANCHING, ..]).assign(&x);
        }
        out
    }
}
