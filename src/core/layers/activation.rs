//! 활성화 함수

use ndarray::{Array, Dimension};

use crate::core::types::SphereFloat;

/// ELU (α = 1): x > 0 이면 x, 아니면 eˣ − 1
#[inline]
pub fn elu_scalar<T: SphereFloat>(v: T) -> T {
    if v > T::zero() {
        v
    } else {
        v.exp() - T::one()
    }
}

pub fn elu<T: SphereFloat, D: Dimension>(x: &Array<T, D>) -> Array<T, D> {
    x.mapv(elu_scalar)
}

pub fn elu_inplace<T: SphereFloat, D: Dimension>(x: &mut Array<T, D>) {
    x.mapv_inplace(elu_scalar);
}
