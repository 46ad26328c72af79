//! # 공용 수치 타입

use ndarray::{Array3, NdFloat};
use num_traits::FromPrimitive;

/// 네트워크 텐서에 쓰이는 부동소수점 타입 (f32, f64)
pub trait SphereFloat: NdFloat + FromPrimitive {}

impl SphereFloat for f32 {}
impl SphereFloat for f64 {}

/// f64 상수를 런타임 정밀도로 변환
#[inline]
pub fn scalar<T: SphereFloat>(v: f64) -> T {
    T::from_f64(v).unwrap_or_else(T::nan)
}

/// 화소 신호 [batch, pixels, channels]
pub type PixelSignal<T> = Array3<T>;
