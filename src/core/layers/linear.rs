//! # 화소별 채널 선형 변환 (1×1 합성곱)
//!
//! 스킵 연결 융합에서 각 입력 채널의 특징을 섞는 데 쓰인다.

use ndarray::{Array1, Array2, Array3, ArrayView3, Axis};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

#[derive(Debug, Clone)]
pub struct ChannelLinear<T: SphereFloat> {
    /// [Fin, Fout]
    weight: Array2<T>,
    bias: Option<Array1<T>>,
}

impl<T: SphereFloat> ChannelLinear<T> {
    /// 가중치와 편향을 U(−1/√Fin, 1/√Fin) 에서 뽑는다
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        rng: &mut R,
    ) -> SphereResult<Self> {
        if in_features == 0 || out_features == 0 {
            return Err(SphereError::config(format!(
                "linear layer needs positive sizes, got {} -> {}",
                in_features, out_features
            )));
        }
        let bound = 1.0 / (in_features as f64).sqrt();
        let uniform = Uniform::new_inclusive(-bound, bound);
        let weight = Array2::from_shape_simple_fn((in_features, out_features), || {
            scalar::<T>(uniform.sample(rng))
        });
        let bias = if use_bias {
            Some(Array1::from_shape_simple_fn(out_features, || scalar::<T>(uniform.sample(rng))))
        } else {
            None
        };
        Ok(Self { weight, bias })
    }

    pub fn in_features(&self) -> usize {
        self.weight.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weight.ncols()
    }

    pub fn weight(&self) -> &Array2<T> {
        &self.weight
    }

    pub fn weight_mut(&mut self) -> &mut Array2<T> {
        &mut self.weight
    }

    pub fn bias(&self) -> Option<&Array1<T>> {
        self.bias.as_ref()
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.len() + self.bias.as_ref().map_or(0, |b| b.len())
    }

    /// [B, P, Fin] → [B, P, Fout]
    pub fn forward(&self, x: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let (batch, pixels, channels) = x.dim();
        if channels != self.in_features() {
            return Err(SphereError::shape(format!(
                "linear layer expects {} features, got {}",
                self.in_features(),
                channels
            )));
        }
        let mut out = Array3::<T>::zeros((batch, pixels, self.out_features()));
        for (b, mut target) in out.axis_iter_mut(Axis(0)).enumerate() {
            target.assign(&x.index_axis(Axis(0), b).dot(&self.weight));
        }
        if let Some(bias) = &self.bias {
            out += bias;
        }
        Ok(out)
    }
}
