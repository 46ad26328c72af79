//! # 체비쇼프 스펙트럼 그래프 합성곱
//!
//! T0 = X, T1 = L'X, Tk = 2·L'·Tk-1 − Tk-2 로 기저를 쌓고
//! out[b,p,o] = Σ_k Σ_i Tk[b,p,i]·W[k,i,o] (+ bias[o])

use std::sync::Arc;

use ndarray::{s, Array1, Array3, Array4, ArrayView3, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::core::graph::SparseOperator;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::{scalar, SphereFloat};

/// 편향 초기값
pub const BIAS_INIT: f64 = 0.01;

/// 체비쇼프 합성곱 레이어
#[derive(Debug, Clone)]
pub struct ChebConv<T: SphereFloat> {
    laplacian: Arc<SparseOperator<T>>,
    kernel_size: usize,
    in_channels: usize,
    out_channels: usize,
    /// [K, Fin, Fout]
    weight: Array3<T>,
    bias: Option<Array1<T>>,
}

impl<T: SphereFloat> ChebConv<T> {
    /// 가중치 초기화 표준편차 1/sqrt(Fin·(K+0.5)/2)
    pub fn init_std(in_channels: usize, kernel_size: usize) -> f64 {
        1.0 / (in_channels as f64 * (kernel_size as f64 + 0.5) / 2.0).sqrt()
    }

    pub fn new<R: Rng + ?Sized>(
        laplacian: Arc<SparseOperator<T>>,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        use_bias: bool,
        rng: &mut R,
    ) -> SphereResult<Self> {
        check_dims(kernel_size, in_channels, out_channels)?;

        let std = Self::init_std(in_channels, kernel_size);
        let normal = Normal::new(0.0, std)
            .map_err(|e| SphereError::config(format!("invalid init distribution: {}", e)))?;
        let weight = Array3::from_shape_simple_fn((kernel_size, in_channels, out_channels), || {
            scalar::<T>(normal.sample(rng))
        });
        let bias = if use_bias {
            Some(Array1::from_elem(out_channels, scalar::<T>(BIAS_INIT)))
        } else {
            None
        };

        Ok(Self { laplacian, kernel_size, in_channels, out_channels, weight, bias })
    }

    /// 주어진 가중치로 생성 (학습된 값 복원용)
    pub fn from_weights(
        laplacian: Arc<SparseOperator<T>>,
        weight: Array3<T>,
        bias: Option<Array1<T>>,
    ) -> SphereResult<Self> {
        let (kernel_size, in_channels, out_channels) = weight.dim();
        check_dims(kernel_size, in_channels, out_channels)?;
        if let Some(b) = &bias {
            if b.len() != out_channels {
                return Err(SphereError::config(format!(
                    "bias has {} entries but the layer has {} output channels",
                    b.len(),
                    out_channels
                )));
            }
        }
        Ok(Self { laplacian, kernel_size, in_channels, out_channels, weight, bias })
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub fn laplacian(&self) -> &Arc<SparseOperator<T>> {
        &self.laplacian
    }

    pub fn weight(&self) -> &Array3<T> {
        &self.weight
    }

    /// 외부 학습 절차가 갱신하는 가중치
    pub fn weight_mut(&mut self) -> &mut Array3<T> {
        &mut self.weight
    }

    pub fn bias(&self) -> Option<&Array1<T>> {
        self.bias.as_ref()
    }

    pub fn bias_mut(&mut self) -> Option<&mut Array1<T>> {
        self.bias.as_mut()
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.len() + self.bias.as_ref().map_or(0, |b| b.len())
    }

    fn check_input(&self, x: &ArrayView3<T>) -> SphereResult<()> {
        let (_, pixels, channels) = x.dim();
        if channels != self.in_channels {
            return Err(SphereError::shape(format!(
                "ChebConv expects {} input channels, got {}",
                self.in_channels, channels
            )));
        }
        if pixels != self.laplacian.size() {
            return Err(SphereError::shape(format!(
                "signal has {} pixels but the Laplacian is {}x{}",
                pixels,
                self.laplacian.size(),
                self.laplacian.size()
            )));
        }
        Ok(())
    }

    /// 체비쇼프 기저 [K, B, P, Fin]
    pub fn chebyshev_basis(&self, x: ArrayView3<T>) -> SphereResult<Array4<T>> {
        self.check_input(&x)?;
        let (batch, pixels, channels) = x.dim();
        let mut basis = Array4::<T>::zeros((self.kernel_size, batch, pixels, channels));
        basis.index_axis_mut(Axis(0), 0).assign(&x);

        if self.kernel_size > 1 {
            let two = scalar::<T>(2.0);
            let mut prev2 = x.to_owned();
            let mut prev1 = self.laplacian.apply(x)?;
            basis.index_axis_mut(Axis(0), 1).assign(&prev1);

            for k in 2..self.kernel_size {
                let mut current = self.laplacian.apply(prev1.view())?;
                current.mapv_inplace(|v| v * two);
                current -= &prev2;
                basis.index_axis_mut(Axis(0), k).assign(&current);
                prev2 = prev1;
                prev1 = current;
            }
        }
        Ok(basis)
    }

    /// [B, P, Fin] → [B, P, Fout]
    pub fn forward(&self, x: ArrayView3<T>) -> SphereResult<Array3<T>> {
        let basis = self.chebyshev_basis(x)?;
        let (_, batch, pixels, _) = basis.dim();
        let mut out = Array3::<T>::zeros((batch, pixels, self.out_channels));

        for k in 0..self.kernel_size {
            let weight_k = self.weight.index_axis(Axis(0), k);
            for b in 0..batch {
                let term = basis.slice(s![k, b, .., ..]).dot(&weight_k);
                let mut target = out.index_axis_mut(Axis(0), b);
                target += &term;
            }
        }

        if let Some(bias) = &self.bias {
            out += bias;
        }
        Ok(out)
    }
}

fn check_dims(kernel_size: usize, in_channels: usize, out_channels: usize) -> SphereResult<()> {
    if kernel_size == 0 {
        return Err(SphereError::config("Chebyshev kernel size must be at least 1"));
    }
    if in_channels == 0 || out_channels == 0 {
        return Err(SphereError::config(format!(
            "channel counts must be positive, got {} -> {}",
            in_channels, out_channels
        )));
    }
    Ok(())
}
