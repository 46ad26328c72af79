//! # 스펙트럼 정규화
//!
//! Lanczos 로 최대 고유값 λmax 를 추정하고 L' = (2·scale/λmax)·L − I 를 만든다.
//! 체비쇼프 재귀가 안정적인 구간으로 스펙트럼을 옮기는 단계다.

use log::{debug, warn};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprs::{CsMat, TriMat};

use super::laplacian::Laplacian;
use super::operator::SparseOperator;
use crate::core::systems::config::SpectralConfig;
use crate::core::systems::errors::{NumericalWarning, SphereError, SphereResult};
use crate::core::types::SphereFloat;

/// 시작 벡터 시드 (추정값이 실행마다 같도록 고정)
const LANCZOS_SEED: u64 = 0x5eed_1a9c;

/// 직교 기저가 소진된 것으로 보는 β 임계값
const BREAKDOWN: f64 = 1e-12;

/// λmax 추정 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralEstimate {
    /// 안전 여유를 곱한 최종 λmax
    pub lambda_max: f64,
    /// 마지막 최대 Ritz 값
    pub ritz_value: f64,
    /// ‖A·y − θ·y‖ 추정치
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// 스케일된 라플라시안 (생성 후 불변)
#[derive(Debug, Clone)]
pub struct ScaledLaplacian {
    matrix: CsMat<f64>,
    scale: f64,
    estimate: SpectralEstimate,
    warnings: Vec<NumericalWarning>,
}

impl ScaledLaplacian {
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn lambda_max(&self) -> f64 {
        self.estimate.lambda_max
    }

    pub fn estimate(&self) -> &SpectralEstimate {
        &self.estimate
    }

    pub fn warnings(&self) -> &[NumericalWarning] {
        &self.warnings
    }

    pub fn size(&self) -> usize {
        self.matrix.rows()
    }

    /// 런타임 정밀도의 희소 연산자로 변환
    pub fn to_operator<T: SphereFloat>(&self) -> SphereResult<SparseOperator<T>> {
        SparseOperator::from_csr(&self.matrix)
    }
}

/// 스펙트럼 정규화기
#[derive(Debug, Clone)]
pub struct SpectralNormalizer {
    tolerance: f64,
    scale: f64,
    max_steps: usize,
    fallback_margin: f64,
}

impl Default for SpectralNormalizer {
    fn default() -> Self {
        let config = SpectralConfig::default();
        Self {
            tolerance: config.tolerance,
            scale: config.scale,
            max_steps: config.max_lanczos_steps,
            fallback_margin: config.fallback_margin,
        }
    }
}

impl SpectralNormalizer {
    pub fn new(tolerance: f64, scale: f64) -> SphereResult<Self> {
        Self::from_config(&SpectralConfig { tolerance, scale, ..SpectralConfig::default() })
    }

    pub fn from_config(config: &SpectralConfig) -> SphereResult<Self> {
        config.validate()?;
        Ok(Self {
            tolerance: config.tolerance,
            scale: config.scale,
            max_steps: config.max_lanczos_steps,
            fallback_margin: config.fallback_margin,
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// λmax 추정
    ///
    /// 수렴 시 Ritz 값에 (1 + 2·tol)을 곱한다. 수렴하지 못하면
    /// (θ + 잔차)·(1 + 2·tol·fallback_margin)을 쓰고 경고를 함께 돌려준다.
    pub fn estimate_lambda_max(
        &self,
        laplacian: &Laplacian,
    ) -> SphereResult<(SpectralEstimate, Option<NumericalWarning>)> {
        let run = lanczos_top(laplacian.matrix(), self.tolerance, self.max_steps)?;
        let context = match laplacian.level() {
            Some(level) => format!("lambda_max {}", level),
            None => format!("lambda_max n={}", laplacian.size()),
        };

        let (lambda_max, warning) = if run.converged {
            (run.ritz * (1.0 + 2.0 * self.tolerance), None)
        } else {
            let inflated =
                (run.ritz + run.residual) * (1.0 + 2.0 * self.tolerance * self.fallback_margin);
            let warning = NumericalWarning {
                context,
                message: format!(
                    "Lanczos did not converge within {} steps, using a wider safety margin",
                    run.iterations
                ),
                estimate: inflated,
                residual: run.residual,
            };
            warn!("{}", warning);
            (inflated, Some(warning))
        };

        if !(lambda_max > 0.0) || !lambda_max.is_finite() {
            return Err(SphereError::Numerical(format!(
                "largest eigenvalue estimate must be positive, got {}",
                lambda_max
            )));
        }

        debug!(
            "λmax={:.6} (ritz={:.6}, residual={:.2e}, {} steps, converged={})",
            lambda_max, run.ritz, run.residual, run.iterations, run.converged
        );

        Ok((
            SpectralEstimate {
                lambda_max,
                ritz_value: run.ritz,
                residual: run.residual,
                iterations: run.iterations,
                converged: run.converged,
            },
            warning,
        ))
    }

    /// L' = (2·scale/λmax)·L − I
    pub fn normalize(&self, laplacian: &Laplacian) -> SphereResult<ScaledLaplacian> {
        let (estimate, warning) = self.estimate_lambda_max(laplacian)?;
        let factor = 2.0 * self.scale / estimate.lambda_max;
        let n = laplacian.size();
        let source = laplacian.matrix();

        let mut tri = TriMat::<f64>::with_capacity((n, n), source.nnz() + n);
        for (i, row) in source.outer_iterator().enumerate() {
            let mut has_diagonal = false;
            for (j, &v) in row.iter() {
                if i == j {
                    has_diagonal = true;
                    tri.add_triplet(i, j, factor * v - 1.0);
                } else {
                    tri.add_triplet(i, j, factor * v);
                }
            }
            if !has_diagonal {
                tri.add_triplet(i, i, -1.0);
            }
        }

        Ok(ScaledLaplacian {
            matrix: tri.to_csr(),
            scale: self.scale,
            estimate,
            warnings: warning.into_iter().collect(),
        })
    }
}

struct LanczosRun {
    ritz: f64,
    residual: f64,
    iterations: usize,
    converged: bool,
}

fn csr_matvec(matrix: &CsMat<f64>, x: &Array1<f64>) -> Array1<f64> {
    let mut y = Array1::<f64>::zeros(matrix.rows());
    for (i, row) in matrix.outer_iterator().enumerate() {
        y[i] = row.iter().map(|(j, &v)| v * x[j]).sum();
    }
    y
}

/// 삼중대각 행렬의 최대 고유값과 해당 고유벡터의 마지막 성분
fn tridiagonal_top(alphas: &[f64], betas: &[f64]) -> (f64, f64) {
    let k = alphas.len();
    let mut t = DMatrix::<f64>::zeros(k, k);
    for i in 0..k {
        t[(i, i)] = alphas[i];
        if i + 1 < k {
            t[(i, i + 1)] = betas[i];
            t[(i + 1, i)] = betas[i];
        }
    }
    let eig = SymmetricEigen::new(t);
    let mut best = 0;
    for i in 1..k {
        if eig.eigenvalues[i] > eig.eigenvalues[best] {
            best = i;
        }
    }
    (eig.eigenvalues[best], eig.eigenvectors[(k - 1, best)])
}

/// 완전 재직교화를 쓰는 Lanczos (최대 고유값 하나만)
fn lanczos_top(matrix: &CsMat<f64>, tol: f64, max_steps: usize) -> SphereResult<LanczosRun> {
    let n = matrix.rows();
    if n == 0 || matrix.cols() != n {
        return Err(SphereError::shape(format!(
            "eigenvalue estimation needs a non-empty square matrix, got {}x{}",
            n,
            matrix.cols()
        )));
    }
    let steps = max_steps.min(n).max(1);

    let mut rng = StdRng::seed_from_u64(LANCZOS_SEED);
    let start = Array1::from_shape_fn(n, |_| rng.gen::<f64>() - 0.5);
    let norm = start.dot(&start).sqrt();
    let mut basis: Vec<Array1<f64>> = vec![start / norm];
    let mut alphas: Vec<f64> = Vec::with_capacity(steps);
    let mut betas: Vec<f64> = Vec::with_capacity(steps);

    let mut run = LanczosRun { ritz: 0.0, residual: f64::INFINITY, iterations: 0, converged: false };

    for j in 0..steps {
        let mut w = csr_matvec(matrix, &basis[j]);
        let alpha = w.dot(&basis[j]);
        w.scaled_add(-alpha, &basis[j]);
        if j > 0 {
            w.scaled_add(-betas[j - 1], &basis[j - 1]);
        }
        // 두 번 반복하는 완전 재직교화
        for _ in 0..2 {
            for b in &basis {
                let c = w.dot(b);
                w.scaled_add(-c, b);
            }
        }
        let beta = w.dot(&w).sqrt();
        alphas.push(alpha);

        let (theta, last) = tridiagonal_top(&alphas, &betas);
        run.ritz = theta;
        run.residual = beta * last.abs();
        run.iterations = j + 1;

        let exhausted = beta < BREAKDOWN || j + 1 == n;
        if run.residual <= tol * theta.abs().max(f64::EPSILON) || exhausted {
            run.converged = true;
            break;
        }

        betas.push(beta);
        basis.push(w / beta);
    }

    Ok(run)
}
