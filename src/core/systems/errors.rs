//! # 오류 체계
//!
//! 구성 단계 오류는 생성 시점에, 형상 오류는 첫 호출 시점에 발생하며 복구하지 않는다.
//! 수치 경고는 오류가 아닌 값으로 전달된다.

use std::fmt;
use thiserror::Error;

/// 구면 U-Net 라이브러리의 최상위 오류 타입
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SphereError {
    /// 잘못된 해상도, 커널 크기, 출력 채널 수 등
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 라플라시안과 신호, 또는 레이어 간 텐서 크기 불일치
    #[error("shape error: {0}")]
    Shape(String),

    /// 고유값 추정 실패처럼 복구 불가능한 수치 문제
    #[error("numerical error: {0}")]
    Numerical(String),

    /// 의도적으로 구현하지 않은 경로
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type SphereResult<T> = Result<T, SphereError>;

impl SphereError {
    pub fn config(msg: impl Into<String>) -> Self {
        SphereError::Configuration(msg.into())
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        SphereError::Shape(msg.into())
    }
}

/// 복구 가능한 수치 경고
///
/// λmax 추정이 허용 오차 안에서 수렴하지 않았을 때 생성된다.
/// 호출자는 더 큰 안전 여유를 적용한 추정값으로 계속 진행한다.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericalWarning {
    /// 경고가 발생한 위치 (예: "lambda_max nside=4")
    pub context: String,
    pub message: String,
    /// 폴백으로 사용한 추정값
    pub estimate: f64,
    /// 마지막 Ritz 잔차
    pub residual: f64,
}

impl fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (estimate={:.6}, residual={:.3e})",
            self.context, self.message, self.estimate, self.residual
        )
    }
}
