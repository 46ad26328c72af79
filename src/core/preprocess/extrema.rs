//! # 극값 통계 스캔
//!
//! 첫 작업을 먼저 단독 실행해 빠르게 실패를 확인한 뒤
//! 나머지를 제한된 작업자 풀에서 돌리고 채널로 결과를 모은다.

use std::sync::mpsc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::systems::errors::{SphereError, SphereResult};

/// 최소/최대 통계
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremaStats {
    pub min: f64,
    pub max: f64,
}

impl Default for ExtremaStats {
    fn default() -> Self {
        Self::empty()
    }
}

impl ExtremaStats {
    /// 병합 항등원
    pub fn empty() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    /// NaN 은 건너뛴다
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(Self::empty(), |acc, v| Self { min: acc.min.min(v), max: acc.max.max(v) })
    }

    pub fn merge(&self, other: &ExtremaStats) -> Self {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// 작업 단위 극값 스캐너
#[derive(Debug, Clone)]
pub struct ExtremaScanner {
    workers: usize,
}

impl Default for ExtremaScanner {
    fn default() -> Self {
        Self { workers: num_cpus::get().max(1) }
    }
}

impl ExtremaScanner {
    pub fn new(workers: usize) -> SphereResult<Self> {
        if workers == 0 {
            return Err(SphereError::config("extrema scanner needs at least one worker"));
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 작업 0..n_tasks 의 통계를 모아 하나로 병합
    pub fn scan<F>(&self, n_tasks: usize, task: F) -> SphereResult<ExtremaStats>
    where
        F: Fn(usize) -> SphereResult<ExtremaStats> + Sync + Send,
    {
        if n_tasks == 0 {
            return Ok(ExtremaStats::empty());
        }

        // 단독 실행 (실패 시 풀을 띄우지 않는다)
        let mut total = task(0)?;
        debug!("극값 스캔 작업 0: [{}, {}]", total.min, total.max);
        if n_tasks == 1 {
            return Ok(total);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| SphereError::config(format!("failed to start worker pool: {}", e)))?;

        let (sender, receiver) = mpsc::channel::<(usize, SphereResult<ExtremaStats>)>();
        pool.scope(|scope| {
            for index in 1..n_tasks {
                let sender = sender.clone();
                let task = &task;
                scope.spawn(move |_| {
                    // 수신 측이 먼저 끝난 경우 결과는 버린다
                    let _ = sender.send((index, task(index)));
                });
            }
        });
        drop(sender);

        let mut failure: Option<(usize, SphereError)> = None;
        for (index, result) in receiver {
            match result {
                Ok(stats) => total = total.merge(&stats),
                Err(e) => {
                    if failure.as_ref().map_or(true, |(i, _)| index < *i) {
                        failure = Some((index, e));
                    }
                }
            }
        }
        if let Some((_, e)) = failure {
            return Err(e);
        }

        info!("극값 스캔 완료: {} 작업, [{}, {}]", n_tasks, total.min, total.max);
        Ok(total)
    }
}
