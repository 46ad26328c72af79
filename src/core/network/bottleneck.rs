//! 병목: 채널별 코드 합산 후 ELU

use ndarray::Array3;

use crate::core::layers::elu_inplace;
use crate::core::systems::errors::{SphereError, SphereResult};
use crate::core::types::SphereFloat;

#[derive(Debug, Clone, Copy, Default)]
pub struct Bottleneck;

impl Bottleneck {
    pub fn new() -> Self {
        Self
    }

    pub fn forward<T: SphereFloat>(&self, codes: &[&Array3<T>]) -> SphereResult<Array3<T>> {
        let (first, rest) = codes
            .split_first()
            .ok_or_else(|| SphereError::shape("bottleneck received no encoder codes"))?;
        let mut sum = (*first).clone();
        for code in rest {
            if code.dim() != sum.dim() {
                return Err(SphereError::shape(format!(
                    "encoder codes disagree: {:?} vs {:?}",
                    sum.dim(),
                    code.dim()
                )));
            }
            sum += *code;
        }
        elu_inplace(&mut sum);
        Ok(sum)
    }
}
