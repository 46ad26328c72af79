//! # HEALPix 계층 화소화
//!
//! 해상도 레벨과 중첩 순서 화소 기하

pub mod resolution;
pub mod geometry;

#[cfg(test)]
mod __tests__;

pub use resolution::{ResolutionLevel, BRANCHING, MAX_NSIDE};
pub use geometry::{
    all_pixel_vectors, children, nest_to_xyf, neighbours, parent, pix_to_vec,
    squared_distance, xyf_to_nest, NO_NEIGHBOUR,
};
