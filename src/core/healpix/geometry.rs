//! # HEALPix 중첩(nested) 순서 기하
//!
//! 화소 번호 ↔ (ix, iy, face) 변환, 화소 중심 단위 벡터, 8-이웃 조회.
//! 링(ring) 순서는 다루지 않는다. 재정렬은 호출자의 책임이다.

use std::f64::consts::FRAC_PI_2;

use super::resolution::{ResolutionLevel, BRANCHING};
use crate::core::systems::errors::{SphereError, SphereResult};

/// 면별 링 번호 기준값
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// 면별 경도 기준값
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

// 이웃 순서: SW, W, NW, N, NE, E, SE, S
const NB_XOFFSET: [i64; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];
const NB_YOFFSET: [i64; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

/// 면 경계를 넘을 때의 이웃 면. 행: 넘어간 방향(nbnum), 열: 현재 면
const NB_FACEARRAY: [[i64; 12]; 9] = [
    [8, 9, 10, 11, -1, -1, -1, -1, 10, 11, 8, 9], // S
    [5, 6, 7, 4, 8, 9, 10, 11, 9, 10, 11, 8],     // SE
    [-1, -1, -1, -1, 5, 6, 7, 4, -1, -1, -1, -1], // E
    [4, 5, 6, 7, 11, 8, 9, 10, 11, 8, 9, 10],     // SW
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],       // center
    [1, 2, 3, 0, 0, 1, 2, 3, 5, 6, 7, 4],         // NE
    [-1, -1, -1, -1, 7, 4, 5, 6, -1, -1, -1, -1], // W
    [3, 0, 1, 2, 3, 0, 1, 2, 4, 5, 6, 7],         // NW
    [2, 3, 0, 1, -1, -1, -1, -1, 0, 1, 2, 3],     // N
];

/// 면 경계를 넘을 때의 좌표 변환 비트 (1: x 반전, 2: y 반전, 4: x↔y 교환)
/// 열: 북극/적도/남극 면 그룹
const NB_SWAPARRAY: [[u8; 3]; 9] = [
    [0, 0, 3], // S
    [0, 0, 6], // SE
    [0, 0, 0], // E
    [0, 0, 5], // SW
    [0, 0, 0], // center
    [5, 0, 0], // NE
    [0, 0, 0], // W
    [6, 0, 0], // NW
    [3, 0, 0], // N
];

/// 이웃이 없는 방향의 표식
pub const NO_NEIGHBOUR: i64 = -1;

#[inline]
fn spread_bits(v: u64) -> u64 {
    let mut out = 0u64;
    for i in 0..32 {
        out |= ((v >> i) & 1) << (2 * i);
    }
    out
}

#[inline]
fn compress_bits(v: u64) -> u64 {
    let mut out = 0u64;
    for i in 0..32 {
        out |= ((v >> (2 * i)) & 1) << i;
    }
    out
}

fn check_pixel(level: ResolutionLevel, pix: u64) -> SphereResult<()> {
    if pix as usize >= level.npix() {
        return Err(SphereError::shape(format!(
            "pixel {} out of range for {} ({} pixels)",
            pix,
            level,
            level.npix()
        )));
    }
    Ok(())
}

/// 중첩 번호 → (ix, iy, face)
pub fn nest_to_xyf(level: ResolutionLevel, pix: u64) -> SphereResult<(i64, i64, usize)> {
    check_pixel(level, pix)?;
    let order = level.order();
    let face = (pix >> (2 * order)) as usize;
    let within = pix & (level.pixels_per_face() as u64 - 1);
    let ix = compress_bits(within) as i64;
    let iy = compress_bits(within >> 1) as i64;
    Ok((ix, iy, face))
}

/// (ix, iy, face) → 중첩 번호
pub fn xyf_to_nest(level: ResolutionLevel, ix: i64, iy: i64, face: usize) -> u64 {
    let order = level.order();
    ((face as u64) << (2 * order)) + spread_bits(ix as u64) + (spread_bits(iy as u64) << 1)
}

/// 화소 중심의 3차원 단위 벡터
pub fn pix_to_vec(level: ResolutionLevel, pix: u64) -> SphereResult<[f64; 3]> {
    let (ix, iy, face) = nest_to_xyf(level, pix)?;
    let nside = level.nside() as i64;
    let fact2 = 4.0 / level.npix() as f64;
    let fact1 = (2 * nside) as f64 * fact2;

    let jr = (JRLL[face] << level.order()) - ix - iy - 1;

    let (nr, z, sth) = if jr < nside {
        let nr = jr;
        let tmp = (nr * nr) as f64 * fact2;
        (nr, 1.0 - tmp, (tmp * (2.0 - tmp)).sqrt())
    } else if jr > 3 * nside {
        let nr = 4 * nside - jr;
        let tmp = (nr * nr) as f64 * fact2;
        (nr, tmp - 1.0, (tmp * (2.0 - tmp)).sqrt())
    } else {
        let z = (2 * nside - jr) as f64 * fact1;
        (nside, z, ((1.0 - z) * (1.0 + z)).sqrt())
    };

    let mut tmp = JPLL[face] * nr + ix - iy;
    if tmp < 0 {
        tmp += 8 * nr;
    }
    let phi = if nr == nside {
        0.75 * FRAC_PI_2 * tmp as f64 * fact1
    } else {
        (0.5 * FRAC_PI_2 * tmp as f64) / nr as f64
    };

    Ok([sth * phi.cos(), sth * phi.sin(), z])
}

/// 레벨의 모든 화소 중심 좌표 (중첩 순서)
pub fn all_pixel_vectors(level: ResolutionLevel) -> SphereResult<Vec<[f64; 3]>> {
    (0..level.npix() as u64).map(|p| pix_to_vec(level, p)).collect()
}

/// 8방향 이웃 (SW, W, NW, N, NE, E, SE, S)
///
/// 7개 이웃만 가진 화소는 해당 방향에 `NO_NEIGHBOUR` (-1)를 돌려준다.
pub fn neighbours(level: ResolutionLevel, pix: u64) -> SphereResult<[i64; 8]> {
    let (ix, iy, face) = nest_to_xyf(level, pix)?;
    let nside = level.nside() as i64;
    let nsm1 = nside - 1;
    let mut result = [NO_NEIGHBOUR; 8];

    if ix > 0 && ix < nsm1 && iy > 0 && iy < nsm1 {
        for m in 0..8 {
            result[m] = xyf_to_nest(level, ix + NB_XOFFSET[m], iy + NB_YOFFSET[m], face) as i64;
        }
        return Ok(result);
    }

    for m in 0..8 {
        let mut x = ix + NB_XOFFSET[m];
        let mut y = iy + NB_YOFFSET[m];
        let mut nbnum: usize = 4;
        if x < 0 {
            x += nside;
            nbnum -= 1;
        } else if x >= nside {
            x -= nside;
            nbnum += 1;
        }
        if y < 0 {
            y += nside;
            nbnum -= 3;
        } else if y >= nside {
            y -= nside;
            nbnum += 3;
        }

        let f = NB_FACEARRAY[nbnum][face];
        if f < 0 {
            continue;
        }
        let bits = NB_SWAPARRAY[nbnum][face >> 2];
        if bits & 1 != 0 {
            x = nside - x - 1;
        }
        if bits & 2 != 0 {
            y = nside - y - 1;
        }
        if bits & 4 != 0 {
            std::mem::swap(&mut x, &mut y);
        }
        result[m] = xyf_to_nest(level, x, y, f as usize) as i64;
    }
    Ok(result)
}

/// 한 단계 거친 레벨의 부모 화소
#[inline]
pub fn parent(pix: u64) -> u64 {
    pix / BRANCHING as u64
}

/// 한 단계 세밀한 레벨의 자식 화소 4개 (연속 구간)
#[inline]
pub fn children(pix: u64) -> [u64; 4] {
    let first = pix * BRANCHING as u64;
    [first, first + 1, first + 2, first + 3]
}

/// 두 단위 벡터 사이의 제곱 유클리드 거리
#[inline]
pub fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
