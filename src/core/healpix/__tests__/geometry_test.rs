use crate::core::healpix::*;
use approx::assert_abs_diff_eq;
use std::collections::HashSet;

fn level(nside: u32) -> ResolutionLevel {
    ResolutionLevel::new(nside).unwrap()
}

#[test]
fn 기본_타일링_화소_중심_테스트() {
    let base = level(1);

    // 면 0, 4, 8 의 중심: z = 2/3, 0, -2/3
    let north = pix_to_vec(base, 0).unwrap();
    let equator = pix_to_vec(base, 4).unwrap();
    let south = pix_to_vec(base, 8).unwrap();

    assert_abs_diff_eq!(north[2], 2.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(equator[2], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(south[2], -2.0 / 3.0, epsilon = 1e-12);

    // 면 0 의 경도는 π/4, 면 4 는 0
    assert_abs_diff_eq!(north[1].atan2(north[0]), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    assert_abs_diff_eq!(equator[1].atan2(equator[0]), 0.0, epsilon = 1e-12);

    println!("✅ 기본 타일링 화소 중심 테스트 통과");
}

#[test]
fn 단위_벡터_테스트() {
    for nside in [1, 2, 4, 8, 16] {
        let vectors = all_pixel_vectors(level(nside)).unwrap();
        assert_eq!(vectors.len(), 12 * (nside as usize).pow(2));
        for v in &vectors {
            let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);
        }
        // 같은 위치의 화소는 없어야 함
        let distinct: HashSet<(i64, i64, i64)> = vectors
            .iter()
            .map(|v| ((v[0] * 1e9) as i64, (v[1] * 1e9) as i64, (v[2] * 1e9) as i64))
            .collect();
        assert_eq!(distinct.len(), vectors.len(), "nside={} 에서 중복 화소 중심", nside);
    }
    println!("✅ 단위 벡터 테스트 통과");
}

#[test]
fn xyf_왕복_변환_테스트() {
    let lv = level(8);
    for pix in 0..lv.npix() as u64 {
        let (ix, iy, face) = nest_to_xyf(lv, pix).unwrap();
        assert!(face < 12);
        assert!(ix >= 0 && ix < 8 && iy >= 0 && iy < 8);
        assert_eq!(xyf_to_nest(lv, ix, iy, face), pix);
    }
    assert!(nest_to_xyf(lv, lv.npix() as u64).is_err());
}

#[test]
fn 이웃_대칭성_테스트() {
    for nside in [1, 2, 4, 8] {
        let lv = level(nside);
        for pix in 0..lv.npix() as u64 {
            let nbrs = neighbours(lv, pix).unwrap();
            for &n in nbrs.iter().filter(|&&n| n != NO_NEIGHBOUR) {
                assert!(n >= 0 && (n as usize) < lv.npix());
                assert_ne!(n as u64, pix, "자기 자신이 이웃일 수 없음");
                let back = neighbours(lv, n as u64).unwrap();
                assert!(
                    back.contains(&(pix as i64)),
                    "nside={}: {} → {} 이웃 관계가 대칭이 아님",
                    nside,
                    pix,
                    n
                );
            }
        }
    }
    println!("✅ 이웃 대칭성 테스트 통과");
}

#[test]
fn 칠_이웃_화소_개수_테스트() {
    // 세 면이 만나는 꼭짓점 8개 × 화소 3개 = 24개 화소가 이웃 7개
    for nside in [2, 4, 8] {
        let lv = level(nside);
        let mut seven = 0;
        for pix in 0..lv.npix() as u64 {
            let missing = neighbours(lv, pix)
                .unwrap()
                .iter()
                .filter(|&&n| n == NO_NEIGHBOUR)
                .count();
            assert!(missing <= 1, "nside={} pix={} 누락 이웃 {}", nside, pix, missing);
            if missing == 1 {
                seven += 1;
            }
        }
        assert_eq!(seven, 24, "nside={}", nside);
    }

    // nside=1 에서는 모든 화소가 서로 다른 유효 이웃 6개
    let base = level(1);
    for pix in 0..12u64 {
        let valid: HashSet<i64> = neighbours(base, pix)
            .unwrap()
            .iter()
            .copied()
            .filter(|&n| n != NO_NEIGHBOUR)
            .collect();
        assert_eq!(valid.len(), 6, "pix={}", pix);
    }
    println!("✅ 칠 이웃 화소 개수 테스트 통과");
}

#[test]
fn 내부_화소_이웃_거리_테스트() {
    // 이웃은 평균 화소 간격의 수 배 이내에 있어야 함
    let lv = level(8);
    let vectors = all_pixel_vectors(lv).unwrap();
    let spacing = (4.0 * std::f64::consts::PI / lv.npix() as f64).sqrt();
    for pix in 0..lv.npix() as u64 {
        for &n in neighbours(lv, pix).unwrap().iter().filter(|&&n| n != NO_NEIGHBOUR) {
            let d = squared_distance(&vectors[pix as usize], &vectors[n as usize]).sqrt();
            assert!(d < 2.5 * spacing, "pix={} n={} d={} spacing={}", pix, n, d, spacing);
        }
    }
}

#[test]
fn 부모_자식_계층_테스트() {
    assert_eq!(children(0), [0, 1, 2, 3]);
    assert_eq!(children(5), [20, 21, 22, 23]);
    for c in children(7) {
        assert_eq!(parent(c), 7);
    }

    // 자식 4개의 평균 방향은 부모 중심과 가깝다
    for parent_nside in [1u32, 2] {
        let coarse = level(parent_nside);
        let fine = level(parent_nside * 2);
        for p in 0..coarse.npix() as u64 {
            let pv = pix_to_vec(coarse, p).unwrap();
            let mut mean = [0.0; 3];
            for c in children(p) {
                let cv = pix_to_vec(fine, c).unwrap();
                for k in 0..3 {
                    mean[k] += cv[k];
                }
            }
            let norm = (mean[0] * mean[0] + mean[1] * mean[1] + mean[2] * mean[2]).sqrt();
            let cos = (mean[0] * pv[0] + mean[1] * pv[1] + mean[2] * pv[2]) / norm;
            let angle = cos.clamp(-1.0, 1.0).acos();
            assert!(angle < 0.3 / parent_nside as f64, "parent={} angle={}", p, angle);
        }
    }
    println!("✅ 부모 자식 계층 테스트 통과");
}
