use super::{graph, hop_distances, operator};
use crate::core::layers::*;
use crate::core::systems::errors::SphereError;
use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array3, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_signal(batch: usize, pixels: usize, channels: usize, seed: u64) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((batch, pixels, channels), |_| rng.gen_range(-1.0..1.0))
}

#[test]
fn 체비쇼프_기저_재귀_테스트() {
    let lap = operator::<f64>(2);
    let mut rng = StdRng::seed_from_u64(1);
    let conv = ChebConv::new(lap.clone(), 3, 2, 3, true, &mut rng).unwrap();

    let x = random_signal(2, 48, 3, 11);
    let basis = conv.chebyshev_basis(x.view()).unwrap();
    assert_eq!(basis.dim(), (3, 2, 48, 3));

    let t1 = lap.apply(x.view()).unwrap();
    let t2 = lap.apply(t1.view()).unwrap() * 2.0 - &x;
    for (k, expected) in [&x, &t1, &t2].iter().enumerate() {
        let got = basis.index_axis(Axis(0), k);
        for (a, b) in got.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
        }
    }
    println!("✅ 체비쇼프 기저 재귀 테스트 통과");
}

#[test]
fn 합성곱_출력_공식_테스트() {
    let lap = operator::<f64>(1);
    let mut rng = StdRng::seed_from_u64(2);
    let conv = ChebConv::new(lap, 2, 3, 3, true, &mut rng).unwrap();
    let x = random_signal(1, 12, 2, 5);

    let basis = conv.chebyshev_basis(x.view()).unwrap();
    let y = conv.forward(x.view()).unwrap();
    assert_eq!(y.dim(), (1, 12, 3));

    let w = conv.weight();
    let bias = conv.bias().unwrap();
    for p in 0..12 {
        for o in 0..3 {
            let mut expected = bias[o];
            for k in 0..3 {
                for i in 0..2 {
                    expected += basis[[k, 0, p, i]] * w[[k, i, o]];
                }
            }
            assert_abs_diff_eq!(y[[0, p, o]], expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn 초기화_분포_테스트() {
    let lap = operator::<f64>(1);
    let mut rng = StdRng::seed_from_u64(3);
    let (fin, fout, k) = (64, 64, 4);
    let conv = ChebConv::new(lap.clone(), fin, fout, k, true, &mut rng).unwrap();

    let w = conv.weight();
    assert_eq!(w.dim(), (k, fin, fout));
    let n = w.len() as f64;
    let mean = w.sum() / n;
    let std = (w.mapv(|v| (v - mean).powi(2)).sum() / n).sqrt();
    let target = ChebConv::<f64>::init_std(fin, k);
    assert_abs_diff_eq!(target, 1.0 / (64.0f64 * 4.5 / 2.0).sqrt(), epsilon = 1e-12);
    assert!(mean.abs() < 0.01, "평균 {}", mean);
    assert!((std - target).abs() < 0.05 * target, "표준편차 {} vs {}", std, target);

    assert!(conv.bias().unwrap().iter().all(|&b| b == BIAS_INIT));
    assert_eq!(conv.parameter_count(), k * fin * fout + fout);

    let no_bias = ChebConv::<f64>::new(lap, 2, 2, 2, false, &mut rng).unwrap();
    assert!(no_bias.bias().is_none());
    assert_eq!(no_bias.parameter_count(), 8);
    println!("✅ 초기화 분포 테스트 통과");
}

#[test]
fn k_1_홉_국소성_테스트() {
    let g = graph(4);
    let lap = operator::<f64>(4);
    let mut rng = StdRng::seed_from_u64(4);

    for k in 1..=4 {
        let conv = ChebConv::new(lap.clone(), 1, 2, k, true, &mut rng).unwrap();
        let base = random_signal(1, 192, 1, 21);
        let y0 = conv.forward(base.view()).unwrap();

        let source = 77;
        let mut perturbed = base.clone();
        perturbed[[0, source, 0]] += 1.0;
        let y1 = conv.forward(perturbed.view()).unwrap();

        let dist = hop_distances(&g, source);
        let mut changed_far = 0;
        let mut changed_near = 0;
        for p in 0..192 {
            let moved = (0..2).any(|o| (y1[[0, p, o]] - y0[[0, p, o]]).abs() > 1e-12);
            if moved {
                if dist[p] > k - 1 {
                    changed_far += 1;
                } else {
                    changed_near += 1;
                }
            }
        }
        assert_eq!(changed_far, 0, "K={} 에서 {}홉 밖 화소가 변함", k, k - 1);
        assert!(changed_near > 0);
    }
    println!("✅ K-1 홉 국소성 테스트 통과");
}

#[test]
fn 잘못된_구성_거부_테스트() {
    let lap = operator::<f32>(1);
    let mut rng = StdRng::seed_from_u64(5);
    assert!(matches!(
        ChebConv::new(lap.clone(), 2, 2, 0, true, &mut rng),
        Err(SphereError::Configuration(_))
    ));
    assert!(matches!(
        ChebConv::new(lap.clone(), 0, 2, 2, true, &mut rng),
        Err(SphereError::Configuration(_))
    ));
    assert!(matches!(
        ChebConv::from_weights(lap.clone(), Array3::zeros((2, 2, 3)), Some(Array1::zeros(2))),
        Err(SphereError::Configuration(_))
    ));

    let conv = ChebConv::new(lap, 2, 2, 2, true, &mut rng).unwrap();
    let wrong_pixels = Array3::<f32>::zeros((1, 48, 2));
    assert!(matches!(conv.forward(wrong_pixels.view()), Err(SphereError::Shape(_))));
    let wrong_channels = Array3::<f32>::zeros((1, 12, 3));
    assert!(matches!(conv.forward(wrong_channels.view()), Err(SphereError::Shape(_))));
}

#[test]
fn 가중치_갱신_반영_테스트() {
    let lap = operator::<f32>(1);
    let mut rng = StdRng::seed_from_u64(6);
    let mut conv = ChebConv::new(lap, 1, 1, 2, true, &mut rng).unwrap();
    conv.weight_mut().fill(0.0);
    if let Some(b) = conv.bias_mut() {
        b.fill(0.5);
    }
    let y = conv.forward(Array3::<f32>::ones((2, 12, 1)).view()).unwrap();
    assert!(y.iter().all(|&v| v == 0.5));
}
