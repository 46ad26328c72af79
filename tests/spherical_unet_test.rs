use anyhow::Result;
use ndarray::Array3;
use std::collections::VecDeque;

use sphere_unet::core::graph::{GraphBuilder, SphereGraph};
use sphere_unet::core::healpix::{children, parent};
use sphere_unet::{AnyModel, ModelConfig, Precision, SphericalUNet};

/// 집합에서 `hops` 이내의 화소들
fn expand(graph: &SphereGraph, set: &[bool], hops: usize) -> Vec<bool> {
    let mut dist = vec![usize::MAX; set.len()];
    let mut queue = VecDeque::new();
    for (p, &inside) in set.iter().enumerate() {
        if inside {
            dist[p] = 0;
            queue.push_back(p);
        }
    }
    while let Some(p) = queue.pop_front() {
        if dist[p] == hops {
            continue;
        }
        for q in graph.neighbours_of(p) {
            if dist[q] == usize::MAX {
                dist[q] = dist[p] + 1;
                queue.push_back(q);
            }
        }
    }
    dist.iter().map(|&d| d != usize::MAX).collect()
}

fn pooled(set: &[bool]) -> Vec<bool> {
    let mut out = vec![false; set.len() / 4];
    for (p, &inside) in set.iter().enumerate() {
        if inside {
            out[parent(p as u64) as usize] = true;
        }
    }
    out
}

fn unpooled(set: &[bool]) -> Vec<bool> {
    let mut out = vec![false; set.len() * 4];
    for (p, &inside) in set.iter().enumerate() {
        if inside {
            for c in children(p as u64) {
                out[c as usize] = true;
            }
        }
    }
    out
}

#[test]
fn 출력_형상_테스트() -> Result<()> {
    println!("=== 모델 출력 형상 테스트 ===");
    for nside in [2u32, 4, 8] {
        let config = ModelConfig::uniform(3, nside, 3, 4).with_seed(nside as u64);
        let model = SphericalUNet::<f32>::new(&config)?;
        let npix = 12 * (nside * nside) as usize;
        for batch in [1usize, 2] {
            let x = Array3::<f32>::from_elem((batch, 3, npix), 0.5);
            let y = model.forward(x.view())?;
            assert_eq!(y.dim(), (batch, 1, npix));
        }
        println!("  nside={} 레벨={} 파라미터={}", nside, model.levels().len(), model.parameter_count());
    }
    println!("✅ 모델 출력 형상 테스트 통과");
    Ok(())
}

#[test]
fn 종단간_국소성_테스트() -> Result<()> {
    println!("=== 종단간 국소성 테스트 ===");
    let kernel_size = 3;
    let config = ModelConfig {
        precision: Precision::Double,
        ..ModelConfig::uniform(2, 2, kernel_size, 4).with_seed(7)
    };
    let model = SphericalUNet::<f64>::new(&config)?;
    let graph = GraphBuilder::for_nside(2)?.build()?;
    let hops = kernel_size - 1;

    let base = Array3::<f64>::ones((1, 2, 48));
    let y0 = model.forward(base.view())?;
    assert_eq!(y0.dim(), (1, 1, 48));
    assert!(y0.iter().all(|v| v.is_finite()));

    let eps = 1e-3;
    for (channel, source) in [(0usize, 5usize), (1, 30), (0, 47)] {
        let mut perturbed = base.clone();
        perturbed[[0, channel, source]] += eps;
        let y1 = model.forward(perturbed.view())?;

        // conv·conv → 스킵, pool → 병목 → unpool → conv1 (+스킵) → conv2
        let mut seed = vec![false; 48];
        seed[source] = true;
        let skip = expand(&graph, &expand(&graph, &seed, hops), hops);
        let up = unpooled(&pooled(&skip));
        let merged: Vec<bool> = expand(&graph, &up, hops)
            .iter()
            .zip(&skip)
            .map(|(&a, &b)| a || b)
            .collect();
        let reachable = expand(&graph, &merged, hops);

        let mut changed = 0;
        for p in 0..48 {
            let delta = (y1[[0, 0, p]] - y0[[0, 0, p]]).abs();
            if delta > 1e-6 {
                changed += 1;
                assert!(reachable[p], "화소 {} 가 {} 의 의존 영역 밖에서 변함 ({:.3e})", p, source, delta);
            }
        }
        assert!(changed > 0);
        println!(
            "  채널 {} 화소 {}: 변화 {} / 허용 {}",
            channel,
            source,
            changed,
            reachable.iter().filter(|&&r| r).count()
        );
    }
    println!("✅ 종단간 국소성 테스트 통과");
    Ok(())
}

#[test]
fn 배정밀도_모델_테스트() -> Result<()> {
    let config = ModelConfig { precision: Precision::Double, ..ModelConfig::uniform(2, 4, 3, 4).with_seed(3) };
    let model = AnyModel::from_config(&config)?;
    assert!(matches!(model, AnyModel::F64(_)));
    assert_eq!(model.config().nside, 4);

    let x = Array3::<f64>::from_shape_fn((2, 2, 192), |(b, c, p)| ((b + c + p) % 7) as f64 / 7.0);
    let y = model.forward(x.view())?;
    assert_eq!(y.dim(), (2, 1, 192));
    assert!(y.iter().all(|v| v.is_finite()));
    Ok(())
}

#[test]
fn json_설정_모델_생성_테스트() -> Result<()> {
    let json = r#"{
        "in_channels": 2,
        "nside": 4,
        "laplacian_kind": "combinatorial",
        "kernel_size": 2,
        "feature_widths": [3, 6],
        "pooling": "max",
        "seed": 99
    }"#;
    let config = ModelConfig::from_json_str(json)?;
    let model = AnyModel::from_config(&config)?;
    let y = model.forward(Array3::<f64>::zeros((1, 2, 192)).view())?;
    assert_eq!(y.dim(), (1, 1, 192));
    Ok(())
}
