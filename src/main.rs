use anyhow::Result;
use log::info;
use ndarray::Array3;
use std::time::Instant;

use sphere_unet::{ModelConfig, SphericalUNet};

fn main() -> Result<()> {
    env_logger::init();
    println!("구면 U-Net 순전파 리포트 시작...\n");

    let config = ModelConfig::uniform(2, 4, 3, 8).with_seed(2024);
    println!("설정:\n{}", config.to_json_string()?);

    let build_start = Instant::now();
    let model = SphericalUNet::<f32>::new(&config)?;
    let build_time = build_start.elapsed();

    println!("\n=== 레벨별 라플라시안 ===");
    for entry in model.laplacians().entries() {
        println!(
            "  {}: {} 화소, nnz={}, λmax={:.5} ({} 단계, 수렴={})",
            entry.level,
            entry.level.npix(),
            entry.operator.nnz(),
            entry.estimate.lambda_max,
            entry.estimate.iterations,
            entry.estimate.converged
        );
    }
    for warning in model.warnings() {
        println!("  ⚠️ {}", warning);
    }

    // 두 검출기의 합성 신호: 같은 저주파 패턴 + 서로 다른 고주파 잡음
    let npix = config.input_level()?.npix();
    let input = Array3::<f32>::from_shape_fn((1, config.in_channels, npix), |(_, c, p)| {
        let t = p as f32 / npix as f32;
        (6.0 * t).sin() + 0.1 * ((37 + 11 * c) as f32 * t).cos()
    });

    let forward_start = Instant::now();
    let output = model.forward(input.view())?;
    let forward_time = forward_start.elapsed();
    info!("순전파 출력 형상 {:?}", output.dim());

    let mean = output.mean().unwrap_or(0.0);
    println!("\n=== 순전파 ===");
    println!("  입력 형상: {:?}", input.dim());
    println!("  출력 형상: {:?}", output.dim());
    println!("  출력 평균: {:.6}", mean);
    println!("  파라미터 수: {}", model.parameter_count());
    println!("  모델 생성 시간: {:.2?}", build_time);
    println!("  순전파 시간: {:.2?}", forward_time);
    Ok(())
}
