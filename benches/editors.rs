use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use helio_tools_rs::image_pipeline::{
    BrightestPixelPatchEditor, EditorContext, EditorData, EditorPipeline, Header,
    MapToArrayEditor, MinMaxQuantileNormalizeEditor, NormalizeRadiusEditor, PatchConfig,
    RadiusConfig, SolarMap, StoreConfig, TiffCompression, TiffMapStore,
};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Square map of side `size` with a limb-darkened disk filling 80% of it.
fn generate_mock_map(size: usize) -> SolarMap {
    let center = (size as f64 - 1.0) / 2.0;
    let radius = 0.4 * size as f64;
    let data = Array2::from_shape_fn((size, size), |(r, c)| {
        let d = ((c as f64 - center).powi(2) + (r as f64 - center).powi(2)).sqrt() / radius;
        if d <= 1.0 {
            (1000.0 * (1.0 - d * d).sqrt() + ((r * 7 + c * 13) % 50) as f64) as f32
        } else {
            f32::NAN
        }
    });
    let header = Header::new()
        .with("CRPIX1", center + 1.0)
        .with("CRPIX2", center + 1.0)
        .with("CDELT1", 1.2)
        .with("CDELT2", 1.2)
        .with("RSUN_OBS", radius * 1.2)
        .with("CROTA2", 0.3);
    SolarMap::new(data, header)
}

fn benchmark_radius_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_radius_by_size");
    group.sample_size(10);

    for size in [128usize, 256, 512] {
        let map = generate_mock_map(size);
        let pipeline = EditorPipeline::new().with(NormalizeRadiusEditor::new(
            RadiusConfig::builder().resolution(size / 2).build(),
        ));

        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let _ = pipeline.run(
                    black_box(EditorData::Map(map.clone())),
                    EditorContext::new(),
                    &mut rng,
                );
            });
        });
    }

    group.finish();
}

fn benchmark_spline_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline_order");
    group.sample_size(10);
    let map = generate_mock_map(256);

    for order in [0usize, 1, 3, 4] {
        let pipeline = EditorPipeline::new().with(NormalizeRadiusEditor::new(
            RadiusConfig::builder().resolution(128).order(order).build(),
        ));

        group.bench_function(BenchmarkId::from_parameter(order), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let _ = pipeline.run(
                    black_box(EditorData::Map(map.clone())),
                    EditorContext::new(),
                    &mut rng,
                );
            });
        });
    }

    group.finish();
}

fn benchmark_patch_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch_pipeline");
    let map = generate_mock_map(256);

    for (probability, label) in [(0.0, "extremum"), (1.0, "random")] {
        let pipeline = EditorPipeline::new()
            .with(MapToArrayEditor)
            .with(MinMaxQuantileNormalizeEditor)
            .with(BrightestPixelPatchEditor::new(
                PatchConfig::builder()
                    .patch_shape(64, 64)
                    .random_selection(probability)
                    .build(),
            ));

        group.bench_function(label, |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let _ = pipeline.run(
                    black_box(EditorData::Map(map.clone())),
                    EditorContext::new(),
                    &mut rng,
                );
            });
        });
    }

    group.finish();
}

fn benchmark_compression_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_methods");
    let map = generate_mock_map(512);

    let compressions = [
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateFast, "deflate_fast"),
        (TiffCompression::DeflateBest, "deflate_best"),
    ];

    for (compression, label) in compressions {
        let store = TiffMapStore::new(StoreConfig::builder().compression(compression).build());

        group.bench_with_input(BenchmarkId::from_parameter(label), &map, |b, map| {
            b.iter(|| {
                let mut output = Vec::new();
                let _ = store.encode(black_box(map), &mut output);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_radius_by_size,
    benchmark_spline_order,
    benchmark_patch_pipeline,
    benchmark_compression_methods
);
criterion_main!(benches);
