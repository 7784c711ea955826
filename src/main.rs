use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use helio_tools_rs::image_pipeline::calibration::{self, CachedFileSource, CalibrationCache};
use helio_tools_rs::image_pipeline::{
    CalibrationMode, DegradationEditor, EditorContext, EditorData, EditorPipeline, LoadMapEditor,
    NormalizeRadiusEditor, RadiusConfig, SaveMapEditor,
};
use helio_tools_rs::logger;

use tracing::{error, info};

fn main() -> Result<()> {
    logger::init();

    info!("Starting helio_tools...");

    let mut args = env::args().skip(1);
    let (Some(input), Some(output_dir)) = (args.next(), args.next()) else {
        bail!("usage: helio_tools_rs <input.fits> <output-dir> [resolution]");
    };
    let resolution = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid resolution '{raw}'"))?,
        None => RadiusConfig::default().resolution,
    };
    let mode: CalibrationMode = env::var("HELIO_CALIBRATION")
        .unwrap_or_else(|_| CalibrationMode::default().to_string())
        .parse()?;

    let cache = calibration::init_global(CalibrationCache::new(CachedFileSource::new()?))?;
    let radius_config = RadiusConfig::builder().resolution(resolution).build();

    info!("Calibration: {}", mode);
    info!("Resolution: {}", radius_config.resolution);

    let pipeline = EditorPipeline::new()
        .with(LoadMapEditor::new())
        .with(DegradationEditor::new(mode, cache))
        .with(NormalizeRadiusEditor::new(radius_config))
        .with(SaveMapEditor::new(PathBuf::from(&output_dir)));

    let mut rng = rand::rng();
    match pipeline.run_with_timings(
        EditorData::Path(PathBuf::from(&input)),
        EditorContext::new(),
        &mut rng,
    ) {
        Ok((_, ctx, timings)) => {
            timings.log_summary();
            info!(
                "Normalized map written to {}",
                ctx.get_str("output_path").unwrap_or(&output_dir)
            );
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
