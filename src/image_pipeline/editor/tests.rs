#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use approx::assert_relative_eq;
    use ndarray::{Array2, Array3, array};
    use rand::RngCore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::image_pipeline::calibration::cache::tests::MockSource;
    use crate::image_pipeline::calibration::{self, CalibrationCache, CalibrationMode};
    use crate::image_pipeline::common::error::{EditorError, Result};
    use crate::image_pipeline::editor::{
        BrightestPixelPatchEditor, ContrastNormalizeEditor, DarkestPixelPatchEditor,
        DegradationEditor, Editor, EditorContext, EditorData, EditorOutput, EditorPipeline,
        LoadMapEditor, MapToArrayEditor, MinMaxQuantileNormalizeEditor, NormalizeFnEditor,
        NormalizeRadiusEditor, SaveMapEditor, ShiftMeanEditor, StretchPixelEditor,
        WhiteningEditor,
    };
    use crate::image_pipeline::io::{FitsMapStore, ImageReader, ImageWriter};
    use crate::image_pipeline::map::{Header, SolarMap};
    use crate::image_pipeline::normalize::{Scale, Shift};
    use crate::image_pipeline::patch::PatchConfig;
    use crate::image_pipeline::scale::RadiusConfig;

    struct MockReader {
        should_fail: bool,
        mock_map: Option<SolarMap>,
    }

    impl ImageReader for MockReader {
        fn read_map(&self, path: &Path) -> Result<SolarMap> {
            if self.should_fail {
                return Err(EditorError::InputReadError(format!(
                    "Mock read error: {}",
                    path.display()
                )));
            }
            Ok(self.mock_map.clone().unwrap_or_else(disk_map))
        }
    }

    struct MockWriter {
        should_fail: bool,
        written: Arc<Mutex<Vec<(PathBuf, SolarMap)>>>,
    }

    impl ImageWriter for MockWriter {
        fn write_map(&self, map: &SolarMap, path: &Path) -> Result<()> {
            if self.should_fail {
                return Err(EditorError::OutputWriteError("Mock write error".to_string()));
            }
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), map.clone()));
            Ok(())
        }
    }

    /// Counts calls and optionally fails; adds its call number to the context.
    struct CountingEditor {
        label: &'static str,
        should_fail: bool,
        calls: Arc<Mutex<usize>>,
    }

    impl Editor for CountingEditor {
        fn name(&self) -> &str {
            self.label
        }

        fn call(
            &self,
            data: EditorData,
            _ctx: &EditorContext,
            _rng: &mut dyn RngCore,
        ) -> Result<EditorOutput> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.should_fail {
                return Err(EditorError::InvalidArgument("Mock editor error".to_string()));
            }
            Ok(EditorOutput::new(data).with("calls", *calls as i64))
        }
    }

    /// 200×200 AIA-like map with a flat disk of radius 75 pixels.
    fn disk_map() -> SolarMap {
        let data = Array2::from_shape_fn((200, 200), |(r, c)| {
            let (dx, dy) = (c as f64 - 99.5, r as f64 - 99.5);
            if (dx * dx + dy * dy).sqrt() <= 75.0 { 100.0 } else { f32::NAN }
        });
        let header = Header::new()
            .with("CRPIX1", 100.5)
            .with("CRPIX2", 100.5)
            .with("CDELT1", 2.0)
            .with("CDELT2", 2.0)
            .with("RSUN_OBS", 150.0)
            .with("EXPTIME", 2.0)
            .with("WAVELNTH", 171i64)
            .with("DATE-OBS", "2014-06-01T00:00:00.000");
        SolarMap::new(data, header)
    }

    fn small_map() -> SolarMap {
        SolarMap::new(
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            Header::new().with("WAVELNTH", 193i64),
        )
    }

    fn mock_cache() -> Arc<CalibrationCache> {
        Arc::new(CalibrationCache::new(MockSource::default()))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_load_sets_time_system_and_path() {
        let editor = LoadMapEditor::with_reader(MockReader {
            should_fail: false,
            mock_map: Some(small_map()),
        });
        let (data, ctx) = editor
            .convert(
                EditorData::Path(PathBuf::from("/data/171/2014-06-01T00:00:00.fits")),
                EditorContext::new(),
                &mut rng(),
            )
            .unwrap();

        let EditorData::Map(map) = data else {
            panic!("expected a map");
        };
        assert_eq!(map.header.get("TIMESYS").and_then(|v| v.as_str()), Some("TAI"));
        assert_eq!(
            ctx.get_str("path"),
            Some("/data/171/2014-06-01T00:00:00.fits")
        );
    }

    #[test]
    fn test_reader_failure() {
        let editor = LoadMapEditor::with_reader(MockReader {
            should_fail: true,
            mock_map: None,
        });
        let result = editor.call(
            EditorData::Path(PathBuf::from("missing.fits")),
            &EditorContext::new(),
            &mut rng(),
        );
        assert!(matches!(result.unwrap_err(), EditorError::InputReadError(_)));
    }

    #[test]
    fn test_full_pipeline() {
        let pipeline = EditorPipeline::new()
            .with(LoadMapEditor::with_reader(MockReader {
                should_fail: false,
                mock_map: None,
            }))
            .with(DegradationEditor::new(CalibrationMode::None, mock_cache()))
            .with(NormalizeRadiusEditor::new(
                RadiusConfig::builder().resolution(64).build(),
            ))
            .with(MapToArrayEditor)
            .with(MinMaxQuantileNormalizeEditor)
            .with(DarkestPixelPatchEditor::new(
                PatchConfig::builder()
                    .patch_shape(16, 16)
                    .random_selection(0.0)
                    .build(),
            ));
        assert_eq!(
            pipeline.names(),
            [
                "load_map",
                "degradation",
                "normalize_radius",
                "map_to_array",
                "min_max_quantile_normalize",
                "darkest_pixel_patch"
            ]
        );

        let (data, ctx) = pipeline
            .run(
                EditorData::Path(PathBuf::from("/data/aia_171.fits")),
                EditorContext::new(),
                &mut rng(),
            )
            .unwrap();

        let EditorData::Array(patch) = data else {
            panic!("expected an array");
        };
        assert_eq!(patch.dim(), (1, 16, 16));
        assert!(patch.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(ctx.get_str("path"), Some("/data/aia_171.fits"));
    }

    #[test]
    fn test_run_with_timings_records_every_editor() {
        let calls = Arc::new(Mutex::new(0));
        let pipeline = EditorPipeline::new()
            .with(CountingEditor {
                label: "first",
                should_fail: false,
                calls: calls.clone(),
            })
            .with(WhiteningEditor)
            .with(CountingEditor {
                label: "first",
                should_fail: false,
                calls: calls.clone(),
            });

        let (_, ctx, timings) = pipeline
            .run_with_timings(EditorData::Map(small_map()), EditorContext::new(), &mut rng())
            .unwrap();

        let names: Vec<&str> = timings.entries().iter().map(|e| e.editor.as_str()).collect();
        assert_eq!(names, ["first", "whitening", "first"]);
        assert!(timings.for_editor("first").is_some());
        assert_eq!(*calls.lock().unwrap(), 2);
        // The later call overrides the earlier context entry.
        assert_eq!(ctx.get("calls").and_then(|v| v.as_i64()), Some(2));
    }

    #[test]
    fn test_failure_aborts_pipeline() {
        let calls = Arc::new(Mutex::new(0));
        let pipeline = EditorPipeline::new()
            .with(CountingEditor {
                label: "broken",
                should_fail: true,
                calls: calls.clone(),
            })
            .with(CountingEditor {
                label: "never",
                should_fail: false,
                calls: calls.clone(),
            });

        let result = pipeline.run(EditorData::Map(small_map()), EditorContext::new(), &mut rng());
        assert!(matches!(result.unwrap_err(), EditorError::InvalidArgument(_)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_context_is_kept_across_editors() {
        let pipeline = EditorPipeline::new().with(StretchPixelEditor);
        let ctx = EditorContext::new().with("path", "/data/a.fits");
        let (_, ctx) = pipeline
            .run(EditorData::Map(small_map()), ctx, &mut rng())
            .unwrap();
        assert_eq!(ctx.get_str("path"), Some("/data/a.fits"));
    }

    #[test]
    fn test_unexpected_data() {
        let result = MapToArrayEditor.call(
            EditorData::Path(PathBuf::from("a.fits")),
            &EditorContext::new(),
            &mut rng(),
        );
        assert!(matches!(
            result.unwrap_err(),
            EditorError::UnexpectedData { expected: "array", found: "path", .. }
        ));

        let result = NormalizeRadiusEditor::default().call(
            EditorData::Array(Array3::zeros((1, 4, 4))),
            &EditorContext::new(),
            &mut rng(),
        );
        assert!(matches!(
            result.unwrap_err(),
            EditorError::UnexpectedData { expected: "map", found: "array", .. }
        ));

        let result = WhiteningEditor.call(
            EditorData::Path(PathBuf::from("a.fits")),
            &EditorContext::new(),
            &mut rng(),
        );
        assert!(matches!(result.unwrap_err(), EditorError::UnexpectedData { .. }));
    }

    #[test]
    fn test_normalizers_keep_map_header() {
        let output = StretchPixelEditor
            .call(EditorData::Map(small_map()), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Map(map) = output.data else {
            panic!("expected a map");
        };
        assert_eq!(map.header.wavelength().unwrap(), 193.0);
        assert_eq!(map.data[[0, 0]], -1.0);
        assert_eq!(map.data[[1, 2]], 1.0);
    }

    #[test]
    fn test_normalizers_on_arrays() {
        let array = Array3::from_shape_fn((2, 3, 3), |(c, r, k)| (c * 9 + r * 3 + k) as f32);

        let output = ShiftMeanEditor
            .call(EditorData::Array(array.clone()), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Array(shifted) = output.data else {
            panic!("expected an array");
        };
        assert_eq!(shifted.dim(), (2, 3, 3));
        assert_eq!(shifted[[0, 0, 0]], -1.0);
        assert_eq!(shifted[[1, 2, 2]], 1.0);

        let editor = ContrastNormalizeEditor::new(Shift::Value(1.0), Scale::Value(2.0));
        let output = editor
            .call(EditorData::Array(array), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Array(scaled) = output.data else {
            panic!("expected an array");
        };
        assert_relative_eq!(scaled[[0, 0, 1]], 0.0);
        assert_relative_eq!(scaled[[0, 1, 0]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_fn_editor() {
        let editor = NormalizeFnEditor::new(|v| v / 6.0);
        let output = editor
            .call(EditorData::Map(small_map()), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Map(map) = output.data else {
            panic!("expected a map");
        };
        assert_relative_eq!(map.data[[1, 2]], 1.0);
        assert_relative_eq!(map.data[[0, 2]], 0.0);
    }

    #[test]
    fn test_patch_editor_lifts_map_to_one_channel() {
        let mut image = Array2::<f32>::zeros((32, 32));
        image[[16, 16]] = 5.0;
        let map = SolarMap::new(image, Header::new());
        let editor = BrightestPixelPatchEditor::new(
            PatchConfig::builder()
                .patch_shape(8, 8)
                .random_selection(0.0)
                .build(),
        );

        let output = editor
            .call(EditorData::Map(map), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Array(patch) = output.data else {
            panic!("expected an array");
        };
        assert_eq!(patch.dim(), (1, 8, 8));
        assert_eq!(patch[[0, 4, 4]], 5.0);
    }

    #[test]
    fn test_degradation_editor_normalizes_exposure() {
        let editor = DegradationEditor::new(CalibrationMode::Auto, mock_cache());
        let output = editor
            .call(EditorData::Map(disk_map()), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Map(map) = output.data else {
            panic!("expected a map");
        };
        // Factor 0.5 for 171 in mid 2014, exposure 2.0.
        assert_eq!(map.data[[100, 100]], 100.0);
        assert_eq!(map.data[[0, 0]], 0.0);
    }

    #[test]
    fn test_save_names_output_after_input() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let editor = SaveMapEditor::with_writer(
            MockWriter {
                should_fail: false,
                written: written.clone(),
            },
            "/out",
            "tif",
        );
        let ctx = EditorContext::new().with("path", "/data/171/2014-06-01.fits");

        let (data, ctx) = editor
            .convert(EditorData::Map(small_map()), ctx, &mut rng())
            .unwrap();

        assert!(matches!(data, EditorData::Map(_)));
        assert_eq!(ctx.get_str("output_path"), Some("/out/2014-06-01.tif"));
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("/out/2014-06-01.tif"));
    }

    #[test]
    fn test_writer_failure() {
        let editor = SaveMapEditor::with_writer(
            MockWriter {
                should_fail: true,
                written: Arc::new(Mutex::new(Vec::new())),
            },
            "/out",
            "tif",
        );
        let result = editor.call(EditorData::Map(small_map()), &EditorContext::new(), &mut rng());
        assert!(matches!(result.unwrap_err(), EditorError::OutputWriteError(_)));
    }

    #[test]
    fn test_default_editors_load_and_save_fits() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("aia_171.fits");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        FitsMapStore::new().write_map(&disk_map(), &input).unwrap();

        let pipeline = EditorPipeline::new()
            .with(LoadMapEditor::new())
            .with(DegradationEditor::new(CalibrationMode::None, mock_cache()))
            .with(SaveMapEditor::new(&out_dir));
        let (data, ctx) = pipeline
            .run(EditorData::Path(input), EditorContext::new(), &mut rng())
            .unwrap();

        let output = out_dir.join("aia_171.fits");
        assert_eq!(ctx.get_str("output_path"), Some(output.display().to_string().as_str()));
        let saved = FitsMapStore::new().read_map(&output).unwrap();
        let EditorData::Map(map) = data else {
            panic!("expected a map");
        };
        assert_eq!(saved.data, map.data);
        assert_eq!(saved.data[[100, 100]], 50.0);
        assert_eq!(saved.header.get("TIMESYS").and_then(|v| v.as_str()), Some("TAI"));
    }

    // Only test that touches the process-wide calibration cache.
    #[test]
    fn test_degradation_editor_from_global_cache() {
        assert!(matches!(
            DegradationEditor::from_global(CalibrationMode::Auto),
            Err(EditorError::InvalidArgument(_))
        ));

        let installed =
            calibration::init_global(CalibrationCache::new(MockSource::default())).unwrap();
        assert!(Arc::ptr_eq(&installed, &calibration::global().unwrap()));
        assert!(matches!(
            calibration::init_global(CalibrationCache::new(MockSource::default())),
            Err(EditorError::InvalidArgument(_))
        ));

        let editor = DegradationEditor::from_global(CalibrationMode::Auto).unwrap();
        assert_eq!(editor.mode(), CalibrationMode::Auto);
        let output = editor
            .call(EditorData::Map(disk_map()), &EditorContext::new(), &mut rng())
            .unwrap();
        let EditorData::Map(map) = output.data else {
            panic!("expected a map");
        };
        assert_eq!(map.data[[100, 100]], 100.0);
    }
}
