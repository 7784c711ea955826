use std::time::Instant;

use rand::RngCore;
use tracing::{info, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::editor::base::Editor;
use crate::image_pipeline::editor::timings::EditorTimings;
use crate::image_pipeline::editor::types::{EditorContext, EditorData};

/// An ordered chain of editors; each consumes the previous one's output.
#[derive(Default)]
pub struct EditorPipeline {
    editors: Vec<Box<dyn Editor>>,
}

impl EditorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, editor: impl Editor + 'static) -> Self {
        self.push(editor);
        self
    }

    pub fn push(&mut self, editor: impl Editor + 'static) {
        self.editors.push(Box::new(editor));
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.editors.iter().map(|e| e.name()).collect()
    }

    /// Runs every editor in order. The first failure aborts the run.
    pub fn run(
        &self,
        data: EditorData,
        ctx: EditorContext,
        rng: &mut dyn RngCore,
    ) -> Result<(EditorData, EditorContext)> {
        self.execute(data, ctx, rng, None)
    }

    /// Like [`run`](Self::run), also timing each editor call.
    pub fn run_with_timings(
        &self,
        data: EditorData,
        ctx: EditorContext,
        rng: &mut dyn RngCore,
    ) -> Result<(EditorData, EditorContext, EditorTimings)> {
        let mut timings = EditorTimings::new();
        let (data, ctx) = self.execute(data, ctx, rng, Some(&mut timings))?;
        info!(
            "Pipeline took {:.3}ms",
            timings.total().as_secs_f64() * 1000.0
        );
        Ok((data, ctx, timings))
    }

    #[instrument(skip_all, fields(editors = self.editors.len()))]
    fn execute(
        &self,
        mut data: EditorData,
        mut ctx: EditorContext,
        rng: &mut dyn RngCore,
        mut timings: Option<&mut EditorTimings>,
    ) -> Result<(EditorData, EditorContext)> {
        info!("Starting editor pipeline on {} input", data.kind());

        for editor in &self.editors {
            let _span = tracing::info_span!("editor", name = editor.name()).entered();
            let started = Instant::now();
            (data, ctx) = editor.convert(data, ctx, rng)?;
            if let Some(timings) = timings.as_deref_mut() {
                timings.record(editor.name(), started.elapsed());
            }
        }

        info!(output = data.kind(), "Pipeline complete");
        Ok((data, ctx))
    }
}
