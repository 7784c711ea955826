use std::time::Duration;

use tracing::info;

/// Wall time of one editor call, with its position in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorTiming {
    pub position: usize,
    pub editor: String,
    pub elapsed: Duration,
}

/// Per-editor timings of one pipeline run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct EditorTimings {
    entries: Vec<EditorTiming>,
}

impl EditorTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, editor: &str, elapsed: Duration) {
        self.entries.push(EditorTiming {
            position: self.entries.len(),
            editor: editor.to_string(),
            elapsed,
        });
    }

    pub fn entries(&self) -> &[EditorTiming] {
        &self.entries
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|e| e.elapsed).sum()
    }

    /// Time spent in every call of the named editor, `None` if it never ran.
    pub fn for_editor(&self, editor: &str) -> Option<Duration> {
        let mut matching = self.entries.iter().filter(|e| e.editor == editor).peekable();
        matching.peek()?;
        Some(matching.map(|e| e.elapsed).sum())
    }

    pub fn slowest(&self) -> Option<&EditorTiming> {
        self.entries.iter().max_by_key(|e| e.elapsed)
    }

    pub fn log_summary(&self) {
        let total = self.total().as_secs_f64();
        for entry in &self.entries {
            let share = if total > 0.0 {
                entry.elapsed.as_secs_f64() / total * 100.0
            } else {
                0.0
            };
            info!(
                position = entry.position,
                editor = %entry.editor,
                "{:.3}ms ({:.1}%)",
                entry.elapsed.as_secs_f64() * 1000.0,
                share
            );
        }
        info!("Pipeline total: {:.3}ms", total * 1000.0);
    }
}
