//! Stage observation for offline diagnosis.
//!
//! The preparer accepts a [`StageObserver`] so the debug admin endpoint
//! and `DEBUG_NAME_PIPELINE` mode can see intermediate forms without the
//! production path paying for any logging.

use std::sync::Mutex;

/// A normalization pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lowercase,
    Transliterate,
    Whitespace,
    StopWords,
    Punctuation,
    Abbreviations,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lowercase => "lowercase",
            Stage::Transliterate => "transliterate",
            Stage::Whitespace => "whitespace",
            Stage::StopWords => "stopwords",
            Stage::Punctuation => "punctuation",
            Stage::Abbreviations => "abbreviations",
        }
    }
}

/// Capability interface for observing per-stage output.
pub trait StageObserver {
    fn observe(&self, stage: Stage, output: &str);
}

/// Production observer: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopObserver;

impl StageObserver for NopObserver {
    fn observe(&self, _stage: Stage, _output: &str) {}
}

/// Observer that emits one tracing event per stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugObserver;

impl StageObserver for DebugObserver {
    fn observe(&self, stage: Stage, output: &str) {
        tracing::debug!(stage = stage.as_str(), output, "name pipeline stage");
    }
}

/// Observer that records each stage's output, for the debug endpoint.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    stages: Mutex<Vec<(Stage, String)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded `(stage, output)` pairs, in execution order.
    pub fn stages(&self) -> Vec<(Stage, String)> {
        self.stages.lock().expect("observer lock").clone()
    }
}

impl StageObserver for RecordingObserver {
    fn observe(&self, stage: Stage, output: &str) {
        self.stages
            .lock()
            .expect("observer lock")
            .push((stage, output.to_string()));
    }
}
