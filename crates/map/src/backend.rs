use camera::CameraState;

use crate::draw_list::DrawList;

/// A rendering backend rejected or failed a frame submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSubmissionError {
    pub reason: String,
}

impl BackendSubmissionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for BackendSubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for BackendSubmissionError {}

/// The seam to the actual renderer.
///
/// The coordinator hands over an ordered draw list plus the camera
/// snapshot it was built against. Submissions are at-most-once per
/// frame; a failure is reported upward, never retried by the
/// coordinator. `is_busy` gates the next submission: the coordinator
/// defers (depth 1, latest state wins) while a prior frame is still
/// being presented.
pub trait RenderBackend {
    fn submit(
        &mut self,
        list: &DrawList,
        camera: CameraState,
    ) -> Result<(), BackendSubmissionError>;

    fn is_busy(&self) -> bool {
        false
    }
}

/// Backend double that records every submission; `busy` and
/// `fail_reasons` script the interesting paths.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub submissions: Vec<(DrawList, CameraState)>,
    pub busy: bool,
    /// Each submission pops one entry; `Some` fails it.
    pub fail_reasons: Vec<Option<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}

impl RenderBackend for RecordingBackend {
    fn submit(
        &mut self,
        list: &DrawList,
        camera: CameraState,
    ) -> Result<(), BackendSubmissionError> {
        if let Some(Some(reason)) = self.fail_reasons.pop() {
            return Err(BackendSubmissionError::new(reason));
        }
        self.submissions.push((list.clone(), camera));
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}
