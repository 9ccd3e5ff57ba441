pub mod backend;
pub mod command;
pub mod coordinator;
pub mod draw_list;
pub mod error;

pub use backend::{BackendSubmissionError, RecordingBackend, RenderBackend};
pub use command::{CameraMove, Command};
pub use coordinator::{FrameOutcome, FrameSummary, MapConfig, MapView};
pub use draw_list::{DrawItem, DrawList, SourceRef};
pub use error::MapError;
