pub mod controller;
pub mod state;
pub mod transition;
pub mod viewport;

pub use controller::{CameraController, CameraPhase, GestureDelta};
pub use state::{CameraState, CameraTarget, MAX_PITCH_DEG};
pub use transition::Transition;
pub use viewport::{ScreenSize, TILE_SIZE_PX, Viewport};
