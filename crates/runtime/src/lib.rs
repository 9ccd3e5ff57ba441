pub mod command_queue;
pub mod event_bus;
pub mod frame;

pub use command_queue::{CommandQueue, CommandSeq, QueueFull};
pub use event_bus::{Event, EventBus};
pub use frame::{Frame, FrameClock};
