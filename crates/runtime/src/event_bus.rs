use crate::frame::Frame;

/// A frame-stamped engine event.
///
/// Kinds are short static tags ("paint_order", "frame_failed", ...);
/// `detail` is free-form text for traces and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub detail: String,
}

/// In-memory trace of engine activity.
///
/// Library crates record here instead of logging; binaries drain the bus
/// into whatever logging they carry.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, detail: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            detail: detail.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn of_kind<'a>(&'a self, kind: &'static str) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
