use annotations::AnnotationManager;
use camera::{
    CameraController, CameraPhase, CameraState, CameraTarget, GestureDelta, ScreenSize, Viewport,
};
use foundation::geo::LngLat;
use runtime::command_queue::{CommandQueue, CommandSeq, QueueFull};
use runtime::event_bus::EventBus;
use runtime::frame::{Frame, FrameClock};
use style::Style;

use crate::backend::{BackendSubmissionError, RenderBackend};
use crate::command::{CameraMove, Command};
use crate::draw_list::DrawList;
use crate::error::MapError;

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Fixed frame delta (seconds).
    pub dt_s: f64,
    pub screen: ScreenSize,
    pub camera: CameraState,
    /// Bound on commands staged from other contexts; `None` is unbounded.
    pub staged_capacity: Option<usize>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dt_s: 1.0 / 60.0,
            screen: ScreenSize::new(1024, 768),
            camera: CameraState::default(),
            staged_capacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Nothing dirty; no submission.
    Skipped,
    /// Submitted and accepted.
    Rendered,
    /// Backend busy; submission owed to a later frame (latest state wins).
    Deferred,
    /// Submitted and rejected. Not retried; reported here and on the bus.
    Failed(BackendSubmissionError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub frame_index: u64,
    pub outcome: FrameOutcome,
    pub applied_commands: usize,
    pub rejected_commands: usize,
}

/// Revisions as of the last consumed snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Seen {
    style: u64,
    order_epoch: u64,
    annotations: u64,
    camera: u64,
    screen: u64,
}

/// Top-level orchestrator: owns every component and the frame loop.
///
/// All mutation flows through `apply` (synchronous, errors to the
/// issuer) or the staged FIFO queue (drained at the top of each frame,
/// errors reported as `command_rejected` events). Per frame: drain,
/// tick the camera, diff revisions, and only if something changed build
/// the ordered draw list and submit it through the depth-1 gate.
pub struct MapView {
    style: Style,
    annotations: AnnotationManager,
    camera: CameraController,
    screen: ScreenSize,
    screen_epoch: u64,
    clock: FrameClock,
    staged: CommandQueue<Command>,
    bus: EventBus,
    seen: Option<Seen>,
    deferred: bool,
}

impl MapView {
    pub fn new(config: MapConfig) -> Self {
        let staged = match config.staged_capacity {
            Some(cap) => CommandQueue::with_max_len(cap),
            None => CommandQueue::new(),
        };
        Self {
            style: Style::new(),
            annotations: AnnotationManager::new(),
            camera: CameraController::new(config.camera),
            screen: config.screen,
            screen_epoch: 0,
            clock: FrameClock::new(config.dt_s),
            staged,
            bus: EventBus::new(),
            seen: None,
            deferred: false,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn annotations(&self) -> &AnnotationManager {
        &self.annotations
    }

    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.camera.phase()
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// The current on-screen projection; derived, never cached.
    pub fn viewport(&self) -> Viewport {
        Viewport::derive(self.camera.state(), self.screen)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn drain_events(&mut self) -> Vec<runtime::event_bus::Event> {
        self.bus.drain()
    }

    /// Applies a command now. The sole synchronous entry point; a failed
    /// command mutates nothing.
    pub fn apply(&mut self, command: Command) -> Result<(), MapError> {
        let frame = self.clock.peek();
        self.apply_at(frame, command)
    }

    /// Stages a command from another context; it runs when the next
    /// frame drains the queue.
    pub fn stage(&mut self, command: Command) -> CommandSeq {
        self.staged.push(command)
    }

    pub fn try_stage(&mut self, command: Command) -> Result<CommandSeq, QueueFull> {
        self.staged.try_push(command)
    }

    /// Forces the next frame to re-render even if nothing changed, e.g.
    /// to resubmit after a reported backend failure.
    pub fn invalidate(&mut self) {
        self.seen = None;
    }

    /// Runs one frame of the per-frame algorithm.
    pub fn render_frame(&mut self, backend: &mut dyn RenderBackend) -> FrameSummary {
        let frame = self.clock.tick();

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for (seq, command) in self.staged.drain() {
            match self.apply_at(frame, command) {
                Ok(()) => applied += 1,
                Err(e) => {
                    rejected += 1;
                    self.bus
                        .emit(frame, "command_rejected", format!("seq {}: {e}", seq.0));
                }
            }
        }

        self.camera.tick(frame);

        let current = Seen {
            style: self.style.revision(),
            order_epoch: self.style.paint_order_epoch(),
            annotations: self.annotations.revision(),
            camera: self.camera.revision(),
            screen: self.screen_epoch,
        };
        let dirty = self.seen != Some(current);

        if !dirty && !self.deferred {
            return FrameSummary {
                frame_index: frame.index,
                outcome: FrameOutcome::Skipped,
                applied_commands: applied,
                rejected_commands: rejected,
            };
        }

        if backend.is_busy() {
            // Depth-1 deferral: a submission is owed, and whenever the
            // backend frees up the then-current state is what goes out.
            self.deferred = true;
            self.bus.emit(frame, "frame_deferred", "backend busy");
            return FrameSummary {
                frame_index: frame.index,
                outcome: FrameOutcome::Deferred,
                applied_commands: applied,
                rejected_commands: rejected,
            };
        }

        let snapshot = self.camera.state();
        let list = DrawList::build(&self.style, &self.annotations, snapshot.zoom);
        self.deferred = false;
        // Consumed either way: a failed submission is reported, not
        // retried on the next frame.
        self.seen = Some(current);

        let outcome = match backend.submit(&list, snapshot) {
            Ok(()) => {
                self.bus
                    .emit(frame, "frame_rendered", format!("{} items", list.len()));
                FrameOutcome::Rendered
            }
            Err(e) => {
                self.bus.emit(frame, "frame_failed", e.to_string());
                FrameOutcome::Failed(e)
            }
        };

        FrameSummary {
            frame_index: frame.index,
            outcome,
            applied_commands: applied,
            rejected_commands: rejected,
        }
    }

    fn apply_at(&mut self, frame: Frame, command: Command) -> Result<(), MapError> {
        match command {
            Command::AddLayer { layer, position } => {
                let id = layer.id.clone();
                let position = self.style.add_layer(layer, position)?;
                self.bus
                    .emit(frame, "paint_order", format!("add {id} at {position}"));
                Ok(())
            }
            Command::RemoveLayer { id } => {
                self.style.remove_layer(&id)?;
                self.bus.emit(frame, "paint_order", format!("remove {id}"));
                Ok(())
            }
            Command::ReorderLayer { id, position } => {
                let epoch = self.style.paint_order_epoch();
                let position = self.style.reorder_layer(&id, position)?;
                if self.style.paint_order_epoch() != epoch {
                    self.bus
                        .emit(frame, "paint_order", format!("move {id} to {position}"));
                }
                Ok(())
            }
            Command::AddSource {
                id,
                source_type,
                payload,
            } => {
                self.style.add_source(id, source_type, payload)?;
                Ok(())
            }
            Command::UpdateSource { id, payload } => {
                self.style.update_source(&id, payload)?;
                Ok(())
            }
            Command::RemoveSource { id, force } => {
                let unbound = self.style.remove_source(&id, force)?;
                if !unbound.is_empty() {
                    self.bus.emit(
                        frame,
                        "source_detached",
                        format!("{id} unbound [{}]", unbound.join(", ")),
                    );
                }
                Ok(())
            }
            Command::AddAnnotation {
                id,
                lon,
                lat,
                content,
            } => {
                self.annotations.add(id, LngLat::new(lon, lat), content)?;
                Ok(())
            }
            Command::MoveAnnotation { id, lon, lat } => {
                self.annotations.move_to(&id, LngLat::new(lon, lat))?;
                Ok(())
            }
            Command::SetAnnotationContent { id, content } => {
                self.annotations.set_content(&id, content)?;
                Ok(())
            }
            Command::RemoveAnnotation { id } => {
                self.annotations.remove(&id)?;
                Ok(())
            }
            Command::EaseTo { target, duration_s } => {
                let target = camera_target(target)?;
                self.camera.ease_to(target, duration_s, frame.time)?;
                Ok(())
            }
            Command::FlyTo { target, duration_s } => {
                let target = camera_target(target)?;
                self.camera.fly_to(target, duration_s, frame.time)?;
                Ok(())
            }
            Command::JumpTo { target } => {
                let target = camera_target(target)?;
                self.camera.jump_to(target)?;
                Ok(())
            }
            Command::CancelCamera => {
                self.camera.cancel();
                Ok(())
            }
            Command::GestureBegin => {
                self.camera.gesture_begin();
                Ok(())
            }
            Command::GestureMove {
                dlon,
                dlat,
                dzoom,
                dbearing,
                dpitch,
            } => {
                // Late gesture events after release are dropped by the
                // controller; that is not an error.
                self.camera.gesture_apply(GestureDelta {
                    dlon_deg: dlon,
                    dlat_deg: dlat,
                    dzoom,
                    dbearing_deg: dbearing,
                    dpitch_deg: dpitch,
                });
                Ok(())
            }
            Command::GestureEnd => {
                self.camera.gesture_end();
                Ok(())
            }
            Command::SetScreenSize {
                width_px,
                height_px,
            } => {
                let next = ScreenSize::new(width_px, height_px);
                if next != self.screen {
                    self.screen = next;
                    self.screen_epoch += 1;
                }
                Ok(())
            }
        }
    }
}

/// Lifts the wire form into a camera target; `lon`/`lat` must travel
/// together and name a real position.
fn camera_target(m: CameraMove) -> Result<CameraTarget, MapError> {
    let center = match (m.lon, m.lat) {
        (Some(lon), Some(lat)) => Some(LngLat::validated(lon, lat)?),
        (None, None) => None,
        (lon, lat) => {
            return Err(MapError::InvalidCoordinate {
                lon_deg: lon.unwrap_or(f64::NAN),
                lat_deg: lat.unwrap_or(f64::NAN),
            });
        }
    };
    Ok(CameraTarget {
        center,
        zoom: m.zoom,
        bearing_deg: m.bearing,
        pitch_deg: m.pitch,
    })
}
