use foundation::geo::{InvalidCoordinate, LngLat, wrap_lon_deg};
use foundation::time::Time;
use runtime::frame::Frame;

use crate::state::{CameraState, CameraTarget};
use crate::transition::Transition;

/// Externally visible controller phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CameraPhase {
    Idle,
    Animating,
    UserGesture,
}

/// A gesture step, already translated from raw input into camera terms.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GestureDelta {
    pub dlon_deg: f64,
    pub dlat_deg: f64,
    pub dzoom: f64,
    pub dbearing_deg: f64,
    pub dpitch_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Idle,
    Animating(Transition),
    Gesture,
}

/// Sole owner of the camera.
///
/// Phase machine: Idle -> Animating on ease/fly, back to Idle on
/// completion or cancel; UserGesture on gesture begin, back to Idle on
/// release. One transition at a time; a new ease/fly while animating
/// replaces the current one (last-writer-wins, never queued). Cancel is
/// synchronous: it keeps the last interpolated state and never rolls
/// back.
#[derive(Debug)]
pub struct CameraController {
    state: CameraState,
    mode: Mode,
    revision: u64,
}

impl CameraController {
    pub fn new(initial: CameraState) -> Self {
        Self {
            state: initial,
            mode: Mode::Idle,
            revision: 0,
        }
    }

    /// Immutable snapshot of the current camera.
    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn phase(&self) -> CameraPhase {
        match self.mode {
            Mode::Idle => CameraPhase::Idle,
            Mode::Animating(_) => CameraPhase::Animating,
            Mode::Gesture => CameraPhase::UserGesture,
        }
    }

    /// Bumped whenever the camera state changes; the coordinator's dirty
    /// signal.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets the camera instantly, without animating. Replaces any active
    /// transition or gesture.
    pub fn jump_to(&mut self, target: CameraTarget) -> Result<(), InvalidCoordinate> {
        let next = target.resolve(self.state)?;
        self.mode = Mode::Idle;
        self.set_state(next);
        Ok(())
    }

    pub fn ease_to(
        &mut self,
        target: CameraTarget,
        duration_s: f64,
        now: Time,
    ) -> Result<(), InvalidCoordinate> {
        let to = target.resolve(self.state)?;
        self.begin(Transition::ease(self.state, to, now, sane_duration(duration_s)));
        Ok(())
    }

    pub fn fly_to(
        &mut self,
        target: CameraTarget,
        duration_s: f64,
        now: Time,
    ) -> Result<(), InvalidCoordinate> {
        let to = target.resolve(self.state)?;
        self.begin(Transition::fly(self.state, to, now, sane_duration(duration_s)));
        Ok(())
    }

    /// Stops an active transition at its last interpolated state.
    /// No-op outside Animating.
    pub fn cancel(&mut self) {
        if matches!(self.mode, Mode::Animating(_)) {
            self.mode = Mode::Idle;
        }
    }

    /// Raw input took over; an active transition stops where it is.
    pub fn gesture_begin(&mut self) {
        self.mode = Mode::Gesture;
    }

    /// Applies a gesture step. Returns false (and does nothing) outside
    /// UserGesture; late events after release are dropped.
    pub fn gesture_apply(&mut self, delta: GestureDelta) -> bool {
        if !matches!(self.mode, Mode::Gesture) {
            return false;
        }
        let c = self.state;
        let next = CameraState::new(
            LngLat::new(
                wrap_lon_deg(c.center.lon_deg + delta.dlon_deg),
                (c.center.lat_deg + delta.dlat_deg).clamp(-90.0, 90.0),
            ),
            c.zoom + delta.dzoom,
            c.bearing_deg + delta.dbearing_deg,
            c.pitch_deg + delta.dpitch_deg,
        );
        self.set_state(next);
        true
    }

    pub fn gesture_end(&mut self) {
        if matches!(self.mode, Mode::Gesture) {
            self.mode = Mode::Idle;
        }
    }

    /// Advances an active transition to the frame's time. Returns true
    /// if the camera moved.
    pub fn tick(&mut self, frame: Frame) -> bool {
        let Mode::Animating(transition) = &self.mode else {
            return false;
        };
        let (next, finished) = transition.sample(frame.time);
        let moved = next != self.state;
        if moved {
            self.state = next;
            self.revision += 1;
        }
        if finished {
            self.mode = Mode::Idle;
        }
        moved
    }

    fn begin(&mut self, transition: Transition) {
        if transition.is_instant() {
            // Do not park in Animating for a frame; land immediately.
            self.mode = Mode::Idle;
            self.set_state(transition.target());
        } else {
            self.mode = Mode::Animating(transition);
        }
    }

    fn set_state(&mut self, next: CameraState) {
        if next != self.state {
            self.state = next;
            self.revision += 1;
        }
    }
}

fn sane_duration(duration_s: f64) -> f64 {
    if duration_s.is_finite() && duration_s > 0.0 {
        duration_s
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraController, CameraPhase, GestureDelta};
    use crate::state::{CameraState, CameraTarget};
    use foundation::geo::LngLat;
    use foundation::time::Time;
    use runtime::frame::Frame;

    fn controller() -> CameraController {
        CameraController::new(CameraState::default())
    }

    fn target(lon: f64, lat: f64, zoom: f64) -> CameraTarget {
        CameraTarget {
            center: Some(LngLat::new(lon, lat)),
            zoom: Some(zoom),
            ..CameraTarget::default()
        }
    }

    /// Frames at 10 fps: frame(n).time == n/10 seconds.
    fn frame(n: u64) -> Frame {
        Frame::new(n, 0.1)
    }

    #[test]
    fn ease_animates_then_returns_to_idle() {
        let mut cam = controller();
        cam.ease_to(target(10.0, 0.0, 4.0), 1.0, Time(0.0)).unwrap();
        assert_eq!(cam.phase(), CameraPhase::Animating);

        assert!(cam.tick(frame(5)));
        let mid = cam.state();
        assert!(mid.center.lon_deg > 0.0 && mid.center.lon_deg < 10.0);

        cam.tick(frame(10));
        assert_eq!(cam.phase(), CameraPhase::Idle);
        assert_eq!(cam.state().center, LngLat::new(10.0, 0.0));
        assert_eq!(cam.state().zoom, 4.0);
    }

    #[test]
    fn cancel_keeps_the_last_interpolated_state() {
        let mut cam = controller();
        cam.ease_to(target(10.0, 0.0, 4.0), 1.0, Time(0.0)).unwrap();
        cam.tick(frame(5));
        let mid = cam.state();
        assert_ne!(mid, CameraState::default());

        cam.cancel();
        assert_eq!(cam.phase(), CameraPhase::Idle);
        assert_eq!(cam.state(), mid);

        // Later frames no longer move the camera.
        assert!(!cam.tick(frame(6)));
        assert_eq!(cam.state(), mid);
    }

    #[test]
    fn new_transition_replaces_the_current_one() {
        let mut cam = controller();
        cam.ease_to(target(10.0, 0.0, 0.0), 1.0, Time(0.0)).unwrap();
        cam.tick(frame(5));
        let mid = cam.state();

        // Last writer wins: the replacement starts from the interpolated
        // state, not from the original start or target.
        cam.ease_to(target(-20.0, 0.0, 0.0), 1.0, frame(5).time).unwrap();
        assert_eq!(cam.phase(), CameraPhase::Animating);
        assert_eq!(cam.state(), mid);

        for n in 6..=16 {
            cam.tick(frame(n));
        }
        assert_eq!(cam.phase(), CameraPhase::Idle);
        assert_eq!(cam.state().center.lon_deg, -20.0);
    }

    #[test]
    fn zero_duration_transitions_land_immediately() {
        let mut cam = controller();
        cam.fly_to(target(30.0, 10.0, 6.0), 0.0, Time(0.0)).unwrap();
        assert_eq!(cam.phase(), CameraPhase::Idle);
        assert_eq!(cam.state().center, LngLat::new(30.0, 10.0));
    }

    #[test]
    fn invalid_targets_leave_the_controller_untouched() {
        let mut cam = controller();
        let before = cam.state();
        assert!(cam.ease_to(target(0.0, 99.0, 2.0), 1.0, Time(0.0)).is_err());
        assert_eq!(cam.state(), before);
        assert_eq!(cam.phase(), CameraPhase::Idle);
    }

    #[test]
    fn gesture_interrupts_an_animation_where_it_is() {
        let mut cam = controller();
        cam.ease_to(target(10.0, 0.0, 0.0), 1.0, Time(0.0)).unwrap();
        cam.tick(frame(5));
        let mid = cam.state();

        cam.gesture_begin();
        assert_eq!(cam.phase(), CameraPhase::UserGesture);
        assert_eq!(cam.state(), mid);

        assert!(cam.gesture_apply(GestureDelta {
            dzoom: 1.0,
            ..GestureDelta::default()
        }));
        assert_eq!(cam.state().zoom, mid.zoom + 1.0);

        cam.gesture_end();
        assert_eq!(cam.phase(), CameraPhase::Idle);
    }

    #[test]
    fn gesture_steps_outside_a_gesture_are_dropped() {
        let mut cam = controller();
        let before = cam.state();
        assert!(!cam.gesture_apply(GestureDelta {
            dlon_deg: 5.0,
            ..GestureDelta::default()
        }));
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn gesture_pan_wraps_and_clamps() {
        let mut cam = CameraController::new(CameraState::new(
            LngLat::new(179.0, 89.0),
            3.0,
            0.0,
            0.0,
        ));
        cam.gesture_begin();
        cam.gesture_apply(GestureDelta {
            dlon_deg: 2.0,
            dlat_deg: 5.0,
            ..GestureDelta::default()
        });
        assert_eq!(cam.state().center, LngLat::new(-179.0, 90.0));
    }

    #[test]
    fn revision_tracks_camera_movement() {
        let mut cam = controller();
        let r0 = cam.revision();
        cam.jump_to(target(1.0, 1.0, 2.0)).unwrap();
        assert_eq!(cam.revision(), r0 + 1);

        // A jump to the identical state is not a change.
        cam.jump_to(target(1.0, 1.0, 2.0)).unwrap();
        assert_eq!(cam.revision(), r0 + 1);
    }
}
