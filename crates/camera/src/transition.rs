use foundation::geo::{haversine_m, shortest_bearing_delta_deg, wrap_lon_deg};
use foundation::time::Time;

use crate::state::CameraState;

/// Symmetric cubic ease: slow in, slow out.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// An in-flight camera animation between two states.
///
/// Sampling is pure: the state at time `t` depends only on the endpoints
/// and the clock, so replaying frames replays the flight exactly.
/// Bearing blends along the shortest arc and longitude wraps across the
/// antimeridian instead of circling the globe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    from: CameraState,
    to: CameraState,
    start: Time,
    duration_s: f64,
    /// Extra zoom-out at the midpoint; 0 for plain eases.
    zoom_dip: f64,
}

impl Transition {
    pub fn ease(from: CameraState, to: CameraState, start: Time, duration_s: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration_s,
            zoom_dip: 0.0,
        }
    }

    /// A fly-to: ease plus a zoom dip scaled by ground distance, one
    /// zoom level per 1000 km, capped at 4, so long hops pull out far
    /// enough to show the route.
    pub fn fly(from: CameraState, to: CameraState, start: Time, duration_s: f64) -> Self {
        let dip = (haversine_m(from.center, to.center) / 1_000_000.0).min(4.0);
        Self {
            zoom_dip: dip,
            ..Self::ease(from, to, start, duration_s)
        }
    }

    pub fn target(&self) -> CameraState {
        self.to
    }

    /// True when sampling at any time lands on the target.
    pub fn is_instant(&self) -> bool {
        self.duration_s <= 0.0
    }

    /// Camera state at `now`, plus whether the transition has finished.
    pub fn sample(&self, now: Time) -> (CameraState, bool) {
        let t = if self.duration_s > 0.0 {
            (now.seconds_since(self.start) / self.duration_s).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let k = ease_in_out_cubic(t);

        let lon = wrap_interp(self.from.center.lon_deg, self.to.center.lon_deg, k);
        let lat = lerp(self.from.center.lat_deg, self.to.center.lat_deg, k);
        let zoom = lerp(self.from.zoom, self.to.zoom, k)
            - self.zoom_dip * (std::f64::consts::PI * k).sin();
        let bearing = self.from.bearing_deg
            + shortest_bearing_delta_deg(self.from.bearing_deg, self.to.bearing_deg) * k;
        let pitch = lerp(self.from.pitch_deg, self.to.pitch_deg, k);

        let state = CameraState::new(
            foundation::geo::LngLat::new(lon, lat),
            zoom,
            bearing,
            pitch,
        );
        (state, t >= 1.0)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn wrap_interp(from_lon: f64, to_lon: f64, t: f64) -> f64 {
    let delta = wrap_lon_deg(to_lon - from_lon);
    wrap_lon_deg(from_lon + delta * t)
}
