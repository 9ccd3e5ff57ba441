use foundation::geo::{InvalidCoordinate, LngLat, normalize_bearing_deg};

/// Camera pitch limit in degrees, matching the SDK's camera constraints.
pub const MAX_PITCH_DEG: f64 = 85.0;

/// The camera, as the coordinator sees it each frame.
///
/// Always normalized: zoom >= 0, bearing in [0, 360), pitch in
/// [0, MAX_PITCH_DEG]. Only the camera controller mutates this; everyone
/// else gets a copy.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub center: LngLat,
    pub zoom: f64,
    pub bearing_deg: f64,
    pub pitch_deg: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(LngLat::new(0.0, 0.0), 0.0, 0.0, 0.0)
    }
}

impl CameraState {
    /// Builds a normalized state. Non-finite zoom/bearing/pitch collapse
    /// to their lower bound rather than poisoning later interpolation.
    pub fn new(center: LngLat, zoom: f64, bearing_deg: f64, pitch_deg: f64) -> Self {
        let zoom = if zoom.is_finite() { zoom.max(0.0) } else { 0.0 };
        let bearing_deg = if bearing_deg.is_finite() {
            normalize_bearing_deg(bearing_deg)
        } else {
            0.0
        };
        let pitch_deg = if pitch_deg.is_finite() {
            pitch_deg.clamp(0.0, MAX_PITCH_DEG)
        } else {
            0.0
        };
        Self {
            center,
            zoom,
            bearing_deg,
            pitch_deg,
        }
    }
}

/// A partial camera destination; unset fields keep their current value.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CameraTarget {
    pub center: Option<LngLat>,
    pub zoom: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub pitch_deg: Option<f64>,
}

impl CameraTarget {
    pub fn center(center: LngLat) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }

    /// Fills unset fields from `base`. The center, if given, must be a
    /// valid geographic position.
    pub fn resolve(&self, base: CameraState) -> Result<CameraState, InvalidCoordinate> {
        let center = match self.center {
            Some(c) => LngLat::validated(c.lon_deg, c.lat_deg)?,
            None => base.center,
        };
        Ok(CameraState::new(
            center,
            self.zoom.unwrap_or(base.zoom),
            self.bearing_deg.unwrap_or(base.bearing_deg),
            self.pitch_deg.unwrap_or(base.pitch_deg),
        ))
    }
}
