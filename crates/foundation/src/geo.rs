use crate::precision::canonical_f64;

/// WGS84 semi-major axis (meters). Web Mercator treats the earth as a
/// sphere of this radius.
pub const WGS84_A: f64 = 6_378_137.0;
/// Mean earth radius (meters), used for great-circle distances.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;
/// Latitude limit of the Web Mercator projection, in degrees.
pub const MAX_MERCATOR_LAT_DEG: f64 = 85.051_128_779_806_59;

/// A geographic position in degrees, longitude first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LngLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

/// A position outside the valid geographic range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InvalidCoordinate {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl std::fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "coordinate out of range: lon={} lat={} (expected lon in [-180,180], lat in [-90,90])",
            self.lon_deg, self.lat_deg
        )
    }
}

impl std::error::Error for InvalidCoordinate {}

impl LngLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Construct only if the position is inside the valid geographic range.
    pub fn validated(lon_deg: f64, lat_deg: f64) -> Result<Self, InvalidCoordinate> {
        let p = Self::new(lon_deg, lat_deg);
        if p.is_valid() {
            Ok(p)
        } else {
            Err(InvalidCoordinate { lon_deg, lat_deg })
        }
    }

    /// Finite, lon in [-180, 180], lat in [-90, 90].
    pub fn is_valid(&self) -> bool {
        self.lon_deg.is_finite()
            && self.lat_deg.is_finite()
            && (-180.0..=180.0).contains(&self.lon_deg)
            && (-90.0..=90.0).contains(&self.lat_deg)
    }
}

/// Great-circle distance between two positions (meters), haversine form.
pub fn haversine_m(a: LngLat, b: LngLat) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let dlat = (b.lat_deg - a.lat_deg).to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Normalize a compass bearing into [0, 360).
pub fn normalize_bearing_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid(360.0) can yield 360.0 for tiny negative inputs.
    canonical_f64(if r >= 360.0 { r - 360.0 } else { r })
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn shortest_bearing_delta_deg(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Wrap a longitude into [-180, 180).
pub fn wrap_lon_deg(deg: f64) -> f64 {
    canonical_f64((deg + 180.0).rem_euclid(360.0) - 180.0)
}

/// Project to normalized Web Mercator coordinates in [0, 1] x [0, 1].
///
/// Latitudes beyond the Mercator limit clamp to the projection edge.
pub fn mercator_norm(p: LngLat) -> (f64, f64) {
    let x = (p.lon_deg + 180.0) / 360.0;
    let lat = p.lat_deg.clamp(-MAX_MERCATOR_LAT_DEG, MAX_MERCATOR_LAT_DEG);
    let lat_rad = lat.to_radians();
    let y = 0.5 - ((std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan().ln())
        / (2.0 * std::f64::consts::PI);
    (x, y)
}

/// Inverse of `mercator_norm`. X outside [0, 1] wraps in longitude.
pub fn from_mercator_norm(x: f64, y: f64) -> LngLat {
    let lon = x * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * y);
    let lat = (0.5 * (n.exp() - (-n).exp())).atan().to_degrees();
    LngLat::new(lon, lat)
}
