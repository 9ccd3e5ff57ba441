use foundation::bounds::LngLatBounds;
use foundation::geo::{LngLat, WGS84_A, from_mercator_norm, mercator_norm};

use crate::state::CameraState;

/// World size at zoom 0, pixels.
pub const TILE_SIZE_PX: f64 = 512.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScreenSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl ScreenSize {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// The on-screen projection derived from camera state and screen bounds.
///
/// Derived and read-only: recompute it from the camera whenever needed,
/// never store it. Bearing rotates the view about the screen center;
/// pitch is ignored in the ground mapping (flat approximation; the
/// backend applies the real perspective).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub camera: CameraState,
    pub screen: ScreenSize,
    world_px: f64,
    center_mx: f64,
    center_my: f64,
}

impl Viewport {
    pub fn derive(camera: CameraState, screen: ScreenSize) -> Self {
        let world_px = TILE_SIZE_PX * camera.zoom.exp2();
        let (center_mx, center_my) = mercator_norm(camera.center);
        Self {
            camera,
            screen,
            world_px,
            center_mx,
            center_my,
        }
    }

    /// Mercator world size at the camera's zoom, pixels.
    pub fn world_px(&self) -> f64 {
        self.world_px
    }

    /// Screen position of a geographic point, pixels from the top-left.
    pub fn project(&self, p: LngLat) -> [f64; 2] {
        let (mx, my) = mercator_norm(p);
        // Shortest horizontal offset, so points just across the
        // antimeridian project near the edge instead of a world away.
        let mut dx = mx - self.center_mx;
        if dx > 0.5 {
            dx -= 1.0;
        } else if dx < -0.5 {
            dx += 1.0;
        }
        let dx = dx * self.world_px;
        let dy = (my - self.center_my) * self.world_px;

        let theta = -self.camera.bearing_deg.to_radians();
        let (sin, cos) = theta.sin_cos();
        [
            self.screen.width_px as f64 / 2.0 + cos * dx - sin * dy,
            self.screen.height_px as f64 / 2.0 + sin * dx + cos * dy,
        ]
    }

    /// Geographic position under a screen pixel.
    pub fn unproject(&self, x: f64, y: f64) -> LngLat {
        let sx = x - self.screen.width_px as f64 / 2.0;
        let sy = y - self.screen.height_px as f64 / 2.0;

        let theta = self.camera.bearing_deg.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = (cos * sx - sin * sy) / self.world_px;
        let dy = (sin * sx + cos * sy) / self.world_px;

        let mx = (self.center_mx + dx).rem_euclid(1.0);
        let my = (self.center_my + dy).clamp(0.0, 1.0);
        from_mercator_norm(mx, my)
    }

    /// Axis-aligned bounds of the visible area (corner hull, so a rotated
    /// view yields the enclosing box).
    pub fn visible_bounds(&self) -> LngLatBounds {
        let w = self.screen.width_px as f64;
        let h = self.screen.height_px as f64;
        let corners = [
            self.unproject(0.0, 0.0),
            self.unproject(w, 0.0),
            self.unproject(0.0, h),
            self.unproject(w, h),
        ];

        let mut west = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut south = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        for c in corners {
            west = west.min(c.lon_deg);
            east = east.max(c.lon_deg);
            south = south.min(c.lat_deg);
            north = north.max(c.lat_deg);
        }
        LngLatBounds::new(west, south, east, north)
    }

    /// Ground resolution at the camera center.
    pub fn meters_per_pixel(&self) -> f64 {
        let circumference = 2.0 * std::f64::consts::PI * WGS84_A;
        circumference * self.camera.center.lat_deg.to_radians().cos() / self.world_px
    }
}

#[cfg(test)]
mod tests {
    use super::{ScreenSize, TILE_SIZE_PX, Viewport};
    use crate::state::CameraState;
    use foundation::geo::LngLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn viewport(lon: f64, lat: f64, zoom: f64, bearing: f64) -> Viewport {
        Viewport::derive(
            CameraState::new(LngLat::new(lon, lat), zoom, bearing, 0.0),
            ScreenSize::new(800, 600),
        )
    }

    #[test]
    fn center_projects_to_screen_center() {
        let vp = viewport(77.59, 12.97, 11.0, 0.0);
        let [x, y] = vp.project(vp.camera.center);
        assert_close(x, 400.0, 1e-9);
        assert_close(y, 300.0, 1e-9);
    }

    #[test]
    fn north_is_up_at_zero_bearing() {
        let vp = viewport(0.0, 0.0, 5.0, 0.0);
        let [_, y] = vp.project(LngLat::new(0.0, 1.0));
        assert!(y < 300.0);
    }

    #[test]
    fn bearing_rotates_the_view() {
        // Facing east: north appears to the left of center.
        let vp = viewport(0.0, 0.0, 5.0, 90.0);
        let [x, y] = vp.project(LngLat::new(0.0, 1.0));
        assert!(x < 400.0);
        assert_close(y, 300.0, 1e-9);
    }

    #[test]
    fn project_unproject_round_trip_with_bearing() {
        let vp = viewport(10.0, 45.0, 8.0, 37.0);
        let p = LngLat::new(10.4, 44.8);
        let [x, y] = vp.project(p);
        let back = vp.unproject(x, y);
        assert_close(back.lon_deg, p.lon_deg, 1e-9);
        assert_close(back.lat_deg, p.lat_deg, 1e-9);
    }

    #[test]
    fn world_doubles_per_zoom_level() {
        assert_close(viewport(0.0, 0.0, 0.0, 0.0).world_px(), TILE_SIZE_PX, 1e-12);
        assert_close(
            viewport(0.0, 0.0, 3.0, 0.0).world_px(),
            TILE_SIZE_PX * 8.0,
            1e-9,
        );
    }

    #[test]
    fn visible_bounds_contain_the_center() {
        let vp = viewport(77.59, 12.97, 11.0, 25.0);
        assert!(vp.visible_bounds().contains(vp.camera.center));
    }

    #[test]
    fn meters_per_pixel_halves_per_zoom_level() {
        let a = viewport(0.0, 0.0, 4.0, 0.0).meters_per_pixel();
        let b = viewport(0.0, 0.0, 5.0, 0.0).meters_per_pixel();
        assert_close(a / b, 2.0, 1e-9);
    }

    #[test]
    fn antimeridian_neighbors_project_nearby() {
        let vp = viewport(179.9, 0.0, 6.0, 0.0);
        let [x, _] = vp.project(LngLat::new(-179.9, 0.0));
        // Just east of center, not a full world to the west.
        assert!(x > 400.0 && x < 500.0);
    }
}
