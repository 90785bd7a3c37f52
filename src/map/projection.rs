use glam::DVec2;
use std::f64::consts::PI;

/// Braille dots across the whole world at zoom level 0
pub const DOTS_PER_TILE: f64 = 8.0;

/// Web Mercator latitude limit
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (Mercator limits)
    pub center_lat: f64,
    /// Zoom level; the world is `DOTS_PER_TILE * 2^zoom` dots wide
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: u8, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            zoom,
            min_zoom: 0,
            max_zoom: 18,
            width,
            height,
        }
    }

    /// Restrict zooming to `[min, max]`, clamping the current level
    pub fn with_zoom_bounds(mut self, min: u8, max: u8) -> Self {
        self.min_zoom = min.min(max);
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    /// World width in dots at the current zoom
    pub fn world_size(&self) -> f64 {
        DOTS_PER_TILE * f64::from(1u32 << self.zoom.min(24))
    }

    /// Normalized Web Mercator position in `[0, 1]²`
    fn mercator(lon: f64, lat: f64) -> DVec2 {
        let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE) * PI / 180.0;
        DVec2::new(
            (lon + 180.0) / 360.0,
            (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
        )
    }

    fn inverse_mercator(p: DVec2) -> (f64, f64) {
        let lon = p.x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * p.y)).sinh().atan() * 180.0 / PI;
        (lon, lat)
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Project to fractional pixel coordinates
    pub fn project_f64(&self, lon: f64, lat: f64) -> DVec2 {
        let scale = self.world_size();
        let offset = Self::mercator(lon, lat) - Self::mercator(self.center_lon, self.center_lat);
        offset * scale + self.half_size()
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = self.project_f64(lon, lat).floor();
        (p.x as i32, p.y as i32)
    }

    /// Unproject fractional pixel coordinates back to (lon, lat)
    pub fn unproject_f64(&self, p: DVec2) -> (f64, f64) {
        let center = Self::mercator(self.center_lon, self.center_lat);
        Self::inverse_mercator((p - self.half_size()) / self.world_size() + center)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        self.unproject_f64(DVec2::new(px as f64, py as f64))
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = self.half_size() + DVec2::new(dx as f64, dy as f64);
        let (lon, lat) = self.unproject_f64(center);
        self.set_center(lon, lat);
    }

    fn set_center(&mut self, lon: f64, lat: f64) {
        // Wrap longitude
        let mut lon = lon;
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon < -180.0 {
            lon += 360.0;
        }
        self.center_lon = lon;
        self.center_lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    }

    /// Zoom in one level
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(self.max_zoom);
    }

    /// Zoom out one level
    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(self.min_zoom);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, |vp| vp.zoom_in());
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, |vp| vp.zoom_out());
    }

    /// Change zoom while keeping the geographic point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, change: impl FnOnce(&mut Self)) {
        let anchor = DVec2::new(px as f64, py as f64);
        let (lon, lat) = self.unproject_f64(anchor);
        let before = self.zoom;
        change(self);
        if self.zoom == before {
            return;
        }

        let world = Self::mercator(lon, lat);
        let center = world - (anchor - self.half_size()) / self.world_size();
        let (center_lon, center_lat) = Self::inverse_mercator(center);
        self.set_center(center_lon, center_lat);
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0
            && min_x < self.width as i32
            && max_y >= 0
            && min_y < self.height as i32
    }

    /// Check if a geographic bounding box overlaps the viewport
    pub fn bbox_might_be_visible(&self, min: DVec2, max: DVec2) -> bool {
        let a = self.project(min.x, max.y);
        let b = self.project(max.x, min.y);
        self.line_might_be_visible(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1, 100, 100);
        let (x, y) = vp.project(0.0, 0.0);
        assert_eq!(x, 50);
        assert_eq!(y, 50);
    }

    #[test]
    fn test_world_size_doubles_per_level() {
        let vp = Viewport::new(0.0, 0.0, 3, 100, 100);
        assert_eq!(vp.world_size(), 64.0);
        let vp = Viewport::new(0.0, 0.0, 7, 100, 100);
        assert_eq!(vp.world_size(), 1024.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(-97.92, 39.38, 7, 200, 120);
        let p = vp.project_f64(-122.4, 37.8);
        let (lon, lat) = vp.unproject_f64(p);
        assert!((lon + 122.4).abs() < 1e-9);
        assert!((lat - 37.8).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 4, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, 10);
        assert!(vp.center_lat < 0.0);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut vp = Viewport::new(-97.92, 39.38, 7, 100, 100).with_zoom_bounds(3, 8);
        vp.zoom_in();
        vp.zoom_in();
        assert_eq!(vp.zoom, 8);
        for _ in 0..10 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, 3);

        let vp = Viewport::new(0.0, 0.0, 12, 100, 100).with_zoom_bounds(3, 8);
        assert_eq!(vp.zoom, 8);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut vp = Viewport::new(-97.92, 39.38, 5, 200, 120).with_zoom_bounds(3, 8);
        let (lon, lat) = vp.unproject(30, 20);
        vp.zoom_in_at(30, 20);
        assert_eq!(vp.zoom, 6);
        let p = vp.project_f64(lon, lat);
        assert!((p.x - 30.0).abs() < 1e-6);
        assert!((p.y - 20.0).abs() < 1e-6);
    }
}
