//! Coordinate conversions for one round.
//!
//! Two spaces exist per round: the map image's natural pixel space and the
//! scaled display space the players click in. A round is anchored either in
//! raw pixels or in lat/lon over a declared bounding box; the two modes never
//! mix within one round. The mapper is rebuilt from scratch for every round
//! because different maps have different natural sizes.

use serde::{Deserialize, Serialize};

use crate::config::Target;
use crate::error::EngineError;
use crate::models::Point;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Uniform scale between natural image pixels and display pixels.
///
/// Aspect ratio is always preserved: both axes share
/// `s = min(viewport_w / natural_w, viewport_h / natural_h)`.
#[derive(Debug, Clone, Copy)]
pub struct DisplayScale {
    scale: f64,
}

impl DisplayScale {
    pub fn fit(
        natural_width: f64,
        natural_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, EngineError> {
        if natural_width <= 0.0 || natural_height <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "non-positive natural dimensions {natural_width}x{natural_height}"
            )));
        }
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "non-positive viewport {viewport_width}x{viewport_height}"
            )));
        }
        let scale = (viewport_width / natural_width).min(viewport_height / natural_height);
        Ok(DisplayScale { scale })
    }

    pub fn factor(&self) -> f64 {
        self.scale
    }

    /// Natural pixels to display pixels.
    pub fn to_display(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    /// Display pixels back to natural pixels.
    pub fn to_natural(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }
}

/// Geographic bounding box of a map image.
///
/// The box maps affinely onto the full natural image extent: longitude grows
/// with `x` (east is right), latitude shrinks with `y` (north is up).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.lon_min >= self.lon_max || self.lat_min >= self.lat_max {
            return Err(EngineError::InvalidGeometry(format!(
                "degenerate bounding box [{}, {}]x[{}, {}]",
                self.lon_min, self.lon_max, self.lat_min, self.lat_max
            )));
        }
        Ok(())
    }

    /// Lat/lon to natural image pixels.
    pub fn to_canvas(&self, lat: f64, lon: f64, natural_width: f64, natural_height: f64) -> Point {
        let x = (lon - self.lon_min) / (self.lon_max - self.lon_min) * natural_width;
        let y = (self.lat_max - lat) / (self.lat_max - self.lat_min) * natural_height;
        Point::new(x, y)
    }

    /// Natural image pixels to (lat, lon).
    pub fn to_lat_lon(&self, p: Point, natural_width: f64, natural_height: f64) -> (f64, f64) {
        let lat = self.lat_max - p.y / natural_height * (self.lat_max - self.lat_min);
        let lon = self.lon_min + p.x / natural_width * (self.lon_max - self.lon_min);
        (lat, lon)
    }
}

/// Coordinate anchoring for one round.
#[derive(Debug, Clone, Copy)]
pub enum CoordMode {
    Pixel,
    Geo(GeoBounds),
}

/// Per-round converter between natural, display, and (optionally) geographic
/// coordinates.
#[derive(Debug, Clone)]
pub struct GeometryMapper {
    scale: DisplayScale,
    mode: CoordMode,
    natural_width: f64,
    natural_height: f64,
}

impl GeometryMapper {
    pub fn new(
        natural_width: f64,
        natural_height: f64,
        viewport_width: f64,
        viewport_height: f64,
        mode: CoordMode,
    ) -> Result<Self, EngineError> {
        if let CoordMode::Geo(bounds) = &mode {
            bounds.validate()?;
        }
        let scale = DisplayScale::fit(natural_width, natural_height, viewport_width, viewport_height)?;
        Ok(GeometryMapper {
            scale,
            mode,
            natural_width,
            natural_height,
        })
    }

    pub fn is_geo(&self) -> bool {
        matches!(self.mode, CoordMode::Geo(_))
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale.factor()
    }

    pub fn to_display(&self, p: Point) -> Point {
        self.scale.to_display(p)
    }

    pub fn to_natural(&self, p: Point) -> Point {
        self.scale.to_natural(p)
    }

    /// Lat/lon to a display-space point. Only valid for geo rounds.
    pub fn to_canvas(&self, lat: f64, lon: f64) -> Result<Point, EngineError> {
        match &self.mode {
            CoordMode::Geo(bounds) => Ok(self
                .scale
                .to_display(bounds.to_canvas(lat, lon, self.natural_width, self.natural_height))),
            CoordMode::Pixel => Err(EngineError::InvalidGeometry(
                "geo conversion requested for a pixel-anchored round".to_string(),
            )),
        }
    }

    /// Display-space point to (lat, lon). Only valid for geo rounds.
    pub fn to_lat_lon(&self, p: Point) -> Result<(f64, f64), EngineError> {
        match &self.mode {
            CoordMode::Geo(bounds) => {
                let natural = self.scale.to_natural(p);
                Ok(bounds.to_lat_lon(natural, self.natural_width, self.natural_height))
            }
            CoordMode::Pixel => Err(EngineError::InvalidGeometry(
                "geo conversion requested for a pixel-anchored round".to_string(),
            )),
        }
    }

    /// Convert a configured target into display space. Happens exactly once,
    /// at round load; the target's declared mode must match the round's.
    pub fn project_target(&self, target: &Target) -> Result<Point, EngineError> {
        match (target, &self.mode) {
            (Target::Pixel { x, y }, CoordMode::Pixel) => {
                Ok(self.scale.to_display(Point::new(*x, *y)))
            }
            (Target::Geo { lat, lon }, CoordMode::Geo(_)) => self.to_canvas(*lat, *lon),
            _ => Err(EngineError::InvalidGeometry(
                "target coordinate mode does not match the round's mode".to_string(),
            )),
        }
    }
}

/// Great-circle distance between two (lat, lon) pairs in kilometres.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweden_bounds() -> GeoBounds {
        GeoBounds {
            lon_min: 10.5,
            lon_max: 24.2,
            lat_min: 55.2,
            lat_max: 69.1,
        }
    }

    #[test]
    fn test_fit_picks_limiting_axis() {
        // 1000x500 image into a 500x500 viewport: width is limiting.
        let s = DisplayScale::fit(1000.0, 500.0, 500.0, 500.0).unwrap();
        assert!((s.factor() - 0.5).abs() < 1e-9);
        // 500x1000 image into the same viewport: height is limiting.
        let s = DisplayScale::fit(500.0, 1000.0, 500.0, 500.0).unwrap();
        assert!((s.factor() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_non_positive_dimensions() {
        assert!(matches!(
            DisplayScale::fit(0.0, 500.0, 500.0, 500.0),
            Err(EngineError::InvalidGeometry(_))
        ));
        assert!(matches!(
            DisplayScale::fit(1000.0, 500.0, -1.0, 500.0),
            Err(EngineError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_display_natural_roundtrip() {
        let s = DisplayScale::fit(1260.0, 1540.0, 900.0, 740.0).unwrap();
        let p = Point::new(417.3, 1011.9);
        let back = s.to_natural(s.to_display(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_geo_bounds_corners() {
        let b = sweden_bounds();
        // North-west corner of the box is the image origin.
        let nw = b.to_canvas(69.1, 10.5, 1260.0, 1540.0);
        assert!((nw.x - 0.0).abs() < 1e-9);
        assert!((nw.y - 0.0).abs() < 1e-9);
        // South-east corner is the far image corner.
        let se = b.to_canvas(55.2, 24.2, 1260.0, 1540.0);
        assert!((se.x - 1260.0).abs() < 1e-9);
        assert!((se.y - 1540.0).abs() < 1e-9);
    }

    #[test]
    fn test_geo_roundtrip() {
        let b = sweden_bounds();
        let p = b.to_canvas(58.41, 15.62, 1260.0, 1540.0);
        let (lat, lon) = b.to_lat_lon(p, 1260.0, 1540.0);
        assert!((lat - 58.41).abs() < 1e-9);
        assert!((lon - 15.62).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let b = GeoBounds {
            lon_min: 24.2,
            lon_max: 10.5,
            lat_min: 55.2,
            lat_max: 69.1,
        };
        assert!(matches!(b.validate(), Err(EngineError::InvalidGeometry(_))));
    }

    #[test]
    fn test_mapper_rejects_mode_mismatch() {
        let mapper =
            GeometryMapper::new(1260.0, 1540.0, 900.0, 740.0, CoordMode::Pixel).unwrap();
        assert!(mapper.to_canvas(58.41, 15.62).is_err());
        assert!(mapper
            .project_target(&Target::Geo { lat: 58.41, lon: 15.62 })
            .is_err());

        let mapper = GeometryMapper::new(
            1260.0,
            1540.0,
            900.0,
            740.0,
            CoordMode::Geo(sweden_bounds()),
        )
        .unwrap();
        assert!(mapper
            .project_target(&Target::Pixel { x: 10.0, y: 10.0 })
            .is_err());
    }

    #[test]
    fn test_project_pixel_target_scales() {
        let mapper =
            GeometryMapper::new(1000.0, 500.0, 500.0, 500.0, CoordMode::Pixel).unwrap();
        let t = mapper
            .project_target(&Target::Pixel { x: 200.0, y: 100.0 })
            .unwrap();
        assert!((t.x - 100.0).abs() < 1e-9);
        assert!((t.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_stockholm_gothenburg() {
        // Stockholm (59.33, 18.07) to Gothenburg (57.71, 11.97): ~398 km.
        let d = haversine_km((59.33, 18.07), (57.71, 11.97));
        assert!(d > 390.0 && d < 410.0, "got {d}");
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let d = haversine_km((58.41, 15.62), (58.41, 15.62));
        assert!(d.abs() < 1e-9);
    }
}
