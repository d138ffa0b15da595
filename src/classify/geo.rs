// src/classify/geo.rs

use serde::{Deserialize, Serialize};

pub const UNKNOWN_STATE: &str = "Desconocido";
pub const OTHER_STATE: &str = "Otro Estado";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Builds a point from nullable `latitud` / `longitud` columns.
    pub fn from_coords(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self::new(lat, lng)),
            _ => None,
        }
    }
}

/// Rectangular approximation of a state. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRegion {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl StateRegion {
    pub const fn new(name: &'static str, lat: (f64, f64), lng: (f64, f64)) -> Self {
        Self { name, lat_min: lat.0, lat_max: lat.1, lng_min: lng.0, lng_max: lng.1 }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.latitude)
            && (self.lng_min..=self.lng_max).contains(&point.longitude)
    }
}

// ───────────────────────────────────────
// Region table, consulted top to bottom.
// Boxes overlap; the first match wins. Coahuila must stay ahead of
// Nuevo León so Saltillo-area branches land in Coahuila.
// ───────────────────────────────────────
pub static STATE_REGIONS: [StateRegion; 10] = [
    StateRegion::new("Coahuila", (25.2, 27.0), (-101.6, -100.85)),
    // metro Monterrey
    StateRegion::new("Nuevo León", (25.5, 26.0), (-100.6, -99.8)),
    StateRegion::new("Nuevo León", (25.0, 27.8), (-100.6, -99.0)),
    // frontier strip (Nuevo Laredo)
    StateRegion::new("Tamaulipas", (27.0, 28.0), (-99.8, -99.3)),
    StateRegion::new("Tamaulipas", (22.2, 27.0), (-99.5, -97.0)),
    StateRegion::new("Durango", (22.3, 26.9), (-107.1, -102.3)),
    StateRegion::new("Querétaro", (20.0, 21.7), (-101.0, -99.0)),
    StateRegion::new("Michoacán", (18.3, 20.4), (-103.7, -100.0)),
    StateRegion::new("Guanajuato", (19.9, 21.7), (-102.1, -100.0)),
    StateRegion::new("San Luis Potosí", (21.1, 24.5), (-102.2, -98.3)),
];

/// First-match-wins lookup over an immutable region table.
#[derive(Debug, Clone, Copy)]
pub struct GeoClassifier {
    regions: &'static [StateRegion],
}

impl Default for GeoClassifier {
    fn default() -> Self {
        Self::new(&STATE_REGIONS)
    }
}

impl GeoClassifier {
    pub const fn new(regions: &'static [StateRegion]) -> Self {
        Self { regions }
    }

    pub fn classify(&self, point: Option<GeoPoint>) -> &'static str {
        let Some(point) = point else {
            return UNKNOWN_STATE;
        };
        if !point.latitude.is_finite() || !point.longitude.is_finite() {
            return UNKNOWN_STATE;
        }

        self.regions
            .iter()
            .find(|region| region.contains(point))
            .map(|region| region.name)
            .unwrap_or(OTHER_STATE)
    }

    pub fn classify_coords(&self, latitude: Option<f64>, longitude: Option<f64>) -> &'static str {
        self.classify(GeoPoint::from_coords(latitude, longitude))
    }
}
