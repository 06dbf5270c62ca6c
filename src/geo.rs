use std::fmt;

pub const DEFAULT_EMBED_BASE: &str = "https://www.openstreetmap.org/export/embed.html";
pub const DEFAULT_EMBED_LAYER: &str = "mapnik";
pub const DEFAULT_BBOX_OFFSET: f64 = 0.002;

/// Axis-aligned box in degrees. Out-of-range values pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn around(lat: f64, lon: f64, offset: f64) -> Self {
        Self::spanning(lat, lon, offset, offset)
    }

    pub fn spanning(lat: f64, lon: f64, half_lat: f64, half_lon: f64) -> Self {
        Self {
            min_lon: lon - half_lon,
            min_lat: lat - half_lat,
            max_lon: lon + half_lon,
            max_lat: lat + half_lat,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            Coord(self.min_lon),
            Coord(self.min_lat),
            Coord(self.max_lon),
            Coord(self.max_lat)
        )
    }
}

/// Shortest decimal form after rounding to 7 places, e.g. `40.0` -> `40`.
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1e7).round() / 1e7;
        // avoid "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{rounded}")
    }
}

/// Query for the embed endpoint: `bbox`, `layer` and an optional `marker`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedRequest {
    pub bbox: BoundingBox,
    pub layer: String,
    pub marker: Option<(f64, f64)>,
    pub label: Option<String>,
}

impl EmbedRequest {
    pub fn focus(lat: f64, lon: f64, offset: f64, layer: &str) -> Self {
        Self {
            bbox: BoundingBox::around(lat, lon, offset),
            layer: layer.to_string(),
            marker: Some((lat, lon)),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{base}?bbox={}&layer={}", self.bbox, self.layer);
        if let Some((lat, lon)) = self.marker {
            url.push_str(&format!("&marker={},{}", Coord(lat), Coord(lon)));
        }
        url
    }
}
