use std::f64::consts::PI;

use tracing::info;

use crate::config::MapConfig;
use crate::geo::{BoundingBox, EmbedRequest};

pub const DEFAULT_TARGET: &str = "web-map";
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

// Web Mercator latitude limit.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Slippy-map tile that contains the given point at `zoom`.
    pub fn containing(lat: f64, lon: f64, zoom: u8) -> Self {
        let n = f64::from(1u32 << zoom.min(31));
        let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
        let max = n - 1.0;
        Self {
            z: zoom,
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
        }
    }
}

/// Raster tile source with a `{z}/{x}/{y}` URL template.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub visible: bool,
}

impl TileLayer {
    pub fn osm() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            visible: true,
        }
    }

    pub fn tile_url(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

/// The map surface: fixed center and zoom, one visible base layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub target: String,
    pub center: (f64, f64),
    pub zoom: u8,
    pub layers: Vec<TileLayer>,
}

impl MapView {
    pub fn init(cfg: &MapConfig) -> Self {
        let view = Self {
            target: cfg.target.clone(),
            center: (cfg.center_lat, cfg.center_lon),
            zoom: cfg.zoom,
            layers: vec![TileLayer {
                url_template: cfg.tile_url.clone(),
                attribution: cfg.attribution.clone(),
                ..TileLayer::osm()
            }],
        };
        let center_tile = view
            .base_layer()
            .map(|l| l.tile_url(view.center_tile()))
            .unwrap_or_default();
        info!(target_pane = %view.target, center = ?view.center, zoom = view.zoom, tile = %center_tile, "map initialized");
        view
    }

    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.visible)
    }

    /// Tile under the view center.
    pub fn center_tile(&self) -> TileCoord {
        TileCoord::containing(self.center.0, self.center.1, self.zoom)
    }

    /// Degrees covered by the view; one 256px tile width per side at `zoom`.
    pub fn extent(&self) -> BoundingBox {
        let half_lon = (360.0 / f64::from(1u32 << self.zoom.min(31))).min(180.0);
        let half_lat = (half_lon / 2.0).min(90.0);
        BoundingBox::spanning(self.center.0, self.center.1, half_lat, half_lon)
    }

    /// First request the embedded frame shows, before any selection.
    pub fn initial_embed(&self, layer: &str) -> EmbedRequest {
        EmbedRequest {
            bbox: self.extent(),
            layer: layer.to_string(),
            marker: None,
            label: None,
        }
    }
}
