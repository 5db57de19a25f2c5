//! Viewer and editor links for a point.

use crate::api::endpoint;
use crate::config::Config;
use crate::geometry::{BoundingBox, Point, format_degrees};

#[derive(Debug, Clone)]
pub struct Links {
    view_url: String,
    josm_url: String,
    zoom: u8,
    bbox_delta: f64,
}

impl Links {
    pub fn new(config: &Config) -> Self {
        Self {
            view_url: config.view.url.clone(),
            josm_url: config.josm.url.clone(),
            zoom: config.view.zoom,
            bbox_delta: config.view.bbox_delta,
        }
    }

    pub fn bounding_box(&self, point: Point) -> BoundingBox {
        BoundingBox::around(point, self.bbox_delta)
    }

    /// openstreetmap.org link with a marker on `point`, centered on it.
    pub fn viewer_url(&self, point: Point) -> String {
        let (lat, lon) = (format_degrees(point.lat), format_degrees(point.lon));
        format!(
            "{}?mlat={lat}&mlon={lon}&zoom={zoom}/{lat}/{lon}",
            endpoint(&self.view_url, ""),
            zoom = self.zoom,
        )
    }

    /// JOSM remote control command loading the data inside `bbox`.
    pub fn editor_url(&self, bbox: &BoundingBox) -> String {
        format!(
            "{}?top={}&bottom={}&left={}&right={}",
            endpoint(&self.josm_url, "load_and_zoom"),
            format_degrees(bbox.north),
            format_degrees(bbox.south),
            format_degrees(bbox.west),
            format_degrees(bbox.east),
        )
    }

    /// Viewer and editor links for `point`.
    pub fn for_point(&self, point: Point) -> (String, String) {
        (
            self.viewer_url(point),
            self.editor_url(&self.bounding_box(point)),
        )
    }
}
