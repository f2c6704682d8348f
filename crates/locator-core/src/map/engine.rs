use serde::Serialize;
use serde_json::{json, Value};

use crate::location::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

/// Initial camera and style handed to the engine once at startup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraOptions {
    pub container: String,
    pub style: String,
    pub access_token: String,
    pub center: Coordinates,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    pub slug: String,
    pub coordinates: Coordinates,
    pub icon_url: String,
}

/// Style layer definition in the engine's own JSON vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    pub filter: Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "minzoom")]
    pub min_zoom: f64,
    pub paint: Value,
}

impl LayerSpec {
    /// Extruded 3D buildings, only drawn from `min_zoom` up
    pub fn building_extrusion(min_zoom: f64) -> Self {
        Self {
            id: String::from("3d-buildings"),
            source: String::from("composite"),
            source_layer: String::from("building"),
            filter: json!(["==", "extrude", "true"]),
            kind: String::from("fill-extrusion"),
            min_zoom,
            paint: json!({
                "fill-extrusion-color": "#aaa",
                "fill-extrusion-height": ["get", "height"],
                "fill-extrusion-base": ["get", "min_height"],
                "fill-extrusion-opacity": 0.6
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    BottomCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySpec {
    pub position: Coordinates,
    pub anchor: Anchor,
    pub offset: [f64; 2],
    /// Keep clicks inside the overlay from reaching the map
    pub stop_event: bool,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u32);

/// The capabilities the locator needs from a map rendering engine. Any
/// engine providing these can be substituted.
pub trait MapEngine {
    /// Create the map with its base style and initial camera
    fn create(&mut self, camera: &CameraOptions);
    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>);
    /// Id of the first symbol layer in the loaded style, used to keep
    /// labels drawn above added layers
    fn first_symbol_layer(&self) -> Option<String>;
    /// Replace the whole marker set
    fn set_markers(&mut self, markers: &[MarkerSpec]);
    /// Start a camera transition. A running transition is replaced.
    fn fly_to(&mut self, center: Coordinates, zoom: f64, duration_ms: u32);
    /// Screen position of a coordinate, None when it is not on screen
    fn project(&self, coordinates: Coordinates) -> Option<Pixel>;
    fn add_overlay(&mut self, overlay: &OverlaySpec) -> OverlayId;
    fn remove_overlay(&mut self, id: OverlayId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_wire_format() {
        let overlay = OverlaySpec {
            position: Coordinates::new(115.7562, -31.8942),
            anchor: Anchor::BottomCenter,
            offset: [0.0, -10.0],
            stop_event: true,
            content: String::from("<div></div>"),
        };
        let value = serde_json::to_value(&overlay).unwrap();

        assert_eq!(value["anchor"], "bottom-center");
        assert_eq!(value["stopEvent"], true);
        assert_eq!(value["position"]["longitude"], 115.7562);
    }
}
