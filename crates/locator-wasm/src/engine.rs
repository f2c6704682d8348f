use locator_core::{
    CameraOptions, Coordinates, LayerSpec, MapEngine, MarkerSpec, OverlayId, OverlaySpec, Pixel,
};
use log::error;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Thin bindings over the map library glue in `/ui/locator.js`
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = create)]
    fn js_create(camera: JsValue);

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = addLayer)]
    fn js_add_layer(layer: JsValue, before: Option<String>);

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = firstSymbolLayer)]
    fn js_first_symbol_layer() -> Option<String>;

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = setMarkers)]
    fn js_set_markers(markers: JsValue);

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = flyTo)]
    fn js_fly_to(center: JsValue, zoom: f64, duration_ms: u32);

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = project)]
    fn js_project(coordinates: JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = addOverlay)]
    fn js_add_overlay(overlay: JsValue) -> u32;

    #[wasm_bindgen(js_namespace = LocatorMapEngine, js_name = removeOverlay)]
    fn js_remove_overlay(id: u32);
}

/// Plain JS objects, no `Map`s, so the glue can hand them straight to the
/// map library
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `MapEngine` backed by the browser map library
#[derive(Default)]
pub struct JsMapEngine;

impl JsMapEngine {
    fn convert<T: Serialize>(what: &str, value: &T) -> Option<JsValue> {
        match to_js(value) {
            Ok(js) => Some(js),
            Err(e) => {
                error!("failed to convert {} for the map: {:?}", what, e);
                None
            }
        }
    }
}

impl MapEngine for JsMapEngine {
    fn create(&mut self, camera: &CameraOptions) {
        if let Some(camera) = Self::convert("camera", camera) {
            js_create(camera);
        }
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) {
        if let Some(layer) = Self::convert("layer", layer) {
            js_add_layer(layer, before.map(String::from));
        }
    }

    fn first_symbol_layer(&self) -> Option<String> {
        js_first_symbol_layer()
    }

    fn set_markers(&mut self, markers: &[MarkerSpec]) {
        if let Some(markers) = Self::convert("markers", &markers) {
            js_set_markers(markers);
        }
    }

    fn fly_to(&mut self, center: Coordinates, zoom: f64, duration_ms: u32) {
        if let Some(center) = Self::convert("camera target", &center) {
            js_fly_to(center, zoom, duration_ms);
        }
    }

    fn project(&self, coordinates: Coordinates) -> Option<Pixel> {
        let coordinates = Self::convert("coordinates", &coordinates)?;
        let pixel = js_project(coordinates);
        if pixel.is_null() || pixel.is_undefined() {
            return None;
        }
        serde_wasm_bindgen::from_value(pixel).ok()
    }

    fn add_overlay(&mut self, overlay: &OverlaySpec) -> OverlayId {
        match Self::convert("popup", overlay) {
            Some(overlay) => OverlayId(js_add_overlay(overlay)),
            // Id 0 is never handed out by the glue, removing it is a no-op
            None => OverlayId(0),
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        js_remove_overlay(id.0);
    }
}
