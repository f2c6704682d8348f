use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    rc::Rc,
};

use maud::Markup;

use crate::{
    location::{slugify, Coordinates, Location},
    map::{CameraOptions, LayerSpec, MapEngine, MarkerSpec, OverlayId, OverlaySpec, Pixel},
    session::PageView,
};

pub fn location(name: &str, region: &str, coordinates: Option<(f64, f64)>) -> Location {
    let name = (!name.is_empty()).then(|| name.to_string());
    Location {
        id: name.as_deref().map(slugify).unwrap_or_default(),
        name,
        coordinates: coordinates.map(|(longitude, latitude)| Coordinates::new(longitude, latitude)),
        region: region.to_string(),
        ..Location::default()
    }
}

/// Flat projection used by the recording engine
pub fn project(coordinates: Coordinates) -> Pixel {
    Pixel {
        x: coordinates.longitude * 10.0,
        y: -coordinates.latitude * 10.0,
    }
}

#[derive(Debug, Default)]
pub struct EngineLog {
    pub created: Vec<CameraOptions>,
    pub layers: Vec<(LayerSpec, Option<String>)>,
    pub marker_pushes: Vec<Vec<MarkerSpec>>,
    pub flights: Vec<(Coordinates, f64, u32)>,
    pub open_overlays: HashMap<OverlayId, OverlaySpec>,
    pub removed_overlays: usize,
    next_overlay: u32,
}

/// Engine double that records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    log: Rc<RefCell<EngineLog>>,
}

impl RecordingEngine {
    pub fn log(&self) -> Ref<'_, EngineLog> {
        self.log.borrow()
    }
}

impl MapEngine for RecordingEngine {
    fn create(&mut self, camera: &CameraOptions) {
        self.log.borrow_mut().created.push(camera.clone());
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) {
        self.log
            .borrow_mut()
            .layers
            .push((layer.clone(), before.map(String::from)));
    }

    fn first_symbol_layer(&self) -> Option<String> {
        Some(String::from("road-label"))
    }

    fn set_markers(&mut self, markers: &[MarkerSpec]) {
        self.log.borrow_mut().marker_pushes.push(markers.to_vec());
    }

    fn fly_to(&mut self, center: Coordinates, zoom: f64, duration_ms: u32) {
        self.log.borrow_mut().flights.push((center, zoom, duration_ms));
    }

    fn project(&self, coordinates: Coordinates) -> Option<Pixel> {
        Some(project(coordinates))
    }

    fn add_overlay(&mut self, overlay: &OverlaySpec) -> OverlayId {
        let mut log = self.log.borrow_mut();
        log.next_overlay += 1;
        let id = OverlayId(log.next_overlay);
        log.open_overlays.insert(id, overlay.clone());
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        let mut log = self.log.borrow_mut();
        if log.open_overlays.remove(&id).is_some() {
            log.removed_overlays += 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewLog {
    pub lists: Vec<String>,
    pub selected: Vec<String>,
    pub scrolls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    log: Rc<RefCell<ViewLog>>,
}

impl RecordingView {
    pub fn log(&self) -> Ref<'_, ViewLog> {
        self.log.borrow()
    }
}

impl PageView for RecordingView {
    fn render_list(&mut self, markup: Markup) {
        self.log.borrow_mut().lists.push(markup.into_string());
    }

    fn mark_selected_region(&mut self, tag: &str) {
        self.log.borrow_mut().selected.push(tag.to_string());
    }

    fn scroll_list_into_view(&mut self) {
        self.log.borrow_mut().scrolls += 1;
    }
}
