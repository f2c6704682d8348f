//! Map view adapter: the only owner of the engine, the camera and the
//! marker layer.
//!
//! Markers can only be placed once the engine reports its style as loaded.
//! Marker sets arriving earlier are queued and pushed on `on_style_ready`.

mod engine;

pub use engine::*;

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    config::MapOptions,
    errors::LocatorError,
    location::{Coordinates, Location},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coordinates,
    pub zoom: f64,
}

#[derive(Debug, Clone)]
struct Marker {
    location: Location,
    coordinates: Coordinates,
}

pub struct MapViewAdapter {
    engine: Box<dyn MapEngine>,
    options: MapOptions,
    initialized: bool,
    style: StyleState,
    camera: Option<Camera>,
    /// Insertion order doubles as z-order, later markers draw on top
    markers: Vec<Marker>,
    by_slug: HashMap<String, usize>,
    markers_pending: bool,
}

impl MapViewAdapter {
    pub fn new(engine: Box<dyn MapEngine>, options: MapOptions) -> Self {
        Self {
            engine,
            options,
            initialized: false,
            style: StyleState::Loading,
            camera: None,
            markers: Vec::new(),
            by_slug: HashMap::new(),
            markers_pending: false,
        }
    }

    /// One-time engine setup; later calls are ignored
    pub fn initialize(&mut self, container: &str, center: Coordinates, zoom: f64) {
        if self.initialized {
            debug!("map already initialized");
            return;
        }

        self.engine.create(&CameraOptions {
            container: container.to_string(),
            style: self.options.style_url.clone(),
            access_token: self.options.access_token.clone(),
            center,
            zoom,
            pitch: self.options.pitch,
            bearing: self.options.bearing,
        });
        self.camera = Some(Camera { center, zoom });
        self.initialized = true;
        info!("map created at {:?} zoom {}", center, zoom);
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn is_ready(&self) -> bool {
        self.style == StyleState::Ready
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    /// Second phase of startup: the style is loaded, so overlay layers and
    /// any queued markers can go onto the map.
    pub fn on_style_ready(&mut self) {
        if self.is_ready() {
            return;
        }
        self.style = StyleState::Ready;

        let labels = self.engine.first_symbol_layer();
        self.engine.add_layer(
            &LayerSpec::building_extrusion(self.options.building_min_zoom),
            labels.as_deref(),
        );

        if self.markers_pending {
            self.push_markers();
        }
        info!("map style ready, {} markers placed", self.markers.len());
    }

    /// Record a style failure. The map stays usable, so the error goes back
    /// to the caller instead of aborting anything.
    pub fn on_style_error(&mut self, message: String) -> LocatorError {
        warn!("map style failed to load: {}", message);
        self.style = StyleState::Failed(message.clone());
        LocatorError::StyleLoad(message)
    }

    /// Replace the marker set. Locations without coordinates get no marker.
    /// Returns the number of markers placed (or queued).
    pub fn set_markers(&mut self, locations: &[Location]) -> usize {
        self.markers = locations
            .iter()
            .filter_map(|location| {
                location.coordinates.map(|coordinates| Marker {
                    location: location.clone(),
                    coordinates,
                })
            })
            .collect();

        self.by_slug = self
            .markers
            .iter()
            .enumerate()
            .filter(|(_, marker)| !marker.location.id.is_empty())
            .map(|(index, marker)| (marker.location.id.clone(), index))
            .collect();

        let skipped = locations.len() - self.markers.len();
        if skipped > 0 {
            debug!("{} locations have no coordinates and stay off the map", skipped);
        }

        if self.is_ready() {
            self.push_markers();
        } else {
            debug!("style not ready, queueing {} markers", self.markers.len());
            self.markers_pending = true;
        }

        self.markers.len()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Fire-and-forget camera move. A newer call replaces the running one.
    pub fn animate_camera(&mut self, center: Coordinates, zoom: f64, duration_ms: u32) {
        self.camera = Some(Camera { center, zoom });
        self.engine.fly_to(center, zoom, duration_ms);
    }

    /// Topmost marker whose glyph covers the pixel
    pub fn hit_test(&self, pixel: Pixel) -> Option<&Location> {
        if !self.is_ready() {
            return None;
        }

        let [width, height] = self.options.marker_size;
        self.markers
            .iter()
            .rev()
            .find(|marker| {
                self.engine
                    .project(marker.coordinates)
                    .is_some_and(|anchor| glyph_contains(anchor, width, height, pixel))
            })
            .map(|marker| &marker.location)
    }

    pub fn lookup_marker(&self, slug: &str) -> Option<Coordinates> {
        self.marker(slug).and_then(|location| location.coordinates)
    }

    /// Location behind the marker for a slug. Empty slugs never match.
    pub fn marker(&self, slug: &str) -> Option<&Location> {
        if slug.is_empty() {
            return None;
        }
        self.by_slug
            .get(slug)
            .and_then(|index| self.markers.get(*index))
            .map(|marker| &marker.location)
    }

    /// Engine access for the popup controller, which owns the overlay layer
    pub fn engine_mut(&mut self) -> &mut dyn MapEngine {
        self.engine.as_mut()
    }

    fn push_markers(&mut self) {
        let specs: Vec<MarkerSpec> = self
            .markers
            .iter()
            .map(|marker| MarkerSpec {
                slug: marker.location.id.clone(),
                coordinates: marker.coordinates,
                icon_url: self.options.marker_icon_url.clone(),
            })
            .collect();
        self.engine.set_markers(&specs);
        self.markers_pending = false;
    }
}

/// The glyph is anchored bottom-centre on its coordinate
fn glyph_contains(anchor: Pixel, width: f64, height: f64, pixel: Pixel) -> bool {
    let dx = (pixel.x - anchor.x).abs();
    let dy = anchor.y - pixel.y;
    dx <= width / 2.0 && (0.0..=height).contains(&dy)
}
