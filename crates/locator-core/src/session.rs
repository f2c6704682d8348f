//! The composing shell around the locator components.
//!
//! Every UI event (button click, map click, style and feed signals) arrives
//! as a [`Command`] and goes through [`Session::dispatch`]. The session owns
//! one of each component plus the page view, so there is no shared mutable
//! state outside of it.

use log::{debug, info, warn};
use maud::Markup;
use serde::{Deserialize, Serialize};

use crate::{
    config::LocatorConfig,
    errors::LocatorError,
    location::{Coordinates, Location},
    map::{MapEngine, MapViewAdapter, Pixel},
    popup::PopupController,
    region::{filter_by_region, initial_region, RegionSelector},
    store::LocationStore,
    templates::{render_location_list, render_popup},
};

const FALLBACK_CENTER: Coordinates = Coordinates::new(135.0, -20.734);
const FALLBACK_ZOOM: f64 = 4.0;

/// The page elements the session writes into. Implementations skip any
/// element that is not on the page.
pub trait PageView {
    fn render_list(&mut self, markup: Markup);
    /// Mark exactly one region button as selected
    fn mark_selected_region(&mut self, tag: &str);
    fn scroll_list_into_view(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    StyleLoaded,
    StyleFailed { message: String },
    LocationsLoaded { locations: Vec<Location> },
    LocationsFailed { message: String },
    SelectRegion { region: String },
    ViewOnMap { slug: String },
    MapClick { x: f64, y: f64 },
    DismissPopup,
    GeocodeResult { longitude: f64, latitude: f64 },
}

impl Command {
    /// The style outcome, either way, is the cue to fetch locations. A failed
    /// style still leaves the list usable.
    pub fn starts_feed(&self) -> bool {
        matches!(self, Command::StyleLoaded | Command::StyleFailed { .. })
    }
}

pub struct Session {
    config: LocatorConfig,
    store: LocationStore,
    map: MapViewAdapter,
    popup: PopupController,
    regions: RegionSelector,
    view: Box<dyn PageView>,
}

impl Session {
    pub fn new(config: LocatorConfig, engine: Box<dyn MapEngine>, view: Box<dyn PageView>) -> Self {
        let map = MapViewAdapter::new(engine, config.map.clone());
        let popup = PopupController::new(config.map.popup_offset);
        let regions = RegionSelector::new(config.regions.clone(), &config.default_region);

        Self {
            config,
            store: LocationStore::new(),
            map,
            popup,
            regions,
            view,
        }
    }

    /// First phase of startup: pick the initial region from the viewer's
    /// timezone and create the map there. Locations arrive later, after the
    /// style is ready.
    pub fn start(&mut self, timezone: Option<&str>) -> String {
        let initial = initial_region(
            self.regions.regions(),
            &self.config.default_region,
            timezone,
        );

        let (center, zoom) = self
            .regions
            .select(&initial)
            .map(|setting| (setting.center, setting.zoom))
            .unwrap_or((FALLBACK_CENTER, FALLBACK_ZOOM));

        self.map.initialize(&self.config.page.map_id, center, zoom);
        self.view.mark_selected_region(&initial);
        info!("locator started in region {} (timezone {:?})", initial, timezone);
        initial
    }

    pub fn dispatch(&mut self, command: Command) -> Result<(), LocatorError> {
        debug!("dispatching {}", command_name(&command));

        match command {
            Command::StyleLoaded => {
                self.map.on_style_ready();
                Ok(())
            }
            Command::StyleFailed { message } => Err(self.map.on_style_error(message)),
            Command::LocationsLoaded { locations } => {
                self.load_locations(locations);
                Ok(())
            }
            Command::LocationsFailed { message } => {
                warn!("failed to load locations: {}", message);
                self.load_locations(Vec::new());
                Err(LocatorError::Feed(message))
            }
            Command::SelectRegion { region } => {
                self.select_region(&region);
                Ok(())
            }
            Command::ViewOnMap { slug } => {
                self.view_on_map(&slug);
                Ok(())
            }
            Command::MapClick { x, y } => {
                self.map_click(Pixel { x, y });
                Ok(())
            }
            Command::DismissPopup => {
                self.popup.dismiss(self.map.engine_mut());
                Ok(())
            }
            Command::GeocodeResult {
                longitude,
                latitude,
            } => {
                let center = Coordinates::checked(longitude, latitude).ok_or_else(|| {
                    LocatorError::InvalidCommand(format!(
                        "geocode result off the map: {longitude}, {latitude}"
                    ))
                })?;
                self.map.animate_camera(
                    center,
                    self.config.map.geocode_zoom,
                    self.config.map.animation_ms,
                );
                Ok(())
            }
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn map(&self) -> &MapViewAdapter {
        &self.map
    }

    pub fn popup(&self) -> &PopupController {
        &self.popup
    }

    pub fn selected_region(&self) -> &str {
        self.regions.selected()
    }

    /// The filtered view for the selected region, in store order
    pub fn visible_locations(&self) -> Vec<&Location> {
        filter_by_region(self.store.all(), self.regions.selected())
    }

    fn load_locations(&mut self, locations: Vec<Location>) {
        if !self.store.populate(locations) {
            return;
        }
        let placed = self.map.set_markers(self.store.all());
        info!(
            "loaded {} locations, {} with map markers",
            self.store.len(),
            placed
        );
        self.render_list();
    }

    fn select_region(&mut self, region: &str) {
        let target = self
            .regions
            .select(region)
            .map(|setting| (setting.center, setting.zoom));
        let selected = self.regions.selected().to_string();

        self.view.mark_selected_region(&selected);
        self.view.scroll_list_into_view();

        match target {
            Some((center, zoom)) => {
                self.map
                    .animate_camera(center, zoom, self.config.map.animation_ms)
            }
            None => debug!("region {} has no camera target", selected),
        }

        // Until the feed arrives the server-rendered list stays in place
        if self.store.is_populated() {
            self.render_list();
        }
    }

    fn view_on_map(&mut self, slug: &str) {
        let Some(location) = self.map.marker(slug).cloned() else {
            debug!("no marker for slug {:?}", slug);
            return;
        };
        let Some(center) = location.coordinates else {
            return;
        };

        self.map.animate_camera(
            center,
            self.config.map.view_zoom,
            self.config.map.animation_ms,
        );
        self.show_popup(&location);
    }

    fn map_click(&mut self, pixel: Pixel) {
        match self.map.hit_test(pixel).cloned() {
            Some(location) => self.show_popup(&location),
            None => debug!("no marker at {:?}", pixel),
        }
    }

    fn show_popup(&mut self, location: &Location) {
        let content = render_popup(location, &self.config.brand);
        self.popup.show(self.map.engine_mut(), location, content);
    }

    fn render_list(&mut self) {
        let markup = render_location_list(&self.visible_locations());
        self.view.render_list(markup);
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::StyleLoaded => "style_loaded",
        Command::StyleFailed { .. } => "style_failed",
        Command::LocationsLoaded { .. } => "locations_loaded",
        Command::LocationsFailed { .. } => "locations_failed",
        Command::SelectRegion { .. } => "select_region",
        Command::ViewOnMap { .. } => "view_on_map",
        Command::MapClick { .. } => "map_click",
        Command::DismissPopup => "dismiss_popup",
        Command::GeocodeResult { .. } => "geocode_result",
    }
}
