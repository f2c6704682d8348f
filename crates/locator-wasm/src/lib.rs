//! locator-wasm: browser client for the store locator
//!
//! Owns the [`Session`] on the page. The JS glue in `/ui/locator.js` drives
//! the map library and forwards map, geocoder and button events here as
//! [`Command`]s.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use js_sys::{Array, Intl, Object, Reflect};
use locator_core::{Command, Location, LocatorConfig, Session};
use log::{info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Response;

mod dom;
mod engine;

pub use dom::DomView;
pub use engine::JsMapEngine;

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("locator-wasm initialized");
}

#[wasm_bindgen]
pub struct LocatorApp {
    session: Rc<RefCell<Session>>,
    locations_url: String,
    locations_requested: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl LocatorApp {
    /// Creates the map in the viewer's region. Locations are requested once
    /// the map style has loaded or failed.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LocatorApp, JsValue> {
        let config: LocatorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid locator config: {}", e)))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let locations_url = config.locations_url.clone();
        let view = DomView::new(window, document, &config.page);
        let mut session = Session::new(config, Box::new(JsMapEngine), Box::new(view));
        let region = session.start(browser_timezone().as_deref());
        info!("locator ready, region {}", region);

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            locations_url,
            locations_requested: Rc::new(Cell::new(false)),
        })
    }

    /// Apply one event from the page, e.g. `{ type: "select_region", region: "WA" }`
    pub fn dispatch(&self, command: JsValue) -> Result<(), JsValue> {
        let command: Command = serde_wasm_bindgen::from_value(command)
            .map_err(|e| JsValue::from_str(&format!("invalid command: {}", e)))?;
        let starts_feed = command.starts_feed();

        let result = self.session.borrow_mut().dispatch(command);
        if starts_feed {
            self.request_locations();
        }
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = "selectedRegion")]
    pub fn selected_region(&self) -> String {
        self.session.borrow().selected_region().to_string()
    }

    #[wasm_bindgen(getter, js_name = "markerCount")]
    pub fn marker_count(&self) -> usize {
        self.session.borrow().map().marker_count()
    }

    fn request_locations(&self) {
        if self.locations_requested.replace(true) {
            return;
        }

        let session = self.session.clone();
        let url = self.locations_url.clone();
        spawn_local(async move {
            let command = match fetch_locations(&url).await {
                Ok(locations) => Command::LocationsLoaded { locations },
                Err(e) => Command::LocationsFailed {
                    message: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
                },
            };
            if let Err(e) = session.borrow_mut().dispatch(command) {
                warn!("{}", e);
            }
        });
    }
}

async fn fetch_locations(url: &str) -> Result<Vec<Location>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "location feed returned {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("location feed is not text"))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// IANA timezone reported by the browser, e.g. `Australia/Perth`
fn browser_timezone() -> Option<String> {
    let options = Intl::DateTimeFormat::new(&Array::new(), &Object::new()).resolved_options();
    Reflect::get(&options, &JsValue::from_str("timeZone"))
        .ok()
        .and_then(|zone| zone.as_string())
}
