//! Client-facing locator configuration.
//!
//! The server loads this as part of its settings file and serializes it into
//! the page, where the WASM client deserializes it again.

use serde::{Deserialize, Serialize};

use crate::region::{default_regions, RegionSetting};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Where the client fetches the normalized location list from
    pub locations_url: String,
    pub map: MapOptions,
    pub page: PageOptions,
    pub brand: BrandOptions,
    /// Region tag used when the viewer's timezone matches no region
    pub default_region: String,
    pub regions: Vec<RegionSetting>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            locations_url: String::from("/api/v1/locations"),
            map: MapOptions::default(),
            page: PageOptions::default(),
            brand: BrandOptions::default(),
            default_region: String::from("WA"),
            regions: default_regions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub style_url: String,
    /// Public map access token; handed to the browser as-is
    pub access_token: String,
    pub pitch: f64,
    pub bearing: f64,
    pub marker_icon_url: String,
    /// Marker glyph size in pixels (width, height), anchored bottom-centre
    pub marker_size: [f64; 2],
    /// Building extrusions only render at or above this zoom
    pub building_min_zoom: f64,
    /// Zoom used when a list entry asks to be shown on the map
    pub view_zoom: f64,
    /// Zoom used when the search box resolves an address
    pub geocode_zoom: f64,
    pub animation_ms: u32,
    /// Popup offset in pixels so it sits above the marker glyph
    pub popup_offset: [f64; 2],
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style_url: String::from("mapbox://styles/mathew-revo/cmbzuv84g006b01soe92r8kg8"),
            access_token: String::new(),
            pitch: 60.0,
            bearing: -20.0,
            marker_icon_url: String::from(
                "https://revofitness.com.au/wp-content/uploads/2025/06/revo-map-pin-50x50-1.png",
            ),
            marker_size: [50.0, 50.0],
            building_min_zoom: 15.0,
            view_zoom: 13.0,
            geocode_zoom: 14.0,
            animation_ms: 800,
            popup_offset: [0.0, -10.0],
        }
    }
}

/// Ids of the page elements the client writes into. A missing element
/// disables the feature tied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub map_id: String,
    pub list_id: String,
    pub region_buttons_id: String,
    pub search_container_id: String,
    /// Space left above the list when scrolling it into view
    pub scroll_offset: f64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            map_id: String::from("map"),
            list_id: String::from("location-list"),
            region_buttons_id: String::from("region-buttons"),
            search_container_id: String::from("search-container"),
            scroll_offset: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandOptions {
    /// Contact emails are `<name>@<email_domain>`
    pub email_domain: String,
    /// Shown when a location has no phone number of its own
    pub fallback_phone: Option<String>,
}

impl Default for BrandOptions {
    fn default() -> Self {
        Self {
            email_domain: String::from("revofitness.com.au"),
            fallback_phone: Some(String::from("1300 738 638")),
        }
    }
}
