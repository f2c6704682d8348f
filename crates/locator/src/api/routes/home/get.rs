use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use locator_core::{filter_by_region, templates::render_location_list, ALL_REGIONS};
use log::error;
use serde::Deserialize;

use crate::{
    startup::AppState,
    templates::{
        layouts::base::{base, PageConfig},
        pages::{locator_page, locator_scripts},
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct RegionQuery {
    pub region: Option<String>,
}

impl RegionQuery {
    pub fn tag(&self) -> String {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .unwrap_or(ALL_REGIONS)
            .to_uppercase()
    }
}

pub async fn locator_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> Response {
    let config = PageConfig {
        title: &state.title,
        api_base: &state.remote_url,
    };

    let region = query.tag();
    let locations = state.feed.locations().await;
    let list = render_location_list(&filter_by_region(&locations, &region));

    let scripts = match locator_scripts(&state.locator) {
        Ok(scripts) => scripts,
        Err(e) => {
            error!("failed to serialize locator config: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };

    let content = locator_page(&state.locator, &region, list);
    Html(base(&config, content, scripts).into_string()).into_response()
}
