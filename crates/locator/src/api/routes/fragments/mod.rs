use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use locator_core::{
    filter_by_region,
    templates::{render_location_list, render_popup},
};
use log::debug;
use maud::html;

use crate::{api::routes::RegionQuery, startup::AppState};

/// List panel for one region, the same markup the client renders
pub async fn location_list_fragment(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> Html<String> {
    let locations = state.feed.locations().await;
    let visible = filter_by_region(&locations, &query.tag());
    Html(render_location_list(&visible).into_string())
}

pub async fn location_popup_fragment(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.feed.find(&slug).await {
        Some(location) => {
            Html(render_popup(&location, &state.locator.brand).into_string()).into_response()
        }
        None => {
            debug!("no location for slug {:?}", slug);
            let markup = html! {
                div class="notification is-warning is-light" { "Gym not found." }
            };
            (StatusCode::NOT_FOUND, Html(markup.into_string())).into_response()
        }
    }
}
