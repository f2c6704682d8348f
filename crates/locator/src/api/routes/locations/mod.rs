use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use locator_core::{filter_by_region, Location};

use crate::{api::routes::RegionQuery, startup::AppState};

/// Normalized location list for the browser client. Same region filter as
/// the fragments; no region means all locations.
pub async fn get_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> Json<Vec<Location>> {
    let locations = state.feed.locations().await;
    Json(
        filter_by_region(&locations, &query.tag())
            .into_iter()
            .cloned()
            .collect(),
    )
}
