use async_trait::async_trait;
use locator_core::{decode_feed, Location};
use std::path::Path;

use super::content::{Error, LocationSource};

/// Serves a fixed location list, loaded from a feed fixture on disk
pub struct StaticLocationSource {
    locations: Vec<Location>,
}

impl StaticLocationSource {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| Error::Request(format!("failed to read {}: {}", path.display(), e)))?;
        Ok(Self::new(decode_feed(&body)?))
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn fetch_locations(&self) -> Result<Vec<Location>, Error> {
        Ok(self.locations.clone())
    }
}
