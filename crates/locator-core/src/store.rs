use log::warn;

use crate::location::Location;

/// The full fetched location list. Filled once per session, never mutated
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
    populated: bool,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false and keeps the existing list when already populated
    pub fn populate(&mut self, locations: Vec<Location>) -> bool {
        if self.populated {
            warn!(
                "location store already holds {} locations, ignoring {} more",
                self.locations.len(),
                locations.len()
            );
            return false;
        }
        self.locations = locations;
        self.populated = true;
        true
    }

    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Later duplicates win, matching the marker lookup
    pub fn find(&self, slug: &str) -> Option<&Location> {
        if slug.is_empty() {
            return None;
        }
        self.locations.iter().rev().find(|location| location.id == slug)
    }
}
