use log::debug;
use serde::{Deserialize, Serialize};

use crate::location::{Coordinates, Location};

/// Pseudo-region that matches every location
pub const ALL_REGIONS: &str = "ALL";

/// A selectable region and where the camera goes when it is picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSetting {
    pub tag: String,
    pub label: String,
    pub center: Coordinates,
    pub zoom: f64,
    /// IANA timezones whose viewers start on this region
    #[serde(default)]
    pub timezones: Vec<String>,
}

impl RegionSetting {
    fn new(tag: &str, label: &str, center: Coordinates, zoom: f64, timezones: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            label: label.to_string(),
            center,
            zoom,
            timezones: timezones.iter().map(|tz| tz.to_string()).collect(),
        }
    }
}

pub fn default_regions() -> Vec<RegionSetting> {
    vec![
        RegionSetting::new(
            ALL_REGIONS,
            "All",
            Coordinates::new(135.0, -20.734),
            4.0,
            &[],
        ),
        RegionSetting::new(
            "WA",
            "WA",
            Coordinates::new(115.832409, -31.9295999),
            10.0,
            &["Australia/Perth"],
        ),
        RegionSetting::new(
            "NSW",
            "NSW",
            Coordinates::new(151.2093, -33.8688),
            7.0,
            &["Australia/Sydney"],
        ),
        RegionSetting::new(
            "SA",
            "SA",
            Coordinates::new(138.61387, -34.92504),
            9.5,
            &["Australia/Adelaide"],
        ),
        RegionSetting::new(
            "VIC",
            "VIC",
            Coordinates::new(144.9631, -37.9136),
            10.0,
            &["Australia/Melbourne"],
        ),
    ]
}

pub fn is_all_regions(tag: &str) -> bool {
    tag.trim().eq_ignore_ascii_case(ALL_REGIONS)
}

/// Stable filter: `ALL` keeps everything, any other tag keeps the locations
/// whose region matches case-insensitively. Input order is preserved.
pub fn filter_by_region<'a>(locations: &'a [Location], tag: &str) -> Vec<&'a Location> {
    if is_all_regions(tag) {
        return locations.iter().collect();
    }

    let tag = tag.trim();
    locations
        .iter()
        .filter(|location| !location.region.is_empty() && location.region.eq_ignore_ascii_case(tag))
        .collect()
}

/// Pick the starting region from the viewer's timezone, falling back to the
/// configured default when the timezone is unknown or unmatched.
pub fn initial_region(regions: &[RegionSetting], default_region: &str, timezone: Option<&str>) -> String {
    let matched = timezone.and_then(|tz| {
        regions
            .iter()
            .find(|region| region.timezones.iter().any(|candidate| candidate == tz))
    });

    match matched {
        Some(region) => region.tag.to_uppercase(),
        None => {
            debug!("no region for timezone {:?}, using {}", timezone, default_region);
            default_region.trim().to_uppercase()
        }
    }
}

/// Tracks the one selected region out of a fixed table
#[derive(Debug, Clone)]
pub struct RegionSelector {
    regions: Vec<RegionSetting>,
    selected: String,
}

impl RegionSelector {
    pub fn new(regions: Vec<RegionSetting>, initial: &str) -> Self {
        Self {
            regions,
            selected: initial.trim().to_uppercase(),
        }
    }

    pub fn regions(&self) -> &[RegionSetting] {
        &self.regions
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn setting(&self, tag: &str) -> Option<&RegionSetting> {
        let tag = tag.trim();
        self.regions
            .iter()
            .find(|region| region.tag.eq_ignore_ascii_case(tag))
    }

    /// Select a region, last call wins. Unknown tags are still selected so
    /// the list filters on them, but they have no camera target.
    pub fn select(&mut self, tag: &str) -> Option<&RegionSetting> {
        self.selected = tag.trim().to_uppercase();
        let selected = self.selected.clone();
        self.setting(&selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::location;

    fn fixture() -> Vec<Location> {
        vec![
            location("Scarborough", "WA", Some((115.7562, -31.8942))),
            location("Parramatta", "NSW", Some((151.0, -33.8))),
            location("Belmont", "wa", Some((115.93, -31.95))),
            location("Unclassified", "", None),
        ]
    }

    #[test]
    fn test_filter_all_returns_everything_in_order() {
        let locations = fixture();
        let names: Vec<_> = filter_by_region(&locations, "ALL")
            .iter()
            .map(|l| l.display_name())
            .collect();
        assert_eq!(names, ["Scarborough", "Parramatta", "Belmont", "Unclassified"]);
        assert_eq!(filter_by_region(&locations, "all").len(), 4);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_stable() {
        let locations = fixture();
        let names: Vec<_> = filter_by_region(&locations, "wa")
            .iter()
            .map(|l| l.display_name())
            .collect();
        assert_eq!(names, ["Scarborough", "Belmont"]);
    }

    #[test]
    fn test_empty_region_only_matches_all() {
        let locations = fixture();
        assert!(filter_by_region(&locations, "").is_empty());
        assert!(filter_by_region(&locations, "QLD").is_empty());
    }

    #[test]
    fn test_initial_region_from_timezone() {
        let regions = default_regions();
        assert_eq!(initial_region(&regions, "WA", Some("Australia/Melbourne")), "VIC");
        assert_eq!(initial_region(&regions, "WA", Some("Australia/Sydney")), "NSW");
        assert_eq!(initial_region(&regions, "WA", Some("Australia/Adelaide")), "SA");
        assert_eq!(initial_region(&regions, "WA", Some("Australia/Perth")), "WA");
        assert_eq!(initial_region(&regions, "WA", Some("Europe/Berlin")), "WA");
        assert_eq!(initial_region(&regions, "nsw", None), "NSW");
    }

    #[test]
    fn test_selector_last_click_wins() {
        let mut selector = RegionSelector::new(default_regions(), "WA");
        assert_eq!(selector.selected(), "WA");

        let setting = selector.select("nsw").cloned();
        assert_eq!(selector.selected(), "NSW");
        assert_eq!(setting.map(|s| s.zoom), Some(7.0));

        assert!(selector.select("QLD").is_none());
        assert_eq!(selector.selected(), "QLD");
    }
}
