use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use itertools::Itertools;
use log::warn;
use maud::{html, Markup};

use crate::location::Location;

/// Root-locale collator that ignores case but not accents
fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    Collator::try_new(&Default::default(), options)
        .map_err(|e| warn!("name collation unavailable, sorting by code point: {:?}", e))
        .ok()
}

/// Collated order, ties broken by the name as written
fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    let order = match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    order.then_with(|| a.cmp(b))
}

/// Render the list panel. Entries are sorted by name with locale-aware
/// collation (missing names sort first); the caller's slice is left
/// untouched.
pub fn render_location_list(locations: &[&Location]) -> Markup {
    if locations.is_empty() {
        return html! {
            div class="notification is-light location-list-empty" {
                "No gyms found in this region."
            }
        };
    }

    let collator = name_collator();
    let sorted = locations.iter().sorted_by(|a, b| {
        compare_names(
            collator.as_ref(),
            a.name.as_deref().unwrap_or_default(),
            b.name.as_deref().unwrap_or_default(),
        )
    });

    html! {
        div class="location-list" {
            @for location in sorted {
                (location_entry(location))
            }
        }
    }
}

fn location_entry(location: &Location) -> Markup {
    let slug = location.id.as_str();
    let map_link = location.map_link.as_deref().unwrap_or("#");
    let info_link = location.link.as_deref().unwrap_or("#");
    let size = location
        .size
        .as_deref()
        .map(|size| format!("{size} sq/m"))
        .unwrap_or_else(|| String::from("N/A"));

    html! {
        div class="box location-card"
            id=[(!slug.is_empty()).then_some(slug)]
            data-location=(location.display_name())
            data-region=(location.region) {
            @if location.is_presale {
                div class="notification is-warning is-light py-2 px-4 presale-banner" {
                    span class="has-text-weight-bold is-uppercase" { "Presale" }
                }
            }
            div class="is-flex is-align-items-center is-justify-content-space-between mb-2" {
                span class="title is-5 mb-0" { (location.display_name()) }
                @if location.has_amenity {
                    span class="tag is-dark is-rounded amenity-badge" { "The Studio" }
                }
            }
            p class="location-address is-size-7" {
                a href=(map_link) target="_blank" rel="noopener" { (location.address) }
            }
            p class="location-size is-size-7" { (size) }
            div class="buttons mt-3" {
                button type="button"
                       class="button is-danger is-small view-map-button"
                       data-command="view_on_map"
                       data-slug=(slug)
                       disabled[slug.is_empty()] {
                    "View On Map"
                }
                a href=(info_link) class="button is-danger is-outlined is-small" { "Gym Info" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::location;

    #[test]
    fn test_entries_sorted_by_name() {
        let zeta = location("Zeta", "WA", None);
        let alpha = location("alpha", "WA", None);
        let beta = location("Beta", "WA", None);
        let html = render_location_list(&[&zeta, &alpha, &beta]).into_string();

        let alpha_at = html.find("data-location=\"alpha\"").unwrap();
        let beta_at = html.find("data-location=\"Beta\"").unwrap();
        let zeta_at = html.find("data-location=\"Zeta\"").unwrap();
        assert!(alpha_at < beta_at && beta_at < zeta_at);
    }

    #[test]
    fn test_accented_names_sort_with_their_letter() {
        let ellenbrook = location("Ellenbrook", "WA", None);
        let eden_hill = location("Éden Hill", "WA", None);
        let zeta = location("Zeta", "WA", None);
        let html = render_location_list(&[&zeta, &ellenbrook, &eden_hill]).into_string();

        let eden_at = html.find("data-location=\"Éden Hill\"").unwrap();
        let ellenbrook_at = html.find("data-location=\"Ellenbrook\"").unwrap();
        let zeta_at = html.find("data-location=\"Zeta\"").unwrap();
        assert!(eden_at < ellenbrook_at && ellenbrook_at < zeta_at);
    }

    #[test]
    fn test_case_only_differences_keep_a_stable_order() {
        let collator = name_collator();
        assert_eq!(
            compare_names(collator.as_ref(), "Belmont", "belmont"),
            "Belmont".cmp("belmont")
        );
        assert_eq!(
            compare_names(collator.as_ref(), "", "Armadale"),
            Ordering::Less
        );
    }

    #[test]
    fn test_entry_fields() {
        let mut scarborough = location("Scarborough", "WA", Some((115.7562, -31.8942)));
        scarborough.address = String::from("148 West Coast Hwy");
        scarborough.map_link = Some(String::from("https://maps.example/scarborough"));
        scarborough.size = Some(String::from("1800"));
        scarborough.is_presale = true;
        let html = render_location_list(&[&scarborough]).into_string();

        assert!(html.contains("id=\"scarborough\""));
        assert!(html.contains("data-region=\"WA\""));
        assert!(html.contains("data-slug=\"scarborough\""));
        assert!(html.contains("href=\"https://maps.example/scarborough\""));
        assert!(html.contains("1800 sq/m"));
        assert!(html.contains("Presale"));
        assert!(!html.contains("The Studio"));
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn test_unnamed_entry_has_no_target() {
        let unnamed = location("", "", None);
        let html = render_location_list(&[&unnamed]).into_string();

        assert!(html.contains("Unnamed Location"));
        assert!(html.contains("N/A"));
        assert!(!html.contains(" id="));
        assert!(html.contains("disabled"));
        assert!(!html.contains("undefined"));
    }

    #[test]
    fn test_empty_list() {
        let html = render_location_list(&[]).into_string();
        assert!(html.contains("No gyms found"));
    }
}
