use log::debug;
use maud::Markup;

use crate::{
    location::Location,
    map::{Anchor, MapEngine, OverlayId, OverlaySpec},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PopupState {
    #[default]
    Closed,
    Open { slug: String, overlay: OverlayId },
}

/// Owns the single popup overlay on the map
#[derive(Debug, Clone)]
pub struct PopupController {
    state: PopupState,
    offset: [f64; 2],
}

impl PopupController {
    pub fn new(offset: [f64; 2]) -> Self {
        Self {
            state: PopupState::Closed,
            offset,
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopupState::Open { .. })
    }

    /// Open a popup for the location, replacing any popup already open.
    /// Returns false and changes nothing when the location has no coordinates.
    pub fn show(&mut self, engine: &mut dyn MapEngine, location: &Location, content: Markup) -> bool {
        let Some(position) = location.coordinates else {
            debug!("{} has no coordinates, no popup", location.display_name());
            return false;
        };

        self.dismiss(engine);

        let overlay = engine.add_overlay(&OverlaySpec {
            position,
            anchor: Anchor::BottomCenter,
            offset: self.offset,
            stop_event: true,
            content: content.into_string(),
        });
        self.state = PopupState::Open {
            slug: location.id.clone(),
            overlay,
        };
        true
    }

    pub fn dismiss(&mut self, engine: &mut dyn MapEngine) {
        if let PopupState::Open { overlay, .. } = std::mem::take(&mut self.state) {
            engine.remove_overlay(overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{location, RecordingEngine};
    use maud::html;

    #[test]
    fn test_show_replaces_open_popup() {
        let mut engine = RecordingEngine::default();
        let mut popup = PopupController::new([0.0, -10.0]);
        let scarborough = location("Scarborough", "WA", Some((115.7562, -31.8942)));
        let belmont = location("Belmont", "WA", Some((115.93, -31.95)));

        assert!(popup.show(&mut engine, &scarborough, html! { "a" }));
        assert!(popup.show(&mut engine, &belmont, html! { "b" }));

        let log = engine.log();
        assert_eq!(log.open_overlays.len(), 1);
        assert_eq!(log.removed_overlays, 1);
        let overlay = &log.open_overlays.values().next().unwrap();
        assert_eq!(overlay.anchor, Anchor::BottomCenter);
        assert_eq!(overlay.offset, [0.0, -10.0]);
        assert!(overlay.stop_event);
        assert_eq!(overlay.content, "b");
        assert!(matches!(popup.state(), PopupState::Open { slug, .. } if slug == "belmont"));
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut engine = RecordingEngine::default();
        let mut popup = PopupController::new([0.0, -10.0]);
        popup.dismiss(&mut engine);

        popup.show(
            &mut engine,
            &location("Scarborough", "WA", Some((115.7562, -31.8942))),
            html! { "a" },
        );
        popup.dismiss(&mut engine);
        popup.dismiss(&mut engine);

        assert_eq!(popup.state(), &PopupState::Closed);
        let log = engine.log();
        assert!(log.open_overlays.is_empty());
        assert_eq!(log.removed_overlays, 1);
    }

    #[test]
    fn test_show_without_coordinates_keeps_state() {
        let mut engine = RecordingEngine::default();
        let mut popup = PopupController::new([0.0, -10.0]);
        popup.show(
            &mut engine,
            &location("Scarborough", "WA", Some((115.7562, -31.8942))),
            html! { "a" },
        );

        assert!(!popup.show(&mut engine, &location("Joondalup", "WA", None), html! { "b" }));
        assert!(matches!(popup.state(), PopupState::Open { slug, .. } if slug == "scarborough"));
        assert_eq!(engine.log().open_overlays.len(), 1);
    }
}
