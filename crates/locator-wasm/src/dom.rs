use locator_core::{PageOptions, PageView};
use log::{debug, warn};
use maud::Markup;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, ScrollBehavior, ScrollToOptions, Window};

const SELECTED_CLASSES: [&str; 2] = ["selected", "is-danger"];

/// `PageView` over the live document. Missing elements are skipped so the
/// client still runs on pages that leave out the list or the buttons.
pub struct DomView {
    window: Window,
    document: Document,
    list_id: String,
    region_buttons_id: String,
    scroll_offset: f64,
}

impl DomView {
    pub fn new(window: Window, document: Document, page: &PageOptions) -> Self {
        Self {
            window,
            document,
            list_id: page.list_id.clone(),
            region_buttons_id: page.region_buttons_id.clone(),
            scroll_offset: page.scroll_offset,
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            debug!("no #{} element on the page", id);
        }
        element
    }
}

impl PageView for DomView {
    fn render_list(&mut self, markup: Markup) {
        if let Some(list) = self.element(&self.list_id) {
            list.set_inner_html(&markup.into_string());
        }
    }

    fn mark_selected_region(&mut self, tag: &str) {
        let Some(container) = self.element(&self.region_buttons_id) else {
            return;
        };
        let buttons = match container.query_selector_all("[data-region]") {
            Ok(buttons) => buttons,
            Err(e) => {
                warn!("failed to query region buttons: {:?}", e);
                return;
            }
        };

        for index in 0..buttons.length() {
            let Some(button) = buttons
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let selected = button
                .get_attribute("data-region")
                .is_some_and(|region| region.eq_ignore_ascii_case(tag));
            let classes = button.class_list();
            for class in SELECTED_CLASSES {
                let _ = classes.toggle_with_force(class, selected);
            }
            let _ = button.set_attribute("aria-pressed", if selected { "true" } else { "false" });
        }
    }

    fn scroll_list_into_view(&mut self) {
        let Some(list) = self.element(&self.list_id) else {
            return;
        };
        let scroll_y = self.window.scroll_y().unwrap_or_default();
        let top = list.get_bounding_client_rect().top() + scroll_y - self.scroll_offset;

        let options = ScrollToOptions::new();
        options.set_top(top.max(0.0));
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}
