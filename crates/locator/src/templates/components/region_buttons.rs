use locator_core::RegionSetting;
use maud::{html, Markup};

/// One button per region; exactly one carries the selected classes
pub fn region_buttons(id: &str, regions: &[RegionSetting], selected: &str) -> Markup {
    html! {
        div id=(id) class="buttons has-addons region-buttons" {
            @for region in regions {
                @let is_selected = region.tag.eq_ignore_ascii_case(selected);
                button.button.is-small.is-danger[is_selected].selected[is_selected]
                       type="button"
                       data-command="select_region"
                       data-region=(region.tag)
                       aria-pressed=(if is_selected { "true" } else { "false" }) {
                    (region.label)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_core::default_regions;

    #[test]
    fn test_single_selected_button() {
        let html = region_buttons("region-buttons", &default_regions(), "nsw").into_string();
        assert_eq!(html.matches("<button").count(), 5);
        assert_eq!(html.matches("selected").count(), 1);
        assert!(html.contains("data-region=\"NSW\" aria-pressed=\"true\""));
    }
}
