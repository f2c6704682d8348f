use locator_core::LocatorConfig;
use maud::{html, Markup, PreEscaped};

use crate::templates::components::region_buttons;

/// Loads the WASM client and hands it the page config. The JS glue in
/// `locator.js` owns the map library calls and forwards events back in.
const BOOTSTRAP_SCRIPT: &str = r#"
import init, { LocatorApp } from '/ui/pkg/locator_wasm.js';

const configEl = document.getElementById('locator-config');
if (configEl && window.LocatorMapEngine) {
    await init();
    window.LocatorMapEngine.boot(LocatorApp, JSON.parse(configEl.textContent));
}
"#;

pub fn locator_page(config: &LocatorConfig, selected: &str, list: Markup) -> Markup {
    let page = &config.page;
    html! {
        div class="columns is-desktop locator" {
            div class="column is-5-desktop locator-panel" {
                div id=(page.search_container_id) class="locator-search mb-3" {}
                (region_buttons(&page.region_buttons_id, &config.regions, selected))
                div id=(page.list_id) class="locator-list" {
                    (list)
                }
            }
            div class="column locator-map-column" {
                div id=(page.map_id) class="locator-map" {}
            }
        }
    }
}

/// Client config as inline JSON plus the scripts that boot the map
pub fn locator_scripts(config: &LocatorConfig) -> Result<Markup, serde_json::Error> {
    // Keep the JSON from closing the script element early
    let config_json = serde_json::to_string(config)?.replace("</", "<\\/");

    Ok(html! {
        script id="locator-config" type="application/json" {
            (PreEscaped(config_json))
        }
        script src="/ui/locator.js" {}
        script type="module" {
            (PreEscaped(BOOTSTRAP_SCRIPT))
        }
    })
}
