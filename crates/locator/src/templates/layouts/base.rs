use maud::{html, Markup, DOCTYPE};

const MAPBOX_GL_VERSION: &str = "3.4.0";

pub struct PageConfig<'a> {
    pub title: &'a str,
    pub api_base: &'a str,
}

pub fn base(config: &PageConfig, content: Markup, scripts: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                base href="/";
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
                link rel="stylesheet" href=(format!("https://api.mapbox.com/mapbox-gl-js/v{MAPBOX_GL_VERSION}/mapbox-gl.css"));
                link rel="stylesheet" href="https://api.mapbox.com/mapbox-gl-js/plugins/mapbox-gl-geocoder/v5.0.3/mapbox-gl-geocoder.css";
                link rel="stylesheet" href="/ui/styles.css";

                script src=(format!("https://api.mapbox.com/mapbox-gl-js/v{MAPBOX_GL_VERSION}/mapbox-gl.js")) {}
                script src="https://api.mapbox.com/mapbox-gl-js/plugins/mapbox-gl-geocoder/v5.0.3/mapbox-gl-geocoder.min.js" {}
            }
            body data-api-base=(config.api_base) {
                section class="section pt-3" {
                    div class="container is-fluid" {
                        div id="main-content" {
                            (content)
                        }
                    }
                }

                (scripts)
            }
        }
    }
}
