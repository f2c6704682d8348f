use async_trait::async_trait;
use locator::{ContentError, LocationSource, Settings};
use locator_core::{decode_feed, Location};
use mockall::mock;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

pub fn setup_static_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

mock! {
    pub ContentApi { }

    #[async_trait]
    impl LocationSource for ContentApi {
        async fn fetch_locations(&self) -> Result<Vec<Location>, ContentError>;
    }
}

pub fn fixture_locations() -> Vec<Location> {
    decode_feed(include_str!("../../fixtures/locations.json")).expect("fixture decodes")
}

/// Content API that serves the bundled fixture any number of times
pub fn fixture_api() -> MockContentApi {
    let mut api = MockContentApi::new();
    api.expect_fetch_locations()
        .returning(|| Ok(fixture_locations()));
    api
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.api_settings.port = String::from("0");
    settings.ui_settings.ui_dir = format!("{}/../public_ui", env!("CARGO_MANIFEST_DIR"));
    settings.content_settings.refresh_interval_secs = 0;
    settings
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(api: MockContentApi) -> Self {
        setup_static_logger();
        let app = locator::Application::build_with_source(test_settings(), Arc::new(api))
            .await
            .expect("failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());
        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("request failed")
    }
}
