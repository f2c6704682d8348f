use crate::{
    api::routes::{
        get_locations, health, location_list_fragment, location_popup_fragment,
        locator_page_handler,
    },
    config::Settings,
    domain::{FeedRefresher, LocationFeed},
    infra::content::{ContentClient, LocationSource},
};

// Fixture-backed source only available with e2e-testing feature or debug builds
#[cfg(any(feature = "e2e-testing", debug_assertions))]
use crate::infra::content_mock::StaticLocationSource;
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Path, Request, State},
    http::{header, Extensions, HeaderValue, StatusCode},
    middleware::{self, AddExtension, Next},
    response::{IntoResponse, Response},
    routing::get,
    serve::Serve,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use locator_core::LocatorConfig;
use log::{error, info, warn};
use reqwest_middleware::{
    reqwest::{self, Client},
    ClientBuilder, ClientWithMiddleware, Middleware,
};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, select};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tower_http::cors::{AllowOrigin, CorsLayer};

type LocatorServer = Serve<
    TcpListener,
    IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
    AddExtension<Router, ConnectInfo<SocketAddr>>,
>;

pub struct Application {
    server: LocatorServer,
    port: u16,
    cancellation_token: CancellationToken,
    background_tasks: TaskTracker,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let source = build_location_source(&config)?;
        Self::build_with_source(config, source).await
    }

    /// Build against an explicit location source, used by tests to swap in
    /// a mocked content API
    pub async fn build_with_source(
        config: Settings,
        source: Arc<dyn LocationSource>,
    ) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            config.api_settings.domain, config.api_settings.port
        );
        let listener = SocketAddr::from_str(&address)?;
        let origins = config.api_settings.origins.clone();
        let (app_state, background_tasks, cancellation_token) = build_app(config, source);
        let (server, port) = build_server(listener, app_state, origins).await?;
        Ok(Self {
            server,
            port,
            cancellation_token,
            background_tasks,
        })
    }

    /// Port the server is bound to, useful when configured with port 0
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        match self.server.with_graceful_shutdown(shutdown_signal()).await {
            Ok(_) => {
                info!("Server shutdown initiated");
                self.cancellation_token.cancel();

                let timeout = tokio::time::sleep(Duration::from_secs(10));
                select! {
                    _ = self.background_tasks.wait() => {
                        info!("Background tasks completed gracefully");
                    }
                    _ = timeout => {
                        warn!("Background tasks timed out during shutdown");
                    }
                }

                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                self.cancellation_token.cancel();

                let _ = tokio::time::timeout(Duration::from_secs(5), self.background_tasks.wait())
                    .await;

                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ui_dir: String,
    pub remote_url: String,
    pub title: String,
    /// Client config serialized into every page
    pub locator: LocatorConfig,
    pub feed: Arc<LocationFeed>,
}

fn build_location_source(config: &Settings) -> Result<Arc<dyn LocationSource>, anyhow::Error> {
    let content = &config.content_settings;

    #[cfg(any(feature = "e2e-testing", debug_assertions))]
    if content.mock_enabled {
        let source = StaticLocationSource::from_file(&content.fixture_path)
            .map_err(|e| anyhow!("Failed to load location fixture: {}", e))?;
        info!("Fixture location source configured from {}", content.fixture_path);
        return Ok(Arc::new(source));
    }

    #[cfg(not(any(feature = "e2e-testing", debug_assertions)))]
    if content.mock_enabled {
        return Err(anyhow!(
            "Fixture location source requires e2e-testing feature or debug build"
        ));
    }

    let client = ContentClient::new(build_reqwest_client(), &content.content_url, content.per_page)
        .map_err(|e| anyhow!("Failed to configure content client: {}", e))?;
    info!("Content client configured for {}", client.content_url);
    Ok(Arc::new(client))
}

pub fn build_app(
    config: Settings,
    source: Arc<dyn LocationSource>,
) -> (AppState, TaskTracker, CancellationToken) {
    info!(
        "Static UI assets configured at {}",
        config.ui_settings.ui_dir
    );

    let feed = Arc::new(LocationFeed::new(
        source,
        Duration::from_secs(config.content_settings.cache_ttl_secs),
    ));

    let tracker = TaskTracker::new();
    let cancel_token = CancellationToken::new();

    if config.content_settings.refresh_interval_secs > 0 {
        let refresher = FeedRefresher::new(
            feed.clone(),
            cancel_token.clone(),
            Duration::from_secs(config.content_settings.refresh_interval_secs),
        );
        tracker.spawn(async move {
            match refresher.watch().await {
                Ok(_) => {
                    info!("Successfully shutdown feed refresher")
                }
                Err(e) => {
                    error!("Error in feed refresher: {}", e)
                }
            }
        });
    }
    tracker.close();

    let app_state = AppState {
        ui_dir: config.ui_settings.ui_dir,
        remote_url: config.ui_settings.remote_url,
        title: config.ui_settings.title,
        locator: config.locator_settings,
        feed,
    };
    (app_state, tracker, cancel_token)
}

pub async fn build_server(
    socket_addr: SocketAddr,
    app_state: AppState,
    origins: Vec<String>,
) -> Result<(LocatorServer, u16), anyhow::Error> {
    let listener = TcpListener::bind(socket_addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Setting up service");
    let app = app(app_state, origins);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    info!(
        "Service running @: http://{}:{}",
        local_addr.ip(),
        local_addr.port()
    );
    Ok((server, local_addr.port()))
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins));

    // HTML fragments, same markup the WASM client renders
    let fragment_routes = Router::new()
        .route("/locations", get(location_list_fragment))
        .route("/locations/{slug}/popup", get(location_popup_fragment));

    Router::new()
        .route("/", get(locator_page_handler))
        .merge(fragment_routes)
        .route("/api/v1/health_check", get(health))
        .route("/api/v1/locations", get(get_locations))
        .route("/ui/{*path}", get(serve_static_file))
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

async fn serve_static_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    // Prevent directory traversal attacks
    if path.contains("..") {
        return (StatusCode::BAD_REQUEST, "Bad request").into_response();
    }

    let file_path = std::path::Path::new(&state.ui_dir).join(&path);

    let content = match tokio::fs::read(&file_path).await {
        Ok(c) => c,
        Err(_) => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, get_mime_type(&path))
        .body(Body::from(content))
        .unwrap_or_else(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response())
}

fn get_mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

pub fn build_reqwest_client() -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(LoggingMiddleware)
        .build()
}

struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        info!("Making {} request to: {}", method, url);

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                info!("{} {} -> Status: {}", method, url, response.status());
            }
            Err(error) => {
                warn!("{} {} -> Error: {:?}", method, url, error);
            }
        }

        result
    }
}

async fn shutdown_signal() {
    let (mut sigint, mut sigterm) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to install signal handlers: {}", e);
            std::future::pending::<()>().await;
            return;
        }
    };

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
    }
}
