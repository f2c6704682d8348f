use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use locator_core::Location;
use log::{debug, error, info, warn};
use tokio::{sync::RwLock, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::infra::content::LocationSource;

/// Upper bound on how long a failed fetch is remembered before retrying
const FAILURE_RETRY_AFTER: Duration = Duration::from_secs(30);

struct CachedFeed {
    locations: Arc<Vec<Location>>,
    expires_at: Instant,
}

impl CachedFeed {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Memoizes the content feed. A failed fetch never surfaces to callers: they
/// get the last good list, or an empty one when nothing was fetched yet.
/// Only one fetch runs at a time; callers queued behind it reuse its result.
pub struct LocationFeed {
    source: Arc<dyn LocationSource>,
    ttl: Duration,
    cache: RwLock<Option<CachedFeed>>,
}

impl LocationFeed {
    pub fn new(source: Arc<dyn LocationSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub async fn locations(&self) -> Arc<Vec<Location>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh() {
                return cached.locations.clone();
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have fetched while this one waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return cached.locations.clone();
            }
        }
        self.fetch_into(&mut cache).await
    }

    /// Refetch now, bypassing the TTL
    pub async fn refresh(&self) -> Arc<Vec<Location>> {
        let mut cache = self.cache.write().await;
        self.fetch_into(&mut cache).await
    }

    async fn fetch_into(&self, cache: &mut Option<CachedFeed>) -> Arc<Vec<Location>> {
        match self.source.fetch_locations().await {
            Ok(locations) => {
                debug!("cached {} locations", locations.len());
                let locations = Arc::new(locations);
                *cache = Some(CachedFeed {
                    locations: locations.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                locations
            }
            Err(e) => {
                let locations = match cache.as_ref() {
                    Some(cached) => {
                        warn!("failed to refresh locations, serving stale list: {}", e);
                        cached.locations.clone()
                    }
                    None => {
                        warn!("failed to fetch locations, serving empty list: {}", e);
                        Arc::new(Vec::new())
                    }
                };
                *cache = Some(CachedFeed {
                    locations: locations.clone(),
                    expires_at: Instant::now() + self.ttl.min(FAILURE_RETRY_AFTER),
                });
                locations
            }
        }
    }

    /// Location by slug; later duplicates win
    pub async fn find(&self, slug: &str) -> Option<Location> {
        if slug.is_empty() {
            return None;
        }
        self.locations()
            .await
            .iter()
            .rev()
            .find(|location| location.id == slug)
            .cloned()
    }
}

/// Keeps the feed cache warm so page requests rarely wait on the content API
pub struct FeedRefresher {
    feed: Arc<LocationFeed>,
    refresh_interval: Duration,
    cancel_token: CancellationToken,
}

impl FeedRefresher {
    pub fn new(
        feed: Arc<LocationFeed>,
        cancel_token: CancellationToken,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            feed,
            refresh_interval,
            cancel_token,
        }
    }

    pub async fn watch(&self) -> Result<(), anyhow::Error> {
        info!("Starting feed refresher");

        loop {
            if self.cancel_token.is_cancelled() {
                info!("Feed refresher received cancellation");
                break;
            }

            let locations = self.feed.refresh().await;
            if locations.is_empty() {
                error!("Feed refresh produced no locations");
            } else {
                debug!("Feed refresh holds {} locations", locations.len());
            }

            tokio::select! {
                _ = sleep(self.refresh_interval) => continue,
                _ = self.cancel_token.cancelled() => {
                    info!("Feed refresher cancelled during sleep");
                    break;
                }
            }
        }

        Ok(())
    }
}
