use hyper::header::ACCEPT;
use locator_core::{decode_feed, Location};
use log::{debug, error};
use mime::APPLICATION_JSON;
use reqwest_middleware::{
    self,
    reqwest::{StatusCode, Url},
    ClientWithMiddleware,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("problem sending request to content api: {0}")]
    Send(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem sending request to content api: {0}")]
    SendRetry(#[from] reqwest_middleware::Error),
    #[error("problem requesting content api: {0}")]
    Request(String),
    #[error("content api temporarily unavailable: {0}")]
    Transient(String),
    #[error("content feed is not a list of records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the current list of gym locations
#[async_trait::async_trait]
pub trait LocationSource: Send + Sync {
    async fn fetch_locations(&self) -> Result<Vec<Location>, Error>;
}

/// Reads gym records from the WordPress REST API
#[derive(Clone)]
pub struct ContentClient {
    pub content_url: Url,
    pub per_page: u32,
    pub client: ClientWithMiddleware,
}

impl ContentClient {
    pub fn new(
        client: ClientWithMiddleware,
        content_url: &str,
        per_page: u32,
    ) -> Result<Self, Error> {
        let content_url = Url::parse(content_url)
            .map_err(|e| Error::Request(format!("invalid content url {}: {}", content_url, e)))?;
        Ok(Self {
            content_url,
            per_page,
            client,
        })
    }

    pub fn feed_url(&self) -> Url {
        let mut url = self.content_url.clone();
        url.query_pairs_mut()
            .append_pair("acf_format", "standard")
            .append_pair("per_page", &self.per_page.to_string());
        url
    }
}

#[async_trait::async_trait]
impl LocationSource for ContentClient {
    async fn fetch_locations(&self) -> Result<Vec<Location>, Error> {
        let url = self.feed_url();

        let response = self
            .client
            .get(url)
            .header(ACCEPT, APPLICATION_JSON.to_string())
            .send()
            .await
            .map_err(|e| {
                error!("error sending to content api: {}", e);
                Error::SendRetry(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let locations = decode_feed(&body)?;
            debug!("content api returned {} records", locations.len());
            Ok(locations)
        } else if status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::BAD_GATEWAY
            || status == StatusCode::GATEWAY_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Transient(format!(
                "error response from content api with status {}: {:?}",
                status, body
            )))
        } else {
            let body = response.text().await?;
            Err(Error::Request(format!(
                "error response from content api with status {}: {:?}",
                status, body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest_middleware::{reqwest::Client, ClientBuilder};

    #[test]
    fn test_feed_url_carries_acf_and_page_size() {
        let client = ClientBuilder::new(Client::new()).build();
        let content = ContentClient::new(client, "https://revofitness.test/wp-json/wp/v2/gyms", 70)
            .unwrap();
        assert_eq!(
            content.feed_url().as_str(),
            "https://revofitness.test/wp-json/wp/v2/gyms?acf_format=standard&per_page=70"
        );
    }

    #[test]
    fn test_invalid_content_url() {
        let client = ClientBuilder::new(Client::new()).build();
        let err = ContentClient::new(client, "not a url", 70).err().unwrap();
        assert!(matches!(err, Error::Request(_)));
    }
}
