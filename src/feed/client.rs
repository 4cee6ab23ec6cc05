use crate::feed::traits::{HistoryFeed, SearchFeed, WishlistFeed};
use crate::model::{FeedError, HistoryReport, LiveListing};
use crate::parser::ApiParser;
use crate::session::SessionToken;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// HTTP client for the pricenest API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    parser: ApiParser,
    session: Option<SessionToken>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(concat!("pricenest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: ApiParser::new(),
            session: None,
        })
    }

    /// Sends the session token as a bearer token on every request.
    pub fn with_session(mut self, token: SessionToken) -> Self {
        self.session = Some(token);
        self
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get_text(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, FeedError> {
        let url = self.build_url(endpoint);
        debug!("GET {} {:?}", url, params);

        let mut request = self.client.get(&url).query(params);
        if let Some(token) = &self.session {
            request = request.bearer_auth(token.as_str());
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                detail: error_detail(&body, status),
            });
        }
        Ok(body)
    }
}

/// The API's `detail` message, or the status reason when there is none.
fn error_detail(body: &str, status: StatusCode) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
    detail.unwrap_or_else(|| {
        format!("API Error: {}", status.canonical_reason().unwrap_or("request failed"))
    })
}

#[async_trait::async_trait]
impl SearchFeed for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<LiveListing>, FeedError> {
        let body = self.get_text("/compare", &[("q", query)]).await?;
        let listings = self.parser.parse_listings(&body)?;
        info!("Fetched {} listings for '{}'", listings.len(), query);
        Ok(listings)
    }
}

#[async_trait::async_trait]
impl HistoryFeed for ApiClient {
    async fn history(&self, query: &str) -> Result<Option<HistoryReport>, FeedError> {
        let body = match self.get_text("/analytics", &[("q", query)]).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                info!("No history recorded yet for '{}'", query);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(self.parser.parse_history(&body)?)
    }
}

#[async_trait::async_trait]
impl WishlistFeed for ApiClient {
    async fn wishlist_ids(&self, email: &str) -> Result<Vec<i64>, FeedError> {
        let body = self.get_text("/wishlist", &[("email", email)]).await?;
        Ok(self.parser.parse_wishlist(&body)?)
    }
}
