// pricenest API payloads: /compare, /analytics and /wishlist
use crate::model::{
    HistoryReport, HistorySummary, LiveListing, ParserError, PriceObservation, StabilityLabel,
};
use crate::normalizer::is_valid_price;
use crate::utils::{format_price_range, parse_datetime};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub source: Option<String>,
    pub price_numeric: Option<f64>,
    pub link: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    summary: Option<RawSummary>,
    #[serde(default)]
    price_trend: Vec<Value>,
    volatility: Option<RawVolatility>,
    best_time_to_buy: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSummary {
    pub lowest_price: Option<f64>,
    pub highest_price: Option<f64>,
    pub average_price: Option<f64>,
    pub price_range: Option<String>,
    pub cheapest_store: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawObservation {
    pub store: Option<String>,
    pub timestamp: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawVolatility {
    stability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WishlistResponse {
    #[serde(default)]
    wishlist: Vec<RawWishlistItem>,
}

#[derive(Debug, Deserialize)]
struct RawWishlistItem {
    id: Option<i64>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ParserError> {
    let text = value.ok_or(ParserError::MissingField(field))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParserError::InvalidField {
            field,
            value: text,
        });
    }
    Ok(trimmed.to_string())
}

fn required_price(value: Option<f64>, field: &'static str) -> Result<f64, ParserError> {
    let price = value.ok_or(ParserError::MissingField(field))?;
    if !is_valid_price(price) {
        return Err(ParserError::InvalidField {
            field,
            value: price.to_string(),
        });
    }
    Ok(price)
}

impl TryFrom<RawListing> for LiveListing {
    type Error = ParserError;

    fn try_from(raw: RawListing) -> Result<Self, Self::Error> {
        let store = required_text(raw.source, "source")?;
        // Absent or zero means the store did not report a price.
        let price = match raw.price_numeric {
            None => None,
            Some(p) if p == 0.0 => None,
            Some(p) if is_valid_price(p) => Some(p),
            Some(p) => {
                return Err(ParserError::InvalidField {
                    field: "price_numeric",
                    value: p.to_string(),
                });
            }
        };

        Ok(LiveListing {
            id: raw.id,
            title: raw.title.unwrap_or_default().trim().to_string(),
            store,
            price,
            link: raw.link.unwrap_or_default(),
            image: raw.image.filter(|url| !url.trim().is_empty()),
        })
    }
}

impl TryFrom<RawObservation> for PriceObservation {
    type Error = ParserError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let store = required_text(raw.store, "store")?;
        let stamp = raw.timestamp.ok_or(ParserError::MissingField("timestamp"))?;
        let timestamp = parse_datetime(&stamp).ok_or(ParserError::InvalidField {
            field: "timestamp",
            value: stamp,
        })?;
        let price = required_price(raw.price, "price")?;
        Ok(PriceObservation { store, timestamp, price })
    }
}

impl TryFrom<RawSummary> for HistorySummary {
    type Error = ParserError;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        let lowest_price = required_price(raw.lowest_price, "summary.lowest_price")?;
        let average_price = required_price(raw.average_price, "summary.average_price")?;
        let highest_price = raw.highest_price.filter(|p| is_valid_price(*p));
        let price_range = match (raw.price_range.filter(|r| !r.trim().is_empty()), highest_price) {
            (Some(range), _) => range,
            (None, Some(highest)) => format_price_range(lowest_price, highest),
            (None, None) => return Err(ParserError::MissingField("summary.price_range")),
        };

        Ok(HistorySummary {
            lowest_price,
            highest_price,
            average_price,
            price_range,
            cheapest_store: raw.cheapest_store.filter(|s| !s.trim().is_empty()),
        })
    }
}

fn validate_record<R, T>(record: Value) -> Result<T, ParserError>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = ParserError>,
{
    let raw: R = serde_json::from_value(record)?;
    T::try_from(raw)
}

/// Validates a batch record by record; malformed records, including ones
/// with wrongly typed fields, are logged and dropped, the rest of the batch
/// is kept.
fn validate_batch<R, T>(raw: Vec<Value>, kind: &str) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = ParserError>,
{
    let total = raw.len();
    let valid: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match validate_record::<R, T>(record) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Rejected {} record #{}: {}", kind, index, e);
                None
            }
        })
        .collect();
    debug!("Accepted {}/{} {} records", valid.len(), total, kind);
    valid
}

/// Parser for the remote API's response bodies.
pub struct ApiParser;

impl ApiParser {
    pub fn new() -> Self {
        Self
    }

    /// `/compare` body: `{"query": ..., "results": [...]}`.
    pub fn parse_listings(&self, body: &str) -> Result<Vec<LiveListing>, ParserError> {
        let response: CompareResponse = serde_json::from_str(body)?;
        Ok(validate_batch::<RawListing, _>(response.results, "listing"))
    }

    /// `/analytics` body.
    ///
    /// `Ok(None)` when the feed has no summary or no usable history yet;
    /// the caller then falls back to live statistics. A summary that is
    /// present but malformed is an error.
    pub fn parse_history(&self, body: &str) -> Result<Option<HistoryReport>, ParserError> {
        let response: AnalyticsResponse = serde_json::from_str(body)?;
        let Some(raw_summary) = response.summary else {
            return Ok(None);
        };
        let observations: Vec<PriceObservation> =
            validate_batch::<RawObservation, _>(response.price_trend, "history");
        if observations.is_empty() {
            return Ok(None);
        }

        let summary = HistorySummary::try_from(raw_summary)?;
        let label = response
            .volatility
            .and_then(|v| v.stability)
            .ok_or(ParserError::MissingField("volatility.stability"))?;
        let stability: StabilityLabel = label.parse()?;

        Ok(Some(HistoryReport {
            summary,
            observations,
            stability,
            best_time_to_buy: response.best_time_to_buy,
        }))
    }

    /// `/wishlist` body: product ids of the wishlisted items.
    pub fn parse_wishlist(&self, body: &str) -> Result<Vec<i64>, ParserError> {
        let response: WishlistResponse = serde_json::from_str(body)?;
        let total = response.wishlist.len();
        let ids: Vec<i64> = response.wishlist.into_iter().filter_map(|item| item.id).collect();
        if ids.len() < total {
            warn!("Rejected {} wishlist items without an id", total - ids.len());
        }
        Ok(ids)
    }
}

impl Default for ApiParser {
    fn default() -> Self {
        Self::new()
    }
}
