// Core records: observations, listings, derived chart points and stats
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::normalizer::is_valid_price;
use crate::utils::round_half_up;

/// One historical price reading from the history feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    pub store: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// One current offer from the live search feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveListing {
    pub id: Option<i64>,
    pub title: String,
    pub store: String,
    /// `None` when the store did not report a usable price.
    pub price: Option<f64>,
    pub link: String,
    pub image: Option<String>,
}

impl LiveListing {
    /// Price usable in aggregates, if any.
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|p| is_valid_price(*p))
    }
}

/// Prices collected into one time interval for one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub store: String,
    pub start: DateTime<Utc>,
    /// Never empty; ordered by observation time.
    pub prices: Vec<f64>,
}

impl Bucket {
    pub fn mean(&self) -> f64 {
        self.prices.iter().sum::<f64>() / self.prices.len() as f64
    }

    pub fn trend_point(&self) -> TrendPoint {
        TrendPoint {
            store: self.store.clone(),
            x: self.start,
            y: round_half_up(self.mean()),
        }
    }
}

/// One chart point: bucket start and rounded bucket mean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    #[serde(skip)]
    pub store: String,
    pub x: DateTime<Utc>,
    pub y: i64,
}

/// Bucket width for trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            other => Err(ParserError::InvalidField {
                field: "granularity",
                value: other.to_string(),
            }),
        }
    }
}

/// Coefficient of variation below which prices count as stable.
pub const STABLE_CV_THRESHOLD: f64 = 0.05;
/// Coefficient of variation below which prices count as moderate.
pub const MODERATE_CV_THRESHOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StabilityLabel {
    Stable,
    Moderate,
    Volatile,
}

impl StabilityLabel {
    pub fn from_cv(cv: f64) -> Self {
        if cv < STABLE_CV_THRESHOLD {
            StabilityLabel::Stable
        } else if cv < MODERATE_CV_THRESHOLD {
            StabilityLabel::Moderate
        } else {
            StabilityLabel::Volatile
        }
    }

    /// Label as shown on the stability card.
    pub fn badge(&self) -> &'static str {
        match self {
            StabilityLabel::Stable => "🟢 Stable",
            StabilityLabel::Moderate => "🟡 Moderate",
            StabilityLabel::Volatile => "🔴 Highly Volatile",
        }
    }
}

impl fmt::Display for StabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StabilityLabel::Stable => "Stable",
            StabilityLabel::Moderate => "Moderate",
            StabilityLabel::Volatile => "Volatile",
        };
        f.write_str(name)
    }
}

/// Accepts the history feed's strings, with or without the emoji badge.
impl FromStr for StabilityLabel {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim_start_matches(|c: char| !c.is_alphabetic()).trim();
        match name.to_lowercase().as_str() {
            "stable" => Ok(StabilityLabel::Stable),
            "moderate" => Ok(StabilityLabel::Moderate),
            "volatile" | "highly volatile" => Ok(StabilityLabel::Volatile),
            _ => Err(ParserError::UnknownLabel(s.to_string())),
        }
    }
}

/// Statistics over the prices of the current search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveStats {
    pub min: f64,
    pub max: f64,
    pub mean: i64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub stability: StabilityLabel,
}

/// Pre-computed summary delivered by the history feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub lowest_price: f64,
    pub highest_price: Option<f64>,
    pub average_price: f64,
    pub price_range: String,
    pub cheapest_store: Option<String>,
}

/// Validated `/analytics` response.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    pub summary: HistorySummary,
    pub observations: Vec<PriceObservation>,
    pub stability: StabilityLabel,
    pub best_time_to_buy: Option<String>,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("unknown stability label: {0}")]
    UnknownLabel(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("invalid payload: {0}")]
    Payload(#[from] ParserError),
}

impl FeedError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FeedError::Status { status: 404, .. })
    }
}
