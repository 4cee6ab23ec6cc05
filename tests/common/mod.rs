//! Shared fixtures for the integration tests: observation and listing
//! builders plus sample API payloads.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pricenest::{LiveListing, PriceObservation};

pub fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn obs(store: &str, at: DateTime<Utc>, price: f64) -> PriceObservation {
    PriceObservation {
        store: store.to_string(),
        timestamp: at,
        price,
    }
}

pub fn listing(id: i64, store: &str, price: Option<f64>) -> LiveListing {
    LiveListing {
        id: Some(id),
        title: format!("Item {}", id),
        store: store.to_string(),
        price,
        link: format!("https://shop.example/{}", id),
        image: None,
    }
}

/// Two stores over ten days in January 2024, several readings per day.
pub fn sample_history() -> Vec<PriceObservation> {
    vec![
        obs("Amazon", ts(2024, 1, 1, 9), 1000.0),
        obs("Amazon", ts(2024, 1, 1, 18), 1001.0),
        obs("Flipkart", ts(2024, 1, 1, 10), 980.0),
        obs("Amazon", ts(2024, 1, 3, 9), 990.0),
        obs("Flipkart", ts(2024, 1, 4, 12), 975.0),
        obs("Flipkart", ts(2024, 1, 4, 13), 970.0),
        obs("Amazon", ts(2024, 1, 7, 23), 950.0),
        obs("Amazon", ts(2024, 1, 10, 8), 940.0),
        obs("Flipkart", ts(2024, 1, 10, 9), 960.0),
    ]
}

pub const COMPARE_BODY: &str = r#"{
  "query": "iphone 15",
  "results": [
    {"id": 11, "title": "iPhone 15 128GB", "source": "Amazon", "price_numeric": 69999,
     "link": "https://a.example/11", "image": "https://img/11"},
    {"id": 12, "title": "iPhone 15 (Blue)", "source": "Amazon", "price_numeric": 0,
     "link": "https://a.example/12", "image": ""},
    {"id": 13, "title": "Apple iPhone 15", "source": "Flipkart", "price_numeric": 68499.5,
     "link": "https://f.example/13"},
    {"id": 14, "title": "iPhone 15 refurbished", "source": "Croma", "price_numeric": null,
     "link": "https://c.example/14"},
    {"id": 15, "title": "no store", "price_numeric": 100,
     "link": "https://x.example/15"},
    {"id": 16, "title": "negative", "source": "Reliance", "price_numeric": -5,
     "link": "https://r.example/16"}
  ]
}"#;

pub const ANALYTICS_BODY: &str = r#"{
  "summary": {
    "lowest_price": 68000,
    "highest_price": 72000,
    "average_price": 70100,
    "price_range": "₹68000 – ₹72000",
    "cheapest_store": "Flipkart"
  },
  "store_prices": {"Amazon": 69999, "Flipkart": 68499},
  "price_trend": [
    {"timestamp": "2024-01-01T09:15:00", "store": "Amazon", "price": 72000},
    {"timestamp": "2024-01-01T09:20:00", "store": "Flipkart", "price": 70000},
    {"timestamp": "2024-01-20T11:00:00", "store": "Amazon", "price": 69999},
    {"timestamp": "2024-01-21T11:00:00Z", "store": "Flipkart", "price": 68000},
    {"timestamp": "not a date", "store": "Flipkart", "price": 1},
    {"timestamp": "2024-01-21T11:00:00Z", "store": "", "price": 68000}
  ],
  "volatility": {"score": 1450.25, "stability": "🟡 Moderate"},
  "best_time_to_buy": "Prices have dropped by ₹2000 since your first search! Good time to buy."
}"#;
