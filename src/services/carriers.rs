use crate::cli::{Carrier, OrderStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Carrier tracking pages serve bot-unfriendly responses to default clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected http status: {0}")]
    Status(reqwest::StatusCode),
}

/// What one fetch attempt against a carrier produced. Immutable once built;
/// when `error` is set the other fields are best-effort and callers must
/// check `error` first.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingResult {
    pub status: OrderStatus,
    pub last_location: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub raw_status: String,
    pub error: Option<String>,
}

impl TrackingResult {
    /// A failed fetch still carries a valid status (`in_transit`).
    pub fn failed(raw_status: impl Into<String>, error: impl Into<String>) -> Self {
        TrackingResult {
            status: OrderStatus::InTransit,
            last_location: None,
            estimated_delivery: None,
            raw_status: raw_status.into(),
            error: Some(error.into()),
        }
    }
}

/// Contract every carrier-specific scraper satisfies. Implementations parse
/// their carrier's tracking page; `fetch_tracking` must return a
/// `TrackingResult` even on failure, never propagate.
pub trait CarrierScraper {
    fn carrier(&self) -> Carrier;

    /// Pure URL construction, no network I/O and no format validation.
    fn tracking_url(&self, tracking_number: &str) -> String;

    fn fetch_tracking(&self, tracking_number: &str) -> TrackingResult;
}

/// Look up the scraper for a carrier. Carriers without one resolve to `None`
/// and `refresh` reports them as skipped.
pub fn scraper_for(carrier: Carrier) -> Option<Box<dyn CarrierScraper>> {
    match carrier {
        Carrier::Fedex
        | Carrier::Ups
        | Carrier::Usps
        | Carrier::AmazonLogistics
        | Carrier::Ontrac => None,
    }
}

/// Single blocking GET with the shared timeout and headers. No retry, no
/// caching; scrapers fold the error into `TrackingResult.error`.
pub fn issue_request(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let resp = client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    Ok(resp.text()?)
}

/// Map free-text carrier status to the canonical status. Checks run in fixed
/// priority order and the first match wins: "delivered" beats an
/// exception-style phrase appearing in the same string.
pub fn classify_status(raw: &str) -> OrderStatus {
    let s = raw.to_lowercase();
    if s.contains("delivered") {
        OrderStatus::Delivered
    } else if s.contains("out for delivery") {
        OrderStatus::OutForDelivery
    } else if s.contains("label created") || s.contains("shipping label") {
        OrderStatus::Shipped
    } else if s.contains("exception") || s.contains("delay") {
        OrderStatus::Exception
    } else {
        OrderStatus::InTransit
    }
}
