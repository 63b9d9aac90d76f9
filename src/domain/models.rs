use crate::cli::{Carrier, OrderStatus, Platform, UpdateTarget};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// A purchase recorded from one of the supported platforms.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub platform: Platform,
    pub order_number: Option<String>,
    pub description: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A shipment attached to an order once it has a tracking number.
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub id: i64,
    pub order_id: i64,
    pub tracking_number: String,
    pub carrier: Carrier,
    pub status: OrderStatus,
    pub last_location: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of `list` output: an order joined with its first package.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: i64,
    pub platform: Platform,
    pub description: Option<String>,
    pub order_number: Option<String>,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub carrier: Option<Carrier>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub packages: Vec<Package>,
}

#[derive(Debug, Serialize)]
pub struct AddOrderReport {
    pub order_id: i64,
    pub platform: Platform,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub carrier: Option<Carrier>,
}

#[derive(Serialize)]
pub struct AddTrackingReport {
    pub order_id: i64,
    pub package_id: i64,
    pub tracking_number: String,
    pub carrier: Carrier,
    pub status: OrderStatus,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct StatusUpdateReport {
    pub order_id: i64,
    pub target: UpdateTarget,
    pub status: OrderStatus,
    pub updated_packages: usize,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Outcome of one package during `refresh`.
#[derive(Serialize)]
pub struct RefreshReport {
    pub package_id: i64,
    pub tracking_number: String,
    pub carrier: Carrier,
    pub outcome: String,
    pub status: Option<OrderStatus>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ListSummary {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
}

#[derive(Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}
