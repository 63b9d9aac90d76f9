use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shipmate",
    version,
    about = "Track your orders and packages in one place"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Database file (defaults to $SHIPMATE_DB, then ~/.shipmate/orders.db)"
    )]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database directory and schema.
    Init,
    /// Record a new order, optionally with a tracking number.
    AddOrder {
        #[arg(long, value_enum)]
        platform: Platform,
        #[arg(long)]
        description: String,
        #[arg(long)]
        order_number: Option<String>,
        #[arg(long, help = "Order date as YYYY-MM-DD")]
        order_date: Option<NaiveDate>,
        #[arg(long, requires = "carrier")]
        tracking: Option<String>,
        #[arg(long, value_enum, requires = "tracking")]
        carrier: Option<Carrier>,
    },
    /// Attach a tracking number to an existing order.
    AddTracking {
        order_id: i64,
        tracking_number: String,
        #[arg(long, value_enum)]
        carrier: Carrier,
        #[arg(long, help = "Estimated delivery date as YYYY-MM-DD")]
        estimated_delivery: Option<NaiveDate>,
    },
    /// List orders, most urgent status group first.
    List {
        #[arg(long, short = 's', value_enum)]
        status: Option<OrderStatus>,
        #[arg(long, short = 'p', value_enum)]
        platform: Option<Platform>,
        #[arg(long, conflicts_with = "no_tracking")]
        has_tracking: bool,
        #[arg(long)]
        no_tracking: bool,
        #[arg(long)]
        delivered: bool,
        #[arg(long, help = "Only non-delivered, non-cancelled orders")]
        active: bool,
    },
    /// Show one order with its packages.
    Show { order_id: i64 },
    /// Move an order or its packages to a new status.
    UpdateStatus {
        order_id: i64,
        #[arg(
            long,
            value_enum,
            conflicts_with = "raw",
            required_unless_present = "raw"
        )]
        status: Option<OrderStatus>,
        #[arg(long, help = "Raw carrier status text, classified into a status")]
        raw: Option<String>,
        #[arg(long, value_enum, default_value_t = UpdateTarget::Order)]
        target: UpdateTarget,
        #[arg(long, help = "Package location, e.g. \"Memphis, TN\"")]
        location: Option<String>,
    },
    /// Fetch carrier tracking for an order's packages and apply it.
    Refresh {
        #[arg(conflicts_with = "all")]
        order_id: Option<i64>,
        #[arg(long, help = "Refresh every active package")]
        all: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[value(name = "shop.app")]
    #[serde(rename = "shop.app")]
    ShopApp,
    Etsy,
    Amazon,
    Generic,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::ShopApp => "shop.app",
            Platform::Etsy => "etsy",
            Platform::Amazon => "amazon",
            Platform::Generic => "generic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shop.app" => Some(Platform::ShopApp),
            "etsy" => Some(Platform::Etsy),
            "amazon" => Some(Platform::Amazon),
            "generic" => Some(Platform::Generic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Carrier {
    Fedex,
    Ups,
    Usps,
    AmazonLogistics,
    Ontrac,
}

impl Carrier {
    pub fn as_str(self) -> &'static str {
        match self {
            Carrier::Fedex => "fedex",
            Carrier::Ups => "ups",
            Carrier::Usps => "usps",
            Carrier::AmazonLogistics => "amazon_logistics",
            Carrier::Ontrac => "ontrac",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fedex" => Some(Carrier::Fedex),
            "ups" => Some(Carrier::Ups),
            "usps" => Some(Carrier::Usps),
            "amazon_logistics" => Some(Carrier::AmazonLogistics),
            "ontrac" => Some(Carrier::Ontrac),
            _ => None,
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical status shared by orders, packages, and tracking results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Exception => "exception",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "shipped" => Some(OrderStatus::Shipped),
            "in_transit" => Some(OrderStatus::InTransit),
            "out_for_delivery" => Some(OrderStatus::OutForDelivery),
            "delivered" => Some(OrderStatus::Delivered),
            "exception" => Some(OrderStatus::Exception),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpdateTarget {
    Order,
    Package,
}

impl std::fmt::Display for UpdateTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateTarget::Order => f.write_str("order"),
            UpdateTarget::Package => f.write_str("package"),
        }
    }
}
