use crate::cli::{Carrier, OrderStatus, Platform, UpdateTarget};
use crate::domain::models::{
    AddOrderReport, AddTrackingReport, ListSummary, OrderRow, Package, RefreshReport, StatusCount,
    StatusUpdateReport,
};
use crate::services::carriers::{scraper_for, TrackingResult};
use crate::services::store::{ListFilter, Store, StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Most urgent first; `list` groups status sections in this order.
pub const STATUS_DISPLAY_ORDER: [OrderStatus; 7] = [
    OrderStatus::OutForDelivery,
    OrderStatus::InTransit,
    OrderStatus::Shipped,
    OrderStatus::Pending,
    OrderStatus::Delivered,
    OrderStatus::Exception,
    OrderStatus::Cancelled,
];

pub fn add_order(
    store: &Store,
    platform: Platform,
    description: &str,
    order_number: Option<&str>,
    order_date: Option<NaiveDate>,
    tracking: Option<(&str, Carrier)>,
) -> StoreResult<AddOrderReport> {
    if let Some((number, _)) = tracking {
        if store.tracking_exists(number)? {
            return Err(StoreError::DuplicateTracking(number.to_string()));
        }
    }

    let status = if tracking.is_some() {
        OrderStatus::Shipped
    } else {
        OrderStatus::Pending
    };
    let order_id =
        store.insert_order(platform, order_number, Some(description), order_date, status)?;

    let mut report = AddOrderReport {
        order_id,
        platform,
        status,
        tracking_number: None,
        carrier: None,
    };
    if let Some((number, carrier)) = tracking {
        store.insert_package(order_id, number, carrier, OrderStatus::Shipped, None)?;
        report.tracking_number = Some(number.to_string());
        report.carrier = Some(carrier);
    }
    Ok(report)
}

pub fn add_tracking(
    store: &Store,
    order_id: i64,
    tracking_number: &str,
    carrier: Carrier,
    estimated_delivery: Option<NaiveDate>,
) -> StoreResult<AddTrackingReport> {
    let order = store.get_order(order_id)?;
    let eta = estimated_delivery.map(start_of_day);
    let package_id =
        store.insert_package(order_id, tracking_number, carrier, OrderStatus::Shipped, eta)?;
    if order.status == OrderStatus::Pending {
        store.set_order_status(order_id, OrderStatus::Shipped)?;
    }
    Ok(AddTrackingReport {
        order_id,
        package_id,
        tracking_number: tracking_number.to_string(),
        carrier,
        status: OrderStatus::Shipped,
        estimated_delivery: eta,
    })
}

/// The manual status-update workflow. The chosen target is the only thing
/// touched, except that delivering a whole order also delivers its packages.
pub fn update_status(
    store: &Store,
    order_id: i64,
    target: UpdateTarget,
    status: OrderStatus,
    location: Option<&str>,
) -> StoreResult<StatusUpdateReport> {
    store.get_order(order_id)?;

    let mut report = StatusUpdateReport {
        order_id,
        target,
        status,
        updated_packages: 0,
        delivered_at: None,
    };
    let now = Utc::now();
    match target {
        UpdateTarget::Order => {
            store.set_order_status(order_id, status)?;
            if status == OrderStatus::Delivered {
                for pkg in store.packages_for(order_id)? {
                    let delivered_at = pkg.delivered_at.is_none().then_some(now);
                    store.update_package(pkg.id, OrderStatus::Delivered, None, None, delivered_at)?;
                    report.updated_packages += 1;
                }
            }
        }
        UpdateTarget::Package => {
            for pkg in store.packages_for(order_id)? {
                let delivered_at =
                    (status == OrderStatus::Delivered && pkg.delivered_at.is_none()).then_some(now);
                store.update_package(pkg.id, status, location, None, delivered_at)?;
                report.updated_packages += 1;
            }
        }
    }
    if status == OrderStatus::Delivered && report.updated_packages > 0 {
        report.delivered_at = Some(now);
    }
    Ok(report)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// The result carried an error; nothing was persisted.
    Skipped,
    Updated,
}

/// Apply one fetch result to its package. Error first: a failed fetch never
/// mutates state. The owning order's status is synced to the package.
pub fn apply_tracking(
    store: &Store,
    package: &Package,
    result: &TrackingResult,
) -> StoreResult<Applied> {
    if result.error.is_some() {
        return Ok(Applied::Skipped);
    }
    let delivered_at = (result.status == OrderStatus::Delivered && package.delivered_at.is_none())
        .then(Utc::now);
    store.update_package(
        package.id,
        result.status,
        result.last_location.as_deref(),
        result.estimated_delivery,
        delivered_at,
    )?;
    store.set_order_status(package.order_id, result.status)?;
    Ok(Applied::Updated)
}

/// Walk packages sequentially: resolve a scraper, fetch, apply. One blocking
/// fetch at a time.
pub fn refresh_packages(store: &Store, packages: &[Package]) -> StoreResult<Vec<RefreshReport>> {
    let mut reports = Vec::with_capacity(packages.len());
    for pkg in packages {
        let mut report = RefreshReport {
            package_id: pkg.id,
            tracking_number: pkg.tracking_number.clone(),
            carrier: pkg.carrier,
            outcome: "no_scraper".to_string(),
            status: None,
            error: None,
        };
        if let Some(scraper) = scraper_for(pkg.carrier) {
            let result = scraper.fetch_tracking(&pkg.tracking_number);
            match &result.error {
                Some(err) => {
                    report.outcome = "error".to_string();
                    report.error = Some(err.clone());
                }
                None => {
                    apply_tracking(store, pkg, &result)?;
                    report.outcome = "updated".to_string();
                    report.status = Some(result.status);
                }
            }
        }
        reports.push(report);
    }
    Ok(reports)
}

/// Orders joined with their first package, grouped by status urgency and
/// sorted within a group by earliest estimated delivery, then description.
pub fn list_rows(store: &Store, filter: &ListFilter) -> StoreResult<Vec<OrderRow>> {
    let orders = store.list_orders(filter)?;
    let mut keyed = Vec::with_capacity(orders.len());
    for order in orders {
        let packages = store.packages_for(order.id)?;
        let earliest = packages.iter().filter_map(|p| p.estimated_delivery).min();
        let first = packages.into_iter().next();
        keyed.push((order, first, earliest));
    }

    keyed.sort_by(|(a, _, a_eta), (b, _, b_eta)| {
        display_rank(a.status)
            .cmp(&display_rank(b.status))
            .then_with(|| {
                a_eta
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
                    .cmp(&b_eta.unwrap_or(DateTime::<Utc>::MAX_UTC))
            })
            .then_with(|| a.description.cmp(&b.description))
    });

    Ok(keyed
        .into_iter()
        .map(|(order, first, _)| OrderRow {
            id: order.id,
            platform: order.platform,
            description: order.description,
            order_number: order.order_number,
            status: order.status,
            tracking_number: first.as_ref().map(|p| p.tracking_number.clone()),
            carrier: first.as_ref().map(|p| p.carrier),
            estimated_delivery: first.as_ref().and_then(|p| p.estimated_delivery),
        })
        .collect())
}

pub fn summarize(rows: &[OrderRow]) -> ListSummary {
    let mut by_status = Vec::new();
    for status in STATUS_DISPLAY_ORDER {
        let count = rows.iter().filter(|r| r.status == status).count();
        if count > 0 {
            by_status.push(StatusCount { status, count });
        }
    }
    ListSummary {
        total: rows.len(),
        by_status,
    }
}

fn display_rank(status: OrderStatus) -> usize {
    STATUS_DISPLAY_ORDER
        .iter()
        .position(|s| *s == status)
        .unwrap_or(STATUS_DISPLAY_ORDER.len())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
