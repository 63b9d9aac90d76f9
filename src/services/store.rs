use crate::cli::{Carrier, OrderStatus, Platform};
use crate::domain::models::{Order, Package};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("order {0} not found")]
    OrderNotFound(i64),
    #[error("tracking number already exists: {0}")]
    DuplicateTracking(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT NOT NULL,
    order_number TEXT,
    description TEXT,
    order_date TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    tracking_number TEXT NOT NULL UNIQUE,
    carrier TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    last_location TEXT,
    estimated_delivery TEXT,
    delivered_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_packages_order_id ON packages(order_id);
";

impl ToSql for OrderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OrderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        OrderStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown status: {s}").into()))
    }
}

impl ToSql for Platform {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Platform {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Platform::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown platform: {s}").into()))
    }
}

impl ToSql for Carrier {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Carrier {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Carrier::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown carrier: {s}").into()))
    }
}

/// Which orders `list_orders` returns. Empty filter means everything.
#[derive(Debug, Default)]
pub struct ListFilter {
    pub status: Option<OrderStatus>,
    pub platform: Option<Platform>,
    pub has_tracking: Option<bool>,
    pub delivered: bool,
    pub active: bool,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating directory and schema as needed). Foreign keys are
    /// enforced for the packages → orders relation.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    pub fn insert_order(
        &self,
        platform: Platform,
        order_number: Option<&str>,
        description: Option<&str>,
        order_date: Option<NaiveDate>,
        status: OrderStatus,
    ) -> StoreResult<i64> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO orders (platform, order_number, description, order_date, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![platform, order_number, description, order_date, status, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_order(&self, id: i64) -> StoreResult<Order> {
        self.conn
            .query_row(
                "SELECT id, platform, order_number, description, order_date, status, created_at, updated_at
                 FROM orders WHERE id = ?1",
                params![id],
                row_to_order,
            )
            .optional()?
            .ok_or(StoreError::OrderNotFound(id))
    }

    pub fn list_orders(&self, filter: &ListFilter) -> StoreResult<Vec<Order>> {
        let mut sql = String::from(
            "SELECT id, platform, order_number, description, order_date, status, created_at, updated_at
             FROM orders",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("status = ?");
            args.push(Box::new(status));
        }
        if let Some(platform) = filter.platform {
            clauses.push("platform = ?");
            args.push(Box::new(platform));
        }
        match filter.has_tracking {
            Some(true) => {
                clauses.push("EXISTS (SELECT 1 FROM packages p WHERE p.order_id = orders.id)")
            }
            Some(false) => {
                clauses.push("NOT EXISTS (SELECT 1 FROM packages p WHERE p.order_id = orders.id)")
            }
            None => {}
        }
        if filter.delivered {
            clauses.push("status = 'delivered'");
        }
        if filter.active {
            clauses.push("status NOT IN ('delivered', 'cancelled')");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            row_to_order,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::OrderNotFound(id));
        }
        Ok(())
    }

    pub fn insert_package(
        &self,
        order_id: i64,
        tracking_number: &str,
        carrier: Carrier,
        status: OrderStatus,
        estimated_delivery: Option<DateTime<Utc>>,
    ) -> StoreResult<i64> {
        let now = Utc::now();
        let inserted = self.conn.execute(
            "INSERT INTO packages (order_id, tracking_number, carrier, status, estimated_delivery, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![order_id, tracking_number, carrier, status, estimated_delivery, now],
        );
        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateTracking(tracking_number.to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn tracking_exists(&self, tracking_number: &str) -> StoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM packages WHERE tracking_number = ?1",
            params![tracking_number],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn packages_for(&self, order_id: i64) -> StoreResult<Vec<Package>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, order_id, tracking_number, carrier, status, last_location, estimated_delivery, delivered_at, created_at, updated_at
             FROM packages WHERE order_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![order_id], row_to_package)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Every package still worth refreshing.
    pub fn active_packages(&self) -> StoreResult<Vec<Package>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, order_id, tracking_number, carrier, status, last_location, estimated_delivery, delivered_at, created_at, updated_at
             FROM packages WHERE status NOT IN ('delivered', 'cancelled') ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_package)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// One-shot package mutation. `None` fields keep their stored value, so
    /// a `delivered_at` passed only on the first delivery transition latches.
    pub fn update_package(
        &self,
        package_id: i64,
        status: OrderStatus,
        last_location: Option<&str>,
        estimated_delivery: Option<DateTime<Utc>>,
        delivered_at: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE packages SET status = ?1,
                last_location = COALESCE(?2, last_location),
                estimated_delivery = COALESCE(?3, estimated_delivery),
                delivered_at = COALESCE(?4, delivered_at),
                updated_at = ?5
             WHERE id = ?6",
            params![
                status,
                last_location,
                estimated_delivery,
                delivered_at,
                Utc::now(),
                package_id
            ],
        )?;
        Ok(())
    }
}

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        platform: row.get(1)?,
        order_number: row.get(2)?,
        description: row.get(3)?,
        order_date: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn row_to_package(row: &rusqlite::Row<'_>) -> rusqlite::Result<Package> {
    Ok(Package {
        id: row.get(0)?,
        order_id: row.get(1)?,
        tracking_number: row.get(2)?,
        carrier: row.get(3)?,
        status: row.get(4)?,
        last_location: row.get(5)?,
        estimated_delivery: row.get(6)?,
        delivered_at: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("SHIPMATE_DB") {
        return Ok(PathBuf::from(path));
    }
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".shipmate").join("orders.db"))
}

pub fn audit(action: &str, data: serde_json::Value) {
    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return,
    };
    let path = PathBuf::from(home).join(".shipmate").join("audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": Utc::now().to_rfc3339(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}
