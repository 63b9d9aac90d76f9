use crate::cli::OrderStatus;
use crate::domain::models::JsonOut;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Failure envelope on stdout in JSON mode; plain stderr otherwise.
pub fn print_error(json: bool, code: &str, err: &anyhow::Error) {
    if json {
        let out = serde_json::json!({
            "ok": false,
            "error": { "code": code, "message": err.to_string() }
        });
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(_) => println!("{}", out),
        }
    } else {
        eprintln!("error: {}", err);
    }
}

/// Status cell for text rows, colored by urgency.
pub fn status_cell(status: OrderStatus) -> String {
    match status {
        OrderStatus::Delivered => status.as_str().green().to_string(),
        OrderStatus::OutForDelivery => status.as_str().bright_green().to_string(),
        OrderStatus::InTransit | OrderStatus::Shipped => status.as_str().yellow().to_string(),
        OrderStatus::Pending => status.as_str().cyan().to_string(),
        OrderStatus::Exception => status.as_str().red().to_string(),
        OrderStatus::Cancelled => status.as_str().dimmed().to_string(),
    }
}

pub fn format_datetime(dt: Option<DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn format_date(dt: Option<DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
