use crate::cli::{Cli, Commands};
use crate::services::carriers::classify_status;
use crate::services::orders::{add_tracking, refresh_packages, update_status};
use crate::services::output::{print_one, print_out};
use crate::services::store::{audit, Store};

pub fn handle_tracking_commands(cli: &Cli, store: &Store) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::AddTracking {
            order_id,
            tracking_number,
            carrier,
            estimated_delivery,
        } => {
            let report = add_tracking(
                store,
                *order_id,
                tracking_number,
                *carrier,
                *estimated_delivery,
            )?;
            audit(
                "add_tracking",
                serde_json::json!({
                    "order_id": report.order_id,
                    "tracking_number": report.tracking_number,
                    "carrier": report.carrier
                }),
            );
            print_one(cli.json, report, |r| {
                format!("tracking added: {} via {}", r.tracking_number, r.carrier)
            })?;
        }
        Commands::UpdateStatus {
            order_id,
            status,
            raw,
            target,
            location,
        } => {
            let status = match (status, raw.as_deref()) {
                (Some(s), _) => *s,
                (None, Some(raw)) => classify_status(raw),
                (None, None) => anyhow::bail!("pass --status or --raw"),
            };
            let report = update_status(store, *order_id, *target, status, location.as_deref())?;
            audit(
                "update_status",
                serde_json::json!({
                    "order_id": report.order_id,
                    "target": report.target,
                    "status": report.status
                }),
            );
            print_one(cli.json, report, |r| {
                format!("status updated to {}", r.status)
            })?;
        }
        Commands::Refresh { order_id, all } => {
            let packages = match order_id {
                Some(id) => {
                    store.get_order(*id)?;
                    store.packages_for(*id)?
                }
                None if *all => store.active_packages()?,
                None => anyhow::bail!("pass an order id or --all"),
            };
            let reports = refresh_packages(store, &packages)?;
            audit("refresh", serde_json::json!({"count": reports.len()}));
            print_out(cli.json, &reports, |r| {
                format!("{}\t{}\t{}", r.tracking_number, r.carrier, r.outcome)
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
