use crate::cli::{Cli, Commands};
use crate::domain::models::OrderDetails;
use crate::services::orders::{add_order, list_rows, summarize};
use crate::services::output::{
    format_date, format_datetime, or_dash, print_one, print_out, status_cell,
};
use crate::services::store::{audit, ListFilter, Store};

pub fn handle_order_commands(cli: &Cli, store: &Store) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Init => {
            // Store::open already created the directory and schema.
            print_one(cli.json, "initialized", |_| {
                "database initialized".to_string()
            })?;
        }
        Commands::AddOrder {
            platform,
            description,
            order_number,
            order_date,
            tracking,
            carrier,
        } => {
            let tracking_pair = match (tracking.as_deref(), carrier) {
                (Some(number), Some(c)) => Some((number, *c)),
                _ => None,
            };
            let report = add_order(
                store,
                *platform,
                description,
                order_number.as_deref(),
                *order_date,
                tracking_pair,
            )?;
            audit(
                "add_order",
                serde_json::json!({"order_id": report.order_id, "platform": report.platform}),
            );
            print_one(cli.json, report, |r| {
                let mut line = format!("added order {} ({})", r.order_id, r.platform);
                if let (Some(tracking), Some(carrier)) = (&r.tracking_number, &r.carrier) {
                    line.push_str(&format!("\ntracking {} via {}", tracking, carrier));
                }
                line
            })?;
        }
        Commands::List {
            status,
            platform,
            has_tracking,
            no_tracking,
            delivered,
            active,
        } => {
            let filter = ListFilter {
                status: *status,
                platform: *platform,
                has_tracking: if *has_tracking {
                    Some(true)
                } else if *no_tracking {
                    Some(false)
                } else {
                    None
                },
                delivered: *delivered,
                active: *active,
            };
            let rows = list_rows(store, &filter)?;
            if cli.json {
                print_out(cli.json, &rows, |_| String::new())?;
            } else if rows.is_empty() {
                println!("no orders found. add one with 'shipmate add-order'");
            } else {
                for r in &rows {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        r.id,
                        r.platform,
                        or_dash(r.description.as_deref()),
                        or_dash(r.tracking_number.as_deref()),
                        r.carrier.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                        status_cell(r.status),
                        format_date(r.estimated_delivery),
                    );
                }
                let summary = summarize(&rows);
                println!();
                println!("total orders: {}", summary.total);
                let parts: Vec<String> = summary
                    .by_status
                    .iter()
                    .map(|c| format!("{}: {}", c.status, c.count))
                    .collect();
                if !parts.is_empty() {
                    println!("{}", parts.join(" | "));
                }
            }
        }
        Commands::Show { order_id } => {
            let order = store.get_order(*order_id)?;
            let packages = store.packages_for(*order_id)?;
            let details = OrderDetails { order, packages };
            if cli.json {
                print_one(cli.json, details, |_| String::new())?;
            } else {
                let o = &details.order;
                println!("order #{}", o.id);
                println!("platform: {}", o.platform);
                println!("order number: {}", or_dash(o.order_number.as_deref()));
                println!("description: {}", or_dash(o.description.as_deref()));
                println!("status: {}", status_cell(o.status));
                println!("created: {}", format_datetime(Some(o.created_at)));
                println!("updated: {}", format_datetime(Some(o.updated_at)));
                if details.packages.is_empty() {
                    println!();
                    println!("no tracking information available");
                } else {
                    for p in &details.packages {
                        println!();
                        println!("package #{}", p.id);
                        println!("tracking: {}", p.tracking_number);
                        println!("carrier: {}", p.carrier);
                        println!("status: {}", status_cell(p.status));
                        println!("last location: {}", or_dash(p.last_location.as_deref()));
                        println!("est. delivery: {}", format_date(p.estimated_delivery));
                        println!("delivered at: {}", format_datetime(p.delivered_at));
                    }
                }
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}
