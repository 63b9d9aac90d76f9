mod common;

use common::TestEnv;
use predicates::str::contains;

#[test]
fn init_reports_initialized() {
    let env = TestEnv::new();
    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("database initialized"));
}

#[test]
fn add_order_then_list_shows_it() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "add-order",
            "--platform",
            "etsy",
            "--description",
            "Christmas sweater",
        ])
        .assert()
        .success()
        .stdout(contains("added order 1"));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Christmas sweater"))
        .stdout(contains("pending"))
        .stdout(contains("total orders: 1"));
}

#[test]
fn list_without_orders_prints_hint() {
    let env = TestEnv::new();
    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("no orders found"));
}

#[test]
fn show_unknown_order_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["show", "999"])
        .assert()
        .failure()
        .stderr(contains("order 999 not found"));
}

#[test]
fn update_status_accepts_raw_carrier_text() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "add-order",
            "--platform",
            "amazon",
            "--description",
            "Christmas tree",
            "--tracking",
            "TRK-7",
            "--carrier",
            "ups",
        ])
        .assert()
        .success()
        .stdout(contains("tracking TRK-7 via ups"));

    // Priority order: a combined string still counts as delivered.
    env.cmd()
        .args(["update-status", "1", "--raw", "Delivered with exception"])
        .assert()
        .success()
        .stdout(contains("status updated to delivered"));
}
