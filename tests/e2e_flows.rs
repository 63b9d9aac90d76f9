mod common;

use common::TestEnv;

#[test]
fn full_workflow_from_order_to_delivery() {
    let env = TestEnv::new();

    let added = env.run_json(&[
        "add-order",
        "--platform",
        "etsy",
        "--description",
        "Christmas sweater",
    ]);
    assert_eq!(added["ok"], true);
    assert_eq!(added["data"]["status"], "pending");
    let id = added["data"]["order_id"]
        .as_i64()
        .expect("order id")
        .to_string();

    let list = env.run_json(&["list"]);
    assert_eq!(list["data"][0]["description"], "Christmas sweater");
    assert_eq!(list["data"][0]["status"], "pending");

    let tracked = env.run_json(&["add-tracking", &id, "1Z999", "--carrier", "ups"]);
    assert_eq!(tracked["ok"], true);
    assert_eq!(tracked["data"]["tracking_number"], "1Z999");
    assert_eq!(tracked["data"]["status"], "shipped");

    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["order"]["status"], "shipped");
    assert_eq!(shown["data"]["packages"][0]["carrier"], "ups");

    let moved = env.run_json(&[
        "update-status",
        &id,
        "--status",
        "in_transit",
        "--target",
        "package",
        "--location",
        "Memphis, TN",
    ]);
    assert_eq!(moved["data"]["status"], "in_transit");
    assert_eq!(moved["data"]["updated_packages"], 1);

    let shown = env.run_json(&["show", &id]);
    assert_eq!(shown["data"]["packages"][0]["last_location"], "Memphis, TN");

    let delivered = env.run_json(&["update-status", &id, "--status", "delivered"]);
    assert_eq!(delivered["data"]["updated_packages"], 1);
    assert!(delivered["data"]["delivered_at"].is_string());

    let list = env.run_json(&["list", "--delivered"]);
    let rows = list["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "delivered");
}

#[test]
fn duplicate_tracking_is_rejected_with_code() {
    let env = TestEnv::new();
    env.run_json(&[
        "add-order",
        "--platform",
        "amazon",
        "--description",
        "Christmas lights",
        "--tracking",
        "1Z999AA1",
        "--carrier",
        "ups",
    ]);

    let err = env.run_json_fail(&[
        "add-order",
        "--platform",
        "etsy",
        "--description",
        "duplicate",
        "--tracking",
        "1Z999AA1",
        "--carrier",
        "fedex",
    ]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "DUPLICATE_TRACKING");

    // The failed add must not leave a stray order behind.
    let list = env.run_json(&["list"]);
    assert_eq!(list["data"].as_array().expect("rows").len(), 1);
}

#[test]
fn add_tracking_to_unknown_order_reports_not_found() {
    let env = TestEnv::new();
    let err = env.run_json_fail(&["add-tracking", "42", "TRK-1", "--carrier", "usps"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "ORDER_NOT_FOUND");
}

#[test]
fn list_filters_cycle() {
    let env = TestEnv::new();
    env.run_json(&[
        "add-order",
        "--platform",
        "etsy",
        "--description",
        "Pending order",
    ]);
    env.run_json(&[
        "add-order",
        "--platform",
        "amazon",
        "--description",
        "Shipped order",
        "--tracking",
        "TRK-1",
        "--carrier",
        "usps",
    ]);
    env.run_json(&[
        "add-order",
        "--platform",
        "shop.app",
        "--description",
        "Delivered order",
    ]);
    env.run_json(&["update-status", "3", "--status", "delivered"]);

    let active = env.run_json(&["list", "--active"]);
    assert_eq!(active["data"].as_array().expect("rows").len(), 2);

    let delivered = env.run_json(&["list", "--delivered"]);
    assert_eq!(delivered["data"].as_array().expect("rows").len(), 1);
    assert_eq!(delivered["data"][0]["description"], "Delivered order");

    let etsy = env.run_json(&["list", "--platform", "etsy"]);
    assert_eq!(etsy["data"].as_array().expect("rows").len(), 1);
    assert_eq!(etsy["data"][0]["description"], "Pending order");

    let with_tracking = env.run_json(&["list", "--has-tracking"]);
    assert_eq!(with_tracking["data"].as_array().expect("rows").len(), 1);
    assert_eq!(with_tracking["data"][0]["tracking_number"], "TRK-1");

    let without_tracking = env.run_json(&["list", "--no-tracking"]);
    assert_eq!(without_tracking["data"].as_array().expect("rows").len(), 2);

    let pending = env.run_json(&["list", "--status", "pending"]);
    assert_eq!(pending["data"].as_array().expect("rows").len(), 1);
}

#[test]
fn refresh_reports_no_scraper_for_unimplemented_carriers() {
    let env = TestEnv::new();
    env.run_json(&[
        "add-order",
        "--platform",
        "generic",
        "--description",
        "gadget",
        "--tracking",
        "ONT-1",
        "--carrier",
        "ontrac",
    ]);

    let refresh = env.run_json(&["refresh", "1"]);
    assert_eq!(refresh["data"][0]["outcome"], "no_scraper");
    assert_eq!(refresh["data"][0]["carrier"], "ontrac");

    let all = env.run_json(&["refresh", "--all"]);
    assert_eq!(all["data"].as_array().expect("rows").len(), 1);
}

#[test]
fn update_status_classifies_raw_text() {
    let env = TestEnv::new();
    env.run_json(&[
        "add-order",
        "--platform",
        "amazon",
        "--description",
        "Christmas tree",
        "--tracking",
        "TRK-9",
        "--carrier",
        "fedex",
    ]);

    let moved = env.run_json(&[
        "update-status",
        "1",
        "--raw",
        "Out for Delivery",
        "--target",
        "package",
    ]);
    assert_eq!(moved["data"]["status"], "out_for_delivery");
}

#[test]
fn shipmate_db_env_overrides_db_location() {
    let env = TestEnv::new();
    let custom = env.home.join("elsewhere").join("custom.db");
    env.cmd()
        .env("SHIPMATE_DB", &custom)
        .args(["--json", "init"])
        .assert()
        .success();
    assert!(custom.exists());
}
