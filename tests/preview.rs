use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{ORDERS_CSV, TestWorkspace};

#[test]
fn preview_renders_cleaned_order_rows() {
    let workspace = TestWorkspace::new();
    let orders = workspace.write("orders.csv", ORDERS_CSV);

    Command::cargo_bin("order-reconcile")
        .expect("binary exists")
        .args(["preview", "--orders", orders.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            contains("order_id")
                .and(contains("paid_price"))
                // 9¢50 * 2 in canonical currency.
                .and(contains("19.00"))
                // 12,50 EUR converted at the fixed rate.
                .and(contains("15.00"))
                .and(contains("2024-03-02 13:30:00")),
        );
}

#[test]
fn preview_honours_the_row_limit() {
    let workspace = TestWorkspace::new();
    let orders = workspace.write("orders.csv", ORDERS_CSV);

    Command::cargo_bin("order-reconcile")
        .expect("binary exists")
        .args([
            "preview",
            "--orders",
            orders.to_str().unwrap(),
            "--rows",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("o1").and(contains("o2").not()));
}

#[test]
fn preview_leaves_unparseable_values_blank() {
    let workspace = TestWorkspace::new();
    let orders = workspace.write(
        "orders.csv",
        "order_id,user_id,book_id,unit_price,quantity,timestamp,shipping\no9,u1,b1,mystery,1,whenever,\n",
    );

    Command::cargo_bin("order-reconcile")
        .expect("binary exists")
        .args(["preview", "--orders", orders.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("o9").and(contains("mystery")));
}
