pub mod aggregate;
pub mod authors;
pub mod catalog;
pub mod cli;
pub mod cluster;
pub mod currency;
pub mod ingest;
pub mod io_utils;
pub mod table;
pub mod timestamp;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("order_reconcile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Clusters(args) => handle_clusters(&args),
    }
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let orders_delimiter = io_utils::resolve_input_delimiter(&args.orders, args.delimiter);
    let users_delimiter = io_utils::resolve_input_delimiter(&args.users, args.delimiter);
    info!(
        "Reconciling '{}' + '{}' + '{}' (delimiter '{}')",
        args.orders.display(),
        args.users.display(),
        args.books.display(),
        io_utils::printable_delimiter(orders_delimiter)
    );

    let orders = ingest::load_orders(&args.orders, orders_delimiter, encoding)
        .with_context(|| format!("Loading orders from {:?}", args.orders))?;
    let users = ingest::load_users(&args.users, users_delimiter, encoding)
        .with_context(|| format!("Loading users from {:?}", args.users))?;
    let books = catalog::load_books(&args.books)
        .with_context(|| format!("Loading catalog from {:?}", args.books))?;

    let clusters = cluster::cluster_users(&users);
    info!(
        "Resolved {} user(s) into {} cluster(s)",
        users.len(),
        clusters.len()
    );

    let report = aggregate::build_report(&orders, &books, &clusters);

    if let Some(path) = &args.daily_revenue {
        let series = aggregate::daily_revenue(&orders);
        write_daily_revenue(path, &series)
            .with_context(|| format!("Writing daily revenue to {path:?}"))?;
        info!("Daily revenue series written to {path:?}");
    }

    write_report(&report, args.output.as_deref())?;
    Ok(())
}

fn write_report(report: &aggregate::Report, path: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(report).context("Serializing report")?;
    match path {
        Some(path) if !io_utils::is_dash(path) => {
            fs::write(path, rendered + "\n")
                .with_context(|| format!("Writing report to {path:?}"))?;
            info!("Report written to {path:?}");
        }
        _ => println!("{rendered}"),
    }
    Ok(())
}

fn write_daily_revenue(path: &Path, series: &[(NaiveDate, f64)]) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(Some(path), io_utils::DEFAULT_CSV_DELIMITER)?;
    writer
        .write_record(["date", "revenue"])
        .context("Writing daily revenue header")?;
    for (date, revenue) in series {
        writer
            .write_record([
                date.format("%Y-%m-%d").to_string(),
                format!("{revenue:.2}"),
            ])
            .context("Writing daily revenue row")?;
    }
    writer.flush().context("Flushing daily revenue output")?;
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.orders, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let orders = ingest::load_orders(&args.orders, delimiter, encoding)?;

    let headers = [
        "order_id",
        "user_id",
        "book_id",
        "unit_price",
        "unit_price_usd",
        "quantity",
        "paid_price",
        "timestamp",
        "shipping",
    ]
    .map(String::from)
    .to_vec();

    let rows = orders
        .iter()
        .take(args.rows)
        .map(|order| {
            vec![
                order.order_id.clone(),
                order.user_id.clone(),
                order.book_id.clone(),
                order.raw_unit_price.clone().unwrap_or_default(),
                format_money(order.unit_price_usd),
                order.quantity.map(|q| q.to_string()).unwrap_or_default(),
                format_money(order.paid_price),
                order
                    .timestamp
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
                order.shipping.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    table::print_table(&headers, &rows);
    info!(
        "Previewed {} of {} cleaned order row(s)",
        rows.len(),
        orders.len()
    );
    Ok(())
}

fn handle_clusters(args: &cli::ClustersArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.users, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let users = ingest::load_users(&args.users, delimiter, encoding)?;
    let clusters = cluster::cluster_users(&users);

    let headers = ["cluster", "size", "members"].map(String::from).to_vec();
    let rows = clusters
        .iter()
        .enumerate()
        .map(|(idx, members)| {
            vec![
                (idx + 1).to_string(),
                members.len().to_string(),
                members.iter().join(" "),
            ]
        })
        .collect::<Vec<_>>();

    table::print_table(&headers, &rows);
    info!(
        "Resolved {} user(s) into {} cluster(s)",
        users.len(),
        clusters.len()
    );
    Ok(())
}

fn format_money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}
