//! Reconciliation and aggregation over the cleaned tables.
//!
//! Every operation here is a pure read: cleaned orders, catalog, and the user
//! clustering go in, summary values come out. Grouping runs through ordered
//! maps so that ties resolve deterministically to the smallest key under the
//! stable descending sort.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::{authors::AuthorSet, catalog::Book, ingest::Order};

/// Number of top revenue dates reported.
pub const TOP_DAYS: usize = 5;

/// The final reconciliation summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub top_5_days: Vec<String>,
    pub unique_users: usize,
    pub unique_author_sets: usize,
    pub best_author: Vec<String>,
    pub top_buyer_cluster: Vec<String>,
}

/// Sums paid price per calendar date, chronologically ordered. Orders with an
/// undefined paid price or date contribute nothing.
pub fn daily_revenue(orders: &[Order]) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for order in orders {
        if let (Some(date), Some(paid)) = (order.date, order.paid_price) {
            *by_date.entry(date).or_insert(0.0) += paid;
        }
    }
    by_date.into_iter().collect()
}

/// Returns the `n` highest-revenue dates, descending by revenue.
pub fn top_days(series: &[(NaiveDate, f64)], n: usize) -> Vec<NaiveDate> {
    let mut ranked = series.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(date, _)| date).collect()
}

/// Sums ordered quantity per author-set via an inner join on book id.
/// Orders referencing an unknown book id fall out of the join silently.
pub fn author_sales(orders: &[Order], books: &[Book]) -> Vec<(AuthorSet, i64)> {
    let mut by_id: HashMap<&str, &Book> = HashMap::with_capacity(books.len());
    for book in books {
        by_id.entry(book.id.as_str()).or_insert(book);
    }

    let mut sales: BTreeMap<AuthorSet, i64> = BTreeMap::new();
    let mut dropped = 0usize;
    for order in orders {
        let Some(book) = by_id.get(order.book_id.as_str()) else {
            dropped += 1;
            continue;
        };
        *sales.entry(book.authors.clone()).or_insert(0) += order.quantity.unwrap_or(0);
    }
    if dropped > 0 {
        debug!("Dropped {dropped} order(s) referencing unknown book ids");
    }

    let mut ranked: Vec<_> = sales.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Sums paid price per user id, descending by spend.
pub fn user_spend(orders: &[Order]) -> Vec<(String, f64)> {
    let mut by_user: BTreeMap<String, f64> = BTreeMap::new();
    for order in orders {
        if let Some(paid) = order.paid_price {
            *by_user.entry(order.user_id.clone()).or_insert(0.0) += paid;
        }
    }
    let mut ranked: Vec<_> = by_user.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Assembles the full report from the cleaned tables and the clustering.
pub fn build_report(orders: &[Order], books: &[Book], clusters: &[Vec<String>]) -> Report {
    let series = daily_revenue(orders);
    let top_5_days = top_days(&series, TOP_DAYS)
        .into_iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect();

    let unique_author_sets = books
        .iter()
        .map(|book| &book.authors)
        .collect::<HashSet<_>>()
        .len();

    let best_author = author_sales(orders, books)
        .into_iter()
        .next()
        .map(|(set, _)| set.into_names())
        .unwrap_or_default();

    let top_buyer_cluster = match user_spend(orders).into_iter().next() {
        Some((top_user, _)) => clusters
            .iter()
            .find(|cluster| cluster.contains(&top_user))
            .cloned()
            // A spender missing from the user table still gets reported,
            // as a singleton.
            .unwrap_or_else(|| vec![top_user]),
        None => Vec::new(),
    };

    Report {
        top_5_days,
        unique_users: clusters.len(),
        unique_author_sets,
        best_author,
        top_buyer_cluster,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(user_id: &str, book_id: &str, quantity: i64, paid: Option<f64>, date: &str) -> Order {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        Order {
            order_id: String::new(),
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            quantity: Some(quantity),
            raw_unit_price: None,
            unit_price: None,
            currency_factor: 1.0,
            unit_price_usd: None,
            paid_price: paid,
            timestamp: None,
            date,
            year: None,
            month: None,
            day: None,
            shipping: None,
        }
    }

    fn book(id: &str, author: &str) -> Book {
        Book {
            id: id.to_string(),
            title: None,
            genre: None,
            publisher: None,
            year: None,
            price: None,
            authors: AuthorSet::parse(Some(author)),
        }
    }

    #[test]
    fn daily_revenue_totals_match_defined_paid_prices() {
        let orders = vec![
            order("u1", "b1", 1, Some(10.0), "2024-03-01"),
            order("u1", "b1", 1, Some(5.0), "2024-03-01"),
            order("u2", "b1", 1, Some(7.5), "2024-03-02"),
            order("u2", "b1", 1, None, "2024-03-02"),
        ];
        let series = daily_revenue(&orders);
        let total: f64 = series.iter().map(|(_, revenue)| revenue).sum();
        assert_eq!(total, 22.5);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].1, 15.0);
    }

    #[test]
    fn top_days_are_descending_and_bounded() {
        let orders: Vec<Order> = (1..=8)
            .map(|day| {
                order(
                    "u1",
                    "b1",
                    1,
                    Some(day as f64),
                    &format!("2024-03-{day:02}"),
                )
            })
            .collect();
        let series = daily_revenue(&orders);
        let top = top_days(&series, TOP_DAYS);
        assert_eq!(top.len(), TOP_DAYS);
        assert_eq!(top[0], NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!(top[4], NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn author_sales_drop_unknown_book_ids() {
        let orders = vec![
            order("u1", "b1", 2, Some(1.0), "2024-03-01"),
            order("u1", "missing", 9, Some(1.0), "2024-03-01"),
        ];
        let books = vec![book("b1", "Jane Smith")];
        let ranked = author_sales(&orders, &books);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].1, 2);
    }

    #[test]
    fn author_sales_merge_equivalent_author_sets() {
        let orders = vec![
            order("u1", "b1", 2, Some(1.0), "2024-03-01"),
            order("u1", "b2", 3, Some(1.0), "2024-03-01"),
        ];
        let books = vec![
            book("b1", "Jane Smith, John Doe"),
            book("b2", "john doe, JANE SMITH"),
        ];
        let ranked = author_sales(&orders, &books);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].1, 5);
    }

    #[test]
    fn report_names_the_top_buyer_cluster() {
        let orders = vec![
            order("u1", "b1", 1, Some(10.0), "2024-03-01"),
            order("u3", "b1", 1, Some(90.0), "2024-03-01"),
        ];
        let books = vec![book("b1", "Jane Smith")];
        let clusters = vec![
            vec!["u1".to_string(), "u2".to_string()],
            vec!["u3".to_string()],
        ];
        let report = build_report(&orders, &books, &clusters);
        assert_eq!(report.top_buyer_cluster, vec!["u3"]);
        assert_eq!(report.unique_users, 2);
        assert_eq!(report.best_author, vec!["Jane Smith"]);
        assert_eq!(report.top_5_days, vec!["2024-03-01"]);
    }

    #[test]
    fn top_buyer_missing_from_the_user_table_reports_alone() {
        let orders = vec![order("ghost", "b1", 1, Some(10.0), "2024-03-01")];
        let report = build_report(&orders, &[], &[]);
        assert_eq!(report.top_buyer_cluster, vec!["ghost"]);
    }

    #[test]
    fn empty_inputs_produce_an_empty_report() {
        let report = build_report(&[], &[], &[]);
        assert!(report.top_5_days.is_empty());
        assert!(report.best_author.is_empty());
        assert!(report.top_buyer_cluster.is_empty());
        assert_eq!(report.unique_users, 0);
        assert_eq!(report.unique_author_sets, 0);
    }
}
