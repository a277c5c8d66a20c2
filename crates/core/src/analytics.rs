//! Dashboard analytics computed by folding over every request.

use serde::Serialize;

use crate::request_status::PaymentStatus;
use crate::types::Rupees;

/// The per-request facts analytics needs.
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts {
    pub payment_status: PaymentStatus,
    pub amount: Rupees,
    pub download_enabled: bool,
}

/// Aggregated marketplace figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total_projects: i64,
    pub total_requests: i64,
    pub total_sales: i64,
    pub total_revenue: Rupees,
    pub total_downloads: i64,
    /// Sales over requests as a percentage with two decimals.
    pub conversion_rate: String,
    /// Revenue per sale, rounded to the nearest rupee.
    pub average_order_value: Rupees,
}

/// Fold `requests` into an [`Analytics`] summary.
pub fn compute<I>(total_projects: i64, requests: I) -> Analytics
where
    I: IntoIterator<Item = RequestFacts>,
{
    let mut total_requests = 0;
    let mut total_sales = 0;
    let mut total_revenue = 0;
    let mut total_downloads = 0;

    for r in requests {
        total_requests += 1;
        if r.payment_status == PaymentStatus::Verified {
            total_sales += 1;
            total_revenue += r.amount;
        }
        if r.download_enabled {
            total_downloads += 1;
        }
    }

    Analytics {
        total_projects,
        total_requests,
        total_sales,
        total_revenue,
        total_downloads,
        conversion_rate: conversion_rate(total_sales, total_requests),
        average_order_value: average_order_value(total_revenue, total_sales),
    }
}

/// `sales / requests * 100` formatted with two decimals; `"0.00"` when empty.
pub fn conversion_rate(sales: i64, requests: i64) -> String {
    if requests == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", sales as f64 / requests as f64 * 100.0)
}

fn average_order_value(revenue: Rupees, sales: i64) -> Rupees {
    if sales == 0 {
        return 0;
    }
    (revenue as f64 / sales as f64).round() as Rupees
}
