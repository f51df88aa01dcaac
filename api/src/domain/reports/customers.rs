//! Customer report categories and request shape

use chrono::NaiveDate;
use serde::Deserialize;

use super::DateWindow;

/// Raw `POST /reports/customers` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerReportRequest {
    pub category: String,
    pub as_of_date: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// A validated customer report request.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerReport {
    /// Aggregate customer counts, single record.
    Overview,
    /// Balances computed from transactions dated on or before `as_of`.
    Balances { as_of: NaiveDate },
    /// Outstanding invoices due within the window, grouped per customer.
    DueInvoices { window: DateWindow },
    /// Flat customer listing.
    List,
    /// Outstanding balances bucketed by invoice age as of `as_of`.
    AgingSummary { as_of: NaiveDate },
}
