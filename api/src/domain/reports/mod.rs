//! Report domain types
//!
//! Pure types describing report requests and results. Each domain has a
//! sealed enum of category variants, each carrying its own validated
//! parameter shape, so an invalid request cannot reach a query executor.

pub mod customers;
pub mod inventory;
pub mod sales;

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub use customers::{CustomerReport, CustomerReportRequest};
pub use inventory::{InventoryReport, InventoryReportRequest};
pub use sales::{SalesDimension, SalesReport, SalesReportRequest};

/// One row of a report: field name -> scalar value, in select order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// The three report families served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Sales,
    Customers,
    Inventory,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sales => "sales",
            Domain::Customers => "customers",
            Domain::Inventory => "inventory",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive calendar-date window, already checked for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// The payload of a successful report.
///
/// Most categories produce a row sequence; summary-style categories
/// (inventory `summary`, customer `overview`, `turnover_rate`) produce a
/// single record, matching the legacy response shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Record(Row),
    Rows(Vec<Row>),
}

impl ReportData {
    /// Empty row sequence - the valid result of a report matching nothing.
    pub fn empty() -> Self {
        ReportData::Rows(Vec::new())
    }
}
