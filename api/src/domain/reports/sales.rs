//! Sales report categories and request shape

use serde::Deserialize;

use super::DateWindow;

/// Raw `POST /reports/sales` body.
///
/// Date fields arrive as `YYYY-MM-DD` strings and are parsed by the
/// validator, so a malformed date surfaces as a field-level problem
/// instead of a body rejection. The legacy endpoint spelled the window
/// fields without underscores; that spelling is kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesReportRequest {
    pub category: String,
    pub fromdate: Option<String>,
    pub todate: Option<String>,
    pub filter_name: Option<String>,
}

/// Grouping dimension for windowed sales reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesDimension {
    Rep,
    Location,
    Route,
    Category,
    Item,
    Customer,
}

/// A validated sales report request.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesReport {
    /// Current date grouped by hour of day.
    TodayHourly,
    /// Sales grouped by one dimension; no window means all time.
    ByDimension {
        dimension: SalesDimension,
        window: Option<DateWindow>,
    },
    /// Daily time series for a single item, matched by description.
    ItemTrend { filter_name: String },
    /// Sales joined against current stock positions.
    Inventory,
}
