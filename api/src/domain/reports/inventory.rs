//! Inventory report categories and request shape

use serde::Deserialize;

use super::DateWindow;

/// Raw `POST /reports/inventory` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryReportRequest {
    pub category: String,
    pub location_id: Option<i64>,
    pub threshold: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub limit: Option<i64>,
    pub location: Option<String>,
}

/// A validated inventory report request.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryReport {
    /// Total stock value and quantity, single record.
    Summary,
    /// Per-item stock positions rolled up by item category.
    StockLevels { location_id: Option<i64> },
    /// Items with positive stock strictly below the threshold.
    LowStock { threshold: i64 },
    /// Items with stock above the high-water mark.
    Overstock { threshold: i64 },
    /// Items ranked by sales over the window, best first.
    TopSelling { window: DateWindow, limit: i64 },
    /// Items ranked by sales over the window, worst first.
    SlowMoving { window: DateWindow, limit: i64 },
    /// Items whose stock balance has gone negative.
    NegativeQuantities,
    /// COGS over average inventory for the window, single record.
    TurnoverRate { window: DateWindow },
    /// Positive stock movements in the window, optionally per location.
    IncomingStock {
        window: DateWindow,
        location: Option<String>,
    },
    /// Negative stock movements in the window, grouped per item.
    OutgoingStock { window: DateWindow },
    /// Stocked items with no sales at all within the window.
    DeadStock { window: DateWindow },
}
