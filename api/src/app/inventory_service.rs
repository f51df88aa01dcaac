//! Inventory report executor
//!
//! Stock positions are derived by summing `stockmoves` per item; sales
//! movement comes from `sales_items`. Thresholds, limits and window
//! bounds always travel as bind parameters.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::app::rows::{add_num, field, num, push_item, row, text};
use crate::domain::ports::{BindValue, ReportGateway};
use crate::domain::reports::{DateWindow, InventoryReport, ReportData, Row};
use crate::error::GatewayError;

/// Query executor for the inventory domain.
pub struct InventoryReportService<G: ReportGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: ReportGateway + ?Sized> InventoryReportService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Run a validated inventory report.
    pub async fn run(&self, report: InventoryReport) -> Result<ReportData, GatewayError> {
        match report {
            InventoryReport::Summary => self.summary().await,
            InventoryReport::StockLevels { location_id } => self.stock_levels(location_id).await,
            InventoryReport::LowStock { threshold } => self.low_stock(threshold).await,
            InventoryReport::Overstock { threshold } => self.overstock(threshold).await,
            InventoryReport::TopSelling { window, limit } => {
                self.movement_ranking(window, limit, Ranking::Top).await
            }
            InventoryReport::SlowMoving { window, limit } => {
                self.movement_ranking(window, limit, Ranking::Slow).await
            }
            InventoryReport::NegativeQuantities => self.negative_quantities().await,
            InventoryReport::TurnoverRate { window } => self.turnover_rate(window).await,
            InventoryReport::IncomingStock { window, location } => {
                self.incoming_stock(window, location).await
            }
            InventoryReport::OutgoingStock { window } => self.outgoing_stock(window).await,
            InventoryReport::DeadStock { window } => self.dead_stock(window).await,
        }
    }

    async fn summary(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT SUM(i.total_cost * st.qty) AS total_value, \
                   SUM(st.qty) AS total_quantity \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id";
        let record = self.gateway.fetch_one(sql, Vec::new()).await?;
        Ok(ReportData::Record(record.unwrap_or_default()))
    }

    /// Per-item stock positions, rolled up by item category.
    async fn stock_levels(&self, location_id: Option<i64>) -> Result<ReportData, GatewayError> {
        let head = "\
            SELECT c.id AS category_id, c.category AS category_name, \
                   i.id AS item_id, i.description AS item_name, \
                   SUM(st.qty) AS stock_quantity, \
                   MAX(st.tyme) AS last_purchased_date, \
                   DATEDIFF(NOW(), MAX(st.tyme)) AS days_in_inventory, \
                   (SUM(st.qty) * i.total_cost) AS stock_value, \
                   l.locationname \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN items_categoryii c ON i.category_id = c.id \
            JOIN locations l ON st.loccode = l.loccode";
        let tail = " GROUP BY c.id, i.id, l.loccode ORDER BY c.id, stock_value DESC";

        let (sql, binds) = match location_id {
            Some(loc) => (
                format!("{head} WHERE st.loccode = ?{tail}"),
                vec![BindValue::from(loc)],
            ),
            None => (format!("{head}{tail}"), Vec::new()),
        };
        let rows = self.gateway.fetch_all(&sql, binds).await?;

        let mut categories: Vec<Row> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for r in &rows {
            let category_id = text(r, "category_id");
            let idx = *index.entry(category_id).or_insert_with(|| {
                categories.push(row(json!({
                    "category_id": field(r, "category_id"),
                    "category_name": field(r, "category_name"),
                    "total_stock_quantity": 0.0,
                    "total_stock_value": 0.0,
                    "items": [],
                })));
                categories.len() - 1
            });
            let group = &mut categories[idx];
            add_num(group, "total_stock_quantity", num(r, "stock_quantity"));
            add_num(group, "total_stock_value", num(r, "stock_value"));
            push_item(
                group,
                "items",
                json!({
                    "item_id": field(r, "item_id"),
                    "item_name": field(r, "item_name"),
                    "stock_quantity": field(r, "stock_quantity"),
                    "stock_value": field(r, "stock_value"),
                    "locationname": field(r, "locationname"),
                    "last_purchased_date": field(r, "last_purchased_date"),
                    "days_in_inventory": field(r, "days_in_inventory"),
                }),
            );
        }
        Ok(ReportData::Rows(categories))
    }

    async fn low_stock(&self, threshold: i64) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id, i.description, SUM(st.qty) AS stock_quantity \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            GROUP BY i.id \
            HAVING stock_quantity < ? AND stock_quantity > 0";
        let rows = self
            .gateway
            .fetch_all(sql, vec![BindValue::from(threshold)])
            .await?;
        Ok(ReportData::Rows(rows))
    }

    async fn overstock(&self, threshold: i64) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id, i.description, SUM(st.qty) AS stock_quantity \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            GROUP BY i.id \
            HAVING stock_quantity > ?";
        let rows = self
            .gateway
            .fetch_all(sql, vec![BindValue::from(threshold)])
            .await?;
        Ok(ReportData::Rows(rows))
    }

    async fn movement_ranking(
        &self,
        window: DateWindow,
        limit: i64,
        ranking: Ranking,
    ) -> Result<ReportData, GatewayError> {
        // Ties broken by item id ascending so equal totals rank stably.
        let order = match ranking {
            Ranking::Top => "ORDER BY total_sales DESC, si.item_id ASC",
            Ranking::Slow => "ORDER BY total_sales ASC, si.item_id ASC",
        };
        let sql = format!(
            "SELECT si.description, SUM(si.quantity_purchased) AS qty, \
                    SUM(si.item_total_cost) AS total_sales \
             FROM sales_items si \
             JOIN sales s ON si.sale_id = s.id \
             WHERE s.date BETWEEN ? AND ? \
             GROUP BY si.item_id \
             {order} \
             LIMIT ?"
        );
        let binds = vec![
            window.from.into(),
            window.to.into(),
            BindValue::from(limit),
        ];
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn negative_quantities(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id, i.description, SUM(st.qty) AS stock_balance, l.locationname \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN locations l ON l.loccode = st.loccode \
            GROUP BY i.id, l.loccode \
            HAVING stock_balance < 0 \
            ORDER BY stock_balance ASC";
        let rows = self.gateway.fetch_all(sql, Vec::new()).await?;
        Ok(ReportData::Rows(rows))
    }

    /// COGS over average inventory for the window; both legs zero-safe.
    async fn turnover_rate(&self, window: DateWindow) -> Result<ReportData, GatewayError> {
        let cogs_sql = "\
            SELECT SUM(si.item_buy_price * si.quantity_purchased) AS cogs \
            FROM sales_items si \
            JOIN sales s ON si.sale_id = s.id \
            WHERE s.date BETWEEN ? AND ? \
            AND si.item_buy_price > 0 \
            AND si.quantity_purchased > 0";
        let cogs = self
            .gateway
            .fetch_one(cogs_sql, vec![window.from.into(), window.to.into()])
            .await?
            .map(|r| num(&r, "cogs"))
            .unwrap_or(0.0);

        let inventory_sql = "\
            SELECT AVG(total_stock) AS average_inventory \
            FROM ( \
                SELECT SUM(st.qty * i.total_cost) AS total_stock \
                FROM stockmoves st \
                JOIN items i ON st.stockid = i.id \
                WHERE st.trandate BETWEEN ? AND ? \
                AND st.qty > 0 \
                AND i.total_cost > 0 \
            ) AS inventory";
        let average_inventory = self
            .gateway
            .fetch_one(inventory_sql, vec![window.from.into(), window.to.into()])
            .await?
            .map(|r| num(&r, "average_inventory"))
            .unwrap_or(0.0);

        let rate = if average_inventory > 0.0 {
            cogs / average_inventory
        } else {
            0.0
        };

        Ok(ReportData::Record(row(json!({
            "stock_turnover_rate": round2(rate),
            "cogs": round2(cogs),
            "average_inventory": round2(average_inventory),
        }))))
    }

    async fn incoming_stock(
        &self,
        window: DateWindow,
        location: Option<String>,
    ) -> Result<ReportData, GatewayError> {
        let head = "\
            SELECT st.stkmoveno, i.description AS item_name, \
                   st.qty AS quantity_received, i.total_cost AS unit_cost, \
                   (st.qty * i.total_cost) AS stock_value, \
                   st.tyme AS received_date, \
                   l.locationname AS warehouse_location \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN locations l ON st.loccode = l.loccode \
            WHERE st.qty > 0 \
            AND DATE(st.tyme) BETWEEN ? AND ?";
        let mut binds: Vec<BindValue> = vec![window.from.into(), window.to.into()];

        let sql = match location {
            Some(name) => {
                binds.push(name.into());
                format!("{head} AND l.locationname = ? ORDER BY st.tyme DESC")
            }
            None => format!("{head} ORDER BY st.tyme DESC"),
        };
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn outgoing_stock(&self, window: DateWindow) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id AS item_id, i.description AS item_name, \
                   SUM(ABS(st.qty)) AS total_quantity_moved, \
                   MAX(st.tyme) AS last_transaction_date, \
                   l.locationname AS warehouse_location, \
                   SUM(ABS(st.qty) * i.total_cost) AS total_stock_value \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN locations l ON st.loccode = l.loccode \
            WHERE st.qty < 0 \
            AND DATE(st.tyme) BETWEEN ? AND ? \
            GROUP BY i.id, l.locationname \
            ORDER BY total_stock_value DESC";
        let rows = self
            .gateway
            .fetch_all(sql, vec![window.from.into(), window.to.into()])
            .await?;
        Ok(ReportData::Rows(rows))
    }

    /// Stocked items with no sales at all inside the window.
    async fn dead_stock(&self, window: DateWindow) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id AS item_id, i.description AS item_name, \
                   c.category AS category_name, \
                   SUM(st.qty) AS stock_quantity, \
                   (SUM(st.qty) * i.total_cost) AS stock_value, \
                   MAX(st.tyme) AS last_purchased_date, \
                   DATEDIFF(NOW(), MAX(st.tyme)) AS days_in_inventory, \
                   l.locationname AS warehouse_location \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN locations l ON st.loccode = l.loccode \
            JOIN items_categoryii c ON i.category_id = c.id \
            LEFT JOIN ( \
                SELECT si.item_id \
                FROM sales_items si \
                JOIN sales s ON si.sale_id = s.id \
                WHERE s.date BETWEEN ? AND ? \
                GROUP BY si.item_id \
            ) sales_data ON i.id = sales_data.item_id \
            WHERE sales_data.item_id IS NULL \
            AND st.qty > 0 \
            GROUP BY i.id, l.locationname, c.category \
            ORDER BY stock_value DESC";
        let rows = self
            .gateway
            .fetch_all(sql, vec![window.from.into(), window.to.into()])
            .await?;
        Ok(ReportData::Rows(rows))
    }
}

#[derive(Clone, Copy)]
enum Ranking {
    Top,
    Slow,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sale_row, InMemoryGateway};
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        DateWindow {
            from: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        }
    }

    #[tokio::test]
    async fn low_stock_binds_the_threshold() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        service
            .run(InventoryReport::LowStock { threshold: 5 })
            .await
            .unwrap();

        let (sql, binds) = gateway.calls().remove(0);
        assert!(sql.contains("stock_quantity < ?"));
        assert!(sql.contains("stock_quantity > 0"));
        assert_eq!(binds, vec![BindValue::Int(5)]);
    }

    #[tokio::test]
    async fn top_selling_limits_and_breaks_ties_by_item_id() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        let w = window();
        service
            .run(InventoryReport::TopSelling { window: w, limit: 3 })
            .await
            .unwrap();

        let (sql, binds) = gateway.calls().remove(0);
        assert!(sql.contains("ORDER BY total_sales DESC, si.item_id ASC"));
        assert!(sql.ends_with("LIMIT ?"));
        assert_eq!(
            binds,
            vec![
                BindValue::Date(w.from),
                BindValue::Date(w.to),
                BindValue::Int(3)
            ]
        );
    }

    #[tokio::test]
    async fn zero_limit_is_an_empty_report_not_an_error() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        let data = service
            .run(InventoryReport::TopSelling {
                window: window(),
                limit: 0,
            })
            .await
            .unwrap();

        assert_eq!(data, ReportData::empty());
        assert_eq!(gateway.calls()[0].1.last(), Some(&BindValue::Int(0)));
    }

    #[tokio::test]
    async fn slow_moving_orders_ascending() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        service
            .run(InventoryReport::SlowMoving {
                window: window(),
                limit: 5,
            })
            .await
            .unwrap();

        assert!(gateway.calls()[0]
            .0
            .contains("ORDER BY total_sales ASC, si.item_id ASC"));
    }

    #[tokio::test]
    async fn stock_levels_filter_by_location_only_when_given() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        service
            .run(InventoryReport::StockLevels { location_id: None })
            .await
            .unwrap();
        service
            .run(InventoryReport::StockLevels {
                location_id: Some(2),
            })
            .await
            .unwrap();

        let calls = gateway.calls();
        assert!(!calls[0].0.contains("WHERE st.loccode"));
        assert!(calls[0].1.is_empty());
        assert!(calls[1].0.contains("WHERE st.loccode = ?"));
        assert_eq!(calls[1].1, vec![BindValue::Int(2)]);
    }

    #[tokio::test]
    async fn stock_levels_roll_up_per_category() {
        let rows = vec![
            sale_row(serde_json::json!({
                "category_id": 1, "category_name": "Drinks",
                "item_id": 10, "item_name": "Cola", "stock_quantity": 4.0,
                "stock_value": 40.0, "locationname": "Main",
                "last_purchased_date": "2024-06-01", "days_in_inventory": 12,
            })),
            sale_row(serde_json::json!({
                "category_id": 1, "category_name": "Drinks",
                "item_id": 11, "item_name": "Juice", "stock_quantity": 6.0,
                "stock_value": 90.0, "locationname": "Main",
                "last_purchased_date": "2024-06-05", "days_in_inventory": 8,
            })),
        ];
        let gateway = Arc::new(InMemoryGateway::new().with_rows(rows));
        let service = InventoryReportService::new(gateway);

        let data = service
            .run(InventoryReport::StockLevels { location_id: None })
            .await
            .unwrap();

        let categories = match data {
            ReportData::Rows(rows) => rows,
            other => panic!("expected rows, got {other:?}"),
        };
        assert_eq!(categories.len(), 1);
        assert_eq!(num(&categories[0], "total_stock_quantity"), 10.0);
        assert_eq!(num(&categories[0], "total_stock_value"), 130.0);
        assert_eq!(categories[0]["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn turnover_rate_divides_cogs_by_average_inventory() {
        let gateway = Arc::new(
            InMemoryGateway::new()
                .with_rows(vec![sale_row(serde_json::json!({"cogs": 600.0}))])
                .with_rows(vec![sale_row(
                    serde_json::json!({"average_inventory": 240.0}),
                )]),
        );
        let service = InventoryReportService::new(gateway.clone());

        let data = service
            .run(InventoryReport::TurnoverRate { window: window() })
            .await
            .unwrap();

        let record = match data {
            ReportData::Record(r) => r,
            other => panic!("expected record, got {other:?}"),
        };
        assert_eq!(num(&record, "stock_turnover_rate"), 2.5);
        assert_eq!(num(&record, "cogs"), 600.0);
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn turnover_rate_is_zero_safe() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway);

        let data = service
            .run(InventoryReport::TurnoverRate { window: window() })
            .await
            .unwrap();

        let record = match data {
            ReportData::Record(r) => r,
            other => panic!("expected record, got {other:?}"),
        };
        assert_eq!(num(&record, "stock_turnover_rate"), 0.0);
    }

    #[tokio::test]
    async fn incoming_stock_appends_location_filter() {
        let gateway = Arc::new(InMemoryGateway::new());
        let service = InventoryReportService::new(gateway.clone());

        let w = window();
        service
            .run(InventoryReport::IncomingStock {
                window: w,
                location: Some("Main".to_string()),
            })
            .await
            .unwrap();

        let (sql, binds) = gateway.calls().remove(0);
        assert!(sql.contains("l.locationname = ?"));
        assert_eq!(
            binds,
            vec![
                BindValue::Date(w.from),
                BindValue::Date(w.to),
                BindValue::from("Main")
            ]
        );
    }
}
