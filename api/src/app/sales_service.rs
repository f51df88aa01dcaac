//! Sales report executor
//!
//! One parameterized query per category, delegated to the gateway.
//! The legacy sale-type filter `(s.type = '10' OR s.type = '14')`
//! restricts every aggregate to completed sale documents.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::app::rows::{add_num, field, money, num, push_item, row, text};
use crate::domain::ports::{BindValue, ReportGateway};
use crate::domain::reports::{DateWindow, ReportData, Row, SalesDimension, SalesReport};
use crate::error::GatewayError;

/// Query executor for the sales domain.
pub struct SalesReportService<G: ReportGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: ReportGateway + ?Sized> SalesReportService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Run a validated sales report.
    pub async fn run(&self, report: SalesReport) -> Result<ReportData, GatewayError> {
        match report {
            SalesReport::TodayHourly => self.today_hourly().await,
            SalesReport::ByDimension { dimension, window } => match dimension {
                SalesDimension::Rep => self.by_rep(window).await,
                SalesDimension::Location => self.by_location(window).await,
                SalesDimension::Route => self.by_route(window).await,
                SalesDimension::Category => self.by_category(window).await,
                SalesDimension::Item => self.by_item(window).await,
                SalesDimension::Customer => self.by_customer(window).await,
            },
            SalesReport::ItemTrend { filter_name } => self.item_trend(&filter_name).await,
            SalesReport::Inventory => self.inventory_positions().await,
        }
    }

    async fn today_hourly(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT HOUR(s.tyme) AS hour, \
                   SUM(s.sale_total_cost) AS total_sales, \
                   COUNT(*) AS transaction_count \
            FROM sales s \
            WHERE s.date = CURDATE() \
            AND (s.type = '10' OR s.type = '14') \
            GROUP BY HOUR(s.tyme) \
            ORDER BY hour ASC";
        let rows = self.gateway.fetch_all(sql, Vec::new()).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn by_rep(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT s.date, u.username, SUM(s.sale_total_cost) AS total_sales, \
                    c.symbol AS currency_name \
             FROM sales s \
             JOIN users u ON s.rep = u.id \
             JOIN currency c ON s.currency_id = c.currency_id \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY s.date, u.username, c.currency_id \
             ORDER BY s.date ASC, total_sales DESC",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn by_location(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT s.date, SUM(s.sale_total_cost) AS total_sales, \
                    l.locationname, c.symbol AS currency_name \
             FROM sales s \
             JOIN locations l ON s.loccode = l.loccode \
             JOIN currency c ON s.currency_id = c.currency_id \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY s.loccode, c.currency_id, s.date",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    /// Sales by route, rolled up per region with a per-customer breakdown.
    async fn by_route(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT cr.region, l.locationname, c.symbol AS currency_name, \
                    cu.name AS customer_name, \
                    SUM(s.sale_total_cost) AS customer_sales, \
                    SUM(s.paid) AS customer_amount_paid, \
                    (SUM(s.sale_total_cost) - SUM(s.paid)) AS customer_balance \
             FROM sales s \
             JOIN customer_regions cr ON s.region_id = cr.region_id \
             JOIN locations l ON s.loccode = l.loccode \
             JOIN currency c ON s.currency_id = c.currency_id \
             JOIN customers cu ON s.customer_id = cu.id \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY cr.region, l.locationname, c.symbol, cu.name \
             ORDER BY customer_sales DESC",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;

        let mut regions: Vec<Row> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for r in &rows {
            let region = text(r, "region");
            let idx = *index.entry(region.clone()).or_insert_with(|| {
                regions.push(row(json!({
                    "region": region,
                    "total_sales": 0.0,
                    "total_amount_paid": 0.0,
                    "total_balance": 0.0,
                    "locationname": field(r, "locationname"),
                    "currency_name": field(r, "currency_name"),
                    "customers": [],
                })));
                regions.len() - 1
            });
            let group = &mut regions[idx];
            add_num(group, "total_sales", num(r, "customer_sales"));
            add_num(group, "total_amount_paid", num(r, "customer_amount_paid"));
            add_num(group, "total_balance", num(r, "customer_balance"));
            push_item(
                group,
                "customers",
                json!({
                    "customer_name": field(r, "customer_name"),
                    "customer_sales": money(num(r, "customer_sales")),
                    "amount_paid": money(num(r, "customer_amount_paid")),
                    "balance": money(num(r, "customer_balance")),
                }),
            );
        }
        Ok(ReportData::Rows(regions))
    }

    async fn by_category(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT c.category, si.description, \
                    SUM(si.quantity_purchased) AS qty, \
                    SUM(si.item_total_cost) AS total_sales, \
                    SUM(si.item_buy_price * si.quantity_purchased) AS cost, \
                    SUM(si.item_total_cost - si.item_buy_price * si.quantity_purchased) AS margin, \
                    cur.symbol AS currency_name \
             FROM sales s \
             JOIN sales_items si ON s.id = si.sale_id \
             JOIN items i ON si.item_id = i.id \
             JOIN items_categoryii c ON i.category_id = c.id \
             JOIN currency cur ON s.currency_id = cur.currency_id \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY c.id, cur.currency_id \
             ORDER BY total_sales DESC",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn by_item(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT si.description, SUM(si.quantity_purchased) AS qty, \
                    SUM(si.item_total_cost) AS total_sales, \
                    SUM(si.item_buy_price * si.quantity_purchased) AS cost, \
                    (SUM(si.item_total_cost) - SUM(si.item_buy_price * si.quantity_purchased)) AS margin, \
                    c.symbol AS currency_name, si.unit, l.locationname AS location \
             FROM sales s \
             JOIN sales_items si ON s.id = si.sale_id \
             JOIN currency c ON s.currency_id = c.currency_id \
             JOIN locations l ON s.loccode = l.loccode \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY si.item_id, c.currency_id, l.loccode \
             ORDER BY total_sales DESC",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn by_customer(&self, window: Option<DateWindow>) -> Result<ReportData, GatewayError> {
        let (sql, binds) = windowed(
            "SELECT c.name, SUM(s.sale_total_cost) AS total_sales, \
                    SUM(s.paid) AS amount_paid, SUM(s.balance) AS balance, \
                    cur.symbol AS currency_name \
             FROM sales s \
             JOIN customers c ON s.customer_id = c.id \
             JOIN currency cur ON s.currency_id = cur.currency_id \
             WHERE (s.type = '10' OR s.type = '14')",
            "GROUP BY s.customer_id, cur.currency_id \
             ORDER BY c.name",
            window,
        );
        let rows = self.gateway.fetch_all(&sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }

    async fn item_trend(&self, filter_name: &str) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT si.description, s.date, \
                   SUM(si.quantity_purchased) AS qty, \
                   SUM(si.item_total_cost) AS total_sales, \
                   SUM(si.item_buy_price * si.quantity_purchased) AS cost, \
                   (SUM(si.item_total_cost) - SUM(si.item_buy_price * si.quantity_purchased)) AS margin, \
                   c.symbol AS currency_name, si.unit \
            FROM sales s \
            JOIN sales_items si ON s.id = si.sale_id \
            JOIN currency c ON s.currency_id = c.currency_id \
            WHERE (s.type = '10' OR s.type = '14') \
            AND si.description = ? \
            GROUP BY si.item_id, c.currency_id, s.date \
            ORDER BY s.date ASC";
        let rows = self
            .gateway
            .fetch_all(sql, vec![BindValue::from(filter_name)])
            .await?;
        Ok(ReportData::Rows(rows))
    }

    async fn inventory_positions(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT i.id, i.itemname, l.loccode, l.locationname, st.stockid, \
                   SUM(st.qty) AS total_qty, u.unitname \
            FROM stockmoves st \
            JOIN items i ON st.stockid = i.id \
            JOIN items_units u ON st.unit_id = u.id \
            JOIN locations l ON l.loccode = st.loccode \
            GROUP BY i.id, l.loccode, st.stockid, u.unitname";
        let rows = self.gateway.fetch_all(sql, Vec::new()).await?;
        Ok(ReportData::Rows(rows))
    }
}

/// Splice the optional date window between the filter and the tail.
fn windowed(head: &str, tail: &str, window: Option<DateWindow>) -> (String, Vec<BindValue>) {
    match window {
        Some(w) => (
            format!("{head} AND s.date BETWEEN ? AND ? {tail}"),
            vec![w.from.into(), w.to.into()],
        ),
        None => (format!("{head} {tail}"), Vec::new()),
    }
}
