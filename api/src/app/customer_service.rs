//! Customer report executor

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::app::rows::{add_num, field, num, push_item, row, text};
use crate::domain::ports::{BindValue, ReportGateway};
use crate::domain::reports::{CustomerReport, DateWindow, ReportData, Row};
use crate::error::GatewayError;

/// Query executor for the customers domain.
pub struct CustomerReportService<G: ReportGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: ReportGateway + ?Sized> CustomerReportService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Run a validated customer report.
    pub async fn run(&self, report: CustomerReport) -> Result<ReportData, GatewayError> {
        match report {
            CustomerReport::Overview => self.overview().await,
            CustomerReport::Balances { as_of } => self.balances(as_of).await,
            CustomerReport::DueInvoices { window } => self.due_invoices(window).await,
            CustomerReport::List => self.customer_list().await,
            CustomerReport::AgingSummary { as_of } => self.aging_summary(as_of).await,
        }
    }

    async fn overview(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT \
                (SELECT COUNT(*) FROM customers) AS total_customers, \
                (SELECT COUNT(*) FROM customers WHERE startdate >= NOW() - INTERVAL 30 DAY) AS new_customers_last_30_days, \
                (SELECT COUNT(*) FROM customers WHERE lastserved >= NOW() - INTERVAL 60 DAY) AS active_customers, \
                (SELECT COUNT(*) FROM customers WHERE lastserved < NOW() - INTERVAL 60 DAY) AS inactive_customers, \
                (SELECT COUNT(*) FROM customers WHERE bal > 0) AS customers_with_outstanding_balance";
        let record = self.gateway.fetch_one(sql, Vec::new()).await?;
        Ok(ReportData::Record(record.unwrap_or_default()))
    }

    /// Balances recomputed from the transaction history, not the stored
    /// running balance, so an `as_of_date` in the past excludes anything
    /// dated after it.
    async fn balances(&self, as_of: NaiveDate) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT c.code AS customer_id, c.name AS customer_name, c.creditlimit, \
                   SUM(s.sale_total_cost) AS total_billed, \
                   SUM(s.paid) AS total_paid, \
                   SUM(s.sale_total_cost - s.paid) AS current_balance, \
                   MAX(s.date) AS last_transaction_date \
            FROM customers c \
            JOIN sales s ON s.customer_id = c.id \
            WHERE (s.type = '10' OR s.type = '14') \
            AND s.date <= ? \
            GROUP BY c.id \
            ORDER BY current_balance DESC";
        let rows = self
            .gateway
            .fetch_all(sql, vec![BindValue::from(as_of)])
            .await?;
        Ok(ReportData::Rows(rows))
    }

    /// Outstanding invoices grouped per customer with running totals.
    async fn due_invoices(&self, window: DateWindow) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT c.id AS customer_id, c.name AS customer_name, \
                   s.refno AS invoice_reference, s.due_date, \
                   s.sale_total_cost AS amount_due, \
                   COALESCE(s.paid, 0) AS amount_paid, \
                   COALESCE(s.balance, 0) AS balance_due \
            FROM sales s \
            JOIN customers c ON s.customer_id = c.id \
            WHERE s.balance > 0 \
            AND s.due_date BETWEEN ? AND ? \
            ORDER BY c.name, s.due_date ASC";
        let rows = self
            .gateway
            .fetch_all(sql, vec![window.from.into(), window.to.into()])
            .await?;

        let mut customers: Vec<Row> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for r in &rows {
            let customer_id = text(r, "customer_id");
            let idx = *index.entry(customer_id).or_insert_with(|| {
                customers.push(row(json!({
                    "customer_name": field(r, "customer_name"),
                    "total_invoices": 0.0,
                    "total_due": 0.0,
                    "total_paid": 0.0,
                    "total_balance_due": 0.0,
                    "invoices": [],
                })));
                customers.len() - 1
            });
            let group = &mut customers[idx];
            add_num(group, "total_invoices", 1.0);
            add_num(group, "total_due", num(r, "amount_due"));
            add_num(group, "total_paid", num(r, "amount_paid"));
            add_num(group, "total_balance_due", num(r, "balance_due"));
            push_item(
                group,
                "invoices",
                json!({
                    "invoice_reference": field(r, "invoice_reference"),
                    "due_date": field(r, "due_date"),
                    "amount_due": field(r, "amount_due"),
                    "amount_paid": field(r, "amount_paid"),
                    "balance_due": field(r, "balance_due"),
                }),
            );
        }
        Ok(ReportData::Rows(customers))
    }

    async fn customer_list(&self) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT c.code AS customer_id, c.name AS customer_name, c.email, \
                   c.creditlimit, c.bal AS current_balance, \
                   c.startdate AS joined_date, \
                   c.lastserved AS last_transaction_date \
            FROM customers c \
            ORDER BY c.name ASC";
        let rows = self.gateway.fetch_all(sql, Vec::new()).await?;
        Ok(ReportData::Rows(rows))
    }

    /// Outstanding balances bucketed by invoice age as of a date.
    ///
    /// Age is `DATEDIFF(as_of, due_date)`; buckets are 0-30, 31-60,
    /// 61-90 and over 90 days, lower bound inclusive. Only invoices due
    /// on or before `as_of` with a positive balance are counted, so the
    /// four buckets partition every counted invoice exactly once.
    async fn aging_summary(&self, as_of: NaiveDate) -> Result<ReportData, GatewayError> {
        let sql = "\
            SELECT c.id, c.name, cur.symbol AS currency, \
                   SUM(CASE WHEN DATEDIFF(?, s.due_date) BETWEEN 0 AND 30 THEN s.balance ELSE 0 END) AS days_0_30, \
                   SUM(CASE WHEN DATEDIFF(?, s.due_date) BETWEEN 31 AND 60 THEN s.balance ELSE 0 END) AS days_31_60, \
                   SUM(CASE WHEN DATEDIFF(?, s.due_date) BETWEEN 61 AND 90 THEN s.balance ELSE 0 END) AS days_61_90, \
                   SUM(CASE WHEN DATEDIFF(?, s.due_date) > 90 THEN s.balance ELSE 0 END) AS days_over_90, \
                   SUM(s.balance) AS total \
            FROM sales s \
            JOIN customers c ON s.customer_id = c.id \
            JOIN currency cur ON c.currency_id = cur.currency_id \
            WHERE s.balance > 0 \
            AND s.due_date <= ? \
            GROUP BY c.id, cur.currency_id \
            ORDER BY c.name ASC";
        let binds = vec![
            BindValue::from(as_of),
            BindValue::from(as_of),
            BindValue::from(as_of),
            BindValue::from(as_of),
            BindValue::from(as_of),
        ];
        let rows = self.gateway.fetch_all(sql, binds).await?;
        Ok(ReportData::Rows(rows))
    }
}
