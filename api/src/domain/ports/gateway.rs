//! Data access gateway port trait
//!
//! The dispatcher's only suspension point: a single parameterized query
//! per request, executed by whatever adapter owns the connection pool.
//! User-supplied scalars always travel as bind values, never as query text.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::reports::Row;
use crate::error::GatewayError;

/// A scalar bound into a query placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Int(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl From<NaiveDate> for BindValue {
    fn from(v: NaiveDate) -> Self {
        BindValue::Date(v)
    }
}

/// Port trait for read-only report query execution.
///
/// Connection acquisition, pooling, retries and timeouts all live behind
/// this trait; the dispatcher treats a call as one awaited operation.
#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// Execute a query and return every row.
    async fn fetch_all(&self, sql: &str, binds: Vec<BindValue>) -> Result<Vec<Row>, GatewayError>;

    /// Execute a query expected to produce at most one row.
    async fn fetch_one(&self, sql: &str, binds: Vec<BindValue>)
        -> Result<Option<Row>, GatewayError>;
}
