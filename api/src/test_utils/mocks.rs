//! Mock implementations of port traits
//!
//! In-memory gateway that records every statement it is handed and plays
//! back canned result sets, so service tests can assert on the exact SQL
//! and bind parameters without a database.
//!
//! Why a manual mock instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` parameters
//! - Manual mocks are more explicit and easier to debug
//! - We control exactly what they return without macro magic

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{BindValue, ReportGateway};
use crate::domain::reports::Row;
use crate::error::GatewayError;

/// Recording gateway with a FIFO queue of canned result sets.
///
/// Each fetch consumes the next queued result set; an empty queue yields
/// an empty result, which is the common case for SQL-shape assertions.
#[derive(Default)]
pub struct InMemoryGateway {
    responses: Arc<Mutex<VecDeque<Vec<Row>>>>,
    calls: Arc<Mutex<Vec<(String, Vec<BindValue>)>>>,
    error: Arc<Mutex<Option<GatewayError>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result set for the next fetch.
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    /// Make the next fetch fail instead of returning rows.
    pub fn with_error(self, error: GatewayError) -> Self {
        *self.error.lock().unwrap() = Some(error);
        self
    }

    /// Every (sql, binds) pair seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, Vec<BindValue>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, sql: &str, binds: &[BindValue]) -> Result<Vec<Row>, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), binds.to_vec()));
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ReportGateway for InMemoryGateway {
    async fn fetch_all(&self, sql: &str, binds: Vec<BindValue>) -> Result<Vec<Row>, GatewayError> {
        self.record(sql, &binds)
    }

    async fn fetch_one(
        &self,
        sql: &str,
        binds: Vec<BindValue>,
    ) -> Result<Option<Row>, GatewayError> {
        Ok(self.record(sql, &binds)?.into_iter().next())
    }
}
