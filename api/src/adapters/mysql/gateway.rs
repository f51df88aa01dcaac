//! MySQL implementation of ReportGateway

use async_trait::async_trait;
use sea_orm::{
    ConnAcquireErr, DatabaseConnection, DbBackend, DbErr, FromQueryResult, JsonValue, Statement,
};

use crate::domain::ports::{BindValue, ReportGateway};
use crate::domain::reports::Row;
use crate::error::GatewayError;

/// Report gateway over a SeaORM MySQL connection pool.
///
/// Statements run as raw prepared SQL; rows come back as JSON objects so
/// the executors stay independent of any entity schema.
pub struct MySqlGateway {
    db: DatabaseConnection,
}

impl MySqlGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn statement(sql: &str, binds: Vec<BindValue>) -> Statement {
        Statement::from_sql_and_values(DbBackend::MySql, sql, binds.into_iter().map(to_sea_value))
    }
}

#[async_trait]
impl ReportGateway for MySqlGateway {
    async fn fetch_all(&self, sql: &str, binds: Vec<BindValue>) -> Result<Vec<Row>, GatewayError> {
        let values = JsonValue::find_by_statement(Self::statement(sql, binds))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        values.into_iter().map(into_row).collect()
    }

    async fn fetch_one(
        &self,
        sql: &str,
        binds: Vec<BindValue>,
    ) -> Result<Option<Row>, GatewayError> {
        let value = JsonValue::find_by_statement(Self::statement(sql, binds))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        value.map(into_row).transpose()
    }
}

fn to_sea_value(bind: BindValue) -> sea_orm::Value {
    match bind {
        BindValue::Int(v) => v.into(),
        BindValue::Float(v) => v.into(),
        BindValue::Text(v) => v.into(),
        BindValue::Date(v) => v.into(),
    }
}

fn into_row(value: JsonValue) -> Result<Row, GatewayError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(GatewayError::QueryFailed(format!(
            "expected an object row, got {other}"
        ))),
    }
}

fn map_db_err(e: DbErr) -> GatewayError {
    match &e {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => GatewayError::Timeout,
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            GatewayError::ConnectionFailed(e.to_string())
        }
        _ => GatewayError::QueryFailed(e.to_string()),
    }
}
