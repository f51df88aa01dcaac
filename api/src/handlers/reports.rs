//! Report endpoints
//!
//! One handler per report domain. Each handler validates the request
//! against the category registry, runs the matching executor and wraps
//! the result in the response envelope. Validation failures never reach
//! the gateway.

use axum::{extract::State, Json};

use crate::app::{
    validate_customers, validate_inventory, validate_sales, Registry, ResponseEnvelope,
};
use crate::domain::reports::{CustomerReportRequest, InventoryReportRequest, SalesReportRequest};
use crate::error::AppError;
use crate::AppState;

/// POST /reports/sales
pub async fn sales_report(
    State(state): State<AppState>,
    Json(request): Json<SalesReportRequest>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let report = validate_sales(Registry::global(), &request)?;
    let data = state.sales.run(report).await?;

    tracing::debug!(category = %request.category, "sales report served");
    Ok(Json(ResponseEnvelope::success(
        data,
        "Sales report generated successfully.",
    )))
}

/// POST /reports/customers
pub async fn customers_report(
    State(state): State<AppState>,
    Json(request): Json<CustomerReportRequest>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let report = validate_customers(Registry::global(), &request)?;
    let data = state.customers.run(report).await?;

    tracing::debug!(category = %request.category, "customer report served");
    Ok(Json(ResponseEnvelope::success(
        data,
        "Customer report generated successfully.",
    )))
}

/// POST /reports/inventory
pub async fn inventory_report(
    State(state): State<AppState>,
    Json(request): Json<InventoryReportRequest>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let report = validate_inventory(Registry::global(), &request)?;
    let data = state.inventory.run(report).await?;

    tracing::debug!(category = %request.category, "inventory report served");
    Ok(Json(ResponseEnvelope::success(
        data,
        "Inventory report generated successfully.",
    )))
}
