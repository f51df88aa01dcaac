//! Parameter validator
//!
//! Pure functions turning raw report requests into validated, typed
//! category variants. Every check the executors rely on happens here:
//! category membership, required parameters, date formats and ordering,
//! numeric sign, and per-category defaults from the registry. Nothing in
//! this module touches the gateway.

use chrono::{Datelike, NaiveDate, Utc};

use crate::app::registry::{CategorySpec, Registry, WindowPolicy};
use crate::domain::reports::{
    CustomerReport, CustomerReportRequest, DateWindow, Domain, InventoryReport,
    InventoryReportRequest, SalesDimension, SalesReport, SalesReportRequest,
};
use crate::error::ValidationError;

/// Validate a sales report request.
pub fn validate_sales(
    registry: &Registry,
    req: &SalesReportRequest,
) -> Result<SalesReport, ValidationError> {
    let spec = resolve(registry, Domain::Sales, &req.category)?;
    check_required(spec, |field| match field {
        "filter_name" => has_text(&req.filter_name),
        _ => false,
    })?;

    let window = resolve_window(
        spec.window,
        ("fromdate", &req.fromdate),
        ("todate", &req.todate),
    )?;

    let dimension = |dimension| SalesReport::ByDimension { dimension, window };

    Ok(match spec.name {
        "today_hourly" => SalesReport::TodayHourly,
        "rep" => dimension(SalesDimension::Rep),
        "location" => dimension(SalesDimension::Location),
        "route" => dimension(SalesDimension::Route),
        "category" => dimension(SalesDimension::Category),
        "item" => dimension(SalesDimension::Item),
        "customer" => dimension(SalesDimension::Customer),
        "item_trend" => SalesReport::ItemTrend {
            filter_name: req
                .filter_name
                .clone()
                .ok_or(ValidationError::MissingParameter {
                    field: "filter_name",
                })?,
        },
        "inventory" => SalesReport::Inventory,
        other => return Err(unknown(Domain::Sales, other)),
    })
}

/// Validate a customer report request.
pub fn validate_customers(
    registry: &Registry,
    req: &CustomerReportRequest,
) -> Result<CustomerReport, ValidationError> {
    let spec = resolve(registry, Domain::Customers, &req.category)?;

    Ok(match spec.name {
        "overview" => CustomerReport::Overview,
        "customer_balances" => CustomerReport::Balances {
            as_of: parse_opt_date("as_of_date", &req.as_of_date)?.unwrap_or_else(today),
        },
        "due_invoices" => {
            let window = resolve_window(
                spec.window,
                ("from_date", &req.from_date),
                ("to_date", &req.to_date),
            )?
            .ok_or(ValidationError::MissingParameter { field: "from_date" })?;
            CustomerReport::DueInvoices { window }
        }
        "customer_list" => CustomerReport::List,
        "aging_summary" => CustomerReport::AgingSummary {
            as_of: parse_opt_date("as_of_date", &req.as_of_date)?.unwrap_or_else(today),
        },
        other => return Err(unknown(Domain::Customers, other)),
    })
}

/// Validate an inventory report request.
pub fn validate_inventory(
    registry: &Registry,
    req: &InventoryReportRequest,
) -> Result<InventoryReport, ValidationError> {
    let spec = resolve(registry, Domain::Inventory, &req.category)?;

    let threshold = numeric_or_default("threshold", req.threshold, spec.default_threshold)?;
    let limit = numeric_or_default("limit", req.limit, spec.default_limit)?;
    let location_id = match req.location_id {
        Some(v) => Some(non_negative("location_id", v)?),
        None => None,
    };

    let window = resolve_window(
        spec.window,
        ("from_date", &req.from_date),
        ("to_date", &req.to_date),
    )?;
    // MonthToDate categories always end up with a concrete window.
    let windowed = || window.ok_or(ValidationError::MissingParameter { field: "from_date" });

    Ok(match spec.name {
        "summary" => InventoryReport::Summary,
        "stock_levels" => InventoryReport::StockLevels { location_id },
        "low_stock" => InventoryReport::LowStock { threshold },
        "overstock" => InventoryReport::Overstock { threshold },
        "top_selling" => InventoryReport::TopSelling {
            window: windowed()?,
            limit,
        },
        "slow_moving" => InventoryReport::SlowMoving {
            window: windowed()?,
            limit,
        },
        "negative_quantities" => InventoryReport::NegativeQuantities,
        "turnover_rate" => InventoryReport::TurnoverRate { window: windowed()? },
        "incoming_stock" => InventoryReport::IncomingStock {
            window: windowed()?,
            location: req.location.clone().filter(|l| !l.trim().is_empty()),
        },
        "outgoing_stock" => InventoryReport::OutgoingStock { window: windowed()? },
        "dead_stock" => InventoryReport::DeadStock { window: windowed()? },
        other => return Err(unknown(Domain::Inventory, other)),
    })
}

fn resolve<'r>(
    registry: &'r Registry,
    domain: Domain,
    category: &str,
) -> Result<&'r CategorySpec, ValidationError> {
    registry
        .resolve(domain, category)
        .ok_or_else(|| unknown(domain, category))
}

fn unknown(domain: Domain, category: &str) -> ValidationError {
    ValidationError::UnknownCategory {
        domain,
        category: category.to_string(),
    }
}

fn check_required(
    spec: &CategorySpec,
    has: impl Fn(&str) -> bool,
) -> Result<(), ValidationError> {
    for field in spec.required {
        if !has(field) {
            return Err(ValidationError::MissingParameter { field });
        }
    }
    Ok(())
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Resolve the date window under the category's policy.
///
/// `OptionalAllTime` treats the pair as all-or-nothing: supplying only one
/// bound is a missing-parameter error rather than a silent half-open
/// window. Defaulting policies fill absent bounds before the range check,
/// so a user-supplied bound that contradicts a default still fails.
fn resolve_window(
    policy: WindowPolicy,
    (from_field, from_raw): (&'static str, &Option<String>),
    (to_field, to_raw): (&'static str, &Option<String>),
) -> Result<Option<DateWindow>, ValidationError> {
    let from = parse_opt_date(from_field, from_raw)?;
    let to = parse_opt_date(to_field, to_raw)?;

    let window = match policy {
        WindowPolicy::Unused => return Ok(None),
        WindowPolicy::OptionalAllTime => match (from, to) {
            (None, None) => return Ok(None),
            (Some(from), Some(to)) => DateWindow { from, to },
            (Some(_), None) => return Err(ValidationError::MissingParameter { field: to_field }),
            (None, Some(_)) => return Err(ValidationError::MissingParameter { field: from_field }),
        },
        WindowPolicy::MonthToDate => {
            let today = today();
            DateWindow {
                from: from.unwrap_or_else(|| today.with_day(1).unwrap_or(today)),
                to: to.unwrap_or(today),
            }
        }
        WindowPolicy::LegacyEpoch => DateWindow {
            from: from.unwrap_or_else(legacy_epoch),
            to: to.unwrap_or_else(today),
        },
    };

    if window.from > window.to {
        return Err(ValidationError::InvalidRange {
            from: window.from,
            to: window.to,
        });
    }
    Ok(Some(window))
}

fn parse_opt_date(
    field: &'static str,
    raw: &Option<String>,
) -> Result<Option<NaiveDate>, ValidationError> {
    raw.as_deref().map(|s| parse_date(field, s)).transpose()
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidValue {
        field,
        reason: format!("`{raw}` is not a YYYY-MM-DD date"),
    })
}

fn numeric_or_default(
    field: &'static str,
    value: Option<i64>,
    default: Option<i64>,
) -> Result<i64, ValidationError> {
    match value {
        Some(v) => non_negative(field, v),
        None => Ok(default.unwrap_or(0)),
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be non-negative, got {value}"),
        });
    }
    Ok(value)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn legacy_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}
