//! Category registry
//!
//! A static mapping from (domain, category) to the descriptor the
//! validator needs: required parameters, date-window policy, numeric
//! defaults. Built once at process start; registering the same category
//! name twice within a domain is a fatal startup error. New categories
//! ship as a new deployment, never as a runtime mutation.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::reports::Domain;
use crate::error::RegistryError;

/// How a category treats the `[from_date, to_date]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// The category takes no window parameters.
    Unused,
    /// Optional as a pair; absent means all time.
    OptionalAllTime,
    /// Defaults to first-of-current-month .. today.
    MonthToDate,
    /// Defaults to 2000-01-01 .. today (legacy due-invoice behavior).
    LegacyEpoch,
}

/// Immutable descriptor for one report category.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub window: WindowPolicy,
    pub default_limit: Option<i64>,
    pub default_threshold: Option<i64>,
}

impl CategorySpec {
    const fn new(name: &'static str, window: WindowPolicy) -> Self {
        Self {
            name,
            required: &[],
            window,
            default_limit: None,
            default_threshold: None,
        }
    }

    const fn requires(mut self, fields: &'static [&'static str]) -> Self {
        self.required = fields;
        self
    }

    const fn limit(mut self, n: i64) -> Self {
        self.default_limit = Some(n);
        self
    }

    const fn threshold(mut self, n: i64) -> Self {
        self.default_threshold = Some(n);
        self
    }
}

use WindowPolicy::{LegacyEpoch, MonthToDate, OptionalAllTime, Unused};

const SALES: &[CategorySpec] = &[
    CategorySpec::new("today_hourly", Unused),
    CategorySpec::new("rep", OptionalAllTime),
    CategorySpec::new("location", OptionalAllTime),
    CategorySpec::new("route", OptionalAllTime),
    CategorySpec::new("category", OptionalAllTime),
    CategorySpec::new("item", OptionalAllTime),
    CategorySpec::new("customer", OptionalAllTime),
    CategorySpec::new("item_trend", Unused).requires(&["filter_name"]),
    CategorySpec::new("inventory", Unused),
];

const CUSTOMERS: &[CategorySpec] = &[
    CategorySpec::new("overview", Unused),
    CategorySpec::new("customer_balances", Unused),
    CategorySpec::new("due_invoices", LegacyEpoch),
    CategorySpec::new("customer_list", Unused),
    CategorySpec::new("aging_summary", Unused),
];

const INVENTORY: &[CategorySpec] = &[
    CategorySpec::new("summary", Unused),
    CategorySpec::new("stock_levels", Unused),
    CategorySpec::new("low_stock", Unused).threshold(10),
    CategorySpec::new("overstock", Unused).threshold(100),
    CategorySpec::new("top_selling", MonthToDate).limit(5),
    CategorySpec::new("slow_moving", MonthToDate).limit(5),
    CategorySpec::new("negative_quantities", Unused),
    CategorySpec::new("turnover_rate", MonthToDate),
    CategorySpec::new("incoming_stock", MonthToDate),
    CategorySpec::new("outgoing_stock", MonthToDate),
    CategorySpec::new("dead_stock", MonthToDate),
];

/// Process-wide category table. Lookups are O(1) by (domain, name).
///
/// Keyed by owned strings so lookups borrow the category straight out of
/// the request body.
#[derive(Debug)]
pub struct Registry {
    table: HashMap<(Domain, String), CategorySpec>,
}

static GLOBAL: Lazy<Registry> = Lazy::new(|| {
    // Forced from main before the server accepts requests, so a duplicate
    // registration aborts startup rather than a request.
    Registry::build().expect("category registration failed")
});

impl Registry {
    /// Build the full production table.
    pub fn build() -> Result<Self, RegistryError> {
        Self::from_specs(
            [
                (Domain::Sales, SALES),
                (Domain::Customers, CUSTOMERS),
                (Domain::Inventory, INVENTORY),
            ]
            .into_iter()
            .flat_map(|(domain, specs)| specs.iter().map(move |s| (domain, *s))),
        )
    }

    /// Build a table from explicit specs, rejecting duplicates.
    pub fn from_specs(
        specs: impl IntoIterator<Item = (Domain, CategorySpec)>,
    ) -> Result<Self, RegistryError> {
        let mut table = HashMap::new();
        for (domain, spec) in specs {
            if table.insert((domain, spec.name.to_string()), spec).is_some() {
                return Err(RegistryError::Duplicate {
                    domain,
                    category: spec.name,
                });
            }
        }
        Ok(Self { table })
    }

    /// The shared, process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn resolve(&self, domain: Domain, category: &str) -> Option<&CategorySpec> {
        self.table.get(&(domain, category.to_string()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
