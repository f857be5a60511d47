//! The dashboard: balance, income and expense totals, plus the warning shown
//! when the balance drops below zero.

mod aggregation;

pub use aggregation::Dashboard;

use serde::Serialize;

use crate::alert::Alert;

/// The message shown when the balance is negative.
pub const NEGATIVE_BALANCE_WARNING: &str = "Warning: Your balance is negative!";

/// Format an amount for the dashboard, e.g. "$ 4.50" or "$ -4.50".
pub fn format_currency(amount: f64) -> String {
    format!("$ {amount:.2}")
}

/// The dashboard as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// The formatted balance.
    pub balance: String,
    /// The formatted income total.
    pub income: String,
    /// The formatted expense total.
    pub expense: String,
    /// Set when the balance is negative.
    pub warning: Option<Alert>,
}

impl DashboardView {
    /// Format `dashboard` and decide whether to warn about the balance.
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            balance: format_currency(dashboard.balance),
            income: format_currency(dashboard.income),
            expense: format_currency(dashboard.expense),
            warning: negative_balance_warning(dashboard),
        }
    }
}

/// The warning to show for `dashboard`, if any.
pub fn negative_balance_warning(dashboard: &Dashboard) -> Option<Alert> {
    dashboard
        .is_balance_negative()
        .then(|| Alert::error_simple(NEGATIVE_BALANCE_WARNING))
}
