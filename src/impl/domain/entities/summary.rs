use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub income_total: f64,
    /// Absolute value; never negative.
    pub expense_total: f64,
    pub net_balance: f64,
}

/// Summed absolute expense amount per category label.
pub type CategoryBreakdown = HashMap<String, f64>;
