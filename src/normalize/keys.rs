//! Candidate key tables.
//!
//! The provider does not commit to field names, so each logical field has an
//! ordered list of accepted names. Lookups walk the list and stop at the first
//! acceptable value.

use serde_json::Value;

/// Ordered candidate names per logical field.
#[derive(Debug, Clone, Copy)]
pub struct PayloadKeys {
    /// Top-level array holding the daily records.
    pub series: &'static [&'static str],
    /// Per-record date.
    pub date: &'static [&'static str],
    /// Per-record amount.
    pub amount: &'static [&'static str],
    /// Top-level order count.
    pub total_orders: &'static [&'static str],
    /// Top-level sales total.
    pub total_sales: &'static [&'static str],
}

/// Field names seen from the sales provider.
pub const DEFAULT_KEYS: PayloadKeys = PayloadKeys {
    series: &["daily", "ventes", "salesHistory", "historiqueVentes", "ventesArray"],
    date: &["date", "Date", "label", "day"],
    amount: &["sales", "montant", "salesAmount", "value", "total", "amount"],
    total_orders: &["totalOrders", "totalCommandes", "total_commandes"],
    total_sales: &["totalSales", "totalMontant", "total_sales", "totalAmount"],
};

impl Default for PayloadKeys {
    fn default() -> Self {
        DEFAULT_KEYS
    }
}

/// First candidate holding an array (an empty array still counts).
pub fn find_array<'a>(obj: &'a Value, candidates: &[&str]) -> Option<&'a Vec<Value>> {
    candidates
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
}

/// First candidate that is present and not `null`.
pub fn find_present<'a>(obj: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
}

/// First candidate with a "truthy" value: non-empty string, non-zero number,
/// `true`, or any array/object.
pub fn find_truthy<'a>(obj: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| is_truthy(v)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
