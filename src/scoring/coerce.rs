//! Lenient numeric coercion for action payload fields.
//!
//! Exports carry amounts and prices as decimal strings, sometimes as JSON
//! numbers, sometimes not at all. Anything that doesn't yield a finite
//! number becomes 0.0 so the wallet still gets scored.

use serde_json::Value;
use tracing::trace;

/// Parse a payload value into an `f64`, or 0.0 when it can't be.
pub fn parse_or_zero(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(_)) | Some(Value::Array(_)) | Some(Value::Object(_)) => None,
        Some(Value::Null) | None => return 0.0,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            trace!(value = ?value, "Unparseable numeric field, coercing to zero");
            0.0
        }
    }
}

/// USD value of an action: `amount * price`, with both sides coerced.
pub fn usd_value(amount: Option<&Value>, price_usd: Option<&Value>) -> f64 {
    let product = parse_or_zero(amount) * parse_or_zero(price_usd);
    // Two huge finite factors can still overflow to infinity.
    if product.is_finite() {
        product
    } else {
        0.0
    }
}
