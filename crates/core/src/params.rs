//! Lenient extraction of typed overrides from a `serde_json::Value`.
//!
//! Missing keys and wrong types fall back to the supplied default; these
//! helpers never fail, so a partial `--params` object only overrides what it
//! names.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Extracts an `f64` from `params[name]`, accepting integers too.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-negative integer from `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Returns the nested object at `params[name]`, or `null` when absent.
///
/// Lookups on the result fall through to their defaults when it is `null`.
pub fn param_section<'a>(params: &'a Value, name: &str) -> &'a Value {
    params.get(name).unwrap_or(&NULL)
}
