//! State name normalizer (verb module)
//!
//! Maps free-text state names onto the key space of the India boundary
//! dataset. A fixed formatting rule followed by a fixed alias lookup; no
//! fuzzy matching.

mod states;

pub use states::{is_boundary_key, INDIA_STATES};

use crate::table::Value;
use states::STATE_ALIASES;

/// Tokens kept verbatim by the title-casing rule
const CONNECTORS: [&str; 2] = ["&", "and"];

/// Normalize a state name to its boundary dataset key
///
/// Trims, collapses whitespace, title-cases every token except the connectors
/// `&` and `and`, then applies the alias table. Names that are not in the
/// boundary dataset come back title-cased and will render as blank regions.
pub fn normalize_state(raw: &str) -> String {
    let formatted = raw
        .split_whitespace()
        .map(|token| {
            if CONNECTORS.contains(&token.to_lowercase().as_str()) {
                token.to_string()
            } else {
                capitalize(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    match STATE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(&formatted))
    {
        Some((_, canonical)) => canonical.to_string(),
        None => formatted,
    }
}

/// Normalize a table cell; anything but text passes through unchanged
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Text(s) => Value::Text(normalize_state(s)),
        other => other.clone(),
    }
}

/// First character upper-cased, the rest lower-cased
///
/// A first character without a single-character upper-case form (e.g. 'ß')
/// is left as is so the rule stays idempotent.
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => first,
    };

    let mut out = String::with_capacity(token.len());
    out.push(head);
    out.push_str(&chars.as_str().to_lowercase());
    out
}
