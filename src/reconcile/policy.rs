//! The single-value reduction shared by every "pick one" field

use super::ReconcileError;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// What to do when no descriptor declares a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// The run cannot continue without a value
    Fail,
    /// Use this value instead
    Fallback(String),
}

/// How to choose among several distinct declared values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPolicy {
    /// Greatest value in string order.
    ///
    /// This is a plain byte comparison: `"9"` beats `"10"`.
    LexicographicMax,
}

/// Reduces the declared values of `field` to exactly one.
///
/// Candidates are trimmed, empty strings are ignored and duplicates collapse before
/// any policy applies. Every zero- and multi-value outcome is logged.
pub fn reconcile<I, S>(
    field: &'static str,
    candidates: I,
    zero: ZeroPolicy,
    multi: MultiPolicy,
) -> Result<String, ReconcileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut distinct: BTreeSet<String> = candidates
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    let all = distinct.iter().cloned().collect::<Vec<_>>().join(", ");

    let chosen = match multi {
        MultiPolicy::LexicographicMax => distinct.pop_last(),
    };
    let Some(chosen) = chosen else {
        return match zero {
            ZeroPolicy::Fail => {
                warn!(field, "No value found in any descriptor");
                Err(ReconcileError::NoValue(field))
            }
            ZeroPolicy::Fallback(value) => {
                info!(field, fallback = %value, "No value found in any descriptor; using fallback");
                Ok(value)
            }
        };
    };

    if !distinct.is_empty() {
        warn!(
            field,
            candidates = %all,
            chosen = %chosen,
            "Several values found; choosing the greatest by string order, not by version semantics"
        );
    }
    Ok(chosen)
}
