//! Provider response parsing into a [`Plan`].
//!
//! The provider returns raw text that should contain a JSON object, often
//! wrapped in prose or a code fence. Parsing tries two strategies:
//! 1. Direct `serde_json` deserialization of the whole text
//! 2. The substring from the first `{` to the last `}`, parsed again
//!
//! The value must be a JSON object. Unknown fields are ignored and missing
//! ones take their defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlannerError;

/// A planner's proposal for the next turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// Regeneration multiplier; `None` means the baseline.
    pub regen: Option<f64>,
    /// Free-form terrain adjustments, passed through untouched.
    pub terrain: Option<Value>,
    /// Free-form skill updates, passed through untouched.
    pub skills: Option<Value>,
}

impl Plan {
    /// The deterministic baseline plan, `{"regen": 1.0}`.
    pub const fn baseline() -> Self {
        Self {
            regen: Some(1.0),
            terrain: None,
            skills: None,
        }
    }
}

/// Parse provider text into a [`Plan`].
///
/// # Errors
///
/// Returns [`PlannerError::NotAnObject`] if the text is JSON of another
/// shape, or [`PlannerError::Parse`] if no object can be recovered.
pub fn parse_plan(raw: &str) -> Result<Plan, PlannerError> {
    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => value,
        Err(direct_err) => {
            let candidate = extract_braced(raw).ok_or_else(|| {
                PlannerError::Parse(format!("no JSON object in response: {direct_err}"))
            })?;
            serde_json::from_str::<Value>(candidate)
                .map_err(|e| PlannerError::Parse(format!("embedded JSON invalid: {e}")))?
        }
    };

    if !value.is_object() {
        return Err(PlannerError::NotAnObject(value.to_string()));
    }

    serde_json::from_value(value).map_err(|e| PlannerError::Parse(format!("plan fields: {e}")))
}

/// The slice from the first `{` through the last `}`, if any.
fn extract_braced(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    raw.get(start..=end)
}
