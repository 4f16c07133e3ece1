//! DOM-triggered callbacks: the `hx-get`/`hx-post` wiring that lets the
//! browser call back into a page, plus the outcome that travels back out.

use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackContext {
    /// Resolved synchronously, response body is the HTML fragment to swap in.
    Local,
    /// Fire-and-forget; any resulting update is pushed later over SSE.
    Global,
}

/// A DOM event payload posted back from the browser, e.g.
/// `{"target-value": "42"}`. Hyphens in keys are normalized to underscores,
/// mirroring the original client's attribute-name handling.
#[derive(Debug, Clone, Default)]
pub struct DomEvent {
    fields: BTreeMap<String, Value>,
}

impl DomEvent {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let mut fields = BTreeMap::new();
        if let Value::Object(map) = value {
            for (k, v) in map {
                fields.insert(k.replace('-', "_"), v);
            }
        }
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Clone)]
pub struct CallbackRecord {
    pub context: CallbackContext,
    /// The `hx-trigger` expression, e.g. `"click"` or `"change from:#volume"`.
    pub event_expr: String,
    pub event_id: String,
    pub function: std::sync::Arc<dyn Fn(&DomEvent) -> CallbackOutcome + Send + Sync>,
    pub source: String,
    pub target: String,
    pub swap: crate::binding::SwapMode,
}

impl std::fmt::Debug for CallbackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRecord")
            .field("context", &self.context)
            .field("event_expr", &self.event_expr)
            .field("event_id", &self.event_id)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

/// A pushed update resulting from a global callback's side effect.
#[derive(Debug, Clone)]
pub struct PushUpdate {
    pub event_id: String,
    pub html: String,
    pub swap: crate::binding::SwapMode,
}

#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    /// Local callback result: HTML fragment returned directly in the response.
    Local(String),
    /// Global callback result: optional side-effecting push to subscribers.
    Global(Option<PushUpdate>),
}
