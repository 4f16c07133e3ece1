//! Interaction parameters: the binding between a piece of session data and an
//! element in the document, pushed to the browser over SSE.

use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// How an update to a bound element should be applied client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapMode {
    InnerHtml,
    OuterHtml,
    Attribute(String),
}

impl SwapMode {
    /// The `hx-swap` value for this mode (attribute swaps still ride on an
    /// out-of-band `sse-swap`, htmx only needs `none` for those).
    pub fn hx_swap(&self) -> &'static str {
        match self {
            SwapMode::InnerHtml => "innerHTML",
            SwapMode::OuterHtml => "outerHTML",
            SwapMode::Attribute(_) => "none",
        }
    }
}

/// Formats a raw session-data value into the string pushed to the client for
/// one attribute of a binding. Keyed per-attribute so e.g. `inner_content`
/// and `class` can each have their own formatter on the same binding.
pub type Formatter = Arc<dyn Fn(&serde_json::Value) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Binding {
    pub parameter_name: String,
    /// `"<name>-<8 hex chars>"`, unique per binding instance.
    pub parameter_id: String,
    pub target: String,
    pub attributes: Vec<String>,
    pub formatters: Vec<(String, Formatter)>,
    pub swap: SwapMode,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("parameter_name", &self.parameter_name)
            .field("parameter_id", &self.parameter_id)
            .field("target", &self.target)
            .field("attributes", &self.attributes)
            .field("swap", &self.swap)
            .finish()
    }
}

impl Binding {
    pub fn new(parameter_name: impl Into<String>, target: impl Into<String>, attributes: Vec<String>) -> Self {
        let parameter_name = parameter_name.into();
        let swap = if attributes == ["inner_content"] {
            SwapMode::InnerHtml
        } else {
            SwapMode::OuterHtml
        };
        let parameter_id = format!("{}-{}", parameter_name, generate_token());
        Self {
            parameter_name,
            parameter_id,
            target: target.into(),
            attributes,
            formatters: Vec::new(),
            swap,
        }
    }

    /// Override the swap mode to target a single attribute explicitly.
    pub fn with_attribute_swap(mut self, attribute: impl Into<String>) -> Self {
        self.swap = SwapMode::Attribute(attribute.into());
        self
    }

    pub fn with_formatter(mut self, attribute: impl Into<String>, formatter: Formatter) -> Self {
        self.formatters.push((attribute.into(), formatter));
        self
    }

    pub fn format(&self, attribute: &str, value: &serde_json::Value) -> String {
        self.formatters
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, f)| f(value))
            .unwrap_or_else(|| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// The `sse-swap`/`hx-swap` attributes htmx needs wired onto `target`.
    pub fn wiring_attributes(&self) -> Vec<(String, String)> {
        vec![
            ("sse-swap".to_string(), self.parameter_id.clone()),
            ("hx-swap".to_string(), self.swap.hx_swap().to_string()),
        ]
    }
}

pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 4] = rng.gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_content_only_defaults_to_inner_html_swap() {
        let binding = Binding::new("status-utterance", "#utterance", vec!["inner_content".into()]);
        assert_eq!(binding.swap, SwapMode::InnerHtml);
    }

    #[test]
    fn other_attribute_sets_default_to_outer_html_swap() {
        let binding = Binding::new("status-spinner", "#spinner", vec!["class".into()]);
        assert_eq!(binding.swap, SwapMode::OuterHtml);
    }

    #[test]
    fn explicit_attribute_swap_overrides_default() {
        let binding = Binding::new("status-spinner", "#spinner", vec!["class".into()])
            .with_attribute_swap("class");
        assert_eq!(binding.swap, SwapMode::Attribute("class".into()));
    }

    #[test]
    fn parameter_id_is_prefixed_by_name() {
        let binding = Binding::new("volume", "#volume", vec!["inner_content".into()]);
        assert!(binding.parameter_id.starts_with("volume-"));
        assert_eq!(binding.parameter_id.len(), "volume-".len() + 8);
    }
}
