//! `PageManager` owns one page's document subtree plus its binding and
//! callback tables. Building a concrete page is a matter of implementing
//! `PageDefinition` and registering it in a `PageRegistry` — the Rust
//! equivalent of the original's dynamic per-page module loading, made static
//! since Rust has no runtime module loader.

use crate::binding::{Binding, SwapMode};
use crate::callback::{CallbackContext, CallbackOutcome, CallbackRecord, DomEvent};
use crate::document::{DocumentTree, Element, ElementId};
use crate::error::{GuiError, GuiResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A single pushed update resulting from a data/state change, keyed by the
/// SSE event id (a binding's `parameter_id`) the browser is subscribed to.
#[derive(Debug, Clone)]
pub struct AttributeUpdate {
    pub event_id: String,
    pub html: String,
    pub swap: SwapMode,
}

/// Everything a concrete page must supply to be hosted by a `PageManager`.
pub trait PageDefinition: Send + Sync {
    fn page_id(&self) -> &str;
    fn uri(&self) -> &str;

    /// Build the page's initial document tree plus its binding/callback
    /// tables. Called once, at registration time.
    fn build(&self) -> GuiResult<PageBuild>;
}

/// The artifacts `PageDefinition::build` hands back to the `PageManager`.
pub struct PageBuild {
    pub document: DocumentTree,
    pub parameters: Vec<Binding>,
    pub dialogs: HashMap<String, DocumentTree>,
    pub local_callbacks: Vec<CallbackRecord>,
    pub global_callbacks: Vec<CallbackRecord>,
}

/// A static catalog of known pages, looked up by page id.
#[derive(Default)]
pub struct PageRegistry {
    definitions: HashMap<String, Arc<dyn PageDefinition>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: Arc<dyn PageDefinition>) {
        self.definitions.insert(definition.page_id().to_string(), definition);
    }

    pub fn get(&self, page_id: &str) -> Option<Arc<dyn PageDefinition>> {
        self.definitions.get(page_id).cloned()
    }
}

pub struct PageManager {
    pub page_id: String,
    pub uri: String,
    pub(crate) document: DocumentTree,
    pub(crate) dialogs: HashMap<String, DocumentTree>,
    /// parameter name -> bindings sharing that name (a name may bind several
    /// elements, e.g. the same value mirrored in two places).
    pub(crate) parameters: HashMap<String, Vec<Binding>>,
    pub(crate) local_callbacks: HashMap<String, CallbackRecord>,
    pub(crate) global_callbacks: HashMap<String, CallbackRecord>,
}

impl PageManager {
    pub fn from_definition(definition: &dyn PageDefinition) -> GuiResult<Self> {
        let build = definition
            .build()
            .map_err(|e| GuiError::page_construction(definition.page_id(), e))?;

        let mut parameters: HashMap<String, Vec<Binding>> = HashMap::new();
        for binding in build.parameters {
            parameters.entry(binding.parameter_name.clone()).or_default().push(binding);
        }

        let mut local_callbacks = HashMap::new();
        for cb in build.local_callbacks {
            local_callbacks.insert(cb.event_id.clone(), cb);
        }
        let mut global_callbacks = HashMap::new();
        for cb in build.global_callbacks {
            global_callbacks.insert(cb.event_id.clone(), cb);
        }

        Ok(Self {
            page_id: definition.page_id().to_string(),
            uri: definition.uri().to_string(),
            document: build.document,
            dialogs: build.dialogs,
            parameters,
            local_callbacks,
            global_callbacks,
        })
    }

    pub fn root(&self) -> ElementId {
        self.document.root()
    }

    pub fn document(&self) -> &DocumentTree {
        &self.document
    }

    pub fn outer_html(&self) -> String {
        self.document.outer_html(self.document.root())
    }

    pub fn dialog(&self, dialog_id: &str) -> Option<&DocumentTree> {
        self.dialogs.get(dialog_id)
    }

    pub fn event_ids(&self) -> impl Iterator<Item = &String> {
        self.local_callbacks.keys().chain(self.global_callbacks.keys())
    }

    pub fn dialog_ids(&self) -> impl Iterator<Item = &String> {
        self.dialogs.keys()
    }

    /// Apply a new value to every binding registered under `parameter_name`,
    /// updating the in-memory document and returning the SSE updates to push.
    pub fn update_data(&mut self, parameter_name: &str, value: &Value) -> Vec<AttributeUpdate> {
        let Some(bindings) = self.parameters.get(parameter_name).cloned() else {
            return Vec::new();
        };
        let mut updates = Vec::new();
        for binding in &bindings {
            updates.extend(self.apply_binding(binding, value));
        }
        updates
    }

    fn apply_binding(&mut self, binding: &Binding, value: &Value) -> Vec<AttributeUpdate> {
        let Some(target) = self.document.find_by_id(self.document.root(), binding.target.trim_start_matches('#')) else {
            return Vec::new();
        };

        let attrs: Vec<(String, String)> = binding
            .attributes
            .iter()
            .map(|attr| (attr.clone(), binding.format(attr, value)))
            .collect();

        for (attr, formatted) in &attrs {
            if attr == "inner_content" {
                self.document.detach_children(target);
                self.document.append_child(target, crate::document::Child::Raw(formatted.clone()));
            } else {
                self.document.set_attribute(target, attr.clone(), formatted.clone());
            }
        }

        let html = match &binding.swap {
            SwapMode::InnerHtml => self.document.inner_html(target),
            SwapMode::OuterHtml => self.document.outer_html(target),
            SwapMode::Attribute(attr) => self.document.attribute(target, attr).unwrap_or_default(),
        };

        vec![AttributeUpdate {
            event_id: binding.parameter_id.clone(),
            html,
            swap: binding.swap.clone(),
        }]
    }

    /// Merge arbitrary attribute state (e.g. status-machine pushes) onto an
    /// element found by tag, without going through the named-binding table.
    pub fn update_state(&mut self, target_tag: &str, attrs: Vec<(String, String)>) {
        if let Some(id) = self.document.find_by_tag(self.document.root(), target_tag) {
            self.document.merge_attributes(id, attrs);
        }
    }

    pub fn trigger_callback(&self, event_id: &str, event: &DomEvent) -> GuiResult<CallbackOutcome> {
        let record = self
            .local_callbacks
            .get(event_id)
            .or_else(|| self.global_callbacks.get(event_id))
            .ok_or_else(|| GuiError::callback_not_found(event_id))?;
        Ok((record.function)(event))
    }

    pub fn callback_context(&self, event_id: &str) -> Option<CallbackContext> {
        self.local_callbacks
            .get(event_id)
            .map(|_| CallbackContext::Local)
            .or_else(|| self.global_callbacks.get(event_id).map(|_| CallbackContext::Global))
    }
}

/// Build the root `<div>` every `DocumentTree` uses for a page body, matching
/// the `sse-swap="root"` wiring the renderer expects on activation.
pub fn page_root() -> Element {
    let mut el = Element::new("div");
    el.attributes.insert("class".into(), "page".into());
    el
}
