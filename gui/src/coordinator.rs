//! `GUICoordinator` is the top-level catalog: an ordered list of active
//! namespaces and, for each, its `PageGroup`. It also keeps a reverse index
//! from event/dialog id back to the `(namespace, page_id)` that registered
//! it, so an HTTP callback can be resolved directly instead of relying on
//! "whatever namespace happens to be active right now" — a correctness fix
//! over the single global active-namespace lookup the original client used.

use crate::error::{GuiError, GuiResult};
use crate::group::PageGroup;
use crate::page::PageManager;
use std::collections::HashMap;

pub type Namespace = String;
pub type PageId = String;

#[derive(Default)]
pub struct GUICoordinator {
    active_namespaces: Vec<Namespace>,
    catalog: HashMap<Namespace, PageGroup>,
    event_index: HashMap<String, (Namespace, PageId)>,
    dialog_index: HashMap<String, (Namespace, PageId)>,
}

impl GUICoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_catalog(&self, namespace: &str) -> bool {
        self.catalog.contains_key(namespace)
    }

    pub fn get_active_namespace(&self) -> Option<&str> {
        self.active_namespaces.first().map(String::as_str)
    }

    pub fn page_group(&self, namespace: &str) -> Option<&PageGroup> {
        self.catalog.get(namespace)
    }

    pub fn page_group_mut(&mut self, namespace: &str) -> Option<&mut PageGroup> {
        self.catalog.get_mut(namespace)
    }

    /// Move `namespace` to the front of the active list, creating its
    /// `PageGroup` if this is the first time it's seen.
    pub fn activate_namespace(&mut self, namespace: &str) {
        self.catalog.entry(namespace.to_string()).or_insert_with(PageGroup::new);
        self.active_namespaces.retain(|ns| ns != namespace);
        self.active_namespaces.insert(0, namespace.to_string());
    }

    /// Rotate the front namespace to position 1, resuming whatever was
    /// active before it (mirrors `PageGroup::deactivate_page`).
    pub fn deactivate_namespace(&mut self, namespace: &str) {
        let Some(idx) = self.active_namespaces.iter().position(|ns| ns == namespace) else {
            return;
        };
        if idx != 0 {
            return;
        }
        let front = self.active_namespaces.remove(0);
        let pos = if self.active_namespaces.is_empty() { 0 } else { 1 };
        self.active_namespaces.insert(pos, front);
    }

    pub fn remove_namespace(&mut self, namespace: &str) {
        self.active_namespaces.retain(|ns| ns != namespace);
        self.catalog.remove(namespace);
        self.event_index.retain(|_, (ns, _)| ns != namespace);
        self.dialog_index.retain(|_, (ns, _)| ns != namespace);
    }

    /// Register `manager` into `namespace`'s page group, indexing its
    /// callbacks and dialogs for direct lookup.
    pub fn insert_page(&mut self, namespace: &str, manager: PageManager, position: Option<usize>) {
        let page_id = manager.page_id.clone();
        for event_id in manager.event_ids() {
            self.event_index
                .insert(event_id.clone(), (namespace.to_string(), page_id.clone()));
        }
        for dialog_id in manager.dialog_ids() {
            self.dialog_index
                .insert(dialog_id.clone(), (namespace.to_string(), page_id.clone()));
        }
        self.catalog
            .entry(namespace.to_string())
            .or_insert_with(PageGroup::new)
            .insert_page(manager, position);
    }

    pub fn remove_page(&mut self, namespace: &str, page_id: &str) -> GuiResult<()> {
        let group = self
            .catalog
            .get_mut(namespace)
            .ok_or_else(|| GuiError::unknown_namespace(namespace))?;
        group.remove_page(page_id);
        self.event_index.retain(|_, (ns, pid)| !(ns == namespace && pid == page_id));
        self.dialog_index.retain(|_, (ns, pid)| !(ns == namespace && pid == page_id));
        Ok(())
    }

    pub fn move_page(&mut self, namespace: &str, page_id: &str, position: Option<usize>) -> GuiResult<()> {
        let group = self
            .catalog
            .get_mut(namespace)
            .ok_or_else(|| GuiError::unknown_namespace(namespace))?;
        group.move_page(page_id, position)
    }

    pub fn lookup_event(&self, event_id: &str) -> Option<&(Namespace, PageId)> {
        self.event_index.get(event_id)
    }

    pub fn lookup_dialog(&self, dialog_id: &str) -> Option<&(Namespace, PageId)> {
        self.dialog_index.get(dialog_id)
    }

    /// True when `namespace` was just created and `page_id` is its sole page
    /// at position 0 — the condition under which a page auto-shows itself.
    pub fn should_auto_show(&self, namespace: &str, page_id: &str) -> bool {
        self.catalog
            .get(namespace)
            .map(|g| g.len() == 1 && g.page_id_at(0) == Some(page_id))
            .unwrap_or(false)
            && self.active_namespaces.first().map(String::as_str) == Some(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_namespace_moves_to_front_and_creates_group() {
        let mut coord = GUICoordinator::new();
        coord.activate_namespace("skill-a");
        coord.activate_namespace("skill-b");
        assert_eq!(coord.get_active_namespace(), Some("skill-b"));
        assert!(coord.in_catalog("skill-a"));
    }

    #[test]
    fn deactivate_namespace_rotates_to_second_position() {
        let mut coord = GUICoordinator::new();
        coord.activate_namespace("skill-a");
        coord.activate_namespace("skill-b");
        coord.deactivate_namespace("skill-b");
        assert_eq!(coord.get_active_namespace(), Some("skill-a"));
    }

    #[test]
    fn unknown_namespace_move_returns_error() {
        let mut coord = GUICoordinator::new();
        let result = coord.move_page("missing", "p1", None);
        assert!(matches!(result, Err(e) if e.kind == crate::error::GuiErrorKind::UnknownNamespace));
    }
}
