//! Wire types for the OVOS/mycroft message bus. Frames are JSON objects with
//! a `type` discriminator and a free-form `data` payload; we decode just
//! enough structure to dispatch, and hand `data` through to callers as raw
//! JSON so nothing here needs to know every skill's custom event shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message types this gateway understands. Anything else is logged and
/// skipped (§7: unknown namespace / unsupported message -> log + no-op).
pub mod message_type {
    pub const GUI_CONNECTED: &str = "mycroft.gui.connected";
    pub const GUI_LIST_INSERT: &str = "mycroft.gui.list.insert";
    pub const GUI_LIST_REMOVE: &str = "mycroft.gui.list.remove";
    pub const GUI_LIST_MOVE: &str = "mycroft.gui.list.move";
    pub const SESSION_SET: &str = "mycroft.session.set";
    pub const SESSION_DELETE: &str = "mycroft.session.delete";
    pub const SESSION_LIST_INSERT: &str = "mycroft.session.list.insert";
    pub const SESSION_LIST_UPDATE: &str = "mycroft.session.list.update";
    pub const SESSION_LIST_MOVE: &str = "mycroft.session.list.move";
    pub const SESSION_LIST_REMOVE: &str = "mycroft.session.list.remove";
    pub const EVENTS_TRIGGERED: &str = "mycroft.events.triggered";

    /// Outbound only: sent when a page the browser is displaying becomes
    /// the focused page.
    pub const PAGE_GAINED_FOCUS: &str = "page_gained_focus";
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

/// The special skill id OVOS uses for the built-in home screen, which the
/// gateway always surfaces locally rather than waiting on the skill's page.
pub const HOMESCREEN_SKILL: &str = "skill-ovos-homescreen.openvoiceos";

#[derive(Debug, Clone, Deserialize)]
pub struct GuiListInsertData {
    pub namespace: String,
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default, rename = "gui_urls")]
    pub page_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuiListRemoveData {
    pub namespace: String,
    #[serde(default)]
    pub page_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuiListMoveData {
    pub namespace: String,
    pub page_id: String,
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSetData {
    pub namespace: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventTriggeredData {
    pub event_name: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Outbound frame announcing that `page_id` is now shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct PageGainedFocus {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub data: PageGainedFocusData,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageGainedFocusData {
    pub namespace: String,
    pub page_number: usize,
    pub skill_id: Option<String>,
}

impl PageGainedFocus {
    pub fn new(namespace: impl Into<String>, page_number: usize) -> Self {
        Self {
            message_type: message_type::PAGE_GAINED_FOCUS,
            data: PageGainedFocusData {
                namespace: namespace.into(),
                page_number,
                skill_id: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_gui_list_insert_frame() {
        let raw = r#"{"type":"mycroft.gui.list.insert","data":{"namespace":"skill-x","position":0,"gui_urls":["page1"]}}"#;
        let msg: BusMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.message_type, message_type::GUI_LIST_INSERT);
        let data: GuiListInsertData = serde_json::from_value(msg.data).unwrap();
        assert_eq!(data.namespace, "skill-x");
        assert_eq!(data.page_ids, vec!["page1"]);
    }

    #[test]
    fn malformed_frame_fails_to_decode_without_panicking() {
        let raw = "not json";
        let result: Result<BusMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
