//! Connects to the OVOS message bus over WebSocket, decodes frames, and
//! dispatches them into the GUI catalog and status machine. Connection
//! failures are logged and retried with backoff; the HTTP surface keeps
//! serving regardless of bus connectivity.

use crate::protocol::{
    message_type, BusMessage, EventTriggeredData, GuiListInsertData, GuiListMoveData, GuiListRemoveData,
    PageGainedFocus, SessionSetData, HOMESCREEN_SKILL,
};
use futures_util::{SinkExt, StreamExt};
use gui::{GUICoordinator, PageManager, PageRegistry, RendererHandle};
use log::*;
use status::StatusMachine;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;

const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub struct BusClient {
    server_url: String,
    coordinator: Arc<Mutex<GUICoordinator>>,
    registry: Arc<PageRegistry>,
    renderer: RendererHandle,
    status: Arc<StatusMachine>,
}

impl BusClient {
    pub fn new(
        server_url: impl Into<String>,
        coordinator: Arc<Mutex<GUICoordinator>>,
        registry: Arc<PageRegistry>,
        renderer: RendererHandle,
        status: Arc<StatusMachine>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            coordinator,
            registry,
            renderer,
            status,
        }
    }

    /// Run the connect-receive-reconnect loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut backoff = MIN_BACKOFF;
        loop {
            if cancel.is_cancelled() {
                return;
            }
            match tokio_tungstenite::connect_async(&self.server_url).await {
                Ok((stream, _)) => {
                    info!("connected to bus at {}", self.server_url);
                    backoff = MIN_BACKOFF;
                    let (mut write, mut read) = stream.split();
                    let announce = serde_json::json!({"type": message_type::GUI_CONNECTED, "data": {}});
                    if let Ok(text) = serde_json::to_string(&announce) {
                        let _ = write.send(WsMessage::Text(text)).await;
                    }

                    loop {
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            frame = read.next() => {
                                match frame {
                                    Some(Ok(WsMessage::Text(text))) => self.handle_frame(&text),
                                    Some(Ok(WsMessage::Close(_))) | None => {
                                        warn!("bus connection closed, reconnecting");
                                        break;
                                    }
                                    Some(Ok(_)) => {}
                                    Some(Err(e)) => {
                                        warn!("bus socket error: {e}, reconnecting");
                                        break;
                                    }
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("failed to connect to bus at {}: {e}", self.server_url);
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    fn handle_frame(&self, text: &str) {
        let message: BusMessage = match serde_json::from_str(text) {
            Ok(m) => m,
            Err(e) => {
                warn!("malformed bus frame, skipping: {e}");
                return;
            }
        };

        match message.message_type.as_str() {
            message_type::GUI_LIST_INSERT => self.handle_list_insert(message.data),
            message_type::GUI_LIST_REMOVE => self.handle_list_remove(message.data),
            message_type::GUI_LIST_MOVE => self.handle_list_move(message.data),
            message_type::SESSION_SET => self.handle_session_set(message.data),
            message_type::SESSION_DELETE => self.handle_session_delete(message.data),
            message_type::EVENTS_TRIGGERED => self.handle_event_triggered(message.data),
            message_type::SESSION_LIST_INSERT
            | message_type::SESSION_LIST_UPDATE
            | message_type::SESSION_LIST_MOVE
            | message_type::SESSION_LIST_REMOVE => {
                debug!("session list sub-events are not supported, ignoring: {}", message.message_type);
            }
            other => {
                debug!("unhandled bus message type, ignoring: {other}");
            }
        }
    }

    fn handle_list_insert(&self, data: serde_json::Value) {
        let Ok(data) = serde_json::from_value::<GuiListInsertData>(data) else {
            warn!("malformed gui.list.insert payload, skipping");
            return;
        };
        let mut coordinator = self.coordinator.lock().unwrap();
        coordinator.activate_namespace(&data.namespace);

        // The home screen always surfaces a local page regardless of which
        // URL the skill advertised.
        let is_homescreen = data.namespace == HOMESCREEN_SKILL;

        for (offset, page_id) in data.page_ids.iter().enumerate() {
            let lookup_id = if is_homescreen { "home" } else { page_id.as_str() };
            let Some(definition) = self.registry.get(lookup_id) else {
                warn!("no page registered for id {lookup_id}, skipping");
                continue;
            };
            match PageManager::from_definition(definition.as_ref()) {
                Ok(manager) => {
                    let position = data.position.map(|p| p + offset);
                    let should_show = coordinator.should_auto_show(&data.namespace, page_id);
                    let html = manager.outer_html();
                    coordinator.insert_page(&data.namespace, manager, position);
                    if should_show || position == Some(0) {
                        self.renderer.show(data.namespace.clone(), page_id.clone(), html);
                    }
                }
                Err(e) => warn!("page construction failed for {lookup_id}: {e}"),
            }
        }
    }

    fn handle_list_remove(&self, data: serde_json::Value) {
        let Ok(data) = serde_json::from_value::<GuiListRemoveData>(data) else {
            warn!("malformed gui.list.remove payload, skipping");
            return;
        };
        let mut coordinator = self.coordinator.lock().unwrap();
        for page_id in &data.page_ids {
            if let Err(e) = coordinator.remove_page(&data.namespace, page_id) {
                warn!("{e}");
            }
        }
    }

    fn handle_list_move(&self, data: serde_json::Value) {
        let Ok(data) = serde_json::from_value::<GuiListMoveData>(data) else {
            warn!("malformed gui.list.move payload, skipping");
            return;
        };
        let mut coordinator = self.coordinator.lock().unwrap();
        if let Err(e) = coordinator.move_page(&data.namespace, &data.page_id, data.position) {
            warn!("gui.list.move to unknown namespace, skipping: {e}");
        }
    }

    fn handle_session_set(&self, data: serde_json::Value) {
        let Ok(data) = serde_json::from_value::<SessionSetData>(data) else {
            warn!("malformed session.set payload, skipping");
            return;
        };
        let mut coordinator = self.coordinator.lock().unwrap();
        let Some(group) = coordinator.page_group_mut(&data.namespace) else {
            warn!("session.set for unknown namespace {}, skipping", data.namespace);
            return;
        };
        let Some(page) = group.active_page_mut() else {
            return;
        };
        let page_id = page.page_id.clone();
        if let serde_json::Value::Object(fields) = &data.data {
            let mut updates = Vec::new();
            for (name, value) in fields {
                updates.extend(page.update_data(name, value));
            }
            drop(coordinator);
            self.renderer.update_attributes(data.namespace, page_id, updates);
        }
    }

    fn handle_session_delete(&self, data: serde_json::Value) {
        if let Some(namespace) = data.get("namespace").and_then(|v| v.as_str()) {
            self.coordinator.lock().unwrap().remove_namespace(namespace);
        }
    }

    fn handle_event_triggered(&self, data: serde_json::Value) {
        let Ok(data) = serde_json::from_value::<EventTriggeredData>(data) else {
            warn!("malformed events.triggered payload, skipping");
            return;
        };

        if data.event_name == "page_gained_focus" {
            return;
        }

        // `process_event` no-ops on events carrying no utterance/spinner
        // data, so non-system namespaces routing here is harmless.
        self.status.process_event(&data.event_name, &data.parameters);
    }
}

/// Build the outbound frame announcing `page_id` in `namespace` gained focus.
pub fn focus_event(namespace: &str, page_number: usize) -> PageGainedFocus {
    PageGainedFocus::new(namespace, page_number)
}
