//! The `Renderer` owns the single document and dialog roots shown to every
//! browser and serializes all transitions through one queue, so two
//! near-simultaneous `Show` calls can never race each other onto the wire.
//!
//! It knows nothing about SSE wire framing or transport; it emits
//! `RenderFrame`s (an `event` id plus an HTML payload) on an unbounded
//! channel, and whoever wires the gateway together forwards those onto the
//! SSE fan-out bus. That keeps this crate transport-agnostic, the same
//! reason the `events` crate stays domain-agnostic.

use crate::coordinator::{Namespace, PageId};
use crate::page::{AttributeUpdate, PageManager};
use log::*;
use tokio::sync::{mpsc, oneshot};

pub const ROOT_EVENT_ID: &str = "root";
pub const DIALOG_EVENT_ID: &str = "dialog";

#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub event_id: String,
    pub html: String,
}

enum RendererCommand {
    Show {
        namespace: Namespace,
        page_id: PageId,
        html: String,
    },
    Close,
    OpenDialog {
        html: String,
    },
    CloseDialog,
    UpdateAttributes {
        namespace: Namespace,
        page_id: PageId,
        updates: Vec<AttributeUpdate>,
    },
    /// Direct push bypassing the last-shown gate, used for the reserved
    /// "status" namespace which is always visible.
    PushStatus {
        updates: Vec<AttributeUpdate>,
    },
    Shutdown(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct RendererHandle {
    sender: mpsc::UnboundedSender<RendererCommand>,
}

impl RendererHandle {
    pub fn show(&self, namespace: impl Into<String>, page_id: impl Into<String>, html: impl Into<String>) {
        let _ = self.sender.send(RendererCommand::Show {
            namespace: namespace.into(),
            page_id: page_id.into(),
            html: html.into(),
        });
    }

    pub fn close(&self) {
        let _ = self.sender.send(RendererCommand::Close);
    }

    pub fn open_dialog(&self, html: impl Into<String>) {
        let _ = self.sender.send(RendererCommand::OpenDialog { html: html.into() });
    }

    pub fn close_dialog(&self) {
        let _ = self.sender.send(RendererCommand::CloseDialog);
    }

    pub fn update_attributes(&self, namespace: impl Into<String>, page_id: impl Into<String>, updates: Vec<AttributeUpdate>) {
        let _ = self.sender.send(RendererCommand::UpdateAttributes {
            namespace: namespace.into(),
            page_id: page_id.into(),
            updates,
        });
    }

    pub fn push_status(&self, updates: Vec<AttributeUpdate>) {
        let _ = self.sender.send(RendererCommand::PushStatus { updates });
    }

    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(RendererCommand::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

struct RendererState {
    last_shown: Option<(Namespace, PageId)>,
    output: mpsc::UnboundedSender<RenderFrame>,
}

impl RendererState {
    fn emit(&self, event_id: &str, html: String) {
        let _ = self.output.send(RenderFrame {
            event_id: event_id.to_string(),
            html,
        });
    }

    fn handle(&mut self, command: RendererCommand) -> bool {
        match command {
            RendererCommand::Show { namespace, page_id, html } => {
                if self.last_shown.as_ref() == Some(&(namespace.clone(), page_id.clone())) {
                    debug!("show({namespace}, {page_id}) is a no-op, already displayed");
                } else {
                    self.last_shown = Some((namespace, page_id));
                    self.emit(ROOT_EVENT_ID, html);
                }
            }
            RendererCommand::Close => {
                if self.last_shown.take().is_some() {
                    self.emit(ROOT_EVENT_ID, String::new());
                }
            }
            RendererCommand::OpenDialog { html } => self.emit(DIALOG_EVENT_ID, html),
            RendererCommand::CloseDialog => self.emit(DIALOG_EVENT_ID, String::new()),
            RendererCommand::UpdateAttributes { namespace, page_id, updates } => {
                let gated = self.last_shown.as_ref() == Some(&(namespace, page_id));
                for update in updates {
                    if gated {
                        self.emit(&update.event_id, update.html);
                    } else {
                        trace!("deferring attribute update {} for non-visible page", update.event_id);
                    }
                }
            }
            RendererCommand::PushStatus { updates } => {
                for update in updates {
                    self.emit(&update.event_id, update.html);
                }
            }
            RendererCommand::Shutdown(ack) => {
                let _ = ack.send(());
                return false;
            }
        }
        true
    }
}

/// Spawn the renderer actor and return a cloneable handle plus the frame
/// stream to forward onto SSE.
pub fn spawn() -> (RendererHandle, mpsc::UnboundedReceiver<RenderFrame>) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let (output_tx, output_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut state = RendererState {
            last_shown: None,
            output: output_tx,
        };
        while let Some(command) = command_rx.recv().await {
            if !state.handle(command) {
                break;
            }
        }
    });

    (RendererHandle { sender: command_tx }, output_rx)
}

/// Compute the initial transitions to apply when `page_id` is freshly
/// inserted as the sole page of a newly-activated namespace.
pub fn build_page_html(manager: &PageManager) -> String {
    manager.outer_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn show_twice_with_same_route_emits_once() {
        let (handle, mut frames) = spawn();
        handle.show("ns", "page", "<div>1</div>");
        handle.show("ns", "page", "<div>1</div>");
        handle.show("other", "page2", "<div>2</div>");
        let first = frames.recv().await.unwrap();
        assert_eq!(first.html, "<div>1</div>");
        let second = frames.recv().await.unwrap();
        assert_eq!(second.html, "<div>2</div>");
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn update_attributes_suppressed_when_not_last_shown() {
        let (handle, mut frames) = spawn();
        handle.show("ns", "page", "<div>root</div>");
        let _ = frames.recv().await.unwrap();
        handle.update_attributes(
            "other-ns",
            "other-page",
            vec![AttributeUpdate {
                event_id: "foo-1234abcd".into(),
                html: "ignored".into(),
                swap: crate::binding::SwapMode::InnerHtml,
            }],
        );
        handle.update_attributes(
            "ns",
            "page",
            vec![AttributeUpdate {
                event_id: "foo-1234abcd".into(),
                html: "visible".into(),
                swap: crate::binding::SwapMode::InnerHtml,
            }],
        );
        let update = frames.recv().await.unwrap();
        assert_eq!(update.html, "visible");
        handle.shutdown().await;
    }
}
