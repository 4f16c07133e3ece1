use config::Config;
use gui::{GUICoordinator, RendererHandle};
use sse::{Manager as SseManager, SessionRegistry};
use std::sync::{Arc, Mutex};

pub mod config;
pub mod logging;

/// Shared infrastructure handed to every HTTP handler: the page catalog, the
/// SSE fan-out, session liveness tracking, and the renderer that serializes
/// them all onto the wire.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub coordinator: Arc<Mutex<GUICoordinator>>,
    pub sse: SseManager,
    pub sessions: SessionRegistry,
    pub renderer: RendererHandle,
}

impl AppState {
    pub fn new(
        config: Config,
        coordinator: Arc<Mutex<GUICoordinator>>,
        sse: SseManager,
        sessions: SessionRegistry,
        renderer: RendererHandle,
    ) -> Self {
        Self {
            config,
            coordinator,
            sse,
            sessions,
            renderer,
        }
    }
}
