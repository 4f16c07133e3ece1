//! Server-Sent Events transport for the GUI gateway.
//!
//! Every browser watches the same document, so this crate is a broadcast,
//! not a per-user inbox: `Manager` wraps a single `events::EventBus<SseFrame>`
//! and every subscription sees every frame. `SessionRegistry` tracks browser
//! liveness independently via a ping heartbeat, since an SSE connection
//! dropping and a browser tab closing are different events.
//!
//! # Modules
//!
//! - `frame`: the wire format, one named SSE event per HTML fragment
//! - `manager`: broadcast fan-out built on `events::EventBus`
//! - `session`: ping-based liveness tracking with a sweeper for stale sessions

pub mod frame;
pub mod manager;
pub mod session;

pub use frame::SseFrame;
pub use manager::Manager;
pub use session::SessionRegistry;
