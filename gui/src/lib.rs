//! GUI domain: the document tree, binding/callback tables, page/namespace
//! catalog, and the single-writer renderer that turns all of it into HTML
//! pushed out over SSE.

pub mod binding;
pub mod callback;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod group;
pub mod page;
pub mod renderer;

pub use binding::{Binding, SwapMode};
pub use callback::{CallbackContext, CallbackOutcome, CallbackRecord, DomEvent, PushUpdate};
pub use coordinator::GUICoordinator;
pub use document::{Child, DocumentTree, Element, ElementId};
pub use error::{GuiError, GuiErrorKind, GuiResult};
pub use group::PageGroup;
pub use page::{AttributeUpdate, PageBuild, PageDefinition, PageManager, PageRegistry};
pub use renderer::{RenderFrame, RendererHandle};

/// The namespace the status bar always lives in. `GUICoordinator` never
/// deactivates it and the renderer delivers its updates unconditionally.
pub const STATUS_NAMESPACE: &str = "status";
