//! Error taxonomy for the GUI domain, mirroring the layered
//! `Domain`/`Web`-kind split used across the rest of the gateway: callers
//! match on `GuiErrorKind`, everything else just propagates `GuiError` with
//! `?`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiErrorKind {
    /// A namespace was referenced that has no catalog entry.
    UnknownNamespace,
    /// A page id was referenced that is not present in its page group.
    PageNotFound,
    /// A callback or dialog id has no registered owner.
    CallbackNotFound,
    /// A page failed to construct; no catalog entry is created for it.
    PageConstruction,
}

#[derive(Debug, Clone)]
pub struct GuiError {
    pub kind: GuiErrorKind,
    pub message: String,
}

impl GuiError {
    pub fn new(kind: GuiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_namespace(namespace: &str) -> Self {
        Self::new(
            GuiErrorKind::UnknownNamespace,
            format!("unknown namespace: {namespace}"),
        )
    }

    pub fn page_not_found(page_id: &str) -> Self {
        Self::new(GuiErrorKind::PageNotFound, format!("page not found: {page_id}"))
    }

    pub fn callback_not_found(event_id: &str) -> Self {
        Self::new(
            GuiErrorKind::CallbackNotFound,
            format!("no callback registered for event id: {event_id}"),
        )
    }

    pub fn page_construction(page_id: &str, source: impl fmt::Display) -> Self {
        Self::new(
            GuiErrorKind::PageConstruction,
            format!("failed to construct page {page_id}: {source}"),
        )
    }
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GuiError {}

pub type GuiResult<T> = Result<T, GuiError>;
