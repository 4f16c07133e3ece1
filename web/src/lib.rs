//! HTTP surface: the document shell, SSE updates, session pings, and the
//! local/global DOM callback routes.

pub mod document;
pub mod error;
pub mod handler;
pub mod router;

pub use router::define_routes;
