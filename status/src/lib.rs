//! Status bar event handling: speech captions, utterance display, and the
//! listening spinner, each driven independently off the bus's system events.

pub mod format;
pub mod handler;
pub mod machine;

pub use handler::StatusEventHandler;
pub use machine::StatusMachine;
