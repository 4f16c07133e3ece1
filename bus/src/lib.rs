//! OVOS message bus client: decodes `mycroft.gui.*`/`mycroft.session.*`/
//! `mycroft.events.triggered` frames and dispatches them into the GUI
//! catalog and status machine.

pub mod client;
pub mod protocol;

pub use client::BusClient;
