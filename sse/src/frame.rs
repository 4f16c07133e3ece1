//! The wire format pushed to every browser: one named SSE event carrying an
//! HTML (or empty) payload, matching htmx's `sse-swap` convention.

use axum::response::sse::Event;

#[derive(Debug, Clone)]
pub struct SseFrame {
    pub event_id: String,
    pub html: String,
}

impl SseFrame {
    pub fn new(event_id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            // newlines would break the `data:` framing, so strip them
            // defensively the same way the original renderer did.
            html: html.into().replace('\n', ""),
        }
    }

    pub fn to_wire(&self) -> Event {
        Event::default().event(self.event_id.clone()).data(self.html.clone())
    }
}

impl From<gui::RenderFrame> for SseFrame {
    fn from(frame: gui::RenderFrame) -> Self {
        SseFrame::new(frame.event_id, frame.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_embedded_newlines() {
        let frame = SseFrame::new("root", "<div>\nhello\n</div>");
        assert_eq!(frame.html, "<div>hello</div>");
    }
}
