//! Dispatches raw bus events into the three status channels (speech,
//! utterance, spinner), each independently timed and reset.

use crate::format::{calculate_duration, format_utterance, generate_split_utterance};
use crate::handler::StatusEventHandler;
use gui::{AttributeUpdate, RendererHandle, SwapMode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Dummy event used internally when a fallback/exception downgrades what
/// would otherwise be a normal utterance display.
pub const UTTERANCE_UNDETECTED: &str = "ovos.utterance.undetected";
const UNKNOWN_SKILL: &str = "skill-ovos-fallback-unknown.openvoiceos";

const SPEECH_TIMEOUT: Duration = Duration::from_secs(6);
const UTTERANCE_TIMEOUT: Duration = Duration::from_secs(6);
const SPINNER_DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_UTTERANCE_PIECE_LEN: usize = 60;

/// Spinner timeout, in seconds, keyed by the triggering wake/listen event.
fn spinner_timeout_secs(event_name: &str) -> Option<u64> {
    match event_name {
        "recognizer_loop:wakeword" => Some(20),
        "recognizer_loop:record_begin" | "recognizer_loop:audio_output_start" => Some(60),
        "recognizer_loop:record_end" => Some(10),
        "mycroft.skill.handler.complete" | "recognizer_loop:utterance" => Some(8),
        "mycroft.speech.recognition.unknown" | "recognizer_loop:utterance.cancelled" => Some(5),
        _ => None,
    }
}

fn spinner_class(event_name: &str) -> Option<&'static str> {
    match event_name {
        "recognizer_loop:wakeword" | "recognizer_loop:record_begin" => Some("visible"),
        "recognizer_loop:record_end" => Some("fade-out"),
        _ => None,
    }
}

pub struct StatusMachine {
    speech: StatusEventHandler,
    utterance: StatusEventHandler,
    spinner: StatusEventHandler,
}

impl StatusMachine {
    pub fn new(renderer: RendererHandle) -> Self {
        let speech = {
            let renderer = renderer.clone();
            StatusEventHandler::spawn(
                SPEECH_TIMEOUT,
                Arc::new(|_, _| {}),
                Arc::new(move || renderer.push_status(vec![text_update("status-speech", "")])),
            )
        };
        let utterance = {
            let renderer = renderer.clone();
            StatusEventHandler::spawn(
                UTTERANCE_TIMEOUT,
                {
                    let renderer = renderer.clone();
                    Arc::new(move |_event, data| {
                        if let Some(text) = data.get("text").and_then(Value::as_str) {
                            renderer.push_status(vec![text_update("status-utterance", text)]);
                        }
                    })
                },
                Arc::new(move || renderer.push_status(vec![text_update("status-utterance", "")])),
            )
        };
        let spinner = {
            let renderer = renderer.clone();
            StatusEventHandler::spawn(
                SPINNER_DEFAULT_TIMEOUT,
                {
                    let renderer = renderer.clone();
                    Arc::new(move |event_name, _data| {
                        if let Some(class) = spinner_class(event_name) {
                            renderer.push_status(vec![attribute_update("status-spinner", "class", class)]);
                        }
                    })
                },
                Arc::new(move || renderer.push_status(vec![attribute_update("status-spinner", "class", "hidden")])),
            )
        };

        Self { speech, utterance, spinner }
    }

    /// Handle one decoded bus event, fanning it out to whichever status
    /// channels it affects.
    pub fn process_event(&self, event_name: &str, data: &Value) {
        let skill_id = data.get("skill_id").and_then(Value::as_str);
        let has_exception = data.get("exception").is_some();
        let downgraded = skill_id == Some(UNKNOWN_SKILL) || has_exception;

        if let Some(timeout_secs) = spinner_timeout_secs(event_name) {
            self.spinner.enqueue(
                event_name.to_string(),
                data.clone(),
                Some(Duration::from_secs(timeout_secs)),
                Duration::from_millis(0),
            );
        }

        let utterance_text = data
            .get("utterances")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .and_then(Value::as_str)
            .or_else(|| data.get("utterance").and_then(Value::as_str));

        let Some(raw_text) = utterance_text else {
            return;
        };

        let event_name = if downgraded { UTTERANCE_UNDETECTED } else { event_name };
        let formatted = format_utterance(raw_text);
        let explicit_duration = data
            .get("duration")
            .or_else(|| data.get("sound_duration"))
            .and_then(Value::as_f64);
        let total_duration = explicit_duration.unwrap_or_else(|| calculate_duration(&formatted));

        let pieces = generate_split_utterance(&formatted, MAX_UTTERANCE_PIECE_LEN);
        let per_piece = total_duration / pieces.len().max(1) as f64;

        for piece in pieces {
            self.speech.enqueue(
                event_name.to_string(),
                serde_json::json!({ "text": piece.clone() }),
                None,
                Duration::from_secs_f64(per_piece),
            );
            self.utterance.enqueue(
                event_name.to_string(),
                serde_json::json!({ "text": piece }),
                None,
                Duration::from_secs_f64(per_piece),
            );
        }
    }
}

fn text_update(event_id: &str, text: &str) -> AttributeUpdate {
    AttributeUpdate {
        event_id: event_id.to_string(),
        html: text.to_string(),
        swap: SwapMode::InnerHtml,
    }
}

fn attribute_update(event_id: &str, _attribute: &str, value: &str) -> AttributeUpdate {
    AttributeUpdate {
        event_id: event_id.to_string(),
        html: value.to_string(),
        swap: SwapMode::Attribute(_attribute.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_skill_downgrades_to_utterance_undetected() {
        let (renderer, mut frames) = gui::renderer::spawn();
        let machine = StatusMachine::new(renderer);
        machine.process_event(
            "recognizer_loop:utterance",
            &serde_json::json!({ "utterances": ["hi"], "skill_id": UNKNOWN_SKILL }),
        );
        let frame = frames.recv().await.unwrap();
        assert_eq!(frame.event_id, "status-speech");
    }

    #[tokio::test]
    async fn spinner_event_without_utterance_only_touches_spinner() {
        let (renderer, mut frames) = gui::renderer::spawn();
        let machine = StatusMachine::new(renderer);
        machine.process_event("recognizer_loop:wakeword", &serde_json::json!({}));
        let frame = frames.recv().await.unwrap();
        assert_eq!(frame.event_id, "status-spinner");
    }
}
