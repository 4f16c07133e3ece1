//! HTTP handlers for the six endpoints the browser talks to: the document
//! shell, the SSE update stream, ping, and the two callback routes.

use crate::document::render_shell;
use crate::error::{Error, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse};
use gui::{CallbackOutcome, DomEvent};
use log::*;
use service::AppState;
use sse::SseFrame;
use std::collections::HashMap;
use std::convert::Infallible;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session_id = state.sessions.register();
    Html(render_shell(&session_id, state.config.ping_period.as_secs_f64()))
}

pub async fn updates(State(state): State<AppState>) -> Sse<impl futures_core::Stream<Item = std::result::Result<Event, Infallible>>> {
    let mut subscription = state.sse.subscribe();
    let stream = async_stream::stream! {
        while let Some(frame) = subscription.recv().await {
            yield Ok(frame.to_wire());
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn ping(State(state): State<AppState>, Path(session_id): Path<String>) -> StatusCode {
    if state.sessions.ping(&session_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn extract_dom_event(params: &HashMap<String, String>) -> Result<DomEvent> {
    let raw = params
        .get("event")
        .ok_or_else(|| Error::BadRequest("missing event payload".to_string()))?;
    DomEvent::from_json(raw).map_err(|e| Error::BadRequest(format!("malformed event payload: {e}")))
}

pub async fn local_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>> {
    let dom_event = extract_dom_event(&params)?;

    let (namespace, page_id) = {
        let coordinator = state.coordinator.lock().unwrap();
        coordinator
            .lookup_event(&event_id)
            .cloned()
            .ok_or_else(|| gui::GuiError::callback_not_found(&event_id))?
    };

    let coordinator = state.coordinator.lock().unwrap();
    let Some(page) = coordinator.page_group(&namespace).and_then(|g| g.page(&page_id)) else {
        return Err(gui::GuiError::page_not_found(&page_id).into());
    };

    match page.trigger_callback(&event_id, &dom_event)? {
        CallbackOutcome::Local(html) => Ok(Html(html)),
        CallbackOutcome::Global(_) => {
            warn!("local-event {event_id} resolved to a global callback, returning empty fragment");
            Ok(Html(String::new()))
        }
    }
}

pub async fn global_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode> {
    let dom_event = extract_dom_event(&params)?;

    let (namespace, page_id) = {
        let coordinator = state.coordinator.lock().unwrap();
        coordinator
            .lookup_event(&event_id)
            .cloned()
            .ok_or_else(|| gui::GuiError::callback_not_found(&event_id))?
    };

    let outcome = {
        let coordinator = state.coordinator.lock().unwrap();
        let Some(page) = coordinator.page_group(&namespace).and_then(|g| g.page(&page_id)) else {
            return Err(gui::GuiError::page_not_found(&page_id).into());
        };
        page.trigger_callback(&event_id, &dom_event)?
    };

    if let CallbackOutcome::Global(Some(push)) = outcome {
        state.sse.publish(SseFrame::new(push.event_id, push.html));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assets_not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
