//! The static HTML shell served from `GET /`. The actual page content
//! arrives over the `/updates` SSE stream once the browser connects — this
//! shell only needs the root/dialog swap targets, the SSE subscription, and
//! a freshly assigned session id wired into the ping loop.

pub fn render_shell(session_id: &str, ping_period_secs: f64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>OVOS GUI</title>
    <script src="/assets/htmx.min.js"></script>
    <script src="/assets/htmx-sse.js"></script>
</head>
<body hx-ext="sse" sse-connect="/updates">
    <div id="root" sse-swap="root" hx-swap="innerHTML"></div>
    <dialog id="dialog" sse-swap="dialog" hx-swap="outerHTML"></dialog>
    <div id="session-id"
         data-session-id="{session_id}"
         hx-post="/ping/{session_id}"
         hx-trigger="every {ping_period_secs}s"
         hx-swap="none">
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_wires_the_assigned_session_id_into_the_ping_url() {
        let html = render_shell("deadbeef", 30.0);
        assert!(html.contains("hx-post=\"/ping/deadbeef\""));
        assert!(html.contains("sse-swap=\"root\""));
    }
}
