//! SSE stream of resource changes.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::broadcast::error::RecvError;

use ipvault_core::resource::ResourceEvent;

use crate::state::AppState;

fn to_sse_event(event: &ResourceEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().event(event.event_type()).data(data)),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize resource event");
            None
        }
    }
}

/// SSE endpoint for resource events (GET /api/events).
///
/// Streams every create, update and delete performed after the client
/// connected. The stream ends when the server shuts down.
pub async fn events_sse(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let mut events_rx = state.subscribe_events();
    let mut shutdown_rx = state.subscribe_shutdown();

    let stream = async_stream::stream! {
        loop {
            let received = tokio::select! {
                received = events_rx.recv() => received,
                _ = shutdown_rx.recv() => {
                    tracing::info!("SSE session received shutdown signal");
                    break;
                }
            };

            match received {
                Ok(event) => {
                    if let Some(sse_event) = to_sse_event(&event) {
                        yield Ok(sse_event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
