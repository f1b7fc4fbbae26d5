use std::convert::Infallible;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use meteo_api::DashboardSnapshot;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use super::DashboardState;

pub async fn sse_handler(State(state): State<DashboardState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Current view first so the page does not wait for the next tick. Subscribing
    // afterwards keeps that redraw from being delivered twice.
    let current = state.dashboard.refresh().await.ok();
    let receiver = state.dashboard.subscribe();

    let stream = tokio_stream::iter(current)
        .chain(BroadcastStream::new(receiver).filter_map(|result| match result {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!("SSE subscriber lagging: {}", e);
                None
            }
        }))
        .filter_map(|snapshot: DashboardSnapshot| match Event::default().event("snapshot").json_data(&snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!("Failed to encode snapshot event: {}", e);
                None
            }
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
