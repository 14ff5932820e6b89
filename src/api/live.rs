//! Server-Sent-Event endpoints streaming live query snapshots.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::auth::Viewer;
use crate::errors::AppError;
use crate::listing::ToolQuery;
use crate::live;
use crate::AppState;

/// GET /api/tools/live - Stream tool listing snapshots.
pub async fn live_tools(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<ToolQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let directory = state.directory.clone();
    let snapshots = live::subscribe(state.repo.changes(), move || {
        let directory = directory.clone();
        let viewer = viewer.clone();
        let query = query.clone();
        async move { directory.list_tools(&viewer, &query).await }
    });

    Sse::new(snapshots.map(snapshot_event)).keep_alive(KeepAlive::default())
}

/// GET /api/categories/live - Stream category list snapshots.
pub async fn live_categories(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let directory = state.directory.clone();
    let snapshots = live::subscribe(state.repo.changes(), move || {
        let directory = directory.clone();
        async move { directory.list_categories().await }
    });

    Sse::new(snapshots.map(snapshot_event)).keep_alive(KeepAlive::default())
}

fn snapshot_event<T: Serialize>(snapshot: Result<T, AppError>) -> Result<Event, Infallible> {
    let event = match snapshot {
        Ok(data) => match Event::default().event("snapshot").json_data(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Failed to encode live snapshot: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        },
        Err(e) => {
            tracing::warn!("Live query failed: {}", e);
            Event::default().event("error").data(e.message())
        }
    };
    Ok(event)
}
