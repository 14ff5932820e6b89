//! Live query subscriptions.
//!
//! A subscription re-runs its query whenever the repository publishes a new
//! revision and yields the complete result each time. Consumers must treat
//! every item as a full replacement of the previous one. Slow consumers skip
//! intermediate revisions; only the latest one is observed.

use std::future::Future;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::errors::AppError;

/// Subscribe `query` to a revision feed.
///
/// The first snapshot is produced immediately; later ones follow each change.
pub fn subscribe<T, F, Fut>(
    changes: watch::Receiver<i64>,
    query: F,
) -> impl Stream<Item = Result<T, AppError>> + Send
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    WatchStream::new(changes).then(move |revision| {
        tracing::trace!(revision, "Re-running live query");
        query()
    })
}
