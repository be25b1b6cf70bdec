//! Paginated extraction loop
//!
//! Drives repeated bounded queries against the search-analytics service,
//! reshapes each result row into a `CanonicalRecord`, and yields records
//! lazily through a pull-driven `Stream`. Pages are strictly sequential:
//! each page's returned row count decides whether another fetch happens,
//! and a fetch is only issued when the consumer polls past the buffered
//! page. Dropping the stream issues no further network calls.
//!
//! The date range is fixed for the entire run: one day after the previous
//! checkpoint (or the configured start date when none exists) through one
//! day before the current processing time, since the API does not reliably
//! report same-day data.

use crate::error::Result;
use crate::pagination::{PageCursor, PageTurn};
use crate::record::{reshape, CanonicalRecord};
use crate::service::{AnalyticsService, QuerySpec, ResultRow};
use chrono::{Days, NaiveDate};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

/// Stream name used for checkpoints and diagnostics
pub const STREAM_NAME: &str = "search_analytics";

/// Inclusive date range for one extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First date requested
    pub start: NaiveDate,
    /// Last date requested; persisted as the checkpoint after a clean run
    pub end: NaiveDate,
}

impl DateWindow {
    /// Compute the window for a run.
    ///
    /// `checkpoint` is the last successfully replicated date from prior
    /// state; `configured_start` is used when no checkpoint exists.
    pub fn for_run(
        checkpoint: Option<NaiveDate>,
        configured_start: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let start = match checkpoint {
            Some(date) => date + Days::new(1),
            None => configured_start,
        };
        let end = today - Days::new(1);
        Self { start, end }
    }

    /// An empty window means the checkpoint has already caught up to the
    /// freshest date the API reports reliably; nothing to fetch.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// The paginated extraction loop over one site's search analytics
pub struct SearchAnalyticsStream<S> {
    service: Arc<S>,
    dimensions: Arc<Vec<String>>,
    row_limit: u32,
    window: DateWindow,
}

impl<S: AnalyticsService + 'static> SearchAnalyticsStream<S> {
    /// Create a stream over the given service handle
    pub fn new(
        service: Arc<S>,
        dimensions: Vec<String>,
        row_limit: u32,
        window: DateWindow,
    ) -> Self {
        Self {
            service,
            dimensions: Arc::new(dimensions),
            row_limit,
            window,
        }
    }

    /// The window this run covers
    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Yield canonical records lazily, in API order.
    ///
    /// Errors propagate through the stream and end it: transient request
    /// failures, stuck cursors and malformed rows are never swallowed.
    /// Records yielded before an error stand.
    pub fn records(&self) -> impl Stream<Item = Result<CanonicalRecord>> + Send {
        let state = RunState {
            service: Arc::clone(&self.service),
            dimensions: Arc::clone(&self.dimensions),
            row_limit: self.row_limit,
            window: self.window,
            cursor: if self.window.is_empty() {
                info!(
                    start = %self.window.start,
                    end = %self.window.end,
                    "Date window is empty, nothing to fetch"
                );
                None
            } else {
                Some(PageCursor::start())
            },
            last_fetch: None,
            page_offset: 0,
            pending: VecDeque::new(),
        };

        stream::try_unfold(state, |mut st| async move {
            loop {
                // Drain the buffered page first
                if let Some(row) = st.pending.pop_front() {
                    let record = reshape(&row, &st.dimensions, st.page_offset)?;
                    return Ok(Some((record, st)));
                }

                // Page drained: decide whether another page exists
                if let Some((cursor, rows_returned)) = st.last_fetch.take() {
                    st.cursor = match cursor.turn(rows_returned, st.row_limit)? {
                        PageTurn::Next(next) => Some(next),
                        PageTurn::Done => None,
                    };
                    continue;
                }

                // Fetch the next page, or finish
                let Some(cursor) = st.cursor.take() else {
                    info!("Extraction complete");
                    return Ok(None);
                };

                let spec = QuerySpec {
                    start_date: st.window.start,
                    end_date: st.window.end,
                    dimensions: (*st.dimensions).clone(),
                    row_limit: st.row_limit,
                    start_row: cursor.current_offset,
                };
                let response = st.service.query(&spec).await?;
                debug!(
                    offset = cursor.current_offset,
                    rows = response.rows.len(),
                    "Fetched page"
                );

                st.page_offset = cursor.current_offset;
                st.last_fetch = Some((cursor, response.rows.len()));
                st.pending = response.rows.into();
            }
        })
    }
}

/// Mutable loop state threaded through the unfold
struct RunState<S> {
    service: Arc<S>,
    dimensions: Arc<Vec<String>>,
    row_limit: u32,
    window: DateWindow,
    /// Cursor for the next fetch; `None` once the range is exhausted
    cursor: Option<PageCursor>,
    /// Cursor and row count of the page just drained, pending the
    /// pagination decision
    last_fetch: Option<(PageCursor, usize)>,
    /// Offset of the page currently buffered, for error diagnostics
    page_offset: u32,
    /// Rows of the current page, yielded one at a time
    pending: VecDeque<ResultRow>,
}
