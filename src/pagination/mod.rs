//! Offset pagination with stuck-cursor detection
//!
//! The searchanalytics endpoint pages by row offset: a page returning
//! exactly `row_limit` rows implies more data, fewer rows (including zero)
//! means the range is exhausted. The cursor is an immutable value replaced
//! wholesale each page; the previous offset is carried so a cursor that
//! stops advancing is caught instead of looping forever.

use crate::error::{Error, Result};

/// Decision after processing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    /// More pages expected; fetch at this cursor next
    Next(PageCursor),
    /// Range exhausted, normal termination
    Done,
}

impl PageTurn {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Immutable pagination cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Offset the next fetch starts at
    pub current_offset: u32,
    /// Offset of the previously fetched page, if any
    pub previous_offset: Option<u32>,
}

impl PageCursor {
    /// Cursor for the first page of a run
    pub fn start() -> Self {
        Self {
            current_offset: 0,
            previous_offset: None,
        }
    }

    /// Decide the next page from the row count of the page just fetched
    /// at `current_offset`.
    ///
    /// A full page proposes `current_offset + row_limit`; a short page
    /// (including empty) ends the run. A proposed offset that does not
    /// move past the page just fetched, or that revisits the previous
    /// page's offset, is a stuck cursor and aborts the run.
    pub fn turn(self, rows_returned: usize, row_limit: u32) -> Result<PageTurn> {
        if rows_returned < row_limit as usize {
            return Ok(PageTurn::Done);
        }

        let next_offset = self.current_offset + row_limit;
        if next_offset == self.current_offset || Some(next_offset) == self.previous_offset {
            return Err(Error::PaginationLoop {
                offset: self.current_offset,
            });
        }

        Ok(PageTurn::Next(Self {
            current_offset: next_offset,
            previous_offset: Some(self.current_offset),
        }))
    }
}
