//! Row-by-row scanning of TabSeparated results.
//!
//! The full response body is fetched before the first row is read; rows are
//! then parsed lazily, one line per [`RowIter::scan`] call.

use crate::error::{ClickHouseError, DecodeError};
use crate::types::tsv::{FIELD_SEPARATOR, ROW_SEPARATOR};
use crate::types::unmarshal::{unmarshal, ScanTarget};
use std::ops::Range;
use tracing::warn;

/// Position of a [`RowIter`] in its single pass over the body.
#[derive(Debug)]
enum IterState {
    /// No line consumed yet
    Fresh,
    /// At least one row produced
    Streaming,
    /// Buffer drained
    Exhausted,
    /// Sticky failure; no further parsing
    Failed(ClickHouseError),
}

/// Forward-only cursor over a TabSeparated response.
///
/// Follows the "advance, then check the error" pattern:
///
/// ```no_run
/// # use chquery::{Connection, Query};
/// # async fn example(conn: &Connection) {
/// let mut iter = Query::new("SELECT name, hits FROM visits").iter(conn).await;
/// let (mut name, mut hits) = (String::new(), 0u64);
/// while iter.scan(&mut [&mut name, &mut hits]) {
///     println!("{name}: {hits}");
/// }
/// if let Some(err) = iter.error() {
///     eprintln!("query failed: {err}");
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct RowIter {
    /// Response body
    text: String,
    /// Bytes of `text` already consumed
    offset: usize,
    state: IterState,
}

impl RowIter {
    /// Iterator over a successfully fetched body.
    pub(crate) fn new(text: String) -> Self {
        Self {
            text,
            offset: 0,
            state: IterState::Fresh,
        }
    }

    /// Iterator that is failed from the start.
    pub(crate) fn failed(err: ClickHouseError) -> Self {
        Self {
            text: String::new(),
            offset: 0,
            state: IterState::Failed(err),
        }
    }

    /// The sticky error, if any.
    ///
    /// `None` after a `false` scan means the data simply ran out.
    pub fn error(&self) -> Option<&ClickHouseError> {
        match &self.state {
            IterState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Remaining unconsumed bytes of the body.
    ///
    /// This is a buffer-size probe, not a row count.
    pub fn len(&self) -> usize {
        self.text.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance one line and write its fields into `dest`, in order.
    ///
    /// Returns `false` when there are no more rows, when the line has fewer
    /// fields than `dest` has slots, or when a field fails to convert. Only the
    /// last case sets [`RowIter::error`], and from then on every call returns
    /// `false`. Extra fields beyond `dest.len()` are ignored.
    pub fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> bool {
        if matches!(self.state, IterState::Failed(_) | IterState::Exhausted) {
            return false;
        }

        let range = self.next_line();
        if range.is_empty() {
            if self.is_empty() {
                self.state = IterState::Exhausted;
            }
            return false;
        }
        self.state = IterState::Streaming;

        let fields: Vec<&str> = self.text[range].split(FIELD_SEPARATOR).collect();
        if fields.len() < dest.len() {
            warn!(
                fields = fields.len(),
                expected = dest.len(),
                "row has fewer fields than destinations, treating as end of data"
            );
            return false;
        }

        for (column, (target, field)) in dest.iter_mut().zip(&fields).enumerate() {
            if let Err(source) = unmarshal(&mut **target, field) {
                self.state = IterState::Failed(DecodeError::FieldConversion { column, source }.into());
                return false;
            }
        }
        true
    }

    /// Consume the next line and return its byte range within `text`.
    ///
    /// A final line without a trailing separator is returned whole.
    fn next_line(&mut self) -> Range<usize> {
        let start = self.offset;
        match self.text[start..].find(ROW_SEPARATOR) {
            Some(pos) => {
                self.offset = start + pos + 1;
                start..start + pos
            }
            None => {
                self.offset = self.text.len();
                start..self.text.len()
            }
        }
    }
}
