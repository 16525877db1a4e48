//! Server-side cursor state of a data query.

use crate::transport::{QueryFetchResponse, QueryId};
use serde_json::Value;
use std::collections::VecDeque;

/// Rows of the current page of an open server cursor.
#[derive(Debug)]
pub struct Cursor {
    query_id: QueryId,
    page: VecDeque<Vec<Value>>,
    last_page: bool,
}

impl Cursor {
    /// Cursor for `query_id`, before the first page arrives.
    pub fn new(query_id: QueryId) -> Self {
        Self {
            query_id,
            page: VecDeque::new(),
            last_page: false,
        }
    }

    /// Server-side identifier.
    pub fn query_id(&self) -> QueryId {
        self.query_id
    }

    /// Whether the current page is used up and another one exists.
    pub fn needs_data(&self) -> bool {
        self.page.is_empty() && !self.last_page
    }

    /// Whether any row may still be returned.
    pub fn has_data(&self) -> bool {
        !self.page.is_empty() || !self.last_page
    }

    /// Replace the current page with a freshly fetched one.
    pub fn update_data(&mut self, response: QueryFetchResponse) {
        self.page = response.rows.into();
        self.last_page = response.last;
    }

    /// Next row of the current page, left in place.
    pub fn peek_row(&self) -> Option<&[Value]> {
        self.page.front().map(Vec::as_slice)
    }

    /// Drop the row returned by [`Cursor::peek_row`].
    pub fn advance(&mut self) {
        self.page.pop_front();
    }
}
