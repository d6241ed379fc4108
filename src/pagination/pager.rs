//! Cursor-driven list pager

use crate::error::{Error, Result};
use crate::params::Parameters;
use crate::types::{Record, RecordList};
use async_trait::async_trait;
use futures::stream::{self, Stream};
use tracing::debug;

/// Anything that can fetch one page of a record list
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Fetch the page selected by `params.offset`
    async fn list(&self, params: &Parameters) -> Result<RecordList>;
}

/// Where a pager is in its walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched yet
    AwaitingFirstPage,
    /// Last page carried a cursor
    AwaitingNextPage,
    /// Last page carried no cursor
    Done,
}

/// Iterates a record list one page at a time
pub struct ListPager<'a, S: ListSource + ?Sized> {
    source: &'a S,
    params: Parameters,
    cursor: String,
    state: PagerState,
    pages: usize,
}

impl<'a, S: ListSource + ?Sized> ListPager<'a, S> {
    /// Start from the first page; any offset already on `params` is dropped
    pub fn new(source: &'a S, mut params: Parameters) -> Self {
        params.offset.clear();
        Self {
            source,
            params,
            cursor: String::new(),
            state: PagerState::AwaitingFirstPage,
            pages: 0,
        }
    }

    /// Continue a walk from a cursor saved by an earlier pager
    pub fn resume(source: &'a S, params: Parameters, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        let mut pager = Self::new(source, params);
        if !cursor.is_empty() {
            pager.cursor = cursor;
            pager.state = PagerState::AwaitingNextPage;
        }
        pager
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Cursor the next fetch will send (empty before the first page)
    pub fn offset(&self) -> &str {
        &self.cursor
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetch the next page.
    ///
    /// Returns `Error::EndOfList` once the list is exhausted. On any other
    /// error the cursor and state are left untouched.
    pub async fn next_page(&mut self) -> Result<Vec<Record>> {
        if self.state == PagerState::Done {
            return Err(Error::EndOfList);
        }

        self.params.offset.clone_from(&self.cursor);
        let page = self.source.list(&self.params).await?;

        self.pages += 1;
        self.cursor = page.offset;
        self.state = if self.cursor.is_empty() {
            PagerState::Done
        } else {
            PagerState::AwaitingNextPage
        };
        debug!(
            table = %self.params.name,
            page = self.pages,
            records = page.records.len(),
            done = self.is_done(),
            "fetched page"
        );

        Ok(page.records)
    }

    /// Drain every remaining page
    pub async fn collect_all(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        loop {
            match self.next_page().await {
                Ok(page) => records.extend(page),
                Err(e) if e.is_end_of_list() => return Ok(records),
                Err(e) => return Err(e),
            }
        }
    }

    /// Yield pages as a stream; the first error other than end-of-list is
    /// yielded and ends the stream
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Record>>> + 'a
    where
        S: 'a,
    {
        stream::unfold(Some(self), |pager| async move {
            let mut pager = pager?;
            match pager.next_page().await {
                Ok(page) => Some((Ok(page), Some(pager))),
                Err(e) if e.is_end_of_list() => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl<S: ListSource + ?Sized> std::fmt::Debug for ListPager<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPager")
            .field("table", &self.params.name)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}
