//! Pagination module
//!
//! Walks a record list page by page using the opaque `offset` cursor the API
//! returns with every page.
//!
//! # Overview
//!
//! A `ListPager` starts in `AwaitingFirstPage`, moves to `AwaitingNextPage`
//! while the API keeps handing out cursors, and ends in `Done` once a page
//! arrives without one. Calling `next_page` after that yields
//! `Error::EndOfList` without touching the network. A failed fetch leaves
//! the pager exactly where it was, so the same page can be retried.

mod pager;

pub use pager::{ListPager, ListSource, PagerState};
