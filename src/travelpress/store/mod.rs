//! # Storage Layer
//!
//! The [`DocumentStore`] trait is the application's view of the hosted document
//! collection that holds articles. The publisher and the viewer are its only
//! consumers in the core.
//!
//! ## Split Between Logic and I/O
//!
//! - [`backend::StorageBackend`] handles the "how": raw document reads and writes.
//! - [`article_store::ArticleStore`] handles the "what": id assignment, ordering,
//!   cursor pagination, view counters. It implements [`DocumentStore`] for any backend.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON document per article in a data directory.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.
//!
//! ## Write Semantics
//!
//! Every mutation is a single whole-document write. Block sequences are only
//! ever replaced in full; there are no field-level block updates. Concurrent
//! writers race at this layer and the last write wins.
//!
//! ## Pagination
//!
//! Listing is ordered by `created_at` descending, ties broken by id descending so
//! the order is total. A [`Cursor`] names the last item of a page; the next page
//! starts strictly after it, so pages of a stable dataset never overlap.
//!
//! ## Storage Layout
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── config.json             # Configuration
//! ├── session.json            # Signed-in user
//! └── articles/
//!     └── article-{id}.json   # One document per article
//! ```

use crate::error::Result;
use crate::model::{Article, ArticleId, Block, NewArticle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod article_store;
pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// Position in the listing order, taken from the last article of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: ArticleId,
}

impl Cursor {
    pub fn of(article: &Article) -> Self {
        Self {
            created_at: article.created_at,
            id: article.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: usize,
    pub start_after: Option<Cursor>,
    /// Only articles from this province.
    pub province: Option<String>,
}

impl PageQuery {
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            start_after: None,
            province: None,
        }
    }

    pub fn after(limit: usize, cursor: Cursor) -> Self {
        Self {
            limit,
            start_after: Some(cursor),
            province: None,
        }
    }

    pub fn in_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub articles: Vec<Article>,
    /// `None` once a page comes back short: there is nothing after it.
    pub next_cursor: Option<Cursor>,
}

/// Abstract interface for article documents.
pub trait DocumentStore {
    /// Persist a new article, assigning its id.
    fn create(&mut self, article: NewArticle) -> Result<Article>;

    /// Get an article by id
    fn get(&self, id: &ArticleId) -> Result<Article>;

    /// Overwrite the whole block sequence of an existing article.
    fn replace_blocks(&mut self, id: &ArticleId, blocks: Vec<Block>) -> Result<Article>;

    /// Delete an article permanently
    fn delete(&mut self, id: &ArticleId) -> Result<()>;

    /// One page of articles, newest first.
    fn query(&self, query: &PageQuery) -> Result<Page>;

    /// Total number of articles
    fn count(&self) -> Result<usize>;

    /// Bump the view counter, returning the new value.
    fn increment_views(&mut self, id: &ArticleId) -> Result<u64>;
}
