use super::backend::StorageBackend;
use crate::error::{PressError, Result};
use crate::model::{Article, ArticleId};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since publishing is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    documents: RefCell<HashMap<ArticleId, Article>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Number of successful document writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, id: &ArticleId) -> Result<Option<Article>> {
        Ok(self.documents.borrow().get(id).cloned())
    }

    fn write(&self, article: &Article) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(PressError::Store("Simulated write error".to_string()));
        }
        self.documents
            .borrow_mut()
            .insert(article.id.clone(), article.clone());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&self, id: &ArticleId) -> Result<bool> {
        if *self.simulate_write_error.borrow() {
            return Err(PressError::Store("Simulated write error".to_string()));
        }
        Ok(self.documents.borrow_mut().remove(id).is_some())
    }

    fn load_all(&self) -> Result<Vec<Article>> {
        Ok(self.documents.borrow().values().cloned().collect())
    }
}
