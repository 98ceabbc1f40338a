use crate::error::Result;
use crate::model::{Article, ArticleId};

/// Abstract interface for raw document I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while ArticleStore handles the "what" (ids, ordering, pagination).
pub trait StorageBackend {
    /// Read one document.
    /// Returns Ok(None) if it does not exist.
    /// Returns Err only on actual I/O or decoding errors.
    fn read(&self, id: &ArticleId) -> Result<Option<Article>>;

    /// Write one document, replacing any previous version.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, article: &Article) -> Result<()>;

    /// Remove one document. Returns false if there was nothing to remove.
    fn remove(&self, id: &ArticleId) -> Result<bool>;

    /// Every stored document, in no particular order.
    fn load_all(&self) -> Result<Vec<Article>>;
}
