use super::article_store::ArticleStore;
use super::fs_backend::FsBackend;
use std::path::PathBuf;

pub type FileStore = ArticleStore<FsBackend>;

impl FileStore {
    /// Store documents under `<data_dir>/articles`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        ArticleStore::with_backend(FsBackend::new(data_dir.into().join("articles")))
    }
}
