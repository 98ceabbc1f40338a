use super::backend::StorageBackend;
use crate::error::{PressError, Result};
use crate::model::{Article, ArticleId};
use std::fs;
use std::path::{Path, PathBuf};

const PREFIX: &str = "article-";
const SUFFIX: &str = ".json";

/// Filesystem backend: one pretty-printed JSON document per article.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, id: &ArticleId) -> Result<PathBuf> {
        let raw = id.as_str();
        // Ids become file names; refuse anything that could escape the root.
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(PressError::Store(format!("Invalid document id: {}", raw)));
        }
        Ok(self.root.join(format!("{}{}{}", PREFIX, raw, SUFFIX)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PressError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, id: &ArticleId) -> Result<Option<Article>> {
        let path = self.document_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(PressError::Io)?;
        let article = serde_json::from_str(&content).map_err(PressError::Serialization)?;
        Ok(Some(article))
    }

    fn write(&self, article: &Article) -> Result<()> {
        self.ensure_dir()?;
        let path = self.document_path(&article.id)?;
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(article).map_err(PressError::Serialization)?;
        fs::write(&tmp, content).map_err(PressError::Io)?;
        fs::rename(&tmp, &path).map_err(PressError::Io)?;
        Ok(())
    }

    fn remove(&self, id: &ArticleId) -> Result<bool> {
        let path = self.document_path(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(PressError::Io)?;
        Ok(true)
    }

    fn load_all(&self) -> Result<Vec<Article>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut articles = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(PressError::Io)? {
            let path = entry.map_err(PressError::Io)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !(name.starts_with(PREFIX) && name.ends_with(SUFFIX)) {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(PressError::Io)?;
            match serde_json::from_str::<Article>(&content) {
                Ok(article) => articles.push(article),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable article document");
                }
            }
        }
        Ok(articles)
    }
}
