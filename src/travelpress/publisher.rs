//! # Publisher
//!
//! Turns a composer's block sequence into a persisted article (first publish)
//! or a new block sequence for an existing article (revision).
//!
//! ## Algorithm
//!
//! 1. **Validate** top-level fields. A missing title fails here and nothing
//!    else happens.
//! 2. **Resolve** blocks strictly left to right, one at a time:
//!    - text passes through;
//!    - an image with a pending file is compressed (falling back to the
//!      original on encode failure) and uploaded, reporting progress for that
//!      block's id; its url is written back into the composer so a retried
//!      publish does not upload the same file twice;
//!    - an image without a pending file passes through unchanged.
//!
//!    The first decode or upload failure aborts the whole publish.
//! 3. **Write** the resolved sequence with one document write. This is the only
//!    persistence step, so a failure anywhere earlier leaves the stored article
//!    exactly as it was.
//!
//! Uploads are sequential on purpose: progress is reported per block in order
//! and the hosted upload quota is small.

use crate::auth::{User, ensure_owner};
use crate::composer::{BlockId, Composer};
use crate::error::{PressError, Result};
use crate::imaging::{CompressParams, ImageBackend, compress_or_original};
use crate::model::{Article, ArticleId, Block, NewArticle};
use crate::store::DocumentStore;
use crate::upload::FileUploader;
use chrono::Utc;

/// Top-level fields of a new article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMeta {
    pub title: String,
    pub province: String,
}

impl ArticleMeta {
    pub fn new(title: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            province: province.into(),
        }
    }

    fn validated(&self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PressError::validation("title", "Please provide a title."));
        }
        Ok(Self {
            title: title.to_string(),
            province: self.province.trim().to_string(),
        })
    }
}

pub struct Publisher<'a> {
    imaging: &'a dyn ImageBackend,
    uploader: &'a dyn FileUploader,
    params: CompressParams,
}

impl<'a> Publisher<'a> {
    pub fn new(
        imaging: &'a dyn ImageBackend,
        uploader: &'a dyn FileUploader,
        params: CompressParams,
    ) -> Self {
        Self {
            imaging,
            uploader,
            params,
        }
    }

    pub fn publish_new<S: DocumentStore + ?Sized>(
        &self,
        store: &mut S,
        user: &User,
        meta: &ArticleMeta,
        composer: &mut Composer,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> Result<Article> {
        let meta = meta.validated()?;
        tracing::info!(title = %meta.title, blocks = composer.len(), "Publishing new article");

        let blocks = self.resolve_blocks(composer, on_progress)?;
        let article = store.create(NewArticle {
            title: meta.title,
            province: meta.province,
            blocks,
            author: user.email.clone(),
            owner_id: user.uid.clone(),
            created_at: Utc::now(),
        })?;

        tracing::info!(id = %article.id, "Article published");
        Ok(article)
    }

    /// Overwrite the block sequence of an article the user owns. Last write wins.
    pub fn publish_revision<S: DocumentStore + ?Sized>(
        &self,
        store: &mut S,
        user: &User,
        id: &ArticleId,
        composer: &mut Composer,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> Result<Article> {
        let current = store.get(id)?;
        ensure_owner(user, &current)?;
        tracing::info!(%id, blocks = composer.len(), "Publishing revision");

        let blocks = self.resolve_blocks(composer, on_progress)?;
        let article = store.replace_blocks(id, blocks)?;

        tracing::info!(%id, "Revision published");
        Ok(article)
    }

    /// Upload whatever is pending and return the persistable sequence, in order.
    pub fn resolve_blocks(
        &self,
        composer: &mut Composer,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> Result<Vec<Block>> {
        composer.clear_progress();

        let pending: Vec<(BlockId, _)> = composer
            .blocks()
            .iter()
            .filter_map(|b| b.pending_file().map(|f| (b.id, f.clone())))
            .collect();

        for (id, file) in pending {
            let prepared = compress_or_original(self.imaging, &file, &self.params)?;

            let mut progress = |pct: u8| {
                composer.set_progress(id, pct);
                on_progress(id, pct);
            };
            let uploaded = self.uploader.upload(&prepared, &mut progress)?;

            composer.set_uploaded_url(id, uploaded.url)?;
            composer.set_progress(id, 100);
            on_progress(id, 100);
        }

        Ok(composer.to_blocks())
    }
}
