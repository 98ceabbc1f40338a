//! Read path and the Working Draft.
//!
//! Reading an article never mutates it; view counting is its own store call.
//! Editing happens on an [`EditSession`], which owns a deep copy of the
//! persisted blocks. Nothing the author does to the session reaches the store
//! until [`EditSession::publish`] succeeds.

use crate::auth::{User, ensure_owner};
use crate::composer::{BlockId, Composer};
use crate::error::{PressError, Result};
use crate::model::{Article, ArticleId, Block};
use crate::publisher::Publisher;
use crate::store::DocumentStore;

pub fn load<S: DocumentStore + ?Sized>(store: &S, id: &ArticleId) -> Result<Article> {
    store.get(id)
}

/// Count one view. Returns the new total.
pub fn record_view<S: DocumentStore + ?Sized>(store: &mut S, id: &ArticleId) -> Result<u64> {
    let views = store.increment_views(id)?;
    tracing::debug!(%id, views, "Recorded view");
    Ok(views)
}

/// An owner's in-progress edit of a persisted article.
#[derive(Debug)]
pub struct EditSession {
    article_id: ArticleId,
    title: String,
    composer: Composer,
    saved: bool,
}

impl EditSession {
    /// Enter edit mode. Only the signed-in owner may.
    pub fn start(article: &Article, user: Option<&User>) -> Result<Self> {
        let user = user.ok_or(PressError::NotSignedIn)?;
        ensure_owner(user, article)?;
        Ok(Self {
            article_id: article.id.clone(),
            title: article.title.clone(),
            composer: Composer::from_blocks(&article.blocks),
            saved: false,
        })
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Any change makes the draft unsaved again.
    pub fn composer_mut(&mut self) -> &mut Composer {
        self.saved = false;
        &mut self.composer
    }

    /// Stage the draft locally. Persists nothing.
    pub fn save_draft(&mut self) {
        self.saved = true;
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Drop the draft. The stored article is untouched.
    pub fn cancel(self) {
        tracing::debug!(id = %self.article_id, "Edit cancelled");
    }

    /// Overwrite the article's blocks with this draft.
    ///
    /// On failure the session comes back with the error so the author keeps
    /// their work (including any images already uploaded).
    pub fn publish<S: DocumentStore + ?Sized>(
        mut self,
        publisher: &Publisher<'_>,
        store: &mut S,
        user: &User,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> std::result::Result<Article, (Self, PressError)> {
        match publisher.publish_revision(store, user, &self.article_id, &mut self.composer, on_progress) {
            Ok(article) => Ok(article),
            Err(e) => Err((self, e)),
        }
    }
}

/// Plain-text rendering, blocks in order.
pub fn render_plain(article: &Article) -> String {
    article
        .blocks
        .iter()
        .map(|block| match block {
            Block::Text { value } => value.clone(),
            Block::Image { url, caption } => format!("[image: {}] {}", caption, url),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
