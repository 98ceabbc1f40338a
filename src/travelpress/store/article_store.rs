use super::backend::StorageBackend;
use super::{Cursor, DocumentStore, Page, PageQuery};
use crate::error::{PressError, Result};
use crate::model::{Article, ArticleId, Block, NewArticle};
use std::cmp::Ordering;

/// Document store logic over any [`StorageBackend`].
pub struct ArticleStore<B: StorageBackend> {
    pub(crate) backend: B,
}

impl<B: StorageBackend> ArticleStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn load(&self, id: &ArticleId) -> Result<Article> {
        self.backend
            .read(id)?
            .ok_or_else(|| PressError::ArticleNotFound(id.to_string()))
    }
}

/// Newest first; id breaks ties so the order is total.
fn listing_order(a: &Article, b: &Article) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn is_after(article: &Article, cursor: &Cursor) -> bool {
    (article.created_at, &article.id) < (cursor.created_at, &cursor.id)
}

pub(crate) fn paginate(mut articles: Vec<Article>, query: &PageQuery) -> Result<Page> {
    if query.limit == 0 {
        return Err(PressError::validation("limit", "must be at least 1"));
    }
    if let Some(province) = &query.province {
        articles.retain(|a| &a.province == province);
    }
    articles.sort_by(listing_order);

    let page: Vec<Article> = articles
        .into_iter()
        .filter(|a| query.start_after.as_ref().is_none_or(|c| is_after(a, c)))
        .take(query.limit)
        .collect();

    let next_cursor = if page.len() == query.limit {
        page.last().map(Cursor::of)
    } else {
        None
    };
    Ok(Page {
        articles: page,
        next_cursor,
    })
}

impl<B: StorageBackend> DocumentStore for ArticleStore<B> {
    fn create(&mut self, new: NewArticle) -> Result<Article> {
        let mut id = ArticleId::generate();
        while self.backend.read(&id)?.is_some() {
            id = ArticleId::generate();
        }
        let article = Article::from_new(id, new);
        self.backend.write(&article)?;
        tracing::debug!(id = %article.id, blocks = article.blocks.len(), "Created article");
        Ok(article)
    }

    fn get(&self, id: &ArticleId) -> Result<Article> {
        self.load(id)
    }

    fn replace_blocks(&mut self, id: &ArticleId, blocks: Vec<Block>) -> Result<Article> {
        let mut article = self.load(id)?;
        article.blocks = blocks;
        self.backend.write(&article)?;
        tracing::debug!(id = %article.id, blocks = article.blocks.len(), "Replaced article blocks");
        Ok(article)
    }

    fn delete(&mut self, id: &ArticleId) -> Result<()> {
        if !self.backend.remove(id)? {
            return Err(PressError::ArticleNotFound(id.to_string()));
        }
        Ok(())
    }

    fn query(&self, query: &PageQuery) -> Result<Page> {
        paginate(self.backend.load_all()?, query)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.backend.load_all()?.len())
    }

    fn increment_views(&mut self, id: &ArticleId) -> Result<u64> {
        let mut article = self.load(id)?;
        article.views += 1;
        self.backend.write(&article)?;
        Ok(article.views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::store::memory::fixtures::StoreFixture;
    use std::collections::HashSet;

    #[test]
    fn create_assigns_id_and_zero_views() {
        let fixture = StoreFixture::new().with_articles(1);
        let all = fixture.store.query(&PageQuery::first(10)).unwrap();
        assert_eq!(all.articles.len(), 1);
        assert_eq!(all.articles[0].views, 0);
        assert!(!all.articles[0].id.as_str().is_empty());
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.get(&ArticleId::new("nope")),
            Err(PressError::ArticleNotFound(_))
        ));
    }

    #[test]
    fn pages_are_disjoint_and_newest_first() {
        let fixture = StoreFixture::new().with_articles(14);
        let store = &fixture.store;

        let mut seen = HashSet::new();
        let mut all = Vec::new();
        let mut query = PageQuery::first(6);
        let mut pages = 0;
        loop {
            let page = store.query(&query).unwrap();
            pages += 1;
            for a in &page.articles {
                assert!(seen.insert(a.id.clone()), "duplicate across pages");
                all.push(a.clone());
            }
            match page.next_cursor {
                Some(c) => query = PageQuery::after(6, c),
                None => break,
            }
        }
        assert_eq!(pages, 3);
        assert_eq!(all.len(), 14);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn ties_on_created_at_still_paginate_cleanly() {
        let fixture = StoreFixture::new().with_articles_at_same_instant(5);
        let first = fixture.store.query(&PageQuery::first(2)).unwrap();
        let second = fixture
            .store
            .query(&PageQuery::after(2, first.next_cursor.clone().unwrap()))
            .unwrap();
        let third = fixture
            .store
            .query(&PageQuery::after(2, second.next_cursor.clone().unwrap()))
            .unwrap();
        let ids: HashSet<_> = first
            .articles
            .iter()
            .chain(&second.articles)
            .chain(&third.articles)
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(ids.len(), 5);
        assert!(third.next_cursor.is_none());
    }

    #[test]
    fn province_filter() {
        let fixture = StoreFixture::new()
            .with_article_in("Palawan")
            .with_article_in("Bohol")
            .with_article_in("Palawan");
        let page = fixture
            .store
            .query(&PageQuery::first(10).in_province("Palawan"))
            .unwrap();
        assert_eq!(page.articles.len(), 2);
        assert!(page.articles.iter().all(|a| a.province == "Palawan"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.query(&PageQuery::first(0)),
            Err(PressError::Validation { field: "limit", .. })
        ));
    }

    #[test]
    fn replace_blocks_overwrites_whole_sequence() {
        let mut fixture = StoreFixture::new().with_articles(1);
        let id = fixture.first_id();
        let updated = fixture
            .store
            .replace_blocks(&id, vec![Block::image("u", "c")])
            .unwrap();
        assert_eq!(updated.blocks, vec![Block::image("u", "c")]);
        assert_eq!(fixture.store.get(&id).unwrap().blocks, updated.blocks);
    }

    #[test]
    fn views_increment_independently() {
        let mut fixture = StoreFixture::new().with_articles(1);
        let id = fixture.first_id();
        assert_eq!(fixture.store.increment_views(&id).unwrap(), 1);
        assert_eq!(fixture.store.increment_views(&id).unwrap(), 2);
        assert_eq!(fixture.store.get(&id).unwrap().views, 2);
    }

    #[test]
    fn delete_then_missing() {
        let mut fixture = StoreFixture::new().with_articles(2);
        let id = fixture.first_id();
        fixture.store.delete(&id).unwrap();
        assert_eq!(fixture.store.count().unwrap(), 1);
        assert!(matches!(
            fixture.store.delete(&id),
            Err(PressError::ArticleNotFound(_))
        ));
    }
}
