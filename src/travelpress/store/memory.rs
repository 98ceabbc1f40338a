use super::article_store::ArticleStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = ArticleStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        ArticleStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{ArticleId, Block, NewArticle};
    use crate::store::{DocumentStore, PageQuery};
    use chrono::{Duration, Utc};

    pub const OWNER_UID: &str = "uid-editor";
    pub const OWNER_EMAIL: &str = "editor@example.com";

    pub struct StoreFixture {
        pub store: InMemoryStore,
        created: i64,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn new_article(title: &str, province: &str, blocks: Vec<Block>) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            province: province.to_string(),
            blocks,
            author: OWNER_EMAIL.to_string(),
            owner_id: OWNER_UID.to_string(),
            created_at: Utc::now(),
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                created: 0,
            }
        }

        /// Each added article is one minute newer than the previous one.
        fn add(&mut self, title: String, province: &str) {
            let mut article = new_article(
                &title,
                province,
                vec![Block::text(format!("Story of {}", title))],
            );
            article.created_at = Utc::now() - Duration::days(30) + Duration::minutes(self.created);
            self.created += 1;
            self.store.create(article).unwrap();
        }

        pub fn with_articles(mut self, count: usize) -> Self {
            for i in 0..count {
                self.add(format!("Trip {}", i + 1), "Cebu");
            }
            self
        }

        pub fn with_article_in(mut self, province: &str) -> Self {
            self.add(format!("Trip to {}", province), province);
            self
        }

        pub fn with_articles_at_same_instant(mut self, count: usize) -> Self {
            let at = Utc::now();
            for i in 0..count {
                let mut article = new_article(&format!("Same {}", i), "Cebu", vec![]);
                article.created_at = at;
                self.store.create(article).unwrap();
            }
            self
        }

        /// Id of the newest article.
        pub fn first_id(&self) -> ArticleId {
            self.store.query(&PageQuery::first(1)).unwrap().articles[0]
                .id
                .clone()
        }
    }
}
