use crate::commands::{CmdMessage, CmdResult, PageInfo};
use crate::error::{PressError, Result};
use crate::store::{DocumentStore, Page, PageQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    pub province: Option<String>,
    /// Case-insensitive match on title or description, within the page.
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            province: None,
            search: None,
        }
    }
}

pub fn run<S: DocumentStore + ?Sized>(store: &S, query: &ListQuery) -> Result<CmdResult> {
    if query.page == 0 {
        return Err(PressError::validation("page", "pages start at 1"));
    }

    let mut page_query = PageQuery::first(query.page_size);
    if let Some(province) = &query.province {
        page_query = page_query.in_province(province.clone());
    }

    // Walk the cursors forward to the requested page.
    let mut page = store.query(&page_query)?;
    for _ in 1..query.page {
        match page.next_cursor.take() {
            Some(cursor) => {
                page_query.start_after = Some(cursor);
                page = store.query(&page_query)?;
            }
            None => {
                page = Page::default();
                break;
            }
        }
    }

    let has_next = page.next_cursor.is_some();
    let mut articles = page.articles;
    if let Some(term) = query.search.as_deref().map(str::to_lowercase) {
        articles.retain(|a| {
            a.title.to_lowercase().contains(&term) || a.description().to_lowercase().contains(&term)
        });
    }

    let mut result = CmdResult::default();
    if articles.is_empty() {
        result.add_message(CmdMessage::info("No articles found"));
    }
    Ok(result
        .with_listed_articles(articles)
        .with_page(PageInfo {
            number: query.page,
            page_size: query.page_size,
            has_next,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArticleId;
    use crate::store::memory::fixtures::StoreFixture;
    use std::collections::HashSet;

    fn titles(res: &CmdResult) -> Vec<String> {
        res.listed_articles.iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn newest_first_in_pages() {
        let fixture = StoreFixture::new().with_articles(8);
        let first = run(&fixture.store, &ListQuery::new(3)).unwrap();
        assert_eq!(titles(&first), vec!["Trip 8", "Trip 7", "Trip 6"]);
        assert!(first.page.unwrap().has_next);

        let third = run(
            &fixture.store,
            &ListQuery {
                page: 3,
                ..ListQuery::new(3)
            },
        )
        .unwrap();
        assert_eq!(titles(&third), vec!["Trip 2", "Trip 1"]);
        assert!(!third.page.unwrap().has_next);
    }

    #[test]
    fn pages_never_overlap() {
        let fixture = StoreFixture::new()
            .with_articles(4)
            .with_articles_at_same_instant(5);
        let mut seen: HashSet<ArticleId> = HashSet::new();
        for page in 1..=5 {
            let res = run(
                &fixture.store,
                &ListQuery {
                    page,
                    ..ListQuery::new(2)
                },
            )
            .unwrap();
            for article in res.listed_articles {
                assert!(seen.insert(article.id));
            }
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn past_the_end_is_empty() {
        let fixture = StoreFixture::new().with_articles(2);
        let res = run(
            &fixture.store,
            &ListQuery {
                page: 4,
                ..ListQuery::new(2)
            },
        )
        .unwrap();
        assert!(res.listed_articles.is_empty());
        assert_eq!(res.messages[0].content, "No articles found");
    }

    #[test]
    fn filters_by_province_and_search() {
        let fixture = StoreFixture::new()
            .with_articles(3)
            .with_article_in("Palawan")
            .with_article_in("Bohol");

        let mut query = ListQuery::new(10);
        query.province = Some("Palawan".into());
        assert_eq!(titles(&run(&fixture.store, &query).unwrap()), vec!["Trip to Palawan"]);

        let mut query = ListQuery::new(10);
        query.search = Some("BOHOL".into());
        assert_eq!(titles(&run(&fixture.store, &query).unwrap()), vec!["Trip to Bohol"]);
    }

    #[test]
    fn page_zero_is_rejected() {
        let fixture = StoreFixture::new();
        let query = ListQuery {
            page: 0,
            ..ListQuery::new(2)
        };
        assert!(matches!(
            run(&fixture.store, &query),
            Err(PressError::Validation { field: "page", .. })
        ));
    }
}
