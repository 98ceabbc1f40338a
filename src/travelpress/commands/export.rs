use crate::commands::CmdResult;
use crate::error::Result;
use crate::manuscript;
use crate::model::ArticleId;
use crate::store::DocumentStore;

/// Article as a Markdown manuscript, ready to edit and feed back to `edit`.
pub fn run<S: DocumentStore + ?Sized>(store: &S, id: &ArticleId) -> Result<CmdResult> {
    let article = store.get(id)?;
    let text = manuscript::export(&article)?;
    Ok(CmdResult::default()
        .with_affected_articles(vec![article])
        .with_output(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::store::memory::InMemoryStore;
    use crate::store::memory::fixtures::new_article;

    #[test]
    fn exports_manuscript() {
        let mut store = InMemoryStore::new();
        let article = store
            .create(new_article(
                "Sagada",
                "Mountain Province",
                vec![Block::text("Caves."), Block::image("https://x/y.jpg", "Coffins")],
            ))
            .unwrap();
        let res = run(&store, &article.id).unwrap();
        assert_eq!(
            res.output.as_deref(),
            Some("<!-- block -->\nCaves.\n\n<!-- block -->\n![Coffins](https://x/y.jpg)\n")
        );
    }
}
