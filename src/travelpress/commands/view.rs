use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::ArticleId;
use crate::store::DocumentStore;
use crate::viewer::{self, render_plain};

/// Load an article for reading and count the view.
pub fn run<S: DocumentStore + ?Sized>(store: &mut S, id: &ArticleId) -> Result<CmdResult> {
    let mut article = viewer::load(&*store, id)?;
    article.views = viewer::record_view(store, id)?;
    let text = render_plain(&article);
    Ok(CmdResult::default()
        .with_affected_articles(vec![article])
        .with_output(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn counts_each_view() {
        let mut fixture = StoreFixture::new().with_articles(1);
        let id = fixture.first_id();
        run(&mut fixture.store, &id).unwrap();
        let res = run(&mut fixture.store, &id).unwrap();
        assert_eq!(res.affected_articles[0].views, 2);
        assert_eq!(res.output.as_deref(), Some("Story of Trip 1"));
    }
}
