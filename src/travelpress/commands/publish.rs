use crate::auth::User;
use crate::commands::{CmdMessage, CmdResult};
use crate::composer::{BlockId, Composer};
use crate::error::Result;
use crate::publisher::{ArticleMeta, Publisher};
use crate::store::DocumentStore;

/// Warn about selected files over the size limit. They are still uploaded.
pub(crate) fn oversize_warnings(composer: &Composer, max_file_mb: f64) -> Vec<CmdMessage> {
    composer
        .blocks()
        .iter()
        .filter_map(|b| b.pending_file())
        .filter(|f| f.size_mb() > max_file_mb)
        .map(|f| {
            CmdMessage::warning(format!(
                "{} is {:.1} MB, larger than the {} MB limit",
                f.name,
                f.size_mb(),
                max_file_mb
            ))
        })
        .collect()
}

pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    publisher: &Publisher<'_>,
    user: &User,
    meta: &ArticleMeta,
    composer: &mut Composer,
    max_file_mb: f64,
    on_progress: &mut dyn FnMut(BlockId, u8),
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for warning in oversize_warnings(composer, max_file_mb) {
        result.add_message(warning);
    }

    let article = publisher.publish_new(store, user, meta, composer, on_progress)?;
    result.add_message(CmdMessage::success(format!(
        "Published '{}' ({})",
        article.title, article.id
    )));
    Ok(result.with_affected_articles(vec![article]))
}
