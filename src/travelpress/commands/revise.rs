use crate::auth::User;
use crate::commands::publish::oversize_warnings;
use crate::commands::{CmdMessage, CmdResult};
use crate::composer::{BlockId, Composer};
use crate::error::Result;
use crate::model::ArticleId;
use crate::publisher::Publisher;
use crate::store::DocumentStore;
use crate::viewer::{self, EditSession};

/// Replace an article's blocks with `composer`'s through an edit session.
pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    publisher: &Publisher<'_>,
    user: &User,
    id: &ArticleId,
    composer: Composer,
    max_file_mb: f64,
    on_progress: &mut dyn FnMut(BlockId, u8),
) -> Result<CmdResult> {
    let article = viewer::load(&*store, id)?;
    let mut session = EditSession::start(&article, Some(user))?;
    *session.composer_mut() = composer;
    session.save_draft();

    let mut result = CmdResult::default();
    for warning in oversize_warnings(session.composer(), max_file_mb) {
        result.add_message(warning);
    }

    let updated = session
        .publish(publisher, store, user, on_progress)
        .map_err(|(_, e)| e)?;
    result.add_message(CmdMessage::success(format!(
        "Updated '{}' ({} blocks)",
        updated.title,
        updated.blocks.len()
    )));
    Ok(result.with_affected_articles(vec![updated]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PressError;
    use crate::imaging::CompressParams;
    use crate::imaging::backend::MockBackend;
    use crate::model::Block;
    use crate::store::memory::fixtures::{OWNER_EMAIL, OWNER_UID, StoreFixture};
    use crate::upload::MemoryUploader;

    fn owner() -> User {
        User {
            uid: OWNER_UID.into(),
            email: OWNER_EMAIL.into(),
        }
    }

    #[test]
    fn replaces_blocks_of_owned_article() {
        let imaging = MockBackend::new();
        let uploader = MemoryUploader::new();
        let publisher = Publisher::new(&imaging, &uploader, CompressParams::default());
        let mut fixture = StoreFixture::new().with_articles(2);
        let id = fixture.first_id();
        let before = fixture.store.get(&id).unwrap();

        let composer = Composer::from_blocks(&[Block::text("New"), Block::image("u", "c")]);
        let res = run(&mut fixture.store, &publisher, &owner(), &id, composer, 10.0, &mut |_, _| {})
            .unwrap();

        let after = fixture.store.get(&id).unwrap();
        assert_eq!(after.blocks, vec![Block::text("New"), Block::image("u", "c")]);
        assert_eq!(after.title, before.title);
        assert_eq!(res.affected_articles[0], after);
    }

    #[test]
    fn stranger_is_refused() {
        let imaging = MockBackend::new();
        let uploader = MemoryUploader::new();
        let publisher = Publisher::new(&imaging, &uploader, CompressParams::default());
        let mut fixture = StoreFixture::new().with_articles(1);
        let id = fixture.first_id();
        let stranger = User {
            uid: "uid-guest".into(),
            email: "guest@example.com".into(),
        };

        let err = run(&mut fixture.store, &publisher, &stranger, &id, Composer::new(), 10.0, &mut |_, _| {})
            .unwrap_err();
        assert!(matches!(err, PressError::PermissionDenied(_)));
    }
}
