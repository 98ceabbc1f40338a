use crate::auth::{User, ensure_owner};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ArticleId;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore + ?Sized>(store: &mut S, user: &User, id: &ArticleId) -> Result<CmdResult> {
    let article = store.get(id)?;
    ensure_owner(user, &article)?;
    store.delete(id)?;
    tracing::info!(%id, "Deleted article");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted '{}'", article.title)));
    Ok(result.with_affected_articles(vec![article]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PressError;
    use crate::store::memory::fixtures::{OWNER_EMAIL, OWNER_UID, StoreFixture};

    #[test]
    fn owner_deletes() {
        let mut fixture = StoreFixture::new().with_articles(2);
        let id = fixture.first_id();
        let owner = User {
            uid: OWNER_UID.into(),
            email: OWNER_EMAIL.into(),
        };
        let res = run(&mut fixture.store, &owner, &id).unwrap();
        assert_eq!(res.affected_articles[0].id, id);
        assert_eq!(fixture.store.count().unwrap(), 1);
    }

    #[test]
    fn others_cannot() {
        let mut fixture = StoreFixture::new().with_articles(1);
        let id = fixture.first_id();
        let other = User {
            uid: "uid-guest".into(),
            email: "guest@example.com".into(),
        };
        assert!(matches!(
            run(&mut fixture.store, &other, &id),
            Err(PressError::PermissionDenied(_))
        ));
        assert_eq!(fixture.store.count().unwrap(), 1);
    }
}
