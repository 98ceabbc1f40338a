//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every travelpress operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Gates authoring**: publishing, editing and deleting require a signed-in user
//! - **Wires collaborators**: builds a [`Publisher`] from the configured image
//!   backend, uploader and compression settings
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no stdout/stderr I/O and holds no business logic of its own.
//!
//! ## Generic Over Store and Authenticator
//!
//! - Production: `TravelApi<FileStore, LocalAuthenticator>`
//! - Testing: `TravelApi<InMemoryStore, LocalAuthenticator::in_memory(..)>`

use crate::auth::{Authenticator, require_user};
use crate::commands;
use crate::composer::{BlockId, Composer};
use crate::config::PressConfig;
use crate::error::Result;
use crate::imaging::ImageBackend;
use crate::model::ArticleId;
use crate::publisher::{ArticleMeta, Publisher};
use crate::store::DocumentStore;
use crate::upload::FileUploader;

pub struct TravelApi<S: DocumentStore, A: Authenticator> {
    store: S,
    auth: A,
    paths: commands::PressPaths,
    config: PressConfig,
    imaging: Box<dyn ImageBackend>,
    uploader: Box<dyn FileUploader>,
}

impl<S: DocumentStore, A: Authenticator> TravelApi<S, A> {
    pub fn new(
        store: S,
        auth: A,
        paths: commands::PressPaths,
        config: PressConfig,
        imaging: Box<dyn ImageBackend>,
        uploader: Box<dyn FileUploader>,
    ) -> Self {
        Self {
            store,
            auth,
            paths,
            config,
            imaging,
            uploader,
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<commands::CmdResult> {
        commands::login::run(&mut self.auth, email, password)
    }

    pub fn logout(&mut self) -> Result<commands::CmdResult> {
        commands::login::logout(&mut self.auth)
    }

    pub fn whoami(&self) -> Result<commands::CmdResult> {
        commands::login::whoami(&self.auth)
    }

    pub fn publish(
        &mut self,
        meta: &ArticleMeta,
        composer: &mut Composer,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> Result<commands::CmdResult> {
        let user = require_user(&self.auth)?;
        let publisher = Publisher::new(
            self.imaging.as_ref(),
            self.uploader.as_ref(),
            self.config.compress_params(),
        );
        commands::publish::run(
            &mut self.store,
            &publisher,
            &user,
            meta,
            composer,
            self.config.max_file_mb,
            on_progress,
        )
    }

    pub fn revise(
        &mut self,
        id: &ArticleId,
        composer: Composer,
        on_progress: &mut dyn FnMut(BlockId, u8),
    ) -> Result<commands::CmdResult> {
        let user = require_user(&self.auth)?;
        let publisher = Publisher::new(
            self.imaging.as_ref(),
            self.uploader.as_ref(),
            self.config.compress_params(),
        );
        commands::revise::run(
            &mut self.store,
            &publisher,
            &user,
            id,
            composer,
            self.config.max_file_mb,
            on_progress,
        )
    }

    /// First page of the listing, sized by configuration.
    pub fn list_query(&self) -> ListQuery {
        ListQuery::new(self.config.page_size)
    }

    pub fn list(&self, query: &ListQuery) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, query)
    }

    pub fn view(&mut self, id: &ArticleId) -> Result<commands::CmdResult> {
        commands::view::run(&mut self.store, id)
    }

    pub fn delete(&mut self, id: &ArticleId) -> Result<commands::CmdResult> {
        let user = require_user(&self.auth)?;
        commands::delete::run(&mut self.store, &user, id)
    }

    pub fn export(&self, id: &ArticleId) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, id)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::PressPaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::list::ListQuery;
pub use commands::{CmdMessage, CmdResult, MessageLevel, PageInfo, PressPaths};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalAuthenticator;
    use crate::auth::fixtures::{PASSWORD, account};
    use crate::error::PressError;
    use crate::imaging::ImageFile;
    use crate::imaging::backend::MockBackend;
    use crate::model::Block;
    use crate::store::memory::InMemoryStore;
    use crate::upload::{DisabledUploader, MemoryUploader, UploadError};

    fn api_with(uploader: Box<dyn FileUploader>) -> TravelApi<InMemoryStore, LocalAuthenticator> {
        let auth = LocalAuthenticator::in_memory(vec![
            account("uid-editor", "editor@example.com"),
            account("uid-guest", "guest@example.com"),
        ]);
        TravelApi::new(
            InMemoryStore::new(),
            auth,
            PressPaths::new("unused"),
            PressConfig::default(),
            Box::new(MockBackend::new()),
            uploader,
        )
    }

    fn api() -> TravelApi<InMemoryStore, LocalAuthenticator> {
        api_with(Box::new(MemoryUploader::new()))
    }

    fn text_composer(text: &str) -> Composer {
        Composer::from_blocks(&[Block::text(text)])
    }

    #[test]
    fn authoring_requires_sign_in() {
        let mut api = api();
        let err = api
            .publish(&ArticleMeta::new("T", ""), &mut text_composer("x"), &mut |_, _| {})
            .unwrap_err();
        assert!(matches!(err, PressError::NotSignedIn));
        assert!(matches!(
            api.delete(&ArticleId::new("x")),
            Err(PressError::NotSignedIn)
        ));
    }

    #[test]
    fn publish_list_view_delete() {
        let mut api = api();
        api.login("editor@example.com", PASSWORD).unwrap();

        let res = api
            .publish(&ArticleMeta::new("Camiguin", "Camiguin"), &mut text_composer("Sunken cemetery"), &mut |_, _| {})
            .unwrap();
        let id = res.affected_articles[0].id.clone();

        let listed = api.list(&api.list_query()).unwrap();
        assert_eq!(listed.listed_articles.len(), 1);
        assert_eq!(listed.page.unwrap().page_size, 6);

        let viewed = api.view(&id).unwrap();
        assert_eq!(viewed.affected_articles[0].views, 1);

        api.delete(&id).unwrap();
        assert_eq!(api.store().count().unwrap(), 0);
    }

    #[test]
    fn other_users_cannot_revise() {
        let mut api = api();
        api.login("editor@example.com", PASSWORD).unwrap();
        let id = api
            .publish(&ArticleMeta::new("Mine", ""), &mut text_composer("a"), &mut |_, _| {})
            .unwrap()
            .affected_articles[0]
            .id
            .clone();

        api.logout().unwrap();
        api.login("guest@example.com", PASSWORD).unwrap();
        assert!(matches!(
            api.revise(&id, text_composer("b"), &mut |_, _| {}),
            Err(PressError::PermissionDenied(_))
        ));
        assert_eq!(
            api.export(&id).unwrap().output.as_deref(),
            Some("<!-- block -->\na\n")
        );
    }

    #[test]
    fn text_only_publish_works_without_upload_service() {
        let mut api = api_with(Box::new(DisabledUploader));
        api.login("editor@example.com", PASSWORD).unwrap();
        assert!(api
            .publish(&ArticleMeta::new("Text", ""), &mut text_composer("ok"), &mut |_, _| {})
            .is_ok());

        let mut composer = Composer::empty();
        composer.append_image();
        composer.attach_file(0, ImageFile::new("a.png", vec![1])).unwrap();
        let err = api
            .publish(&ArticleMeta::new("Pics", ""), &mut composer, &mut |_, _| {})
            .unwrap_err();
        assert!(matches!(err, PressError::Upload(UploadError::NotConfigured)));
    }
}
