//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every nessbook operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns the session**: book operations require a signed-in user and use
//!   the user's email to scope the manual order
//! - **Tears the session down** when the remote API rejects the credential
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs` and `collection/`
//! - **I/O formatting**: No stdout, stderr, or colors
//!
//! ## Generic Over Repository and Preferences
//!
//! `NessbookApi<R: BookRepository, P: PreferenceStore>`:
//! - Production: `NessbookApi<HttpRepository, FilePreferenceStore>`
//! - Testing: `NessbookApi<InMemoryRepository, InMemoryPreferenceStore>`

use crate::collection::{CollectionStore, ViewQuery};
use crate::commands::{self, BookEdit, CmdResult};
use crate::config::NessbookPaths;
use crate::error::{NessbookError, Result};
use crate::prefs::PreferenceStore;
use crate::repository::http::AuthService;
use crate::repository::BookRepository;
use crate::session::Session;

pub struct NessbookApi<R: BookRepository, P: PreferenceStore> {
    store: CollectionStore<R, P>,
    session: Session,
    paths: NessbookPaths,
}

impl<R: BookRepository, P: PreferenceStore> NessbookApi<R, P> {
    /// `session` should come from [`Session::init`] on the same `prefs`; the
    /// store is scoped to its user.
    pub fn new(repository: R, prefs: P, session: Session, paths: NessbookPaths) -> Self {
        let mut store = CollectionStore::new(repository, prefs);
        store.set_identity(session.user().map(|u| u.email.as_str()));
        Self {
            store,
            session,
            paths,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &CollectionStore<R, P> {
        &self.store
    }

    pub fn list_books(&mut self, query: ViewQuery) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::list::run(&mut self.store, query);
        self.guard(result)
    }

    pub fn view_book(&mut self, id: &str) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::view::run(&self.store, id);
        self.guard(result)
    }

    pub fn add_book(&mut self, edit: &BookEdit) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::add::run(&mut self.store, edit);
        self.guard(result)
    }

    pub fn edit_book(&mut self, id: &str, edit: &BookEdit) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::edit::run(&mut self.store, id, edit);
        self.guard(result)
    }

    pub fn delete_book(&mut self, id: &str) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::delete::run(&mut self.store, id);
        self.guard(result)
    }

    /// Moves a book between 1-based positions of the manual order.
    pub fn move_book(&mut self, from: usize, to: usize) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::reorder::run(&mut self.store, from, to);
        self.guard(result)
    }

    pub fn stats(&mut self) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::stats::run(&mut self.store);
        self.guard(result)
    }

    pub fn genres(&mut self, suggested: bool) -> Result<CmdResult> {
        self.require_session()?;
        let result = commands::genres::run(&mut self.store, suggested);
        self.guard(result)
    }

    pub fn login<A: AuthService>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> Result<CmdResult> {
        let result = commands::auth::login(
            auth,
            &mut self.session,
            self.store.prefs_mut(),
            email,
            password,
        )?;
        self.store
            .set_identity(self.session.user().map(|u| u.email.as_str()));
        Ok(result)
    }

    pub fn register<A: AuthService>(
        &self,
        auth: &A,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<CmdResult> {
        commands::auth::register(auth, username, email, password)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        let result = commands::auth::logout(&mut self.session, self.store.prefs_mut())?;
        self.store.set_identity(None);
        Ok(result)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.session)
    }

    pub fn config(&self, action: commands::config::ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &NessbookPaths {
        &self.paths
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(NessbookError::NotSignedIn)
        }
    }

    /// A rejected credential ends the session before the error is returned.
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(NessbookError::AuthExpired) = &result {
            log::warn!("credential rejected by the API, signing out");
            self.session.teardown(self.store.prefs_mut())?;
            self.store.set_identity(None);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserProfile;
    use crate::prefs::memory::InMemoryPreferenceStore;
    use crate::repository::memory::fixtures::RepositoryFixture;
    use crate::repository::memory::InMemoryRepository;
    use crate::session::{TOKEN_KEY, USER_KEY};

    struct AcceptAll;

    impl AuthService for AcceptAll {
        fn login(&self, email: &str, _password: &str) -> Result<String> {
            Ok(format!("t-{}", email))
        }

        fn register(&self, _username: &str, _email: &str, _password: &str) -> Result<()> {
            Ok(())
        }
    }

    fn paths() -> NessbookPaths {
        NessbookPaths::new(std::env::temp_dir().join("nessbook-api-tests"))
    }

    fn signed_in_prefs() -> InMemoryPreferenceStore {
        let mut prefs = InMemoryPreferenceStore::new();
        let mut session = Session::default();
        session
            .login(
                &mut prefs,
                "token".into(),
                UserProfile {
                    username: "Ness".into(),
                    email: "ness@example.com".into(),
                },
            )
            .unwrap();
        prefs
    }

    fn api(fixture: RepositoryFixture) -> NessbookApi<InMemoryRepository, InMemoryPreferenceStore> {
        let mut prefs = signed_in_prefs();
        let session = Session::init(&mut prefs).unwrap();
        NessbookApi::new(fixture.repository, prefs, session, paths())
    }

    fn signed_out(
        fixture: RepositoryFixture,
    ) -> NessbookApi<InMemoryRepository, InMemoryPreferenceStore> {
        let mut prefs = InMemoryPreferenceStore::new();
        let session = Session::init(&mut prefs).unwrap();
        NessbookApi::new(fixture.repository, prefs, session, paths())
    }

    #[test]
    fn book_operations_require_sign_in() {
        let fixture = RepositoryFixture::new().with_books(1);
        let mut api = signed_out(fixture);

        assert!(matches!(
            api.list_books(ViewQuery::default()),
            Err(NessbookError::NotSignedIn)
        ));
        assert!(matches!(api.stats(), Err(NessbookError::NotSignedIn)));
    }

    #[test]
    fn list_dispatches_with_restored_session() {
        let mut api = api(RepositoryFixture::new().with_books(2));
        let result = api.list_books(ViewQuery::default()).unwrap();
        assert_eq!(result.listed_books.len(), 2);
        assert_eq!(api.session().user().unwrap().email, "ness@example.com");
    }

    #[test]
    fn expired_credential_ends_session() {
        let mut fixture = RepositoryFixture::new().with_books(1);
        fixture.repository.expire_credential();
        let mut api = api(fixture);

        assert!(matches!(
            api.list_books(ViewQuery::default()),
            Err(NessbookError::AuthExpired)
        ));
        assert!(!api.session().is_authenticated());
        assert!(api.store().prefs().get(TOKEN_KEY).unwrap().is_none());
        assert!(api.store().prefs().get(USER_KEY).unwrap().is_none());

        assert!(matches!(api.stats(), Err(NessbookError::NotSignedIn)));
    }

    #[test]
    fn other_failures_keep_session() {
        let mut fixture = RepositoryFixture::new().with_books(1);
        fixture.repository.fail(crate::repository::memory::Operation::List);
        let mut api = api(fixture);

        assert!(api.stats().is_err());
        assert!(api.session().is_authenticated());
    }

    #[test]
    fn login_scopes_manual_order() {
        let fixture = RepositoryFixture::new().with_books(2);
        let mut api = signed_out(fixture);

        api.login(&AcceptAll, "ness@example.com", "pw").unwrap();
        api.move_book(2, 1).unwrap();

        let key = crate::prefs::order_key("ness@example.com");
        assert!(api.store().prefs().get_order(&key).is_some());
    }

    #[test]
    fn logout_clears_session() {
        let mut api = api(RepositoryFixture::new());
        api.logout().unwrap();
        assert!(matches!(api.whoami(), Err(NessbookError::NotSignedIn)));
    }
}
