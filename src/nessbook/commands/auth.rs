//! Sign-in, registration and sign-out.
//!
//! The API answers a login with a bare token; the profile kept in the session
//! is built from what the user typed.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NessbookError, Result};
use crate::model::UserProfile;
use crate::prefs::PreferenceStore;
use crate::repository::http::AuthService;
use crate::session::Session;

pub fn login<A: AuthService, P: PreferenceStore>(
    auth: &A,
    session: &mut Session,
    prefs: &mut P,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(NessbookError::Validation(
            "email and password are required".to_string(),
        ));
    }
    let token = auth.login(email, password)?;
    let user = UserProfile {
        username: String::new(),
        email: email.to_string(),
    };
    session.login(prefs, token, user.clone())?;

    let mut result = CmdResult::default().with_user(user);
    result.add_message(CmdMessage::success(format!("Signed in as {}", email)));
    Ok(result)
}

pub fn register<A: AuthService>(
    auth: &A,
    username: &str,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(NessbookError::Validation(
            "username, email and password are required".to_string(),
        ));
    }
    auth.register(username.trim(), email.trim(), password)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Account created for {}. Sign in with `nessbook login`.",
        email.trim()
    )));
    Ok(result)
}

pub fn logout<P: PreferenceStore>(session: &mut Session, prefs: &mut P) -> Result<CmdResult> {
    let was_signed_in = session.is_authenticated();
    session.teardown(prefs)?;
    let mut result = CmdResult::default();
    if was_signed_in {
        result.add_message(CmdMessage::success("Signed out"));
    } else {
        result.add_message(CmdMessage::info("Not signed in"));
    }
    Ok(result)
}

pub fn whoami(session: &Session) -> Result<CmdResult> {
    let user = session.user().cloned().ok_or(NessbookError::NotSignedIn)?;
    Ok(CmdResult::default().with_user(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::memory::InMemoryPreferenceStore;
    use crate::session::TOKEN_KEY;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeAuth {
        registered: RefCell<Vec<String>>,
    }

    impl AuthService for FakeAuth {
        fn login(&self, email: &str, password: &str) -> Result<String> {
            if password == "secret" {
                Ok(format!("token-for-{}", email))
            } else {
                Err(NessbookError::Validation(
                    "Invalid email or password".to_string(),
                ))
            }
        }

        fn register(&self, _username: &str, email: &str, _password: &str) -> Result<()> {
            self.registered.borrow_mut().push(email.to_string());
            Ok(())
        }
    }

    #[test]
    fn login_persists_session() {
        let auth = FakeAuth::default();
        let mut prefs = InMemoryPreferenceStore::new();
        let mut session = Session::default();

        let result = login(&auth, &mut session, &mut prefs, " ness@example.com ", "secret").unwrap();
        assert_eq!(result.user.unwrap().email, "ness@example.com");
        assert_eq!(session.token(), Some("token-for-ness@example.com"));

        let restored = Session::init(&mut prefs).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn bad_password_leaves_session_empty() {
        let auth = FakeAuth::default();
        let mut prefs = InMemoryPreferenceStore::new();
        let mut session = Session::default();

        assert!(login(&auth, &mut session, &mut prefs, "ness@example.com", "nope").is_err());
        assert!(!session.is_authenticated());
        assert!(prefs.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn register_requires_all_fields() {
        let auth = FakeAuth::default();
        assert!(register(&auth, "", "a@b.c", "pw").is_err());
        register(&auth, "Ness", "a@b.c", "pw").unwrap();
        assert_eq!(auth.registered.borrow().as_slice(), ["a@b.c".to_string()]);
    }

    #[test]
    fn logout_then_whoami() {
        let auth = FakeAuth::default();
        let mut prefs = InMemoryPreferenceStore::new();
        let mut session = Session::default();
        login(&auth, &mut session, &mut prefs, "ness@example.com", "secret").unwrap();

        assert_eq!(
            whoami(&session).unwrap().user.unwrap().email,
            "ness@example.com"
        );
        logout(&mut session, &mut prefs).unwrap();
        assert!(matches!(whoami(&session), Err(NessbookError::NotSignedIn)));
        assert!(prefs.is_empty());
    }
}
