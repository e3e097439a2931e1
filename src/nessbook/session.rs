//! # Session
//!
//! The signed-in user and their bearer credential, as an explicit value with an
//! explicit lifecycle:
//!
//! - [`Session::init`] reads whatever a previous run left in the
//!   [`PreferenceStore`];
//! - [`Session::login`] stores a fresh credential;
//! - [`Session::teardown`] purges it, after a logout or when the API rejects
//!   the credential.
//!
//! Nothing else in the crate reads the credential keys directly.

use crate::error::{NessbookError, Result};
use crate::model::UserProfile;
use crate::prefs::{order_key, PreferenceStore};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user_data";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
}

impl Session {
    /// Restores the session persisted by an earlier run.
    ///
    /// A stored profile that no longer parses tears the whole session down,
    /// so the user is asked to sign in again instead of half-working.
    /// Storage that cannot be read at all is treated the same way.
    pub fn init<P: PreferenceStore>(prefs: &mut P) -> Result<Self> {
        let (token, raw_user) = match read_stored(prefs) {
            Ok(stored) => stored,
            Err(e @ (NessbookError::Store(_) | NessbookError::Serialization(_))) => {
                log::warn!("stored session is unreadable, signing out: {}", e);
                let mut session = Session::default();
                session.teardown(prefs)?;
                return Ok(session);
            }
            Err(e) => return Err(e),
        };
        let token = token.filter(|t| !t.is_empty());

        let mut session = Session { token, user: None };
        let raw_user = raw_user.filter(|_| session.token.is_some());
        if let Some(raw) = raw_user {
            match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => session.user = Some(user),
                Err(e) => {
                    log::warn!("stored user profile is unreadable, signing out: {}", e);
                    session.teardown(prefs)?;
                }
            }
        }
        Ok(session)
    }

    pub fn login<P: PreferenceStore>(
        &mut self,
        prefs: &mut P,
        token: String,
        user: UserProfile,
    ) -> Result<()> {
        prefs.set(TOKEN_KEY, &token)?;
        prefs.set(USER_KEY, &serde_json::to_string(&user)?)?;
        log::info!("signed in as {}", user.email);
        self.token = Some(token);
        self.user = Some(user);
        Ok(())
    }

    pub fn teardown<P: PreferenceStore>(&mut self, prefs: &mut P) -> Result<()> {
        self.token = None;
        self.user = None;
        prefs.remove(TOKEN_KEY)?;
        prefs.remove(USER_KEY)?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Preference key for this user's manual book order.
    pub fn order_scope(&self) -> Option<String> {
        self.user
            .as_ref()
            .filter(|u| !u.email.is_empty())
            .map(|u| order_key(&u.email))
    }
}

fn read_stored<P: PreferenceStore>(prefs: &P) -> Result<(Option<String>, Option<String>)> {
    Ok((prefs.get(TOKEN_KEY)?, prefs.get(USER_KEY)?))
}
