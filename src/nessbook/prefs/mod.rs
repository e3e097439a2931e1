//! # Preference Storage
//!
//! Small, local key-value persistence scoped to this machine. Values are
//! strings (JSON-encoded where structured), so a store is a drop-in for any
//! string map.
//!
//! Two kinds of data live here:
//! - the session (`access_token`, `user_data`), see [`crate::session`];
//! - the manual display order of each user's books, under
//!   [`order_key`]`(email)`.
//!
//! ## Implementations
//!
//! - [`fs::FilePreferenceStore`]: a `prefs.json` map in the data directory.
//! - [`memory::InMemoryPreferenceStore`]: a `HashMap`, for tests.

use crate::error::Result;
use crate::model::DisplayOrderEntry;

pub mod fs;
pub mod memory;

/// Key under which a user's manual book order is kept.
pub fn order_key(email: &str) -> String {
    format!("bookOrder_{}", email)
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Reads a persisted display order.
    ///
    /// Anything unreadable or unparseable is reported as absent: a broken
    /// order must never stop the collection from loading.
    fn get_order(&self, scope_key: &str) -> Option<Vec<DisplayOrderEntry>> {
        let raw = match self.get(scope_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read display order {}: {}", scope_key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::warn!("ignoring malformed display order {}: {}", scope_key, e);
                None
            }
        }
    }

    /// Overwrites the whole persisted order for `scope_key`.
    fn set_order(&mut self, scope_key: &str, entries: &[DisplayOrderEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.set(scope_key, &raw)
    }
}
