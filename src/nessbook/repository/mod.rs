//! # Book Repository
//!
//! The remote book API, seen from the client. [`BookRepository`] is the only
//! way the collection layer reads or writes books; it never persists anything
//! itself.
//!
//! ## Implementations
//!
//! - [`http::HttpRepository`]: talks to the NessBook API over HTTP with a
//!   bearer credential.
//! - [`memory::InMemoryRepository`]: keeps books in a `Vec` in insertion
//!   order, with switchable failures. Used by tests.
//!
//! ## Semantics
//!
//! - Ids are opaque strings assigned by the repository on create.
//! - Updates replace the whole record; there is no partial patch.
//! - A rejected credential surfaces as [`NessbookError::AuthExpired`]; the
//!   repository does not try to recover from it.
//!
//! [`NessbookError::AuthExpired`]: crate::error::NessbookError::AuthExpired

use crate::error::Result;
use crate::model::BookRecord;

pub mod http;
pub mod memory;

pub trait BookRepository {
    /// Full collection for the authenticated identity, in server order.
    fn list_books(&self) -> Result<Vec<BookRecord>>;

    /// Fails with `NotFound` when the id does not exist.
    fn get_book(&self, id: &str) -> Result<BookRecord>;

    /// Stores a new record; the returned copy carries the assigned id.
    fn create_book(&mut self, draft: &BookRecord) -> Result<BookRecord>;

    /// Replaces every field of the record with the given id.
    fn replace_book(&mut self, id: &str, record: &BookRecord) -> Result<Option<BookRecord>>;

    fn delete_book(&mut self, id: &str) -> Result<()>;
}
