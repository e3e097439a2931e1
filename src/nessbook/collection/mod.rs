//! # Collection Store
//!
//! [`CollectionStore`] owns the current user's books as last returned by the
//! [`BookRepository`], arranged in the user's manual order, plus the query that
//! derives what is displayed.
//!
//! ## Reconciliation
//!
//! The store never owns persistence. Its rule for mutations is "apply, then
//! refetch the authoritative list on success, change nothing on failure":
//!
//! | operation  | repository call   | local effect on success         |
//! |------------|-------------------|---------------------------------|
//! | `load`     | `list_books`      | replace books, re-apply order   |
//! | `create`   | `create_book`     | `load`                          |
//! | `update`   | `replace_book`    | none until the next `load`      |
//! | `remove`   | `delete_book`     | `load`                          |
//! | `reorder`  | none              | replace books, persist order    |
//!
//! A failed call returns the error and leaves `books` exactly as it was.
//!
//! ## Ordering
//!
//! Manual order is local to this machine and scoped by the user's identity,
//! see [`order`]. Filtering and sorting ([`view`]) work on borrowed views and
//! never disturb it.

use crate::error::{NessbookError, Result};
use crate::model::{BookId, BookRecord};
use crate::prefs::{order_key, PreferenceStore};
use crate::repository::BookRepository;

pub mod order;
pub mod stats;
pub mod view;

pub use stats::CollectionStats;
pub use view::{SortKey, ViewQuery};

/// Rejects ids that could only come from a broken link or an unsaved record.
pub fn validate_id(id: &str) -> Result<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        return Err(NessbookError::InvalidId(id.to_string()));
    }
    Ok(trimmed)
}

pub struct CollectionStore<R: BookRepository, P: PreferenceStore> {
    repository: R,
    prefs: P,
    order_key: Option<String>,
    books: Vec<BookRecord>,
    query: ViewQuery,
    load_error: Option<String>,
}

impl<R: BookRepository, P: PreferenceStore> CollectionStore<R, P> {
    pub fn new(repository: R, prefs: P) -> Self {
        Self {
            repository,
            prefs,
            order_key: None,
            books: Vec::new(),
            query: ViewQuery::default(),
            load_error: None,
        }
    }

    /// Scopes the persisted manual order to `email`.
    pub fn with_identity(mut self, email: &str) -> Self {
        self.set_identity(Some(email));
        self
    }

    pub fn set_identity(&mut self, email: Option<&str>) {
        self.order_key = email.filter(|e| !e.is_empty()).map(order_key);
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: ViewQuery) {
        self.query = query;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
    }

    pub fn set_genre_filter(&mut self, genre: impl Into<String>) {
        self.query.genre = genre.into();
    }

    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    /// Message of the last failed load, cleared by the next successful one.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut P {
        &mut self.prefs
    }

    /// Fetches the collection and arranges it in the persisted manual order.
    pub fn load(&mut self) -> Result<&[BookRecord]> {
        match self.repository.list_books() {
            Ok(books) => {
                self.books = books;
                self.load_error = None;
                self.apply_persisted_order();
                Ok(&self.books)
            }
            Err(e) => {
                log::warn!("loading books failed: {}", e);
                self.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn apply_persisted_order(&mut self) {
        let Some(key) = self.order_key.as_deref() else {
            return;
        };
        if let Some(entries) = self.prefs.get_order(key) {
            order::apply(&mut self.books, &entries);
        }
    }

    /// Replaces the collection with `sequence` and persists it as the manual
    /// order. `sequence` must hold exactly the current books.
    pub fn reorder(&mut self, sequence: Vec<BookRecord>) -> Result<()> {
        if !same_books(&self.books, &sequence) {
            return Err(NessbookError::Validation(
                "new order must contain exactly the current books".to_string(),
            ));
        }
        self.books = sequence;
        self.persist_order()
    }

    /// Moves the book at position `from` to position `to` (both 0-based).
    pub fn move_book(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.books.len();
        if from >= len || to >= len {
            return Err(NessbookError::Validation(format!(
                "position out of range (collection has {} books)",
                len
            )));
        }
        let mut sequence = self.books.clone();
        order::array_move(&mut sequence, from, to);
        self.reorder(sequence)
    }

    fn persist_order(&mut self) -> Result<()> {
        match self.order_key.as_deref() {
            Some(key) => self.prefs.set_order(key, &order::snapshot(&self.books)),
            None => {
                log::warn!("no signed-in identity, manual order is not saved");
                Ok(())
            }
        }
    }

    /// The books to display for the current query. Pure.
    pub fn filtered_and_sorted(&self) -> Vec<&BookRecord> {
        view::filter_and_sort(&self.books, &self.query)
    }

    /// Same view, paired with each book's 0-based position in manual order.
    pub fn filtered_and_sorted_with_positions(&self) -> Vec<(usize, &BookRecord)> {
        view::filter_and_sort_indexed(&self.books, &self.query)
    }

    /// Fetches one record, rejecting malformed ids before any request.
    pub fn book(&self, id: &str) -> Result<BookRecord> {
        let id = validate_id(id)?;
        self.repository.get_book(id)
    }

    /// Creates a record and reloads so the assigned id shows up.
    ///
    /// The draft is not validated here. A failed reload after a successful
    /// create is kept in [`load_error`](Self::load_error) rather than
    /// returned, so callers do not create the book twice.
    pub fn create(&mut self, draft: &BookRecord) -> Result<BookRecord> {
        let created = self.repository.create_book(draft)?;
        log::info!("created book {:?}", created.id);
        self.reload_after_mutation();
        Ok(created)
    }

    /// Replaces a record on the server. Local books stay as they are until the
    /// next load.
    pub fn update(&mut self, id: &str, record: &BookRecord) -> Result<Option<BookRecord>> {
        let id = validate_id(id)?;
        let replaced = self.repository.replace_book(id, record)?;
        log::info!("updated book {}", id);
        Ok(replaced)
    }

    /// Deletes a record, then resynchronizes from the server.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let id = validate_id(id)?.to_string();
        self.repository.delete_book(&id)?;
        log::info!("deleted book {}", id);
        self.reload_after_mutation();
        Ok(())
    }

    fn reload_after_mutation(&mut self) {
        if let Err(e) = self.load() {
            log::warn!("refresh after change failed, showing stale books: {}", e);
        }
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_books(&self.books)
    }

    pub fn genres(&self) -> Vec<String> {
        stats::genres(&self.books)
    }

    /// Position of a book in the current manual order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|b| b.id.as_deref() == Some(id))
    }

    pub fn ids(&self) -> Vec<BookId> {
        self.books.iter().filter_map(|b| b.id.clone()).collect()
    }
}

fn same_books(current: &[BookRecord], proposed: &[BookRecord]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut a: Vec<Option<&str>> = current.iter().map(|b| b.id.as_deref()).collect();
    let mut b: Vec<Option<&str>> = proposed.iter().map(|b| b.id.as_deref()).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
