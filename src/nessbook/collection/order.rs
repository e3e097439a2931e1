//! Manual display order.
//!
//! The order a user drags books into is not known to the server. It is kept as
//! a full snapshot of `{id, order}` entries and re-applied on every load:
//!
//! - a book's rank is the `order` of its entry;
//! - books without an entry rank after every persisted entry and keep their
//!   server order among themselves;
//! - entries for books that no longer exist are ignored.

use crate::model::{BookRecord, DisplayOrderEntry};
use std::collections::HashMap;

/// Snapshot of the current sequence, one entry per book with an id.
pub fn snapshot(books: &[BookRecord]) -> Vec<DisplayOrderEntry> {
    books
        .iter()
        .enumerate()
        .filter_map(|(order, book)| {
            book.id.as_ref().map(|id| DisplayOrderEntry {
                id: id.clone(),
                order,
            })
        })
        .collect()
}

/// Stable-sorts `books` by their persisted rank.
pub fn apply(books: &mut [BookRecord], entries: &[DisplayOrderEntry]) {
    let unranked = entries.len();
    let ranks: HashMap<&str, usize> = entries
        .iter()
        .map(|e| (e.id.as_str(), e.order))
        .collect();

    // sort_by_key is stable
    books.sort_by_key(|book| {
        book.id
            .as_deref()
            .and_then(|id| ranks.get(id).copied())
            .unwrap_or(unranked)
    });
}

/// Moves the element at `from` to `to`, shifting the ones in between.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}
