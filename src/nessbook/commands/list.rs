use crate::collection::{CollectionStore, ViewQuery};
use crate::commands::{CmdMessage, CmdResult, ListedBook};
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    query: ViewQuery,
) -> Result<CmdResult> {
    store.set_query(query);
    store.load()?;

    let listed: Vec<ListedBook> = store
        .filtered_and_sorted_with_positions()
        .into_iter()
        .map(|(index, book)| ListedBook {
            position: index + 1,
            book: book.clone(),
        })
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() {
        if store.books().is_empty() {
            result.add_message(CmdMessage::info(
                "Your library is empty. Add a book with `nessbook add`.",
            ));
        } else {
            result.add_message(CmdMessage::info("No books match your search."));
        }
    }
    Ok(result.with_listed_books(listed))
}
