use crate::collection::CollectionStore;
use crate::commands::{validate_required, BookEdit, CmdMessage, CmdResult};
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

/// Fetches the full record, applies `edit`, and sends the whole record back.
pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    id: &str,
    edit: &BookEdit,
) -> Result<CmdResult> {
    let mut book = store.book(id)?;
    edit.apply(&mut book)?;
    validate_required(&book, false)?;

    let saved = store.update(id, &book)?.unwrap_or(book);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Updated \"{}\"", saved.title)));
    Ok(result.with_affected_books(vec![saved]))
}
