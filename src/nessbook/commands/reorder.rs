use crate::collection::CollectionStore;
use crate::commands::{CmdMessage, CmdResult, ListedBook};
use crate::error::{NessbookError, Result};
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

/// Moves the book at 1-based position `from` to position `to`.
pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    from: usize,
    to: usize,
) -> Result<CmdResult> {
    if from == 0 || to == 0 {
        return Err(NessbookError::Validation(
            "positions start at 1".to_string(),
        ));
    }
    store.load()?;
    store.move_book(from - 1, to - 1)?;

    let listed = store
        .books()
        .iter()
        .enumerate()
        .map(|(i, book)| ListedBook {
            position: i + 1,
            book: book.clone(),
        })
        .collect();

    let mut result = CmdResult::default().with_listed_books(listed);
    result.add_message(CmdMessage::success(format!(
        "Moved book {} to position {}",
        from, to
    )));
    Ok(result)
}
