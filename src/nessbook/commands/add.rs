use crate::collection::CollectionStore;
use crate::commands::{validate_required, BookEdit, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BookRecord;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    edit: &BookEdit,
) -> Result<CmdResult> {
    let mut draft = BookRecord::default();
    edit.apply(&mut draft)?;
    validate_required(&draft, true)?;

    let created = store.create(&draft)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added \"{}\" by {}",
        created.title, created.author
    )));
    if let Some(err) = store.load_error() {
        result.add_message(CmdMessage::warning(format!(
            "Book saved, but the list could not be refreshed: {}",
            err
        )));
    }
    Ok(result.with_affected_books(vec![created]))
}
