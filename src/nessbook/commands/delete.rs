use crate::collection::CollectionStore;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    id: &str,
) -> Result<CmdResult> {
    store.remove(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Book deleted"));
    if let Some(err) = store.load_error() {
        result.add_message(CmdMessage::warning(format!(
            "The list could not be refreshed: {}",
            err
        )));
    }
    Ok(result)
}
