use crate::collection::CollectionStore;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &CollectionStore<R, P>,
    id: &str,
) -> Result<CmdResult> {
    let book = store.book(id)?;
    Ok(CmdResult::default().with_affected_books(vec![book]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NessbookError;
    use crate::prefs::memory::InMemoryPreferenceStore;
    use crate::repository::memory::fixtures::RepositoryFixture;

    #[test]
    fn fetches_full_record() {
        let fixture = RepositoryFixture::new().with_book("Dune", "Herbert", "SF");
        let id = fixture.ids()[0].clone();
        let store = CollectionStore::new(fixture.repository, InMemoryPreferenceStore::new());

        let result = run(&store, &id).unwrap();
        assert_eq!(result.affected_books[0].title, "Dune");
    }

    #[test]
    fn rejects_placeholder_ids() {
        let fixture = RepositoryFixture::new();
        let store = CollectionStore::new(fixture.repository, InMemoryPreferenceStore::new());
        assert!(matches!(
            run(&store, "undefined"),
            Err(NessbookError::InvalidId(_))
        ));
    }

    #[test]
    fn missing_book_is_not_found() {
        let fixture = RepositoryFixture::new().with_books(1);
        let store = CollectionStore::new(fixture.repository, InMemoryPreferenceStore::new());
        assert!(run(&store, "nope").unwrap_err().is_not_found());
    }
}
