use crate::collection::CollectionStore;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
) -> Result<CmdResult> {
    store.load()?;
    Ok(CmdResult::default().with_stats(store.stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::memory::InMemoryPreferenceStore;
    use crate::repository::memory::fixtures::RepositoryFixture;

    #[test]
    fn summarizes_loaded_books() {
        let fixture = RepositoryFixture::new()
            .with_rated_book("A", 5, true)
            .with_rated_book("B", 2, false);
        let mut store = CollectionStore::new(fixture.repository, InMemoryPreferenceStore::new());

        let stats = run(&mut store).unwrap().stats.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.average_rating, 3.5);
        assert_eq!(stats.genre_distribution, vec![("Romance".to_string(), 2)]);
    }
}
