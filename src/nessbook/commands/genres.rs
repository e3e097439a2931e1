use crate::collection::CollectionStore;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::SUGGESTED_GENRES;
use crate::prefs::PreferenceStore;
use crate::repository::BookRepository;

/// Genres in use. With `suggested`, the built-in suggestions are merged in.
pub fn run<R: BookRepository, P: PreferenceStore>(
    store: &mut CollectionStore<R, P>,
    suggested: bool,
) -> Result<CmdResult> {
    store.load()?;
    let mut genres = store.genres();
    if suggested {
        for genre in SUGGESTED_GENRES {
            if !genres.iter().any(|g| g.as_str() == *genre) {
                genres.push(genre.to_string());
            }
        }
        genres.sort();
    }
    Ok(CmdResult::default().with_genres(genres))
}
