//! Filtered and sorted views over the collection.
//!
//! Views borrow the books; they never reorder or modify the collection itself.

use crate::error::{NessbookError, Result};
use crate::model::BookRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Rating,
    Favorites,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Rating => "rating",
            SortKey::Favorites => "favorites",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = NessbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "author" => Ok(SortKey::Author),
            "rating" => Ok(SortKey::Rating),
            "favorites" | "favourites" => Ok(SortKey::Favorites),
            other => Err(NessbookError::Validation(format!(
                "unknown sort key {:?} (expected title, author, rating or favorites)",
                other
            ))),
        }
    }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    /// Exact genre to keep; empty keeps all.
    pub genre: String,
    pub sort: SortKey,
}

impl ViewQuery {
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.genre.is_empty()
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        self.matches_term(book, &self.search.to_lowercase())
    }

    /// `term` is the already lowercased search text.
    fn matches_term(&self, book: &BookRecord, term: &str) -> bool {
        let matches_search = term.is_empty()
            || book.title.to_lowercase().contains(term)
            || book.author.to_lowercase().contains(term)
            || book.genre.to_lowercase().contains(term);
        let matches_genre = self.genre.is_empty() || book.genre == self.genre;
        matches_search && matches_genre
    }

    pub fn compare(&self, a: &BookRecord, b: &BookRecord) -> Ordering {
        match self.sort {
            SortKey::Title => collate(&a.title, &b.title),
            SortKey::Author => collate(&a.author, &b.author),
            SortKey::Rating => b.rating().cmp(&a.rating()),
            SortKey::Favorites => b
                .is_favorite
                .cmp(&a.is_favorite)
                .then_with(|| b.rating().cmp(&a.rating())),
        }
    }
}

/// Books passing `query`, in `query.sort` order. Ties keep collection order.
pub fn filter_and_sort<'a>(books: &'a [BookRecord], query: &ViewQuery) -> Vec<&'a BookRecord> {
    filter_and_sort_indexed(books, query)
        .into_iter()
        .map(|(_, book)| book)
        .collect()
}

/// Like [`filter_and_sort`], keeping each book's index in `books`.
pub fn filter_and_sort_indexed<'a>(
    books: &'a [BookRecord],
    query: &ViewQuery,
) -> Vec<(usize, &'a BookRecord)> {
    let term = query.search.to_lowercase();
    let mut view: Vec<(usize, &BookRecord)> = books
        .iter()
        .enumerate()
        .filter(|(_, b)| query.matches_term(b, &term))
        .collect();
    view.sort_by(|(_, a), (_, b)| query.compare(a, b));
    view
}

/// Human ordering of text: case and common Latin accents are ignored first,
/// lowercase sorts before uppercase when that is the only difference.
pub fn collate(a: &str, b: &str) -> Ordering {
    let ka = a.chars().map(base_letter);
    let kb = b.chars().map(base_letter);
    ka.cmp(kb)
        .then_with(|| {
            let la = a.chars().flat_map(char::to_lowercase);
            let lb = b.chars().flat_map(char::to_lowercase);
            la.cmp(lb)
        })
        .then_with(|| b.cmp(a))
}

fn base_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'œ' => 'o',
        'æ' => 'a',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, genre: &str, rating: u8, favorite: bool) -> BookRecord {
        let mut b = BookRecord::new(title, author, genre);
        b.ratings.rating = rating;
        b.is_favorite = favorite;
        b
    }

    fn titles(view: &[&BookRecord]) -> Vec<String> {
        view.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn favorites_first_overrides_rating() {
        let books = vec![book("B", "x", "g", 5, false), book("A", "x", "g", 1, true)];
        let query = ViewQuery {
            sort: SortKey::Favorites,
            ..Default::default()
        };
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["A", "B"]);
    }

    #[test]
    fn favorites_are_ranked_by_rating_within_partition() {
        let books = vec![
            book("low fav", "x", "g", 2, true),
            book("plain", "x", "g", 4, false),
            book("high fav", "x", "g", 5, true),
            book("plain top", "x", "g", 5, false),
        ];
        let query = ViewQuery {
            sort: SortKey::Favorites,
            ..Default::default()
        };
        assert_eq!(
            titles(&filter_and_sort(&books, &query)),
            vec!["high fav", "low fav", "plain top", "plain"]
        );
    }

    #[test]
    fn rating_sort_is_descending_and_stable() {
        let books = vec![
            book("unrated", "x", "g", 0, false),
            book("three", "x", "g", 3, false),
            book("five", "x", "g", 5, false),
            book("three again", "x", "g", 3, false),
        ];
        let query = ViewQuery {
            sort: SortKey::Rating,
            ..Default::default()
        };
        assert_eq!(
            titles(&filter_and_sort(&books, &query)),
            vec!["five", "three", "three again", "unrated"]
        );
    }

    #[test]
    fn title_sort_ignores_case_and_accents() {
        let books = vec![
            book("zola", "x", "g", 0, false),
            book("Étranger", "x", "g", 0, false),
            book("foo", "x", "g", 0, false),
            book("Alice", "x", "g", 0, false),
        ];
        let view = filter_and_sort(&books, &ViewQuery::default());
        assert_eq!(titles(&view), vec!["Alice", "Étranger", "foo", "zola"]);
    }

    #[test]
    fn author_sort() {
        let books = vec![
            book("1", "Zafón", "g", 0, false),
            book("2", "austen", "g", 0, false),
        ];
        let query = ViewQuery {
            sort: SortKey::Author,
            ..Default::default()
        };
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["2", "1"]);
    }

    #[test]
    fn search_matches_title_author_or_genre_case_insensitively() {
        let books = vec![
            book("Dune", "Herbert", "Science-Fiction", 0, false),
            book("Emma", "Austen", "Romance", 0, false),
            book("Scythe", "Shusterman", "Dystopia", 0, false),
        ];
        let mut query = ViewQuery {
            search: "SCIENCE".into(),
            ..Default::default()
        };
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["Dune"]);

        query.search = "aus".into();
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["Emma"]);

        query.search = "sc".into();
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["Dune", "Scythe"]);
    }

    #[test]
    fn single_book_match_agrees_with_filtered_view() {
        let books = vec![
            book("Dune", "Herbert", "Science-Fiction", 0, false),
            book("Emma", "Austen", "Romance", 0, false),
        ];
        let query = ViewQuery {
            search: "HeRb".into(),
            ..Default::default()
        };
        let kept: Vec<bool> = books.iter().map(|b| query.matches(b)).collect();
        assert_eq!(kept, vec![true, false]);
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["Dune"]);
    }

    #[test]
    fn genre_filter_is_exact() {
        let books = vec![
            book("A", "x", "Romance", 0, false),
            book("B", "x", "Dark Romance", 0, false),
        ];
        let query = ViewQuery {
            genre: "Romance".into(),
            ..Default::default()
        };
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["A"]);
    }

    #[test]
    fn search_and_genre_combine() {
        let books = vec![
            book("Love", "x", "Romance", 0, false),
            book("Love Lost", "x", "Thriller", 0, false),
        ];
        let query = ViewQuery {
            search: "love".into(),
            genre: "Thriller".into(),
            ..Default::default()
        };
        assert_eq!(titles(&filter_and_sort(&books, &query)), vec!["Love Lost"]);
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("Rating".parse::<SortKey>().unwrap(), SortKey::Rating);
        assert_eq!("favourites".parse::<SortKey>().unwrap(), SortKey::Favorites);
        assert!("pages".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Favorites.to_string(), "favorites");
    }
}
