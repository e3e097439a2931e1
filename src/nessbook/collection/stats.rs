use crate::model::BookRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Summary figures shown on the dashboard and profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    pub total: usize,
    pub favorites: usize,
    /// Mean of `rating` over every book (unrated counts as 0), one decimal.
    pub average_rating: f64,
    /// Distinct non-empty genres.
    pub genre_count: usize,
    /// Books per non-empty genre, largest first, then by name.
    pub genre_distribution: Vec<(String, usize)>,
}

impl CollectionStats {
    pub fn from_books(books: &[BookRecord]) -> Self {
        let total = books.len();
        let favorites = books.iter().filter(|b| b.is_favorite).count();
        let average_rating = if total == 0 {
            0.0
        } else {
            let sum: u32 = books.iter().map(|b| b.rating() as u32).sum();
            round_one_decimal(sum as f64 / total as f64)
        };

        let mut per_genre: BTreeMap<&str, usize> = BTreeMap::new();
        for book in books.iter().filter(|b| !b.genre.is_empty()) {
            *per_genre.entry(book.genre.as_str()).or_default() += 1;
        }
        let mut genre_distribution: Vec<(String, usize)> = per_genre
            .into_iter()
            .map(|(genre, count)| (genre.to_string(), count))
            .collect();
        // BTreeMap yields names in order; the stable sort keeps that for ties
        genre_distribution.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total,
            favorites,
            average_rating,
            genre_count: genre_distribution.len(),
            genre_distribution,
        }
    }
}

/// Distinct non-empty genres, sorted.
pub fn genres(books: &[BookRecord]) -> Vec<String> {
    books
        .iter()
        .filter(|b| !b.genre.is_empty())
        .map(|b| b.genre.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(genre: &str, rating: u8, favorite: bool) -> BookRecord {
        let mut b = BookRecord::new("t", "a", genre);
        b.ratings.rating = rating;
        b.is_favorite = favorite;
        b
    }

    #[test]
    fn empty_collection_averages_zero() {
        let stats = CollectionStats::from_books(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert!(!stats.average_rating.is_nan());
        assert_eq!(stats.genre_count, 0);
    }

    #[test]
    fn counts_and_average() {
        let books = vec![
            book("Fantasy", 5, true),
            book("Fantasy", 4, false),
            book("Romance", 0, true),
        ];
        let stats = CollectionStats::from_books(&books);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.favorites, 2);
        assert_eq!(stats.average_rating, 3.0);
        assert_eq!(stats.genre_count, 2);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let books = vec![book("", 5, false), book("", 4, false), book("", 4, false)];
        assert_eq!(CollectionStats::from_books(&books).average_rating, 4.3);
    }

    #[test]
    fn empty_genres_are_not_counted() {
        let books = vec![book("", 1, false), book("Thriller", 1, false)];
        let stats = CollectionStats::from_books(&books);
        assert_eq!(stats.genre_count, 1);
        assert_eq!(genres(&books), vec!["Thriller"]);
    }

    #[test]
    fn distribution_is_largest_first_then_by_name() {
        let books = vec![
            book("Thriller", 0, false),
            book("Romance", 0, false),
            book("Fantasy", 0, false),
            book("Romance", 0, false),
        ];
        let stats = CollectionStats::from_books(&books);
        assert_eq!(
            stats.genre_distribution,
            vec![
                ("Romance".to_string(), 2),
                ("Fantasy".to_string(), 1),
                ("Thriller".to_string(), 1),
            ]
        );
    }
}
