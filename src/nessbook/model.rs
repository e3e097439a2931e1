//! Core data types.
//!
//! [`BookRecord`] is what the rest of the crate works with. On the wire it is a
//! single flat JSON object with optional fields (camelCase keys, identity under
//! `_id`); internally the two reading-date schemas are folded into [`Schedule`]
//! so the legacy/dated decision is made exactly once, at deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub type BookId = String;

/// Highest value any rating can hold. Zero means "not rated".
pub const MAX_RATING: u8 = 5;

/// Genres offered as hints when adding a book. Genre stays free text.
pub const SUGGESTED_GENRES: &[&str] = &[
    "New Romance",
    "Dark Romance",
    "Romance",
    "Fantasy",
    "Thriller",
    "Science-Fiction",
    "Autres",
];

/// When a book was read.
///
/// Older records carry a publication `year` and a page count; newer ones carry
/// the dates the reader started and finished the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Legacy {
        year: i32,
        pages: Option<u32>,
    },
    Dated {
        started: Option<NaiveDate>,
        finished: Option<NaiveDate>,
    },
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Dated {
            started: None,
            finished: None,
        }
    }
}

impl Schedule {
    /// Classifies the flat boundary fields: legacy iff a year is set and no
    /// start date is.
    pub fn classify(
        year: Option<i32>,
        pages: Option<u32>,
        started: Option<NaiveDate>,
        finished: Option<NaiveDate>,
    ) -> Self {
        match (year, started) {
            (Some(year), None) => Schedule::Legacy { year, pages },
            _ => Schedule::Dated { started, finished },
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Schedule::Legacy { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub character_rating: u8,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub environment_rating: u8,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub plot_rating: u8,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub plot_twist_rating: u8,
    #[serde(default, deserialize_with = "lenient::rating")]
    pub originality_rating: u8,
}

impl Ratings {
    /// The five sub-ratings, labelled, in display order.
    pub fn detailed(&self) -> [(&'static str, u8); 5] {
        [
            ("Characters", self.character_rating),
            ("Setting", self.environment_rating),
            ("Plot", self.plot_rating),
            ("Plot twists", self.plot_twist_rating),
            ("Originality", self.originality_rating),
        ]
    }

    pub fn has_detailed(&self) -> bool {
        self.detailed().iter().any(|(_, v)| *v > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    /// Free text, e.g. "12" or "12-13".
    #[serde(default, deserialize_with = "lenient::string")]
    pub page: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
}

/// A single catalogued book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireBook", into = "WireBook")]
pub struct BookRecord {
    /// Assigned by the repository on creation.
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub schedule: Schedule,
    pub ratings: Ratings,
    pub is_favorite: bool,
    pub resume: String,
    pub comment: String,
    /// Remote URL or inline data URL.
    pub image: Option<String>,
    pub quotes: Vec<Quote>,
    /// No longer editable, but always carried through a round-trip.
    pub highlights: Vec<String>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            ..Self::default()
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.schedule.is_legacy()
    }

    pub fn rating(&self) -> u8 {
        self.ratings.rating
    }

    /// Sub-ratings to show, or `None` for legacy records which never had them.
    pub fn visible_detailed_ratings(&self) -> Option<[(&'static str, u8); 5]> {
        if self.is_legacy() {
            None
        } else {
            Some(self.ratings.detailed())
        }
    }

    /// Appends a quote attributed to the book's author.
    pub fn add_quote(&mut self, text: impl Into<String>, page: impl Into<String>) -> &mut Quote {
        self.quotes.push(Quote {
            text: text.into(),
            page: page.into(),
            author: self.author.clone(),
        });
        let last = self.quotes.len() - 1;
        &mut self.quotes[last]
    }

    /// The stored image, or a placeholder derived from the title.
    pub fn display_image(&self) -> Cow<'_, str> {
        match self.image.as_deref() {
            Some(image) if !image.is_empty() => Cow::Borrowed(image),
            _ => Cow::Owned(placeholder_image(&self.title)),
        }
    }
}

const PLACEHOLDER_COLORS: [&str; 6] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3",
];

/// Deterministic SVG cover for books without an image. Never persisted.
pub fn placeholder_image(title: &str) -> String {
    let code = title.encode_utf16().next().unwrap_or(0) as usize;
    let color = PLACEHOLDER_COLORS[code % PLACEHOLDER_COLORS.len()];
    let letter: String = match title.chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "?".to_string(),
    };

    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 300 400'%3E\
         %3Crect width='300' height='400' fill='{}'/%3E\
         %3Ctext x='50%25' y='50%25' text-anchor='middle' fill='white' font-size='120' \
         font-family='Arial' font-weight='bold'%3E{}%3C/text%3E%3C/svg%3E",
        percent_encode(color),
        percent_encode(&letter)
    )
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'!' | b'~' | b'*'
            | b'\'' | b'(' | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Persisted manual position of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOrderEntry {
    pub id: BookId,
    pub order: usize,
}

/// The signed-in user, as returned alongside the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    pub email: String,
}

/// Flat boundary shape of a book.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBook {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    author: String,
    #[serde(default, deserialize_with = "lenient::string")]
    genre: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_i32",
        skip_serializing_if = "Option::is_none"
    )]
    year: Option<i32>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pages: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    started_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    finished_date: Option<NaiveDate>,
    #[serde(flatten)]
    ratings: Ratings,
    #[serde(default, deserialize_with = "lenient::boolean")]
    is_favorite: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    resume: String,
    #[serde(default, deserialize_with = "lenient::string")]
    comment: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    quotes: Vec<Quote>,
    #[serde(default, alias = "highlight", deserialize_with = "lenient::list")]
    highlights: Vec<String>,
}

impl From<WireBook> for BookRecord {
    fn from(w: WireBook) -> Self {
        Self {
            id: w.id,
            title: w.title,
            author: w.author,
            genre: w.genre,
            schedule: Schedule::classify(w.year, w.pages, w.started_date, w.finished_date),
            ratings: w.ratings,
            is_favorite: w.is_favorite,
            resume: w.resume,
            comment: w.comment,
            image: w.image,
            quotes: w.quotes,
            highlights: w.highlights,
        }
    }
}

impl From<BookRecord> for WireBook {
    fn from(b: BookRecord) -> Self {
        let (year, pages, started_date, finished_date) = match b.schedule {
            Schedule::Legacy { year, pages } => (Some(year), pages, None, None),
            Schedule::Dated { started, finished } => (None, None, started, finished),
        };
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            genre: b.genre,
            year,
            pages,
            started_date,
            finished_date,
            ratings: b.ratings,
            is_favorite: b.is_favorite,
            resume: b.resume,
            comment: b.comment,
            image: b.image,
            quotes: b.quotes,
            highlights: b.highlights,
        }
    }
}

/// Tolerant field readers for records written by older clients.
///
/// Browser forms sent empty strings for untouched inputs and strings for
/// numbers, and the server stored whatever it was given.
mod lenient {
    use super::MAX_RATING;
    use chrono::NaiveDate;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let s = string(d)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    /// Zero counts as unset, matching how the year was always checked.
    pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref()
            .and_then(number)
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| *n != 0))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref()
            .and_then(number)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n != 0))
    }

    pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        let n = v.as_ref().and_then(number).unwrap_or(0);
        Ok(n.clamp(0, MAX_RATING as i64) as u8)
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s == "true",
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            _ => false,
        })
    }

    /// Accepts `YYYY-MM-DD`, optionally followed by a time part.
    pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let s = string(d)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        let day = s.get(..10).unwrap_or(s);
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                log::warn!("ignoring unparseable date {:?}", s);
                Ok(None)
            }
        }
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Ok(items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }
}
