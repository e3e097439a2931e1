use crate::collection::CollectionStats;
use crate::config::NessbookConfig;
use crate::error::{NessbookError, Result};
use crate::model::{BookRecord, Schedule, UserProfile, MAX_RATING};
use chrono::NaiveDate;

pub mod add;
pub mod auth;
pub mod config;
pub mod delete;
pub mod edit;
pub mod genres;
pub mod list;
pub mod reorder;
pub mod stats;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A book as listed, with its 1-based position in the manual order.
#[derive(Debug, Clone)]
pub struct ListedBook {
    pub position: usize,
    pub book: BookRecord,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_books: Vec<BookRecord>,
    pub listed_books: Vec<ListedBook>,
    pub stats: Option<CollectionStats>,
    pub genres: Vec<String>,
    pub config: Option<NessbookConfig>,
    pub user: Option<UserProfile>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_books(mut self, books: Vec<BookRecord>) -> Self {
        self.affected_books = books;
        self
    }

    pub fn with_listed_books(mut self, books: Vec<ListedBook>) -> Self {
        self.listed_books = books;
        self
    }

    pub fn with_stats(mut self, stats: CollectionStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_config(mut self, config: NessbookConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }
}

/// Field changes entered by the user, applied onto a full record before it is
/// sent. Unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct BookEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub started: Option<NaiveDate>,
    pub finished: Option<NaiveDate>,
    pub year: Option<i32>,
    pub pages: Option<u32>,
    pub rating: Option<u8>,
    pub character_rating: Option<u8>,
    pub environment_rating: Option<u8>,
    pub plot_rating: Option<u8>,
    pub plot_twist_rating: Option<u8>,
    pub originality_rating: Option<u8>,
    pub favorite: Option<bool>,
    pub resume: Option<String>,
    pub comment: Option<String>,
    /// URL or data URL; an empty string removes the image.
    pub image: Option<String>,
    /// New quotes as `(text, page)`, attributed to the book's author.
    pub add_quotes: Vec<(String, String)>,
    /// 1-based positions of quotes to drop.
    pub remove_quotes: Vec<usize>,
}

impl BookEdit {
    pub fn apply(&self, book: &mut BookRecord) -> Result<()> {
        if let Some(title) = &self.title {
            book.title = title.trim().to_string();
        }
        if let Some(author) = &self.author {
            book.author = author.trim().to_string();
        }
        if let Some(genre) = &self.genre {
            book.genre = genre.trim().to_string();
        }

        self.apply_schedule(book)?;

        let ratings = &mut book.ratings;
        for (value, slot) in [
            (self.rating, &mut ratings.rating),
            (self.character_rating, &mut ratings.character_rating),
            (self.environment_rating, &mut ratings.environment_rating),
            (self.plot_rating, &mut ratings.plot_rating),
            (self.plot_twist_rating, &mut ratings.plot_twist_rating),
            (self.originality_rating, &mut ratings.originality_rating),
        ] {
            if let Some(value) = value {
                if value > MAX_RATING {
                    return Err(NessbookError::Validation(format!(
                        "ratings go from 0 to {}, got {}",
                        MAX_RATING, value
                    )));
                }
                *slot = value;
            }
        }

        if let Some(favorite) = self.favorite {
            book.is_favorite = favorite;
        }
        if let Some(resume) = &self.resume {
            book.resume = resume.clone();
        }
        if let Some(comment) = &self.comment {
            book.comment = comment.clone();
        }
        if let Some(image) = &self.image {
            book.image = Some(image.trim().to_string()).filter(|i| !i.is_empty());
        }

        let mut remove = self.remove_quotes.clone();
        remove.sort_unstable();
        remove.dedup();
        for position in remove.into_iter().rev() {
            if position == 0 || position > book.quotes.len() {
                return Err(NessbookError::Validation(format!(
                    "no quote #{} (book has {})",
                    position,
                    book.quotes.len()
                )));
            }
            book.quotes.remove(position - 1);
        }
        for (text, page) in &self.add_quotes {
            book.add_quote(text.clone(), page.clone());
        }
        Ok(())
    }

    fn apply_schedule(&self, book: &mut BookRecord) -> Result<()> {
        if self.started.is_some() || self.finished.is_some() {
            let (started, finished) = match book.schedule {
                Schedule::Dated { started, finished } => (started, finished),
                Schedule::Legacy { .. } => (None, None),
            };
            let started = self.started.or(started);
            let finished = self.finished.or(finished);
            if let (Some(s), Some(f)) = (started, finished) {
                if f < s {
                    return Err(NessbookError::Validation(format!(
                        "finished date {} is before started date {}",
                        f, s
                    )));
                }
            }
            book.schedule = Schedule::Dated { started, finished };
        }

        if self.year.is_some() || self.pages.is_some() {
            match &mut book.schedule {
                Schedule::Legacy { year, pages } => {
                    if let Some(y) = self.year {
                        *year = y;
                    }
                    if let Some(p) = self.pages {
                        *pages = Some(p);
                    }
                }
                Schedule::Dated { .. } => {
                    return Err(NessbookError::Validation(
                        "year and pages only apply to books tracked by year; use reading dates"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Required-field check done before anything reaches the repository.
pub fn validate_required(book: &BookRecord, require_genre: bool) -> Result<()> {
    if book.title.trim().is_empty() {
        return Err(NessbookError::Validation("title is required".to_string()));
    }
    if book.author.trim().is_empty() {
        return Err(NessbookError::Validation("author is required".to_string()));
    }
    if require_genre && book.genre.trim().is_empty() {
        return Err(NessbookError::Validation("genre is required".to_string()));
    }
    Ok(())
}
