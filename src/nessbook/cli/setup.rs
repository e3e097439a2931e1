use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use nessbook::collection::SortKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nessbook", bin_name = "nessbook", version)]
#[command(about = "Keep track of the books you read", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session on this machine
    Login {
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        email: String,

        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List books in manual order, or filtered and sorted
    #[command(alias = "ls")]
    List {
        /// Match title, author or genre
        #[arg(short, long)]
        search: Option<String>,

        /// Only this genre
        #[arg(short, long)]
        genre: Option<String>,

        /// title, author, rating or favorites
        #[arg(long, default_value_t = SortKey::Title)]
        sort: SortKey,
    },

    /// Show a book in full
    View { id: String },

    /// Add a book (title, author and genre are required)
    Add {
        #[command(flatten)]
        fields: BookArgs,
    },

    /// Change some fields of a book
    Edit {
        id: String,

        #[command(flatten)]
        fields: BookArgs,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete { id: String },

    /// Move a book to another position of the manual order
    Move {
        /// Current position, as shown by `list`
        from: usize,
        /// New position
        to: usize,
    },

    /// Totals, average rating and genre distribution
    Stats,

    /// Genres in use
    Genres {
        /// Include the suggested genres
        #[arg(long)]
        suggested: bool,
    },

    /// Show or change configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct BookArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Date you started reading (YYYY-MM-DD)
    #[arg(long)]
    pub started: Option<NaiveDate>,

    /// Date you finished reading (YYYY-MM-DD)
    #[arg(long)]
    pub finished: Option<NaiveDate>,

    /// Only for books tracked by year
    #[arg(long)]
    pub year: Option<i32>,

    /// Only for books tracked by year
    #[arg(long)]
    pub pages: Option<u32>,

    /// Overall rating, 0 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub rating: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub character_rating: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub environment_rating: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub plot_rating: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub plot_twist_rating: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub originality_rating: Option<u8>,

    /// true or false
    #[arg(long)]
    pub favorite: Option<bool>,

    #[arg(long)]
    pub resume: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    /// Cover image URL; empty to remove
    #[arg(long, conflicts_with = "image_file")]
    pub image: Option<String>,

    /// Embed a local image file as the cover
    #[arg(long)]
    pub image_file: Option<PathBuf>,

    /// Add a quote, as TEXT or TEXT@PAGE (repeatable)
    #[arg(long = "quote")]
    pub quotes: Vec<String>,

    /// Remove the quote at this position (repeatable)
    #[arg(long = "remove-quote")]
    pub remove_quotes: Vec<usize>,
}

/// Splits `TEXT@PAGE`; a suffix that is not a page reference stays in the text.
pub fn split_quote(raw: &str) -> (String, String) {
    if let Some((text, page)) = raw.rsplit_once('@') {
        let page = page.trim();
        let looks_like_page = !page.is_empty()
            && page
                .chars()
                .all(|c| c.is_ascii_digit() || c == '-' || c == ',' || c == ' ');
        if looks_like_page {
            return (text.trim().to_string(), page.to_string());
        }
    }
    (raw.trim().to_string(), String::new())
}
