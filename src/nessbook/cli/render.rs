use colored::Colorize;
use nessbook::collection::CollectionStats;
use nessbook::commands::{CmdMessage, ListedBook, MessageLevel};
use nessbook::config::NessbookConfig;
use nessbook::image::is_inline;
use nessbook::model::{BookRecord, Schedule, UserProfile, MAX_RATING};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const AUTHOR_WIDTH: usize = 24;
const GENRE_WIDTH: usize = 16;
const FAVORITE_MARKER: &str = "♥";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub(super) fn print_book_list(books: &[ListedBook]) {
    if books.is_empty() {
        return;
    }
    let max_pos = books.iter().map(|b| b.position).max().unwrap_or(0);
    let pos_width = max_pos.to_string().len() + 2;

    for listed in books {
        let book = &listed.book;
        let pos = format!("{:>w$}", format!("{}.", listed.position), w = pos_width);
        let marker = if book.is_favorite {
            FAVORITE_MARKER.red().to_string()
        } else {
            " ".to_string()
        };
        let rating = stars(book.rating());

        let fixed = pos_width + 2 + AUTHOR_WIDTH + GENRE_WIDTH + MAX_RATING as usize + 4;
        let title_width = LINE_WIDTH.saturating_sub(fixed);

        println!(
            "{} {} {} {} {} {}",
            pos.yellow(),
            marker,
            pad_to_width(&book.title, title_width).bold(),
            pad_to_width(&book.author, AUTHOR_WIDTH),
            pad_to_width(&book.genre, GENRE_WIDTH).dimmed(),
            rating.yellow()
        );
    }
}

pub(super) fn print_full_book(book: &BookRecord) {
    let favorite = if book.is_favorite {
        format!(" {}", FAVORITE_MARKER.red())
    } else {
        String::new()
    };
    println!("{}{}", book.title.bold(), favorite);
    println!("{} {}", "by".dimmed(), book.author);
    if let Some(id) = &book.id {
        println!("{} {}", "id".dimmed(), id.dimmed());
    }
    println!("--------------------------------");

    field("Genre", &book.genre);
    match &book.schedule {
        Schedule::Legacy { year, pages } => {
            field("Year", &year.to_string());
            if let Some(pages) = pages {
                field("Pages", &pages.to_string());
            }
        }
        Schedule::Dated { started, finished } => {
            if let Some(d) = started {
                field("Started", &d.to_string());
            }
            if let Some(d) = finished {
                field("Finished", &d.to_string());
            }
        }
    }
    field("Rating", &stars(book.rating()));
    if let Some(detailed) = book.visible_detailed_ratings() {
        for (label, value) in detailed {
            field(label, &stars(value));
        }
    }

    let image = book.display_image();
    if book.image.is_none() {
        field("Cover", "placeholder");
    } else if is_inline(&image) {
        field("Cover", "embedded image");
    } else {
        field("Cover", &image);
    }

    if !book.resume.is_empty() {
        println!("\n{}\n{}", "Summary".bold(), book.resume);
    }
    if !book.comment.is_empty() {
        println!("\n{}\n{}", "Comment".bold(), book.comment);
    }
    if !book.quotes.is_empty() {
        println!("\n{}", "Quotes".bold());
        for (i, quote) in book.quotes.iter().enumerate() {
            let page = if quote.page.is_empty() {
                String::new()
            } else {
                format!(", p. {}", quote.page)
            };
            println!(
                "{} \"{}\" {}",
                format!("{}.", i + 1).yellow(),
                quote.text,
                format!("({}{})", quote.author, page).dimmed()
            );
        }
    }
    if !book.highlights.is_empty() {
        println!("\n{}", "Highlights".bold());
        for highlight in &book.highlights {
            println!("- {}", highlight);
        }
    }
}

fn field(label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("{} {}", format!("{:<20}", format!("{}:", label)).dimmed(), value);
}

pub(super) fn print_stats(stats: &CollectionStats) {
    let label = |name: &str| format!("{:<16}", name).bold();
    println!("{} {}", label("Books"), stats.total);
    println!("{} {}", label("Favorites"), stats.favorites);
    println!("{} {:.1}", label("Average rating"), stats.average_rating);
    println!("{} {}", label("Genres"), stats.genre_count);

    if stats.genre_distribution.is_empty() {
        return;
    }
    println!();
    let widest = stats
        .genre_distribution
        .iter()
        .map(|(g, _)| g.width())
        .max()
        .unwrap_or(0)
        .min(GENRE_WIDTH * 2);
    let max = stats
        .genre_distribution
        .iter()
        .map(|(_, n)| *n)
        .max()
        .unwrap_or(1)
        .max(1);
    let bar_room = LINE_WIDTH.saturating_sub(widest + 8);
    for (genre, count) in &stats.genre_distribution {
        let bar = "█".repeat((count * bar_room / max).max(1));
        println!(
            "{} {} {}",
            pad_to_width(genre, widest),
            bar.cyan(),
            count
        );
    }
}

pub(super) fn print_genres(genres: &[String]) {
    for genre in genres {
        println!("{}", genre);
    }
}

pub(super) fn print_config(config: &NessbookConfig) {
    println!("api-url = {}", config.api_url);
    println!("timeout-secs = {}", config.timeout_secs);
}

pub(super) fn print_user(user: &UserProfile) {
    if user.username.is_empty() {
        println!("{}", user.email);
    } else {
        println!("{} <{}>", user.username, user.email);
    }
}

/// Truncates with an ellipsis or pads with spaces to exactly `width` columns.
pub(super) fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = out.width();
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
