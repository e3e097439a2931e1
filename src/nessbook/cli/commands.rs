//! # CLI Layer
//!
//! One client of the nessbook library. This is the only place that reads
//! stdin, writes to stdout, and builds the production collaborators:
//! the HTTP repository, the file preference store and the restored session.
//!
//! - `run()`: dispatch, called by `main.rs`
//! - `init_context()`: builds `AppContext`
//! - `handle_*()`: one per subcommand, calls the API and renders the result

use super::render::{
    print_book_list, print_config, print_full_book, print_genres, print_messages, print_stats,
    print_user,
};
use super::setup::{split_quote, BookArgs, Cli, Commands};
use clap::{CommandFactory, Parser};
use nessbook::api::NessbookApi;
use nessbook::collection::{SortKey, ViewQuery};
use nessbook::commands::config::ConfigAction;
use nessbook::commands::{BookEdit, CmdResult};
use nessbook::config::{NessbookConfig, NessbookPaths};
use nessbook::error::{NessbookError, Result};
use nessbook::image::inline_image;
use nessbook::prefs::fs::FilePreferenceStore;
use nessbook::repository::http::{ApiClient, HttpRepository};
use nessbook::session::Session;
use std::io::{self, BufRead, Write};

struct AppContext {
    api: NessbookApi<HttpRepository, FilePreferenceStore>,
    client: ApiClient,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command()
            .print_help()
            .map_err(NessbookError::Io)?;
        return Ok(());
    };

    let mut ctx = init_context()?;

    match command {
        Commands::Login { email, password } => handle_login(&mut ctx, email, password),
        Commands::Register {
            username,
            email,
            password,
        } => handle_register(&ctx, username, email, password),
        Commands::Logout => handle_logout(&mut ctx),
        Commands::Whoami => handle_whoami(&ctx),
        Commands::List {
            search,
            genre,
            sort,
        } => handle_list(&mut ctx, search, genre, sort),
        Commands::View { id } => handle_view(&mut ctx, id),
        Commands::Add { fields } => handle_add(&mut ctx, fields),
        Commands::Edit { id, fields } => handle_edit(&mut ctx, id, fields),
        Commands::Delete { id } => handle_delete(&mut ctx, id),
        Commands::Move { from, to } => handle_move(&mut ctx, from, to),
        Commands::Stats => handle_stats(&mut ctx),
        Commands::Genres { suggested } => handle_genres(&mut ctx, suggested),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn init_context() -> Result<AppContext> {
    let paths = NessbookPaths::from_env()?;
    let config = NessbookConfig::load(&paths.data_dir)
        .unwrap_or_else(|e| {
            log::warn!("ignoring unreadable config: {}", e);
            NessbookConfig::default()
        })
        .with_env();
    log::debug!("data dir {} api {}", paths.data_dir.display(), config.api_url);

    let client = ApiClient::new(&config)?;
    let mut prefs = FilePreferenceStore::new(paths.data_dir.clone());
    let session = Session::init(&mut prefs)?;
    let repository = client
        .clone()
        .authenticated(session.token().unwrap_or_default());

    Ok(AppContext {
        api: NessbookApi::new(repository, prefs, session, paths),
        client,
    })
}

fn handle_login(ctx: &mut AppContext, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let result = ctx.api.login(&ctx.client, &email, &password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_register(
    ctx: &AppContext,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let result = ctx.api.register(&ctx.client, &username, &email, &password)?;
    print_messages(&result.messages);
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().map_err(NessbookError::Io)?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(NessbookError::Io)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.whoami()?;
    if let Some(user) = &result.user {
        print_user(user);
    }
    Ok(())
}

fn handle_list(
    ctx: &mut AppContext,
    search: Option<String>,
    genre: Option<String>,
    sort: SortKey,
) -> Result<()> {
    let query = ViewQuery {
        search: search.unwrap_or_default(),
        genre: genre.unwrap_or_default(),
        sort,
    };
    let result = ctx.api.list_books(query)?;
    print_book_list(&result.listed_books);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.view_book(&id)?;
    for book in &result.affected_books {
        print_full_book(book);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, fields: BookArgs) -> Result<()> {
    let edit = to_edit(fields)?;
    let result = ctx.api.add_book(&edit)?;
    print_ids(&result);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: String, fields: BookArgs) -> Result<()> {
    let edit = to_edit(fields)?;
    let result = ctx.api.edit_book(&id, &edit)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.delete_book(&id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, from: usize, to: usize) -> Result<()> {
    let result = ctx.api.move_book(from, to)?;
    print_book_list(&result.listed_books);
    print_messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    Ok(())
}

fn handle_genres(ctx: &mut AppContext, suggested: bool) -> Result<()> {
    let result = ctx.api.genres(suggested)?;
    print_genres(&result.genres);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_ids(result: &CmdResult) {
    for book in &result.affected_books {
        if let Some(id) = &book.id {
            println!("{}", id);
        }
    }
}

fn to_edit(fields: BookArgs) -> Result<BookEdit> {
    let image = match (&fields.image, &fields.image_file) {
        (_, Some(path)) => Some(inline_image(path)?),
        (Some(url), None) => Some(url.clone()),
        (None, None) => None,
    };
    Ok(BookEdit {
        title: fields.title,
        author: fields.author,
        genre: fields.genre,
        started: fields.started,
        finished: fields.finished,
        year: fields.year,
        pages: fields.pages,
        rating: fields.rating,
        character_rating: fields.character_rating,
        environment_rating: fields.environment_rating,
        plot_rating: fields.plot_rating,
        plot_twist_rating: fields.plot_twist_rating,
        originality_rating: fields.originality_rating,
        favorite: fields.favorite,
        resume: fields.resume,
        comment: fields.comment,
        image,
        add_quotes: fields.quotes.iter().map(|q| split_quote(q)).collect(),
        remove_quotes: fields.remove_quotes,
    })
}
