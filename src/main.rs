//! marcador command-line front end.
//!
//! Every subcommand maps onto one `BookmarkProxy` call against either a local
//! store (`--db`) or a running `marcador-server` (`--host`).

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use marcador::app::{App, Backend};
use marcador::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use marcador::types::bookmark::Bookmark;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address of a marcador server (host:port)
    #[arg(long)]
    host: Option<String>,
    /// Bookmark database path
    #[arg(long)]
    db: Option<String>,
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new bookmark
    Add {
        url: String,
        #[arg(short, long, default_value = "")]
        description: String,
        tags: Vec<String>,
    },
    /// Attach a tag to a bookmark
    Tag { url: String, tag: String },
    /// List bookmarks
    #[command(alias = "print")]
    List {
        #[arg(long)]
        json: bool,
        /// Most visited first
        #[arg(long)]
        sorted: bool,
    },
    /// Delete a bookmark by url
    Delete { url: String },
    /// Record a visit and print the url
    Open { url: String },
    /// List bookmarks carrying a tag
    Search {
        tag: String,
        #[arg(long)]
        json: bool,
    },
    /// List known tags
    Tags {
        /// Remove tags no bookmark uses (local store only)
        #[arg(long)]
        prune: bool,
    },
    /// Replace the url and tags of bookmark `id`
    Edit {
        id: i64,
        url: String,
        tags: Vec<String>,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn print_bookmarks(bookmarks: &[Bookmark], json: bool) -> Result<(), String> {
    if json {
        let out = serde_json::to_string_pretty(bookmarks).map_err(|e| e.to_string())?;
        println!("{}", out);
    } else {
        for bookmark in bookmarks {
            println!("{}\n", bookmark);
        }
    }
    Ok(())
}

fn show_config(engine: &ConfigEngine, save: bool) -> Result<(), String> {
    let json = serde_json::to_string_pretty(engine.get_config()).map_err(|e| e.to_string())?;
    println!("{}", json);
    if save {
        engine.save().map_err(|e| e.to_string())?;
        eprintln!("Saved to {}", engine.get_config_path().display());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    let mut engine = ConfigEngine::new(cli.config);
    engine.load().map_err(|e| e.to_string())?;
    engine.apply_env();
    engine.apply_client_flags(cli.db, cli.host);

    if let Commands::Config { save } = cli.command {
        return show_config(&engine, save);
    }

    let app = App::new(&engine).map_err(|e| e.to_string())?;
    let proxy = app.proxy();

    match cli.command {
        Commands::Add { url, description, tags } => proxy.add(&url, &description, &tags),
        Commands::Tag { url, tag } => proxy.add_tag(&url, &tag),
        Commands::List { json, sorted } => {
            let bookmarks = proxy.list(sorted).map_err(|e| e.to_string())?;
            return print_bookmarks(&bookmarks, json);
        }
        Commands::Delete { url } => proxy.delete(&url).map(|removed| println!("{}", removed)),
        Commands::Open { url } => proxy.hit(&url).map(|bookmark| println!("{}", bookmark.url)),
        Commands::Search { tag, json } => {
            let bookmarks = proxy.tag_search(&tag).map_err(|e| e.to_string())?;
            return print_bookmarks(&bookmarks, json);
        }
        Commands::Tags { prune } => {
            if prune {
                match &app.backend {
                    Backend::Local(local) => {
                        let removed = local.prune_tags().map_err(|e| e.to_string())?;
                        eprintln!("Removed {} unused tags", removed);
                    }
                    Backend::Remote(_) => {
                        return Err("--prune needs a local store (--db)".to_string())
                    }
                }
            }
            proxy.tag_list().map(|tags| {
                for tag in tags {
                    println!("{}", tag);
                }
            })
        }
        Commands::Edit { id, url, tags } => proxy.edit(id, &url, &tags).map(|b| println!("{}", b)),
        Commands::Config { .. } => Ok(()),
    }
    .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marcador: {}", e);
            ExitCode::FAILURE
        }
    }
}
