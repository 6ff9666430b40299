//! pmem - PaperMemory from the terminal
//!
//! Lists, searches and edits the papers stored in a PaperMemory JSON file.
//!
//! ```bash
//! pmem list "t:nlp"                      # papers tagged nlp
//! pmem list "y:>2015" --sort year --asc  # published before 2015, oldest first
//! pmem tag Arxiv-1706.03762 "nlp, transformers"
//! pmem export Arxiv-1706.03762 --format bibtex
//! pmem anki Arxiv-1706.03762
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use papermemory_core::{
    render_page, to_bibtex, to_markdown_link, AnkiClient, JsonFileStore, MemoryConfig,
    MemoryState, PlainTextRenderer, SortDirection, SortKey,
};
use papermemory_tags::parse_tag_list;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "pmem", version, about = "Search and edit a PaperMemory library")]
struct Cli {
    /// Memory file (defaults to <data dir>/papermemory/memory.json)
    #[arg(short, long, global = true)]
    memory: Option<PathBuf>,

    /// Config file (defaults to <config dir>/papermemory/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List papers matching a query
    List {
        /// Search text: words, `t:tags`, `y:years`, `c:code`
        #[arg(default_value = "")]
        query: String,
        /// Sort key (lastOpenDate, addDate, favoriteDate, title, year, count, id)
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Ascending order
        #[arg(long)]
        asc: bool,
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
        /// Number of pages to print
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show the known tags, or complete a fragment
    Tags {
        fragment: Option<String>,
    },
    /// Replace a paper's tags with a comma separated list
    Tag { id: String, tags: String },
    /// Replace a paper's note
    Note { id: String, note: String },
    /// Set a paper's code link
    Code { id: String, url: String },
    /// Toggle a paper's favorite flag
    Favorite { id: String },
    /// Record that a paper was opened
    Visit { id: String },
    /// Remove a paper from the memory
    Delete { id: String },
    /// Print a paper as a citation
    Export {
        id: String,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
    },
    /// Send a paper to Anki as a flashcard
    Anki {
        id: String,
        /// Deck to add the note to (defaults to the configured deck)
        #[arg(short, long)]
        deck: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Markdown,
    Bibtex,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn default_memory_path() -> CliResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("papermemory").join("memory.json"))
        .ok_or_else(|| "no data directory on this platform, pass --memory".into())
}

fn load_config(path: Option<PathBuf>) -> CliResult<MemoryConfig> {
    match path.or_else(MemoryConfig::default_path) {
        Some(path) => Ok(MemoryConfig::load(&path)?),
        None => Ok(MemoryConfig::default()),
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config)?;
    let memory_path = match cli.memory {
        Some(path) => path,
        None => default_memory_path()?,
    };
    debug!(path = %memory_path.display(), "opening memory");

    let store = JsonFileStore::new(memory_path);
    let mut state = MemoryState::load(store, config).await?;

    match cli.command {
        Command::List {
            query,
            sort,
            asc,
            favorites,
            pages,
        } => list(&mut state, &query, sort, asc, favorites, pages),
        Command::Tags { fragment } => {
            match fragment {
                Some(fragment) => {
                    for suggestion in state.suggest_tags(&fragment) {
                        println!("{}\t{}", suggestion.tag, suggestion.use_count);
                    }
                }
                None => {
                    let vocabulary = state.tag_vocabulary();
                    for tag in vocabulary.tags() {
                        println!("{}\t{}", tag, vocabulary.count(tag));
                    }
                }
            }
            Ok(())
        }
        Command::Tag { id, tags } => {
            state.save_tags(&id, parse_tag_list(&tags)).await?;
            Ok(())
        }
        Command::Note { id, note } => {
            state.save_note(&id, &note).await?;
            Ok(())
        }
        Command::Code { id, url } => {
            state.save_code_link(&id, &url).await?;
            Ok(())
        }
        Command::Favorite { id } => {
            let (favorite, _) = state.toggle_favorite(&id).await?;
            if favorite {
                println!("{} is a favorite", id);
            } else {
                println!("{} is no longer a favorite", id);
            }
            Ok(())
        }
        Command::Visit { id } => {
            state.record_visit(&id).await?;
            Ok(())
        }
        Command::Delete { id } => {
            let removed = state.delete_paper(&id).await?;
            println!("Deleted {} ({})", removed.id, removed.title);
            Ok(())
        }
        Command::Export { id, format } => {
            let paper = state
                .get(&id)
                .ok_or_else(|| format!("unknown paper: {}", id))?;
            match format {
                ExportFormat::Markdown => println!("{}", to_markdown_link(paper)),
                ExportFormat::Bibtex => println!("{}", to_bibtex(paper)),
            }
            Ok(())
        }
        Command::Anki { id, deck } => {
            let paper = state
                .get(&id)
                .ok_or_else(|| format!("unknown paper: {}", id))?;
            let anki = &state.config().anki;
            let deck = deck.unwrap_or_else(|| anki.deck_name.clone());
            let client = AnkiClient::new(anki)?;
            let note_id = client.export_paper(paper, &deck, &anki.model_name).await?;
            println!("Added note {} to {}", note_id, deck);
            Ok(())
        }
    }
}

fn list(
    state: &mut MemoryState<JsonFileStore>,
    query: &str,
    sort: Option<SortKey>,
    asc: bool,
    favorites: bool,
    pages: usize,
) -> CliResult<()> {
    if let Some(key) = sort {
        state.set_sort_key(key);
    }
    let direction = if asc {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    state.set_sort_direction(direction);
    state.set_favorites_only(favorites);

    let mut next = state.set_query(query);

    let mut printed = 0;
    let mut page = 0;
    while let Some(range) = next.take() {
        let papers = state.visible_page(range);
        for line in render_page(&PlainTextRenderer, &papers, 0..papers.len()) {
            println!("{}", line);
            printed += 1;
        }
        page += 1;
        if page < pages {
            next = state.more();
        }
    }

    eprintln!("{} of {} papers shown", printed, state.visible_len());
    Ok(())
}
