use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, BoardView, FactBoard, SupabaseStore, EMPTY_BOARD_MESSAGE};
use shared::{
    domain::{validate_palette, Category, CategoryFilter, Fact, FactId, VoteKind},
    protocol::FactDraft,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "factastic", about = "Browse and share short sourced facts")]
struct Cli {
    /// Settings file; defaults to ./factastic.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the most liked facts.
    List {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Share a new fact.
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        category: String,
    },
    /// Add one like, upvote or downvote to a fact.
    Vote {
        id: i64,
        counter: VoteKind,
        /// List the fact is looked up in.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Show the available categories.
    Categories,
}

fn format_fact(fact: &Fact) -> String {
    let disputed = if fact.is_disputed() { "[DISPUTED] " } else { "" };
    format!(
        "#{id} {disputed}{text} (Source: {source}) [{category}] likes={likes} upvotes={upvotes} downvotes={downvotes}",
        id = fact.id,
        text = fact.text,
        source = fact.source,
        category = fact.category,
        likes = fact.likes,
        upvotes = fact.upvotes,
        downvotes = fact.downvotes,
    )
}

fn print_board(board: &FactBoard) {
    match board.view() {
        BoardView::Loading => println!("Loading..."),
        BoardView::Empty => println!("{EMPTY_BOARD_MESSAGE}"),
        BoardView::Facts(facts) => {
            for fact in facts {
                println!("{}", format_fact(fact));
            }
            println!("{}", board.summary());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    validate_palette().context("category palette is inconsistent")?;

    let cli = Cli::parse();

    if let Command::Categories = cli.command {
        for category in Category::ALL {
            println!("{:<14} {}", category.name(), category.color());
        }
        return Ok(());
    }

    let settings = load_settings(cli.config.as_deref())?;
    let store = SupabaseStore::new(settings);
    let mut board = FactBoard::new();

    match cli.command {
        Command::List { category } => {
            board.select_category(&store, category).await?;
            print_board(&board);
        }
        Command::Add {
            text,
            source,
            category,
        } => {
            board.toggle_form();
            *board.draft_mut() = FactDraft::new(text, source, category);
            let created = board.submit(&store).await?;
            println!("created {}", format_fact(&created));
        }
        Command::Vote {
            id,
            counter,
            category,
        } => {
            board.select_category(&store, category).await?;
            let updated = board
                .vote(&store, FactId(id), counter)
                .await?
                .with_context(|| format!("fact {id} left the list before the vote landed"))?;
            println!("updated {}", format_fact(&updated));
        }
        Command::Categories => {}
    }

    Ok(())
}
