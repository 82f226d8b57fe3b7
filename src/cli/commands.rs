use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::crypto::GpgCrypto;
use crate::indexer::NoteIndexer;

#[derive(Parser)]
#[command(name = "gpg-notes-index")]
#[command(version = "0.1.0")]
#[command(about = "Maintain a searchable line index over GPG-encrypted notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct IndexArgs {
    /// Root directory containing the encrypted notes
    pub notes_dir: PathBuf,

    /// Location of the encrypted index file
    #[arg(long)]
    pub cache_file: PathBuf,

    /// Recipient identities the index is encrypted to (comma-delimited)
    #[arg(long, value_delimiter = ',', required = true)]
    pub recipients: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rescan every encrypted note under the notes directory
    Scan {
        #[command(flatten)]
        args: IndexArgs,
    },
    /// Update the index for a single note file
    Update {
        #[command(flatten)]
        args: IndexArgs,

        /// The note file to update
        file: PathBuf,
    },
    /// Update the index for an explicit list of note files
    UpdateFiles {
        #[command(flatten)]
        args: IndexArgs,

        /// The note files to update
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let start = Instant::now();

    let changed = match cli.command {
        Commands::Scan { args } => {
            let IndexArgs { notes_dir, cache_file, recipients } = args;
            NoteIndexer::new(notes_dir, cache_file, GpgCrypto).update_all(&recipients)?
        }
        Commands::Update { args, file } => {
            let IndexArgs { notes_dir, cache_file, recipients } = args;
            NoteIndexer::new(notes_dir, cache_file, GpgCrypto).update_file(&file, &recipients)?
        }
        Commands::UpdateFiles { args, files } => {
            let IndexArgs { notes_dir, cache_file, recipients } = args;
            NoteIndexer::new(notes_dir, cache_file, GpgCrypto).update_files(&files, &recipients)?
        }
    };

    report(&changed, start.elapsed());
    Ok(())
}

fn report(changed: &[String], elapsed: Duration) {
    if changed.is_empty() {
        println!("No changes ({:.3}s)", elapsed.as_secs_f64());
        return;
    }
    for path in changed {
        println!("Updated: {}", path);
    }
    println!("Index updated ({} files changed) in {:.3}s", changed.len(), elapsed.as_secs_f64());
}
