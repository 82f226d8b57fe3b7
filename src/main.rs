use anyhow::Result;

use gpg_notes_index::cli;

fn main() -> Result<()> {
    cli::run()
}
