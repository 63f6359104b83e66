pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Serve and edit a directory of text and markdown documents")]
pub struct Args {
    /// Path to the site directory (defaults to ~/.folio)
    #[arg(long, global = true, env = "FOLIO_SITE_DIR")]
    pub site_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
