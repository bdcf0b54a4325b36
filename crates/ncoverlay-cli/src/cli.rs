use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nco-title")]
#[command(author, version, about = "Extract work title, season, and episodes from video titles")]
pub struct Cli {
    /// Titles to parse. Reads one title per line from stdin when omitted.
    pub titles: Vec<String>,

    /// Print the syntax tree instead of the evaluated metadata
    #[arg(long)]
    pub ast: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Video duration (`PT24M10S` or seconds); adds search queries to the output
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Skip NFKC normalization of input titles
    #[arg(long)]
    pub no_normalize: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
