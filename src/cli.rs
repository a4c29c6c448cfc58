use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Merge and tidy directories of CSV exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge a directory of CSV files into a single deduplicated output
    Merge(MergeArgs),
    /// Remove placeholder "Unnamed" columns from CSV files in place
    Strip(StripArgs),
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Directory containing the CSV files to merge
    pub input_dir: PathBuf,
    /// Destination CSV file (parent directories are created)
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct StripArgs {
    /// Directory whose CSV files are rewritten in place
    pub directory: PathBuf,
}
