use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for readaloud.
#[derive(Parser, Debug)]
#[command(name = "readaloud")]
#[command(about = "Play narrated audio clips alongside their transcripts")]
#[command(version)]
pub struct Args {
    /// Folder containing the audio clips (defaults to the current directory)
    #[arg(short, long, env = "READALOUD_FOLDER", value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Scan subdirectories as well
    #[arg(short, long)]
    pub recursive: bool,

    /// Print the discovered tracks and exit without opening audio
    #[arg(long, requires = "folder")]
    pub headless: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Append log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
