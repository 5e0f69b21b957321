use anstyle::{AnsiColor, Effects};
use clap::builder::Styles;
use clap::{Args as ClapArgs, ColorChoice, Parser, Subcommand};
use crate::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Walk a folder, collect every file with a given suffix and concatenate
/// their contents into one text file, each preceded by its relative path.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, color = ColorChoice::Auto, styles = STYLES)]
pub struct Cli {
    /// The subcommand to execute (e.g., 'collect' or 'init').
    #[command(subcommand)]
    pub command: Commands,
}

/// Defines the available subcommands for the application.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Concatenate matching files into a single text file.
    Collect(CollectArgs),
    /// Write a default configuration file.
    Init(InitArgs),
}

/// Defines the arguments for the 'collect' subcommand.
///
/// Options left unset fall back to the configuration file, then to the
/// built-in defaults.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CollectArgs {
    /// The root folder to scan. Defaults to the current directory.
    pub root: Option<PathBuf>,

    /// Where the concatenated content is written. Defaults to `result.txt`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Collect files whose name ends with this suffix (case-sensitive).
    /// Defaults to `.cs`.
    #[arg(short, long, value_name = "SUFFIX", allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Read settings from this TOML file instead of `collect-code.toml`.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum directory depth to descend. 1 means only the root folder itself.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow symbolic links to directories.
    #[arg(long)]
    pub follow_links: bool,

    /// Skip hidden files and directories (those starting with a '.').
    #[arg(long)]
    pub skip_hidden: bool,

    /// Honour .gitignore files found in the tree.
    #[arg(long = "gitignore")]
    pub respect_gitignore: bool,

    /// Leave out files whose content looks binary.
    #[arg(long)]
    pub skip_binary: bool,

    /// Create the output file's parent directory if it does not exist.
    #[arg(long)]
    pub create_dirs: bool,

    /// Suppress per-file lines and the progress bar. Fatal errors are still reported.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose diagnostics. Use -v for basic info, -vv for detailed debugging.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Defines the arguments for the 'init' subcommand.
#[derive(ClapArgs, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the configuration file.
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite the file if it already exists.
    #[arg(short, long)]
    pub force: bool,
}

impl Commands {
    /// Verbosity requested on the command line, 0 when the subcommand has none.
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Collect(args) => args.verbose,
            Commands::Init(_) => 0,
        }
    }
}
