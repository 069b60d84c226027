use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;

use crate::create::Destination;

#[derive(Parser, Debug)]
#[command(
    name = "continue-folder",
    about = "Create the next folder in a token-named sequence",
    version,
    long_about = "Continue Folder resolves a naming pattern made of literal text and\n\
                  tokens against the folders that already exist, then proposes the\n\
                  next name in the sequence.\n\n\
                  Tokens:\n\
                  • {YYYY} {YY} {MM} {DD} {HH} {hh} {mm} {PP} {pp}: current date and time\n\
                  • {version}: next number after the highest existing one\n\
                  • {version###}: same, zero-padded to the number of #"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable safe mode (preview only, no changes)
    #[arg(long, global = true)]
    pub safe: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Preset file (default: ~/.continue_folder.json)
    #[arg(long, global = true, env = "CONTINUE_FOLDER_PRESETS")]
    pub presets: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the next folder name without creating anything
    Preview(ResolveArgs),

    /// Create the next folder after confirmation
    Create(CreateArgs),

    /// List available tokens and their current values
    Tokens,

    /// Manage saved patterns
    #[command(subcommand)]
    Preset(PresetArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Folder whose subfolders continue the sequence
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Naming pattern
    #[arg(short, long, conflicts_with = "preset")]
    pub pattern: Option<String>,

    /// Use a saved preset's pattern
    #[arg(short = 'P', long)]
    pub preset: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// What to create
    #[arg(long, value_enum, default_value_t = DestinationCli::Directory)]
    pub dest: DestinationCli,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum PresetArgs {
    /// List saved presets
    List,

    /// Show one preset
    Show {
        name: String,
    },

    /// Save a pattern under a name
    Save {
        name: String,
        pattern: String,

        /// Overwrite an existing preset without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete a preset
    Delete {
        name: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DestinationCli {
    /// Plain directory inside PATH
    Directory,
    /// Reel on the host workspace (needs a host adapter)
    Reel,
}

impl From<DestinationCli> for Destination {
    fn from(value: DestinationCli) -> Self {
        match value {
            DestinationCli::Directory => Destination::Directory,
            DestinationCli::Reel => Destination::Reel,
        }
    }
}

impl Cli {
    /// Print version information
    pub fn print_version() {
        println!("{} v{}", "Continue Folder".bold(), crate::VERSION);
        println!("Create the next folder in a token-named sequence");
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
    }
}

impl Commands {
    /// Get the command name
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Preview(_) => "preview",
            Commands::Create(_) => "create",
            Commands::Tokens => "tokens",
            Commands::Preset(_) => "preset",
            Commands::Version => "version",
        }
    }
}
