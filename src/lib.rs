//! Continue Folder - resolve the next folder name in a token-named sequence

pub mod error;
pub mod token;
pub mod pattern;
pub mod scanner;
pub mod version;
pub mod resolver;
pub mod presets;
pub mod create;
pub mod cli;

// Re-exports for easy access
pub use error::{CreateError, PatternError, PresetError, ResolveError};
pub use token::{Clock, FixedClock, SystemClock, Token, TokenKind, TokenTable};
pub use pattern::{compile, detect_padding, CompiledPattern};
pub use scanner::{scan, DirectoryLister, FolderMatch, FsDirectoryLister};
pub use version::resolve_next;
pub use resolver::{resolve, PassState, Resolution, Session};
pub use presets::{JsonPresetStore, Preset, PresetStore};
pub use create::{CreationSink, Destination, DirectorySink};
pub use cli::{Cli, Commands};

pub mod colors {
    use colored::Color;

    pub const SUCCESS: Color = Color::TrueColor { r: 77, g: 255, b: 157 };
    pub const HEADER: Color = Color::TrueColor { r: 157, g: 77, b: 255 };
    pub const PATH: Color = Color::TrueColor { r: 77, g: 195, b: 255 };
    pub const WARNING: Color = Color::TrueColor { r: 255, g: 217, b: 61 };
    pub const MATCH: Color = Color::TrueColor { r: 255, g: 154, b: 61 };
}

/// Current version of Continue Folder
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pattern used when no preset exists
pub const DEFAULT_PATTERN: &str = "{version}";
