use std::io;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::pattern::CompiledPattern;
use crate::token::VERSION_GROUP;

/// An existing name that conforms to the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch {
    pub name: String,
    pub version: Option<u64>,
}

/// Lists the immediate child directories of a path.
pub trait DirectoryLister {
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Reads directory names from the filesystem, one level deep.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        // walkdir only reports a bad root once iteration starts
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", path.display()),
            ));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            // links to directories count as folders too
            let is_dir = entry.file_type().is_dir()
                || (entry.path_is_symlink() && entry.path().is_dir());
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        debug!("listed {} directories in {}", names.len(), path.display());
        Ok(names)
    }
}

/// Match every entry against the compiled pattern.
///
/// Matching is anchored at the start of each entry; trailing characters are
/// allowed. Entries that do not match are dropped.
pub fn scan<I, S>(entries: I, pattern: &CompiledPattern) -> Vec<FolderMatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut matches = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        let Some(caps) = pattern.regex().captures(entry) else {
            continue;
        };
        let Some(whole) = caps.get(0) else { continue };

        let version = if pattern.has_version() {
            caps.name(VERSION_GROUP).and_then(|v| match v.as_str().parse::<u64>() {
                Ok(n) => Some(n),
                Err(e) => {
                    warn!("ignoring version in {entry:?}: {e}");
                    None
                }
            })
        } else {
            None
        };

        matches.push(FolderMatch {
            name: whole.as_str().to_string(),
            version,
        });
    }

    debug!("{} entries match {}", matches.len(), pattern.as_str());
    matches
}
