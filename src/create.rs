use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::CreateError;

/// Where a confirmed name gets created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A sequence container on the host workspace.
    Reel,
    /// A plain directory inside the scanned path.
    Directory,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Reel => "reel",
            Destination::Directory => "directory",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performs the creation once the user has confirmed a name.
pub trait CreationSink {
    /// Whether this sink can create `destination` at all.
    fn supports(&self, destination: Destination) -> bool;

    fn create(&self, name: &str, destination: Destination) -> Result<PathBuf, CreateError>;
}

/// Creates directories under a parent path.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    parent: PathBuf,
}

impl DirectorySink {
    pub fn new(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: parent.into(),
        }
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

impl CreationSink for DirectorySink {
    fn supports(&self, destination: Destination) -> bool {
        destination == Destination::Directory
    }

    fn create(&self, name: &str, destination: Destination) -> Result<PathBuf, CreateError> {
        if !self.supports(destination) {
            return Err(CreateError::UnsupportedDestination(destination.as_str()));
        }
        if !is_valid_name(name) {
            return Err(CreateError::InvalidName {
                name: name.to_string(),
            });
        }

        let path = self.parent.join(name);
        // create_dir fails on an existing entry, which also covers names that
        // appeared after the scan
        match fs::create_dir(&path) {
            Ok(()) => {
                info!("created {}", path.display());
                Ok(path)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(CreateError::Conflict { path }),
            Err(source) => Err(CreateError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let path = sink.create("shot_010", Destination::Directory).unwrap();
        assert!(path.is_dir());
        assert_eq!(path, dir.path().join("shot_010"));
    }

    #[test]
    fn existing_name_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("shot_010")).unwrap();
        let sink = DirectorySink::new(dir.path());
        let err = sink.create("shot_010", Destination::Directory).unwrap_err();
        assert!(matches!(err, CreateError::Conflict { .. }));
    }

    #[test]
    fn rejects_names_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        for name in ["", "  ", "..", "a/b", r"a\b"] {
            let err = sink.create(name, Destination::Directory).unwrap_err();
            assert!(matches!(err, CreateError::InvalidName { .. }), "{name:?}");
        }
    }

    #[test]
    fn reel_needs_host_adapter() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        assert!(sink.supports(Destination::Directory));
        assert!(!sink.supports(Destination::Reel));
        let err = sink.create("r1", Destination::Reel).unwrap_err();
        assert!(matches!(err, CreateError::UnsupportedDestination("reel")));
    }
}
