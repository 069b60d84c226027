//! Name resolution and the per-pass pipeline that feeds it.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::ResolveError;
use crate::pattern::{compile, detect_padding};
use crate::scanner::{scan, DirectoryLister, FolderMatch};
use crate::token::{segments, Clock, Segment, TokenTable};
use crate::version::resolve_next;

/// Substitute every known placeholder in `pattern` with its token's current value.
/// Unknown placeholders are copied through unchanged.
pub fn resolve(pattern: &str, tokens: &TokenTable) -> String {
    let mut name = String::with_capacity(pattern.len());
    for segment in segments(pattern) {
        match segment {
            Segment::Literal(text) => name.push_str(text),
            Segment::Token(index) => name.push_str(&tokens.by_index(index).current_value),
        }
    }
    name
}

/// Where a session is within its current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    PatternChanged,
    Compiled,
    Scanned,
    VersionUpdated,
    NameResolved,
}

/// Outcome of one complete pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub pattern: String,
    pub regex: String,
    pub matches: Vec<FolderMatch>,
    pub has_version: bool,
    pub padding: usize,
    pub version: String,
    pub tokens: TokenTable,
    pub name: String,
}

/// Resolves names for one directory, re-running the whole pipeline each time
/// the pattern changes.
pub struct Session<L, C> {
    path: PathBuf,
    lister: L,
    clock: C,
    state: PassState,
    current: Option<Resolution>,
}

impl<L: DirectoryLister, C: Clock> Session<L, C> {
    pub fn new(path: impl Into<PathBuf>, lister: L, clock: C) -> Self {
        Self {
            path: path.into(),
            lister,
            clock,
            state: PassState::Idle,
            current: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// The last successful resolution, kept across failed passes.
    pub fn current(&self) -> Option<&Resolution> {
        self.current.as_ref()
    }

    /// Run a full pass for `pattern`. On failure the previous resolution and
    /// state are left in place.
    pub fn update(&mut self, pattern: &str) -> Result<&Resolution, ResolveError> {
        let previous = self.state;
        match self.run_pass(pattern) {
            Ok(resolution) => {
                self.state = PassState::NameResolved;
                Ok(&*self.current.insert(resolution))
            }
            Err(e) => {
                debug!("pass for {pattern:?} aborted in {:?}: {e}", self.state);
                self.state = previous;
                Err(e)
            }
        }
    }

    fn run_pass(&mut self, pattern: &str) -> Result<Resolution, ResolveError> {
        self.state = PassState::PatternChanged;
        let mut tokens = TokenTable::build(self.clock.now());

        let compiled = compile(pattern, &tokens)?;
        self.state = PassState::Compiled;

        let entries = self
            .lister
            .list_dirs(&self.path)
            .map_err(|source| ResolveError::DirectoryUnavailable {
                path: self.path.clone(),
                source,
            })?;
        let matches = scan(&entries, &compiled);
        self.state = PassState::Scanned;

        let padding = detect_padding(pattern);
        let version = resolve_next(&matches, padding);
        tokens.set_version(version.clone());
        self.state = PassState::VersionUpdated;

        let name = resolve(pattern, &tokens);
        debug!("resolved {pattern:?} to {name:?}");

        Ok(Resolution {
            pattern: pattern.to_string(),
            regex: compiled.as_str().to_string(),
            matches,
            has_version: compiled.has_version(),
            padding,
            version,
            tokens,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::FixedClock;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::RefCell;
    use std::io;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 20)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap()
    }

    struct StubLister(RefCell<io::Result<Vec<String>>>);

    impl StubLister {
        fn with(names: &[&str]) -> Self {
            Self(RefCell::new(Ok(names.iter().map(|n| n.to_string()).collect())))
        }

        fn set(&self, result: io::Result<Vec<String>>) {
            *self.0.borrow_mut() = result;
        }
    }

    impl DirectoryLister for &StubLister {
        fn list_dirs(&self, _path: &Path) -> io::Result<Vec<String>> {
            match &*self.0.borrow() {
                Ok(names) => Ok(names.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn resolve_substitutes_values() {
        let mut tokens = TokenTable::build(now());
        tokens.set_version("04");
        assert_eq!(
            resolve("{YYYY}-{MM}-{DD}_{HH}{mm}{pp}_v{version##}", &tokens),
            "2023-11-20_2105pm_v04"
        );
    }

    #[test]
    fn resolve_leaves_unknown_placeholders() {
        let mut tokens = TokenTable::build(now());
        tokens.set_version("7");
        assert_eq!(resolve("{unknown}_v{version}", &tokens), "{unknown}_v7");
    }

    #[test]
    fn end_to_end_continues_sequence() {
        let lister = StubLister::with(&["proj_2023_01", "proj_2023_02", "proj_2023_09", "unrelated_folder"]);
        let mut session = Session::new("/shots", &lister, FixedClock(now()));
        let resolution = session.update("proj_{YYYY}_{version##}").unwrap();

        assert_eq!(resolution.matches.len(), 3);
        assert_eq!(resolution.version, "10");
        assert_eq!(resolution.name, "proj_2023_10");
        assert_eq!(session.state(), PassState::NameResolved);
    }

    #[test]
    fn empty_directory_starts_at_one() {
        let lister = StubLister::with(&[]);
        let mut session = Session::new("/empty", &lister, FixedClock(now()));
        assert_eq!(session.update("{version}").unwrap().name, "1");
    }

    #[test]
    fn pattern_without_version_ignores_entries() {
        let lister = StubLister::with(&["2023_5", "2023_6"]);
        let mut session = Session::new("/d", &lister, FixedClock(now()));
        let resolution = session.update("{YYYY}_x").unwrap();
        assert!(!resolution.has_version);
        assert_eq!(resolution.version, "1");
    }

    #[test]
    fn changing_pattern_rescans_and_redetects_padding() {
        let lister = StubLister::with(&["1", "2"]);
        let mut session = Session::new("/d", &lister, FixedClock(now()));
        assert_eq!(session.update("{version}").unwrap().name, "3");

        lister.set(Ok(vec!["1".into(), "2".into(), "2023_004".into()]));
        let resolution = session.update("{YYYY}_{version###}").unwrap();
        assert_eq!(resolution.padding, 3);
        assert_eq!(resolution.name, "2023_005");

        // "2023_004" starts with a bare number too
        let resolution = session.update("{version}").unwrap();
        assert_eq!(resolution.padding, 0);
        assert_eq!(resolution.name, "2024");
    }

    #[test]
    fn failed_pass_keeps_previous_name() {
        let lister = StubLister::with(&["v1"]);
        let mut session = Session::new("/d", &lister, FixedClock(now()));
        session.update("v{version}").unwrap();

        let err = session.update("v{version}{version}").unwrap_err();
        assert!(matches!(err, ResolveError::Pattern(_)));
        assert_eq!(session.current().unwrap().name, "v2");
        assert_eq!(session.state(), PassState::NameResolved);

        lister.set(Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let err = session.update("w{version}").unwrap_err();
        assert!(matches!(err, ResolveError::DirectoryUnavailable { .. }));
        assert_eq!(session.current().unwrap().name, "v2");
    }

    #[test]
    fn failure_before_any_pass_returns_to_idle() {
        let lister = StubLister::with(&[]);
        let mut session = Session::new("/d", &lister, FixedClock(now()));
        assert!(session.update("{version}{version}").is_err());
        assert_eq!(session.state(), PassState::Idle);
        assert!(session.current().is_none());
    }
}
