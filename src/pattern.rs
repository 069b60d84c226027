//! Turns a naming pattern into an expression that recognises names already
//! rendered from it.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::error::PatternError;
use crate::token::{segments, Segment, TokenKind, TokenTable};

/// A pattern compiled for one resolution pass.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    has_version: bool,
}

impl CompiledPattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern used the version token, so matches carry a version.
    pub fn has_version(&self) -> bool {
        self.has_version
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compile `pattern` by swapping each placeholder for its token's match fragment.
///
/// Literal text is escaped, and the result only anchors at the start so names
/// with trailing text still match. At most one version token is accepted.
pub fn compile(pattern: &str, tokens: &TokenTable) -> Result<CompiledPattern, PatternError> {
    let mut source = String::from("^");
    let mut versions = 0;

    for segment in segments(pattern) {
        match segment {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Token(index) => {
                let token = tokens.by_index(index);
                if token.kind == TokenKind::Version {
                    versions += 1;
                }
                source.push_str(token.match_fragment);
            }
        }
    }

    if versions > 1 {
        return Err(PatternError::DuplicateVersionToken { count: versions });
    }

    let regex = Regex::new(&source)?;
    debug!("compiled pattern {pattern:?} to {source:?}");
    Ok(CompiledPattern {
        regex,
        has_version: versions == 1,
    })
}

/// Number of `#` modifiers on the version token in the raw pattern text.
///
/// Returns 0 when the token is absent or bare. If the token appears more than
/// once the last occurrence is used.
pub fn detect_padding(pattern: &str) -> usize {
    static PADDING: OnceLock<Regex> = OnceLock::new();
    let regex = PADDING.get_or_init(|| Regex::new(r"\{version(#*)\}").expect("Invalid padding regex"));
    regex
        .captures_iter(pattern)
        .last()
        .and_then(|caps| caps.get(1))
        .map_or(0, |hashes| hashes.as_str().len())
}
