//! Token registry used by both the pattern compiler and the name resolver.
//!
//! Every token has a primary placeholder such as `{YYYY}`. The version token
//! additionally accepts an extended form, `{version###}`, where the number of
//! `#` characters is the minimum zero-padded width of the rendered value.

use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;

/// Name of the group the version fragment captures into.
pub const VERSION_GROUP: &str = "version";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Rendered from the clock.
    Clock,
    /// Continues an existing number sequence.
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: &'static str,
    pub kind: TokenKind,
    pub placeholder: &'static str,
    /// Regex syntax recognising the modifier form of the placeholder.
    pub extended_placeholder: Option<&'static str>,
    /// Matches the rendered form of the token inside an existing name.
    pub match_fragment: &'static str,
    pub current_value: String,
}

struct TokenDef {
    name: &'static str,
    kind: TokenKind,
    placeholder: &'static str,
    extended_placeholder: Option<&'static str>,
    match_fragment: &'static str,
    render: fn(&NaiveDateTime) -> String,
}

impl TokenDef {
    const fn clock(
        name: &'static str,
        placeholder: &'static str,
        match_fragment: &'static str,
        render: fn(&NaiveDateTime) -> String,
    ) -> Self {
        Self {
            name,
            kind: TokenKind::Clock,
            placeholder,
            extended_placeholder: None,
            match_fragment,
            render,
        }
    }
}

const TOKEN_DEFS: &[TokenDef] = &[
    TokenDef::clock("am/pm", "{pp}", "[a-z]{2}", |now| now.format("%p").to_string().to_lowercase()),
    TokenDef::clock("AM/PM", "{PP}", "[A-Z]{2}", |now| now.format("%p").to_string().to_uppercase()),
    TokenDef::clock("Day", "{DD}", "[0-9]{2}", |now| now.format("%d").to_string()),
    TokenDef::clock("Hour (12hr)", "{hh}", "[0-9]{2}", |now| now.format("%I").to_string()),
    TokenDef::clock("Hour (24hr)", "{HH}", "[0-9]{2}", |now| now.format("%H").to_string()),
    TokenDef::clock("Minute", "{mm}", "[0-9]{2}", |now| now.format("%M").to_string()),
    TokenDef::clock("Month", "{MM}", "[0-9]{2}", |now| now.format("%m").to_string()),
    // Leading zeros sit outside the named group so the capture parses as the bare number.
    TokenDef {
        name: "Version",
        kind: TokenKind::Version,
        placeholder: "{version}",
        extended_placeholder: Some(r"\{version#*\}"),
        match_fragment: "0*(?P<version>[1-9][0-9]*)",
        render: |_| "1".to_string(),
    },
    TokenDef::clock("Year (##)", "{YY}", "[0-9]{2}", |now| now.format("%y").to_string()),
    TokenDef::clock("Year (####)", "{YYYY}", "[0-9]{4}", |now| now.format("%Y").to_string()),
];

/// A piece of a pattern: literal text or a recognised placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'p> {
    Literal(&'p str),
    /// Index into the token table.
    Token(usize),
}

/// One alternation with a group per token. A token's extended placeholder
/// replaces its primary one, since the extended syntax also covers the bare form.
fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDERS: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDERS.get_or_init(|| {
        let alternatives: Vec<String> = TOKEN_DEFS
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let syntax = match def.extended_placeholder {
                    Some(extended) => extended.to_string(),
                    None => regex::escape(def.placeholder),
                };
                format!("(?P<t{i}>{syntax})")
            })
            .collect();
        Regex::new(&alternatives.join("|")).expect("Invalid placeholder regex")
    })
}

/// Splits a pattern into literal text and known placeholders.
pub(crate) fn segments(pattern: &str) -> Vec<Segment<'_>> {
    let regex = placeholder_regex();
    let mut out = Vec::new();
    let mut last = 0;

    for caps in regex.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(index) = (0..TOKEN_DEFS.len()).find(|i| caps.name(&format!("t{i}")).is_some())
        else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Literal(&pattern[last..whole.start()]));
        }
        out.push(Segment::Token(index));
        last = whole.end();
    }
    if last < pattern.len() {
        out.push(Segment::Literal(&pattern[last..]));
    }
    out
}

/// Source of the timestamp that seeds clock tokens.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// The live token values for one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable {
    tokens: Vec<Token>,
}

impl TokenTable {
    /// Build every token from `now`. The version token starts at `"1"`.
    pub fn build(now: NaiveDateTime) -> Self {
        let tokens = TOKEN_DEFS
            .iter()
            .map(|def| Token {
                name: def.name,
                kind: def.kind,
                placeholder: def.placeholder,
                extended_placeholder: def.extended_placeholder,
                match_fragment: def.match_fragment,
                current_value: (def.render)(&now),
            })
            .collect();
        Self { tokens }
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.name == name)
    }

    pub(crate) fn by_index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn version(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.kind == TokenKind::Version)
    }

    pub fn set_version(&mut self, value: impl Into<String>) {
        if let Some(token) = self.tokens.iter_mut().find(|t| t.kind == TokenKind::Version) {
            token.current_value = value.into();
        }
    }

    /// Tokens ordered by name, ignoring case, for menus and listings.
    pub fn sorted_by_name(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.iter().collect();
        tokens.sort_by_key(|t| t.name.to_uppercase());
        tokens
    }
}
