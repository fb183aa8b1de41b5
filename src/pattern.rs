//! Named regular-expression patterns with positional and named captures.
//!
//! Every regex that comes from a configuration document (branch-type rules,
//! version-file rules) goes through [`Pattern`], so callers never touch
//! `regex` directly and the field that owns a pattern is always known when
//! compilation fails.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

/// Upper bound on the compiled size of a user-supplied pattern.
const PATTERN_SIZE_LIMIT: usize = 256 * 1024;

/// A configured pattern failed to compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid pattern for `{field}` ({pattern:?}): {message}")]
pub struct PatternCompileError {
    /// Field path of the document entry that owns the pattern.
    pub field: String,
    /// The pattern source as written in the document.
    pub pattern: String,
    /// Compiler diagnostic.
    pub message: String,
}

/// A compiled, reusable matcher.
#[derive(Clone)]
pub struct Pattern {
    field: String,
    regex: Regex,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("field", &self.field)
            .field("source", &self.regex.as_str())
            .finish()
    }
}

impl Pattern {
    /// Compiles `source`, attributing any failure to `field`.
    pub fn compile(field: impl Into<String>, source: &str) -> Result<Self, PatternCompileError> {
        let field = field.into();
        let regex = RegexBuilder::new(source)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| PatternCompileError {
                field: field.clone(),
                pattern: source.to_string(),
                message: compact_regex_error(&e),
            })?;

        Ok(Self { field, regex })
    }

    /// Field path this pattern was compiled for.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of capture groups, not counting the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Whether the pattern declares a group with the given name.
    pub fn has_group(&self, name: &str) -> bool {
        self.regex.capture_names().flatten().any(|n| n == name)
    }

    /// Whether the pattern matches anywhere in `input`.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Applies the pattern to `input`, returning the first match's groups.
    pub fn captures(&self, input: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(input)?;
        let whole = caps.get(0)?;

        let groups = self
            .regex
            .capture_names()
            .enumerate()
            .skip(1)
            .map(|(index, name)| {
                caps.get(index).map(|m| Capture {
                    index,
                    name: name.map(str::to_string),
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();

        Some(PatternMatch {
            matched: whole.as_str().to_string(),
            start: whole.start(),
            end: whole.end(),
            groups,
        })
    }
}

/// A single captured group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    /// 1-based group position.
    pub index: usize,
    /// Group name, for `(?P<name>...)` groups.
    pub name: Option<String>,
    /// Captured text.
    pub text: String,
    /// Byte offset where the capture starts.
    pub start: usize,
    /// Byte offset one past the end of the capture.
    pub end: usize,
}

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    /// Text of the whole match.
    pub matched: String,
    /// Byte offset of the whole match.
    pub start: usize,
    /// Byte offset one past the whole match.
    pub end: usize,
    /// Groups in declaration order; `None` for groups that did not participate.
    pub groups: Vec<Option<Capture>>,
}

impl PatternMatch {
    /// Returns group `index` (1-based), if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&Capture> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(Option::as_ref)
    }

    /// Returns the named group, if it exists and participated in the match.
    pub fn named(&self, name: &str) -> Option<&Capture> {
        self.groups
            .iter()
            .flatten()
            .find(|c| c.name.as_deref() == Some(name))
    }

    /// Text of group `index` (1-based).
    pub fn text(&self, index: usize) -> Option<&str> {
        self.group(index).map(|c| c.text.as_str())
    }
}

/// Keeps only the last line of the regex diagnostic, which carries the reason.
fn compact_regex_error(err: &regex::Error) -> String {
    match err {
        regex::Error::Syntax(text) => text
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or(text.as_str())
            .trim()
            .trim_start_matches("error: ")
            .to_string(),
        regex::Error::CompiledTooBig(limit) => {
            format!("compiled pattern exceeds the size limit of {limit} bytes")
        }
        other => other.to_string(),
    }
}
