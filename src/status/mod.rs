//! Working-tree status model and change classification.
//!
//! A status report is the text printed by `git status --porcelain`. It is
//! parsed once into typed entries and classified on the status codes rather
//! than on raw string prefixes.

pub mod parser;

use std::fmt;

use crate::error::Error;

pub use parser::{parse_line, parse_report};

/// State of a path in one column (index or worktree) of a porcelain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Unmodified,
    Modified,
    TypeChanged,
    Added,
    Deleted,
    Renamed,
    Copied,
}

impl FileState {
    fn as_char(self) -> char {
        match self {
            FileState::Unmodified => ' ',
            FileState::Modified => 'M',
            FileState::TypeChanged => 'T',
            FileState::Added => 'A',
            FileState::Deleted => 'D',
            FileState::Renamed => 'R',
            FileState::Copied => 'C',
        }
    }
}

/// Two-column porcelain status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// `??`
    Untracked,
    /// `!!`
    Ignored,
    /// Merge conflict. Holds the raw pair, e.g. `['U', 'U']`.
    Unmerged([char; 2]),
    Changed { index: FileState, worktree: FileState },
}

impl StatusCode {
    /// True for untracked paths and conflicts unmerged in the index (`UU`, `UD`, `UA`).
    pub fn is_new_or_unmerged(&self) -> bool {
        matches!(self, StatusCode::Untracked | StatusCode::Unmerged(['U', _]))
    }

    /// True when either column reports a content modification and neither
    /// column reports a deletion.
    pub fn is_modified(&self) -> bool {
        match self {
            StatusCode::Changed { index, worktree } => {
                let states = [*index, *worktree];
                states.contains(&FileState::Modified) && !states.contains(&FileState::Deleted)
            }
            _ => false,
        }
    }

    /// Renames and copies are printed as `from -> to`.
    pub fn has_source_path(&self) -> bool {
        matches!(
            self,
            StatusCode::Changed { index, worktree }
                if matches!(index, FileState::Renamed | FileState::Copied)
                    || matches!(worktree, FileState::Renamed | FileState::Copied)
        )
    }

    /// The two-character porcelain form.
    pub fn as_pair(&self) -> [char; 2] {
        match self {
            StatusCode::Untracked => ['?', '?'],
            StatusCode::Ignored => ['!', '!'],
            StatusCode::Unmerged(pair) => *pair,
            StatusCode::Changed { index, worktree } => [index.as_char(), worktree.as_char()],
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y] = self.as_pair();
        write!(f, "{}{}", x, y)
    }
}

/// One line of a status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: StatusCode,
    /// Path relative to the repository root (destination for renames).
    pub path: String,
    /// Source path of a rename or copy.
    pub orig_path: Option<String>,
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.code)?;
        if let Some(ref orig) = self.orig_path {
            write!(f, "{} -> ", quote_path(orig))?;
        }
        write!(f, "{}", quote_path(&self.path))
    }
}

/// Quote a path the way porcelain output does when it contains special characters.
fn quote_path(path: &str) -> String {
    let needs_quotes = path.contains(" -> ")
        || path
            .chars()
            .any(|c| c == '"' || c == '\\' || c.is_control());
    if !needs_quotes {
        return path.to_string();
    }

    let mut out = String::with_capacity(path.len() + 2);
    out.push('"');
    for c in path.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A parsed status report.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    entries: Vec<StatusEntry>,
}

impl StatusReport {
    /// Parse porcelain output.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(Self {
            entries: parse_report(text)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `tracked_file` shows up as modified in the index or worktree.
    ///
    /// Added or renamed copies of the file do not count; only content
    /// modifications of an already-tracked file gate publishing.
    pub fn is_modified(&self, tracked_file: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.path == tracked_file && entry.code.is_modified())
    }

    /// Untracked entries and index-side conflicts, in report order.
    pub fn new_files(&self) -> Vec<&StatusEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.code.is_new_or_unmerged())
            .collect()
    }
}
