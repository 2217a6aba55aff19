//! `git status --porcelain` (v1) line parser.

use crate::error::Error;

use super::{FileState, StatusCode, StatusEntry};

/// Separator between source and destination of a rename or copy.
const RENAME_ARROW: &str = " -> ";

/// Parse a full status report into entries, skipping blank lines.
pub fn parse_report(text: &str) -> Result<Vec<StatusEntry>, Error> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Parse a single porcelain line.
///
/// Accepts the canonical `XY PATH` form and a lenient `X PATH` form, which is
/// read as a change in the index column only.
pub fn parse_line(line: &str) -> Result<StatusEntry, Error> {
    let line = line.trim_end_matches(['\r', '\n']);
    let malformed = || Error::MalformedStatus(line.to_string());

    let bytes = line.as_bytes();
    let (x, y, rest) = match bytes {
        [x, y, b' ', ..] if is_code(*x) && is_code(*y) => (*x, *y, &line[3..]),
        [x, b' ', ..] if *x != b' ' && is_code(*x) => (*x, b' ', &line[2..]),
        _ => return Err(malformed()),
    };

    let code = status_code(x, y).ok_or_else(malformed)?;
    if rest.is_empty() {
        return Err(malformed());
    }

    let (path, orig_path) = if code.has_source_path() {
        match split_rename(rest) {
            Some((from, to)) => (unquote(to), Some(unquote(from))),
            None => (unquote(rest), None),
        }
    } else {
        (unquote(rest), None)
    };

    if path.is_empty() {
        return Err(malformed());
    }

    Ok(StatusEntry {
        code,
        path,
        orig_path,
    })
}

fn is_code(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'M' | b'T' | b'A' | b'D' | b'R' | b'C' | b'U' | b'?' | b'!'
    )
}

fn file_state(b: u8) -> Option<FileState> {
    Some(match b {
        b' ' => FileState::Unmodified,
        b'M' => FileState::Modified,
        b'T' => FileState::TypeChanged,
        b'A' => FileState::Added,
        b'D' => FileState::Deleted,
        b'R' => FileState::Renamed,
        b'C' => FileState::Copied,
        _ => return None,
    })
}

fn status_code(x: u8, y: u8) -> Option<StatusCode> {
    match (x, y) {
        (b'?', b'?') => Some(StatusCode::Untracked),
        (b'!', b'!') => Some(StatusCode::Ignored),
        (b'D', b'D') | (b'A', b'A') | (b'U', _) | (_, b'U') => {
            let conflict = [x, y];
            // Unmerged pairs from git-status(1); any other pair with a U is invalid.
            matches!(
                &conflict,
                b"DD" | b"AA" | b"AU" | b"UD" | b"UA" | b"DU" | b"UU"
            )
            .then_some(StatusCode::Unmerged([x as char, y as char]))
        }
        _ => {
            let index = file_state(x)?;
            let worktree = file_state(y)?;
            if index == FileState::Unmodified && worktree == FileState::Unmodified {
                return None;
            }
            Some(StatusCode::Changed { index, worktree })
        }
    }
}

/// Split `from -> to`, respecting quoted paths that may contain the arrow.
fn split_rename(rest: &str) -> Option<(&str, &str)> {
    if rest.starts_with('"') {
        let end = closing_quote(rest)?;
        let (from, tail) = rest.split_at(end + 1);
        return tail.strip_prefix(RENAME_ARROW).map(|to| (from, to));
    }
    rest.split_once(RENAME_ARROW)
}

/// Index of the closing quote of a quoted path starting at byte 0.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Undo git's C-style path quoting. Unquoted paths are returned as-is.
fn unquote(path: &str) -> String {
    let inner = match path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return path.to_string(),
    };

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut bytes = inner.bytes().peekable();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'r') => out.push(b'\r'),
            Some(b'a') => out.push(0x07),
            Some(b'b') => out.push(0x08),
            Some(b'f') => out.push(0x0c),
            Some(b'v') => out.push(0x0b),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match bytes.peek() {
                        Some(&n @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(n - b'0');
                            bytes.next();
                        }
                        _ => break,
                    }
                }
                out.push(value as u8);
            }
            Some(other) => out.push(other),
            None => out.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modified_index() {
        let entry = parse_line("M  package.json").unwrap();
        assert_eq!(
            entry.code,
            StatusCode::Changed {
                index: FileState::Modified,
                worktree: FileState::Unmodified,
            }
        );
        assert_eq!(entry.path, "package.json");
        assert!(entry.orig_path.is_none());
    }

    #[test]
    fn test_parse_modified_worktree() {
        let entry = parse_line(" M package.json").unwrap();
        assert_eq!(
            entry.code,
            StatusCode::Changed {
                index: FileState::Unmodified,
                worktree: FileState::Modified,
            }
        );
        assert_eq!(entry.path, "package.json");
    }

    #[test]
    fn test_parse_single_letter_code() {
        let entry = parse_line("M package.json").unwrap();
        assert_eq!(
            entry.code,
            StatusCode::Changed {
                index: FileState::Modified,
                worktree: FileState::Unmodified,
            }
        );
        assert_eq!(entry.path, "package.json");
    }

    #[test]
    fn test_parse_untracked_and_ignored() {
        assert_eq!(
            parse_line("?? docs/new.md").unwrap().code,
            StatusCode::Untracked
        );
        assert_eq!(parse_line("!! target/").unwrap().code, StatusCode::Ignored);
    }

    #[test]
    fn test_parse_unmerged_pairs() {
        for line in ["UU a.md", "AA a.md", "DD a.md", "AU a.md", "UD a.md", "UA a.md", "DU a.md"] {
            let entry = parse_line(line).unwrap();
            assert!(
                matches!(entry.code, StatusCode::Unmerged(_)),
                "{} should be unmerged",
                line
            );
            assert_eq!(entry.path, "a.md");
        }
    }

    #[test]
    fn test_parse_rename() {
        let entry = parse_line("R  docs/old.md -> docs/new.md").unwrap();
        assert_eq!(entry.path, "docs/new.md");
        assert_eq!(entry.orig_path.as_deref(), Some("docs/old.md"));
    }

    #[test]
    fn test_arrow_in_plain_path_without_rename() {
        let entry = parse_line("?? a -> b.md").unwrap();
        assert_eq!(entry.path, "a -> b.md");
        assert!(entry.orig_path.is_none());
    }

    #[test]
    fn test_parse_quoted_paths() {
        let entry = parse_line(r#"?? "docs/with space.md""#).unwrap();
        assert_eq!(entry.path, "docs/with space.md");

        let entry = parse_line(r#"?? "docs/caf\303\251.md""#).unwrap();
        assert_eq!(entry.path, "docs/café.md");

        let entry = parse_line(r#"R  "a \"x\".md" -> "b -> c.md""#).unwrap();
        assert_eq!(entry.orig_path.as_deref(), Some(r#"a "x".md"#));
        assert_eq!(entry.path, "b -> c.md");
    }

    #[test]
    fn test_malformed_lines() {
        for line in ["", "XY file", "M", "MM", "MM ", "   file", "?M file", "garbage"] {
            assert!(
                matches!(parse_line(line), Err(Error::MalformedStatus(_))),
                "{:?} should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_parse_report_skips_blank_lines() {
        let entries = parse_report("M  package.json\n\n?? docs/a.md\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].path, "docs/a.md");
    }
}
