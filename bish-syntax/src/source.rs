// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Source positions and parse errors
//!
//! Every AST node carries a start and end [`Pos`]. A position is a byte
//! offset into the source plus the 1-based line and column derived from it.
//! The all-zero default value is a sentinel meaning "unknown/synthetic"; it
//! never takes part in comparisons against real positions.

use std::fmt;
use thiserror::Error;

/// Position of a byte in the source.
///
/// The column is counted in bytes, not display width, so that a position can
/// always be mapped back to the source slice it came from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Pos {
    offset: u32,
    line: u32,
    col: u32,
}

impl Pos {
    /// Creates a position from a byte offset and 1-based line and column.
    #[must_use]
    pub fn new(offset: usize, line: u32, col: u32) -> Self {
        debug_assert!(line > 0 && col > 0);
        Pos {
            offset: offset as u32,
            line,
            col,
        }
    }

    /// Byte offset from the start of the source, counted from zero.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    /// 1-based line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column number, in bytes.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Whether this is a real source position rather than the synthetic
    /// default.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }

    /// Returns a copy of this position shifted right by `n` bytes on the
    /// same line.
    #[must_use]
    pub(crate) fn advance(&self, n: u32) -> Self {
        Pos {
            offset: self.offset + n,
            line: self.line,
            col: self.col + n,
        }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Shell language dialect accepted by the parser.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LangVariant {
    /// Strict POSIX shell grammar; Bash-only keywords are ordinary words.
    Posix,
    /// GNU Bash grammar.
    #[default]
    Bash,
    /// MirBSD Korn shell grammar, treated as Bash minus a few constructs.
    MirBsd,
    /// Bats test files; Bash plus the `@test` prelude word.
    Bats,
}

impl LangVariant {
    /// Whether Bash extensions are recognized in this dialect.
    #[must_use]
    pub fn is_bash(self) -> bool {
        matches!(self, LangVariant::Bash | LangVariant::Bats)
    }
}

impl fmt::Display for LangVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LangVariant::Posix => "POSIX",
            LangVariant::Bash => "Bash",
            LangVariant::MirBsd => "mksh",
            LangVariant::Bats => "bats",
        };
        f.write_str(name)
    }
}

/// Error produced by the lexer or parser.
///
/// The display form is `<file>:<line>:<col>: <message>`; the file prefix is
/// omitted when no file name is known.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct SyntaxError {
    /// Name of the file being parsed, if any.
    pub filename: Option<String>,
    /// Position where the error was detected.
    pub pos: Pos,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.filename {
            write!(f, "{name}:")?;
        }
        if self.pos.is_valid() {
            write!(f, "{}: ", self.pos)?;
        }
        f.write_str(&self.message)
    }
}

/// Table of line-start offsets, shared by a [`File`](crate::syntax::File)
/// and the error formatter.
///
/// The table is append-only: the lexer pushes an entry for every newline it
/// consumes, and offsets are resolved to (line, column) pairs by binary
/// search.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineTable {
    /// Byte offsets at which lines start. The first entry is always 0.
    starts: Vec<u32>,
}

impl LineTable {
    /// Creates a table holding only the first line.
    #[must_use]
    pub fn new() -> Self {
        LineTable { starts: vec![0] }
    }

    /// Records that a new line starts at the given byte offset.
    ///
    /// Offsets must be pushed in strictly increasing order.
    pub fn push(&mut self, offset: usize) {
        debug_assert!(self.starts.last().is_none_or(|&s| s < offset as u32));
        self.starts.push(offset as u32);
    }

    /// Number of lines recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether the table holds no lines. Always false for tables created
    /// with [`new`](Self::new).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Resolves a byte offset to a full position.
    #[must_use]
    pub fn position(&self, offset: usize) -> Pos {
        let line = self.starts.partition_point(|&s| s as usize <= offset);
        let start = self.starts[line - 1] as usize;
        Pos::new(offset, line as u32, (offset - start + 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_position_is_invalid() {
        let pos = Pos::default();
        assert!(!pos.is_valid());
        assert!(Pos::new(0, 1, 1).is_valid());
    }

    #[test]
    fn position_ordering_follows_offsets() {
        let a = Pos::new(3, 1, 4);
        let b = Pos::new(7, 2, 1);
        assert!(a < b);
        assert!(b > a);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn line_table_resolution() {
        let mut lines = LineTable::new();
        // "ab\ncd\n\nx"
        lines.push(3);
        lines.push(6);
        lines.push(7);
        assert_eq!(lines.position(0), Pos::new(0, 1, 1));
        assert_eq!(lines.position(2), Pos::new(2, 1, 3));
        assert_eq!(lines.position(3), Pos::new(3, 2, 1));
        assert_eq!(lines.position(6), Pos::new(6, 3, 1));
        assert_eq!(lines.position(7), Pos::new(7, 4, 1));
    }

    #[test]
    fn error_display_with_and_without_filename() {
        let error = SyntaxError {
            filename: Some("x.sh".to_string()),
            pos: Pos::new(5, 2, 3),
            message: "reached EOF without matching ( with )".to_string(),
        };
        assert_eq!(error.to_string(), "x.sh:2:3: reached EOF without matching ( with )");

        let error = SyntaxError {
            filename: None,
            pos: Pos::new(5, 2, 3),
            message: "not a valid arithmetic operator: |".to_string(),
        };
        assert_eq!(error.to_string(), "2:3: not a valid arithmetic operator: |");
    }
}
