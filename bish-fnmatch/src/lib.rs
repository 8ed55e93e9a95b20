// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Shell glob patterns, compiled to regular expressions
//!
//! A [`Pattern`] understands the POSIX pattern syntax with Bash's
//! globstar extension:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`, and `**` when globstar is enabled)
//! - Bracket expressions (`[...]`) with literals, ranges (`a-z`),
//!   complement (`[!...]` or `[^...]`), and ASCII character classes
//!   (`[:alpha:]`)
//! - Backslash escapes making the next character literal
//!
//! Matching works by translating the pattern into a regular expression for
//! the [`regex`] crate, with `.` matching newlines so that `*` spans
//! whole values. Anchoring and case folding are chosen through
//! [`Config`]. An unmatched `[` is taken literally, the way shells treat
//! it; class names are validated against the set the regex syntax
//! defines, and an unknown name is a typed [`Error`], never a panic.
//!
//! [`quote_meta`] escapes a string so it matches only itself, and
//! [`has_meta`] reports whether a string contains any unescaped pattern
//! metacharacter at all, the usual test for whether globbing needs to
//! run.

use regex::{Regex, RegexBuilder};
use regex_syntax::ast::ClassAsciiKind;
use std::fmt::Write as _;
use thiserror::Error;

/// Errors from pattern compilation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A `[:name:]` class with a name the regex syntax does not define.
    #[error("undefined character class: {0}")]
    UndefinedCharClass(String),
    /// The translated regular expression failed to compile.
    #[error("cannot compile pattern: {0}")]
    Compile(String),
}

/// Options controlling pattern compilation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Whether `**` matches any sequence including separators; without
    /// it, `**` is the same as `*`.
    pub globstar: bool,
    /// Case-insensitive matching.
    pub case_insensitive: bool,
    /// Whether the match is anchored at the start of the subject.
    pub anchor_start: bool,
    /// Whether the match is anchored at the end of the subject.
    pub anchor_end: bool,
}

impl Config {
    /// The configuration for matching a whole string, as done for case
    /// patterns and pathname segments.
    #[must_use]
    pub fn whole(case_insensitive: bool) -> Self {
        Config {
            globstar: false,
            case_insensitive,
            anchor_start: true,
            anchor_end: true,
        }
    }
}

const REGEX_SPECIAL: &str = r"\.+*?()|[]{}^$";

/// A compiled glob pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
    source: String,
}

impl Pattern {
    /// Compiles a pattern under the given configuration.
    pub fn parse(pattern: &str, config: &Config) -> Result<Self, Error> {
        let source = to_regex_string(pattern, config)?;
        let regex = RegexBuilder::new(&source)
            .case_insensitive(config.case_insensitive)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| Error::Compile(e.to_string()))?;
        Ok(Pattern { regex, source })
    }

    /// Whether the subject matches, honoring the anchors the pattern was
    /// compiled with.
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// The first match as a byte range, if any.
    #[must_use]
    pub fn find(&self, subject: &str) -> Option<(usize, usize)> {
        self.regex.find(subject).map(|m| (m.start(), m.end()))
    }

    /// The backing regular expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The translated regular expression source, mostly for diagnostics
    /// and tests.
    #[must_use]
    pub fn as_regex_str(&self) -> &str {
        &self.source
    }
}

/// Translates a glob pattern into regular expression source.
pub fn to_regex_string(pattern: &str, config: &Config) -> Result<String, Error> {
    let mut out = String::with_capacity(pattern.len() + 8);
    if config.anchor_start {
        out.push_str(r"\A");
    }
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '?' => out.push('.'),
            '*' => {
                // Within one segment `**` matches the same as `*`; the
                // directory-crossing behavior of a full `**` segment is
                // decided by the caller walking path segments.
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push_str(".*");
            }
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut out, escaped),
                None => out.push_str(r"\\"),
            },
            '[' => {
                let mut lookahead = chars.clone();
                match translate_bracket(&mut lookahead) {
                    Ok(Some(class)) => {
                        out.push_str(&class);
                        chars = lookahead;
                    }
                    Ok(None) => push_literal(&mut out, '['),
                    Err(e) => return Err(e),
                }
            }
            other => push_literal(&mut out, other),
        }
    }
    if config.anchor_end {
        out.push_str(r"\z");
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if REGEX_SPECIAL.contains(c) {
        out.push('\\');
    }
    out.push(c);
}

/// Translates the inside of a bracket expression, the opening `[` already
/// consumed. Returns `Ok(None)` when the bracket never closes and must be
/// taken literally.
fn translate_bracket(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Option<String>, Error> {
    let mut out = String::from("[");
    let mut first = true;
    match chars.peek() {
        Some('!' | '^') => {
            chars.next();
            out.push('^');
        }
        _ => {}
    }
    loop {
        let Some(c) = chars.next() else {
            return Ok(None);
        };
        match c {
            ']' if !first => {
                out.push(']');
                return Ok(Some(out));
            }
            '[' if chars.peek() == Some(&':') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(':') if chars.peek() == Some(&']') => {
                            chars.next();
                            break;
                        }
                        Some(c) => name.push(c),
                        None => return Ok(None),
                    }
                }
                if ClassAsciiKind::from_name(&name).is_none() {
                    return Err(Error::UndefinedCharClass(name));
                }
                let _ = write!(out, "[:{name}:]");
            }
            '-' => out.push('-'),
            other => {
                if "[]^&~\\".contains(other) || REGEX_SPECIAL.contains(other) {
                    out.push('\\');
                }
                out.push(other);
            }
        }
        first = false;
    }
}

/// Escapes a string so that it matches only itself as a pattern.
#[must_use]
pub fn quote_meta(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Whether the string contains any unescaped pattern metacharacter.
#[must_use]
pub fn has_meta(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' | '[' => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn whole(pattern: &str) -> Pattern {
        Pattern::parse(pattern, &Config::whole(false)).unwrap()
    }

    #[test]
    fn literal_characters() {
        let p = whole("a.c");
        assert!(p.is_match("a.c"));
        assert!(!p.is_match("abc"));
    }

    #[test]
    fn any_char_and_any_string() {
        let p = whole("a?c");
        assert!(p.is_match("abc"));
        assert!(p.is_match("a.c"));
        assert!(!p.is_match("ac"));

        let p = whole("a*");
        assert!(p.is_match("a"));
        assert!(p.is_match("abc"));
        assert!(p.is_match("a\nb"));
        assert!(!p.is_match("ba"));
    }

    #[test]
    fn bracket_expressions() {
        let p = whole("[abc]");
        assert!(p.is_match("b"));
        assert!(!p.is_match("d"));

        let p = whole("[!abc]");
        assert!(!p.is_match("b"));
        assert!(p.is_match("d"));

        let p = whole("[a-cx]");
        assert!(p.is_match("b"));
        assert!(p.is_match("x"));
        assert!(!p.is_match("y"));

        let p = whole("[[:digit:]][[:alpha:]]");
        assert!(p.is_match("1a"));
        assert!(!p.is_match("a1"));
    }

    #[test]
    fn unmatched_bracket_is_literal() {
        let p = whole("a[b");
        assert!(p.is_match("a[b"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn undefined_class_is_an_error() {
        let e = Pattern::parse("[[:bogus:]]", &Config::whole(false)).unwrap_err();
        assert_matches!(e, Error::UndefinedCharClass(name) if name == "bogus");
    }

    #[test]
    fn escapes_make_characters_literal() {
        let p = whole(r"\*\?");
        assert!(p.is_match("*?"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn case_insensitive_matching() {
        let p = Pattern::parse("a*", &Config::whole(true)).unwrap();
        assert!(p.is_match("ABC"));
        assert!(p.is_match("abc"));
    }

    #[test]
    fn unanchored_find() {
        let config = Config {
            anchor_start: false,
            anchor_end: false,
            ..Config::default()
        };
        let p = Pattern::parse("o*o", &config).unwrap();
        assert_eq!(p.find("fooood"), Some((1, 5)));
    }

    #[test]
    fn quote_meta_round_trip() {
        let quoted = quote_meta("a*b?c[d]\\e");
        assert_eq!(quoted, r"a\*b\?c\[d\]\\e");
        let p = whole(&quoted);
        assert!(p.is_match("a*b?c[d]\\e"));
        assert!(!p.is_match("aXbYc[d]\\e"));
    }

    #[test]
    fn meta_detection() {
        assert!(has_meta("a*"));
        assert!(has_meta("a[b]"));
        assert!(!has_meta("plain"));
        assert!(!has_meta(r"a\*"));
    }
}
