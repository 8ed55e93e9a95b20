// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Pathname globbing over the `read_dir` callback
//!
//! A field that still contains pattern metacharacters after splitting is
//! matched against the file system, or whatever the `read_dir` callback
//! answers for. The pattern is walked segment by segment: literal
//! segments are checked for existence, wildcard segments filter the
//! sorted entries of each candidate directory, and a full `**` segment
//! recurses depth-first when globstar is enabled. Dotfiles only match
//! when the segment starts with a literal dot.
//!
//! With no matches the original field is kept verbatim, unless the
//! null-glob switch asks for zero fields instead.

use crate::split::FieldPiece;
use crate::{Config, Error};
use bish_fnmatch::{has_meta, quote_meta, Config as PatConfig, Pattern};

/// Expands one split field, appending the resulting fields.
pub(crate) fn glob_field(
    cfg: &mut Config,
    field: &[FieldPiece],
    out: &mut Vec<String>,
) -> Result<(), Error> {
    let mut value = String::new();
    let mut pattern = String::new();
    for piece in field {
        value.push_str(&piece.text);
        if piece.quoted {
            pattern.push_str(&quote_meta(&piece.text));
        } else {
            pattern.push_str(&piece.text);
        }
    }
    if cfg.read_dir.is_none() || !has_meta(&pattern) {
        out.push(value);
        return Ok(());
    }
    let matches = glob(cfg, &pattern)?;
    if matches.is_empty() {
        if !cfg.null_glob {
            out.push(value);
        }
    } else {
        out.extend(matches);
    }
    Ok(())
}

fn read_dir_sorted(cfg: &mut Config, path: &str) -> Vec<crate::DirEntry> {
    let Some(read_dir) = cfg.read_dir.as_mut() else {
        return Vec::new();
    };
    let mut entries = read_dir(path).unwrap_or_default();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

fn dir_path(candidate: &str) -> &str {
    if candidate.is_empty() { "." } else { candidate }
}

fn join(candidate: &str, name: &str) -> String {
    if candidate.is_empty() {
        name.to_string()
    } else if candidate.ends_with('/') {
        format!("{candidate}{name}")
    } else {
        format!("{candidate}/{name}")
    }
}

/// Whether a pattern segment begins with a literal dot, allowing it to
/// match hidden entries.
fn starts_with_literal_dot(segment: &str) -> bool {
    segment.strip_prefix('\\').unwrap_or(segment).starts_with('.')
}

fn unescape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn glob(cfg: &mut Config, pattern: &str) -> Result<Vec<String>, Error> {
    let absolute = pattern.starts_with('/');
    let trimmed = pattern.trim_start_matches('/');
    let segments: Vec<&str> = trimmed.split('/').collect();
    let mut candidates: Vec<String> =
        vec![if absolute { "/".to_string() } else { String::new() }];
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        let is_last = i == last;
        let mut next = Vec::new();
        if *segment == "**" && cfg.glob_star {
            for candidate in std::mem::take(&mut candidates) {
                if is_last {
                    // The zero-level case keeps its trailing separator.
                    if !candidate.is_empty() {
                        next.push(join(&candidate, ""));
                    }
                    collect_recursive(cfg, &candidate, false, &mut next);
                } else {
                    collect_recursive(cfg, &candidate, true, &mut next);
                }
            }
        } else if has_meta(segment) {
            let compiled = Pattern::parse(segment, &PatConfig::whole(cfg.no_case_glob))?;
            let dot_ok = starts_with_literal_dot(segment);
            for candidate in std::mem::take(&mut candidates) {
                for entry in read_dir_sorted(cfg, dir_path(&candidate)) {
                    if entry.name.starts_with('.') && !dot_ok {
                        continue;
                    }
                    if !is_last && !entry.is_dir {
                        continue;
                    }
                    if compiled.is_match(&entry.name) {
                        next.push(join(&candidate, &entry.name));
                    }
                }
            }
        } else {
            let literal = unescape_segment(segment);
            for candidate in std::mem::take(&mut candidates) {
                let found = read_dir_sorted(cfg, dir_path(&candidate))
                    .into_iter()
                    .find(|entry| entry.name == literal);
                match found {
                    Some(entry) if is_last || entry.is_dir => {
                        next.push(join(&candidate, &literal));
                    }
                    _ => {}
                }
            }
        }
        candidates = next;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
    }
    Ok(candidates)
}

/// Collects entries below `base` depth-first, each directory's entries in
/// name order. With `dirs_only`, only directories are reported; `**`
/// never descends into hidden directories.
fn collect_recursive(cfg: &mut Config, base: &str, dirs_only: bool, out: &mut Vec<String>) {
    for entry in read_dir_sorted(cfg, dir_path(base)) {
        if entry.name.starts_with('.') {
            continue;
        }
        let path = join(base, &entry.name);
        if entry.is_dir {
            out.push(path.clone());
            collect_recursive(cfg, &path, dirs_only, out);
        } else if !dirs_only {
            out.push(path);
        }
    }
}
