// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Tilde expansion
//!
//! Applies only to the first literal part of an unquoted word whose tilde
//! prefix ends at the end of the word or at a slash. `~` resolves through
//! `HOME` (`USERPROFILE` on Windows); `~name` resolves through the
//! space-separated pseudo-variable `HOME name`, the portable stand-in for
//! a user database. A failed lookup leaves the literal untouched.

use crate::{expand_lit, Config, LitCtx, Piece};

pub(crate) fn expand_tilde(cfg: &mut Config, lit: &str, out: &mut Vec<Piece>) {
    debug_assert!(lit.starts_with('~'));
    let rest = &lit[1..];
    let (name, suffix) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let home = lookup_home(cfg, name);
    match home {
        Some(home) if !home.is_empty() => {
            // The result of tilde expansion is not split or globbed.
            out.push(Piece::quoted(home));
            if !suffix.is_empty() {
                expand_lit(suffix, false, LitCtx::Unquoted, out);
            }
        }
        _ => expand_lit(lit, false, LitCtx::Unquoted, out),
    }
}

fn lookup_home(cfg: &mut Config, name: &str) -> Option<String> {
    if name.is_empty() {
        let home = cfg.env.get("HOME").str_value().map(str::to_string);
        #[cfg(windows)]
        let home = home.or_else(|| cfg.env.get("USERPROFILE").str_value().map(str::to_string));
        return home;
    }
    if name.contains('\\') {
        return None;
    }
    cfg.env
        .get(&format!("HOME {name}"))
        .str_value()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_env::MapEnviron;

    fn text(pieces: &[Piece]) -> String {
        pieces
            .iter()
            .map(|p| match p {
                Piece::Str { text, .. } => text.as_str(),
                Piece::Break => " ",
            })
            .collect()
    }

    #[test]
    fn bare_tilde_and_suffix() {
        let mut env = MapEnviron::from_pairs([("HOME", "/u/h")]);
        let mut cfg = Config::new(&mut env);
        let mut out = Vec::new();
        expand_tilde(&mut cfg, "~/x", &mut out);
        assert_eq!(text(&out), "/u/h/x");

        out.clear();
        expand_tilde(&mut cfg, "~", &mut out);
        assert_eq!(text(&out), "/u/h");
    }

    #[test]
    fn named_tilde_via_pseudo_variable() {
        let mut env = MapEnviron::from_pairs([("HOME alice", "/home/alice")]);
        let mut cfg = Config::new(&mut env);
        let mut out = Vec::new();
        expand_tilde(&mut cfg, "~alice/docs", &mut out);
        assert_eq!(text(&out), "/home/alice/docs");
    }

    #[test]
    fn failed_lookup_stays_literal() {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        let mut out = Vec::new();
        expand_tilde(&mut cfg, "~nobody/x", &mut out);
        assert_eq!(text(&out), "~nobody/x");
    }
}
