// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! End-to-end expansion scenarios, each pinning one documented behavior.

use bish_env::MapEnviron;
use bish_expand::{fields, literal, Config, DirEntry};
use bish_syntax::parser::{Config as ParserConfig, Parser};
use bish_syntax::syntax::{Command, Word};
use std::collections::HashMap;

fn words(src: &str) -> Vec<Word> {
    let file = Parser::new(ParserConfig::default())
        .parse_str(src, None)
        .unwrap();
    match file.stmts.into_iter().next().unwrap().cmd {
        Some(Command::Call(call)) => call.args,
        other => panic!("expected a call, got {other:?}"),
    }
}

/// A directory tree served to the glob walker, keyed by path.
fn tree(entries: &[(&str, &[(&str, bool)])]) -> HashMap<String, Vec<DirEntry>> {
    entries
        .iter()
        .map(|(path, listing)| {
            let listing = listing
                .iter()
                .map(|(name, is_dir)| DirEntry::new(*name, *is_dir))
                .collect();
            (path.to_string(), listing)
        })
        .collect()
}

fn with_tree<'a>(
    cfg: &mut Config<'a>,
    fs: HashMap<String, Vec<DirEntry>>,
) {
    cfg.read_dir = Some(Box::new(move |path: &str| {
        fs.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string())
        })
    }));
}

#[test]
fn brace_range() {
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    assert_eq!(
        fields(&mut cfg, &words("a{1..4}")).unwrap(),
        ["a1", "a2", "a3", "a4"]
    );
}

#[test]
fn parameter_replace_all() {
    let mut env = MapEnviron::from_pairs([("x", "foo")]);
    let mut cfg = Config::new(&mut env);
    assert_eq!(literal(&mut cfg, &words("${x//o/a}")[0]).unwrap(), "faa");
}

#[test]
fn tilde_with_home() {
    let mut env = MapEnviron::from_pairs([("HOME", "/u/h")]);
    let mut cfg = Config::new(&mut env);
    assert_eq!(fields(&mut cfg, &words("~/x")).unwrap(), ["/u/h/x"]);
}

#[test]
fn unquoted_splitting() {
    let mut env = MapEnviron::from_pairs([("x", "a b")]);
    let mut cfg = Config::new(&mut env);
    assert_eq!(fields(&mut cfg, &words("$x")).unwrap(), ["a", "b"]);
    assert_eq!(fields(&mut cfg, &words("\"$x\"")).unwrap(), ["a b"]);
}

#[test]
fn arithmetic_with_side_effects() {
    let mut env = MapEnviron::from_pairs([("i", "5")]);
    let mut cfg = Config::new(&mut env);
    assert_eq!(literal(&mut cfg, &words("$(( 1 + 2 * 3 ))")[0]).unwrap(), "7");
    assert_eq!(literal(&mut cfg, &words("$(( i++ ))")[0]).unwrap(), "5");
    assert_eq!(cfg.env.get("i").str_value(), Some("6"));
}

#[test]
fn heredoc_tab_stripping() {
    let file = Parser::new(ParserConfig::default())
        .parse_str("cat <<-E\n\tfoo\n\tE\n", None)
        .unwrap();
    let body = file.stmts[0].redirs[0].hdoc.as_ref().unwrap();
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    assert_eq!(
        bish_expand::document(&mut cfg, body).unwrap(),
        "foo\n"
    );
}

#[test]
fn heredoc_fifo_ordering() {
    let file = Parser::new(ParserConfig::default())
        .parse_str("cmd <<A <<B\nalpha\nA\nbeta\nB\n", None)
        .unwrap();
    let redirs = &file.stmts[0].redirs;
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    let body_a = bish_expand::document(&mut cfg, redirs[0].hdoc.as_ref().unwrap()).unwrap();
    let body_b = bish_expand::document(&mut cfg, redirs[1].hdoc.as_ref().unwrap()).unwrap();
    assert_eq!(body_a, "alpha\n");
    assert_eq!(body_b, "beta\n");
}

#[test]
fn glob_no_match_keeps_pattern() {
    let fs = tree(&[(".", &[("a", false), ("ab", false)])]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs.clone());
    assert_eq!(fields(&mut cfg, &words("b*")).unwrap(), ["b*"]);

    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    cfg.null_glob = true;
    assert_eq!(fields(&mut cfg, &words("b*")).unwrap(), Vec::<String>::new());
}

#[test]
fn glob_matches_are_sorted() {
    let fs = tree(&[(".", &[("b", false), ("ab", false), ("a", false)])]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    assert_eq!(fields(&mut cfg, &words("a*")).unwrap(), ["a", "ab"]);
}

#[test]
fn case_insensitive_glob() {
    let fs = tree(&[(
        ".",
        &[("a", false), ("ab", false), ("A", false), ("AB", false)],
    )]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    cfg.no_case_glob = true;
    assert_eq!(fields(&mut cfg, &words("a*")).unwrap(), ["A", "AB", "a", "ab"]);
}

#[test]
fn dotfiles_need_a_literal_dot() {
    let fs = tree(&[(".", &[(".hidden", false), ("shown", false)])]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs.clone());
    assert_eq!(fields(&mut cfg, &words("*")).unwrap(), ["shown"]);

    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    assert_eq!(fields(&mut cfg, &words(".h*")).unwrap(), [".hidden"]);
}

#[test]
fn recursive_globstar() {
    let fs = tree(&[
        (
            ".",
            &[("a", true), ("foo", false)],
        ),
        ("a", &[("b", true), ("foo", false)]),
        ("a/b", &[("c", true)]),
        ("a/b/c", &[("foo", false)]),
    ]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    cfg.glob_star = true;
    assert_eq!(
        fields(&mut cfg, &words("**/foo")).unwrap(),
        ["a/foo", "a/b/c/foo"]
    );
}

#[test]
fn quoted_metacharacters_do_not_glob() {
    let fs = tree(&[(".", &[("a", false), ("ab", false)])]);
    let mut env = MapEnviron::new();
    let mut cfg = Config::new(&mut env);
    with_tree(&mut cfg, fs);
    assert_eq!(fields(&mut cfg, &words("\"a*\"")).unwrap(), ["a*"]);
}

#[test]
fn fields_are_idempotent_on_plain_words() {
    // Expanding the printed form of a metacharacter-free word gives back
    // exactly that word.
    for value in ["plain", "a-b_c.txt", "1234", "mixedCASE"] {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        let first = fields(&mut cfg, &words(value)).unwrap();
        assert_eq!(first, [value]);
        let again = fields(&mut cfg, &words(&first[0])).unwrap();
        assert_eq!(again, [value]);
    }
}

#[test]
fn simplified_trees_expand_identically() {
    let sources = [
        "echo `echo hi` $(((1+2))) \"plain\" ${x//o/a}",
        "echo $(($y)) ~/f",
    ];
    for src in sources {
        let plain = Parser::new(ParserConfig::default())
            .parse_str(src, None)
            .unwrap();
        let mut simplified = plain.clone();
        bish_syntax::simplify::simplify(&mut simplified);

        let expand_file = |file: &bish_syntax::syntax::File| {
            let args = match &file.stmts[0].cmd {
                Some(Command::Call(call)) => call.args.clone(),
                other => panic!("expected a call, got {other:?}"),
            };
            let mut env = MapEnviron::from_pairs([
                ("x", "foo"),
                ("y", "41"),
                ("HOME", "/u/h"),
            ]);
            let mut cfg = Config::new(&mut env);
            cfg.cmd_subst = Some(Box::new(|w, _| {
                w.write_all(b"sub")?;
                Ok(())
            }));
            fields(&mut cfg, &args).unwrap()
        };
        assert_eq!(expand_file(&plain), expand_file(&simplified), "for {src}");
    }
}
