// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Shell word expansion
//!
//! This crate turns the [`Word`]s parsed by `bish-syntax` into strings and
//! fields: brace expansion, tilde expansion, parameter expansion with all
//! its operators, arithmetic expansion, command substitution, field
//! splitting on `IFS`, and pathname globbing.
//!
//! Everything runs against a [`Config`]. The environment is any
//! [`Environ`]; command substitution, process substitution, and directory
//! listing are injected as callbacks, so the engine itself spawns nothing
//! and touches no file system. A missing callback turns the corresponding
//! construct into a typed [`Error`].
//!
//! The entry points mirror the places words appear in a shell:
//!
//! - [`literal`]: one word to one string, as on the right of an
//!   assignment. Tilde, parameter, arithmetic, and command substitution
//!   run; brace expansion, field splitting, and globbing do not.
//! - [`document`]: like `literal` with here-document semantics: no tilde
//!   expansion and the heredoc escaping rules.
//! - [`pattern`]: one word to a glob pattern, with quoted parts escaped.
//! - [`fields`] / [`fields_seq`]: the full pipeline producing zero or
//!   more fields.
//! - [`braces`]: brace expansion alone, one word to many.
//! - [`format`] and [`read_fields`]: the `printf` and `read` built-in
//!   helpers, which belong to the same layer.
//!
//! ```
//! use bish_env::MapEnviron;
//! use bish_expand::{fields, Config};
//! use bish_syntax::parser::{Config as ParserConfig, Parser};
//!
//! let file = Parser::new(ParserConfig::default())
//!     .parse_str("a{1..3} $x", None)
//!     .unwrap();
//! let words = match &file.stmts[0].cmd {
//!     Some(bish_syntax::syntax::Command::Call(call)) => call.args.clone(),
//!     _ => unreachable!(),
//! };
//! let mut env = MapEnviron::from_pairs([("x", "b c")]);
//! let mut cfg = Config::new(&mut env);
//! let fields = fields(&mut cfg, &words).unwrap();
//! assert_eq!(fields, ["a1", "a2", "a3", "b", "c"]);
//! ```

use bish_env::Environ;
use bish_syntax::syntax::{CmdSubst, Node, ProcSubst, Word, WordPart};
use std::io::Write;

mod arith;
mod braces;
mod error;
mod format;
mod glob;
mod param;
mod split;
mod tilde;

pub use braces::braces;
pub use error::Error;
pub use format::{format, read_fields};

/// A directory entry as reported by the `read_dir` callback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        DirEntry {
            name: name.into(),
            is_dir,
        }
    }
}

/// Handler running a command substitution, writing its output.
pub type CmdSubstFn<'a> = Box<dyn FnMut(&mut dyn Write, &CmdSubst) -> std::io::Result<()> + 'a>;
/// Handler turning a process substitution into a path.
pub type ProcSubstFn<'a> = Box<dyn FnMut(&ProcSubst) -> std::io::Result<String> + 'a>;
/// Handler listing a directory for globbing.
pub type ReadDirFn<'a> = Box<dyn FnMut(&str) -> std::io::Result<Vec<DirEntry>> + 'a>;

/// Everything an expansion needs: the environment, the external-work
/// callbacks, and the glob switches.
pub struct Config<'a> {
    /// The variable store. Expansions with side effects (`${x:=v}`,
    /// `$((x++))`) need its writable view.
    pub env: &'a mut dyn Environ,
    pub cmd_subst: Option<CmdSubstFn<'a>>,
    pub proc_subst: Option<ProcSubstFn<'a>>,
    pub read_dir: Option<ReadDirFn<'a>>,
    /// `**` recurses into directories.
    pub glob_star: bool,
    /// Globbing ignores case.
    pub no_case_glob: bool,
    /// A glob with no matches expands to no fields instead of itself.
    pub null_glob: bool,
    /// Reading an unset variable is an error.
    pub no_unset: bool,
}

impl<'a> Config<'a> {
    /// A configuration with no callbacks and all switches off.
    #[must_use]
    pub fn new(env: &'a mut dyn Environ) -> Self {
        Config {
            env,
            cmd_subst: None,
            proc_subst: None,
            read_dir: None,
            glob_star: false,
            no_case_glob: false,
            null_glob: false,
            no_unset: false,
        }
    }

    /// The field separator set, from `IFS` or its default.
    fn ifs(&self) -> String {
        let variable = self.env.get("IFS");
        match variable.str_value() {
            Some(value) => value.to_string(),
            None if variable.is_set() => String::new(),
            None => " \t\n".to_string(),
        }
    }
}

/// How backslashes behave in an unquoted literal, inside double quotes,
/// and inside an expandable here-document body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LitCtx {
    Unquoted,
    DblQuotes,
    Heredoc,
}

/// One piece of expansion output, before field splitting.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Piece {
    Str {
        text: String,
        /// Quoted text never splits, never globs, and keeps empty fields
        /// alive.
        quoted: bool,
        /// Whether the text came from an unquoted expansion and is
        /// subject to field splitting.
        splittable: bool,
    },
    /// A hard field boundary, as between the elements of `"$@"`.
    Break,
}

impl Piece {
    fn quoted(text: impl Into<String>) -> Self {
        Piece::Str {
            text: text.into(),
            quoted: true,
            splittable: false,
        }
    }

    fn unquoted(text: impl Into<String>) -> Self {
        Piece::Str {
            text: text.into(),
            quoted: false,
            splittable: false,
        }
    }

    fn expanded(text: impl Into<String>, quoted: bool) -> Self {
        Piece::Str {
            text: text.into(),
            quoted,
            splittable: !quoted,
        }
    }
}

/// Expands a word into pieces. `tilde` enables tilde expansion for the
/// leading literal; `lit_ctx` picks the backslash rules of the calling
/// context.
fn expand_word(
    cfg: &mut Config,
    word: &Word,
    tilde: bool,
    lit_ctx: LitCtx,
    out: &mut Vec<Piece>,
) -> Result<(), Error> {
    let mut parts = word.parts.iter();
    if tilde {
        if let Some(WordPart::Lit(lit)) = word.parts.first() {
            if lit.value.starts_with('~') {
                parts.next();
                tilde::expand_tilde(cfg, &lit.value, out);
                for part in parts {
                    expand_part(cfg, part, false, lit_ctx, out)?;
                }
                return Ok(());
            }
        }
    }
    for part in parts {
        expand_part(cfg, part, false, lit_ctx, out)?;
    }
    Ok(())
}

fn expand_part(
    cfg: &mut Config,
    part: &WordPart,
    quoted: bool,
    lit_ctx: LitCtx,
    out: &mut Vec<Piece>,
) -> Result<(), Error> {
    match part {
        WordPart::Lit(lit) => expand_lit(&lit.value, quoted, lit_ctx, out),
        WordPart::SglQuoted(sq) => {
            let value = if sq.dollar {
                format::c_unescape(&sq.value)
            } else {
                sq.value.clone()
            };
            out.push(Piece::quoted(value));
        }
        WordPart::DblQuoted(dq) => {
            if dq.parts.is_empty() {
                // A literal `""` survives as an empty field. Quoted
                // expansions decide for themselves: `"$x"` emits an empty
                // quoted piece when unset, while `"$@"` with no
                // positional parameters emits nothing at all.
                out.push(Piece::quoted(""));
            }
            for part in &dq.parts {
                expand_part(cfg, part, true, LitCtx::DblQuotes, out)?;
            }
        }
        WordPart::ParamExp(pe) => param::expand_param(cfg, pe, quoted, out)?,
        WordPart::CmdSubst(cs) => {
            let text = cmd_subst_output(cfg, cs)?;
            out.push(Piece::expanded(text, quoted));
        }
        WordPart::ArithmExp(ae) => {
            let value = arith::eval_arithm(cfg, &ae.expr)?;
            out.push(Piece::expanded(value.to_string(), quoted));
        }
        WordPart::ProcSubst(ps) => {
            let Some(handler) = cfg.proc_subst.as_mut() else {
                return Err(Error::UnexpectedProcess { pos: ps.pos() });
            };
            let path = handler(ps)?;
            out.push(Piece::quoted(path));
        }
        WordPart::ExtGlob(eg) => {
            // The pattern engine has no extended-glob operators; the raw
            // text participates literally.
            out.push(Piece::unquoted(format!("{eg}")));
        }
        WordPart::BraceExp(be) => {
            // Reachable only when the caller skipped brace expansion.
            out.push(Piece::unquoted(format!("{be}")));
        }
    }
    Ok(())
}

/// Runs the command-substitution callback and trims trailing newlines.
fn cmd_subst_output(cfg: &mut Config, cs: &CmdSubst) -> Result<String, Error> {
    let Some(handler) = cfg.cmd_subst.as_mut() else {
        return Err(Error::UnexpectedCommand { pos: cs.pos() });
    };
    let mut buf = Vec::new();
    handler(&mut buf, cs)?;
    let mut text = String::from_utf8_lossy(&buf).into_owned();
    while text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn expand_lit(value: &str, quoted: bool, lit_ctx: LitCtx, out: &mut Vec<Piece>) {
    match lit_ctx {
        LitCtx::Unquoted if !quoted => {
            // Backslash escapes the next character; escaped characters
            // count as quoted so they neither split nor glob.
            let mut run = String::new();
            let mut chars = value.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        if !run.is_empty() {
                            out.push(Piece::unquoted(std::mem::take(&mut run)));
                        }
                        out.push(Piece::quoted(escaped.to_string()));
                    } else {
                        run.push('\\');
                    }
                } else {
                    run.push(c);
                }
            }
            if !run.is_empty() {
                out.push(Piece::unquoted(run));
            }
        }
        LitCtx::DblQuotes | LitCtx::Unquoted => {
            out.push(Piece::quoted(unescape_in_quotes(value, "$`\"\\")));
        }
        LitCtx::Heredoc => {
            out.push(Piece::quoted(unescape_in_quotes(value, "$`\\")));
        }
    }
}

/// Removes the backslash from `\c` for the characters in `escapable`,
/// keeping other backslashes as ordinary characters.
fn unescape_in_quotes(value: &str, escapable: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if escapable.contains(next) => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Joins pieces into one string, with hard field breaks becoming single
/// spaces as they do for `"$@"` in a scalar context.
fn join_pieces(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Str { text, .. } => out.push_str(text),
            Piece::Break => out.push(' '),
        }
    }
    out
}

/// Expands one word to one string, as on the right-hand side of an
/// assignment: tilde, parameter, arithmetic, and command substitution,
/// but no brace expansion, no field splitting, and no globbing.
pub fn literal(cfg: &mut Config, word: &Word) -> Result<String, Error> {
    let mut pieces = Vec::new();
    expand_word(cfg, word, true, LitCtx::Unquoted, &mut pieces)?;
    Ok(join_pieces(&pieces))
}

/// Like [`literal`] with here-document-body semantics: no tilde
/// expansion, and backslash only escapes `$`, `` ` `` and `\`.
pub fn document(cfg: &mut Config, word: &Word) -> Result<String, Error> {
    let mut pieces = Vec::new();
    expand_word(cfg, word, false, LitCtx::Heredoc, &mut pieces)?;
    Ok(join_pieces(&pieces))
}

/// Expands one word into a glob pattern: quoted parts are escaped so they
/// match themselves, unquoted parts pass through.
pub fn pattern(cfg: &mut Config, word: &Word) -> Result<String, Error> {
    let mut pieces = Vec::new();
    expand_word(cfg, word, false, LitCtx::Unquoted, &mut pieces)?;
    Ok(assemble_pattern(&pieces))
}

fn assemble_pattern(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Str { text, quoted, .. } => {
                if *quoted {
                    out.push_str(&bish_fnmatch::quote_meta(text));
                } else {
                    out.push_str(text);
                }
            }
            Piece::Break => out.push(' '),
        }
    }
    out
}

/// The full expansion pipeline: brace expansion, tilde expansion,
/// parameter/arithmetic/command substitution, field splitting on `IFS`,
/// and pathname globbing, producing zero or more fields.
pub fn fields(cfg: &mut Config, words: &[Word]) -> Result<Vec<String>, Error> {
    let mut out = Vec::new();
    for word in words {
        word_fields(cfg, word, &mut out)?;
    }
    Ok(out)
}

fn word_fields(cfg: &mut Config, word: &Word, out: &mut Vec<String>) -> Result<(), Error> {
    for word in braces::braces_word(word) {
        let mut pieces = Vec::new();
        expand_word(cfg, &word, true, LitCtx::Unquoted, &mut pieces)?;
        let ifs = cfg.ifs();
        for field in split::split_fields(&pieces, &ifs) {
            glob::glob_field(cfg, &field, out)?;
        }
    }
    Ok(())
}

/// Streaming form of [`fields`], yielding one field at a time.
pub fn fields_seq<'s, 'a, 'w>(cfg: &'s mut Config<'a>, words: &'w [Word]) -> FieldsSeq<'s, 'a, 'w> {
    FieldsSeq {
        cfg,
        words: words.iter(),
        buf: std::collections::VecDeque::new(),
        done: false,
    }
}

/// Iterator returned by [`fields_seq`].
pub struct FieldsSeq<'s, 'a, 'w> {
    cfg: &'s mut Config<'a>,
    words: std::slice::Iter<'w, Word>,
    buf: std::collections::VecDeque<String>,
    done: bool,
}

impl Iterator for FieldsSeq<'_, '_, '_> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(field) = self.buf.pop_front() {
                return Some(Ok(field));
            }
            if self.done {
                return None;
            }
            let Some(word) = self.words.next() else {
                self.done = true;
                return None;
            };
            let mut fields = Vec::new();
            if let Err(e) = word_fields(self.cfg, word, &mut fields) {
                self.done = true;
                return Some(Err(e));
            }
            self.buf.extend(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_env::{MapEnviron, Variable};
    use bish_syntax::parser::{Config as ParserConfig, Parser};
    use bish_syntax::syntax::Command;

    fn words(src: &str) -> Vec<Word> {
        let file = Parser::new(ParserConfig::default())
            .parse_str(src, None)
            .unwrap();
        match file.stmts.into_iter().next().unwrap().cmd {
            Some(Command::Call(call)) => call.args,
            other => panic!("expected a call, got {other:?}"),
        }
    }

    fn word(src: &str) -> Word {
        words(src).into_iter().next().unwrap()
    }

    #[test]
    fn literal_basics() {
        let mut env = MapEnviron::from_pairs([("x", "foo")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(literal(&mut cfg, &word("a$x!")).unwrap(), "afoo!");
        assert_eq!(literal(&mut cfg, &word("'a b'")).unwrap(), "a b");
        assert_eq!(literal(&mut cfg, &word("\"$x bar\"")).unwrap(), "foo bar");
        assert_eq!(literal(&mut cfg, &word("$((2 * 21))")).unwrap(), "42");
    }

    #[test]
    fn literal_does_not_split_or_glob() {
        let mut env = MapEnviron::from_pairs([("x", "a b")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(literal(&mut cfg, &word("$x")).unwrap(), "a b");
        assert_eq!(literal(&mut cfg, &word("*.c")).unwrap(), "*.c");
    }

    #[test]
    fn fields_split_unquoted_expansions() {
        let mut env = MapEnviron::from_pairs([("x", "a b")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(fields(&mut cfg, &words("$x")).unwrap(), ["a", "b"]);
        assert_eq!(fields(&mut cfg, &words("\"$x\"")).unwrap(), ["a b"]);
        assert_eq!(fields(&mut cfg, &words("pre$x post")).unwrap(), ["prea", "b", "post"]);
    }

    #[test]
    fn empty_expansions_drop_unless_quoted() {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        assert_eq!(fields(&mut cfg, &words("$unset")).unwrap(), Vec::<String>::new());
        assert_eq!(fields(&mut cfg, &words("\"$unset\"")).unwrap(), [""]);
        assert_eq!(fields(&mut cfg, &words("''")).unwrap(), [""]);
    }

    #[test]
    fn ifs_colon_splitting() {
        let mut env = MapEnviron::from_pairs([("IFS", ":"), ("x", "a::b")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(fields(&mut cfg, &words("$x")).unwrap(), ["a", "", "b"]);
        assert_eq!(fields(&mut cfg, &words("\"$x\"")).unwrap(), ["a::b"]);
    }

    #[test]
    fn at_expansion_in_quotes_preserves_fields() {
        let mut env = MapEnviron::new();
        env.insert("arr", Variable::indexed(["a b", "", "c"]));
        let mut cfg = Config::new(&mut env);
        assert_eq!(
            fields(&mut cfg, &words("\"${arr[@]}\"")).unwrap(),
            ["a b", "", "c"]
        );
        assert_eq!(fields(&mut cfg, &words("${arr[@]}")).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn brace_range_expansion() {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        assert_eq!(
            fields(&mut cfg, &words("a{1..4}")).unwrap(),
            ["a1", "a2", "a3", "a4"]
        );
        assert_eq!(
            fields(&mut cfg, &words("{x,y}{1,2}")).unwrap(),
            ["x1", "x2", "y1", "y2"]
        );
    }

    #[test]
    fn tilde_expansion_with_home() {
        let mut env = MapEnviron::from_pairs([("HOME", "/u/h")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(fields(&mut cfg, &words("~/x")).unwrap(), ["/u/h/x"]);
        assert_eq!(literal(&mut cfg, &word("~")).unwrap(), "/u/h");
        // Quoted tildes stay literal.
        assert_eq!(fields(&mut cfg, &words("\"~/x\"")).unwrap(), ["~/x"]);
    }

    #[test]
    fn parameter_replace_all() {
        let mut env = MapEnviron::from_pairs([("x", "foo")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(literal(&mut cfg, &word("${x//o/a}")).unwrap(), "faa");
        assert_eq!(literal(&mut cfg, &word("${x/o/a}")).unwrap(), "fao");
    }

    #[test]
    fn arithmetic_side_effects_in_order() {
        let mut env = MapEnviron::from_pairs([("i", "5")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(literal(&mut cfg, &word("$((i++))")).unwrap(), "5");
        assert_eq!(cfg.env.get("i").str_value(), Some("6"));
        assert_eq!(literal(&mut cfg, &word("$(( 1 + 2 * 3 ))")).unwrap(), "7");
    }

    #[test]
    fn command_substitution_goes_through_the_callback() {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        cfg.cmd_subst = Some(Box::new(|w, _| {
            w.write_all(b"out\n")?;
            Ok(())
        }));
        assert_eq!(literal(&mut cfg, &word("$(anything)")).unwrap(), "out");

        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        let err = literal(&mut cfg, &word("$(anything)")).unwrap_err();
        assert!(matches!(err, Error::UnexpectedCommand { .. }));
    }

    #[test]
    fn document_semantics() {
        let mut env = MapEnviron::from_pairs([("x", "v")]);
        let mut cfg = Config::new(&mut env);
        // No tilde expansion in here-document bodies.
        assert_eq!(document(&mut cfg, &word("~/x")).unwrap(), "~/x");
    }

    #[test]
    fn pattern_escapes_quoted_parts() {
        let mut env = MapEnviron::from_pairs([("x", "a*b")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(pattern(&mut cfg, &word("\"$x\"c*")).unwrap(), "a\\*bc*");
    }

    #[test]
    fn fields_seq_streams() {
        let mut env = MapEnviron::from_pairs([("x", "a b")]);
        let mut cfg = Config::new(&mut env);
        let all_words = words("$x {1..2}");
        let collected: Result<Vec<_>, _> = fields_seq(&mut cfg, &all_words).collect();
        assert_eq!(collected.unwrap(), ["a", "b", "1", "2"]);
    }

    #[test]
    fn no_unset_flags_reads() {
        let mut env = MapEnviron::new();
        let mut cfg = Config::new(&mut env);
        cfg.no_unset = true;
        let err = literal(&mut cfg, &word("$nope")).unwrap_err();
        assert!(matches!(err, Error::UnsetParameter { .. }));
        // A default keeps it legal.
        assert_eq!(literal(&mut cfg, &word("${nope:-ok}")).unwrap(), "ok");
    }
}
