// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Parameter expansion
//!
//! For a node `${P…}` the steps run in order: resolve `P` (following
//! namerefs), apply the subscript, then length, names and keys listings,
//! slicing, pattern replacement, and finally the trailing operator:
//! defaults, assignment, error, alternates, trimming, case modification,
//! or the `@`-transformations. `$name`, the special parameters, and
//! `LINENO` go through the same path; `LINENO` alone is answered from the
//! node's source position rather than the environment.
//!
//! Positional parameters come from the environment under the name `@` as
//! an indexed array; `$*` and `$#` derive from it when not provided
//! directly.

use crate::format::c_unescape;
use crate::{arith, Config, Error, Piece};
use bish_env::{resolve, Value, Variable};
use bish_fnmatch::{Config as PatConfig, Pattern};
use bish_syntax::syntax::{ArithmExpr, Node, ParamExp, Slice, Word};
use bish_syntax::token::{ParExpOp, ParNamesOp};

/// A parameter's value part-way through the pipeline.
#[derive(Clone, Debug)]
enum Val {
    Unset,
    Str(String),
    /// Multiple fields, as produced by `@` subscripts and `$@`.
    Fields(Vec<String>),
}

impl Val {
    fn is_null(&self) -> bool {
        match self {
            Val::Unset => true,
            Val::Str(s) => s.is_empty(),
            Val::Fields(fields) => fields.is_empty(),
        }
    }

    fn into_str(self, sep: &str) -> String {
        match self {
            Val::Unset => String::new(),
            Val::Str(s) => s,
            Val::Fields(fields) => fields.join(sep),
        }
    }
}

/// What a subscript asks for.
enum Index<'x> {
    None,
    All,
    Join,
    Expr(&'x ArithmExpr),
}

fn index_kind(pe: &ParamExp) -> Index<'_> {
    match &pe.index {
        None => Index::None,
        Some(expr) => match &**expr {
            ArithmExpr::Word(word) => match word.lit() {
                Some("@") => Index::All,
                Some("*") => Index::Join,
                _ => Index::Expr(expr),
            },
            _ => Index::Expr(expr),
        },
    }
}

/// The separator `$*` and `${a[*]}` join with: the first IFS character.
fn star_sep(cfg: &Config) -> String {
    let ifs = cfg.ifs();
    ifs.chars().next().map(String::from).unwrap_or_default()
}

pub(crate) fn expand_param(
    cfg: &mut Config,
    pe: &ParamExp,
    quoted: bool,
    out: &mut Vec<Piece>,
) -> Result<(), Error> {
    let mut name = pe.param.value.clone();

    if name == "LINENO" && pe.pos().is_valid() {
        out.push(Piece::expanded(pe.pos().line().to_string(), quoted));
        return Ok(());
    }

    if let Some(op) = pe.names {
        let mut names = Vec::new();
        cfg.env.each(&mut |n, _| {
            if n.starts_with(&name) {
                names.push(n.to_string());
            }
            true
        });
        names.sort();
        let val = match op {
            ParNamesOp::Names => Val::Str(names.join(&star_sep(cfg))),
            ParNamesOp::NamesByFields => Val::Fields(names),
        };
        emit(val, quoted, out);
        return Ok(());
    }

    if pe.is_indirect() {
        let (_, variable) = resolve(cfg.env, &name);
        name = variable.str_value().unwrap_or_default().to_string();
    }

    let (final_name, variable) = if name.is_empty() {
        (String::new(), Variable::unset())
    } else {
        resolve(cfg.env, &name)
    };

    let mut val = lookup(cfg, &name, &variable, pe)?;

    if pe.length || pe.width {
        let count = match &val {
            Val::Fields(fields) => fields.len(),
            Val::Str(s) => s.chars().count(),
            Val::Unset => 0,
        };
        out.push(Piece::expanded(count.to_string(), quoted));
        return Ok(());
    }

    if cfg.no_unset
        && matches!(val, Val::Unset)
        && !matches!(name.as_str(), "@" | "*")
        && !handles_unset(pe)
    {
        return Err(Error::UnsetParameter {
            pos: pe.pos(),
            message: format!("{name}: unbound variable"),
        });
    }

    if let Some(slice) = &pe.slice {
        val = apply_slice(cfg, val, slice)?;
    }
    if let Some(repl) = &pe.repl {
        let pattern_text = match &repl.orig {
            Some(word) => crate::pattern(cfg, word)?,
            None => String::new(),
        };
        let with = match &repl.with {
            Some(word) => crate::literal(cfg, word)?,
            None => String::new(),
        };
        val = map_strings(val, |s| replace(&s, &pattern_text, &with, repl.all))?;
    }

    if let Some(exp) = &pe.exp {
        let triggered = match exp.op {
            ParExpOp::DefaultUnset | ParExpOp::AssignUnset | ParExpOp::ErrorUnset => {
                matches!(val, Val::Unset)
            }
            ParExpOp::DefaultUnsetOrNull
            | ParExpOp::AssignUnsetOrNull
            | ParExpOp::ErrorUnsetOrNull => val.is_null(),
            ParExpOp::AlternateSet => !matches!(val, Val::Unset),
            ParExpOp::AlternateSetOrNull => !val.is_null(),
            _ => false,
        };
        match exp.op {
            ParExpOp::DefaultUnset | ParExpOp::DefaultUnsetOrNull => {
                if triggered {
                    expand_operand_word(cfg, exp.word.as_ref(), quoted, out)?;
                    return Ok(());
                }
            }
            ParExpOp::AlternateSet | ParExpOp::AlternateSetOrNull => {
                if triggered {
                    expand_operand_word(cfg, exp.word.as_ref(), quoted, out)?;
                } else {
                    // The whole expansion is null; quoted, that is still
                    // an (empty) field.
                    emit(Val::Str(String::new()), quoted, out);
                }
                return Ok(());
            }
            ParExpOp::AssignUnset | ParExpOp::AssignUnsetOrNull => {
                if triggered {
                    let text = match &exp.word {
                        Some(word) => crate::literal(cfg, word)?,
                        None => String::new(),
                    };
                    let target = if final_name.is_empty() { &name } else { &final_name };
                    let Some(writable) = cfg.env.writable() else {
                        return Err(Error::ReadOnlyEnviron(target.clone()));
                    };
                    let mut assigned = variable.clone();
                    assigned.value = Value::Scalar(text.clone());
                    writable.set(target, assigned)?;
                    val = Val::Str(text);
                }
            }
            ParExpOp::ErrorUnset | ParExpOp::ErrorUnsetOrNull => {
                if triggered {
                    let message = match &exp.word {
                        Some(word) => crate::literal(cfg, word)?,
                        None => "parameter null or not set".to_string(),
                    };
                    return Err(Error::UnsetParameter {
                        pos: pe.pos(),
                        message: format!("{name}: {message}"),
                    });
                }
            }
            ParExpOp::RemSmallSuffix
            | ParExpOp::RemLargeSuffix
            | ParExpOp::RemSmallPrefix
            | ParExpOp::RemLargePrefix => {
                let pattern_text = match &exp.word {
                    Some(word) => crate::pattern(cfg, word)?,
                    None => String::new(),
                };
                val = map_strings(val, |s| trim(&s, &pattern_text, exp.op))?;
            }
            ParExpOp::UpperFirst | ParExpOp::UpperAll | ParExpOp::LowerFirst
            | ParExpOp::LowerAll => {
                let pattern_text = match &exp.word {
                    Some(word) => crate::pattern(cfg, word)?,
                    None => "?".to_string(),
                };
                val = map_strings(val, |s| change_case(&s, &pattern_text, exp.op))?;
            }
            ParExpOp::Quoted => {
                val = map_strings(val, |s| Ok(bish_quote::quote(&s)))?;
            }
            ParExpOp::Escaped => {
                val = map_strings(val, |s| Ok(c_unescape(&s)))?;
            }
            ParExpOp::Prompt | ParExpOp::AssignStmt | ParExpOp::Attrs => {
                return Err(Error::NotImplemented {
                    op: exp.op.as_str().trim_start_matches('@').to_string(),
                });
            }
        }
    }

    emit(val, quoted, out);
    Ok(())
}

/// Whether the trailing operator takes care of the unset case itself.
fn handles_unset(pe: &ParamExp) -> bool {
    pe.exp.as_ref().is_some_and(|exp| {
        matches!(
            exp.op,
            ParExpOp::DefaultUnset
                | ParExpOp::DefaultUnsetOrNull
                | ParExpOp::AssignUnset
                | ParExpOp::AssignUnsetOrNull
                | ParExpOp::ErrorUnset
                | ParExpOp::ErrorUnsetOrNull
                | ParExpOp::AlternateSet
                | ParExpOp::AlternateSetOrNull
        )
    })
}

fn expand_operand_word(
    cfg: &mut Config,
    word: Option<&Word>,
    quoted: bool,
    out: &mut Vec<Piece>,
) -> Result<(), Error> {
    let Some(word) = word else { return Ok(()) };
    let lit_ctx = if quoted {
        crate::LitCtx::DblQuotes
    } else {
        crate::LitCtx::Unquoted
    };
    for part in &word.parts {
        crate::expand_part(cfg, part, quoted, lit_ctx, out)?;
    }
    Ok(())
}

/// Resolves the parameter's base value, subscript applied.
fn lookup(
    cfg: &mut Config,
    name: &str,
    variable: &Variable,
    pe: &ParamExp,
) -> Result<Val, Error> {
    // Keys of an array: `${!a[@]}` and `${!a[*]}`.
    if pe.excl && !pe.is_indirect() {
        let keys: Vec<String> = match &variable.value {
            Value::Indexed(values) => (0..values.len()).map(|i| i.to_string()).collect(),
            Value::Associative(map) => map.keys().cloned().collect(),
            Value::Scalar(_) => vec!["0".to_string()],
            Value::Unset | Value::NameRef(_) => Vec::new(),
        };
        return Ok(match index_kind(pe) {
            Index::Join => Val::Str(keys.join(&star_sep(cfg))),
            _ => Val::Fields(keys),
        });
    }

    // The positional parameters and their derivations.
    if name == "@" || name == "*" {
        let positional = cfg.env.get("@");
        let fields = match positional.value {
            Value::Indexed(values) => values,
            Value::Scalar(value) => vec![value],
            _ => match cfg.env.get("*").str_value() {
                Some(joined) => vec![joined.to_string()],
                None => Vec::new(),
            },
        };
        return Ok(if name == "*" {
            Val::Str(fields.join(&star_sep(cfg)))
        } else {
            Val::Fields(fields)
        });
    }
    if name == "#" && !variable.is_set() {
        let count = match cfg.env.get("@").value {
            Value::Indexed(values) => values.len(),
            Value::Scalar(_) => 1,
            _ => 0,
        };
        return Ok(Val::Str(count.to_string()));
    }

    Ok(match index_kind(pe) {
        Index::None => match variable.str_value() {
            Some(value) => Val::Str(value.to_string()),
            None => Val::Unset,
        },
        Index::All | Index::Join => {
            let elems: Vec<String> = match &variable.value {
                Value::Indexed(values) => values.clone(),
                Value::Associative(map) => map.values().cloned().collect(),
                Value::Scalar(value) => vec![value.clone()],
                Value::Unset | Value::NameRef(_) => Vec::new(),
            };
            if matches!(index_kind(pe), Index::Join) {
                Val::Str(elems.join(&star_sep(cfg)))
            } else {
                Val::Fields(elems)
            }
        }
        Index::Expr(expr) => match &variable.value {
            Value::Associative(map) => {
                let key = match expr {
                    ArithmExpr::Word(word) => crate::literal(cfg, word)?,
                    _ => arith::eval_arithm(cfg, expr)?.to_string(),
                };
                match map.get(&key) {
                    Some(value) => Val::Str(value.clone()),
                    None => Val::Unset,
                }
            }
            _ => {
                let mut index = arith::eval_arithm(cfg, expr)?;
                let elems: &[String] = match &variable.value {
                    Value::Indexed(values) => values,
                    Value::Scalar(value) => std::slice::from_ref(value),
                    _ => &[],
                };
                if index < 0 {
                    index += elems.len() as i64;
                }
                match usize::try_from(index).ok().and_then(|i| elems.get(i)) {
                    Some(value) => Val::Str(value.clone()),
                    None => Val::Unset,
                }
            }
        },
    })
}

fn apply_slice(cfg: &mut Config, val: Val, slice: &Slice) -> Result<Val, Error> {
    let offset = match &slice.offset {
        Some(expr) => arith::eval_arithm(cfg, expr)?,
        None => 0,
    };
    let length = match &slice.length {
        Some(expr) => Some(arith::eval_arithm(cfg, expr)?),
        None => None,
    };
    Ok(match val {
        Val::Unset => Val::Unset,
        Val::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            Val::Str(slice_values(&chars, offset, length).iter().collect())
        }
        Val::Fields(fields) => Val::Fields(slice_values(&fields, offset, length).to_vec()),
    })
}

/// Applies an `offset:length` slice to a sequence; a negative offset
/// counts from the end, and a negative length leaves an empty result.
fn slice_values<T>(values: &[T], offset: i64, length: Option<i64>) -> &[T] {
    let len = values.len() as i64;
    let start = if offset < 0 { len + offset } else { offset };
    let start = start.clamp(0, len);
    let end = match length {
        None => len,
        Some(n) if n < 0 => start,
        Some(n) => (start + n).min(len),
    };
    &values[start as usize..end as usize]
}

fn map_strings(
    val: Val,
    mut f: impl FnMut(String) -> Result<String, Error>,
) -> Result<Val, Error> {
    Ok(match val {
        Val::Unset => Val::Str(f(String::new())?),
        Val::Str(s) => Val::Str(f(s)?),
        Val::Fields(fields) => {
            Val::Fields(fields.into_iter().map(f).collect::<Result<_, _>>()?)
        }
    })
}

/// `${x/pat/with}`: a leading `#` or `%` in the pattern anchors it.
fn replace(s: &str, pattern_text: &str, with: &str, all: bool) -> Result<String, Error> {
    if pattern_text.is_empty() {
        return Ok(s.to_string());
    }
    let (pattern_text, anchor_start, anchor_end) =
        if let Some(rest) = pattern_text.strip_prefix('#') {
            (rest, true, false)
        } else if let Some(rest) = pattern_text.strip_prefix('%') {
            (rest, false, true)
        } else {
            (pattern_text, false, false)
        };
    let compiled = Pattern::parse(
        pattern_text,
        &PatConfig {
            globstar: false,
            case_insensitive: false,
            anchor_start,
            anchor_end,
        },
    )?;
    let replaced = if all {
        compiled.regex().replace_all(s, regex_literal(with))
    } else {
        compiled.regex().replace(s, regex_literal(with))
    };
    Ok(replaced.into_owned())
}

fn regex_literal(with: &str) -> regex::NoExpand<'_> {
    regex::NoExpand(with)
}

/// Trims the shortest or longest matching prefix or suffix.
fn trim(s: &str, pattern_text: &str, op: ParExpOp) -> Result<String, Error> {
    if pattern_text.is_empty() {
        return Ok(s.to_string());
    }
    let compiled = Pattern::parse(pattern_text, &PatConfig::whole(false))?;
    let boundaries: Vec<usize> = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect();
    match op {
        ParExpOp::RemSmallPrefix => {
            for &i in &boundaries {
                if compiled.is_match(&s[..i]) {
                    return Ok(s[i..].to_string());
                }
            }
        }
        ParExpOp::RemLargePrefix => {
            for &i in boundaries.iter().rev() {
                if compiled.is_match(&s[..i]) {
                    return Ok(s[i..].to_string());
                }
            }
        }
        ParExpOp::RemSmallSuffix => {
            for &i in boundaries.iter().rev() {
                if compiled.is_match(&s[i..]) {
                    return Ok(s[..i].to_string());
                }
            }
        }
        ParExpOp::RemLargeSuffix => {
            for &i in &boundaries {
                if compiled.is_match(&s[i..]) {
                    return Ok(s[..i].to_string());
                }
            }
        }
        _ => {}
    }
    Ok(s.to_string())
}

/// `${x^pat}` and friends: case-modify characters matching a single-char
/// pattern.
fn change_case(s: &str, pattern_text: &str, op: ParExpOp) -> Result<String, Error> {
    let compiled = Pattern::parse(pattern_text, &PatConfig::whole(false))?;
    let first_only = matches!(op, ParExpOp::UpperFirst | ParExpOp::LowerFirst);
    let upper = matches!(op, ParExpOp::UpperFirst | ParExpOp::UpperAll);
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        let eligible = !first_only || i == 0;
        let mut buf = [0u8; 4];
        if eligible && compiled.is_match(c.encode_utf8(&mut buf)) {
            if upper {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn emit(val: Val, quoted: bool, out: &mut Vec<Piece>) {
    match val {
        Val::Unset => out.push(Piece::expanded(String::new(), quoted)),
        Val::Str(s) => out.push(Piece::expanded(s, quoted)),
        Val::Fields(fields) => {
            // Unquoted empty elements expand to no field at all; quoted
            // ones survive as empty fields.
            let mut first = true;
            for field in fields {
                if !quoted && field.is_empty() {
                    continue;
                }
                if !first {
                    out.push(Piece::Break);
                }
                out.push(Piece::expanded(field, quoted));
                first = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_env::{Environ, MapEnviron};
    use bish_syntax::parser::{Config as ParserConfig, Parser};
    use bish_syntax::syntax::Command;

    fn word(src: &str) -> Word {
        let file = Parser::new(ParserConfig::default())
            .parse_str(src, None)
            .unwrap();
        match file.stmts.into_iter().next().unwrap().cmd {
            Some(Command::Call(mut call)) => call.args.remove(0),
            other => panic!("expected a call, got {other:?}"),
        }
    }

    fn lit(env: &mut MapEnviron, src: &str) -> Result<String, Error> {
        let mut cfg = Config::new(env);
        crate::literal(&mut cfg, &word(src))
    }

    #[test]
    fn defaults_and_alternates() {
        let mut env = MapEnviron::from_pairs([("set", "v"), ("null", "")]);
        assert_eq!(lit(&mut env, "${unset:-d}").unwrap(), "d");
        assert_eq!(lit(&mut env, "${null:-d}").unwrap(), "d");
        assert_eq!(lit(&mut env, "${null-d}").unwrap(), "");
        assert_eq!(lit(&mut env, "${set:-d}").unwrap(), "v");
        assert_eq!(lit(&mut env, "${set:+alt}").unwrap(), "alt");
        assert_eq!(lit(&mut env, "${null:+alt}").unwrap(), "");
        assert_eq!(lit(&mut env, "${null+alt}").unwrap(), "alt");
    }

    #[test]
    fn assign_default_writes_through() {
        let mut env = MapEnviron::new();
        assert_eq!(lit(&mut env, "${x:=v}").unwrap(), "v");
        assert_eq!(env.get("x").str_value(), Some("v"));
    }

    #[test]
    fn assign_default_respects_read_only() {
        let mut env = MapEnviron::new();
        env.insert(
            "x",
            Variable {
                read_only: true,
                ..Variable::unset()
            },
        );
        let err = lit(&mut env, "${x:=v}").unwrap_err();
        assert!(matches!(err, Error::Assign(_)));
    }

    #[test]
    fn error_if_unset() {
        let mut env = MapEnviron::new();
        let err = lit(&mut env, "${gone:?not here}").unwrap_err();
        match err {
            Error::UnsetParameter { message, .. } => {
                assert_eq!(message, "gone: not here");
            }
            other => panic!("expected UnsetParameter, got {other:?}"),
        }
    }

    #[test]
    fn trims() {
        let mut env = MapEnviron::from_pairs([("p", "a/b/c.rs")]);
        assert_eq!(lit(&mut env, "${p#*/}").unwrap(), "b/c.rs");
        assert_eq!(lit(&mut env, "${p##*/}").unwrap(), "c.rs");
        assert_eq!(lit(&mut env, "${p%.*}").unwrap(), "a/b/c");
        assert_eq!(lit(&mut env, "${p%%/*}").unwrap(), "a");
        // A pattern matching nothing leaves the value alone.
        assert_eq!(lit(&mut env, "${p#zz}").unwrap(), "a/b/c.rs");
    }

    #[test]
    fn replacement() {
        let mut env = MapEnviron::from_pairs([("x", "foo")]);
        assert_eq!(lit(&mut env, "${x//o/a}").unwrap(), "faa");
        assert_eq!(lit(&mut env, "${x/o/a}").unwrap(), "fao");
        assert_eq!(lit(&mut env, "${x/#f/F}").unwrap(), "Foo");
        assert_eq!(lit(&mut env, "${x/%o/O}").unwrap(), "foO");
        assert_eq!(lit(&mut env, "${x/#o/X}").unwrap(), "foo");
        assert_eq!(lit(&mut env, "${x/o}").unwrap(), "fo");
    }

    #[test]
    fn case_modification() {
        let mut env = MapEnviron::from_pairs([("w", "hello World")]);
        assert_eq!(lit(&mut env, "${w^}").unwrap(), "Hello World");
        assert_eq!(lit(&mut env, "${w^^}").unwrap(), "HELLO WORLD");
        assert_eq!(lit(&mut env, "${w,,}").unwrap(), "hello world");
        assert_eq!(lit(&mut env, "${w^^[lo]}").unwrap(), "heLLO WOrLd");
    }

    #[test]
    fn length_counts_code_points() {
        let mut env = MapEnviron::from_pairs([("s", "héllo")]);
        assert_eq!(lit(&mut env, "${#s}").unwrap(), "5");
        let mut env = MapEnviron::new();
        env.insert("a", Variable::indexed(["x", "y", "z"]));
        assert_eq!(lit(&mut env, "${#a[@]}").unwrap(), "3");
        assert_eq!(lit(&mut env, "${#a}").unwrap(), "1");
    }

    #[test]
    fn slicing() {
        let mut env = MapEnviron::from_pairs([("s", "abcdef")]);
        assert_eq!(lit(&mut env, "${s:1:2}").unwrap(), "bc");
        assert_eq!(lit(&mut env, "${s:4}").unwrap(), "ef");
        assert_eq!(lit(&mut env, "${s: -2}").unwrap(), "ef");
        assert_eq!(lit(&mut env, "${s:2:100}").unwrap(), "cdef");
        assert_eq!(lit(&mut env, "${s::2}").unwrap(), "ab");
    }

    #[test]
    fn indirection() {
        let mut env = MapEnviron::from_pairs([("ref", "target"), ("target", "hit")]);
        assert_eq!(lit(&mut env, "${!ref}").unwrap(), "hit");
    }

    #[test]
    fn keys_and_names() {
        let mut env = MapEnviron::new();
        env.insert("a", Variable::indexed(["x", "y"]));
        assert_eq!(lit(&mut env, "${!a[@]}").unwrap(), "0 1");

        let mut env = MapEnviron::from_pairs([("pre_a", "1"), ("pre_b", "2"), ("other", "3")]);
        assert_eq!(lit(&mut env, "${!pre_@}").unwrap(), "pre_a pre_b");
    }

    #[test]
    fn quoting_transformations() {
        let mut env = MapEnviron::from_pairs([("x", "a'b c")]);
        assert_eq!(lit(&mut env, "${x@Q}").unwrap(), r"'a'\''b c'");
        let mut env = MapEnviron::from_pairs([("e", r"a\tb")]);
        assert_eq!(lit(&mut env, "${e@E}").unwrap(), "a\tb");
    }

    #[test]
    fn unimplemented_transformations_are_typed_errors() {
        let mut env = MapEnviron::from_pairs([("x", "v")]);
        let err = lit(&mut env, "${x@P}").unwrap_err();
        assert!(matches!(err, Error::NotImplemented { op } if op == "P"));
    }

    #[test]
    fn positional_parameters() {
        let mut env = MapEnviron::new();
        env.insert("@", Variable::indexed(["one", "two three"]));
        env.insert("IFS", Variable::scalar(":"));
        assert_eq!(lit(&mut env, "$#").unwrap(), "2");
        assert_eq!(lit(&mut env, "${*}").unwrap(), "one:two three");
    }

    #[test]
    fn lineno_comes_from_the_node() {
        let mut env = MapEnviron::new();
        let file = Parser::new(ParserConfig::default())
            .parse_str("x\ny\necho $LINENO", None)
            .unwrap();
        let word = match &file.stmts[2].cmd {
            Some(Command::Call(call)) => call.args[1].clone(),
            other => panic!("expected a call, got {other:?}"),
        };
        let mut cfg = Config::new(&mut env);
        assert_eq!(crate::literal(&mut cfg, &word).unwrap(), "3");
    }
}
