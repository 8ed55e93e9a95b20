// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Brace expansion
//!
//! [`braces`] runs before every other expansion: a word is split into
//! [`BraceExp`](bish_syntax::syntax::BraceExp) nodes and then multiplied
//! out. Comma lists produce Cartesian products; `{m..n[..step]}` ranges
//! count numerically, preserving zero padding at the width of the widest
//! endpoint, and `{a..z[..step]}` ranges step through single ASCII
//! letters. A step of 0 counts as 1, and the step's sign is ignored: the
//! direction always follows the endpoints. Malformed braces were already
//! kept literal by the splitting pass, so they flow through untouched.

use bish_syntax::braces::split_braces;
use bish_syntax::syntax::{Lit, Word, WordPart};
use itertools::Itertools;

/// Runaway guard for pathological ranges like `{1..9999999999}`.
const MAX_RANGE_ITERATIONS: usize = 10000;

/// Expands brace expressions in each word, producing the full list.
#[must_use]
pub fn braces(words: &[Word]) -> Vec<Word> {
    words.iter().flat_map(braces_word).collect()
}

/// Expands brace expressions in one word.
pub(crate) fn braces_word(word: &Word) -> Vec<Word> {
    let (split, any) = split_braces(word);
    if !any {
        return vec![split];
    }
    cartesian(&split.parts)
        .into_iter()
        .map(Word::new)
        .collect()
}

/// Multiplies a part list out over its brace-expansion alternatives.
fn cartesian(parts: &[WordPart]) -> Vec<Vec<WordPart>> {
    let alternative_sets: Vec<Vec<Vec<WordPart>>> = parts
        .iter()
        .map(|part| match part {
            WordPart::BraceExp(exp) if exp.sequence => sequence_words(&exp.elems)
                .into_iter()
                .map(|value| vec![WordPart::Lit(Lit::synthetic(value))])
                .collect(),
            WordPart::BraceExp(exp) => exp
                .elems
                .iter()
                .flat_map(|elem| cartesian(&elem.parts))
                .collect(),
            other => vec![vec![other.clone()]],
        })
        .collect();
    alternative_sets
        .into_iter()
        .multi_cartesian_product()
        .map(|combination| {
            let mut parts: Vec<WordPart> = combination.into_iter().flatten().collect();
            // Words have non-empty parts; an all-brace word with an empty
            // alternative leaves an empty literal behind.
            if parts.is_empty() {
                parts.push(WordPart::Lit(Lit::synthetic("")));
            }
            parts
        })
        .collect()
}

/// The values of a `{x..y[..step]}` sequence. The elements were validated
/// by the splitting pass.
fn sequence_words(elems: &[Word]) -> Vec<String> {
    let Some(start) = elems.first().and_then(Word::lit) else {
        return Vec::new();
    };
    let Some(end) = elems.get(1).and_then(Word::lit) else {
        return Vec::new();
    };
    let step = elems
        .get(2)
        .and_then(Word::lit)
        .and_then(|s| s.parse::<i64>().ok());
    if let (Ok(from), Ok(to)) = (start.parse::<i64>(), end.parse::<i64>()) {
        let width = [start, end]
            .iter()
            .filter(|s| {
                let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
                digits.len() > 1 && digits.starts_with('0')
            })
            .map(|s| s.strip_prefix(['-', '+']).unwrap_or(s).len())
            .max()
            .unwrap_or(0);
        return numeric_range(from, to, step, width);
    }
    let (Some(from), Some(to)) = (single_alpha(start), single_alpha(end)) else {
        return Vec::new();
    };
    alpha_range(from, to, step)
}

fn single_alpha(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next().filter(|c| c.is_ascii_alphabetic())?;
    chars.next().is_none().then_some(c)
}

fn normalize_step(step: Option<i64>) -> i64 {
    match step {
        Some(0) | None => 1,
        Some(s) => s.abs(),
    }
}

fn numeric_range(from: i64, to: i64, step: Option<i64>, pad_width: usize) -> Vec<String> {
    let step = normalize_step(step);
    let format_value = |n: i64| {
        if pad_width > 0 {
            let sign = if n < 0 { "-" } else { "" };
            format!("{sign}{:0>width$}", n.abs(), width = pad_width)
        } else {
            n.to_string()
        }
    };
    let mut out = Vec::new();
    let mut n = from;
    if from <= to {
        while n <= to && out.len() < MAX_RANGE_ITERATIONS {
            out.push(format_value(n));
            n += step;
        }
    } else {
        while n >= to && out.len() < MAX_RANGE_ITERATIONS {
            out.push(format_value(n));
            n -= step;
        }
    }
    out
}

fn alpha_range(from: char, to: char, step: Option<i64>) -> Vec<String> {
    let step = normalize_step(step) as u32;
    let (from, to) = (from as u32, to as u32);
    let mut out = Vec::new();
    let mut c = from;
    if from <= to {
        while c <= to && out.len() < MAX_RANGE_ITERATIONS {
            if let Some(c) = char::from_u32(c) {
                out.push(c.to_string());
            }
            c += step;
        }
    } else {
        while c >= to && out.len() < MAX_RANGE_ITERATIONS {
            if let Some(c) = char::from_u32(c) {
                out.push(c.to_string());
            }
            match c.checked_sub(step) {
                Some(next) => c = next,
                None => break,
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_syntax::parser::{Config, Parser};
    use bish_syntax::syntax::Command;

    fn word(src: &str) -> Word {
        let file = Parser::new(Config::default()).parse_str(src, None).unwrap();
        match file.stmts.into_iter().next().unwrap().cmd {
            Some(Command::Call(mut call)) => call.args.remove(0),
            other => panic!("expected a call, got {other:?}"),
        }
    }

    fn expand(src: &str) -> Vec<String> {
        braces_word(&word(src))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn comma_lists_and_products() {
        assert_eq!(expand("a{b,c}d"), ["abd", "acd"]);
        assert_eq!(expand("{a,b}{1,2}"), ["a1", "a2", "b1", "b2"]);
        assert_eq!(expand("{a,}x"), ["ax", "x"]);
    }

    #[test]
    fn nested_lists() {
        assert_eq!(expand("{a,{b,c}}"), ["a", "b", "c"]);
    }

    #[test]
    fn numeric_ranges() {
        assert_eq!(expand("a{1..4}"), ["a1", "a2", "a3", "a4"]);
        assert_eq!(expand("{4..1}"), ["4", "3", "2", "1"]);
        assert_eq!(expand("{1..10..3}"), ["1", "4", "7", "10"]);
        assert_eq!(expand("{10..1..-3}"), ["10", "7", "4", "1"]);
        assert_eq!(expand("{-2..2}"), ["-2", "-1", "0", "1", "2"]);
    }

    #[test]
    fn zero_padding_uses_widest_endpoint() {
        assert_eq!(expand("{01..3}"), ["01", "02", "03"]);
        assert_eq!(expand("{1..010..4}"), ["001", "005", "009"]);
    }

    #[test]
    fn alphabetic_ranges() {
        assert_eq!(expand("{a..e}"), ["a", "b", "c", "d", "e"]);
        assert_eq!(expand("{e..a..2}"), ["e", "c", "a"]);
    }

    #[test]
    fn malformed_braces_flow_through() {
        assert_eq!(expand("a{1..b}"), ["a{1..b}"]);
        assert_eq!(expand("{x}"), ["{x}"]);
        assert_eq!(expand("a{b,c"), ["a{b,c"]);
    }

    #[test]
    fn expansions_inside_elements_survive() {
        let words = braces_word(&word("{$x,y}"));
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].to_string(), "$x");
        assert_eq!(words[1].to_string(), "y");
    }
}
