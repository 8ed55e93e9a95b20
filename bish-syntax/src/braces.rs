// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Splitting brace expansions out of literals
//!
//! The lexer treats `{a,b}` as ordinary literal text; brace expansion is a
//! separate pass that runs before any other expansion. [`split_braces`]
//! rewrites a word so that well-formed comma lists and `{m..n[..s]}`
//! sequences become [`BraceExp`] parts. Unmatched or malformed braces are
//! left as the literal text they were.

use crate::source::Pos;
use crate::syntax::{BraceExp, Lit, Word, WordPart};

/// One still-open `{` while scanning.
struct Frame {
    lbrace: Pos,
    elems: Vec<Word>,
    cur: Vec<WordPart>,
    commas: usize,
}

impl Frame {
    fn take_elem(&mut self) -> Word {
        let parts = std::mem::take(&mut self.cur);
        if parts.is_empty() {
            Word::new(vec![WordPart::Lit(Lit::synthetic(""))])
        } else {
            Word::new(parts)
        }
    }

    /// Reconstructs the literal text of an unclosed frame.
    fn undo(mut self) -> Vec<WordPart> {
        let mut parts = vec![WordPart::Lit(Lit::new("{", self.lbrace, self.lbrace.advance(1)))];
        for elem in self.elems {
            parts.extend(elem.parts);
            parts.push(WordPart::Lit(Lit::synthetic(",")));
        }
        parts.append(&mut self.cur);
        parts
    }
}

/// Whether a sequence endpoint is a (possibly signed, possibly
/// zero-padded) integer.
fn is_seq_int(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_seq_alpha(s: &str) -> bool {
    s.len() == 1 && s.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
}

/// Interprets a closed frame without commas as a `{x..y[..step]}`
/// sequence, if it has that shape.
fn as_sequence(frame: &Frame) -> Option<Vec<Word>> {
    if frame.commas > 0 || !frame.elems.is_empty() {
        return None;
    }
    let [WordPart::Lit(lit)] = frame.cur.as_slice() else {
        return None;
    };
    let pieces: Vec<&str> = lit.value.split("..").collect();
    if pieces.len() != 2 && pieces.len() != 3 {
        return None;
    }
    let ends_ok = (is_seq_int(pieces[0]) && is_seq_int(pieces[1]))
        || (is_seq_alpha(pieces[0]) && is_seq_alpha(pieces[1]));
    if !ends_ok || (pieces.len() == 3 && !is_seq_int(pieces[2])) {
        return None;
    }
    Some(
        pieces
            .iter()
            .map(|piece| Word::new(vec![WordPart::Lit(Lit::synthetic(*piece))]))
            .collect(),
    )
}

/// Splits brace expansions in a word, returning the rewritten word and
/// whether any [`BraceExp`] part was produced.
#[must_use]
pub fn split_braces(word: &Word) -> (Word, bool) {
    let mut top: Vec<WordPart> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut any = false;

    fn push_part(top: &mut Vec<WordPart>, stack: &mut [Frame], part: WordPart) {
        match stack.last_mut() {
            Some(frame) => frame.cur.push(part),
            None => top.push(part),
        }
    }

    for part in &word.parts {
        let WordPart::Lit(lit) = part else {
            push_part(&mut top, &mut stack, part.clone());
            continue;
        };
        let mut chunk = String::new();
        let mut chunk_start = 0usize;
        let bytes = lit.value.as_bytes();
        let mut i = 0;
        let flush = |chunk: &mut String, chunk_start: usize, i: usize| -> Option<WordPart> {
            if chunk.is_empty() {
                return None;
            }
            let pos = if lit.value_pos.is_valid() {
                lit.value_pos.advance(chunk_start as u32)
            } else {
                Pos::default()
            };
            let end = if lit.value_pos.is_valid() {
                lit.value_pos.advance(i as u32)
            } else {
                Pos::default()
            };
            Some(WordPart::Lit(Lit::new(std::mem::take(chunk), pos, end)))
        };
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    chunk.push('\\');
                    i += 1;
                    if let Some(c) = lit.value[i..].chars().next() {
                        chunk.push(c);
                        i += c.len_utf8();
                    }
                }
                b'{' => {
                    if let Some(part) = flush(&mut chunk, chunk_start, i) {
                        push_part(&mut top, &mut stack, part);
                    }
                    let lbrace = if lit.value_pos.is_valid() {
                        lit.value_pos.advance(i as u32)
                    } else {
                        Pos::default()
                    };
                    stack.push(Frame {
                        lbrace,
                        elems: Vec::new(),
                        cur: Vec::new(),
                        commas: 0,
                    });
                    i += 1;
                    chunk_start = i;
                }
                b',' if !stack.is_empty() => {
                    if let Some(part) = flush(&mut chunk, chunk_start, i) {
                        push_part(&mut top, &mut stack, part);
                    }
                    let frame = stack.last_mut().expect("checked for emptiness");
                    let elem = frame.take_elem();
                    frame.elems.push(elem);
                    frame.commas += 1;
                    i += 1;
                    chunk_start = i;
                }
                b'}' if !stack.is_empty() => {
                    if let Some(part) = flush(&mut chunk, chunk_start, i) {
                        push_part(&mut top, &mut stack, part);
                    }
                    let mut frame = stack.pop().expect("checked for emptiness");
                    let rbrace = if lit.value_pos.is_valid() {
                        lit.value_pos.advance(i as u32)
                    } else {
                        Pos::default()
                    };
                    if let Some(elems) = as_sequence(&frame) {
                        any = true;
                        push_part(
                            &mut top,
                            &mut stack,
                            WordPart::BraceExp(BraceExp {
                                lbrace: frame.lbrace,
                                rbrace,
                                sequence: true,
                                elems,
                            }),
                        );
                    } else if frame.commas > 0 {
                        any = true;
                        let elem = frame.take_elem();
                        frame.elems.push(elem);
                        push_part(
                            &mut top,
                            &mut stack,
                            WordPart::BraceExp(BraceExp {
                                lbrace: frame.lbrace,
                                rbrace,
                                sequence: false,
                                elems: frame.elems,
                            }),
                        );
                    } else {
                        // `{x}` with no comma expands to itself, literally.
                        let mut parts = frame.undo();
                        parts.push(WordPart::Lit(Lit::new("}", rbrace, rbrace.advance(1))));
                        for part in parts {
                            push_part(&mut top, &mut stack, part);
                        }
                    }
                    i += 1;
                    chunk_start = i;
                }
                _ => {
                    let start = i;
                    i += 1;
                    while i < bytes.len() && !matches!(bytes[i], b'\\' | b'{' | b',' | b'}') {
                        i += 1;
                    }
                    chunk.push_str(&lit.value[start..i]);
                }
            }
        }
        if let Some(part) = flush(&mut chunk, chunk_start, i) {
            push_part(&mut top, &mut stack, part);
        }
    }
    // Anything still open turns back into literal text.
    while let Some(frame) = stack.pop() {
        for part in frame.undo() {
            push_part(&mut top, &mut stack, part);
        }
    }
    if top.is_empty() {
        top.push(WordPart::Lit(Lit::synthetic("")));
    }
    (Word::new(top), any)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: &str) -> Word {
        Word::new(vec![WordPart::Lit(Lit::synthetic(value))])
    }

    fn split(value: &str) -> (Word, bool) {
        split_braces(&word(value))
    }

    #[test]
    fn comma_list() {
        let (w, any) = split("a{b,c}d");
        assert!(any);
        assert_eq!(w.to_string(), "a{b,c}d");
        let exp = match &w.parts[1] {
            WordPart::BraceExp(exp) => exp,
            other => panic!("expected a brace expansion, got {other:?}"),
        };
        assert!(!exp.sequence);
        assert_eq!(exp.elems.len(), 2);
    }

    #[test]
    fn numeric_and_alpha_sequences() {
        let (w, any) = split("a{1..4}");
        assert!(any);
        let exp = match &w.parts[1] {
            WordPart::BraceExp(exp) => exp,
            other => panic!("expected a brace expansion, got {other:?}"),
        };
        assert!(exp.sequence);
        assert_eq!(exp.elems.len(), 2);

        let (_, any) = split("{a..f}");
        assert!(any);
        let (_, any) = split("{1..10..2}");
        assert!(any);
        let (_, any) = split("{aa..zz}");
        assert!(!any);
    }

    #[test]
    fn unmatched_braces_stay_literal() {
        let (w, any) = split("a{b,c");
        assert!(!any);
        assert_eq!(w.to_string(), "a{b,c");

        let (w, any) = split("a}b");
        assert!(!any);
        assert_eq!(w.to_string(), "a}b");

        let (w, any) = split("{x}");
        assert!(!any);
        assert_eq!(w.to_string(), "{x}");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let (w, any) = split(r"\{a,b}");
        assert!(!any);
        assert_eq!(w.to_string(), r"\{a,b}");
    }

    #[test]
    fn nested_expansions() {
        let (w, any) = split("{a,{b,c}}");
        assert!(any);
        let exp = match &w.parts[0] {
            WordPart::BraceExp(exp) => exp,
            other => panic!("expected a brace expansion, got {other:?}"),
        };
        assert_eq!(exp.elems.len(), 2);
        assert!(matches!(
            exp.elems[1].parts[0],
            WordPart::BraceExp(ref inner) if inner.elems.len() == 2
        ));
    }
}
