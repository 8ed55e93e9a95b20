// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Field splitting on `IFS`
//!
//! After expansion, the pieces of a word are cut into fields. Only text
//! from unquoted expansions splits. Runs of IFS whitespace collapse into
//! one delimiter and are ignored at the edges; each non-whitespace IFS
//! character is its own delimiter, so `a::b` with `IFS=:` yields an empty
//! middle field. A field survives empty only if something quoted
//! contributed to it.

use crate::Piece;

/// One run of text within a field, remembering whether it was quoted so
/// globbing can escape it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FieldPiece {
    pub text: String,
    pub quoted: bool,
}

/// Splits expansion output into fields.
pub(crate) fn split_fields(pieces: &[Piece], ifs: &str) -> Vec<Vec<FieldPiece>> {
    let mut fields: Vec<Vec<FieldPiece>> = Vec::new();
    let mut cur: Option<Vec<FieldPiece>> = None;
    for piece in pieces {
        match piece {
            Piece::Break => {
                fields.push(cur.take().unwrap_or_default());
            }
            Piece::Str {
                text,
                quoted,
                splittable,
            } => {
                if !*splittable || ifs.is_empty() {
                    cur.get_or_insert_with(Vec::new).push(FieldPiece {
                        text: text.clone(),
                        quoted: *quoted,
                    });
                    continue;
                }
                split_text(text, ifs, &mut fields, &mut cur);
            }
        }
    }
    if let Some(field) = cur {
        fields.push(field);
    }
    fields
}

fn is_ifs_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn split_text(
    text: &str,
    ifs: &str,
    fields: &mut Vec<Vec<FieldPiece>>,
    cur: &mut Option<Vec<FieldPiece>>,
) {
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if ifs.contains(c) {
            // One delimiter run: whitespace collapses, and every
            // non-whitespace separator is a boundary of its own.
            let mut nonws = 0usize;
            while let Some(&c) = chars.peek() {
                if !ifs.contains(c) {
                    break;
                }
                if !is_ifs_whitespace(c) {
                    nonws += 1;
                }
                chars.next();
            }
            if nonws == 0 {
                if let Some(field) = cur.take() {
                    fields.push(field);
                }
            } else {
                for _ in 0..nonws {
                    fields.push(cur.take().unwrap_or_default());
                }
            }
        } else {
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if ifs.contains(c) {
                    break;
                }
                run.push(c);
                chars.next();
            }
            cur.get_or_insert_with(Vec::new).push(FieldPiece {
                text: run,
                quoted: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splittable(text: &str) -> Piece {
        Piece::Str {
            text: text.to_string(),
            quoted: false,
            splittable: true,
        }
    }

    fn strings(fields: Vec<Vec<FieldPiece>>) -> Vec<String> {
        fields
            .iter()
            .map(|f| f.iter().map(|p| p.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn whitespace_runs_collapse() {
        let fields = split_fields(&[splittable("  a  b  ")], " \t\n");
        assert_eq!(strings(fields), ["a", "b"]);
    }

    #[test]
    fn non_whitespace_separators_keep_empties() {
        let fields = split_fields(&[splittable("a::b")], ":");
        assert_eq!(strings(fields), ["a", "", "b"]);

        let fields = split_fields(&[splittable(":a")], ":");
        assert_eq!(strings(fields), ["", "a"]);

        let fields = split_fields(&[splittable("a:")], ":");
        assert_eq!(strings(fields), ["a"]);

        let fields = split_fields(&[splittable("a::")], ":");
        assert_eq!(strings(fields), ["a", ""]);
    }

    #[test]
    fn mixed_whitespace_and_separator_is_one_delimiter() {
        let fields = split_fields(&[splittable("a : b")], ": ");
        assert_eq!(strings(fields), ["a", "b"]);

        let fields = split_fields(&[splittable("a : : b")], ": ");
        assert_eq!(strings(fields), ["a", "", "b"]);
    }

    #[test]
    fn quoted_pieces_join_adjacent_fields() {
        let fields = split_fields(
            &[
                splittable("1 2"),
                Piece::Str {
                    text: "3 4".to_string(),
                    quoted: true,
                    splittable: false,
                },
            ],
            " \t\n",
        );
        assert_eq!(strings(fields), ["1", "23 4"]);
    }

    #[test]
    fn quoted_empty_piece_keeps_the_field() {
        let fields = split_fields(
            &[Piece::Str {
                text: String::new(),
                quoted: true,
                splittable: false,
            }],
            " \t\n",
        );
        assert_eq!(strings(fields), [""]);

        // Unquoted empty expansion produces no field at all.
        let fields = split_fields(&[splittable("")], " \t\n");
        assert_eq!(strings(fields), Vec::<String>::new());
    }

    #[test]
    fn breaks_are_hard_boundaries() {
        let fields = split_fields(
            &[
                Piece::Str {
                    text: "a".to_string(),
                    quoted: true,
                    splittable: false,
                },
                Piece::Break,
                Piece::Str {
                    text: String::new(),
                    quoted: true,
                    splittable: false,
                },
            ],
            " \t\n",
        );
        assert_eq!(strings(fields), ["a", ""]);
    }
}
