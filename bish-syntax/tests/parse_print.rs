// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Round-trip and position properties over a corpus of programs.

use bish_syntax::parser::{Config, Parser};
use bish_syntax::source::Pos;
use bish_syntax::syntax::{File, Node};
use bish_syntax::walk::{self, NodeRef, Visitor};

const CORPUS: &[&str] = &[
    "echo hello world",
    "a | b | c",
    "a && b || ! c",
    "foo & bar &",
    "x=1 y+=2 cmd arg",
    "a[1+2]=x",
    "a=(1 2 [5]=9)",
    "echo 'single' \"double $x\" $'esc\\n'",
    "echo ${x:-default} ${y:=assign} ${z:?msg} ${w:+alt}",
    "echo ${x#pre} ${x##pre} ${x%suf} ${x%%suf}",
    "echo ${x/o/a} ${x//o/a} ${x/o} ${x^} ${x^^} ${x,} ${x,,}",
    "echo ${#x} ${!x} ${!pre*} ${!pre@} ${x[@]} ${x[i+1]} ${x:1:2} ${x: -1}",
    "echo ${x@Q} ${x@E}",
    "echo $(date) `uptime` $((1 + 2 * 3)) $[1+2]",
    "echo $0 $1 $# $? $- $$ $! $@ $*",
    "diff <(sort a) >(tee log)",
    "echo ?(a|b) *(x) +(y) @(z) !(w)",
    "if a; then b; elif c; then d; else e; fi",
    "while read -r line; do echo \"$line\"; done < file",
    "until x; do y; done",
    "for i in 1 2 3; do echo $i; done",
    "for ((i = 0; i < 10; i++)); do echo $i; done",
    "for x; do echo $x; done",
    "select opt in a b; do break; done",
    "case $x in a) one ;; b | c) two ;& d) three ;;& esac",
    "foo() { bar; }",
    "function baz { qux; }",
    "{ a; b; } > out 2>&1",
    "(a; b) | c",
    "[[ -e file && ! -z $x ]]",
    "[[ $a == $b || $c != $d ]]",
    "[[ $x =~ ^a(b c)*$ ]]",
    "[[ $a < $b && $c -nt $d ]]",
    "let x=1+2 y=x**2",
    "declare -x foo=bar baz",
    "local x=1",
    "export PATH=/bin",
    "readonly a b=2",
    "time -p sleep 1",
    "time a | b",
    "coproc worker { cat; }",
    "eval echo hi",
    "cmd <file >out >>append 2>&1 <&3 <>rw >|clobber &>all &>>allapp",
    "cat <<< \"here string\"",
    "echo \"nested $(cmd \"inner\") done\"",
    "echo \"${arr[@]}\" \"${arr[*]}\"",
    "echo a{b,c}d {1..4} {a..f..2}",
    "! a | b",
];

fn parse(src: &str) -> File {
    Parser::new(Config::default())
        .parse_str(src, None)
        .unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"))
}

/// Compares two files structurally, ignoring positions and the line
/// table, by printing both.
fn assert_same_tree(a: &File, b: &File, src: &str) {
    assert_eq!(a.to_string(), b.to_string(), "round trip diverged for {src:?}");
    assert_eq!(a.stmts.len(), b.stmts.len(), "statement count for {src:?}");
}

#[test]
fn parse_print_round_trip() {
    for src in CORPUS {
        let first = parse(src);
        let printed = first.to_string();
        let second = Parser::new(Config::default())
            .parse_str(&printed, None)
            .unwrap_or_else(|e| panic!("reparse failed for {src:?} -> {printed:?}: {e}"));
        assert_same_tree(&first, &second, src);
    }
}

#[test]
fn heredoc_round_trip() {
    let src = "cat <<EOF\nline $x\nEOF\n";
    let first = parse(src);
    let printed = first.to_string();
    let second = parse(&printed);
    assert_same_tree(&first, &second, src);

    let src = "cat <<-E <<'Q'\n\tbody\n\tE\nraw $x\nQ\n";
    let first = parse(src);
    let second = parse(&first.to_string());
    assert_same_tree(&first, &second, src);
}

/// For any node with children c1..ck, positions are monotonically
/// non-decreasing in source order.
#[test]
fn position_monotonicity() {
    struct Monotonic {
        stack: Vec<(Pos, Pos)>,
        last: Pos,
    }
    impl Monotonic {
        fn check(&mut self, pos: Pos, end: Pos) {
            if !pos.is_valid() || !end.is_valid() {
                return;
            }
            assert!(pos <= end, "node pos {pos} > end {end}");
            if let Some(&(parent_pos, parent_end)) = self.stack.last() {
                assert!(parent_pos <= pos, "child starts before parent");
                assert!(end <= parent_end, "child ends after parent");
            }
        }
    }
    impl<'a> Visitor<'a> for Monotonic {
        fn enter(&mut self, node: NodeRef<'a>) -> bool {
            let (pos, end) = match node {
                NodeRef::File(n) => (n.pos(), n.end()),
                NodeRef::Stmt(n) => (n.pos(), n.end()),
                NodeRef::Assign(n) => (n.pos(), n.end()),
                NodeRef::Redirect(n) => (n.pos(), n.end()),
                NodeRef::Word(n) => (n.pos(), n.end()),
                NodeRef::WordPart(n) => (n.pos(), n.end()),
                NodeRef::ArithmExpr(n) => (n.pos(), n.end()),
                NodeRef::TestExpr(n) => (n.pos(), n.end()),
                NodeRef::Comment(n) => (n.pos(), n.end()),
                NodeRef::CaseItem(_) | NodeRef::ArrayElem(_) => return true,
            };
            self.check(pos, end);
            if pos.is_valid() {
                // Siblings at the same depth come in source order. A
                // here-document body may legitimately sit after its
                // statement, so ordering is only checked within parents.
                self.last = pos;
                self.stack.push((pos, end));
            }
            true
        }
        fn exit(&mut self, node: NodeRef<'a>) {
            let valid = match node {
                NodeRef::File(n) => n.pos().is_valid(),
                NodeRef::Stmt(n) => n.pos().is_valid(),
                NodeRef::Assign(n) => n.pos().is_valid(),
                NodeRef::Redirect(n) => n.pos().is_valid(),
                NodeRef::Word(n) => n.pos().is_valid(),
                NodeRef::WordPart(n) => n.pos().is_valid(),
                NodeRef::ArithmExpr(n) => n.pos().is_valid(),
                NodeRef::TestExpr(n) => n.pos().is_valid(),
                NodeRef::Comment(n) => n.pos().is_valid(),
                NodeRef::CaseItem(_) | NodeRef::ArrayElem(_) => false,
            };
            if valid {
                self.stack.pop();
            }
        }
    }
    for src in CORPUS {
        let file = parse(src);
        let mut v = Monotonic {
            stack: Vec::new(),
            last: Pos::default(),
        };
        walk::walk_file(&mut v, &file);
    }
}

#[test]
fn positions_lie_within_source() {
    for src in CORPUS {
        let file = parse(src);
        struct InBounds(usize);
        impl<'a> Visitor<'a> for InBounds {
            fn enter(&mut self, node: NodeRef<'a>) -> bool {
                if let NodeRef::Word(word) = node {
                    if word.pos().is_valid() {
                        assert!(word.end().offset() <= self.0);
                    }
                }
                true
            }
        }
        walk::walk_file(&mut InBounds(src.len()), &file);
    }
}

#[test]
fn simplifier_is_idempotent_over_corpus() {
    for src in CORPUS {
        let mut file = parse(src);
        bish_syntax::simplify::simplify(&mut file);
        let once = file.to_string();
        bish_syntax::simplify::simplify(&mut file);
        assert_eq!(once, file.to_string(), "simplify not idempotent for {src:?}");
        // The simplified output still parses.
        parse(&once);
    }
}
