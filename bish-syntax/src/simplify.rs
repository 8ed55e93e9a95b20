// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Safe, structural AST rewrites
//!
//! [`simplify`] applies rewrites that never change what a valid program
//! does:
//!
//! - backquote command substitutions become `$(…)`;
//! - redundant parentheses around arithmetic indices, slice bounds, and
//!   whole arithmetic expressions are dropped;
//! - a subshell that is the sole statement of a `$(…)` is collapsed;
//! - `$((${x}))` and `$(($x))` become `$((x))` for simple names;
//! - `"$var"` operands inside `[[ … ]]` are unquoted where quoting cannot
//!   matter (never on the right of `=~`, and only when the content has no
//!   pattern metacharacters);
//! - double negation in tests collapses, `! -z` and `! -n` swap, and
//!   negated `==` / `!=` comparisons flip;
//! - double-quoted literals with no expansion or quoting characters become
//!   single-quoted.
//!
//! The pass is idempotent: simplifying a second time changes nothing.

use crate::syntax::*;
use crate::token::{BinTestOp, UnTestOp};

/// Simplifies a whole file in place.
pub fn simplify(file: &mut File) {
    for stmt in &mut file.stmts {
        simplify_stmt(stmt);
    }
}

fn simplify_stmt(stmt: &mut Stmt) {
    for assign in &mut stmt.assigns {
        simplify_assign(assign);
    }
    if let Some(cmd) = &mut stmt.cmd {
        simplify_command(cmd);
    }
    for redir in &mut stmt.redirs {
        simplify_word(&mut redir.word);
        if let Some(hdoc) = &mut redir.hdoc {
            simplify_word(hdoc);
        }
    }
}

fn simplify_assign(assign: &mut Assign) {
    if let Some(index) = &mut assign.index {
        unparen(index);
        simplify_arithm(index);
    }
    if let Some(value) = &mut assign.value {
        simplify_word(value);
    }
    if let Some(array) = &mut assign.array {
        for elem in &mut array.elems {
            if let Some(index) = &mut elem.index {
                unparen(index);
                simplify_arithm(index);
            }
            simplify_word(&mut elem.value);
        }
    }
}

fn simplify_stmts(stmts: &mut [Stmt]) {
    for stmt in stmts {
        simplify_stmt(stmt);
    }
}

fn simplify_command(cmd: &mut Command) {
    match cmd {
        Command::Call(call) => {
            for word in &mut call.args {
                simplify_word(word);
            }
        }
        Command::Block(block) => simplify_stmts(&mut block.stmts),
        Command::Subshell(subshell) => simplify_stmts(&mut subshell.stmts),
        Command::If(clause) => simplify_if(clause),
        Command::While(clause) => {
            simplify_stmts(&mut clause.cond);
            simplify_stmts(&mut clause.do_stmts);
        }
        Command::For(clause) => {
            match &mut clause.loop_ {
                Loop::Words(iter) => {
                    for word in &mut iter.items {
                        simplify_word(word);
                    }
                }
                Loop::CStyle(style) => {
                    for expr in [&mut style.init, &mut style.cond, &mut style.post]
                        .into_iter()
                        .flatten()
                    {
                        unparen(expr);
                        simplify_arithm(expr);
                    }
                }
            }
            simplify_stmts(&mut clause.do_stmts);
        }
        Command::Case(clause) => {
            simplify_word(&mut clause.word);
            for item in &mut clause.items {
                for pattern in &mut item.patterns {
                    simplify_word(pattern);
                }
                simplify_stmts(&mut item.stmts);
            }
        }
        Command::Binary(binary) => {
            simplify_stmt(&mut binary.x);
            simplify_stmt(&mut binary.y);
        }
        Command::FuncDecl(decl) => simplify_stmt(&mut decl.body),
        Command::Arithm(arithm) => {
            unparen(&mut arithm.expr);
            simplify_arithm(&mut arithm.expr);
        }
        Command::Test(clause) => simplify_test(&mut clause.expr, false),
        Command::Decl(clause) => {
            for arg in &mut clause.args {
                simplify_assign(arg);
            }
        }
        Command::Let(clause) => {
            for expr in &mut clause.exprs {
                simplify_arithm(expr);
            }
        }
        Command::Eval(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                simplify_stmt(stmt);
            }
        }
        Command::Coproc(clause) => {
            if let Some(name) = &mut clause.name {
                simplify_word(name);
            }
            simplify_stmt(&mut clause.stmt);
        }
        Command::Time(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                simplify_stmt(stmt);
            }
        }
    }
}

fn simplify_if(clause: &mut IfClause) {
    simplify_stmts(&mut clause.cond);
    simplify_stmts(&mut clause.then_stmts);
    if let Some(else_branch) = &mut clause.else_branch {
        simplify_if(else_branch);
    }
}

fn simplify_word(word: &mut Word) {
    for part in &mut word.parts {
        simplify_word_part(part);
    }
}

fn simplify_word_part(part: &mut WordPart) {
    match part {
        WordPart::Lit(_) | WordPart::SglQuoted(_) | WordPart::ExtGlob(_) => {}
        WordPart::DblQuoted(dq) => {
            for part in &mut dq.parts {
                simplify_word_part(part);
            }
        }
        WordPart::ParamExp(pe) => simplify_param_exp(pe),
        WordPart::CmdSubst(cs) => {
            cs.backquotes = false;
            collapse_subshell(cs);
            simplify_stmts(&mut cs.stmts);
        }
        WordPart::ArithmExp(ae) => {
            unparen(&mut ae.expr);
            simplify_arithm(&mut ae.expr);
        }
        WordPart::ProcSubst(ps) => simplify_stmts(&mut ps.stmts),
        WordPart::BraceExp(be) => {
            for word in &mut be.elems {
                simplify_word(word);
            }
        }
    }
    // `"literal"` becomes `'literal'` when nothing in it needs double
    // quotes.
    let mut replacement = None;
    if let WordPart::DblQuoted(dq) = &*part {
        if !dq.dollar {
            if let [WordPart::Lit(lit)] = dq.parts.as_slice() {
                if !lit.value.contains(['$', '`', '\\', '\'', '"']) {
                    replacement = Some(WordPart::SglQuoted(SglQuoted {
                        left: dq.left,
                        right: dq.right,
                        dollar: false,
                        value: lit.value.clone(),
                    }));
                }
            }
        }
    }
    if let Some(replacement) = replacement {
        *part = replacement;
    }
}

fn simplify_param_exp(pe: &mut ParamExp) {
    if let Some(index) = &mut pe.index {
        unparen(index);
        simplify_arithm(index);
    }
    if let Some(slice) = &mut pe.slice {
        for expr in [&mut slice.offset, &mut slice.length].into_iter().flatten() {
            unparen(expr);
            simplify_arithm(expr);
        }
    }
    if let Some(repl) = &mut pe.repl {
        for word in [&mut repl.orig, &mut repl.with].into_iter().flatten() {
            simplify_word(word);
        }
    }
    if let Some(exp) = &mut pe.exp {
        if let Some(word) = &mut exp.word {
            simplify_word(word);
        }
    }
}

/// `$( (x) )` with the subshell as the only statement collapses to
/// `$(x)`.
fn collapse_subshell(cs: &mut CmdSubst) {
    let collapsible = matches!(
        cs.stmts.as_slice(),
        [Stmt {
            cmd: Some(Command::Subshell(_)),
            assigns,
            redirs,
            negated: false,
            background: false,
            ..
        }] if assigns.is_empty() && redirs.is_empty()
    );
    if collapsible {
        let stmt = cs.stmts.pop().expect("matched a one-statement list");
        match stmt.cmd {
            Some(Command::Subshell(subshell)) => cs.stmts = subshell.stmts,
            _ => unreachable!("matched a subshell command"),
        }
    }
}

/// Drops a redundant outer `(…)`.
fn unparen(expr: &mut ArithmExpr) {
    while let ArithmExpr::Paren(paren) = expr {
        let inner = paren.x.clone();
        *expr = inner;
    }
}

fn simplify_arithm(expr: &mut ArithmExpr) {
    match expr {
        ArithmExpr::Word(word) => {
            simplify_word(word);
            // `$((${x}))` and `$(($x))` become `$((x))`.
            if let [WordPart::ParamExp(pe)] = word.parts.as_slice() {
                let plain = !pe.excl
                    && !pe.length
                    && !pe.width
                    && pe.index.is_none()
                    && pe.slice.is_none()
                    && pe.repl.is_none()
                    && pe.names.is_none()
                    && pe.exp.is_none();
                if plain && crate::parser::is_valid_name(&pe.param.value) {
                    let lit = pe.param.clone();
                    word.parts = vec![WordPart::Lit(lit)];
                }
            }
        }
        ArithmExpr::Unary(unary) => simplify_arithm(&mut unary.x),
        ArithmExpr::Binary(binary) => {
            simplify_arithm(&mut binary.x);
            simplify_arithm(&mut binary.y);
        }
        ArithmExpr::Paren(paren) => simplify_arithm(&mut paren.x),
    }
}

/// Whether unquoting this text could change how it matches as a pattern.
fn has_pattern_meta(s: &str) -> bool {
    s.contains(['*', '?', '[', ']', '\\', '(', ')', '|', '{', '}', ' ', '\t'])
}

fn simplify_test(expr: &mut TestExpr, regex_operand: bool) {
    match expr {
        TestExpr::Word(word) => {
            simplify_word(word);
            if !regex_operand {
                unquote_test_word(word);
            }
        }
        TestExpr::Unary(unary) => {
            simplify_test(&mut unary.x, false);
            // Collapses handled one level up, at the wrapping expression.
        }
        TestExpr::Binary(binary) => {
            simplify_test(&mut binary.x, false);
            simplify_test(&mut binary.y, binary.op == BinTestOp::ReMatch);
        }
        TestExpr::Paren(paren) => simplify_test(&mut paren.x, false),
    }
    negation_rewrites(expr);
}

/// `"$x"` → `$x` where the quotes cannot matter: word splitting does not
/// happen inside `[[ … ]]`, so only pattern metacharacters are at stake.
fn unquote_test_word(word: &mut Word) {
    if let [WordPart::DblQuoted(dq)] = word.parts.as_slice() {
        if dq.dollar || dq.parts.len() != 1 {
            return;
        }
        match &dq.parts[0] {
            WordPart::ParamExp(pe)
                if pe.exp.is_none() && pe.repl.is_none() && !pe.length && !pe.excl =>
            {
                word.parts = vec![dq.parts[0].clone()];
            }
            WordPart::Lit(lit) if !has_pattern_meta(&lit.value) && !lit.value.is_empty() => {
                word.parts = vec![dq.parts[0].clone()];
            }
            _ => {}
        }
    }
}

fn negation_rewrites(expr: &mut TestExpr) {
    let replacement = {
        let TestExpr::Unary(unary) = &mut *expr else { return };
        if unary.op != UnTestOp::Not {
            return;
        }
        match &mut unary.x {
            // `! ! x` → `x`
            TestExpr::Unary(inner) if inner.op == UnTestOp::Not => Some(inner.x.clone()),
            // `! -z x` → `-n x`, `! -n x` → `-z x`
            TestExpr::Unary(inner) if inner.op == UnTestOp::EmpStr => {
                inner.op = UnTestOp::NempStr;
                Some(TestExpr::Unary(inner.clone()))
            }
            TestExpr::Unary(inner) if inner.op == UnTestOp::NempStr => {
                inner.op = UnTestOp::EmpStr;
                Some(TestExpr::Unary(inner.clone()))
            }
            // `! a == b` → `a != b` and back
            TestExpr::Binary(inner) if inner.op == BinTestOp::Match => {
                inner.op = BinTestOp::NoMatch;
                Some(TestExpr::Binary(inner.clone()))
            }
            TestExpr::Binary(inner) if inner.op == BinTestOp::NoMatch => {
                inner.op = BinTestOp::Match;
                Some(TestExpr::Binary(inner.clone()))
            }
            _ => None,
        }
    };
    if let Some(replacement) = replacement {
        *expr = replacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Config, Parser};

    fn simplified(src: &str) -> String {
        let mut file = Parser::new(Config::default()).parse_str(src, None).unwrap();
        simplify(&mut file);
        file.to_string().trim_end().to_string()
    }

    #[test]
    fn backquotes_become_dollar_paren() {
        assert_eq!(simplified("echo `date`"), "echo $(date)");
    }

    #[test]
    fn subshell_in_command_substitution_collapses() {
        assert_eq!(simplified("echo $( (x) )"), "echo $(x)");
        // Not when there is more than one statement.
        assert_eq!(simplified("echo $( (x); y )"), "echo $( ( x ); y)");
    }

    #[test]
    fn parens_and_params_in_arithmetic() {
        assert_eq!(simplified("echo $(((1+2)))"), "echo $((1+2))");
        assert_eq!(simplified("echo $((${x}))"), "echo $((x))");
        assert_eq!(simplified("echo $(($x))"), "echo $((x))");
        // Special parameters keep their dollar.
        assert_eq!(simplified("echo $(($#))"), "echo $(($#))");
    }

    #[test]
    fn test_negations() {
        assert_eq!(simplified("[[ ! ! -e f ]]"), "[[ -e f ]]");
        assert_eq!(simplified("[[ ! -z $x ]]"), "[[ -n $x ]]");
        assert_eq!(simplified("[[ ! -n $x ]]"), "[[ -z $x ]]");
        assert_eq!(simplified("[[ ! $a == $b ]]"), "[[ $a != $b ]]");
    }

    #[test]
    fn unquoting_in_tests() {
        assert_eq!(simplified("[[ \"$x\" == y ]]"), "[[ $x == y ]]");
        // The right side of =~ keeps its quotes: they make the match
        // literal.
        assert_eq!(simplified("[[ $x =~ \"$y\" ]]"), "[[ $x =~ \"$y\" ]]");
    }

    #[test]
    fn double_quoted_literals_become_single_quoted() {
        assert_eq!(simplified("echo \"foo bar\""), "echo 'foo bar'");
        assert_eq!(simplified("echo \"f'o\""), "echo \"f'o\"");
        assert_eq!(simplified("echo \"$x\""), "echo \"$x\"");
    }

    #[test]
    fn idempotence() {
        let srcs = [
            "echo `date` $(((1+2))) \"foo\"",
            "[[ ! -z $x && ! $a == $b ]]",
            "echo $( (x) )",
        ];
        for src in srcs {
            let mut file = Parser::new(Config::default()).parse_str(src, None).unwrap();
            simplify(&mut file);
            let once = file.to_string();
            simplify(&mut file);
            assert_eq!(once, file.to_string(), "simplify must be idempotent on {src}");
        }
    }
}
