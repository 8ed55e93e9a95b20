// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Here-document deferral
//!
//! When a `<<` or `<<-` redirect is parsed, only a [`HeredocSpec`] is
//! remembered. The bodies are read from the input at the newline ending
//! that line, keyed by the operator position, and attached to their
//! [`Redirect`] nodes here once the statement tree is complete.

use crate::source::Pos;
use crate::syntax::*;
use std::collections::HashMap;

/// A here-document whose body is still to be read.
#[derive(Clone, Debug)]
pub(crate) struct HeredocSpec {
    /// Whether leading tabs are stripped from body lines (`<<-`).
    pub strip_tabs: bool,
    /// The delimiter after quote removal.
    pub delim: String,
    /// Whether the body recognizes `$` and `` ` `` expansions; false when
    /// any part of the delimiter was quoted.
    pub expandable: bool,
    /// Position of the redirection operator, also the body's key.
    pub op_pos: Pos,
}

type Bodies = HashMap<usize, Word>;

/// Attaches read bodies to the here-document redirects below `stmts`.
pub(crate) fn patch_stmts(stmts: &mut [Stmt], bodies: &mut Bodies) {
    if bodies.is_empty() {
        return;
    }
    for stmt in stmts {
        patch_stmt(stmt, bodies);
    }
}

fn patch_stmt(stmt: &mut Stmt, bodies: &mut Bodies) {
    for assign in &mut stmt.assigns {
        patch_assign(assign, bodies);
    }
    if let Some(cmd) = &mut stmt.cmd {
        patch_command(cmd, bodies);
    }
    for redir in &mut stmt.redirs {
        patch_redirect(redir, bodies);
    }
}

fn patch_redirect(redir: &mut Redirect, bodies: &mut Bodies) {
    patch_word(&mut redir.word, bodies);
    if redir.op.is_heredoc() && redir.hdoc.is_none() {
        redir.hdoc = bodies.remove(&redir.op_pos.offset());
    }
}

fn patch_assign(assign: &mut Assign, bodies: &mut Bodies) {
    if let Some(index) = &mut assign.index {
        patch_arithm(index, bodies);
    }
    if let Some(value) = &mut assign.value {
        patch_word(value, bodies);
    }
    if let Some(array) = &mut assign.array {
        for elem in &mut array.elems {
            if let Some(index) = &mut elem.index {
                patch_arithm(index, bodies);
            }
            patch_word(&mut elem.value, bodies);
        }
    }
}

fn patch_command(cmd: &mut Command, bodies: &mut Bodies) {
    match cmd {
        Command::Call(call) => {
            for word in &mut call.args {
                patch_word(word, bodies);
            }
        }
        Command::Block(block) => patch_stmts(&mut block.stmts, bodies),
        Command::Subshell(subshell) => patch_stmts(&mut subshell.stmts, bodies),
        Command::If(clause) => patch_if(clause, bodies),
        Command::While(clause) => {
            patch_stmts(&mut clause.cond, bodies);
            patch_stmts(&mut clause.do_stmts, bodies);
        }
        Command::For(clause) => {
            match &mut clause.loop_ {
                Loop::Words(iter) => {
                    for word in &mut iter.items {
                        patch_word(word, bodies);
                    }
                }
                Loop::CStyle(style) => {
                    for expr in [&mut style.init, &mut style.cond, &mut style.post]
                        .into_iter()
                        .flatten()
                    {
                        patch_arithm(expr, bodies);
                    }
                }
            }
            patch_stmts(&mut clause.do_stmts, bodies);
        }
        Command::Case(clause) => {
            patch_word(&mut clause.word, bodies);
            for item in &mut clause.items {
                for pattern in &mut item.patterns {
                    patch_word(pattern, bodies);
                }
                patch_stmts(&mut item.stmts, bodies);
            }
        }
        Command::Binary(binary) => {
            patch_stmt(&mut binary.x, bodies);
            patch_stmt(&mut binary.y, bodies);
        }
        Command::FuncDecl(decl) => patch_stmt(&mut decl.body, bodies),
        Command::Arithm(cmd) => patch_arithm(&mut cmd.expr, bodies),
        Command::Test(clause) => patch_test(&mut clause.expr, bodies),
        Command::Decl(clause) => {
            for arg in &mut clause.args {
                patch_assign(arg, bodies);
            }
        }
        Command::Let(clause) => {
            for expr in &mut clause.exprs {
                patch_arithm(expr, bodies);
            }
        }
        Command::Eval(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                patch_stmt(stmt, bodies);
            }
        }
        Command::Coproc(clause) => {
            if let Some(name) = &mut clause.name {
                patch_word(name, bodies);
            }
            patch_stmt(&mut clause.stmt, bodies);
        }
        Command::Time(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                patch_stmt(stmt, bodies);
            }
        }
    }
}

fn patch_if(clause: &mut IfClause, bodies: &mut Bodies) {
    patch_stmts(&mut clause.cond, bodies);
    patch_stmts(&mut clause.then_stmts, bodies);
    if let Some(else_branch) = &mut clause.else_branch {
        patch_if(else_branch, bodies);
    }
}

fn patch_word(word: &mut Word, bodies: &mut Bodies) {
    for part in &mut word.parts {
        patch_word_part(part, bodies);
    }
}

fn patch_word_part(part: &mut WordPart, bodies: &mut Bodies) {
    match part {
        WordPart::Lit(_) | WordPart::SglQuoted(_) | WordPart::ExtGlob(_) => {}
        WordPart::DblQuoted(dq) => {
            for part in &mut dq.parts {
                patch_word_part(part, bodies);
            }
        }
        WordPart::ParamExp(pe) => {
            if let Some(index) = &mut pe.index {
                patch_arithm(index, bodies);
            }
            if let Some(slice) = &mut pe.slice {
                for expr in [&mut slice.offset, &mut slice.length].into_iter().flatten() {
                    patch_arithm(expr, bodies);
                }
            }
            if let Some(repl) = &mut pe.repl {
                for word in [&mut repl.orig, &mut repl.with].into_iter().flatten() {
                    patch_word(word, bodies);
                }
            }
            if let Some(exp) = &mut pe.exp {
                if let Some(word) = &mut exp.word {
                    patch_word(word, bodies);
                }
            }
        }
        WordPart::CmdSubst(cs) => patch_stmts(&mut cs.stmts, bodies),
        WordPart::ArithmExp(ae) => patch_arithm(&mut ae.expr, bodies),
        WordPart::ProcSubst(ps) => patch_stmts(&mut ps.stmts, bodies),
        WordPart::BraceExp(be) => {
            for word in &mut be.elems {
                patch_word(word, bodies);
            }
        }
    }
}

fn patch_arithm(expr: &mut ArithmExpr, bodies: &mut Bodies) {
    match expr {
        ArithmExpr::Word(word) => patch_word(word, bodies),
        ArithmExpr::Unary(unary) => patch_arithm(&mut unary.x, bodies),
        ArithmExpr::Binary(binary) => {
            patch_arithm(&mut binary.x, bodies);
            patch_arithm(&mut binary.y, bodies);
        }
        ArithmExpr::Paren(paren) => patch_arithm(&mut paren.x, bodies),
    }
}

fn patch_test(expr: &mut TestExpr, bodies: &mut Bodies) {
    match expr {
        TestExpr::Word(word) => patch_word(word, bodies),
        TestExpr::Unary(unary) => patch_test(&mut unary.x, bodies),
        TestExpr::Binary(binary) => {
            patch_test(&mut binary.x, bodies);
            patch_test(&mut binary.y, bodies);
        }
        TestExpr::Paren(paren) => patch_test(&mut paren.x, bodies),
    }
}
