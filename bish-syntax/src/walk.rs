// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Generic pre-order traversal over syntax trees
//!
//! A [`Visitor`] receives every node in source order. The pre-hook
//! [`enter`](Visitor::enter) may return `false` to skip the node's
//! children; the post-hook [`exit`](Visitor::exit) fires after the children
//! regardless.

use crate::syntax::*;

/// Borrowed reference to any node category the walker visits.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    File(&'a File),
    Stmt(&'a Stmt),
    Assign(&'a Assign),
    Redirect(&'a Redirect),
    CaseItem(&'a CaseItem),
    ArrayElem(&'a ArrayElem),
    Word(&'a Word),
    WordPart(&'a WordPart),
    ArithmExpr(&'a ArithmExpr),
    TestExpr(&'a TestExpr),
    Comment(&'a Comment),
}

/// Hooks invoked by the walk functions.
pub trait Visitor<'a> {
    /// Called before a node's children; return `false` to skip them.
    fn enter(&mut self, _node: NodeRef<'a>) -> bool {
        true
    }
    /// Called after a node's children.
    fn exit(&mut self, _node: NodeRef<'a>) {}
}

/// Visits a whole file.
pub fn walk_file<'a, V: Visitor<'a>>(v: &mut V, file: &'a File) {
    if v.enter(NodeRef::File(file)) {
        for comment in &file.comments {
            let node = NodeRef::Comment(comment);
            if v.enter(node) {
                v.exit(node);
            }
        }
        for stmt in &file.stmts {
            walk_stmt(v, stmt);
        }
    }
    v.exit(NodeRef::File(file));
}

/// Visits one statement and everything below it.
pub fn walk_stmt<'a, V: Visitor<'a>>(v: &mut V, stmt: &'a Stmt) {
    let node = NodeRef::Stmt(stmt);
    if v.enter(node) {
        for assign in &stmt.assigns {
            walk_assign(v, assign);
        }
        if let Some(cmd) = &stmt.cmd {
            walk_command(v, cmd);
        }
        for redir in &stmt.redirs {
            walk_redirect(v, redir);
        }
    }
    v.exit(node);
}

fn walk_assign<'a, V: Visitor<'a>>(v: &mut V, assign: &'a Assign) {
    let node = NodeRef::Assign(assign);
    if v.enter(node) {
        if let Some(index) = &assign.index {
            walk_arithm(v, index);
        }
        if let Some(value) = &assign.value {
            walk_word(v, value);
        }
        if let Some(array) = &assign.array {
            for elem in &array.elems {
                let elem_node = NodeRef::ArrayElem(elem);
                if v.enter(elem_node) {
                    if let Some(index) = &elem.index {
                        walk_arithm(v, index);
                    }
                    walk_word(v, &elem.value);
                }
                v.exit(elem_node);
            }
        }
    }
    v.exit(node);
}

fn walk_redirect<'a, V: Visitor<'a>>(v: &mut V, redir: &'a Redirect) {
    let node = NodeRef::Redirect(redir);
    if v.enter(node) {
        walk_word(v, &redir.word);
        if let Some(hdoc) = &redir.hdoc {
            walk_word(v, hdoc);
        }
    }
    v.exit(node);
}

fn walk_stmts<'a, V: Visitor<'a>>(v: &mut V, stmts: &'a [Stmt]) {
    for stmt in stmts {
        walk_stmt(v, stmt);
    }
}

fn walk_command<'a, V: Visitor<'a>>(v: &mut V, cmd: &'a Command) {
    match cmd {
        Command::Call(call) => {
            for word in &call.args {
                walk_word(v, word);
            }
        }
        Command::Block(block) => walk_stmts(v, &block.stmts),
        Command::Subshell(subshell) => walk_stmts(v, &subshell.stmts),
        Command::If(clause) => walk_if(v, clause),
        Command::While(clause) => {
            walk_stmts(v, &clause.cond);
            walk_stmts(v, &clause.do_stmts);
        }
        Command::For(clause) => {
            match &clause.loop_ {
                Loop::Words(iter) => {
                    for word in &iter.items {
                        walk_word(v, word);
                    }
                }
                Loop::CStyle(style) => {
                    for expr in [&style.init, &style.cond, &style.post].into_iter().flatten() {
                        walk_arithm(v, expr);
                    }
                }
            }
            walk_stmts(v, &clause.do_stmts);
        }
        Command::Case(clause) => {
            walk_word(v, &clause.word);
            for item in &clause.items {
                let node = NodeRef::CaseItem(item);
                if v.enter(node) {
                    for pattern in &item.patterns {
                        walk_word(v, pattern);
                    }
                    walk_stmts(v, &item.stmts);
                }
                v.exit(node);
            }
        }
        Command::Binary(binary) => {
            walk_stmt(v, &binary.x);
            walk_stmt(v, &binary.y);
        }
        Command::FuncDecl(decl) => walk_stmt(v, &decl.body),
        Command::Arithm(cmd) => walk_arithm(v, &cmd.expr),
        Command::Test(clause) => walk_test(v, &clause.expr),
        Command::Decl(clause) => {
            for arg in &clause.args {
                walk_assign(v, arg);
            }
        }
        Command::Let(clause) => {
            for expr in &clause.exprs {
                walk_arithm(v, expr);
            }
        }
        Command::Eval(clause) => {
            if let Some(stmt) = &clause.stmt {
                walk_stmt(v, stmt);
            }
        }
        Command::Coproc(clause) => {
            if let Some(name) = &clause.name {
                walk_word(v, name);
            }
            walk_stmt(v, &clause.stmt);
        }
        Command::Time(clause) => {
            if let Some(stmt) = &clause.stmt {
                walk_stmt(v, stmt);
            }
        }
    }
}

fn walk_if<'a, V: Visitor<'a>>(v: &mut V, clause: &'a IfClause) {
    walk_stmts(v, &clause.cond);
    walk_stmts(v, &clause.then_stmts);
    if let Some(else_branch) = &clause.else_branch {
        walk_if(v, else_branch);
    }
}

/// Visits one word and its parts.
pub fn walk_word<'a, V: Visitor<'a>>(v: &mut V, word: &'a Word) {
    let node = NodeRef::Word(word);
    if v.enter(node) {
        for part in &word.parts {
            walk_word_part(v, part);
        }
    }
    v.exit(node);
}

fn walk_word_part<'a, V: Visitor<'a>>(v: &mut V, part: &'a WordPart) {
    let node = NodeRef::WordPart(part);
    if v.enter(node) {
        match part {
            WordPart::Lit(_) | WordPart::SglQuoted(_) | WordPart::ExtGlob(_) => {}
            WordPart::DblQuoted(dq) => {
                for part in &dq.parts {
                    walk_word_part(v, part);
                }
            }
            WordPart::ParamExp(pe) => {
                if let Some(index) = &pe.index {
                    walk_arithm(v, index);
                }
                if let Some(slice) = &pe.slice {
                    for expr in [&slice.offset, &slice.length].into_iter().flatten() {
                        walk_arithm(v, expr);
                    }
                }
                if let Some(repl) = &pe.repl {
                    for word in [&repl.orig, &repl.with].into_iter().flatten() {
                        walk_word(v, word);
                    }
                }
                if let Some(exp) = &pe.exp {
                    if let Some(word) = &exp.word {
                        walk_word(v, word);
                    }
                }
            }
            WordPart::CmdSubst(cs) => walk_stmts(v, &cs.stmts),
            WordPart::ArithmExp(ae) => walk_arithm(v, &ae.expr),
            WordPart::ProcSubst(ps) => walk_stmts(v, &ps.stmts),
            WordPart::BraceExp(be) => {
                for word in &be.elems {
                    walk_word(v, word);
                }
            }
        }
    }
    v.exit(node);
}

/// Visits one arithmetic expression.
pub fn walk_arithm<'a, V: Visitor<'a>>(v: &mut V, expr: &'a ArithmExpr) {
    let node = NodeRef::ArithmExpr(expr);
    if v.enter(node) {
        match expr {
            ArithmExpr::Word(word) => walk_word(v, word),
            ArithmExpr::Unary(unary) => walk_arithm(v, &unary.x),
            ArithmExpr::Binary(binary) => {
                walk_arithm(v, &binary.x);
                walk_arithm(v, &binary.y);
            }
            ArithmExpr::Paren(paren) => walk_arithm(v, &paren.x),
        }
    }
    v.exit(node);
}

/// Visits one test expression.
pub fn walk_test<'a, V: Visitor<'a>>(v: &mut V, expr: &'a TestExpr) {
    let node = NodeRef::TestExpr(expr);
    if v.enter(node) {
        match expr {
            TestExpr::Word(word) => walk_word(v, word),
            TestExpr::Unary(unary) => walk_test(v, &unary.x),
            TestExpr::Binary(binary) => {
                walk_test(v, &binary.x);
                walk_test(v, &binary.y);
            }
            TestExpr::Paren(paren) => walk_test(v, &paren.x),
        }
    }
    v.exit(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Pos;

    struct Collect {
        names: Vec<&'static str>,
        skip_words: bool,
    }

    impl<'a> Visitor<'a> for Collect {
        fn enter(&mut self, node: NodeRef<'a>) -> bool {
            let name = match node {
                NodeRef::File(_) => "file",
                NodeRef::Stmt(_) => "stmt",
                NodeRef::Assign(_) => "assign",
                NodeRef::Redirect(_) => "redirect",
                NodeRef::CaseItem(_) => "case-item",
                NodeRef::ArrayElem(_) => "array-elem",
                NodeRef::Word(_) => "word",
                NodeRef::WordPart(_) => "word-part",
                NodeRef::ArithmExpr(_) => "arithm",
                NodeRef::TestExpr(_) => "test",
                NodeRef::Comment(_) => "comment",
            };
            self.names.push(name);
            !(self.skip_words && name == "word")
        }
    }

    fn stmt_with_word(value: &str) -> Stmt {
        let mut stmt = Stmt::new(Pos::default(), Pos::default());
        stmt.cmd = Some(Command::Call(CallExpr {
            args: vec![Word::new(vec![WordPart::Lit(Lit::synthetic(value))])],
        }));
        stmt
    }

    #[test]
    fn visits_in_source_order() {
        let mut v = Collect {
            names: Vec::new(),
            skip_words: false,
        };
        walk_stmt(&mut v, &stmt_with_word("foo"));
        assert_eq!(v.names, ["stmt", "word", "word-part"]);
    }

    #[test]
    fn pre_hook_skips_children() {
        let mut v = Collect {
            names: Vec::new(),
            skip_words: true,
        };
        walk_stmt(&mut v, &stmt_with_word("foo"));
        assert_eq!(v.names, ["stmt", "word"]);
    }
}
