// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Printing syntax trees back to source code
//!
//! Printing a [`File`] produces a program that parses back to a
//! structurally equal tree: statements are separated by newlines and
//! here-document bodies follow the line their operator appeared on, in FIFO
//! order. Printing any node smaller than a `File` keeps to a single line
//! with here-document bodies omitted.
//!
//! Arithmetic expressions print without interior spaces so that they stay
//! single words inside `let`; a separating space is inserted only where two
//! adjacent operators would otherwise fuse into a longer one (`- -x`, not
//! `--x`).

use super::*;
use crate::walk::{self, NodeRef, Visitor};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter, Write as _};

fn stmts_string(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    for (i, stmt) in stmts.iter().enumerate() {
        if i > 0 {
            out.push_str(if stmts[i - 1].background { " " } else { "; " });
        }
        let _ = write!(out, "{stmt}");
    }
    out
}

/// Closes a statement list before a closing keyword or brace.
fn closed_stmts_string(stmts: &[Stmt]) -> String {
    let mut out = stmts_string(stmts);
    if !stmts.last().is_some_and(|s| s.background) {
        out.push(';');
    }
    out.push(' ');
    out
}

impl Display for File {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            write!(f, "{stmt}")?;
            f.write_char('\n')?;
            for redir in heredocs(stmt) {
                if let Some(hdoc) = &redir.hdoc {
                    write!(f, "{hdoc}")?;
                    writeln!(f, "{}", heredoc_delim(&redir.word))?;
                }
            }
        }
        Ok(())
    }
}

/// Collects the here-document redirects below a statement, in source order.
fn heredocs(stmt: &Stmt) -> Vec<&Redirect> {
    struct Heredocs<'a>(Vec<&'a Redirect>);
    impl<'a> Visitor<'a> for Heredocs<'a> {
        fn enter(&mut self, node: NodeRef<'a>) -> bool {
            if let NodeRef::Redirect(redir) = node {
                if redir.hdoc.is_some() {
                    self.0.push(redir);
                }
            }
            true
        }
    }
    let mut v = Heredocs(Vec::new());
    walk::walk_stmt(&mut v, stmt);
    v.0
}

/// The literal text of a here-document delimiter word, quotes removed.
/// This is the line that terminates the body when the file is printed.
fn heredoc_delim(word: &Word) -> String {
    let mut out = String::new();
    for part in &word.parts {
        match part {
            WordPart::Lit(lit) => {
                let mut chars = lit.value.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        if let Some(next) = chars.next() {
                            out.push(next);
                        }
                    } else {
                        out.push(c);
                    }
                }
            }
            WordPart::SglQuoted(sq) => out.push_str(&sq.value),
            WordPart::DblQuoted(dq) => {
                for part in &dq.parts {
                    if let WordPart::Lit(lit) = part {
                        out.push_str(&lit.value);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("! ")?;
        }
        let mut first = true;
        for assign in &self.assigns {
            if !first {
                f.write_char(' ')?;
            }
            write!(f, "{assign}")?;
            first = false;
        }
        if let Some(cmd) = &self.cmd {
            if !first {
                f.write_char(' ')?;
            }
            write!(f, "{cmd}")?;
            first = false;
        }
        for redir in &self.redirs {
            if !first {
                f.write_char(' ')?;
            }
            write!(f, "{redir}")?;
            first = false;
        }
        if self.background {
            f.write_str(" &")?;
        }
        Ok(())
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(&name.value)?;
            if let Some(index) = &self.index {
                write!(f, "[{index}]")?;
            }
            if self.naked {
                return Ok(());
            }
            f.write_str(if self.append { "+=" } else { "=" })?;
        }
        if let Some(value) = &self.value {
            write!(f, "{value}")?;
        } else if let Some(array) = &self.array {
            write!(f, "{array}")?;
        }
        Ok(())
    }
}

impl Display for ArrayExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (i, elem) in self.elems.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            if let Some(index) = &elem.index {
                write!(f, "[{index}]=")?;
            }
            write!(f, "{}", elem.value)?;
        }
        f.write_char(')')
    }
}

impl Display for Redirect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(n) = &self.n {
            f.write_str(&n.value)?;
        }
        write!(f, "{}{}", self.op, self.word)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::Call(x) => x.fmt(f),
            Command::Block(x) => x.fmt(f),
            Command::Subshell(x) => x.fmt(f),
            Command::If(x) => x.fmt(f),
            Command::While(x) => x.fmt(f),
            Command::For(x) => x.fmt(f),
            Command::Case(x) => x.fmt(f),
            Command::Binary(x) => x.fmt(f),
            Command::FuncDecl(x) => x.fmt(f),
            Command::Arithm(x) => x.fmt(f),
            Command::Test(x) => x.fmt(f),
            Command::Decl(x) => x.fmt(f),
            Command::Let(x) => x.fmt(f),
            Command::Eval(x) => x.fmt(f),
            Command::Coproc(x) => x.fmt(f),
            Command::Time(x) => x.fmt(f),
        }
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.iter().format(" "))
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {}}}", closed_stmts_string(&self.stmts))
    }
}

impl Display for Subshell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "( {} )", stmts_string(&self.stmts))
    }
}

impl Display for IfClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "if {}then {}",
            closed_stmts_string(&self.cond),
            closed_stmts_string(&self.then_stmts),
        )?;
        let mut branch = self.else_branch.as_deref();
        while let Some(clause) = branch {
            if clause.is_else() {
                write!(f, "else {}", closed_stmts_string(&clause.then_stmts))?;
                break;
            }
            write!(
                f,
                "elif {}then {}",
                closed_stmts_string(&clause.cond),
                closed_stmts_string(&clause.then_stmts),
            )?;
            branch = clause.else_branch.as_deref();
        }
        f.write_str("fi")
    }
}

impl Display for WhileClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}do {}done",
            if self.until { "until" } else { "while" },
            closed_stmts_string(&self.cond),
            closed_stmts_string(&self.do_stmts),
        )
    }
}

impl Display for ForClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(if self.select { "select " } else { "for " })?;
        match &self.loop_ {
            Loop::Words(iter) => {
                f.write_str(&iter.name.value)?;
                if iter.in_pos.is_valid() || !iter.items.is_empty() {
                    f.write_str(" in")?;
                    for item in &iter.items {
                        write!(f, " {item}")?;
                    }
                }
            }
            Loop::CStyle(style) => {
                f.write_str("((")?;
                for (i, expr) in [&style.init, &style.cond, &style.post].iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if let Some(expr) = expr {
                        f.write_str(&arithm_string(expr))?;
                    }
                }
                f.write_str("))")?;
            }
        }
        write!(f, "; do {}done", closed_stmts_string(&self.do_stmts))
    }
}

impl Display for CaseClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "case {} in", self.word)?;
        for item in &self.items {
            f.write_char(' ')?;
            for (i, pattern) in item.patterns.iter().enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                write!(f, "{pattern}")?;
            }
            f.write_str(") ")?;
            let body = stmts_string(&item.stmts);
            if !body.is_empty() {
                write!(f, "{body} ")?;
            }
            write!(f, "{}", item.op)?;
        }
        f.write_str(" esac")
    }
}

impl Display for BinaryCmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.op, self.y)
    }
}

impl Display for FuncDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.rsrv_word {
            f.write_str("function ")?;
        }
        f.write_str(&self.name.value)?;
        if self.parens {
            f.write_str("()")?;
        }
        write!(f, " {}", self.body)
    }
}

impl Display for ArithmCmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(({}))", arithm_string(&self.expr))
    }
}

impl Display for TestClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[[ {} ]]", self.expr)
    }
}

impl Display for DeclClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant.value)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl Display for LetClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("let")?;
        for expr in &self.exprs {
            write!(f, " {}", arithm_string(expr))?;
        }
        Ok(())
    }
}

impl Display for EvalClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("eval")?;
        if let Some(stmt) = &self.stmt {
            write!(f, " {stmt}")?;
        }
        Ok(())
    }
}

impl Display for CoprocClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("coproc ")?;
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "{}", self.stmt)
    }
}

impl Display for TimeClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("time")?;
        if self.posix_format {
            f.write_str(" -p")?;
        }
        if let Some(stmt) = &self.stmt {
            write!(f, " {stmt}")?;
        }
        Ok(())
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl Display for WordPart {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WordPart::Lit(x) => x.fmt(f),
            WordPart::SglQuoted(x) => x.fmt(f),
            WordPart::DblQuoted(x) => x.fmt(f),
            WordPart::ParamExp(x) => x.fmt(f),
            WordPart::CmdSubst(x) => x.fmt(f),
            WordPart::ArithmExp(x) => x.fmt(f),
            WordPart::ProcSubst(x) => x.fmt(f),
            WordPart::ExtGlob(x) => x.fmt(f),
            WordPart::BraceExp(x) => x.fmt(f),
        }
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Display for SglQuoted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.dollar {
            f.write_char('$')?;
        }
        write!(f, "'{}'", self.value)
    }
}

impl Display for DblQuoted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.dollar {
            f.write_char('$')?;
        }
        f.write_char('"')?;
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        f.write_char('"')
    }
}

impl Display for CmdSubst {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let list = stmts_string(&self.stmts);
        if self.backquotes {
            write!(f, "`{list}`")
        } else if list.starts_with('(') {
            // Avoid fusing into `$((`.
            write!(f, "$( {list})")
        } else {
            write!(f, "$({list})")
        }
    }
}

impl Display for ArithmExp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.bracket {
            write!(f, "$[{}]", arithm_string(&self.expr))
        } else {
            write!(f, "$(({}))", arithm_string(&self.expr))
        }
    }
}

impl Display for ProcSubst {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{})", self.op, stmts_string(&self.stmts))
    }
}

impl Display for ExtGlob {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{})", self.op, self.pattern.value)
    }
}

impl Display for BraceExp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        let sep = if self.sequence { ".." } else { "," };
        for (i, elem) in self.elems.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{elem}")?;
        }
        f.write_char('}')
    }
}

impl Display for ParamExp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.short {
            return write!(f, "${}", self.param.value);
        }
        f.write_str("${")?;
        if self.excl {
            f.write_char('!')?;
        }
        if self.length {
            f.write_char('#')?;
        }
        if self.width {
            f.write_char('%')?;
        }
        f.write_str(&self.param.value)?;
        if let Some(index) = &self.index {
            write!(f, "[{index}]")?;
        }
        if let Some(names) = &self.names {
            write!(f, "{names}")?;
        }
        if let Some(slice) = &self.slice {
            f.write_char(':')?;
            if let Some(offset) = &slice.offset {
                let s = arithm_string(offset);
                // `${x:-1}` would be a default-value expansion; keep the
                // space that separates a slice from an operator.
                if s.starts_with(['-', '=', '+', '?']) {
                    f.write_char(' ')?;
                }
                f.write_str(&s)?;
            }
            if let Some(length) = &slice.length {
                write!(f, ":{}", arithm_string(length))?;
            }
        }
        if let Some(repl) = &self.repl {
            f.write_char('/')?;
            if repl.all {
                f.write_char('/')?;
            }
            if let Some(orig) = &repl.orig {
                write!(f, "{orig}")?;
            }
            if let Some(with) = &repl.with {
                write!(f, "/{with}")?;
            }
        }
        if let Some(exp) = &self.exp {
            write!(f, "{}", exp.op)?;
            if let Some(word) = &exp.word {
                write!(f, "{word}")?;
            }
        }
        f.write_char('}')
    }
}

impl Display for ArithmExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&arithm_string(self))
    }
}

/// Whether two adjacent characters would fuse into a different operator.
fn fuses(a: char, b: char) -> bool {
    matches!(
        (a, b),
        ('+', '+') | ('-', '-') | ('<', '<') | ('>', '>') | ('&', '&') | ('|', '|') | ('=', '=')
    )
}

fn arithm_string(expr: &ArithmExpr) -> String {
    match expr {
        ArithmExpr::Word(word) => word.to_string(),
        ArithmExpr::Paren(paren) => format!("({})", arithm_string(&paren.x)),
        ArithmExpr::Unary(unary) => {
            let x = arithm_string(&unary.x);
            if unary.post {
                format!("{x}{}", unary.op)
            } else {
                let op = unary.op.as_str();
                let sep = match (op.chars().last(), x.chars().next()) {
                    (Some(a), Some(b)) => fuses(a, b),
                    _ => false,
                };
                if sep {
                    format!("{op} {x}")
                } else {
                    format!("{op}{x}")
                }
            }
        }
        ArithmExpr::Binary(binary) => {
            let x = arithm_string(&binary.x);
            let y = arithm_string(&binary.y);
            let op = binary.op.as_str();
            let mut out = String::with_capacity(x.len() + op.len() + y.len() + 2);
            out.push_str(&x);
            if let (Some(a), Some(b)) = (x.chars().last(), op.chars().next()) {
                if fuses(a, b) {
                    out.push(' ');
                }
            }
            out.push_str(op);
            if let (Some(a), Some(b)) = (op.chars().last(), y.chars().next()) {
                if fuses(a, b) {
                    out.push(' ');
                }
            }
            out.push_str(&y);
            out
        }
    }
}

impl Display for TestExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TestExpr::Word(word) => word.fmt(f),
            TestExpr::Unary(unary) => write!(f, "{} {}", unary.op, unary.x),
            TestExpr::Binary(binary) => {
                write!(f, "{} {} {}", binary.x, binary.op, binary.y)
            }
            TestExpr::Paren(paren) => write!(f, "( {} )", paren.x),
        }
    }
}

impl Display for Comment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{BinAritOp, UnAritOp};

    fn lit_word(value: &str) -> Word {
        Word::new(vec![WordPart::Lit(Lit::synthetic(value))])
    }

    fn arithm_lit(value: &str) -> ArithmExpr {
        ArithmExpr::Word(lit_word(value))
    }

    #[test]
    fn unary_minus_does_not_fuse_into_decrement() {
        let inner = ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos: Pos::default(),
            op: UnAritOp::Minus,
            post: false,
            x: arithm_lit("49"),
        }));
        let outer = ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos: Pos::default(),
            op: UnAritOp::Minus,
            post: false,
            x: inner,
        }));
        assert_eq!(arithm_string(&outer), "- -49");
    }

    #[test]
    fn binary_arithm_prints_unspaced() {
        let expr = ArithmExpr::Binary(Box::new(BinaryArithm {
            op_pos: Pos::default(),
            op: BinAritOp::Add,
            x: arithm_lit("1"),
            y: ArithmExpr::Binary(Box::new(BinaryArithm {
                op_pos: Pos::default(),
                op: BinAritOp::Mul,
                x: arithm_lit("2"),
                y: arithm_lit("3"),
            })),
        }));
        assert_eq!(arithm_string(&expr), "1+2*3");
    }

    #[test]
    fn param_exp_forms() {
        let exp = ParamExp::short(Pos::default(), Lit::synthetic("foo"));
        assert_eq!(exp.to_string(), "$foo");

        let mut exp = ParamExp::short(Pos::default(), Lit::synthetic("x"));
        exp.short = false;
        exp.repl = Some(Box::new(Replace {
            all: true,
            orig: Some(lit_word("o")),
            with: Some(lit_word("a")),
        }));
        assert_eq!(exp.to_string(), "${x//o/a}");
    }
}
