// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Shell command language abstract syntax trees
//!
//! The root of a parsed program is a [`File`], an ordered sequence of
//! [`Stmt`]s plus the comments and line table accumulated while parsing. A
//! statement wraps one [`Command`] variant together with its variable
//! assignments, redirections, negation, and background flags.
//!
//! Tokens that make up commands may contain quotations and expansions: a
//! [`Word`] is a sequence of [`WordPart`]s, the unit that the expansion
//! engine acts on. Arithmetic and `[[ … ]]` test expressions have their own
//! small hierarchies, [`ArithmExpr`] and [`TestExpr`].
//!
//! Every node reports its source span through the [`Node`] trait. For nodes
//! synthesized after parsing (for example by brace splitting), positions may
//! be the invalid default; valid positions always satisfy `pos() <= end()`.
//!
//! All node types implement [`Display`](std::fmt::Display), printing
//! canonical source that parses back to a structurally equal tree. Printing
//! a [`File`] emits here-document bodies after the newline that ends their
//! statement; printing any smaller node keeps to a single line with bodies
//! omitted.

use crate::source::{LineTable, Pos};
use crate::token::{
    BinAritOp, BinCmdOp, BinTestOp, CaseOp, GlobOp, ParExpOp, ParNamesOp, ProcOp, RedirOp,
    UnAritOp, UnTestOp,
};

mod impl_display;

/// Common capability of all AST nodes: the source span they cover.
pub trait Node {
    /// Position of the first byte of the node.
    fn pos(&self) -> Pos;
    /// Position just past the last byte of the node.
    fn end(&self) -> Pos;
}

/// Program root: an ordered sequence of statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct File {
    /// Name of the source, used in error messages. Usually a file path.
    pub name: Option<String>,
    /// Top-level statements in source order.
    pub stmts: Vec<Stmt>,
    /// Comments in source order; empty unless comment keeping was enabled.
    pub comments: Vec<Comment>,
    /// Cumulative table of line-start offsets.
    pub lines: LineTable,
}

impl Node for File {
    fn pos(&self) -> Pos {
        self.stmts.first().map_or_else(Pos::default, Node::pos)
    }
    fn end(&self) -> Pos {
        self.stmts.last().map_or_else(Pos::default, Node::end)
    }
}

/// A comment, from `#` to the end of the line, excluding the newline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    /// Position of the `#`.
    pub hash: Pos,
    /// Comment text after the `#`.
    pub text: String,
}

impl Node for Comment {
    fn pos(&self) -> Pos {
        self.hash
    }
    fn end(&self) -> Pos {
        self.hash.advance(1 + self.text.len() as u32)
    }
}

/// A statement: one command with its modifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    /// Variable assignments applied to the command's environment.
    pub assigns: Vec<Assign>,
    /// The command itself; absent for a bare assignment or redirection
    /// statement.
    pub cmd: Option<Command>,
    /// Redirections, in source order.
    pub redirs: Vec<Redirect>,
    /// Whether the statement is negated with a leading `!`.
    pub negated: bool,
    /// Whether the statement runs in the background (`&`).
    pub background: bool,
    /// Position of the first byte of the statement.
    pub position: Pos,
    /// Position just past the last byte of the statement.
    pub end_position: Pos,
}

impl Stmt {
    /// A statement covering the given span with everything else empty.
    #[must_use]
    pub fn new(position: Pos, end_position: Pos) -> Self {
        Stmt {
            assigns: Vec::new(),
            cmd: None,
            redirs: Vec::new(),
            negated: false,
            background: false,
            position,
            end_position,
        }
    }
}

impl Node for Stmt {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.end_position
    }
}

/// A variable assignment, possibly subscripted or appending.
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    /// Whether the assignment appends with `+=`.
    pub append: bool,
    /// Whether there is no `=` at all, as in `declare -x foo` or a bare
    /// option word in a declaration command.
    pub naked: bool,
    /// Name being assigned; absent for naked non-name words.
    pub name: Option<Lit>,
    /// Subscript, as in `a[i]=x`.
    pub index: Option<Box<ArithmExpr>>,
    /// Scalar value, if any.
    pub value: Option<Word>,
    /// Array literal value, as in `a=(x y)`.
    pub array: Option<Box<ArrayExpr>>,
}

impl Node for Assign {
    fn pos(&self) -> Pos {
        if let Some(name) = &self.name {
            name.pos()
        } else if let Some(value) = &self.value {
            value.pos()
        } else {
            Pos::default()
        }
    }
    fn end(&self) -> Pos {
        if let Some(array) = &self.array {
            array.end()
        } else if let Some(value) = &self.value {
            value.end()
        } else if let Some(name) = &self.name {
            name.end()
        } else {
            Pos::default()
        }
    }
}

/// Array literal, as in `a=(x [1]=y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayExpr {
    pub lparen: Pos,
    pub rparen: Pos,
    pub elems: Vec<ArrayElem>,
}

impl Node for ArrayExpr {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.advance(1)
    }
}

/// One element of an [`ArrayExpr`], with an optional `[index]=` prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayElem {
    pub index: Option<Box<ArithmExpr>>,
    pub value: Word,
}

impl Node for ArrayElem {
    fn pos(&self) -> Pos {
        match &self.index {
            Some(index) => index.pos(),
            None => self.value.pos(),
        }
    }
    fn end(&self) -> Pos {
        self.value.end()
    }
}

/// A redirection.
#[derive(Clone, Debug, PartialEq)]
pub struct Redirect {
    /// Position of the operator.
    pub op_pos: Pos,
    pub op: RedirOp,
    /// Optional file descriptor (or `{var}` form) preceding the operator.
    pub n: Option<Lit>,
    /// Operand word: target file, here-document delimiter, or here-string.
    pub word: Word,
    /// Here-document body, filled in after the newline that ends the line
    /// the operator appeared on.
    pub hdoc: Option<Word>,
}

impl Node for Redirect {
    fn pos(&self) -> Pos {
        match &self.n {
            Some(n) => n.pos(),
            None => self.op_pos,
        }
    }
    fn end(&self) -> Pos {
        match &self.hdoc {
            Some(hdoc) => hdoc.end(),
            None => self.word.end(),
        }
    }
}

/// The command wrapped by a [`Stmt`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Call(CallExpr),
    Block(Block),
    Subshell(Subshell),
    If(IfClause),
    While(WhileClause),
    For(ForClause),
    Case(CaseClause),
    Binary(Box<BinaryCmd>),
    FuncDecl(FuncDecl),
    Arithm(ArithmCmd),
    Test(TestClause),
    Decl(DeclClause),
    Let(LetClause),
    Eval(EvalClause),
    Coproc(CoprocClause),
    Time(TimeClause),
}

impl Node for Command {
    fn pos(&self) -> Pos {
        match self {
            Command::Call(x) => x.pos(),
            Command::Block(x) => x.pos(),
            Command::Subshell(x) => x.pos(),
            Command::If(x) => x.pos(),
            Command::While(x) => x.pos(),
            Command::For(x) => x.pos(),
            Command::Case(x) => x.pos(),
            Command::Binary(x) => x.pos(),
            Command::FuncDecl(x) => x.pos(),
            Command::Arithm(x) => x.pos(),
            Command::Test(x) => x.pos(),
            Command::Decl(x) => x.pos(),
            Command::Let(x) => x.pos(),
            Command::Eval(x) => x.pos(),
            Command::Coproc(x) => x.pos(),
            Command::Time(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            Command::Call(x) => x.end(),
            Command::Block(x) => x.end(),
            Command::Subshell(x) => x.end(),
            Command::If(x) => x.end(),
            Command::While(x) => x.end(),
            Command::For(x) => x.end(),
            Command::Case(x) => x.end(),
            Command::Binary(x) => x.end(),
            Command::FuncDecl(x) => x.end(),
            Command::Arithm(x) => x.end(),
            Command::Test(x) => x.end(),
            Command::Decl(x) => x.end(),
            Command::Let(x) => x.end(),
            Command::Eval(x) => x.end(),
            Command::Coproc(x) => x.end(),
            Command::Time(x) => x.end(),
        }
    }
}

/// Simple command: a list of argument words.
///
/// The assignments and redirections that may accompany a simple command
/// live on the enclosing [`Stmt`].
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub args: Vec<Word>,
}

impl Node for CallExpr {
    fn pos(&self) -> Pos {
        self.args.first().map_or_else(Pos::default, Node::pos)
    }
    fn end(&self) -> Pos {
        self.args.last().map_or_else(Pos::default, Node::end)
    }
}

/// Brace group: `{ … }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub lbrace: Pos,
    pub rbrace: Pos,
    pub stmts: Vec<Stmt>,
}

impl Node for Block {
    fn pos(&self) -> Pos {
        self.lbrace
    }
    fn end(&self) -> Pos {
        self.rbrace.advance(1)
    }
}

/// Subshell: `( … )`.
#[derive(Clone, Debug, PartialEq)]
pub struct Subshell {
    pub lparen: Pos,
    pub rparen: Pos,
    pub stmts: Vec<Stmt>,
}

impl Node for Subshell {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.advance(1)
    }
}

/// An `if`, `elif`, or `else` clause.
///
/// `elif` chains and final `else` branches are encoded as a nested
/// `IfClause` in [`else_branch`](Self::else_branch); a plain `else` is one
/// with an empty condition.
#[derive(Clone, Debug, PartialEq)]
pub struct IfClause {
    /// Position of `if`, `elif`, or `else`.
    pub position: Pos,
    /// Position of the closing `fi` of the whole clause chain.
    pub fi_pos: Pos,
    /// Condition statements; empty only for a final `else` branch.
    pub cond: Vec<Stmt>,
    /// Body statements.
    pub then_stmts: Vec<Stmt>,
    /// The `elif`/`else` continuation, if any.
    pub else_branch: Option<Box<IfClause>>,
}

impl IfClause {
    /// Whether this is a final `else` branch.
    #[must_use]
    pub fn is_else(&self) -> bool {
        self.cond.is_empty()
    }
}

impl Node for IfClause {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.fi_pos.advance(2)
    }
}

/// A `while` or `until` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct WhileClause {
    pub position: Pos,
    pub done_pos: Pos,
    /// True for `until`, inverting the condition.
    pub until: bool,
    pub cond: Vec<Stmt>,
    pub do_stmts: Vec<Stmt>,
}

impl Node for WhileClause {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.done_pos.advance(4)
    }
}

/// A `for` or `select` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ForClause {
    pub position: Pos,
    pub done_pos: Pos,
    /// True for `select`, reading the choice from standard input.
    pub select: bool,
    pub loop_: Loop,
    pub do_stmts: Vec<Stmt>,
}

impl Node for ForClause {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.done_pos.advance(4)
    }
}

/// The iteration clause of a [`ForClause`].
#[derive(Clone, Debug, PartialEq)]
pub enum Loop {
    /// `for name in words`, or `for name` iterating positional parameters.
    Words(WordIter),
    /// C-style `for ((init; cond; post))`.
    CStyle(CStyleLoop),
}

/// Word iteration: `name in item…`.
#[derive(Clone, Debug, PartialEq)]
pub struct WordIter {
    pub name: Lit,
    /// Position of `in`; invalid when the items list is implicit (`"$@"`).
    pub in_pos: Pos,
    pub items: Vec<Word>,
}

/// C-style loop header: `((init; cond; post))`.
#[derive(Clone, Debug, PartialEq)]
pub struct CStyleLoop {
    pub lparen: Pos,
    pub rparen: Pos,
    pub init: Option<ArithmExpr>,
    pub cond: Option<ArithmExpr>,
    pub post: Option<ArithmExpr>,
}

/// A `case` clause with its pattern lists.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseClause {
    pub case_pos: Pos,
    pub esac_pos: Pos,
    pub word: Word,
    pub items: Vec<CaseItem>,
}

impl Node for CaseClause {
    fn pos(&self) -> Pos {
        self.case_pos
    }
    fn end(&self) -> Pos {
        self.esac_pos.advance(4)
    }
}

/// One `pattern) stmts ;;` alternative inside a `case` clause.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseItem {
    /// Terminating operator: `;;`, `;&`, or `;;&`.
    pub op: CaseOp,
    /// Position of the terminating operator; invalid if implicit before
    /// `esac`.
    pub op_pos: Pos,
    pub patterns: Vec<Word>,
    pub stmts: Vec<Stmt>,
}

/// Two statements joined by `&&`, `||`, `|`, or `|&`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryCmd {
    pub op_pos: Pos,
    pub op: BinCmdOp,
    pub x: Stmt,
    pub y: Stmt,
}

impl Node for BinaryCmd {
    fn pos(&self) -> Pos {
        self.x.pos()
    }
    fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A function declaration, with or without the `function` keyword.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub position: Pos,
    /// Whether the `function` keyword was used.
    pub rsrv_word: bool,
    /// Whether the `()` parentheses were present.
    pub parens: bool,
    pub name: Lit,
    pub body: Box<Stmt>,
}

impl Node for FuncDecl {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.body.end()
    }
}

/// Arithmetic command: `(( expr ))`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmCmd {
    pub left: Pos,
    pub right: Pos,
    pub expr: ArithmExpr,
}

impl Node for ArithmCmd {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(2)
    }
}

/// Test command: `[[ expr ]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TestClause {
    pub left: Pos,
    pub right: Pos,
    pub expr: TestExpr,
}

impl Node for TestClause {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(2)
    }
}

/// Declaration command: `declare`, `local`, `export`, `readonly`,
/// `typeset`, or `nameref`, with assignment or option arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclClause {
    /// The declaring word itself.
    pub variant: Lit,
    pub args: Vec<Assign>,
}

impl Node for DeclClause {
    fn pos(&self) -> Pos {
        self.variant.pos()
    }
    fn end(&self) -> Pos {
        self.args.last().map_or_else(|| self.variant.end(), Node::end)
    }
}

/// Let command: `let expr…`.
#[derive(Clone, Debug, PartialEq)]
pub struct LetClause {
    pub let_pos: Pos,
    pub exprs: Vec<ArithmExpr>,
}

impl Node for LetClause {
    fn pos(&self) -> Pos {
        self.let_pos
    }
    fn end(&self) -> Pos {
        self.exprs
            .last()
            .map_or_else(|| self.let_pos.advance(3), Node::end)
    }
}

/// Eval command: `eval stmt`.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalClause {
    pub eval_pos: Pos,
    pub stmt: Option<Box<Stmt>>,
}

impl Node for EvalClause {
    fn pos(&self) -> Pos {
        self.eval_pos
    }
    fn end(&self) -> Pos {
        self.stmt
            .as_deref()
            .map_or_else(|| self.eval_pos.advance(4), Node::end)
    }
}

/// Coprocess command: `coproc [name] stmt`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoprocClause {
    pub coproc_pos: Pos,
    pub name: Option<Word>,
    pub stmt: Box<Stmt>,
}

impl Node for CoprocClause {
    fn pos(&self) -> Pos {
        self.coproc_pos
    }
    fn end(&self) -> Pos {
        self.stmt.end()
    }
}

/// Timed pipeline: `time [-p] stmt`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeClause {
    pub time_pos: Pos,
    /// Whether the POSIX output format was requested with `-p`.
    pub posix_format: bool,
    pub stmt: Option<Box<Stmt>>,
}

impl Node for TimeClause {
    fn pos(&self) -> Pos {
        self.time_pos
    }
    fn end(&self) -> Pos {
        self.stmt
            .as_deref()
            .map_or_else(|| self.time_pos.advance(4), Node::end)
    }
}

/// A word: the unit that shell expansion operates on.
///
/// A word's parts are never empty; where the grammar allows a missing word,
/// the word itself is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// Creates a word from its parts.
    #[must_use]
    pub fn new(parts: Vec<WordPart>) -> Self {
        debug_assert!(!parts.is_empty());
        Word { parts }
    }

    /// If the word consists of a single unquoted literal, returns its value.
    #[must_use]
    pub fn lit(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Lit(lit)] => Some(&lit.value),
            _ => None,
        }
    }
}

impl Node for Word {
    fn pos(&self) -> Pos {
        self.parts.first().map_or_else(Pos::default, Node::pos)
    }
    fn end(&self) -> Pos {
        self.parts.last().map_or_else(Pos::default, Node::end)
    }
}

/// One piece of a [`Word`].
#[derive(Clone, Debug, PartialEq)]
pub enum WordPart {
    Lit(Lit),
    SglQuoted(SglQuoted),
    DblQuoted(DblQuoted),
    ParamExp(Box<ParamExp>),
    CmdSubst(CmdSubst),
    ArithmExp(ArithmExp),
    ProcSubst(ProcSubst),
    ExtGlob(ExtGlob),
    BraceExp(BraceExp),
}

impl Node for WordPart {
    fn pos(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.pos(),
            WordPart::SglQuoted(x) => x.pos(),
            WordPart::DblQuoted(x) => x.pos(),
            WordPart::ParamExp(x) => x.pos(),
            WordPart::CmdSubst(x) => x.pos(),
            WordPart::ArithmExp(x) => x.pos(),
            WordPart::ProcSubst(x) => x.pos(),
            WordPart::ExtGlob(x) => x.pos(),
            WordPart::BraceExp(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.end(),
            WordPart::SglQuoted(x) => x.end(),
            WordPart::DblQuoted(x) => x.end(),
            WordPart::ParamExp(x) => x.end(),
            WordPart::CmdSubst(x) => x.end(),
            WordPart::ArithmExp(x) => x.end(),
            WordPart::ProcSubst(x) => x.end(),
            WordPart::ExtGlob(x) => x.end(),
            WordPart::BraceExp(x) => x.end(),
        }
    }
}

/// An unquoted literal string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lit {
    pub value_pos: Pos,
    pub value_end: Pos,
    pub value: String,
}

impl Lit {
    /// Creates a literal covering the given span.
    #[must_use]
    pub fn new(value: impl Into<String>, value_pos: Pos, value_end: Pos) -> Self {
        Lit {
            value_pos,
            value_end,
            value: value.into(),
        }
    }

    /// Creates a literal with no source span, for synthesized nodes.
    #[must_use]
    pub fn synthetic(value: impl Into<String>) -> Self {
        Lit::new(value, Pos::default(), Pos::default())
    }
}

impl Node for Lit {
    fn pos(&self) -> Pos {
        self.value_pos
    }
    fn end(&self) -> Pos {
        self.value_end
    }
}

/// A single-quoted string, or a `$'…'` string with C-style escapes.
///
/// The value is stored raw; `$'…'` escape processing happens at expansion
/// time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SglQuoted {
    pub left: Pos,
    pub right: Pos,
    /// Whether the string is of the `$'…'` form.
    pub dollar: bool,
    pub value: String,
}

impl Node for SglQuoted {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(1)
    }
}

/// A double-quoted string, or `$"…"`; recursively contains parts.
#[derive(Clone, Debug, PartialEq)]
pub struct DblQuoted {
    pub left: Pos,
    pub right: Pos,
    /// Whether the string is of the `$"…"` form.
    pub dollar: bool,
    pub parts: Vec<WordPart>,
}

impl Node for DblQuoted {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(1)
    }
}

/// Command substitution: `$(…)` or `` `…` ``.
#[derive(Clone, Debug, PartialEq)]
pub struct CmdSubst {
    pub left: Pos,
    pub right: Pos,
    pub stmts: Vec<Stmt>,
    /// Whether the backquote form was used.
    pub backquotes: bool,
}

impl Node for CmdSubst {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(1)
    }
}

/// Arithmetic expansion: `$((…))` or the legacy `$[…]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmExp {
    pub left: Pos,
    pub right: Pos,
    /// Whether the legacy `$[…]` form was used.
    pub bracket: bool,
    pub expr: ArithmExpr,
}

impl Node for ArithmExp {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.advance(if self.bracket { 1 } else { 2 })
    }
}

/// Process substitution: `<(…)` or `>(…)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcSubst {
    pub op_pos: Pos,
    pub rparen: Pos,
    pub op: ProcOp,
    pub stmts: Vec<Stmt>,
}

impl Node for ProcSubst {
    fn pos(&self) -> Pos {
        self.op_pos
    }
    fn end(&self) -> Pos {
        self.rparen.advance(1)
    }
}

/// Extended glob: `?(…)`, `*(…)`, `+(…)`, `@(…)`, or `!(…)`.
///
/// The pattern is kept as raw text, pipe separators included.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtGlob {
    pub op_pos: Pos,
    pub op: GlobOp,
    pub pattern: Lit,
}

impl Node for ExtGlob {
    fn pos(&self) -> Pos {
        self.op_pos
    }
    fn end(&self) -> Pos {
        self.pattern.end().advance(1)
    }
}

/// A brace expansion node, produced by
/// [`split_braces`](crate::braces::split_braces) after parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct BraceExp {
    pub lbrace: Pos,
    pub rbrace: Pos,
    /// Whether this is a `{x..y}` sequence rather than a comma list.
    pub sequence: bool,
    pub elems: Vec<Word>,
}

impl Node for BraceExp {
    fn pos(&self) -> Pos {
        self.lbrace
    }
    fn end(&self) -> Pos {
        self.rbrace.advance(1)
    }
}

/// A parameter expansion: `$foo` or any `${…}` form.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamExp {
    /// Position of the `$`.
    pub dollar: Pos,
    /// Position of the closing `}`; invalid for the short form.
    pub rbrace: Pos,
    /// Whether the `$foo` short form was used.
    pub short: bool,
    /// Whether the expansion starts with `!`: indirection, keys, or names.
    pub excl: bool,
    /// `${#foo}`: length of the value in code points, or element count.
    pub length: bool,
    /// `${%foo}`: width of the value when displayed.
    pub width: bool,
    pub param: Lit,
    /// Subscript, as in `${a[i]}`; `@` and `*` subscripts are words.
    pub index: Option<Box<ArithmExpr>>,
    /// `${foo:off:len}` substring slice.
    pub slice: Option<Box<Slice>>,
    /// `${foo/pat/repl}` replacement.
    pub repl: Option<Box<Replace>>,
    /// `${!prefix*}` / `${!prefix@}` names mode.
    pub names: Option<ParNamesOp>,
    /// Trailing operator expansion like `${foo:-word}`.
    pub exp: Option<Box<Expansion>>,
}

impl ParamExp {
    /// A short-form `$name` expansion covering the given span.
    #[must_use]
    pub fn short(dollar: Pos, param: Lit) -> Self {
        ParamExp {
            dollar,
            rbrace: Pos::default(),
            short: true,
            excl: false,
            length: false,
            width: false,
            param,
            index: None,
            slice: None,
            repl: None,
            names: None,
            exp: None,
        }
    }

    /// Whether this expansion is `${!name}` indirection, as opposed to the
    /// keys (`${!a[@]}`) and names (`${!prefix@}`) forms that also use `!`.
    #[must_use]
    pub fn is_indirect(&self) -> bool {
        self.excl && self.names.is_none() && self.index.is_none()
    }
}

impl Node for ParamExp {
    fn pos(&self) -> Pos {
        self.dollar
    }
    fn end(&self) -> Pos {
        if self.short {
            self.param.end()
        } else {
            self.rbrace.advance(1)
        }
    }
}

/// The `${foo:off:len}` slice arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub offset: Option<ArithmExpr>,
    pub length: Option<ArithmExpr>,
}

/// The `${foo/pat/repl}` replacement arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Replace {
    /// Whether every match is replaced (`//`).
    pub all: bool,
    pub orig: Option<Word>,
    pub with: Option<Word>,
}

/// A trailing parameter expansion operator with its operand word.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
    pub op: ParExpOp,
    pub word: Option<Word>,
}

/// An arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum ArithmExpr {
    /// Operand: a word, usually a literal name or number.
    Word(Word),
    Unary(Box<UnaryArithm>),
    Binary(Box<BinaryArithm>),
    Paren(Box<ParenArithm>),
}

impl Node for ArithmExpr {
    fn pos(&self) -> Pos {
        match self {
            ArithmExpr::Word(x) => x.pos(),
            ArithmExpr::Unary(x) => x.pos(),
            ArithmExpr::Binary(x) => x.pos(),
            ArithmExpr::Paren(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            ArithmExpr::Word(x) => x.end(),
            ArithmExpr::Unary(x) => x.end(),
            ArithmExpr::Binary(x) => x.end(),
            ArithmExpr::Paren(x) => x.end(),
        }
    }
}

/// A unary arithmetic expression, prefix or postfix.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryArithm {
    pub op_pos: Pos,
    pub op: UnAritOp,
    /// Whether the operator is postfix, as in `x++`.
    pub post: bool,
    pub x: ArithmExpr,
}

impl Node for UnaryArithm {
    fn pos(&self) -> Pos {
        if self.post { self.x.pos() } else { self.op_pos }
    }
    fn end(&self) -> Pos {
        if self.post {
            self.op_pos.advance(self.op.as_str().len() as u32)
        } else {
            self.x.end()
        }
    }
}

/// A binary arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryArithm {
    pub op_pos: Pos,
    pub op: BinAritOp,
    pub x: ArithmExpr,
    pub y: ArithmExpr,
}

impl Node for BinaryArithm {
    fn pos(&self) -> Pos {
        self.x.pos()
    }
    fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A parenthesized arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ParenArithm {
    pub lparen: Pos,
    pub rparen: Pos,
    pub x: ArithmExpr,
}

impl Node for ParenArithm {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.advance(1)
    }
}

/// A `[[ … ]]` test expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TestExpr {
    Word(Word),
    Unary(Box<UnaryTest>),
    Binary(Box<BinaryTest>),
    Paren(Box<ParenTest>),
}

impl Node for TestExpr {
    fn pos(&self) -> Pos {
        match self {
            TestExpr::Word(x) => x.pos(),
            TestExpr::Unary(x) => x.pos(),
            TestExpr::Binary(x) => x.pos(),
            TestExpr::Paren(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            TestExpr::Word(x) => x.end(),
            TestExpr::Unary(x) => x.end(),
            TestExpr::Binary(x) => x.end(),
            TestExpr::Paren(x) => x.end(),
        }
    }
}

/// A unary test expression.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryTest {
    pub op_pos: Pos,
    pub op: UnTestOp,
    pub x: TestExpr,
}

impl Node for UnaryTest {
    fn pos(&self) -> Pos {
        self.op_pos
    }
    fn end(&self) -> Pos {
        self.x.end()
    }
}

/// A binary test expression.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryTest {
    pub op_pos: Pos,
    pub op: BinTestOp,
    pub x: TestExpr,
    pub y: TestExpr,
}

impl Node for BinaryTest {
    fn pos(&self) -> Pos {
        self.x.pos()
    }
    fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A parenthesized test expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ParenTest {
    pub lparen: Pos,
    pub rparen: Pos,
    pub x: TestExpr,
}

impl Node for ParenTest {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.advance(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_lit_helper() {
        let word = Word::new(vec![WordPart::Lit(Lit::synthetic("foo"))]);
        assert_eq!(word.lit(), Some("foo"));

        let word = Word::new(vec![
            WordPart::Lit(Lit::synthetic("foo")),
            WordPart::Lit(Lit::synthetic("bar")),
        ]);
        assert_eq!(word.lit(), None);
    }

    #[test]
    fn positions_propagate_through_wrappers() {
        let pos = Pos::new(2, 1, 3);
        let end = Pos::new(5, 1, 6);
        let word = Word::new(vec![WordPart::Lit(Lit::new("foo", pos, end))]);
        assert_eq!(word.pos(), pos);
        assert_eq!(word.end(), end);

        let call = CallExpr { args: vec![word] };
        assert_eq!(call.pos(), pos);
        assert_eq!(call.end(), end);
    }

    #[test]
    fn indirection_excludes_names_and_keys() {
        let mut exp = ParamExp::short(Pos::default(), Lit::synthetic("x"));
        exp.excl = true;
        assert!(exp.is_indirect());
        exp.names = Some(ParNamesOp::Names);
        assert!(!exp.is_indirect());
    }
}
