// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! The recursive-descent parser
//!
//! [`Parser`] turns source text into a [`File`]. Parsing combines the
//! token stream from the [lexer](crate::lexer) with position-sensitive
//! reserved-word recognition: a literal like `fi` is only a reserved word
//! when it appears as a `LitWord` at a command-start position, and the
//! Bash-only keywords are plain words under [`LangVariant::Posix`].
//!
//! Here-documents are deferred: when a `<<` or `<<-` redirect is parsed,
//! only the delimiter is remembered. The bodies are read at the newline
//! that ends the line, in FIFO order of declaration, and attached to their
//! redirects once the statement tree is complete.
//!
//! ```
//! use bish_syntax::parser::{Config, Parser};
//! let parser = Parser::new(Config::default());
//! let file = parser.parse_str("echo hello | wc -c", None).unwrap();
//! assert_eq!(file.stmts.len(), 1);
//! ```

use crate::lexer::{Lexer, QuoteState};
use crate::source::{LangVariant, Pos, SyntaxError};
use crate::syntax::*;
use crate::token::{self, BinCmdOp, CaseOp, Token};
use std::collections::HashMap;
use std::io::Read;

mod expr;
mod heredoc;
mod word;

pub(crate) use heredoc::HeredocSpec;
pub(crate) use word::is_valid_name;

/// Options configuring a [`Parser`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// The shell dialect to accept.
    pub variant: LangVariant,
    /// Whether to record comments in the resulting [`File`].
    pub keep_comments: bool,
    /// A reserved word at which to stop parsing the top level.
    pub stop_at: Option<String>,
    /// Maximum number of errors to recover from in
    /// [`Parser::parse_recover`]; zero stops at the first error.
    pub recover_errors: u32,
}

/// A reusable shell parser.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    cfg: Config,
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn new(cfg: Config) -> Self {
        Parser { cfg }
    }

    /// Parses a whole program from a reader.
    ///
    /// The input is read to the end first; invalid UTF-8 is replaced, and
    /// read errors are reported as a [`SyntaxError`] without a position.
    pub fn parse(&self, mut reader: impl Read, name: Option<&str>) -> Result<File, SyntaxError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| SyntaxError {
            filename: name.map(str::to_string),
            pos: Pos::default(),
            message: e.to_string(),
        })?;
        self.parse_str(&String::from_utf8_lossy(&bytes), name)
    }

    /// Parses a whole program from a string.
    pub fn parse_str(&self, src: &str, name: Option<&str>) -> Result<File, SyntaxError> {
        let mut run = Run::new(&self.cfg, src, name, 0);
        run.parse_program().map_err(|e| run.first_error(e))
    }

    /// Parses a program, recovering from up to
    /// [`recover_errors`](Config::recover_errors) syntax errors by skipping
    /// to the next statement terminator. Returns the partially populated
    /// file together with all recorded errors.
    pub fn parse_recover(&self, src: &str, name: Option<&str>) -> (File, Vec<SyntaxError>) {
        let mut run = Run::new(&self.cfg, src, name, self.cfg.recover_errors);
        match run.parse_program() {
            Ok(file) => (file, std::mem::take(&mut run.errors)),
            Err(e) => {
                let mut errors = std::mem::take(&mut run.errors);
                errors.push(e);
                (File::default(), errors)
            }
        }
    }

    /// Parses the whole input as a single word with here-document-body
    /// semantics: no quoting context, with `$` and `` ` `` expansions.
    pub fn document(&self, src: &str) -> Result<Word, SyntaxError> {
        let mut run = Run::new(&self.cfg, src, None, 0);
        run.parse_document()
    }

    /// Streams whitespace-separated words, calling `f` for each one; the
    /// callback returns whether to continue.
    pub fn words(
        &self,
        src: &str,
        mut f: impl FnMut(Word) -> bool,
    ) -> Result<(), SyntaxError> {
        let mut run = Run::new(&self.cfg, src, None, 0);
        run.next()?;
        loop {
            while run.lex.tok == Token::Newl {
                run.next()?;
            }
            if run.lex.tok == Token::Eof {
                return Ok(());
            }
            if !run.starts_word() {
                return run.err(run.lex.pos, format!("{} is not a valid word", run.lex.tok));
            }
            let word = run.get_word()?;
            if !f(word) {
                return Ok(());
            }
        }
    }
}

/// Incremental parser driver for a read-eval-print loop.
///
/// Source is fed in line by line; [`feed`](Self::feed) returns the
/// statements of each complete top-level group, and
/// [`incomplete`](Self::incomplete) reports whether the input so far ends
/// inside an unfinished construct, so the caller can print a continuation
/// prompt.
#[derive(Clone, Debug, Default)]
pub struct Interactive {
    cfg: Config,
    buf: String,
    incomplete: bool,
}

impl Interactive {
    /// Creates an interactive driver with the given configuration.
    #[must_use]
    pub fn new(cfg: Config) -> Self {
        Interactive {
            cfg,
            buf: String::new(),
            incomplete: false,
        }
    }

    /// Adds more source text, usually one line.
    ///
    /// Returns the statements of the buffered input once it forms a
    /// complete program, or an empty vector while it remains incomplete.
    /// A hard syntax error clears the buffer and is returned.
    pub fn feed(&mut self, src: &str) -> Result<Vec<Stmt>, SyntaxError> {
        self.buf.push_str(src);
        let mut run = Run::new(&self.cfg, &self.buf, None, 0);
        match run.parse_program() {
            Ok(file) => {
                self.buf.clear();
                self.incomplete = false;
                Ok(file.stmts)
            }
            Err(e) => {
                if run.incomplete {
                    self.incomplete = true;
                    Ok(Vec::new())
                } else {
                    self.buf.clear();
                    self.incomplete = false;
                    Err(e)
                }
            }
        }
    }

    /// Whether the input fed so far ends mid-statement.
    #[must_use]
    pub fn incomplete(&self) -> bool {
        self.incomplete
    }
}

type PResult<T> = Result<T, SyntaxError>;

/// One parsing pass over a source string.
pub(crate) struct Run<'a, 'c> {
    cfg: &'c Config,
    pub(crate) lex: Lexer<'a>,
    filename: Option<String>,
    pub(crate) pending_heredocs: Vec<HeredocSpec>,
    pub(crate) bodies: HashMap<usize, Word>,
    errors: Vec<SyntaxError>,
    recover: u32,
    /// Whether the failure happened at the end of input, meaning more
    /// input could complete the program.
    incomplete: bool,
    /// Whether arithmetic parsing is in `let` mode, where whitespace ends
    /// an expression.
    pub(crate) arith_let: bool,
}

impl<'a, 'c> Run<'a, 'c> {
    fn new(cfg: &'c Config, src: &'a str, name: Option<&str>, recover: u32) -> Self {
        Run {
            cfg,
            lex: Lexer::new(src, cfg.variant, cfg.keep_comments),
            filename: name.map(str::to_string),
            pending_heredocs: Vec::new(),
            bodies: HashMap::new(),
            errors: Vec::new(),
            recover,
            incomplete: false,
            arith_let: false,
        }
    }

    /// When recovery is active the returned error may not be the first one
    /// recorded; prefer the earliest.
    fn first_error(&mut self, last: SyntaxError) -> SyntaxError {
        self.errors.drain(..).next().unwrap_or(last)
    }

    pub(crate) fn err<T>(&mut self, pos: Pos, message: impl Into<String>) -> PResult<T> {
        if self.lex.tok == Token::Eof || self.lex.peek().is_none() {
            self.incomplete = true;
        }
        Err(SyntaxError {
            filename: self.filename.clone(),
            pos,
            message: message.into(),
        })
    }

    /// Attaches the file name to an error coming out of the lexer.
    pub(crate) fn lex_err<T>(&mut self, e: SyntaxError) -> PResult<T> {
        if self.lex.peek().is_none() {
            self.incomplete = true;
        }
        Err(SyntaxError {
            filename: self.filename.clone(),
            ..e
        })
    }

    /// Advances one token, reading pending here-document bodies when the
    /// newline ending their line is reached.
    pub(crate) fn next(&mut self) -> PResult<()> {
        self.lex.next();
        if self.lex.tok == Token::Newl && !self.pending_heredocs.is_empty() {
            self.read_pending_heredocs()?;
        }
        Ok(())
    }

    fn got(&mut self, tok: Token) -> PResult<bool> {
        if self.lex.tok == tok {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whether the current token is the reserved word `word`.
    pub(crate) fn val_is(&self, word: &str) -> bool {
        self.lex.tok == Token::LitWord && self.lex.val == word
    }

    fn got_word(&mut self, word: &str) -> PResult<bool> {
        if self.val_is(word) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn skip_newlines(&mut self) -> PResult<()> {
        while self.lex.tok == Token::Newl {
            self.next()?;
        }
        Ok(())
    }

    /// Whether the current token is the configured stop word. `$$` is
    /// special-cased since it lexes as an expansion, not a literal.
    fn hit_stop_at(&self) -> bool {
        match self.cfg.stop_at.as_deref() {
            None => false,
            Some("$$") => self.lex.tok == Token::Dollar && self.lex.peek() == Some(b'$'),
            Some(word) => self.lex.tok == Token::LitWord && self.lex.val == word,
        }
    }

    fn parse_program(&mut self) -> PResult<File> {
        self.next()?;
        let stmts = self.stmt_list(&[], &[])?;
        if self.lex.tok != Token::Eof && !self.hit_stop_at() {
            return self.err(self.lex.pos, format!("unexpected token {}", self.lex.tok));
        }
        let mut file = File {
            name: self.filename.clone(),
            stmts,
            comments: std::mem::take(&mut self.lex.comments),
            lines: std::mem::take(&mut self.lex.lines),
        };
        file.comments.sort_by_key(|c| c.hash);
        heredoc::patch_stmts(&mut file.stmts, &mut self.bodies);
        Ok(file)
    }

    fn parse_document(&mut self) -> PResult<Word> {
        self.lex.quote = QuoteState::HdocBody;
        self.read_heredoc_body(false, None, true, Pos::default())
    }

    /// Parses statements until one of the stop words (as a reserved word
    /// at command start), one of the stop tokens, or the end of input.
    fn stmt_list(&mut self, stop_words: &[&str], stop_toks: &[Token]) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines()?;
            let tok = self.lex.tok;
            if tok == Token::Eof || stop_toks.contains(&tok) {
                break;
            }
            if self.hit_stop_at()
                || (tok == Token::LitWord && stop_words.contains(&self.lex.val.as_str()))
            {
                break;
            }
            if matches!(
                tok,
                Token::Semicolon | Token::DblSemicolon | Token::SemiAnd | Token::DblSemiAnd
            ) {
                return self.err(
                    self.lex.pos,
                    format!("{tok} can only immediately follow a statement"),
                );
            }
            match self.get_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) if (self.errors.len() as u32) < self.recover => {
                    self.errors.push(e);
                    self.lex.quote = QuoteState::Normal;
                    self.pending_heredocs.clear();
                    while !matches!(
                        self.lex.tok,
                        Token::Eof | Token::Newl | Token::Semicolon
                    ) {
                        self.lex.next();
                    }
                    continue;
                }
                Err(e) => return Err(e),
            }
            match self.lex.tok {
                Token::Semicolon | Token::Newl => self.next()?,
                _ => {
                    let tok = self.lex.tok;
                    if tok == Token::Eof
                        || stop_toks.contains(&tok)
                        || (tok == Token::LitWord && stop_words.contains(&self.lex.val.as_str()))
                        || self.hit_stop_at()
                    {
                        continue;
                    }
                    return self.err(
                        self.lex.pos,
                        format!("{tok} can only be used to separate or close statements"),
                    );
                }
            }
        }
        Ok(stmts)
    }

    /// One full statement: pipelines joined by `&&`/`||`, plus a trailing
    /// `&`.
    fn get_stmt(&mut self) -> PResult<Stmt> {
        let mut stmt = self.get_and_or()?;
        if self.lex.tok == Token::And {
            stmt.background = true;
            stmt.end_position = self.lex.pos.advance(1);
            self.next()?;
        }
        Ok(stmt)
    }

    fn get_and_or(&mut self) -> PResult<Stmt> {
        let mut x = self.get_pipeline()?;
        loop {
            let op = match self.lex.tok {
                Token::AndAnd => BinCmdOp::AndStmt,
                Token::OrOr => BinCmdOp::OrStmt,
                _ => return Ok(x),
            };
            let op_pos = self.lex.pos;
            self.next()?;
            self.skip_newlines()?;
            let y = self.get_pipeline()?;
            x = binary_stmt(op, op_pos, x, y);
        }
    }

    fn get_pipeline(&mut self) -> PResult<Stmt> {
        let negated = if self.val_is("!") {
            self.next()?;
            true
        } else {
            false
        };
        let mut x = self.get_cmd_stmt()?;
        loop {
            let op = match self.lex.tok {
                Token::Or => BinCmdOp::Pipe,
                Token::OrAnd => BinCmdOp::PipeAll,
                _ => break,
            };
            let op_pos = self.lex.pos;
            self.next()?;
            self.skip_newlines()?;
            let y = self.get_cmd_stmt()?;
            x = binary_stmt(op, op_pos, x, y);
        }
        x.negated = negated;
        Ok(x)
    }

    /// One command with its assignment and redirection modifiers; the unit
    /// joined by pipes.
    fn get_cmd_stmt(&mut self) -> PResult<Stmt> {
        let pos = self.lex.pos;
        let mut stmt = Stmt::new(pos, pos);
        // Assignment and redirection prefixes.
        loop {
            if self.peek_redirect() {
                let redir = self.redirect()?;
                stmt.redirs.push(redir);
            } else if matches!(self.lex.tok, Token::Lit | Token::LitWord)
                && word::is_assign_start(&self.lex.val)
            {
                let assign = self.get_assign()?;
                stmt.assigns.push(assign);
            } else {
                break;
            }
        }
        let plain = stmt.assigns.is_empty() && stmt.redirs.is_empty();
        match self.lex.tok {
            Token::LitWord if plain && token::is_keyword(&self.lex.val, self.cfg.variant) => {
                let cmd = self.keyword_command()?;
                stmt.cmd = Some(cmd);
                while self.peek_redirect() {
                    let redir = self.redirect()?;
                    stmt.redirs.push(redir);
                }
            }
            Token::LeftParen if plain => {
                let cmd = Command::Subshell(self.subshell()?);
                stmt.cmd = Some(cmd);
                while self.peek_redirect() {
                    let redir = self.redirect()?;
                    stmt.redirs.push(redir);
                }
            }
            Token::DblLeftParen if plain => {
                let cmd = Command::Arithm(self.arithm_cmd()?);
                stmt.cmd = Some(cmd);
                while self.peek_redirect() {
                    let redir = self.redirect()?;
                    stmt.redirs.push(redir);
                }
            }
            _ if self.starts_word() => {
                let first = self.get_word()?;
                if plain && self.lex.tok == Token::LeftParen && first.lit().is_some() {
                    let cmd = self.func_decl_shorthand(first)?;
                    stmt.cmd = Some(Command::FuncDecl(cmd));
                    while self.peek_redirect() {
                        let redir = self.redirect()?;
                        stmt.redirs.push(redir);
                    }
                } else {
                    self.call_expr(&mut stmt, Some(first))?;
                }
            }
            _ => {
                if stmt.assigns.is_empty() && stmt.redirs.is_empty() {
                    return self.err(
                        self.lex.pos,
                        format!("{} is not a valid start of a statement", self.lex.tok),
                    );
                }
            }
        }
        stmt.end_position = stmt
            .redirs
            .last()
            .map(Node::end)
            .into_iter()
            .chain(stmt.cmd.as_ref().map(Node::end))
            .chain(stmt.assigns.last().map(Node::end))
            .max()
            .unwrap_or(pos);
        Ok(stmt)
    }

    fn call_expr(&mut self, stmt: &mut Stmt, first: Option<Word>) -> PResult<()> {
        let mut args: Vec<Word> = first.into_iter().collect();
        loop {
            if self.peek_redirect() {
                let redir = self.redirect()?;
                stmt.redirs.push(redir);
            } else if self.starts_word() {
                let word = self.get_word()?;
                args.push(word);
            } else {
                break;
            }
        }
        stmt.cmd = Some(Command::Call(CallExpr { args }));
        Ok(())
    }

    /// Dispatch for a reserved word in command position.
    fn keyword_command(&mut self) -> PResult<Command> {
        match self.lex.val.as_str() {
            "if" => self.if_clause().map(Command::If),
            "while" => self.while_clause(false).map(Command::While),
            "until" => self.while_clause(true).map(Command::While),
            "for" => self.for_clause(false).map(Command::For),
            "select" => self.for_clause(true).map(Command::For),
            "case" => self.case_clause().map(Command::Case),
            "{" => self.block().map(Command::Block),
            "[[" => self.test_clause().map(Command::Test),
            "function" => self.func_decl_keyword().map(Command::FuncDecl),
            "time" => self.time_clause().map(Command::Time),
            "coproc" => self.coproc_clause().map(Command::Coproc),
            "let" => self.let_clause().map(Command::Let),
            "eval" => self.eval_clause().map(Command::Eval),
            "declare" | "local" | "export" | "readonly" | "typeset" | "nameref" => {
                self.decl_clause().map(Command::Decl)
            }
            "then" | "elif" | "else" | "fi" => {
                let (pos, val) = (self.lex.pos, self.lex.val.clone());
                self.err(pos, format!("{val:?} can only be used in an if clause"))
            }
            "do" | "done" => {
                let (pos, val) = (self.lex.pos, self.lex.val.clone());
                self.err(pos, format!("{val:?} can only be used in a loop"))
            }
            "!" => self.err(self.lex.pos, "statements can only be negated once"),
            "esac" => self.err(self.lex.pos, "\"esac\" can only be used to end a case clause"),
            "in" => self.err(self.lex.pos, "\"in\" can only be used in a for or case clause"),
            "]]" => self.err(self.lex.pos, "\"]]\" can only be used to close a test clause"),
            "}" => self.err(self.lex.pos, "\"}\" can only be used to close a block"),
            other => {
                let (pos, other) = (self.lex.pos, other.to_string());
                self.err(pos, format!("unexpected keyword {other:?}"))
            }
        }
    }

    fn block(&mut self) -> PResult<Block> {
        let lbrace = self.lex.pos;
        self.next()?;
        let stmts = self.stmt_list(&["}"], &[])?;
        if !self.val_is("}") {
            return self.err(lbrace, "reached EOF without matching { with }");
        }
        let rbrace = self.lex.pos;
        self.next()?;
        Ok(Block {
            lbrace,
            rbrace,
            stmts,
        })
    }

    fn subshell(&mut self) -> PResult<Subshell> {
        let lparen = self.lex.pos;
        self.next()?;
        let stmts = self.stmt_list(&[], &[Token::RightParen])?;
        if self.lex.tok != Token::RightParen {
            return self.err(lparen, "reached EOF without matching ( with )");
        }
        let rparen = self.lex.pos;
        self.next()?;
        Ok(Subshell {
            lparen,
            rparen,
            stmts,
        })
    }

    fn if_clause(&mut self) -> PResult<IfClause> {
        let position = self.lex.pos;
        self.next()?;
        let cond = self.stmt_list(&["then"], &[])?;
        if cond.is_empty() {
            return self.err(position, "\"if\" must be followed by a statement list");
        }
        if !self.got_word("then")? {
            return self.err(position, "\"if\" must be followed by \"then\"");
        }
        let then_stmts = self.stmt_list(&["elif", "else", "fi"], &[])?;
        let mut clause = IfClause {
            position,
            fi_pos: Pos::default(),
            cond,
            then_stmts,
            else_branch: None,
        };
        let mut tail: Vec<IfClause> = Vec::new();
        loop {
            if self.val_is("elif") {
                let elif_pos = self.lex.pos;
                self.next()?;
                let cond = self.stmt_list(&["then"], &[])?;
                if !self.got_word("then")? {
                    return self.err(elif_pos, "\"elif\" must be followed by \"then\"");
                }
                let then_stmts =
                    self.stmt_list(&["elif", "else", "fi"], &[])?;
                tail.push(IfClause {
                    position: elif_pos,
                    fi_pos: Pos::default(),
                    cond,
                    then_stmts,
                    else_branch: None,
                });
            } else if self.val_is("else") {
                let else_pos = self.lex.pos;
                self.next()?;
                let then_stmts = self.stmt_list(&["fi"], &[])?;
                tail.push(IfClause {
                    position: else_pos,
                    fi_pos: Pos::default(),
                    cond: Vec::new(),
                    then_stmts,
                    else_branch: None,
                });
                break;
            } else {
                break;
            }
        }
        if !self.val_is("fi") {
            return self.err(position, "reached EOF without matching \"if\" with \"fi\"");
        }
        let fi_pos = self.lex.pos;
        self.next()?;
        // Fold the elif/else chain, sharing the final fi.
        let mut else_branch = None;
        for mut branch in tail.into_iter().rev() {
            branch.fi_pos = fi_pos;
            branch.else_branch = else_branch;
            else_branch = Some(Box::new(branch));
        }
        clause.fi_pos = fi_pos;
        clause.else_branch = else_branch;
        Ok(clause)
    }

    fn while_clause(&mut self, until: bool) -> PResult<WhileClause> {
        let position = self.lex.pos;
        let name = if until { "until" } else { "while" };
        self.next()?;
        let cond = self.stmt_list(&["do"], &[])?;
        if cond.is_empty() {
            return self.err(position, format!("{name:?} must be followed by a statement list"));
        }
        if !self.got_word("do")? {
            return self.err(position, format!("{name:?} must be followed by \"do\""));
        }
        let do_stmts = self.stmt_list(&["done"], &[])?;
        if !self.val_is("done") {
            return self.err(
                position,
                format!("reached EOF without matching {name:?} with \"done\""),
            );
        }
        let done_pos = self.lex.pos;
        self.next()?;
        Ok(WhileClause {
            position,
            done_pos,
            until,
            cond,
            do_stmts,
        })
    }

    fn for_clause(&mut self, select: bool) -> PResult<ForClause> {
        let position = self.lex.pos;
        let name = if select { "select" } else { "for" };
        self.next()?;
        let loop_ = if self.lex.tok == Token::DblLeftParen && !select {
            Loop::CStyle(self.c_style_loop()?)
        } else {
            if self.lex.tok != Token::LitWord || !word::is_valid_name(&self.lex.val) {
                return self.err(
                    self.lex.pos,
                    format!("{name:?} must be followed by a literal name"),
                );
            }
            let name_lit = Lit::new(self.lex.val.clone(), self.lex.pos, self.lex.cur_pos());
            self.next()?;
            let _ = self.got(Token::Semicolon)?;
            self.skip_newlines()?;
            let mut iter = WordIter {
                name: name_lit,
                in_pos: Pos::default(),
                items: Vec::new(),
            };
            if self.val_is("in") {
                iter.in_pos = self.lex.pos;
                self.next()?;
                while self.starts_word() {
                    let item = self.get_word()?;
                    iter.items.push(item);
                }
                if !matches!(self.lex.tok, Token::Semicolon | Token::Newl | Token::Eof) {
                    return self.err(
                        self.lex.pos,
                        "word list can only be followed by ; or a newline",
                    );
                }
                let _ = self.got(Token::Semicolon)?;
            }
            Loop::Words(iter)
        };
        self.skip_newlines()?;
        if !self.got_word("do")? {
            return self.err(position, format!("{name:?} must be followed by \"do\""));
        }
        let do_stmts = self.stmt_list(&["done"], &[])?;
        if !self.val_is("done") {
            return self.err(
                position,
                format!("reached EOF without matching {name:?} with \"done\""),
            );
        }
        let done_pos = self.lex.pos;
        self.next()?;
        Ok(ForClause {
            position,
            done_pos,
            select,
            loop_,
            do_stmts,
        })
    }

    fn c_style_loop(&mut self) -> PResult<CStyleLoop> {
        let lparen = self.lex.pos;
        let saved = self.lex.quote;
        self.lex.quote = QuoteState::ArithmExprCmd;
        self.next()?;
        let init = if self.lex.tok == Token::Semicolon {
            None
        } else {
            Some(self.arithm_expr(0)?)
        };
        if !self.got(Token::Semicolon)? {
            return self.err(lparen, "C-style loop headers must contain two semicolons");
        }
        let cond = if self.lex.tok == Token::Semicolon {
            None
        } else {
            Some(self.arithm_expr(0)?)
        };
        if !self.got(Token::Semicolon)? {
            return self.err(lparen, "C-style loop headers must contain two semicolons");
        }
        let post = if self.lex.tok == Token::RightParen {
            None
        } else {
            Some(self.arithm_expr(0)?)
        };
        if self.lex.tok != Token::RightParen || self.lex.peek() != Some(b')') {
            return self.err(lparen, "reached EOF without matching (( with ))");
        }
        let rparen = self.lex.pos;
        self.lex.bump_byte();
        self.lex.quote = saved;
        self.next()?;
        let _ = self.got(Token::Semicolon)?;
        Ok(CStyleLoop {
            lparen,
            rparen,
            init,
            cond,
            post,
        })
    }

    fn case_clause(&mut self) -> PResult<CaseClause> {
        let case_pos = self.lex.pos;
        self.next()?;
        if !self.starts_word() {
            return self.err(case_pos, "\"case\" must be followed by a word");
        }
        let word = self.get_word()?;
        self.skip_newlines()?;
        if !self.got_word("in")? {
            return self.err(case_pos, "\"case\" must be followed by \"in\"");
        }
        let mut items = Vec::new();
        let esac_pos = loop {
            self.skip_newlines()?;
            if self.val_is("esac") {
                break self.lex.pos;
            }
            if self.lex.tok == Token::Eof {
                return self.err(
                    case_pos,
                    "reached EOF without matching \"case\" with \"esac\"",
                );
            }
            let saved = self.lex.quote;
            self.lex.quote = QuoteState::SwitchCase;
            let _ = self.got(Token::LeftParen)?;
            let mut patterns = Vec::new();
            loop {
                if !self.starts_word() {
                    self.lex.quote = saved;
                    return self.err(self.lex.pos, "case patterns must consist of words");
                }
                let pattern = self.get_word()?;
                patterns.push(pattern);
                if !self.got(Token::Or)? {
                    break;
                }
            }
            self.lex.quote = saved;
            if self.lex.tok != Token::RightParen {
                return self.err(self.lex.pos, "case patterns must be followed by )");
            }
            self.next()?;
            let stmts = self.stmt_list(
                &["esac"],
                &[Token::DblSemicolon, Token::SemiAnd, Token::DblSemiAnd],
            )?;
            let (op, op_pos) = match self.lex.tok {
                Token::DblSemicolon => (CaseOp::Break, self.lex.pos),
                Token::SemiAnd => (CaseOp::Fallthrough, self.lex.pos),
                Token::DblSemiAnd => (CaseOp::Resume, self.lex.pos),
                _ => (CaseOp::Break, Pos::default()),
            };
            if op_pos.is_valid() {
                self.next()?;
            }
            items.push(CaseItem {
                op,
                op_pos,
                patterns,
                stmts,
            });
        };
        self.next()?;
        Ok(CaseClause {
            case_pos,
            esac_pos,
            word,
            items,
        })
    }

    fn arithm_cmd(&mut self) -> PResult<ArithmCmd> {
        let left = self.lex.pos;
        let saved = self.lex.quote;
        self.lex.quote = QuoteState::ArithmExprCmd;
        self.next()?;
        let expr = self.arithm_expr(0)?;
        if self.lex.tok != Token::RightParen || self.lex.peek() != Some(b')') {
            return self.err(left, "reached EOF without matching (( with ))");
        }
        let right = self.lex.pos;
        self.lex.bump_byte();
        self.lex.quote = saved;
        self.next()?;
        Ok(ArithmCmd { left, right, expr })
    }

    fn func_decl_shorthand(&mut self, name_word: Word) -> PResult<FuncDecl> {
        let name_lit = match name_word.parts.into_iter().next() {
            Some(WordPart::Lit(lit)) => lit,
            _ => unreachable!("checked by the caller"),
        };
        let position = name_lit.pos();
        self.next()?; // (
        if self.lex.tok != Token::RightParen {
            return self.err(position, "( must be followed by ) in a function declaration");
        }
        self.next()?;
        self.skip_newlines()?;
        let body = self.get_cmd_stmt()?;
        Ok(FuncDecl {
            position,
            rsrv_word: false,
            parens: true,
            name: name_lit,
            body: Box::new(body),
        })
    }

    fn func_decl_keyword(&mut self) -> PResult<FuncDecl> {
        let position = self.lex.pos;
        self.next()?;
        if !matches!(self.lex.tok, Token::Lit | Token::LitWord) {
            return self.err(position, "\"function\" must be followed by a name");
        }
        let name = Lit::new(self.lex.val.clone(), self.lex.pos, self.lex.cur_pos());
        self.next()?;
        let mut parens = false;
        if self.lex.tok == Token::LeftParen {
            self.next()?;
            if self.lex.tok != Token::RightParen {
                return self.err(position, "( must be followed by ) in a function declaration");
            }
            self.next()?;
            parens = true;
        }
        self.skip_newlines()?;
        let body = self.get_cmd_stmt()?;
        Ok(FuncDecl {
            position,
            rsrv_word: true,
            parens,
            name,
            body: Box::new(body),
        })
    }

    fn time_clause(&mut self) -> PResult<TimeClause> {
        let time_pos = self.lex.pos;
        self.next()?;
        let mut posix_format = false;
        if self.val_is("-p") {
            posix_format = true;
            self.next()?;
        }
        let stmt = if self.starts_stmt() {
            Some(Box::new(self.get_pipeline()?))
        } else {
            None
        };
        Ok(TimeClause {
            time_pos,
            posix_format,
            stmt,
        })
    }

    fn coproc_clause(&mut self) -> PResult<CoprocClause> {
        let coproc_pos = self.lex.pos;
        self.next()?;
        if self.lex.tok == Token::LitWord && !token::is_keyword(&self.lex.val, self.cfg.variant) {
            let word = self.get_word()?;
            if self.val_is("{") {
                let stmt = self.get_cmd_stmt()?;
                return Ok(CoprocClause {
                    coproc_pos,
                    name: Some(word),
                    stmt: Box::new(stmt),
                });
            }
            // Not a name after all: the word begins the coprocess command.
            let mut stmt = Stmt::new(word.pos(), word.end());
            self.call_expr(&mut stmt, Some(word))?;
            stmt.end_position = stmt
                .redirs
                .last()
                .map(Node::end)
                .into_iter()
                .chain(stmt.cmd.as_ref().map(Node::end))
                .max()
                .unwrap_or(stmt.position);
            return Ok(CoprocClause {
                coproc_pos,
                name: None,
                stmt: Box::new(stmt),
            });
        }
        if !self.starts_stmt() {
            return self.err(coproc_pos, "\"coproc\" must be followed by a statement");
        }
        let stmt = self.get_cmd_stmt()?;
        Ok(CoprocClause {
            coproc_pos,
            name: None,
            stmt: Box::new(stmt),
        })
    }

    fn eval_clause(&mut self) -> PResult<EvalClause> {
        let eval_pos = self.lex.pos;
        self.next()?;
        let stmt = if self.starts_stmt() {
            Some(Box::new(self.get_cmd_stmt()?))
        } else {
            None
        };
        Ok(EvalClause { eval_pos, stmt })
    }

    fn let_clause(&mut self) -> PResult<LetClause> {
        let let_pos = self.lex.pos;
        let saved = self.lex.quote;
        self.lex.quote = QuoteState::ArithmExpr;
        self.arith_let = true;
        let result = self.let_exprs(let_pos);
        self.arith_let = false;
        self.lex.quote = saved;
        result
    }

    fn let_exprs(&mut self, let_pos: Pos) -> PResult<LetClause> {
        self.next()?;
        let mut exprs = Vec::new();
        loop {
            match self.lex.tok {
                Token::Newl
                | Token::Semicolon
                | Token::Eof
                | Token::And
                | Token::AndAnd
                | Token::Or
                | Token::OrOr
                | Token::RightParen
                | Token::RdrOut
                | Token::AppOut
                | Token::RdrIn => break,
                _ => {}
            }
            let expr = self.arithm_expr(0)?;
            exprs.push(expr);
        }
        if exprs.is_empty() {
            return self.err(let_pos, "\"let\" must be followed by an expression");
        }
        Ok(LetClause { let_pos, exprs })
    }

    fn decl_clause(&mut self) -> PResult<DeclClause> {
        let variant = Lit::new(self.lex.val.clone(), self.lex.pos, self.lex.cur_pos());
        self.next()?;
        let mut args = Vec::new();
        loop {
            if matches!(self.lex.tok, Token::Lit | Token::LitWord)
                && word::is_assign_start(&self.lex.val)
            {
                let assign = self.get_assign()?;
                args.push(assign);
            } else if self.starts_word() {
                let word = self.get_word()?;
                let assign = match word.lit().filter(|v| word::is_valid_name(v)) {
                    Some(_) => {
                        let lit = match &word.parts[0] {
                            WordPart::Lit(lit) => lit.clone(),
                            _ => unreachable!(),
                        };
                        Assign {
                            append: false,
                            naked: true,
                            name: Some(lit),
                            index: None,
                            value: None,
                            array: None,
                        }
                    }
                    None => Assign {
                        append: false,
                        naked: true,
                        name: None,
                        index: None,
                        value: Some(word),
                        array: None,
                    },
                };
                args.push(assign);
            } else {
                break;
            }
        }
        Ok(DeclClause { variant, args })
    }

    /// Whether the current token can begin a statement.
    fn starts_stmt(&self) -> bool {
        self.starts_word()
            || matches!(
                self.lex.tok,
                Token::LeftParen | Token::DblLeftParen
            )
            || self.peek_redirect()
    }
}

fn binary_stmt(op: BinCmdOp, op_pos: Pos, x: Stmt, y: Stmt) -> Stmt {
    let mut stmt = Stmt::new(x.pos(), y.end());
    stmt.cmd = Some(Command::Binary(Box::new(BinaryCmd { op_pos, op, x, y })));
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(src: &str) -> File {
        Parser::new(Config::default()).parse_str(src, None).unwrap()
    }

    fn parse_err(src: &str) -> SyntaxError {
        Parser::new(Config::default())
            .parse_str(src, None)
            .unwrap_err()
    }

    #[test]
    fn simple_command() {
        let file = parse("echo hello world");
        assert_eq!(file.stmts.len(), 1);
        let call = assert_matches!(
            &file.stmts[0].cmd,
            Some(Command::Call(call)) => call
        );
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args[0].lit(), Some("echo"));
    }

    #[test]
    fn pipeline_and_list() {
        let file = parse("a | b && c");
        let binary = assert_matches!(
            &file.stmts[0].cmd,
            Some(Command::Binary(binary)) => binary
        );
        assert_eq!(binary.op, BinCmdOp::AndStmt);
        let pipe = assert_matches!(
            &binary.x.cmd,
            Some(Command::Binary(binary)) => binary
        );
        assert_eq!(pipe.op, BinCmdOp::Pipe);
    }

    #[test]
    fn negation_and_background() {
        let file = parse("! foo &");
        assert!(file.stmts[0].negated);
        assert!(file.stmts[0].background);
    }

    #[test]
    fn if_clause_with_elif_and_else() {
        let file = parse("if a; then b; elif c; then d; else e; fi");
        let clause = assert_matches!(
            &file.stmts[0].cmd,
            Some(Command::If(clause)) => clause
        );
        assert_eq!(clause.cond.len(), 1);
        let elif = clause.else_branch.as_deref().unwrap();
        assert!(!elif.is_else());
        let else_branch = elif.else_branch.as_deref().unwrap();
        assert!(else_branch.is_else());
        assert_eq!(elif.fi_pos, clause.fi_pos);
    }

    #[test]
    fn while_and_until() {
        let file = parse("while a; do b; done\nuntil c; do d; done");
        let w = assert_matches!(&file.stmts[0].cmd, Some(Command::While(w)) => w);
        assert!(!w.until);
        let u = assert_matches!(&file.stmts[1].cmd, Some(Command::While(w)) => w);
        assert!(u.until);
    }

    #[test]
    fn for_word_iteration() {
        let file = parse("for x in a b c; do echo $x; done");
        let f = assert_matches!(&file.stmts[0].cmd, Some(Command::For(f)) => f);
        let iter = assert_matches!(&f.loop_, Loop::Words(iter) => iter);
        assert_eq!(iter.name.value, "x");
        assert_eq!(iter.items.len(), 3);
    }

    #[test]
    fn c_style_for() {
        let file = parse("for ((i = 0; i < 5; i++)); do echo $i; done");
        let f = assert_matches!(&file.stmts[0].cmd, Some(Command::For(f)) => f);
        let style = assert_matches!(&f.loop_, Loop::CStyle(c) => c);
        assert!(style.init.is_some() && style.cond.is_some() && style.post.is_some());
    }

    #[test]
    fn case_clause_terminators() {
        let file = parse("case $x in a) e ;; b | c) f ;& d) g ;;& esac");
        let case = assert_matches!(&file.stmts[0].cmd, Some(Command::Case(c)) => c);
        assert_eq!(case.items.len(), 3);
        assert_eq!(case.items[0].op, CaseOp::Break);
        assert_eq!(case.items[1].op, CaseOp::Fallthrough);
        assert_eq!(case.items[1].patterns.len(), 2);
        assert_eq!(case.items[2].op, CaseOp::Resume);
    }

    #[test]
    fn function_declarations() {
        let file = parse("foo() { bar; }\nfunction baz { qux; }");
        let f = assert_matches!(&file.stmts[0].cmd, Some(Command::FuncDecl(f)) => f);
        assert!(!f.rsrv_word && f.parens);
        assert_eq!(f.name.value, "foo");
        let g = assert_matches!(&file.stmts[1].cmd, Some(Command::FuncDecl(f)) => f);
        assert!(g.rsrv_word && !g.parens);
    }

    #[test]
    fn subshell_and_block() {
        let file = parse("(a; b)\n{ c; }");
        assert_matches!(&file.stmts[0].cmd, Some(Command::Subshell(s)) if s.stmts.len() == 2);
        assert_matches!(&file.stmts[1].cmd, Some(Command::Block(b)) if b.stmts.len() == 1);
    }

    #[test]
    fn assignments_and_declarations() {
        let file = parse("x=1 y+=2 cmd\ndeclare -x foo=bar baz");
        assert_eq!(file.stmts[0].assigns.len(), 2);
        assert!(file.stmts[0].assigns[1].append);
        let decl = assert_matches!(&file.stmts[1].cmd, Some(Command::Decl(d)) => d);
        assert_eq!(decl.variant.value, "declare");
        assert_eq!(decl.args.len(), 3);
        assert!(decl.args[0].naked && decl.args[0].name.is_none());
        assert_eq!(decl.args[1].name.as_ref().unwrap().value, "foo");
    }

    #[test]
    fn let_and_arith_cmd() {
        let file = parse("let x=1+2 y=x**2\n((x > 1))");
        let let_clause = assert_matches!(&file.stmts[0].cmd, Some(Command::Let(l)) => l);
        assert_eq!(let_clause.exprs.len(), 2);
        assert_matches!(&file.stmts[1].cmd, Some(Command::Arithm(_)));
    }

    #[test]
    fn keywords_are_words_in_posix_mode() {
        let cfg = Config {
            variant: LangVariant::Posix,
            ..Config::default()
        };
        let file = Parser::new(cfg).parse_str("let x=1", None).unwrap();
        let call = assert_matches!(&file.stmts[0].cmd, Some(Command::Call(c)) => c);
        assert_eq!(call.args[0].lit(), Some("let"));
    }

    #[test]
    fn keyword_only_at_command_start() {
        let file = parse("echo if then fi");
        let call = assert_matches!(&file.stmts[0].cmd, Some(Command::Call(c)) => c);
        assert_eq!(call.args.len(), 4);
    }

    #[test]
    fn error_positions_and_messages() {
        let e = parse_err("if true; then echo hi");
        assert_eq!(e.pos.line(), 1);
        assert_eq!(e.pos.col(), 1);
        assert!(e.message.contains("reached EOF without matching \"if\" with \"fi\""));

        let e = parse_err("x=$(foo");
        assert!(e.message.contains("reached EOF without matching ( with )"));

        let e = parse_err("fi");
        assert!(e.message.contains("can only be used in an if clause"));
    }

    #[test]
    fn error_display_includes_filename() {
        let e = Parser::new(Config::default())
            .parse_str("(", Some("x.sh"))
            .unwrap_err();
        assert!(e.to_string().starts_with("x.sh:1:1: "));
    }

    #[test]
    fn stop_at_word() {
        let cfg = Config {
            stop_at: Some("$$".to_string()),
            ..Config::default()
        };
        let file = Parser::new(cfg).parse_str("a; b; $$ c", None).unwrap();
        assert_eq!(file.stmts.len(), 2);
    }

    #[test]
    fn recover_errors_returns_partial_file() {
        let cfg = Config {
            recover_errors: 2,
            ..Config::default()
        };
        let (file, errors) = Parser::new(cfg).parse_recover("a\nfi\nb\n", None);
        assert_eq!(errors.len(), 1);
        assert_eq!(file.stmts.len(), 2);
    }

    #[test]
    fn interactive_incomplete_then_complete() {
        let mut interactive = Interactive::new(Config::default());
        let stmts = interactive.feed("if true\n").unwrap();
        assert!(stmts.is_empty());
        assert!(interactive.incomplete());
        let stmts = interactive.feed("then echo x; fi\n").unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(!interactive.incomplete());
        assert_matches!(&stmts[0].cmd, Some(Command::If(_)));
    }

    #[test]
    fn interactive_hard_error_is_reported() {
        let mut interactive = Interactive::new(Config::default());
        let err = interactive.feed("fi\n").unwrap_err();
        assert!(err.message.contains("can only be used"));
        assert!(!interactive.incomplete());
    }

    #[test]
    fn words_streaming() {
        let mut seen = Vec::new();
        Parser::new(Config::default())
            .words("a b\nc", |w| {
                seen.push(w.lit().unwrap_or_default().to_string());
                true
            })
            .unwrap();
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn comments_are_kept_on_request() {
        let cfg = Config {
            keep_comments: true,
            ..Config::default()
        };
        let file = Parser::new(cfg).parse_str("a # one\n# two\n", None).unwrap();
        assert_eq!(file.comments.len(), 2);
        assert_eq!(file.comments[0].text, " one");
    }

    #[test]
    fn line_table_is_recorded() {
        let file = parse("a\nb\nc");
        assert_eq!(file.lines.len(), 3);
        assert_eq!(file.stmts[2].pos().line(), 3);
    }
}
