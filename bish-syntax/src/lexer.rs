// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! The lexical analyzer
//!
//! [`Lexer`] is a byte-oriented scanner over a UTF-8 source. Which tokens
//! are legal at any point depends on the current [`QuoteState`]: a plain
//! command reads operators and literal runs, a double-quoted string only
//! recognizes `"`, `` ` `` and `$`, arithmetic contexts read the C operator
//! set, and so on. The parser saves and restores the quote state around
//! each nested construct.
//!
//! The scanner keeps three literal accumulators: one for plain words, one
//! for context-sensitive pieces (double quotes, parameter expansions,
//! regular expressions after `=~`), and one for here-document bodies. All
//! of them elide backslash-newline pairs; everything else is stored
//! verbatim, escapes included, so that printing reproduces the source and
//! unescaping is left to the expansion engine.
//!
//! Every consumed newline is recorded in a [`LineTable`] so byte offsets
//! can be resolved to line/column pairs later.

use crate::source::{LangVariant, LineTable, Pos, SyntaxError};
use crate::syntax::Comment;
use crate::token::Token;

/// Lexing context, governing which sub-grammar applies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum QuoteState {
    /// Plain command context.
    #[default]
    Normal,
    /// Inside `$(…)` or `(…)`.
    SubCmd,
    /// Inside a backquote substitution.
    SubCmdBackquo,
    /// Inside `"…"`.
    DblQuotes,
    /// Inside `'…'`; content is read in one piece, not tokenized.
    SglQuotes,
    /// Inside a here-document body.
    HdocBody,
    /// Inside a `<<-` here-document body; leading tabs are stripped.
    HdocBodyTabs,
    /// Inside `$((…))`.
    ArithmExpr,
    /// Inside `((…))`.
    ArithmExprCmd,
    /// Inside the legacy `$[…]`.
    ArithmExprBrack,
    /// Inside a `${…}` head; the parser reads this context byte by byte.
    ParamExpName,
    /// Inside a `${name[…]}` subscript.
    ParamExpInd,
    /// Inside a `${name/…/…}` replacement pattern.
    ParamExpRepl,
    /// Inside the word of a `${name:-…}`-style expansion.
    ParamExpExp,
    /// Right-hand side of `=~` inside `[[ … ]]`.
    TestRegexp,
    /// Inside the patterns of a `case` clause.
    SwitchCase,
}

impl QuoteState {
    fn is_arithm(self) -> bool {
        matches!(
            self,
            QuoteState::ArithmExpr
                | QuoteState::ArithmExprCmd
                | QuoteState::ArithmExprBrack
                | QuoteState::ParamExpInd
        )
    }
}

/// Event produced while scanning a here-document body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HdocToken {
    /// A literal chunk is available in the lexer's value buffer.
    Lit,
    /// An expansion opener was found; the token field holds it.
    Open,
    /// The delimiter line was consumed; the body is complete.
    End,
    /// The input ended before the delimiter line.
    Eof,
}

/// The lexical analyzer. See the [module documentation](self).
pub(crate) struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    /// Index of the next unconsumed byte, relative to `src`.
    i: usize,
    /// Offset of `src[0]` in the outermost source, for snippet re-lexing.
    base: usize,
    line: u32,
    /// Absolute offset at which the current line starts.
    line_start: usize,
    pub lines: LineTable,

    pub lang: LangVariant,
    pub keep_comments: bool,
    pub comments: Vec<Comment>,

    pub quote: QuoteState,
    pub tok: Token,
    pub val: String,
    pub pos: Pos,
    /// Whitespace preceded the current token.
    pub spaced: bool,
    /// A newline intervened since the previous token.
    pub new_line: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, lang: LangVariant, keep_comments: bool) -> Self {
        Lexer {
            text,
            src: text.as_bytes(),
            i: 0,
            base: 0,
            line: 1,
            line_start: 0,
            lines: LineTable::new(),
            lang,
            keep_comments,
            comments: Vec::new(),
            quote: QuoteState::default(),
            tok: Token::Illegal,
            val: String::new(),
            pos: Pos::default(),
            spaced: false,
            new_line: false,
        }
    }

    /// A lexer over a snippet cut out of a larger source, reporting
    /// positions as if it were still in place.
    pub fn new_snippet(text: &'a str, lang: LangVariant, at: Pos) -> Self {
        let mut lexer = Lexer::new(text, lang, false);
        if at.is_valid() {
            lexer.base = at.offset();
            lexer.line = at.line();
            lexer.line_start = at.offset() + 1 - at.col() as usize;
        }
        lexer
    }

    fn abs(&self) -> usize {
        self.base + self.i
    }

    /// Position of the next unconsumed byte.
    pub fn cur_pos(&self) -> Pos {
        Pos::new(self.abs(), self.line, (self.abs() - self.line_start + 1) as u32)
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.get(self.i).copied()
    }

    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.i + n).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.src.get(self.i).copied()?;
        self.i += 1;
        if b == b'\n' {
            self.line += 1;
            self.lines.push(self.abs());
            self.line_start = self.abs();
        }
        Some(b)
    }

    fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.text[from..to]
    }

    fn op(&mut self, tok: Token, len: usize) {
        for _ in 0..len {
            self.bump();
        }
        self.tok = tok;
    }

    /// Advances one token according to the current quote state.
    pub fn next(&mut self) {
        self.val.clear();
        self.spaced = false;
        self.new_line = false;
        match self.quote {
            QuoteState::DblQuotes => self.next_dquote(),
            q if q.is_arithm() => self.next_arithm(),
            QuoteState::ParamExpRepl | QuoteState::ParamExpExp => self.next_param_word(),
            QuoteState::TestRegexp => self.next_test_regexp(),
            QuoteState::SglQuotes
            | QuoteState::HdocBody
            | QuoteState::HdocBodyTabs
            | QuoteState::ParamExpName => {
                // These contexts are read through the dedicated byte-level
                // helpers, never through next().
                debug_assert!(false, "next() called in {:?}", self.quote);
                self.tok = Token::Eof;
            }
            _ => self.next_normal(),
        }
    }

    fn next_normal(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.bump();
                    self.spaced = true;
                }
                Some(b'\\') if self.peek_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump();
                    self.spaced = true;
                }
                Some(b'#') => {
                    let hash = self.cur_pos();
                    self.bump();
                    let start = self.i;
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                    if self.keep_comments {
                        let text = self.slice(start, self.i).to_string();
                        self.comments.push(Comment { hash, text });
                    }
                }
                _ => break,
            }
        }
        self.pos = self.cur_pos();
        let Some(b) = self.peek() else {
            self.tok = Token::Eof;
            return;
        };
        let bash = self.lang != LangVariant::Posix;
        match b {
            b'\n' => {
                self.bump();
                self.tok = Token::Newl;
                self.new_line = true;
            }
            b'&' => match self.peek_at(1) {
                Some(b'&') => self.op(Token::AndAnd, 2),
                Some(b'>') if bash => {
                    if self.peek_at(2) == Some(b'>') {
                        self.op(Token::AppAll, 3)
                    } else {
                        self.op(Token::RdrAll, 2)
                    }
                }
                _ => self.op(Token::And, 1),
            },
            b'|' => match self.peek_at(1) {
                Some(b'|') => self.op(Token::OrOr, 2),
                Some(b'&') if bash => self.op(Token::OrAnd, 2),
                _ => self.op(Token::Or, 1),
            },
            b';' => match self.peek_at(1) {
                Some(b';') => {
                    if bash && self.peek_at(2) == Some(b'&') {
                        self.op(Token::DblSemiAnd, 3)
                    } else {
                        self.op(Token::DblSemicolon, 2)
                    }
                }
                Some(b'&') if bash => self.op(Token::SemiAnd, 2),
                _ => self.op(Token::Semicolon, 1),
            },
            b'(' => {
                if bash && self.peek_at(1) == Some(b'(') {
                    self.op(Token::DblLeftParen, 2)
                } else {
                    self.op(Token::LeftParen, 1)
                }
            }
            b')' => self.op(Token::RightParen, 1),
            b'$' => self.next_dollar(),
            b'`' => self.op(Token::BckQuote, 1),
            b'\'' => self.op(Token::SglQuote, 1),
            b'"' => self.op(Token::DblQuote, 1),
            b'<' => match self.peek_at(1) {
                Some(b'<') => match self.peek_at(2) {
                    Some(b'-') => self.op(Token::DashHdoc, 3),
                    Some(b'<') if bash => self.op(Token::WordHdoc, 3),
                    _ => self.op(Token::Hdoc, 2),
                },
                Some(b'>') => self.op(Token::RdrInOut, 2),
                Some(b'&') => self.op(Token::DplIn, 2),
                Some(b'(') if bash => self.op(Token::CmdIn, 2),
                _ => self.op(Token::RdrIn, 1),
            },
            b'>' => match self.peek_at(1) {
                Some(b'>') => self.op(Token::AppOut, 2),
                Some(b'&') => self.op(Token::DplOut, 2),
                Some(b'|') => self.op(Token::ClbOut, 2),
                Some(b'(') if bash => self.op(Token::CmdOut, 2),
                _ => self.op(Token::RdrOut, 1),
            },
            b'?' | b'*' | b'+' | b'@' | b'!' if bash && self.peek_at(1) == Some(b'(') => {
                let tok = match b {
                    b'?' => Token::GlobQuest,
                    b'*' => Token::GlobStar,
                    b'+' => Token::GlobPlus,
                    b'@' => Token::GlobAt,
                    _ => Token::GlobExcl,
                };
                self.op(tok, 2)
            }
            _ => self.advance_lit_none(),
        }
    }

    fn next_dollar(&mut self) {
        let bash = self.lang != LangVariant::Posix;
        match self.peek_at(1) {
            Some(b'(') => {
                if self.peek_at(2) == Some(b'(') {
                    self.op(Token::DollDblParen, 3)
                } else {
                    self.op(Token::DollParen, 2)
                }
            }
            Some(b'{') => self.op(Token::DollBrace, 2),
            Some(b'[') if self.lang == LangVariant::Bash => self.op(Token::DollBrack, 2),
            Some(b'\'') if bash && self.quote != QuoteState::DblQuotes => {
                self.op(Token::DollSglQuote, 2)
            }
            Some(b'"') if bash && self.quote != QuoteState::DblQuotes => {
                self.op(Token::DollDblQuote, 2)
            }
            _ => self.op(Token::Dollar, 1),
        }
    }

    /// The plain-word literal accumulator.
    ///
    /// Stops at whitespace or a metacharacter (clean word boundary, making
    /// the token a `LitWord`), or at the start of another word part
    /// (`Lit`). Backslash-newline pairs are elided; any other escaped byte
    /// is kept verbatim together with its backslash.
    fn advance_lit_none(&mut self) {
        let bash = self.lang != LangVariant::Posix;
        let mut seg = self.i;
        let boundary = loop {
            match self.peek() {
                None => break true,
                Some(b' ' | b'\t' | b'\n' | b'\r') => break true,
                Some(b'&' | b'|' | b';' | b'(' | b')' | b'<' | b'>') => break true,
                Some(b'`' | b'"' | b'\'' | b'$') => break false,
                Some(b'?' | b'*' | b'+' | b'@' | b'!') if bash && self.peek_at(1) == Some(b'(') => {
                    break false;
                }
                Some(b'\\') => match self.peek_at(1) {
                    Some(b'\n') => {
                        self.val.push_str(self.slice(seg, self.i));
                        self.bump();
                        self.bump();
                        seg = self.i;
                    }
                    None => {
                        self.bump();
                        break true;
                    }
                    _ => {
                        self.bump();
                        self.bump();
                    }
                },
                _ => {
                    self.bump();
                }
            }
        };
        self.val.push_str(self.slice(seg, self.i));
        self.tok = if boundary { Token::LitWord } else { Token::Lit };
    }

    fn next_dquote(&mut self) {
        self.pos = self.cur_pos();
        match self.peek() {
            None => self.tok = Token::Eof,
            Some(b'"') => self.op(Token::DblQuote, 1),
            Some(b'`') => self.op(Token::BckQuote, 1),
            Some(b'$') => self.next_dollar(),
            _ => self.advance_lit_dquote(),
        }
    }

    /// The double-quote literal accumulator.
    ///
    /// `\"`, `` \` ``, `\$` and `\\` are consumed as escaped pairs and kept
    /// verbatim; other backslashes are ordinary bytes.
    fn advance_lit_dquote(&mut self) {
        let mut seg = self.i;
        loop {
            match self.peek() {
                None | Some(b'"' | b'`' | b'$') => break,
                Some(b'\\') => match self.peek_at(1) {
                    Some(b'\n') => {
                        self.val.push_str(self.slice(seg, self.i));
                        self.bump();
                        self.bump();
                        seg = self.i;
                    }
                    Some(_) => {
                        self.bump();
                        self.bump();
                    }
                    None => {
                        self.bump();
                        break;
                    }
                },
                _ => {
                    self.bump();
                }
            }
        }
        self.val.push_str(self.slice(seg, self.i));
        self.tok = Token::Lit;
    }

    fn next_arithm(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.bump();
                    self.spaced = true;
                }
                Some(b'\\') if self.peek_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump();
                    self.spaced = true;
                }
                _ => break,
            }
        }
        self.pos = self.cur_pos();
        let Some(b) = self.peek() else {
            self.tok = Token::Eof;
            return;
        };
        match b {
            b'\n' => {
                self.bump();
                self.tok = Token::Newl;
                self.new_line = true;
            }
            b'(' => self.op(Token::LeftParen, 1),
            b')' => self.op(Token::RightParen, 1),
            b'[' => self.op(Token::LeftBrack, 1),
            b']' => self.op(Token::RightBrack, 1),
            b'}' => self.op(Token::CloseBrace, 1),
            b';' => self.op(Token::Semicolon, 1),
            b'+' => match self.peek_at(1) {
                Some(b'+') => self.op(Token::Inc, 2),
                Some(b'=') => self.op(Token::AddAssgn, 2),
                _ => self.op(Token::Plus, 1),
            },
            b'-' => match self.peek_at(1) {
                Some(b'-') => self.op(Token::Dec, 2),
                Some(b'=') => self.op(Token::SubAssgn, 2),
                _ => self.op(Token::Minus, 1),
            },
            b'*' => match self.peek_at(1) {
                Some(b'*') => self.op(Token::Power, 2),
                Some(b'=') => self.op(Token::MulAssgn, 2),
                _ => self.op(Token::Star, 1),
            },
            b'/' => match self.peek_at(1) {
                Some(b'=') => self.op(Token::QuoAssgn, 2),
                _ => self.op(Token::Slash, 1),
            },
            b'%' => match self.peek_at(1) {
                Some(b'=') => self.op(Token::RemAssgn, 2),
                _ => self.op(Token::Percent, 1),
            },
            b'^' => match self.peek_at(1) {
                Some(b'=') => self.op(Token::XorAssgn, 2),
                _ => self.op(Token::Caret, 1),
            },
            b'&' => match self.peek_at(1) {
                Some(b'&') => self.op(Token::AndAnd, 2),
                Some(b'=') => self.op(Token::AndAssgn, 2),
                _ => self.op(Token::And, 1),
            },
            b'|' => match self.peek_at(1) {
                Some(b'|') => self.op(Token::OrOr, 2),
                Some(b'=') => self.op(Token::OrAssgn, 2),
                _ => self.op(Token::Or, 1),
            },
            b'<' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'<'), Some(b'=')) => self.op(Token::ShlAssgn, 3),
                (Some(b'<'), _) => self.op(Token::Hdoc, 2),
                (Some(b'='), _) => self.op(Token::Leq, 2),
                _ => self.op(Token::RdrIn, 1),
            },
            b'>' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'>'), Some(b'=')) => self.op(Token::ShrAssgn, 3),
                (Some(b'>'), _) => self.op(Token::AppOut, 2),
                (Some(b'='), _) => self.op(Token::Geq, 2),
                _ => self.op(Token::RdrOut, 1),
            },
            b'=' => match self.peek_at(1) {
                Some(b'=') => self.op(Token::Eql, 2),
                _ => self.op(Token::Assgn, 1),
            },
            b'!' => match self.peek_at(1) {
                Some(b'=') => self.op(Token::Neq, 2),
                _ => self.op(Token::Not, 1),
            },
            b'~' => self.op(Token::BitNot, 1),
            b'?' => self.op(Token::Quest, 1),
            b':' => self.op(Token::Colon, 1),
            b',' => self.op(Token::Comma, 1),
            b'@' => self.op(Token::At, 1),
            b'$' => self.next_dollar(),
            b'`' => self.op(Token::BckQuote, 1),
            b'\'' => self.op(Token::SglQuote, 1),
            b'"' => self.op(Token::DblQuote, 1),
            b if b.is_ascii_alphanumeric() || b == b'_' => self.advance_lit_arithm(),
            _ => {
                self.bump();
                self.val.push(b as char);
                self.tok = Token::Illegal;
            }
        }
    }

    /// Literal accumulator for arithmetic contexts: a name or number,
    /// optionally continued by a bracketed subscript as in `a[0]`.
    fn advance_lit_arithm(&mut self) {
        let seg = self.i;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'#')
        {
            self.bump();
        }
        if self.quote != QuoteState::ParamExpInd && self.peek() == Some(b'[') {
            let mut depth = 0usize;
            loop {
                match self.peek() {
                    None | Some(b'\n' | b'$' | b'`' | b'\'' | b'"') => break,
                    Some(b'[') => {
                        depth += 1;
                        self.bump();
                    }
                    Some(b']') => {
                        self.bump();
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Some(_) => {
                        self.bump();
                    }
                }
            }
        }
        self.val.push_str(self.slice(seg, self.i));
        self.tok = Token::Lit;
    }

    /// Tokens inside a parameter expansion word: either the replacement
    /// pattern (`ParamExpRepl`, where `/` is an operator) or the word of a
    /// `${x:-…}`-style expansion (`ParamExpExp`).
    fn next_param_word(&mut self) {
        self.pos = self.cur_pos();
        match self.peek() {
            None => self.tok = Token::Eof,
            Some(b'}') => self.op(Token::CloseBrace, 1),
            Some(b'/') if self.quote == QuoteState::ParamExpRepl => self.op(Token::Slash, 1),
            Some(b'$') => self.next_dollar(),
            Some(b'`') => self.op(Token::BckQuote, 1),
            Some(b'\'') => self.op(Token::SglQuote, 1),
            Some(b'"') => self.op(Token::DblQuote, 1),
            _ => {
                let mut seg = self.i;
                loop {
                    match self.peek() {
                        None | Some(b'}' | b'$' | b'`' | b'\'' | b'"') => break,
                        Some(b'/') if self.quote == QuoteState::ParamExpRepl => break,
                        Some(b'\\') => match self.peek_at(1) {
                            Some(b'\n') => {
                                self.val.push_str(self.slice(seg, self.i));
                                self.bump();
                                self.bump();
                                seg = self.i;
                            }
                            Some(_) => {
                                self.bump();
                                self.bump();
                            }
                            None => {
                                self.bump();
                                break;
                            }
                        },
                        _ => {
                            self.bump();
                        }
                    }
                }
                self.val.push_str(self.slice(seg, self.i));
                self.tok = Token::Lit;
            }
        }
    }

    /// Tokens on the right-hand side of `=~`: whitespace only splits at
    /// the top parenthesis level, so `[[ x =~ (a b)$ ]]` reads one word.
    fn next_test_regexp(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.bump();
                    self.spaced = true;
                }
                _ => break,
            }
        }
        self.pos = self.cur_pos();
        let Some(b) = self.peek() else {
            self.tok = Token::Eof;
            return;
        };
        match b {
            b'\n' => {
                self.bump();
                self.tok = Token::Newl;
                self.new_line = true;
            }
            b'$' => self.next_dollar(),
            b'`' => self.op(Token::BckQuote, 1),
            b'\'' => self.op(Token::SglQuote, 1),
            b'"' => self.op(Token::DblQuote, 1),
            b']' if self.peek_at(1) == Some(b']') => {
                self.op(Token::LitWord, 2);
                self.val.push_str("]]");
            }
            b'&' if self.peek_at(1) == Some(b'&') => self.op(Token::AndAnd, 2),
            b'|' if self.peek_at(1) == Some(b'|') => self.op(Token::OrOr, 2),
            b')' => self.op(Token::RightParen, 1),
            _ => {
                let mut depth = 0usize;
                let seg = self.i;
                loop {
                    match self.peek() {
                        None | Some(b'\n' | b'$' | b'`' | b'\'' | b'"') => break,
                        Some(b' ' | b'\t' | b'\r') if depth == 0 => break,
                        Some(b']') if depth == 0 && self.peek_at(1) == Some(b']') => break,
                        Some(b'(') => {
                            depth += 1;
                            self.bump();
                        }
                        Some(b')') => {
                            if depth == 0 {
                                break;
                            }
                            depth -= 1;
                            self.bump();
                        }
                        Some(b'\\') => {
                            self.bump();
                            self.bump();
                        }
                        _ => {
                            self.bump();
                        }
                    }
                }
                self.val.push_str(self.slice(seg, self.i));
                self.tok = Token::Lit;
            }
        }
    }

    /// Reads the rest of a single-quoted string, the opening quote already
    /// consumed. With `dollar`, backslash escapes for `\'` and `\\` are
    /// honored as in `$'…'`. Returns the raw value and the position of the
    /// closing quote.
    pub fn single_quoted(&mut self, dollar: bool) -> Result<(String, Pos), SyntaxError> {
        let start = self.i;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError {
                        filename: None,
                        pos: self.pos,
                        message: "reached EOF without closing quote '".to_string(),
                    });
                }
                Some(b'\'') => {
                    let value = self.slice(start, self.i).to_string();
                    let right = self.cur_pos();
                    self.bump();
                    return Ok((value, right));
                }
                Some(b'\\') if dollar => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Reads the parameter of an expansion byte by byte: a name, a run of
    /// digits, or one special character. The value is empty if the input
    /// starts with none of those. In the short `$n` form, a positional
    /// parameter is a single digit; `${10}` takes the whole run.
    pub fn param_lit(&mut self, short: bool) -> crate::syntax::Lit {
        let pos = self.cur_pos();
        let start = self.i;
        match self.peek() {
            Some(b) if b == b'_' || b.is_ascii_alphabetic() => {
                while self
                    .peek()
                    .is_some_and(|b| b == b'_' || b.is_ascii_alphanumeric())
                {
                    self.bump();
                }
            }
            Some(b) if b.is_ascii_digit() => {
                self.bump();
                while !short && self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.bump();
                }
            }
            Some(b'@' | b'*' | b'#' | b'?' | b'-' | b'$' | b'!') => {
                self.bump();
            }
            _ => {}
        }
        crate::syntax::Lit::new(self.slice(start, self.i), pos, self.cur_pos())
    }

    /// Scans one event of a here-document body.
    ///
    /// Each physical line is first compared against the delimiter (after
    /// optional tab stripping); the body otherwise accumulates verbatim,
    /// with `$` and `` ` `` splitting the literal when the delimiter was
    /// unquoted. `delim` of `None` never matches, ending the body at EOF
    /// instead; this is how whole inputs are read as documents.
    pub fn heredoc_token(
        &mut self,
        strip_tabs: bool,
        delim: Option<&str>,
        expandable: bool,
    ) -> HdocToken {
        self.val.clear();
        self.pos = self.cur_pos();
        let mut seg = self.i;
        loop {
            if self.abs() == self.line_start {
                // At a line start: check for the delimiter line.
                let mut j = self.i;
                if strip_tabs {
                    while self.src.get(j) == Some(&b'\t') {
                        j += 1;
                    }
                }
                let line_end = self.src[j..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(self.src.len(), |n| j + n);
                if delim == Some(self.slice(j, line_end)) {
                    if seg < self.i || !self.val.is_empty() {
                        // Flush the chunk first; the next call ends the body.
                        self.val.push_str(self.slice(seg, self.i));
                        return HdocToken::Lit;
                    }
                    while self.i < line_end {
                        self.bump();
                    }
                    self.bump(); // the newline, if any
                    return HdocToken::End;
                }
                if strip_tabs {
                    self.val.push_str(self.slice(seg, self.i));
                    while self.peek() == Some(b'\t') {
                        self.bump();
                    }
                    seg = self.i;
                }
            }
            match self.peek() {
                None => {
                    if delim.is_none() {
                        self.val.push_str(self.slice(seg, self.i));
                        return if self.val.is_empty() {
                            HdocToken::End
                        } else {
                            HdocToken::Lit
                        };
                    }
                    return HdocToken::Eof;
                }
                Some(b'$' | b'`') if expandable => {
                    if seg < self.i || !self.val.is_empty() {
                        self.val.push_str(self.slice(seg, self.i));
                        return HdocToken::Lit;
                    }
                    self.pos = self.cur_pos();
                    if self.peek() == Some(b'`') {
                        self.op(Token::BckQuote, 1);
                    } else {
                        self.next_dollar();
                    }
                    return HdocToken::Open;
                }
                Some(b'\\') if expandable => {
                    // Keep the pair verbatim; an escaped `$` stays literal.
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Reads the raw pattern of an extended glob, up to but not including
    /// the parenthesis matching the already-consumed opener.
    pub fn extglob_pattern(&mut self) -> Result<crate::syntax::Lit, SyntaxError> {
        let pos = self.cur_pos();
        let start = self.i;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(SyntaxError {
                        filename: None,
                        pos,
                        message: "reached EOF without matching ( with )".to_string(),
                    });
                }
                Some(b'(') => {
                    depth += 1;
                    self.bump();
                }
                Some(b')') => {
                    if depth == 0 {
                        let lit =
                            crate::syntax::Lit::new(self.slice(start, self.i), pos, self.cur_pos());
                        self.bump();
                        return Ok(lit);
                    }
                    depth -= 1;
                    self.bump();
                }
                Some(b'\\') => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Consumes one raw byte; the parser uses this for the byte-driven
    /// parts of the `${…}` grammar.
    pub fn bump_byte(&mut self) -> Option<u8> {
        self.bump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<(Token, String)> {
        let mut lexer = Lexer::new(src, LangVariant::Bash, false);
        let mut out = Vec::new();
        loop {
            lexer.next();
            if lexer.tok == Token::Eof {
                return out;
            }
            out.push((lexer.tok, lexer.val.clone()));
        }
    }

    #[test]
    fn operators_and_words() {
        let toks = tokens("foo && bar | baz &");
        assert_eq!(
            toks,
            vec![
                (Token::LitWord, "foo".to_string()),
                (Token::AndAnd, String::new()),
                (Token::LitWord, "bar".to_string()),
                (Token::Or, String::new()),
                (Token::LitWord, "baz".to_string()),
                (Token::And, String::new()),
            ]
        );
    }

    #[test]
    fn lit_vs_lit_word() {
        let toks = tokens("foo\"bar\"");
        assert_eq!(toks[0], (Token::Lit, "foo".to_string()));
        assert_eq!(toks[1].0, Token::DblQuote);
    }

    #[test]
    fn line_continuation_elided() {
        let toks = tokens("fo\\\no");
        assert_eq!(toks, vec![(Token::LitWord, "foo".to_string())]);
    }

    #[test]
    fn escaped_byte_kept_verbatim() {
        let toks = tokens(r"a\ b");
        assert_eq!(toks, vec![(Token::LitWord, r"a\ b".to_string())]);
    }

    #[test]
    fn carriage_return_is_whitespace() {
        let toks = tokens("a\r\nb");
        assert_eq!(
            toks,
            vec![
                (Token::LitWord, "a".to_string()),
                (Token::Newl, String::new()),
                (Token::LitWord, "b".to_string()),
            ]
        );
    }

    #[test]
    fn dollar_openers() {
        assert_eq!(tokens("$((")[0].0, Token::DollDblParen);
        assert_eq!(tokens("$(")[0].0, Token::DollParen);
        assert_eq!(tokens("${")[0].0, Token::DollBrace);
        assert_eq!(tokens("$x")[0].0, Token::Dollar);
    }

    #[test]
    fn posix_has_no_bash_operators() {
        let mut lexer = Lexer::new("a |& b", LangVariant::Posix, false);
        lexer.next();
        lexer.next();
        assert_eq!(lexer.tok, Token::Or);
        lexer.next();
        assert_eq!(lexer.tok, Token::And);
    }

    #[test]
    fn extglob_opener_and_pattern() {
        let mut lexer = Lexer::new("@(a|b(c))x", LangVariant::Bash, false);
        lexer.next();
        assert_eq!(lexer.tok, Token::GlobAt);
        let pattern = lexer.extglob_pattern().unwrap();
        assert_eq!(pattern.value, "a|b(c)");
        lexer.next();
        assert_eq!((lexer.tok, lexer.val.as_str()), (Token::LitWord, "x"));
    }

    #[test]
    fn arithm_operators() {
        let mut lexer = Lexer::new("1**2<<=x++", LangVariant::Bash, false);
        lexer.quote = QuoteState::ArithmExpr;
        let mut toks = Vec::new();
        loop {
            lexer.next();
            if lexer.tok == Token::Eof {
                break;
            }
            toks.push(lexer.tok);
        }
        assert_eq!(
            toks,
            vec![Token::Lit, Token::Power, Token::Lit, Token::ShlAssgn, Token::Lit, Token::Inc]
        );
    }

    #[test]
    fn arithm_subscript_stays_in_literal() {
        let mut lexer = Lexer::new("a[0]+1", LangVariant::Bash, false);
        lexer.quote = QuoteState::ArithmExpr;
        lexer.next();
        assert_eq!((lexer.tok, lexer.val.as_str()), (Token::Lit, "a[0]"));
        lexer.next();
        assert_eq!(lexer.tok, Token::Plus);
    }

    #[test]
    fn single_quoted_reading() {
        let mut lexer = Lexer::new("'a b'c", LangVariant::Bash, false);
        lexer.next();
        assert_eq!(lexer.tok, Token::SglQuote);
        let (value, _) = lexer.single_quoted(false).unwrap();
        assert_eq!(value, "a b");
        lexer.next();
        assert_eq!(lexer.val, "c");
    }

    #[test]
    fn unclosed_single_quote_is_an_error() {
        let mut lexer = Lexer::new("'abc", LangVariant::Bash, false);
        lexer.next();
        let err = lexer.single_quoted(false).unwrap_err();
        assert!(err.message.contains("without closing quote"));
    }

    #[test]
    fn heredoc_body_with_tab_stripping() {
        let mut lexer = Lexer::new("\tfoo\n\tEOF\nrest", LangVariant::Bash, false);
        assert_eq!(lexer.heredoc_token(true, Some("EOF"), true), HdocToken::Lit);
        assert_eq!(lexer.val, "foo\n");
        assert_eq!(lexer.heredoc_token(true, Some("EOF"), true), HdocToken::End);
        lexer.next();
        assert_eq!(lexer.val, "rest");
    }

    #[test]
    fn heredoc_splits_on_expansions() {
        let mut lexer = Lexer::new("a $x b\nEOF\n", LangVariant::Bash, false);
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), true), HdocToken::Lit);
        assert_eq!(lexer.val, "a ");
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), true), HdocToken::Open);
        assert_eq!(lexer.tok, Token::Dollar);
    }

    #[test]
    fn heredoc_quoted_delim_is_verbatim() {
        let mut lexer = Lexer::new("a $x b\nEOF\n", LangVariant::Bash, false);
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), false), HdocToken::Lit);
        assert_eq!(lexer.val, "a $x b\n");
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), false), HdocToken::End);
    }

    #[test]
    fn heredoc_missing_delimiter_is_eof() {
        let mut lexer = Lexer::new("body\n", LangVariant::Bash, false);
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), false), HdocToken::Lit);
        assert_eq!(lexer.heredoc_token(false, Some("EOF"), false), HdocToken::Eof);
    }
}
