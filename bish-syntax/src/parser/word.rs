// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Word, word-part, assignment, and redirection parsing
//!
//! A word is parsed part by part: each literal accumulator run, quoted
//! string, or expansion becomes one [`WordPart`], and parts are joined
//! while they are adjacent in the source. The `${…}` head is read byte by
//! byte, since its micro-grammar distinguishes single characters; nested
//! words inside it go back through the token-driven path with the lexer
//! switched to the matching quote state.

use super::{HeredocSpec, PResult, Run};
use crate::lexer::{HdocToken, QuoteState};
use crate::source::{LangVariant, Pos};
use crate::syntax::*;
use crate::token::{GlobOp, ParExpOp, ParNamesOp, ProcOp, RedirOp, Token};

/// Whether a string is a valid shell variable name.
pub(crate) fn is_valid_name(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b == b'_' || b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
}

/// The shape of an assignment prefix inside a literal like `a[i+1]+=x`.
struct AssignSplit {
    name_end: usize,
    /// Byte range of the subscript text, excluding the brackets.
    index: Option<(usize, usize)>,
    append: bool,
    /// Where the value starts, just past `=`.
    value_start: usize,
}

fn scan_assign(val: &str) -> Option<AssignSplit> {
    let bytes = val.as_bytes();
    let mut i = 0;
    match bytes.first() {
        Some(b) if *b == b'_' || b.is_ascii_alphabetic() => i += 1,
        _ => return None,
    }
    while bytes.get(i).is_some_and(|b| *b == b'_' || b.is_ascii_alphanumeric()) {
        i += 1;
    }
    let name_end = i;
    let mut index = None;
    if bytes.get(i) == Some(&b'[') {
        let mut depth = 0usize;
        let start = i + 1;
        loop {
            match bytes.get(i) {
                Some(b'[') => depth += 1,
                Some(b']') => {
                    depth -= 1;
                    if depth == 0 {
                        index = Some((start, i));
                        i += 1;
                        break;
                    }
                }
                Some(_) => {}
                None => return None,
            }
            i += 1;
        }
    }
    match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'+'), Some(b'=')) => Some(AssignSplit {
            name_end,
            index,
            append: true,
            value_start: i + 2,
        }),
        (Some(b'='), _) => Some(AssignSplit {
            name_end,
            index,
            append: false,
            value_start: i + 1,
        }),
        _ => None,
    }
}

/// Whether a literal begins a `name=`, `name[i]=`, or `name+=` assignment.
pub(crate) fn is_assign_start(val: &str) -> bool {
    scan_assign(val).is_some()
}

/// The literal text of a here-document delimiter after quote removal, and
/// whether any part of it was quoted.
fn heredoc_delim(word: &Word) -> (String, bool) {
    let mut text = String::new();
    let mut quoted = false;
    for part in &word.parts {
        match part {
            WordPart::Lit(lit) => {
                let mut chars = lit.value.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        quoted = true;
                        if let Some(next) = chars.next() {
                            text.push(next);
                        }
                    } else {
                        text.push(c);
                    }
                }
            }
            WordPart::SglQuoted(sq) => {
                quoted = true;
                text.push_str(&sq.value);
            }
            WordPart::DblQuoted(dq) => {
                quoted = true;
                for part in &dq.parts {
                    if let WordPart::Lit(lit) = part {
                        text.push_str(&lit.value);
                    }
                }
            }
            other => {
                // Expansions in a delimiter stay literal.
                use std::fmt::Write as _;
                let _ = write!(text, "{other}");
            }
        }
    }
    (text, quoted)
}

impl Run<'_, '_> {
    /// Whether the current token can begin a word.
    pub(crate) fn starts_word(&self) -> bool {
        matches!(
            self.lex.tok,
            Token::Lit
                | Token::LitWord
                | Token::SglQuote
                | Token::DblQuote
                | Token::DollSglQuote
                | Token::DollDblQuote
                | Token::Dollar
                | Token::DollBrace
                | Token::DollParen
                | Token::DollDblParen
                | Token::DollBrack
                | Token::BckQuote
                | Token::CmdIn
                | Token::CmdOut
                | Token::GlobQuest
                | Token::GlobStar
                | Token::GlobPlus
                | Token::GlobAt
                | Token::GlobExcl
        )
    }

    /// Reads one word. Afterwards the current token is the first token
    /// following the word.
    pub(crate) fn get_word(&mut self) -> PResult<Word> {
        let mut parts = Vec::new();
        loop {
            let ends_word = self.lex.tok == Token::LitWord;
            let part = self.word_part()?;
            parts.push(part);
            self.next()?;
            if ends_word || self.lex.spaced || self.lex.new_line || !self.starts_word() {
                break;
            }
        }
        Ok(Word::new(parts))
    }

    /// Consumes the word part that the current token begins. No following
    /// token is fetched; callers decide when to advance.
    pub(crate) fn word_part(&mut self) -> PResult<WordPart> {
        match self.lex.tok {
            Token::Lit | Token::LitWord => {
                let value = std::mem::take(&mut self.lex.val);
                Ok(WordPart::Lit(Lit::new(value, self.lex.pos, self.lex.cur_pos())))
            }
            Token::SglQuote | Token::DollSglQuote => {
                let dollar = self.lex.tok == Token::DollSglQuote;
                let left = self.lex.pos;
                let (value, right) = match self.lex.single_quoted(dollar) {
                    Ok(v) => v,
                    Err(e) => return self.lex_err(e),
                };
                Ok(WordPart::SglQuoted(SglQuoted {
                    left,
                    right,
                    dollar,
                    value,
                }))
            }
            Token::DblQuote | Token::DollDblQuote => self.dbl_quoted(),
            Token::BckQuote => {
                let left = self.lex.pos;
                let saved = self.lex.quote;
                self.lex.quote = QuoteState::SubCmdBackquo;
                self.next()?;
                let stmts = self.stmt_list(&[], &[Token::BckQuote])?;
                if self.lex.tok != Token::BckQuote {
                    return self.err(left, "reached EOF without closing quote `");
                }
                let right = self.lex.pos;
                self.lex.quote = saved;
                Ok(WordPart::CmdSubst(CmdSubst {
                    left,
                    right,
                    stmts,
                    backquotes: true,
                }))
            }
            Token::DollParen => {
                let left = self.lex.pos;
                let saved = self.lex.quote;
                self.lex.quote = QuoteState::SubCmd;
                self.next()?;
                let stmts = self.stmt_list(&[], &[Token::RightParen])?;
                if self.lex.tok != Token::RightParen {
                    return self.err(left, "reached EOF without matching ( with )");
                }
                let right = self.lex.pos;
                self.lex.quote = saved;
                Ok(WordPart::CmdSubst(CmdSubst {
                    left,
                    right,
                    stmts,
                    backquotes: false,
                }))
            }
            Token::DollDblParen => {
                let left = self.lex.pos;
                let saved = self.lex.quote;
                self.lex.quote = QuoteState::ArithmExpr;
                self.next()?;
                let expr = self.arithm_expr(0)?;
                if self.lex.tok != Token::RightParen || self.lex.peek() != Some(b')') {
                    return self.err(left, "reached EOF without matching $(( with ))");
                }
                let right = self.lex.pos;
                self.lex.bump_byte();
                self.lex.quote = saved;
                Ok(WordPart::ArithmExp(ArithmExp {
                    left,
                    right,
                    bracket: false,
                    expr,
                }))
            }
            Token::DollBrack => {
                let left = self.lex.pos;
                let saved = self.lex.quote;
                self.lex.quote = QuoteState::ArithmExprBrack;
                self.next()?;
                let expr = self.arithm_expr(0)?;
                if self.lex.tok != Token::RightBrack {
                    return self.err(left, "reached EOF without matching $[ with ]");
                }
                let right = self.lex.pos;
                self.lex.quote = saved;
                Ok(WordPart::ArithmExp(ArithmExp {
                    left,
                    right,
                    bracket: true,
                    expr,
                }))
            }
            Token::DollBrace => {
                let dollar = self.lex.pos;
                let pe = self.param_exp(dollar)?;
                Ok(WordPart::ParamExp(Box::new(pe)))
            }
            Token::Dollar => {
                let dollar = self.lex.pos;
                let param = self.lex.param_lit(true);
                if param.value.is_empty() {
                    Ok(WordPart::Lit(Lit::new("$", dollar, dollar.advance(1))))
                } else {
                    Ok(WordPart::ParamExp(Box::new(ParamExp::short(dollar, param))))
                }
            }
            Token::CmdIn | Token::CmdOut => {
                let op = ProcOp::try_from(self.lex.tok).expect("checked by the match");
                let op_pos = self.lex.pos;
                let saved = self.lex.quote;
                self.lex.quote = QuoteState::SubCmd;
                self.next()?;
                let stmts = self.stmt_list(&[], &[Token::RightParen])?;
                if self.lex.tok != Token::RightParen {
                    return self.err(op_pos, "reached EOF without matching ( with )");
                }
                let rparen = self.lex.pos;
                self.lex.quote = saved;
                Ok(WordPart::ProcSubst(ProcSubst {
                    op_pos,
                    rparen,
                    op,
                    stmts,
                }))
            }
            Token::GlobQuest
            | Token::GlobStar
            | Token::GlobPlus
            | Token::GlobAt
            | Token::GlobExcl => {
                let op = GlobOp::try_from(self.lex.tok).expect("checked by the match");
                let op_pos = self.lex.pos;
                let pattern = match self.lex.extglob_pattern() {
                    Ok(lit) => lit,
                    Err(e) => return self.lex_err(e),
                };
                Ok(WordPart::ExtGlob(ExtGlob {
                    op_pos,
                    op,
                    pattern,
                }))
            }
            other => {
                let pos = self.lex.pos;
                self.err(pos, format!("{other} is not a valid word part"))
            }
        }
    }

    fn dbl_quoted(&mut self) -> PResult<WordPart> {
        let dollar = self.lex.tok == Token::DollDblQuote;
        let left = self.lex.pos;
        let saved = self.lex.quote;
        self.lex.quote = QuoteState::DblQuotes;
        self.next()?;
        let mut parts = Vec::new();
        loop {
            match self.lex.tok {
                Token::DblQuote => break,
                Token::Eof => {
                    return self.err(left, "reached EOF without closing quote \"");
                }
                _ => {
                    let part = self.word_part()?;
                    parts.push(part);
                    self.next()?;
                }
            }
        }
        let right = self.lex.pos;
        self.lex.quote = saved;
        Ok(WordPart::DblQuoted(DblQuoted {
            left,
            right,
            dollar,
            parts,
        }))
    }

    /// Parses a `${…}` expansion; the `${` token is current and the input
    /// is positioned right after it. Consumes through the closing `}`.
    fn param_exp(&mut self, dollar: Pos) -> PResult<ParamExp> {
        let bash = self.cfg.variant != LangVariant::Posix;
        let mut pe = ParamExp {
            dollar,
            rbrace: Pos::default(),
            short: false,
            excl: false,
            length: false,
            width: false,
            param: Lit::synthetic(""),
            index: None,
            slice: None,
            repl: None,
            names: None,
            exp: None,
        };
        if bash
            && self.lex.peek() == Some(b'!')
            && !matches!(self.lex.peek_at(1), None | Some(b'}'))
        {
            pe.excl = true;
            self.lex.bump_byte();
        }
        if self.lex.peek() == Some(b'#') && !matches!(self.lex.peek_at(1), None | Some(b'}')) {
            pe.length = true;
            self.lex.bump_byte();
        } else if self.cfg.variant == LangVariant::MirBsd
            && self.lex.peek() == Some(b'%')
            && !matches!(self.lex.peek_at(1), None | Some(b'}'))
        {
            pe.width = true;
            self.lex.bump_byte();
        }
        pe.param = self.lex.param_lit(false);
        if pe.param.value.is_empty() {
            return self.err(dollar, "parameter expansion requires a literal");
        }
        if pe.excl
            && matches!(self.lex.peek(), Some(b'*' | b'@'))
            && self.lex.peek_at(1) == Some(b'}')
        {
            pe.names = Some(if self.lex.peek() == Some(b'*') {
                ParNamesOp::Names
            } else {
                ParNamesOp::NamesByFields
            });
            self.lex.bump_byte();
        }
        if bash && self.lex.peek() == Some(b'[') {
            let saved = self.lex.quote;
            self.lex.quote = QuoteState::ParamExpInd;
            self.next()?; // the [ itself
            debug_assert_eq!(self.lex.tok, Token::LeftBrack);
            self.next()?;
            let expr = self.arithm_expr(0)?;
            if self.lex.tok != Token::RightBrack {
                self.lex.quote = saved;
                return self.err(dollar, "reached } without matching [ with ]");
            }
            self.lex.quote = saved;
            pe.index = Some(Box::new(expr));
        }
        match self.lex.peek() {
            None => return self.err(dollar, "reached EOF without matching ${ with }"),
            Some(b'}') => {
                pe.rbrace = self.lex.cur_pos();
                self.lex.bump_byte();
            }
            Some(b':') => match self.lex.peek_at(1) {
                Some(b'-') => self.param_exp_op(&mut pe, ParExpOp::DefaultUnsetOrNull, 2)?,
                Some(b'=') => self.param_exp_op(&mut pe, ParExpOp::AssignUnsetOrNull, 2)?,
                Some(b'+') => self.param_exp_op(&mut pe, ParExpOp::AlternateSetOrNull, 2)?,
                Some(b'?') => self.param_exp_op(&mut pe, ParExpOp::ErrorUnsetOrNull, 2)?,
                _ => self.param_exp_slice(&mut pe)?,
            },
            Some(b'-') => self.param_exp_op(&mut pe, ParExpOp::DefaultUnset, 1)?,
            Some(b'=') => self.param_exp_op(&mut pe, ParExpOp::AssignUnset, 1)?,
            Some(b'+') => self.param_exp_op(&mut pe, ParExpOp::AlternateSet, 1)?,
            Some(b'?') => self.param_exp_op(&mut pe, ParExpOp::ErrorUnset, 1)?,
            Some(b'%') => {
                if self.lex.peek_at(1) == Some(b'%') {
                    self.param_exp_op(&mut pe, ParExpOp::RemLargeSuffix, 2)?;
                } else {
                    self.param_exp_op(&mut pe, ParExpOp::RemSmallSuffix, 1)?;
                }
            }
            Some(b'#') => {
                if self.lex.peek_at(1) == Some(b'#') {
                    self.param_exp_op(&mut pe, ParExpOp::RemLargePrefix, 2)?;
                } else {
                    self.param_exp_op(&mut pe, ParExpOp::RemSmallPrefix, 1)?;
                }
            }
            Some(b'^') if bash => {
                if self.lex.peek_at(1) == Some(b'^') {
                    self.param_exp_op(&mut pe, ParExpOp::UpperAll, 2)?;
                } else {
                    self.param_exp_op(&mut pe, ParExpOp::UpperFirst, 1)?;
                }
            }
            Some(b',') if bash => {
                if self.lex.peek_at(1) == Some(b',') {
                    self.param_exp_op(&mut pe, ParExpOp::LowerAll, 2)?;
                } else {
                    self.param_exp_op(&mut pe, ParExpOp::LowerFirst, 1)?;
                }
            }
            Some(b'@') if bash => {
                self.lex.bump_byte();
                let op = match self.lex.peek() {
                    Some(b'Q') => ParExpOp::Quoted,
                    Some(b'E') => ParExpOp::Escaped,
                    Some(b'P') => ParExpOp::Prompt,
                    Some(b'A') => ParExpOp::AssignStmt,
                    Some(b'a') => ParExpOp::Attrs,
                    other => {
                        let pos = self.lex.cur_pos();
                        return self.err(
                            pos,
                            format!(
                                "not a valid parameter transformation operator: {}",
                                other.map_or("EOF".to_string(), |b| (b as char).to_string()),
                            ),
                        );
                    }
                };
                self.lex.bump_byte();
                if self.lex.peek() != Some(b'}') {
                    return self.err(dollar, "reached EOF without matching ${ with }");
                }
                pe.rbrace = self.lex.cur_pos();
                self.lex.bump_byte();
                pe.exp = Some(Box::new(Expansion { op, word: None }));
            }
            Some(b'/') if bash => self.param_exp_replace(&mut pe)?,
            Some(other) => {
                let pos = self.lex.cur_pos();
                return self.err(
                    pos,
                    format!("not a valid parameter expansion operator: {}", other as char),
                );
            }
        }
        Ok(pe)
    }

    /// Reads the `op` + word tail of a `${x:-word}`-style expansion.
    fn param_exp_op(&mut self, pe: &mut ParamExp, op: ParExpOp, op_len: usize) -> PResult<()> {
        for _ in 0..op_len {
            self.lex.bump_byte();
        }
        let (word, rbrace) = self.param_exp_word(pe.dollar, QuoteState::ParamExpExp)?;
        pe.rbrace = rbrace;
        pe.exp = Some(Box::new(Expansion { op, word }));
        Ok(())
    }

    /// Reads word parts in the given quote state up to the closing `}` (or
    /// a `/` in replacement mode, which the caller then sees as the
    /// current token).
    fn param_exp_word(
        &mut self,
        dollar: Pos,
        quote: QuoteState,
    ) -> PResult<(Option<Word>, Pos)> {
        let saved = self.lex.quote;
        self.lex.quote = quote;
        self.next()?;
        let mut parts = Vec::new();
        loop {
            match self.lex.tok {
                Token::CloseBrace => break,
                Token::Slash if quote == QuoteState::ParamExpRepl => break,
                Token::Eof => {
                    self.lex.quote = saved;
                    return self.err(dollar, "reached EOF without matching ${ with }");
                }
                _ => {
                    let part = self.word_part()?;
                    parts.push(part);
                    self.next()?;
                }
            }
        }
        let rbrace = self.lex.pos;
        self.lex.quote = saved;
        let word = if parts.is_empty() {
            None
        } else {
            Some(Word::new(parts))
        };
        Ok((word, rbrace))
    }

    fn param_exp_slice(&mut self, pe: &mut ParamExp) -> PResult<()> {
        self.lex.bump_byte(); // the :
        let saved = self.lex.quote;
        self.lex.quote = QuoteState::ArithmExpr;
        self.next()?;
        // Offsets parse above the ternary so a bare colon separates the
        // offset from the length.
        let offset = if matches!(self.lex.tok, Token::Colon | Token::CloseBrace) {
            None
        } else {
            Some(self.arithm_expr(4)?)
        };
        let mut length = None;
        if self.lex.tok == Token::Colon {
            self.next()?;
            if self.lex.tok != Token::CloseBrace {
                length = Some(self.arithm_expr(4)?);
            }
        }
        if self.lex.tok != Token::CloseBrace {
            self.lex.quote = saved;
            return self.err(pe.dollar, "reached EOF without matching ${ with }");
        }
        pe.rbrace = self.lex.pos;
        self.lex.quote = saved;
        pe.slice = Some(Box::new(Slice { offset, length }));
        Ok(())
    }

    fn param_exp_replace(&mut self, pe: &mut ParamExp) -> PResult<()> {
        self.lex.bump_byte(); // the /
        let all = self.lex.peek() == Some(b'/');
        if all {
            self.lex.bump_byte();
        }
        let (orig, _) = self.param_exp_word(pe.dollar, QuoteState::ParamExpRepl)?;
        let mut with = None;
        let rbrace;
        if self.lex.tok == Token::Slash {
            let (word, pos) = self.param_exp_word(pe.dollar, QuoteState::ParamExpExp)?;
            with = word;
            rbrace = pos;
        } else {
            rbrace = self.lex.pos;
        }
        pe.rbrace = rbrace;
        pe.repl = Some(Box::new(Replace { all, orig, with }));
        Ok(())
    }

    /// Parses an assignment word like `a[i]+=v`, the literal being the
    /// current token. Afterwards the current token follows the assignment.
    pub(crate) fn get_assign(&mut self) -> PResult<Assign> {
        let val = std::mem::take(&mut self.lex.val);
        let pos = self.lex.pos;
        let lit_end = self.lex.cur_pos();
        let Some(split) = scan_assign(&val) else {
            return self.err(pos, format!("{val:?} is not a valid assignment"));
        };
        let name = Lit::new(&val[..split.name_end], pos, pos.advance(split.name_end as u32));
        let index = match split.index {
            Some((a, b)) => {
                let expr = self.parse_arithm_snippet(&val[a..b], pos.advance(a as u32))?;
                Some(Box::new(expr))
            }
            None => None,
        };
        let remainder = &val[split.value_start..];
        let ends_word = self.lex.tok == Token::LitWord;
        self.next()?;
        let mut parts = Vec::new();
        if !remainder.is_empty() {
            parts.push(WordPart::Lit(Lit::new(
                remainder,
                pos.advance(split.value_start as u32),
                lit_end,
            )));
        }
        if parts.is_empty()
            && self.lex.tok == Token::LeftParen
            && !self.lex.spaced
            && self.cfg.variant != LangVariant::Posix
        {
            let array = self.get_array()?;
            return Ok(Assign {
                append: split.append,
                naked: false,
                name: Some(name),
                index,
                value: None,
                array: Some(Box::new(array)),
            });
        }
        if !ends_word {
            while !self.lex.spaced && !self.lex.new_line && self.starts_word() {
                let ends = self.lex.tok == Token::LitWord;
                let part = self.word_part()?;
                parts.push(part);
                self.next()?;
                if ends {
                    break;
                }
            }
        }
        Ok(Assign {
            append: split.append,
            naked: false,
            name: Some(name),
            index,
            value: if parts.is_empty() {
                None
            } else {
                Some(Word::new(parts))
            },
            array: None,
        })
    }

    fn get_array(&mut self) -> PResult<ArrayExpr> {
        let lparen = self.lex.pos;
        self.next()?;
        let mut elems = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.lex.tok == Token::RightParen {
                break;
            }
            if !self.starts_word() {
                return self.err(lparen, "reached EOF without matching ( with )");
            }
            let word = self.get_word()?;
            elems.push(self.split_array_elem(word)?);
        }
        let rparen = self.lex.pos;
        self.next()?;
        Ok(ArrayExpr {
            lparen,
            rparen,
            elems,
        })
    }

    /// Splits a `[index]=value` prefix off an array element word.
    fn split_array_elem(&mut self, word: Word) -> PResult<ArrayElem> {
        let Some(WordPart::Lit(first)) = word.parts.first() else {
            return Ok(ArrayElem {
                index: None,
                value: word,
            });
        };
        let bytes = first.value.as_bytes();
        if bytes.first() != Some(&b'[') {
            return Ok(ArrayElem {
                index: None,
                value: word,
            });
        }
        let mut depth = 0usize;
        let mut close = None;
        for (i, b) in bytes.iter().enumerate() {
            match b {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return Ok(ArrayElem {
                index: None,
                value: word,
            });
        };
        if bytes.get(close + 1) != Some(&b'=') {
            return Ok(ArrayElem {
                index: None,
                value: word,
            });
        }
        let first = first.clone();
        let index = self.parse_arithm_snippet(
            &first.value[1..close],
            first.value_pos.advance(1),
        )?;
        let remainder = &first.value[close + 2..];
        let mut parts = Vec::new();
        if !remainder.is_empty() {
            parts.push(WordPart::Lit(Lit::new(
                remainder,
                first.value_pos.advance(close as u32 + 2),
                first.value_end,
            )));
        }
        parts.extend(word.parts.into_iter().skip(1));
        if parts.is_empty() {
            let at = first.value_end;
            parts.push(WordPart::Lit(Lit::new("", at, at)));
        }
        Ok(ArrayElem {
            index: Some(Box::new(index)),
            value: Word::new(parts),
        })
    }

    /// Whether the current token begins a redirection, including the
    /// `2>`-style file descriptor prefix forms.
    pub(crate) fn peek_redirect(&self) -> bool {
        match self.lex.tok {
            Token::RdrOut
            | Token::AppOut
            | Token::RdrIn
            | Token::RdrInOut
            | Token::DplIn
            | Token::DplOut
            | Token::ClbOut
            | Token::Hdoc
            | Token::DashHdoc
            | Token::WordHdoc
            | Token::RdrAll
            | Token::AppAll => true,
            Token::Lit | Token::LitWord => {
                let val = self.lex.val.as_str();
                let fd_like = !val.is_empty() && val.bytes().all(|b| b.is_ascii_digit());
                let var_like = val.len() > 2 && val.starts_with('{') && val.ends_with('}');
                (fd_like || var_like) && matches!(self.lex.peek(), Some(b'<' | b'>'))
            }
            _ => false,
        }
    }

    pub(crate) fn redirect(&mut self) -> PResult<Redirect> {
        let n = if matches!(self.lex.tok, Token::Lit | Token::LitWord) {
            let lit = Lit::new(
                std::mem::take(&mut self.lex.val),
                self.lex.pos,
                self.lex.cur_pos(),
            );
            self.next()?;
            Some(lit)
        } else {
            None
        };
        let op_pos = self.lex.pos;
        let Ok(op) = RedirOp::try_from(self.lex.tok) else {
            let tok = self.lex.tok;
            return self.err(op_pos, format!("{tok} is not a valid redirection operator"));
        };
        self.next()?;
        if !self.starts_word() {
            return self.err(op_pos, format!("{op} must be followed by a word"));
        }
        let word = self.get_word()?;
        if op.is_heredoc() {
            let (delim, quoted) = heredoc_delim(&word);
            self.pending_heredocs.push(HeredocSpec {
                strip_tabs: op == RedirOp::DashHeredoc,
                delim,
                expandable: !quoted,
                op_pos,
            });
        }
        Ok(Redirect {
            op_pos,
            op,
            n,
            word,
            hdoc: None,
        })
    }

    /// Reads the bodies of all pending here-documents, in FIFO order.
    pub(crate) fn read_pending_heredocs(&mut self) -> PResult<()> {
        let specs = std::mem::take(&mut self.pending_heredocs);
        for spec in specs {
            let saved = self.lex.quote;
            self.lex.quote = if spec.strip_tabs {
                QuoteState::HdocBodyTabs
            } else {
                QuoteState::HdocBody
            };
            let body =
                self.read_heredoc_body(spec.strip_tabs, Some(&spec.delim), spec.expandable, spec.op_pos)?;
            self.lex.quote = saved;
            self.bodies.insert(spec.op_pos.offset(), body);
        }
        Ok(())
    }

    /// Reads one here-document body up to its delimiter line, or to EOF
    /// when `delim` is `None`.
    pub(crate) fn read_heredoc_body(
        &mut self,
        strip_tabs: bool,
        delim: Option<&str>,
        expandable: bool,
        op_pos: Pos,
    ) -> PResult<Word> {
        let start = self.lex.cur_pos();
        let mut parts = Vec::new();
        loop {
            match self.lex.heredoc_token(strip_tabs, delim, expandable) {
                HdocToken::Lit => {
                    let value = std::mem::take(&mut self.lex.val);
                    parts.push(WordPart::Lit(Lit::new(value, self.lex.pos, self.lex.cur_pos())));
                }
                HdocToken::Open => {
                    let part = self.word_part()?;
                    parts.push(part);
                }
                HdocToken::End => break,
                HdocToken::Eof => {
                    let delim = delim.unwrap_or_default().to_string();
                    return self.err(
                        op_pos,
                        format!("reached EOF without matching heredoc delimiter {delim:?}"),
                    );
                }
            }
        }
        if parts.is_empty() {
            parts.push(WordPart::Lit(Lit::new("", start, start)));
        }
        Ok(Word::new(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_scanning() {
        assert!(is_assign_start("a=1"));
        assert!(is_assign_start("a="));
        assert!(is_assign_start("a+=x"));
        assert!(is_assign_start("a[1+2]=x"));
        assert!(!is_assign_start("1a=x"));
        assert!(!is_assign_start("a"));
        assert!(!is_assign_start("=x"));

        let split = scan_assign("foo[i]=bar").unwrap();
        assert_eq!(split.name_end, 3);
        assert_eq!(split.index, Some((4, 5)));
        assert!(!split.append);
        assert_eq!(split.value_start, 7);
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_name("foo"));
        assert!(is_valid_name("_x1"));
        assert!(!is_valid_name("1x"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a-b"));
    }
}
