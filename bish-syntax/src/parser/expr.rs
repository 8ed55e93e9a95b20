// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Arithmetic and test expression parsing
//!
//! Arithmetic expressions are parsed by precedence climbing over the C
//! operator set, with the ternary conditional encoded as nested binaries
//! (`a ? b : c` is `Quest(a, Colon(b, c))`). In `let` mode, whitespace
//! terminates an expression so that `let a=1 b=2` yields two expressions.
//!
//! `[[ … ]]` expressions use the usual `||` / `&&` / `!` / parentheses
//! grammar over unary and binary operator words; the right-hand side of
//! `=~` is read in a lexer mode that only splits words on whitespace at the
//! top parenthesis level.

use super::{PResult, Run};
use crate::lexer::QuoteState;
use crate::source::Pos;
use crate::syntax::*;
use crate::token::{BinAritOp, BinTestOp, Token, UnAritOp, UnTestOp};

/// Binding power of a binary operator; higher binds tighter.
fn prec(op: BinAritOp) -> u8 {
    use BinAritOp::*;
    match op {
        Comma => 1,
        Assgn | AddAssgn | SubAssgn | MulAssgn | QuoAssgn | RemAssgn | AndAssgn | OrAssgn
        | XorAssgn | ShlAssgn | ShrAssgn => 2,
        Quest | Colon => 3,
        OrArit => 4,
        AndArit => 5,
        Or => 6,
        Xor => 7,
        And => 8,
        Eql | Neq => 9,
        Lss | Gtr | Leq | Geq => 10,
        Shl | Shr => 11,
        Add | Sub => 12,
        Mul | Quo | Rem => 13,
        Pow => 14,
    }
}

const POW_PREC: u8 = 14;

fn right_assoc(op: BinAritOp) -> bool {
    op.is_assign() || op == BinAritOp::Pow
}

impl Run<'_, '_> {
    fn skip_arith_newlines(&mut self) -> PResult<()> {
        while !self.arith_let && self.lex.tok == Token::Newl {
            self.next()?;
        }
        Ok(())
    }

    /// Parses an arithmetic expression, consuming binary operators of
    /// precedence `min_prec` or higher.
    pub(crate) fn arithm_expr(&mut self, min_prec: u8) -> PResult<ArithmExpr> {
        self.skip_arith_newlines()?;
        let mut x = self.arithm_unary()?;
        loop {
            self.skip_arith_newlines()?;
            if self.arith_let && self.lex.spaced {
                break;
            }
            let op = match BinAritOp::try_from(self.lex.tok) {
                Ok(BinAritOp::Colon) => break,
                Ok(op) => op,
                Err(_) => break,
            };
            let op_prec = prec(op);
            if op_prec < min_prec {
                break;
            }
            let op_pos = self.lex.pos;
            self.next()?;
            if op == BinAritOp::Quest {
                // Ternary: the middle operand extends to the matching
                // colon; the tail is parsed right-associatively.
                let mid = self.arithm_expr(0)?;
                self.skip_arith_newlines()?;
                if self.lex.tok != Token::Colon {
                    return self.err(op_pos, "? must be followed by an expression and :");
                }
                let colon_pos = self.lex.pos;
                self.next()?;
                let tail = self.arithm_expr(op_prec)?;
                let branches = ArithmExpr::Binary(Box::new(BinaryArithm {
                    op_pos: colon_pos,
                    op: BinAritOp::Colon,
                    x: mid,
                    y: tail,
                }));
                x = ArithmExpr::Binary(Box::new(BinaryArithm {
                    op_pos,
                    op,
                    x,
                    y: branches,
                }));
                continue;
            }
            let next_min = if right_assoc(op) { op_prec } else { op_prec + 1 };
            let y = self.arithm_expr(next_min)?;
            x = ArithmExpr::Binary(Box::new(BinaryArithm { op_pos, op, x, y }));
        }
        Ok(x)
    }

    fn arithm_unary(&mut self) -> PResult<ArithmExpr> {
        self.skip_arith_newlines()?;
        let op_pos = self.lex.pos;
        let op = match self.lex.tok {
            Token::Inc => Some(UnAritOp::Inc),
            Token::Dec => Some(UnAritOp::Dec),
            Token::Plus => Some(UnAritOp::Plus),
            Token::Minus => Some(UnAritOp::Minus),
            Token::Not => Some(UnAritOp::Not),
            Token::BitNot => Some(UnAritOp::BitNegation),
            _ => None,
        };
        if let Some(op) = op {
            self.next()?;
            let x = self.arithm_unary()?;
            // `**` binds tighter than a unary sign: -2**2 is -(2**2).
            let x = self.arithm_maybe_power(x)?;
            return Ok(ArithmExpr::Unary(Box::new(UnaryArithm {
                op_pos,
                op,
                post: false,
                x,
            })));
        }
        if self.lex.tok == Token::LeftParen {
            let lparen = self.lex.pos;
            self.next()?;
            let x = self.arithm_expr(0)?;
            self.skip_arith_newlines()?;
            if self.lex.tok != Token::RightParen {
                return self.err(lparen, "reached EOF without matching ( with )");
            }
            let rparen = self.lex.pos;
            self.next()?;
            return self.arithm_postfix(ArithmExpr::Paren(Box::new(ParenArithm {
                lparen,
                rparen,
                x,
            })));
        }
        let word = self.arithm_operand()?;
        self.arithm_postfix(ArithmExpr::Word(word))
    }

    fn arithm_maybe_power(&mut self, x: ArithmExpr) -> PResult<ArithmExpr> {
        if self.lex.tok != Token::Power || (self.arith_let && self.lex.spaced) {
            return Ok(x);
        }
        let op_pos = self.lex.pos;
        self.next()?;
        let y = self.arithm_expr(POW_PREC)?;
        Ok(ArithmExpr::Binary(Box::new(BinaryArithm {
            op_pos,
            op: BinAritOp::Pow,
            x,
            y,
        })))
    }

    fn arithm_postfix(&mut self, x: ArithmExpr) -> PResult<ArithmExpr> {
        if self.arith_let && self.lex.spaced {
            return Ok(x);
        }
        let op = match self.lex.tok {
            Token::Inc => UnAritOp::Inc,
            Token::Dec => UnAritOp::Dec,
            _ => return Ok(x),
        };
        let op_pos = self.lex.pos;
        self.next()?;
        Ok(ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos,
            op,
            post: true,
            x,
        })))
    }

    /// An arithmetic operand: one or more adjacent word parts.
    fn arithm_operand(&mut self) -> PResult<Word> {
        let mut parts = Vec::new();
        loop {
            match self.lex.tok {
                Token::Lit | Token::LitWord => {
                    let part = self.word_part()?;
                    parts.push(part);
                }
                Token::Star | Token::At
                    if parts.is_empty() && self.lex.quote == QuoteState::ParamExpInd =>
                {
                    // `${a[@]}` and `${a[*]}` subscripts.
                    let value = self.lex.tok.as_str();
                    let pos = self.lex.pos;
                    parts.push(WordPart::Lit(Lit::new(value, pos, pos.advance(1))));
                    self.next()?;
                    break;
                }
                Token::Dollar
                | Token::DollBrace
                | Token::DollParen
                | Token::DollDblParen
                | Token::DollBrack
                | Token::BckQuote
                | Token::SglQuote
                | Token::DollSglQuote
                | Token::DblQuote
                | Token::DollDblQuote => {
                    let part = self.word_part()?;
                    parts.push(part);
                    self.next()?;
                    if self.lex.spaced || self.lex.new_line {
                        break;
                    }
                    continue;
                }
                _ => break,
            }
            // A Lit part leaves no token prefetched; fetch and check
            // adjacency for concatenations like `a$i`.
            self.next()?;
            if self.lex.spaced || self.lex.new_line {
                break;
            }
        }
        if parts.is_empty() {
            let (pos, tok) = (self.lex.pos, self.lex.tok);
            return self.err(pos, format!("{tok} is not a valid arithmetic operand"));
        }
        Ok(Word::new(parts))
    }

    /// Parses `[[ … ]]`, the opening `[[` being the current token.
    pub(crate) fn test_clause(&mut self) -> PResult<TestClause> {
        let left = self.lex.pos;
        self.next()?;
        self.skip_newlines()?;
        if self.val_is("]]") {
            return self.err(left, "[[ must be followed by an expression");
        }
        let expr = self.test_expr_or()?;
        if !self.val_is("]]") {
            return self.err(left, "reached EOF without matching [[ with ]]");
        }
        let right = self.lex.pos;
        self.next()?;
        Ok(TestClause { left, right, expr })
    }

    fn test_expr_or(&mut self) -> PResult<TestExpr> {
        let mut x = self.test_expr_and()?;
        while self.lex.tok == Token::OrOr {
            let op_pos = self.lex.pos;
            self.next()?;
            self.skip_newlines()?;
            let y = self.test_expr_and()?;
            x = TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOp::OrTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn test_expr_and(&mut self) -> PResult<TestExpr> {
        let mut x = self.test_expr_unary()?;
        while self.lex.tok == Token::AndAnd {
            let op_pos = self.lex.pos;
            self.next()?;
            self.skip_newlines()?;
            let y = self.test_expr_unary()?;
            x = TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOp::AndTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn test_expr_unary(&mut self) -> PResult<TestExpr> {
        self.skip_newlines()?;
        if self.val_is("!") {
            let op_pos = self.lex.pos;
            self.next()?;
            let x = self.test_expr_unary()?;
            return Ok(TestExpr::Unary(Box::new(UnaryTest {
                op_pos,
                op: UnTestOp::Not,
                x,
            })));
        }
        if self.lex.tok == Token::LeftParen {
            let lparen = self.lex.pos;
            self.next()?;
            self.skip_newlines()?;
            let x = self.test_expr_or()?;
            if self.lex.tok != Token::RightParen {
                return self.err(lparen, "reached EOF without matching ( with )");
            }
            let rparen = self.lex.pos;
            self.next()?;
            return Ok(TestExpr::Paren(Box::new(ParenTest { lparen, rparen, x })));
        }
        // Unary operator words like -e; `!` and binary spellings are
        // excluded above and by the word check below.
        if matches!(self.lex.tok, Token::Lit | Token::LitWord) {
            if let Some(op) = UnTestOp::from_str_opt(&self.lex.val) {
                let op_pos = self.lex.pos;
                self.next()?;
                if !self.starts_word() {
                    return self.err(op_pos, format!("{op} must be followed by a word"));
                }
                let operand = self.get_word()?;
                return Ok(TestExpr::Unary(Box::new(UnaryTest {
                    op_pos,
                    op,
                    x: TestExpr::Word(operand),
                })));
            }
        }
        if !self.starts_word() {
            let (pos, tok) = (self.lex.pos, self.lex.tok);
            return self.err(pos, format!("{tok} is not a valid test expression"));
        }
        let x = self.get_word()?;
        self.test_expr_binary(TestExpr::Word(x))
    }

    fn test_expr_binary(&mut self, x: TestExpr) -> PResult<TestExpr> {
        let op = match self.lex.tok {
            Token::RdrIn => Some(BinTestOp::Before),
            Token::RdrOut => Some(BinTestOp::After),
            Token::Lit | Token::LitWord => BinTestOp::from_str_opt(&self.lex.val)
                .filter(|op| !matches!(op, BinTestOp::AndTest | BinTestOp::OrTest)),
            _ => None,
        };
        let Some(op) = op else { return Ok(x) };
        let op_pos = self.lex.pos;
        if op == BinTestOp::ReMatch {
            let saved = self.lex.quote;
            self.lex.quote = QuoteState::TestRegexp;
            self.next()?;
            if !self.starts_word() || self.val_is("]]") {
                self.lex.quote = saved;
                return self.err(op_pos, "=~ must be followed by a word");
            }
            let y = self.get_word()?;
            self.lex.quote = saved;
            return Ok(TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op,
                x,
                y: TestExpr::Word(y),
            })));
        }
        self.next()?;
        self.skip_newlines()?;
        if !self.starts_word() {
            return self.err(op_pos, format!("{op} must be followed by a word"));
        }
        let y = self.get_word()?;
        Ok(TestExpr::Binary(Box::new(BinaryTest {
            op_pos,
            op,
            x,
            y: TestExpr::Word(y),
        })))
    }

    /// Re-parses a snippet of already-lexed literal text as an arithmetic
    /// expression, reporting positions as if it were still in the source.
    pub(crate) fn parse_arithm_snippet(&mut self, text: &str, at: Pos) -> PResult<ArithmExpr> {
        let cfg = self.cfg;
        let filename = self.filename.clone();
        let mut sub = Run::new(cfg, text, filename.as_deref(), 0);
        sub.lex = crate::lexer::Lexer::new_snippet(text, cfg.variant, at);
        sub.lex.quote = QuoteState::ParamExpInd;
        sub.next()?;
        let expr = sub.arithm_expr(0)?;
        if sub.lex.tok != Token::Eof {
            let (pos, tok) = (sub.lex.pos, sub.lex.tok);
            return self.err(pos, format!("{tok} is not a valid arithmetic operator"));
        }
        Ok(expr)
    }
}
