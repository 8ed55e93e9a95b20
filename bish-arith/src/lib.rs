// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! This crate evaluates shell arithmetic expressions.
//!
//! The input is the arithmetic AST produced by `bish-syntax` for
//! `$((…))`, `((…))`, `let`, array subscripts, and slice bounds. Values
//! are signed 64-bit integers with C-like wrapping on overflow; division
//! and remainder by zero are errors, as is a negative exponent.
//!
//! The evaluator reaches its environment through the [`Env`] trait:
//! variable reads, assignment writes, and the expansion of operand words
//! (which may contain `$x`, command substitutions, and the like) are all
//! delegated, so the crate itself performs no expansion or I/O. Operand
//! strings that name a variable are dereferenced recursively (`x=y`,
//! `y=2`, then `$((x))` is 2), with the chain bounded at
//! [`MAX_VALUE_DEPTH`] lookups; anything that is neither a name nor a
//! number evaluates to 0, matching shell behavior for unset or garbage
//! operands.
//!
//! Short-circuiting is strict: the untaken branch of `&&`, `||`, and the
//! ternary conditional is never evaluated, so its side effects (such as
//! assignments) do not happen.

use bish_syntax::syntax::{ArithmExpr, BinaryArithm, UnaryArithm, Word};
use bish_syntax::token::{BinAritOp, UnAritOp};
use thiserror::Error;

/// Upper bound on recursive variable-value dereferences.
pub const MAX_VALUE_DEPTH: usize = 100;

/// Errors during arithmetic evaluation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("division by zero")]
    DivisionByZero,
    #[error("exponent less than 0")]
    NegativeExponent,
    /// An assignment or increment whose target is not a variable name.
    #[error("{0}: not an lvalue")]
    BadLvalue(String),
    /// A failure reported by the environment: a read-only variable, an
    /// expansion error inside an operand, and the like.
    #[error("{0}")]
    Env(String),
}

/// The evaluator's view of its surroundings.
pub trait Env {
    /// Reads a variable's string value; `None` when unset.
    fn get(&mut self, name: &str) -> Result<Option<String>, Error>;

    /// Assigns a variable. The name may carry a subscript, as in `a[1]`.
    fn set(&mut self, name: &str, value: i64) -> Result<(), Error>;

    /// Expands an operand word to its string form.
    fn expand(&mut self, word: &Word) -> Result<String, Error>;
}

/// A plain map of scalar strings; the smallest possible [`Env`].
impl Env for std::collections::HashMap<String, String> {
    fn get(&mut self, name: &str) -> Result<Option<String>, Error> {
        Ok(std::collections::HashMap::get(self, name).cloned())
    }

    fn set(&mut self, name: &str, value: i64) -> Result<(), Error> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn expand(&mut self, word: &Word) -> Result<String, Error> {
        Ok(word.to_string())
    }
}

/// Evaluates an arithmetic expression against an environment.
pub fn eval(env: &mut impl Env, expr: &ArithmExpr) -> Result<i64, Error> {
    eval_dyn(env, expr)
}

fn eval_dyn(env: &mut dyn Env, expr: &ArithmExpr) -> Result<i64, Error> {
    match expr {
        ArithmExpr::Word(word) => {
            let text = env.expand(word)?;
            operand_value(env, text.trim(), 0)
        }
        ArithmExpr::Paren(paren) => eval_dyn(env, &paren.x),
        ArithmExpr::Unary(unary) => eval_unary(env, unary),
        ArithmExpr::Binary(binary) => eval_binary(env, binary),
    }
}

/// Resolves an operand string: a variable name dereferences recursively,
/// a C-style integer literal parses, anything else is 0.
fn operand_value(env: &mut dyn Env, text: &str, depth: usize) -> Result<i64, Error> {
    if depth > MAX_VALUE_DEPTH {
        return Ok(0);
    }
    if is_name_or_subscript(text) {
        return match env.get(text)? {
            Some(value) => operand_value(env, value.trim(), depth + 1),
            None => Ok(0),
        };
    }
    Ok(parse_integer(text).unwrap_or(0))
}

fn is_name_or_subscript(s: &str) -> bool {
    let name = match s.find('[') {
        Some(open) if s.ends_with(']') => &s[..open],
        Some(_) => return false,
        None => s,
    };
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b == b'_' || b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
}

/// Parses an integer with C-style bases: `0x` hexadecimal, leading `0`
/// octal, decimal otherwise. A leading sign is accepted.
fn parse_integer(s: &str) -> Option<i64> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { value.wrapping_neg() } else { value })
}

/// The name an assignment target must expand to.
fn lvalue_name(env: &mut dyn Env, expr: &ArithmExpr) -> Result<String, Error> {
    let mut expr = expr;
    while let ArithmExpr::Paren(paren) = expr {
        expr = &paren.x;
    }
    let ArithmExpr::Word(word) = expr else {
        return Err(Error::BadLvalue(format!("{expr:?}")));
    };
    let text = env.expand(word)?;
    let text = text.trim().to_string();
    if is_name_or_subscript(&text) {
        Ok(text)
    } else {
        Err(Error::BadLvalue(text))
    }
}

fn eval_unary(env: &mut dyn Env, unary: &UnaryArithm) -> Result<i64, Error> {
    match unary.op {
        UnAritOp::Inc | UnAritOp::Dec => {
            let name = lvalue_name(env, &unary.x)?;
            let old = match env.get(&name)? {
                Some(value) => operand_value(env, value.trim(), 1)?,
                None => 0,
            };
            let delta = if unary.op == UnAritOp::Inc { 1 } else { -1 };
            let new = old.wrapping_add(delta);
            env.set(&name, new)?;
            Ok(if unary.post { old } else { new })
        }
        UnAritOp::Plus => eval_dyn(env, &unary.x),
        UnAritOp::Minus => Ok(eval_dyn(env, &unary.x)?.wrapping_neg()),
        UnAritOp::Not => Ok((eval_dyn(env, &unary.x)? == 0) as i64),
        UnAritOp::BitNegation => Ok(!eval_dyn(env, &unary.x)?),
    }
}

fn eval_binary(env: &mut dyn Env, binary: &BinaryArithm) -> Result<i64, Error> {
    use BinAritOp::*;
    match binary.op {
        AndArit => {
            if eval_dyn(env, &binary.x)? == 0 {
                return Ok(0);
            }
            return Ok((eval_dyn(env, &binary.y)? != 0) as i64);
        }
        OrArit => {
            if eval_dyn(env, &binary.x)? != 0 {
                return Ok(1);
            }
            return Ok((eval_dyn(env, &binary.y)? != 0) as i64);
        }
        Quest => {
            // The parser encodes `c ? a : b` as Quest(c, Colon(a, b)).
            let ArithmExpr::Binary(branches) = &binary.y else {
                return Err(Error::BadLvalue("malformed conditional".to_string()));
            };
            let taken = if eval_dyn(env, &binary.x)? != 0 {
                &branches.x
            } else {
                &branches.y
            };
            return eval_dyn(env, taken);
        }
        Colon => {
            // Only reachable for a stray colon; treat as a comma would be
            // wrong, so surface it.
            return Err(Error::BadLvalue(":".to_string()));
        }
        Comma => {
            eval_dyn(env, &binary.x)?;
            return eval_dyn(env, &binary.y);
        }
        _ => {}
    }
    if binary.op.is_assign() {
        let name = lvalue_name(env, &binary.x)?;
        let rhs = eval_dyn(env, &binary.y)?;
        let new = if binary.op == Assgn {
            rhs
        } else {
            let old = match env.get(&name)? {
                Some(value) => operand_value(env, value.trim(), 1)?,
                None => 0,
            };
            apply(op_of_assign(binary.op), old, rhs)?
        };
        env.set(&name, new)?;
        return Ok(new);
    }
    let lhs = eval_dyn(env, &binary.x)?;
    let rhs = eval_dyn(env, &binary.y)?;
    apply(binary.op, lhs, rhs)
}

fn op_of_assign(op: BinAritOp) -> BinAritOp {
    use BinAritOp::*;
    match op {
        AddAssgn => Add,
        SubAssgn => Sub,
        MulAssgn => Mul,
        QuoAssgn => Quo,
        RemAssgn => Rem,
        AndAssgn => And,
        OrAssgn => Or,
        XorAssgn => Xor,
        ShlAssgn => Shl,
        ShrAssgn => Shr,
        other => other,
    }
}

fn apply(op: BinAritOp, lhs: i64, rhs: i64) -> Result<i64, Error> {
    use BinAritOp::*;
    Ok(match op {
        Add => lhs.wrapping_add(rhs),
        Sub => lhs.wrapping_sub(rhs),
        Mul => lhs.wrapping_mul(rhs),
        Quo => {
            if rhs == 0 {
                return Err(Error::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        Rem => {
            if rhs == 0 {
                return Err(Error::DivisionByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        Pow => {
            if rhs < 0 {
                return Err(Error::NegativeExponent);
            }
            let mut result: i64 = 1;
            for _ in 0..rhs {
                result = result.wrapping_mul(lhs);
            }
            result
        }
        Eql => (lhs == rhs) as i64,
        Neq => (lhs != rhs) as i64,
        Leq => (lhs <= rhs) as i64,
        Geq => (lhs >= rhs) as i64,
        Lss => (lhs < rhs) as i64,
        Gtr => (lhs > rhs) as i64,
        And => lhs & rhs,
        Or => lhs | rhs,
        Xor => lhs ^ rhs,
        Shl => lhs.wrapping_shl(rhs as u32),
        Shr => lhs.wrapping_shr(rhs as u32),
        other => return Err(Error::BadLvalue(other.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_syntax::parser::{Config, Parser};
    use bish_syntax::syntax::{Command, WordPart};
    use std::collections::HashMap;

    /// Parses the expression of `(( src ))`.
    fn expr(src: &str) -> ArithmExpr {
        let file = Parser::new(Config::default())
            .parse_str(&format!("(({src}))"), None)
            .unwrap();
        match file.stmts.into_iter().next().unwrap().cmd {
            Some(Command::Arithm(cmd)) => cmd.expr,
            other => panic!("expected an arithmetic command, got {other:?}"),
        }
    }

    fn eval_str(env: &mut HashMap<String, String>, src: &str) -> Result<i64, Error> {
        eval(env, &expr(src))
    }

    #[test]
    fn constants_and_bases() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "42"), Ok(42));
        assert_eq!(eval_str(env, "0x10"), Ok(16));
        assert_eq!(eval_str(env, "010"), Ok(8));
        assert_eq!(eval_str(env, "0"), Ok(0));
    }

    #[test]
    fn precedence_and_parens() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "1 + 2 * 3"), Ok(7));
        assert_eq!(eval_str(env, "(1 + 2) * 3"), Ok(9));
        assert_eq!(eval_str(env, "2 + 5 - 3"), Ok(4));
        assert_eq!(eval_str(env, "6 - (7 - 3) * 2"), Ok(-2));
    }

    #[test]
    fn unset_and_garbage_operands_are_zero() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "nosuch + 1"), Ok(1));
        env.insert("junk".to_string(), "not a number".to_string());
        assert_eq!(eval_str(env, "junk"), Ok(0));
    }

    #[test]
    fn recursive_variable_dereference() {
        let env = &mut HashMap::new();
        env.insert("x".to_string(), "y".to_string());
        env.insert("y".to_string(), " 7 ".to_string());
        assert_eq!(eval_str(env, "x"), Ok(7));

        // A cycle bottoms out at zero instead of looping.
        env.insert("a".to_string(), "b".to_string());
        env.insert("b".to_string(), "a".to_string());
        assert_eq!(eval_str(env, "a"), Ok(0));
    }

    #[test]
    fn assignment_family() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "x = 5"), Ok(5));
        assert_eq!(env["x"], "5");
        assert_eq!(eval_str(env, "x += 3"), Ok(8));
        assert_eq!(eval_str(env, "x *= 2"), Ok(16));
        assert_eq!(eval_str(env, "x >>= 2"), Ok(4));
        assert_eq!(eval_str(env, "x <<= 1"), Ok(8));
        assert_eq!(eval_str(env, "x %= 3"), Ok(2));
        assert_eq!(env["x"], "2");
    }

    #[test]
    fn increment_and_decrement() {
        let env = &mut HashMap::new();
        env.insert("i".to_string(), "5".to_string());
        assert_eq!(eval_str(env, "i++"), Ok(5));
        assert_eq!(env["i"], "6");
        assert_eq!(eval_str(env, "++i"), Ok(7));
        assert_eq!(eval_str(env, "i--"), Ok(7));
        assert_eq!(eval_str(env, "--i"), Ok(5));
        assert_eq!(env["i"], "5");
    }

    #[test]
    fn increment_requires_an_lvalue() {
        use assert_matches::assert_matches;
        let env = &mut HashMap::new();
        assert_matches!(eval_str(env, "4++"), Err(Error::BadLvalue(_)));
    }

    #[test]
    fn ternary_short_circuits() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "1 ? (a = 3) : (b = 4)"), Ok(3));
        assert_eq!(HashMap::get(env, "a").map(String::as_str), Some("3"));
        assert_eq!(HashMap::get(env, "b"), None);

        assert_eq!(eval_str(env, "0 ? (c = 3) : (d = 4)"), Ok(4));
        assert_eq!(HashMap::get(env, "c"), None);
        assert_eq!(HashMap::get(env, "d").map(String::as_str), Some("4"));
    }

    #[test]
    fn logic_short_circuits() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "0 && (a = 1)"), Ok(0));
        assert_eq!(HashMap::get(env, "a"), None);
        assert_eq!(eval_str(env, "1 || (b = 1)"), Ok(1));
        assert_eq!(HashMap::get(env, "b"), None);
        assert_eq!(eval_str(env, "2 && 3"), Ok(1));
        assert_eq!(eval_str(env, "0 || 0"), Ok(0));
    }

    #[test]
    fn comma_evaluates_left_for_effect() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "x = 1, x + 10"), Ok(11));
        assert_eq!(env["x"], "1");
    }

    #[test]
    fn division_and_remainder_by_zero() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "1 / 0"), Err(Error::DivisionByZero));
        assert_eq!(eval_str(env, "1 % 0"), Err(Error::DivisionByZero));
    }

    #[test]
    fn power_operator() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "2 ** 10"), Ok(1024));
        assert_eq!(eval_str(env, "(-2) ** 3"), Ok(-8));
        assert_eq!(eval_str(env, "-2 ** 2"), Ok(-4));
        assert_eq!(eval_str(env, "5 ** 0"), Ok(1));
        assert_eq!(eval_str(env, "2 ** -1"), Err(Error::NegativeExponent));
    }

    #[test]
    fn comparisons_and_bitwise() {
        let env = &mut HashMap::new();
        assert_eq!(eval_str(env, "3 < 5"), Ok(1));
        assert_eq!(eval_str(env, "5 <= 5"), Ok(1));
        assert_eq!(eval_str(env, "3 > 5"), Ok(0));
        assert_eq!(eval_str(env, "1 == 1"), Ok(1));
        assert_eq!(eval_str(env, "1 != 1"), Ok(0));
        assert_eq!(eval_str(env, "3 | 5"), Ok(7));
        assert_eq!(eval_str(env, "3 & 5"), Ok(1));
        assert_eq!(eval_str(env, "3 ^ 5"), Ok(6));
        assert_eq!(eval_str(env, "~0"), Ok(-1));
        assert_eq!(eval_str(env, "!3"), Ok(0));
        assert_eq!(eval_str(env, "!0"), Ok(1));
        assert_eq!(eval_str(env, "5 << 3"), Ok(40));
        assert_eq!(eval_str(env, "64 >> 3"), Ok(8));
    }

    #[test]
    fn wrapping_instead_of_overflow_errors() {
        let env = &mut HashMap::new();
        assert_eq!(
            eval_str(env, "9223372036854775807 + 1"),
            Ok(i64::MIN),
        );
    }

    #[test]
    fn operand_words_are_expanded_through_the_env() {
        // A literal word round-trips through Env::expand; the HashMap
        // impl just prints it, so `1+2` inside a word is not re-parsed.
        let env = &mut HashMap::new();
        let word_expr = expr("7");
        assert!(matches!(
            &word_expr,
            ArithmExpr::Word(w) if matches!(w.parts[0], WordPart::Lit(_))
        ));
        assert_eq!(eval(env, &word_expr), Ok(7));
    }
}
