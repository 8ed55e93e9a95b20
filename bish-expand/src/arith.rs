// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Bridging arithmetic evaluation to the expansion configuration
//!
//! The `bish-arith` evaluator is generic over an environment; here that
//! environment is the expansion [`Config`]: operand words expand through
//! [`literal`](crate::literal), variable reads resolve namerefs and array
//! subscripts, and assignments write back through the environment's
//! writable view. Subscripts arrive as raw text (`a[i+1]` is one operand
//! after expansion), so they are parsed and evaluated recursively.

use crate::{Config, Error};
use bish_arith::{Env, Error as ArithError};
use bish_env::{resolve, Value, Variable};
use bish_syntax::parser::{Config as ParserConfig, Parser};
use bish_syntax::syntax::{ArithmExpr, Command, Word};

/// Evaluates an arithmetic expression against the expansion config.
pub(crate) fn eval_arithm(cfg: &mut Config, expr: &ArithmExpr) -> Result<i64, Error> {
    let mut env = ArithConfig(cfg);
    bish_arith::eval(&mut env, expr).map_err(Error::from)
}

struct ArithConfig<'x, 'a>(&'x mut Config<'a>);

/// Splits `name[subscript]` into its pieces.
fn split_subscript(s: &str) -> Option<(&str, &str)> {
    let open = s.find('[')?;
    let inner = s.strip_suffix(']')?;
    Some((&s[..open], &inner[open + 1..]))
}

impl ArithConfig<'_, '_> {
    /// Evaluates a raw subscript string as an arithmetic expression.
    fn subscript_value(&mut self, subscript: &str) -> Result<i64, ArithError> {
        let file = Parser::new(ParserConfig::default())
            .parse_str(&format!("(({subscript}))"), None)
            .map_err(|e| ArithError::Env(e.to_string()))?;
        let expr = match file.stmts.into_iter().next().map(|s| s.cmd) {
            Some(Some(Command::Arithm(cmd))) => cmd.expr,
            _ => return Err(ArithError::Env(format!("bad subscript: {subscript}"))),
        };
        bish_arith::eval(self, &expr)
    }

    fn element(&mut self, variable: &Variable, subscript: &str) -> Result<Option<String>, ArithError> {
        match &variable.value {
            Value::Indexed(values) => {
                let mut index = self.subscript_value(subscript)?;
                if index < 0 {
                    index += values.len() as i64;
                }
                if index < 0 {
                    return Ok(None);
                }
                Ok(values.get(index as usize).cloned())
            }
            Value::Associative(map) => Ok(map.get(subscript.trim()).cloned()),
            Value::Scalar(value) => {
                // A scalar behaves as an array with one element at 0.
                let index = self.subscript_value(subscript)?;
                Ok((index == 0).then(|| value.clone()))
            }
            Value::Unset | Value::NameRef(_) => Ok(None),
        }
    }
}

impl Env for ArithConfig<'_, '_> {
    fn get(&mut self, name: &str) -> Result<Option<String>, ArithError> {
        if let Some((base, subscript)) = split_subscript(name) {
            let (_, variable) = resolve(self.0.env, base);
            return self.element(&variable, subscript);
        }
        let (_, variable) = resolve(self.0.env, name);
        Ok(variable.str_value().map(str::to_string))
    }

    fn set(&mut self, name: &str, value: i64) -> Result<(), ArithError> {
        let (base, subscript) = match split_subscript(name) {
            Some((base, subscript)) => (base, Some(subscript.to_string())),
            None => (name, None),
        };
        let (final_name, mut variable) = resolve(self.0.env, base);
        match subscript {
            None => {
                variable.value = Value::Scalar(value.to_string());
            }
            Some(subscript) => match &mut variable.value {
                Value::Associative(map) => {
                    map.insert(subscript.trim().to_string(), value.to_string());
                }
                Value::Indexed(values) => {
                    let mut index = self.subscript_value(&subscript)?;
                    if index < 0 {
                        index += values.len() as i64;
                    }
                    if index < 0 {
                        return Err(ArithError::Env(format!("{name}: bad array subscript")));
                    }
                    let index = index as usize;
                    if index >= values.len() {
                        values.resize(index + 1, String::new());
                    }
                    values[index] = value.to_string();
                }
                _ => {
                    // Assigning a subscript to a scalar makes an array.
                    let index = self.subscript_value(&subscript)?;
                    if index < 0 {
                        return Err(ArithError::Env(format!("{name}: bad array subscript")));
                    }
                    let mut values = vec![String::new(); index as usize + 1];
                    if let Value::Scalar(old) = &variable.value {
                        values[0] = old.clone();
                    }
                    values[index as usize] = value.to_string();
                    variable.value = Value::Indexed(values);
                }
            },
        }
        let Some(writable) = self.0.env.writable() else {
            return Err(ArithError::Env(format!(
                "environment is read-only; cannot assign {final_name}"
            )));
        };
        writable
            .set(&final_name, variable)
            .map_err(|e| ArithError::Env(e.to_string()))
    }

    fn expand(&mut self, word: &Word) -> Result<String, ArithError> {
        crate::literal(self.0, word).map_err(|e| ArithError::Env(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_env::MapEnviron;

    fn expr(src: &str) -> ArithmExpr {
        let file = Parser::new(ParserConfig::default())
            .parse_str(&format!("(({src}))"), None)
            .unwrap();
        match file.stmts.into_iter().next().unwrap().cmd {
            Some(Command::Arithm(cmd)) => cmd.expr,
            other => panic!("expected arithmetic, got {other:?}"),
        }
    }

    #[test]
    fn array_subscripts_read_and_write() {
        let mut env = MapEnviron::new();
        env.insert("a", Variable::indexed(["10", "20", "30"]));
        let mut cfg = Config::new(&mut env);
        assert_eq!(eval_arithm(&mut cfg, &expr("a[1] + 1")).unwrap(), 21);
        assert_eq!(eval_arithm(&mut cfg, &expr("a[-1]")).unwrap(), 30);
        assert_eq!(eval_arithm(&mut cfg, &expr("a[1+1]")).unwrap(), 30);

        assert_eq!(eval_arithm(&mut cfg, &expr("a[4] = 7")).unwrap(), 7);
        let var = cfg.env.get("a");
        assert_eq!(
            var.value,
            Value::Indexed(vec![
                "10".into(),
                "20".into(),
                "30".into(),
                String::new(),
                "7".into()
            ])
        );
    }

    #[test]
    fn nameref_chains_resolve() {
        let mut env = MapEnviron::new();
        env.insert("r", Variable::name_ref("x"));
        env.insert("x", Variable::scalar("5"));
        let mut cfg = Config::new(&mut env);
        assert_eq!(eval_arithm(&mut cfg, &expr("r * 2")).unwrap(), 10);
        assert_eq!(eval_arithm(&mut cfg, &expr("r = 9")).unwrap(), 9);
        assert_eq!(cfg.env.get("x").str_value(), Some("9"));
    }

    #[test]
    fn dollar_expansions_in_operands() {
        let mut env = MapEnviron::from_pairs([("i", "3")]);
        let mut cfg = Config::new(&mut env);
        assert_eq!(eval_arithm(&mut cfg, &expr("$i + 1")).unwrap(), 4);
    }
}
