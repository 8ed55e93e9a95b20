// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Shell variables and the environment abstraction
//!
//! A [`Variable`] is a typed value (scalar, indexed array, associative
//! array, or name reference) together with its attributes. The expansion
//! engine reads variables through the [`Environ`] trait and, for
//! expansions with side effects like `${x:=default}`, writes them through
//! [`WriteEnviron`].
//!
//! Two ready-made implementations are provided: [`ListEnviron`], a
//! read-only environment built from `NAME=VALUE` strings the way a process
//! environment arrives, and [`MapEnviron`], a writable map used by tests
//! and simple drivers. Any `Fn(&str) -> Option<String>` also works as a
//! read-only environment via [`FuncEnviron`].
//!
//! Name references are followed with [`resolve`], which bounds the chain
//! at [`MAX_NAMEREF_DEPTH`] hops and yields an unset variable on
//! exhaustion, so reference cycles never loop.

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Upper bound on nameref chains before they are treated as unset.
pub const MAX_NAMEREF_DEPTH: usize = 100;

/// The typed value of a shell variable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Value {
    /// No value; reads expand to nothing.
    #[default]
    Unset,
    /// A plain string.
    Scalar(String),
    /// An indexed array. Sparse arrays are stored dense; the expansion
    /// layer does not preserve holes.
    Indexed(Vec<String>),
    /// An associative array with string keys, iterated in key order.
    Associative(BTreeMap<String, String>),
    /// The name of another variable; reads and writes are forwarded.
    NameRef(String),
}

/// A variable: a value plus its attributes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    pub value: Value,
    /// Whether the variable is exported to child processes.
    pub exported: bool,
    /// Whether assignments to the variable fail.
    pub read_only: bool,
    /// Whether the variable is local to a function scope.
    pub local: bool,
}

impl Variable {
    /// An unset variable.
    #[must_use]
    pub fn unset() -> Self {
        Variable::default()
    }

    /// A plain scalar variable.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Variable {
            value: Value::Scalar(value.into()),
            ..Variable::default()
        }
    }

    /// An indexed array variable.
    #[must_use]
    pub fn indexed<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Variable {
            value: Value::Indexed(values.into_iter().map(Into::into).collect()),
            ..Variable::default()
        }
    }

    /// An associative array variable.
    #[must_use]
    pub fn associative<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Variable {
            value: Value::Associative(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Variable::default()
        }
    }

    /// A name reference to another variable.
    #[must_use]
    pub fn name_ref(target: impl Into<String>) -> Self {
        Variable {
            value: Value::NameRef(target.into()),
            ..Variable::default()
        }
    }

    /// Whether the variable holds any value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self.value, Value::Unset)
    }

    /// The scalar view of the value: a scalar itself, or the first element
    /// of an array, the way `$arr` reads element zero.
    #[must_use]
    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            Value::Unset | Value::NameRef(_) => None,
            Value::Scalar(s) => Some(s),
            Value::Indexed(values) => values.first().map(String::as_str),
            Value::Associative(map) => map.get("0").map(String::as_str),
        }
    }
}

/// Error assigning a variable.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AssignError {
    /// The variable has the read-only attribute.
    #[error("{0}: readonly variable")]
    ReadOnly(String),
}

/// Read access to an environment of variables.
pub trait Environ {
    /// Looks a variable up by name. Unknown names yield an unset variable.
    fn get(&self, name: &str) -> Variable;

    /// Visits name/variable pairs in an order that is unspecified but
    /// stable for a given instance; the callback returns whether to
    /// continue.
    fn each(&self, f: &mut dyn FnMut(&str, &Variable) -> bool);

    /// The writable view of this environment, if it has one.
    fn writable(&mut self) -> Option<&mut dyn WriteEnviron> {
        None
    }
}

/// Write access to an environment of variables.
pub trait WriteEnviron: Environ {
    /// Sets a variable, failing on read-only targets.
    fn set(&mut self, name: &str, variable: Variable) -> Result<(), AssignError>;
}

/// Follows nameref chains up to [`MAX_NAMEREF_DEPTH`] hops and returns the
/// final name together with its variable. An exhausted chain yields an
/// unset variable under the original name.
#[must_use]
pub fn resolve(env: &dyn Environ, name: &str) -> (String, Variable) {
    let mut name = name.to_string();
    for _ in 0..MAX_NAMEREF_DEPTH {
        let variable = env.get(&name);
        match variable.value {
            Value::NameRef(target) => name = target,
            _ => return (name, variable),
        }
    }
    (name, Variable::unset())
}

/// Whether a string is a valid shell variable name.
#[must_use]
pub fn valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b == b'_' || b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
}

/// Read-only environment over a list of `NAME=VALUE` strings.
///
/// Malformed entries are discarded, and the last assignment for a name
/// wins, matching how a process environment behaves.
#[derive(Clone, Debug, Default)]
pub struct ListEnviron {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl ListEnviron {
    /// Builds an environment from `NAME=VALUE` strings.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut env = ListEnviron::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some(eq) = pair.find('=') else { continue };
            let (name, value) = (&pair[..eq], &pair[eq + 1..]);
            if !valid_name(name) {
                continue;
            }
            if env
                .entries
                .insert(name.to_string(), value.to_string())
                .is_none()
            {
                env.order.push(name.to_string());
            }
        }
        env
    }
}

impl Environ for ListEnviron {
    fn get(&self, name: &str) -> Variable {
        match self.entries.get(name) {
            Some(value) => Variable {
                exported: true,
                ..Variable::scalar(value.clone())
            },
            None => Variable::unset(),
        }
    }

    fn each(&self, f: &mut dyn FnMut(&str, &Variable) -> bool) {
        for name in &self.order {
            let variable = self.get(name);
            if !f(name, &variable) {
                return;
            }
        }
    }
}

/// Writable environment over a map, for tests and simple drivers.
#[derive(Clone, Debug, Default)]
pub struct MapEnviron {
    vars: BTreeMap<String, Variable>,
}

impl MapEnviron {
    #[must_use]
    pub fn new() -> Self {
        MapEnviron::default()
    }

    /// Convenience constructor from scalar pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MapEnviron {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Variable::scalar(v)))
                .collect(),
        }
    }

    /// Inserts a variable unconditionally, read-only or not.
    pub fn insert(&mut self, name: impl Into<String>, variable: Variable) {
        self.vars.insert(name.into(), variable);
    }
}

impl Environ for MapEnviron {
    fn get(&self, name: &str) -> Variable {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    fn each(&self, f: &mut dyn FnMut(&str, &Variable) -> bool) {
        for (name, variable) in &self.vars {
            if !f(name, variable) {
                return;
            }
        }
    }

    fn writable(&mut self) -> Option<&mut dyn WriteEnviron> {
        Some(self)
    }
}

impl WriteEnviron for MapEnviron {
    fn set(&mut self, name: &str, variable: Variable) -> Result<(), AssignError> {
        if self.vars.get(name).is_some_and(|v| v.read_only) {
            return Err(AssignError::ReadOnly(name.to_string()));
        }
        self.vars.insert(name.to_string(), variable);
        Ok(())
    }
}

/// Read-only environment backed by a lookup function.
pub struct FuncEnviron<F>(pub F);

impl<F: Fn(&str) -> Option<String>> Environ for FuncEnviron<F> {
    fn get(&self, name: &str) -> Variable {
        match (self.0)(name) {
            Some(value) => Variable::scalar(value),
            None => Variable::unset(),
        }
    }

    fn each(&self, _f: &mut dyn FnMut(&str, &Variable) -> bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn list_environ_keeps_last_assignment() {
        let env = ListEnviron::new(["A=1", "B=2", "A=3", "not-valid", "=x", "1X=y"]);
        assert_eq!(env.get("A").str_value(), Some("3"));
        assert_eq!(env.get("B").str_value(), Some("2"));
        assert!(!env.get("not-valid").is_set());
        let mut names = Vec::new();
        env.each(&mut |name, _| {
            names.push(name.to_string());
            true
        });
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn list_environ_values_are_exported() {
        let env = ListEnviron::new(["PATH=/bin"]);
        assert!(env.get("PATH").exported);
    }

    #[test]
    fn map_environ_read_only() {
        let mut env = MapEnviron::new();
        env.insert(
            "x",
            Variable {
                read_only: true,
                ..Variable::scalar("1")
            },
        );
        let err = env.set("x", Variable::scalar("2")).unwrap_err();
        assert_matches!(err, AssignError::ReadOnly(name) if name == "x");
        assert_eq!(env.get("x").str_value(), Some("1"));
    }

    #[test]
    fn nameref_resolution_is_bounded() {
        let mut env = MapEnviron::new();
        env.insert("a", Variable::name_ref("b"));
        env.insert("b", Variable::name_ref("c"));
        env.insert("c", Variable::scalar("deep"));
        let (name, variable) = resolve(&env, "a");
        assert_eq!(name, "c");
        assert_eq!(variable.str_value(), Some("deep"));

        env.insert("x", Variable::name_ref("y"));
        env.insert("y", Variable::name_ref("x"));
        let (_, variable) = resolve(&env, "x");
        assert!(!variable.is_set());
    }

    #[test]
    fn scalar_view_of_arrays() {
        let variable = Variable::indexed(["first", "second"]);
        assert_eq!(variable.str_value(), Some("first"));
        let variable = Variable::associative([("0", "zeroth"), ("k", "v")]);
        assert_eq!(variable.str_value(), Some("zeroth"));
    }

    #[test]
    fn name_validity() {
        assert!(valid_name("foo"));
        assert!(valid_name("_1"));
        assert!(!valid_name("9lives"));
        assert!(!valid_name("a.b"));
        assert!(!valid_name(""));
    }
}
