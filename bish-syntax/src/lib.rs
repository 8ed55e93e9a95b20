// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Parsing for the POSIX shell command language with Bash extensions
//!
//! This crate tokenizes shell source, builds an abstract syntax tree, and
//! prints trees back to source. The pieces:
//!
//! - [`source`]: byte positions, line tables, dialects, and the
//!   [`SyntaxError`](source::SyntaxError) type;
//! - [`token`]: the closed token set and the typed operator enums stored
//!   in the AST;
//! - [`syntax`]: the node hierarchy, rooted at [`File`](syntax::File),
//!   with `Display` implementations that print canonical source;
//! - [`parser`]: the recursive-descent [`Parser`](parser::Parser) with its
//!   [`Config`](parser::Config), plus the [`Interactive`](parser::Interactive)
//!   driver for prompting read-eval-print loops;
//! - [`walk`]: a generic pre-order visitor;
//! - [`simplify`]: safe structural rewrites;
//! - [`braces`]: the brace-expansion pre-pass that turns `{a,b}` and
//!   `{1..9}` literals into [`BraceExp`](syntax::BraceExp) nodes.
//!
//! Parsing a string and printing it back:
//!
//! ```
//! use bish_syntax::parser::{Config, Parser};
//! let parser = Parser::new(Config::default());
//! let file = parser.parse_str("if true; then echo hi; fi", None).unwrap();
//! assert_eq!(file.to_string(), "if true; then echo hi; fi\n");
//! ```
//!
//! The expansion of words (brace, tilde, parameter, arithmetic, command
//! substitution, field splitting, and globbing) lives in the
//! `bish-expand` crate, which consumes the trees built here.

pub mod braces;
mod lexer;
pub mod parser;
pub mod simplify;
pub mod source;
pub mod syntax;
pub mod token;
pub mod walk;
