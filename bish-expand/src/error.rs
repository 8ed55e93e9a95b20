// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! Errors surfaced by the expansion engine

use bish_syntax::source::Pos;
use thiserror::Error;

/// Anything that can go wrong while expanding words.
#[derive(Debug, Error)]
pub enum Error {
    /// `${var:?message}` hit an unset or null variable, or `NoUnset` was
    /// set and an unset variable was read.
    #[error("{message}")]
    UnsetParameter {
        /// Position of the expansion, when known.
        pos: Pos,
        message: String,
    },

    /// A command substitution was found but the configuration carries no
    /// `cmd_subst` handler.
    #[error("cannot expand command substitution: no handler configured")]
    UnexpectedCommand { pos: Pos },

    /// A process substitution was found but the configuration carries no
    /// `proc_subst` handler.
    #[error("cannot expand process substitution: no handler configured")]
    UnexpectedProcess { pos: Pos },

    /// A `${var@P}`-style transformation this engine does not provide.
    #[error("unsupported parameter transformation: @{op}")]
    NotImplemented { op: String },

    /// A glob or replacement pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] bish_fnmatch::Error),

    /// Arithmetic evaluation failed, for example with a division by zero.
    #[error(transparent)]
    Arith(#[from] bish_arith::Error),

    /// An assignment side effect hit a read-only variable.
    #[error(transparent)]
    Assign(#[from] bish_env::AssignError),

    /// The environment has no writable view but an expansion needed one.
    #[error("environment is read-only; cannot assign {0}")]
    ReadOnlyEnviron(String),

    /// An error from a `cmd_subst`, `proc_subst`, or `read_dir` callback.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
