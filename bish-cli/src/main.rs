// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! The `bish` front-end: parse shell scripts and print them back
//!
//! The driver wires the library crates together without executing
//! anything: input is parsed, and on success the canonical form is
//! printed. Usage:
//!
//! - `bish -c STRING` parses the string;
//! - positional arguments are script paths, parsed in order;
//! - with no arguments, standard input is read: interactively with `$ `
//!   and `> ` prompts when it is a terminal, as a whole script otherwise.
//!
//! The exit status is 0 on success, 1 when any input failed to parse, and
//! 2 for usage errors.

use bish_syntax::parser::{Config, Interactive, Parser};
use bish_syntax::syntax::File;
use std::io::{BufRead, IsTerminal, Read, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let status = run(
        &args,
        &mut stdout.lock(),
        &mut stderr.lock(),
        std::io::stdin().is_terminal(),
    );
    ExitCode::from(status)
}

fn run(
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin_is_terminal: bool,
) -> u8 {
    let parser = Parser::new(Config::default());
    match args {
        [] => {
            if stdin_is_terminal {
                repl(out, err)
            } else {
                let mut source = String::new();
                if std::io::stdin().read_to_string(&mut source).is_err() {
                    let _ = writeln!(err, "bish: error reading standard input");
                    return 1;
                }
                parse_and_print(&parser, &source, None, out, err)
            }
        }
        [flag, rest @ ..] if flag == "-c" => match rest {
            [source] => parse_and_print(&parser, source, None, out, err),
            _ => {
                let _ = writeln!(err, "bish: -c requires exactly one argument");
                2
            }
        },
        paths => {
            for path in paths {
                let source = match std::fs::read(path) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => {
                        let _ = writeln!(err, "bish: {path}: {e}");
                        return 1;
                    }
                };
                let code = parse_and_print(&parser, &source, Some(path), out, err);
                if code != 0 {
                    return code;
                }
            }
            0
        }
    }
}

fn parse_and_print(
    parser: &Parser,
    source: &str,
    name: Option<&str>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    match parser.parse_str(source, name) {
        Ok(file) => {
            let _ = write!(out, "{file}");
            0
        }
        Err(e) => {
            let _ = writeln!(err, "bish: {e}");
            1
        }
    }
}

fn repl(out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    let mut interactive = Interactive::new(Config::default());
    let stdin = std::io::stdin();
    loop {
        let prompt = if interactive.incomplete() { "> " } else { "$ " };
        let _ = write!(out, "{prompt}");
        let _ = out.flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return 0,
            Ok(_) => {}
            Err(e) => {
                let _ = writeln!(err, "bish: {e}");
                return 1;
            }
        }
        match interactive.feed(&line) {
            Ok(stmts) => {
                for stmt in stmts {
                    let file = File {
                        stmts: vec![stmt],
                        ..File::default()
                    };
                    let _ = write!(out, "{file}");
                }
            }
            Err(e) => {
                let _ = writeln!(err, "bish: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(args: &[&str]) -> (u8, String, String) {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&args, &mut out, &mut err, true);
        (
            code,
            String::from_utf8_lossy(&out).into_owned(),
            String::from_utf8_lossy(&err).into_owned(),
        )
    }

    #[test]
    fn dash_c_parses_and_prints() {
        let (code, out, err) = run_capture(&["-c", "echo   hi"]);
        assert_eq!(code, 0);
        assert_eq!(out, "echo hi\n");
        assert!(err.is_empty());
    }

    #[test]
    fn dash_c_reports_parse_errors() {
        let (code, out, err) = run_capture(&["-c", "if true; then"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("reached EOF"));
    }

    #[test]
    fn dash_c_needs_an_argument() {
        let (code, _, err) = run_capture(&["-c"]);
        assert_eq!(code, 2);
        assert!(err.contains("-c requires"));
    }

    #[test]
    fn scripts_parse_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.sh");
        std::fs::File::create(&good)
            .unwrap()
            .write_all(b"a && b\n")
            .unwrap();
        let bad = dir.path().join("bad.sh");
        std::fs::File::create(&bad)
            .unwrap()
            .write_all(b"(\n")
            .unwrap();

        let (code, out, _) = run_capture(&[good.to_str().unwrap()]);
        assert_eq!(code, 0);
        assert_eq!(out, "a && b\n");

        let (code, _, err) =
            run_capture(&[good.to_str().unwrap(), bad.to_str().unwrap()]);
        assert_eq!(code, 1);
        assert!(err.contains("bad.sh:1:1:"));
    }

    #[test]
    fn missing_script_is_an_error() {
        let (code, _, err) = run_capture(&["/no/such/script.sh"]);
        assert_eq!(code, 1);
        assert!(err.contains("/no/such/script.sh"));
    }
}
