// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! `printf`-style formatting and `read`-style field splitting
//!
//! These are the string-level helpers shells build their `printf` and
//! `read` builtins from. [`format`] consumes arguments for `%` directives
//! and reports how many it used, so callers can loop the format over
//! remaining arguments the way `printf` does. [`c_unescape`] decodes the
//! backslash escapes shared by `$'…'` strings, the `%b` directive, and
//! `${var@E}`.

use crate::Config;

/// Decodes C-style backslash escapes.
///
/// Recognized: `\a \b \e \E \f \n \r \t \v \\ \' \"`, octal `\NNN` (up to
/// three digits), hex `\xNN`, and `\uNNNN` / `\UNNNNNNNN`. An unknown
/// escape keeps its backslash.
#[must_use]
pub fn c_unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('a') => {
                chars.next();
                out.push('\u{7}');
            }
            Some('b') => {
                chars.next();
                out.push('\u{8}');
            }
            Some('e' | 'E') => {
                chars.next();
                out.push('\u{1b}');
            }
            Some('f') => {
                chars.next();
                out.push('\u{c}');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('v') => {
                chars.next();
                out.push('\u{b}');
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('\'') => {
                chars.next();
                out.push('\'');
            }
            Some('"') => {
                chars.next();
                out.push('"');
            }
            Some('x') => {
                chars.next();
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    out.push_str("\\x");
                } else if let Some(c) = char::from_u32(value) {
                    out.push(c);
                }
            }
            Some('u') | Some('U') => {
                let max_digits = if chars.next() == Some('u') { 4 } else { 8 };
                let mut value = 0u32;
                let mut digits = 0;
                while digits < max_digits {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            value = value.saturating_mul(16).saturating_add(d);
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                match (digits, char::from_u32(value)) {
                    (0, _) => out.push_str(if max_digits == 4 { "\\u" } else { "\\U" }),
                    (_, Some(c)) => out.push(c),
                    (_, None) => {}
                }
            }
            Some(d) if d.is_digit(8) => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 3 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if let Some(c) = char::from_u32(value) {
                    out.push(c);
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn parse_int(s: &str) -> i64 {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).unwrap_or(0)
    } else {
        digits.parse().unwrap_or(0)
    };
    if negative { value.wrapping_neg() } else { value }
}

#[derive(Clone, Copy, Default)]
struct Flags {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
}

fn pad(flags: Flags, body: String) -> String {
    if body.len() >= flags.width {
        return body;
    }
    let fill = flags.width - body.len();
    if flags.minus {
        let mut out = body;
        out.extend(std::iter::repeat_n(' ', fill));
        out
    } else if flags.zero && !body.starts_with(' ') {
        // Zero padding goes between the sign and the digits.
        let (sign, digits) = match body.strip_prefix(['-', '+']) {
            Some(rest) => (&body[..1], rest),
            None => ("", body.as_str()),
        };
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}

fn signed_body(flags: Flags, value: i64) -> String {
    if value >= 0 {
        if flags.plus {
            format!("+{value}")
        } else if flags.space {
            format!(" {value}")
        } else {
            value.to_string()
        }
    } else {
        value.to_string()
    }
}

/// Formats `format` with `args` the way the shell `printf` builtin does,
/// returning the output and how many arguments were consumed.
///
/// Directives: `%s`, `%b` (with escape expansion), `%c`, `%d`/`%i`,
/// `%u`, `%o`, `%x`/`%X`, and `%%`; flags `-`, `+`, space, `0`, and a
/// field width. Escape sequences in the format itself are decoded as by
/// [`c_unescape`]. A missing argument formats as the empty string or 0.
pub fn format(format: &str, args: &[String]) -> Result<(String, usize), crate::Error> {
    fn next_arg<'x>(args: &'x [String], used: &mut usize) -> &'x str {
        let arg = args.get(*used).map_or("", String::as_str);
        *used += 1;
        arg
    }
    let mut out = String::new();
    let mut used = 0usize;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // Delegate a two-character escape to the shared decoder.
                let mut esc = String::from('\\');
                if let Some(&next) = chars.peek() {
                    esc.push(next);
                    chars.next();
                    // Multi-digit escapes need their tail.
                    if matches!(next, 'x' | 'u' | 'U' | '0'..='7') {
                        let max = match next {
                            'x' => 2,
                            'u' => 4,
                            'U' => 8,
                            _ => 2,
                        };
                        let radix = if next.is_ascii_digit() { 8 } else { 16 };
                        let mut taken = 0;
                        while taken < max {
                            match chars.peek() {
                                Some(&d) if d.is_digit(radix) => {
                                    esc.push(d);
                                    chars.next();
                                    taken += 1;
                                }
                                _ => break,
                            }
                        }
                    }
                }
                out.push_str(&c_unescape(&esc));
            }
            '%' => {
                let mut flags = Flags::default();
                loop {
                    match chars.peek() {
                        Some('-') => flags.minus = true,
                        Some('+') => flags.plus = true,
                        Some(' ') => flags.space = true,
                        Some('0') => flags.zero = true,
                        _ => break,
                    }
                    chars.next();
                }
                while let Some(&d) = chars.peek() {
                    let Some(d) = d.to_digit(10) else { break };
                    flags.width = flags.width * 10 + d as usize;
                    chars.next();
                }
                match chars.next() {
                    Some('%') => out.push('%'),
                    Some('s') => {
                        let arg = next_arg(args, &mut used).to_string();
                        out.push_str(&pad(flags, arg));
                    }
                    Some('b') => {
                        let arg = c_unescape(next_arg(args, &mut used));
                        out.push_str(&pad(flags, arg));
                    }
                    Some('c') => {
                        let arg: String =
                            next_arg(args, &mut used).chars().take(1).collect();
                        out.push_str(&pad(flags, arg));
                    }
                    Some('d' | 'i') => {
                        let value = parse_int(next_arg(args, &mut used));
                        out.push_str(&pad(flags, signed_body(flags, value)));
                    }
                    Some('u') => {
                        let value = parse_int(next_arg(args, &mut used)) as u64;
                        out.push_str(&pad(flags, value.to_string()));
                    }
                    Some('o') => {
                        let value = parse_int(next_arg(args, &mut used)) as u64;
                        out.push_str(&pad(flags, format!("{value:o}")));
                    }
                    Some('x') => {
                        let value = parse_int(next_arg(args, &mut used)) as u64;
                        out.push_str(&pad(flags, format!("{value:x}")));
                    }
                    Some('X') => {
                        let value = parse_int(next_arg(args, &mut used)) as u64;
                        out.push_str(&pad(flags, format!("{value:X}")));
                    }
                    Some(other) => {
                        out.push('%');
                        out.push(other);
                    }
                    None => out.push('%'),
                }
            }
            other => out.push(other),
        }
    }
    Ok((out, used.min(args.len())))
}

/// Splits input for the shell `read` builtin.
///
/// The input is split on `IFS` the usual way. With `raw`, backslashes are
/// not interpreted; otherwise a backslash escapes the next character,
/// protecting it from splitting. With `n == 1` the whole input (trimmed
/// of leading and trailing IFS whitespace) becomes one field; with
/// `n > 1`, at most `n` fields are returned and the last one absorbs all
/// remaining text.
#[must_use]
pub fn read_fields(cfg: &Config, s: &str, n: usize, raw: bool) -> Vec<String> {
    let ifs = cfg.ifs();
    let is_sep = |c: char| ifs.contains(c);
    let is_ws_sep = |c: char| is_sep(c) && matches!(c, ' ' | '\t' | '\n');
    let trim = |s: &str| -> String {
        s.trim_matches(|c| is_ws_sep(c)).to_string()
    };
    let unescape = |s: &str| -> String {
        if raw {
            return s.to_string();
        }
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    };
    if n <= 1 {
        let trimmed = trim(s);
        return vec![unescape(&trimmed)];
    }
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !raw && c == '\\' {
            cur.push(c);
            if let Some((_, next)) = chars.next() {
                cur.push(next);
            }
            continue;
        }
        if is_sep(c) {
            if cur.is_empty() && is_ws_sep(c) && fields.is_empty() {
                continue; // Leading whitespace.
            }
            fields.push(unescape(&cur));
            cur.clear();
            // Absorb the rest of the delimiter run.
            while let Some(&(_, c)) = chars.peek() {
                if is_ws_sep(c) {
                    chars.next();
                } else {
                    break;
                }
            }
            if fields.len() == n - 1 {
                let rest: String = s[i..]
                    .chars()
                    .skip(1)
                    .skip_while(|&c| is_ws_sep(c))
                    .collect();
                let rest = trim(&rest);
                fields.push(unescape(&rest));
                return fields;
            }
        } else {
            cur.push(c);
        }
    }
    if !cur.is_empty() || fields.len() + 1 == n {
        fields.push(unescape(&cur));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use bish_env::MapEnviron;

    #[test]
    fn unescape_basics() {
        assert_eq!(c_unescape(r"a\tb\n"), "a\tb\n");
        assert_eq!(c_unescape(r"\x41\102"), "AB");
        assert_eq!(c_unescape(r"é"), "é");
        assert_eq!(c_unescape(r"\q"), "\\q");
        assert_eq!(c_unescape(r"\\"), "\\");
    }

    #[test]
    fn format_strings_and_numbers() {
        let args: Vec<String> = vec!["hi".into(), "42".into()];
        let (out, used) = format("%s=%d", &args).unwrap();
        assert_eq!(out, "hi=42");
        assert_eq!(used, 2);
    }

    #[test]
    fn format_widths_and_flags() {
        let args: Vec<String> = vec!["7".into()];
        assert_eq!(format("%5d", &args).unwrap().0, "    7");
        assert_eq!(format("%-5d|", &args).unwrap().0, "7    |");
        assert_eq!(format("%05d", &args).unwrap().0, "00007");
        assert_eq!(format("%+d", &args).unwrap().0, "+7");
        let args: Vec<String> = vec!["-7".into()];
        assert_eq!(format("%05d", &args).unwrap().0, "-0007");
    }

    #[test]
    fn format_bases_and_chars() {
        let args: Vec<String> = vec!["255".into()];
        assert_eq!(format("%x %o", &args).unwrap().0, "ff 377");
        let args: Vec<String> = vec!["word".into()];
        assert_eq!(format("%c", &args).unwrap().0, "w");
        assert_eq!(format("100%%", &[]).unwrap().0, "100%");
    }

    #[test]
    fn format_b_expands_escapes() {
        let args: Vec<String> = vec![r"a\tb".into()];
        assert_eq!(format("%b", &args).unwrap().0, "a\tb");
        // Plain %s leaves them alone.
        assert_eq!(format("%s", &args).unwrap().0, r"a\tb");
    }

    #[test]
    fn format_escapes_in_format_string() {
        assert_eq!(format(r"a\tb", &[]).unwrap().0, "a\tb");
        assert_eq!(format(r"\x41", &[]).unwrap().0, "A");
    }

    #[test]
    fn missing_arguments_format_as_empty_or_zero() {
        assert_eq!(format("%s|%d", &[]).unwrap(), ("|0".to_string(), 0));
    }

    #[test]
    fn read_field_splitting() {
        let mut env = MapEnviron::new();
        let cfg = Config::new(&mut env);
        assert_eq!(read_fields(&cfg, "  a b  c ", 3, true), ["a", "b", "c"]);
        assert_eq!(read_fields(&cfg, "a b c d", 2, true), ["a", "b c d"]);
        assert_eq!(read_fields(&cfg, " whole line ", 1, true), ["whole line"]);
    }

    #[test]
    fn read_backslash_handling() {
        let mut env = MapEnviron::new();
        let cfg = Config::new(&mut env);
        assert_eq!(read_fields(&cfg, r"a\ b c", 2, false), ["a b", "c"]);
        assert_eq!(read_fields(&cfg, r"a\ b c", 2, true), [r"a\", "b c"]);
    }
}
