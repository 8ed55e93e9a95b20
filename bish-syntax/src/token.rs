// This file is part of bish, a shell command language toolkit.
// Copyright (C) 2026 The bish authors

//! The closed set of tokens produced by the lexer
//!
//! [`Token`] classifies what the lexer found; the typed operator enums in
//! this module ([`RedirOp`], [`BinCmdOp`], [`CaseOp`], [`ParExpOp`],
//! [`ProcOp`], [`GlobOp`], [`UnAritOp`], [`BinAritOp`], [`UnTestOp`],
//! [`BinTestOp`]) are the subsets that end up stored in AST nodes. Operator
//! enums convert from [`Token`] with `TryFrom` and print their canonical
//! spelling with `Display`.
//!
//! A few spellings are shared between sub-grammars and deliberately map to a
//! single token: `<` and `>` are [`Token::RdrIn`] and [`Token::RdrOut`] even
//! inside arithmetic, where they mean less-than and greater-than, and `<<`
//! and `>>` double as the shift operators.

use std::fmt;

/// Token identifier.
///
/// `Lit` and `LitWord` both carry their text in the lexer's value buffer;
/// `LitWord` means the literal ended at a clean word boundary and is thus
/// eligible to be a reserved word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// Byte sequence that is not a token in the current context.
    Illegal,
    /// End of input.
    Eof,
    /// A newline, significant as a statement terminator.
    Newl,
    /// Literal that may be followed by further word parts.
    Lit,
    /// Literal ending at a clean word boundary.
    LitWord,

    Semicolon,    // ;
    DblSemicolon, // ;;
    SemiAnd,      // ;&
    DblSemiAnd,   // ;;&
    And,          // &
    AndAnd,       // &&
    Or,           // |
    OrOr,         // ||
    OrAnd,        // |&

    LeftParen,     // (
    RightParen,    // )
    DblLeftParen,  // ((
    DblRightParen, // ))
    LeftBrack,     // [
    RightBrack,    // ]
    CloseBrace,    // } (in parameter expansions; elsewhere `}` is a LitWord)

    RdrOut,   // >
    AppOut,   // >>
    RdrIn,    // <
    RdrInOut, // <>
    DplIn,    // <&
    DplOut,   // >&
    ClbOut,   // >|
    Hdoc,     // <<
    DashHdoc, // <<-
    WordHdoc, // <<<
    RdrAll,   // &>
    AppAll,   // &>>

    CmdIn,  // <(
    CmdOut, // >(

    Dollar,       // $
    DollSglQuote, // $'
    DollDblQuote, // $"
    DollBrace,    // ${
    DollBrack,    // $[
    DollParen,    // $(
    DollDblParen, // $((

    SglQuote, // '
    DblQuote, // "
    BckQuote, // `

    Plus,       // +
    Minus,      // -
    Star,       // *
    Power,      // **
    Slash,      // /
    DblSlash,   // //
    Percent,    // %
    DblPercent, // %%
    Inc,        // ++
    Dec,        // --
    Not,        // !
    BitNot,     // ~
    Caret,      // ^
    DblCaret,   // ^^
    Comma,      // ,
    DblComma,   // ,,
    Quest,      // ?
    Colon,      // :
    At,         // @
    Hash,       // #
    DblHash,    // ##

    Eql, // ==
    Neq, // !=
    Leq, // <=
    Geq, // >=

    Assgn,    // =
    AddAssgn, // +=
    SubAssgn, // -=
    MulAssgn, // *=
    QuoAssgn, // /=
    RemAssgn, // %=
    AndAssgn, // &=
    OrAssgn,  // |=
    XorAssgn, // ^=
    ShlAssgn, // <<=
    ShrAssgn, // >>=

    TsReMatch, // =~

    ColMinus, // :-
    ColAssgn, // :=
    ColPlus,  // :+
    ColQuest, // :?

    GlobQuest, // ?(
    GlobStar,  // *(
    GlobPlus,  // +(
    GlobAt,    // @(
    GlobExcl,  // !(
}

impl Token {
    /// Canonical spelling of the token. Empty for `Illegal`, `Eof`, `Lit`,
    /// and `LitWord`, whose text lives in the lexer's value buffer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use Token::*;
        match self {
            Illegal | Eof | Lit | LitWord => "",
            Newl => "\n",
            Semicolon => ";",
            DblSemicolon => ";;",
            SemiAnd => ";&",
            DblSemiAnd => ";;&",
            And => "&",
            AndAnd => "&&",
            Or => "|",
            OrOr => "||",
            OrAnd => "|&",
            LeftParen => "(",
            RightParen => ")",
            DblLeftParen => "((",
            DblRightParen => "))",
            LeftBrack => "[",
            RightBrack => "]",
            CloseBrace => "}",
            RdrOut => ">",
            AppOut => ">>",
            RdrIn => "<",
            RdrInOut => "<>",
            DplIn => "<&",
            DplOut => ">&",
            ClbOut => ">|",
            Hdoc => "<<",
            DashHdoc => "<<-",
            WordHdoc => "<<<",
            RdrAll => "&>",
            AppAll => "&>>",
            CmdIn => "<(",
            CmdOut => ">(",
            Dollar => "$",
            DollSglQuote => "$'",
            DollDblQuote => "$\"",
            DollBrace => "${",
            DollBrack => "$[",
            DollParen => "$(",
            DollDblParen => "$((",
            SglQuote => "'",
            DblQuote => "\"",
            BckQuote => "`",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Power => "**",
            Slash => "/",
            DblSlash => "//",
            Percent => "%",
            DblPercent => "%%",
            Inc => "++",
            Dec => "--",
            Not => "!",
            BitNot => "~",
            Caret => "^",
            DblCaret => "^^",
            Comma => ",",
            DblComma => ",,",
            Quest => "?",
            Colon => ":",
            At => "@",
            Hash => "#",
            DblHash => "##",
            Eql => "==",
            Neq => "!=",
            Leq => "<=",
            Geq => ">=",
            Assgn => "=",
            AddAssgn => "+=",
            SubAssgn => "-=",
            MulAssgn => "*=",
            QuoAssgn => "/=",
            RemAssgn => "%=",
            AndAssgn => "&=",
            OrAssgn => "|=",
            XorAssgn => "^=",
            ShlAssgn => "<<=",
            ShrAssgn => ">>=",
            TsReMatch => "=~",
            ColMinus => ":-",
            ColAssgn => ":=",
            ColPlus => ":+",
            ColQuest => ":?",
            GlobQuest => "?(",
            GlobStar => "*(",
            GlobPlus => "+(",
            GlobAt => "@(",
            GlobExcl => "!(",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("EOF"),
            Token::Newl => f.write_str("newline"),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Error returned when converting a [`Token`] into one of the typed
/// operator enums fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TryFromTokenError(pub Token);

macro_rules! op_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $tok:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Canonical spelling of the operator.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => Token::$tok.as_str()),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<Token> for $name {
            type Error = TryFromTokenError;
            fn try_from(token: Token) -> Result<Self, TryFromTokenError> {
                match token {
                    $(Token::$tok => Ok($name::$variant),)+
                    other => Err(TryFromTokenError(other)),
                }
            }
        }

        impl From<$name> for Token {
            fn from(op: $name) -> Token {
                match op {
                    $($name::$variant => Token::$tok),+
                }
            }
        }
    };
}

op_enum! {
    /// Redirection operator.
    RedirOp {
        DirOut => RdrOut,
        AppendOut => AppOut,
        DirIn => RdrIn,
        ReadWrite => RdrInOut,
        DupIn => DplIn,
        DupOut => DplOut,
        ClobberOut => ClbOut,
        Heredoc => Hdoc,
        DashHeredoc => DashHdoc,
        WordHeredoc => WordHdoc,
        AllOut => RdrAll,
        AllAppend => AppAll,
    }
}

impl RedirOp {
    /// Whether the operator introduces a here-document body.
    #[must_use]
    pub fn is_heredoc(self) -> bool {
        matches!(self, RedirOp::Heredoc | RedirOp::DashHeredoc)
    }

    /// Whether the operator reads from its operand.
    #[must_use]
    pub fn is_input(self) -> bool {
        matches!(
            self,
            RedirOp::DirIn
                | RedirOp::ReadWrite
                | RedirOp::DupIn
                | RedirOp::Heredoc
                | RedirOp::DashHeredoc
                | RedirOp::WordHeredoc
        )
    }
}

op_enum! {
    /// Operator joining the two statements of a `BinaryCmd`.
    BinCmdOp {
        AndStmt => AndAnd,
        OrStmt => OrOr,
        Pipe => Or,
        PipeAll => OrAnd,
    }
}

op_enum! {
    /// Terminator of a `case` pattern list.
    CaseOp {
        Break => DblSemicolon,
        Fallthrough => SemiAnd,
        Resume => DblSemiAnd,
    }
}

op_enum! {
    /// Process substitution opener.
    ProcOp {
        CmdIn => CmdIn,
        CmdOut => CmdOut,
    }
}

op_enum! {
    /// Extended glob opener.
    GlobOp {
        ZeroOrOne => GlobQuest,
        ZeroOrMore => GlobStar,
        OneOrMore => GlobPlus,
        One => GlobAt,
        Negated => GlobExcl,
    }
}

op_enum! {
    /// Unary arithmetic operator.
    UnAritOp {
        Not => Not,
        BitNegation => BitNot,
        Inc => Inc,
        Dec => Dec,
        Plus => Plus,
        Minus => Minus,
    }
}

op_enum! {
    /// Binary arithmetic operator.
    ///
    /// The ternary conditional is encoded as nested binaries with `Quest`
    /// and `Colon`: `a ? b : c` is `Quest(a, Colon(b, c))`.
    BinAritOp {
        Add => Plus,
        Sub => Minus,
        Mul => Star,
        Quo => Slash,
        Rem => Percent,
        Pow => Power,
        Eql => Eql,
        Neq => Neq,
        Leq => Leq,
        Geq => Geq,
        Lss => RdrIn,
        Gtr => RdrOut,
        And => And,
        Or => Or,
        Xor => Caret,
        Shl => Hdoc,
        Shr => AppOut,
        AndArit => AndAnd,
        OrArit => OrOr,
        Comma => Comma,
        Quest => Quest,
        Colon => Colon,
        Assgn => Assgn,
        AddAssgn => AddAssgn,
        SubAssgn => SubAssgn,
        MulAssgn => MulAssgn,
        QuoAssgn => QuoAssgn,
        RemAssgn => RemAssgn,
        AndAssgn => AndAssgn,
        OrAssgn => OrAssgn,
        XorAssgn => XorAssgn,
        ShlAssgn => ShlAssgn,
        ShrAssgn => ShrAssgn,
    }
}

impl BinAritOp {
    /// Whether the operator assigns to its left operand.
    #[must_use]
    pub fn is_assign(self) -> bool {
        use BinAritOp::*;
        matches!(
            self,
            Assgn
                | AddAssgn
                | SubAssgn
                | MulAssgn
                | QuoAssgn
                | RemAssgn
                | AndAssgn
                | OrAssgn
                | XorAssgn
                | ShlAssgn
                | ShrAssgn
        )
    }
}

/// Parameter expansion operator, as in `${foo:-bar}` or `${foo@Q}`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParExpOp {
    /// `-`: default value if unset.
    DefaultUnset,
    /// `:-`: default value if unset or null.
    DefaultUnsetOrNull,
    /// `=`: assign default if unset.
    AssignUnset,
    /// `:=`: assign default if unset or null.
    AssignUnsetOrNull,
    /// `?`: error out if unset.
    ErrorUnset,
    /// `:?`: error out if unset or null.
    ErrorUnsetOrNull,
    /// `+`: alternate value if set.
    AlternateSet,
    /// `:+`: alternate value if set and non-null.
    AlternateSetOrNull,
    /// `%`: remove the shortest matching suffix.
    RemSmallSuffix,
    /// `%%`: remove the longest matching suffix.
    RemLargeSuffix,
    /// `#`: remove the shortest matching prefix.
    RemSmallPrefix,
    /// `##`: remove the longest matching prefix.
    RemLargePrefix,
    /// `^`: uppercase the first match.
    UpperFirst,
    /// `^^`: uppercase all matches.
    UpperAll,
    /// `,`: lowercase the first match.
    LowerFirst,
    /// `,,`: lowercase all matches.
    LowerAll,
    /// `@Q`: quote the value for shell reuse.
    Quoted,
    /// `@E`: expand backslash escapes in the value.
    Escaped,
    /// `@P`: expand as a prompt string.
    Prompt,
    /// `@A`: print as an assignment statement.
    AssignStmt,
    /// `@a`: print the variable's attribute flags.
    Attrs,
}

impl ParExpOp {
    /// Canonical spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use ParExpOp::*;
        match self {
            DefaultUnset => "-",
            DefaultUnsetOrNull => ":-",
            AssignUnset => "=",
            AssignUnsetOrNull => ":=",
            ErrorUnset => "?",
            ErrorUnsetOrNull => ":?",
            AlternateSet => "+",
            AlternateSetOrNull => ":+",
            RemSmallSuffix => "%",
            RemLargeSuffix => "%%",
            RemSmallPrefix => "#",
            RemLargePrefix => "##",
            UpperFirst => "^",
            UpperAll => "^^",
            LowerFirst => ",",
            LowerAll => ",,",
            Quoted => "@Q",
            Escaped => "@E",
            Prompt => "@P",
            AssignStmt => "@A",
            Attrs => "@a",
        }
    }
}

impl fmt::Display for ParExpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator of a `${!prefix*}` / `${!prefix@}` names expansion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParNamesOp {
    /// `*`: matching names joined into one field.
    Names,
    /// `@`: matching names as separate fields.
    NamesByFields,
}

impl ParNamesOp {
    /// Canonical spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParNamesOp::Names => "*",
            ParNamesOp::NamesByFields => "@",
        }
    }
}

impl fmt::Display for ParNamesOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operator inside `[[ … ]]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UnTestOp {
    Exists,       // -e
    RegFile,      // -f
    Direct,       // -d
    CharSp,       // -c
    BlckSp,       // -b
    NmPipe,       // -p
    Socket,       // -S
    SmbLink,      // -L (also -h)
    Sticky,       // -k
    GidSet,       // -g
    UidSet,       // -u
    GrpOwn,       // -G
    UsrOwn,       // -O
    Modif,        // -N
    Read,         // -r
    Write,        // -w
    Exec,         // -x
    NoEmpty,      // -s
    FdTerm,       // -t
    EmpStr,       // -z
    NempStr,      // -n
    OptSet,       // -o
    VarSet,       // -v
    RefVar,       // -R
    Not,          // !
}

impl UnTestOp {
    /// Canonical spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use UnTestOp::*;
        match self {
            Exists => "-e",
            RegFile => "-f",
            Direct => "-d",
            CharSp => "-c",
            BlckSp => "-b",
            NmPipe => "-p",
            Socket => "-S",
            SmbLink => "-L",
            Sticky => "-k",
            GidSet => "-g",
            UidSet => "-u",
            GrpOwn => "-G",
            UsrOwn => "-O",
            Modif => "-N",
            Read => "-r",
            Write => "-w",
            Exec => "-x",
            NoEmpty => "-s",
            FdTerm => "-t",
            EmpStr => "-z",
            NempStr => "-n",
            OptSet => "-o",
            VarSet => "-v",
            RefVar => "-R",
            Not => "!",
        }
    }

    /// Looks an operator up by its spelling.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        use UnTestOp::*;
        Some(match s {
            "-e" | "-a" => Exists,
            "-f" => RegFile,
            "-d" => Direct,
            "-c" => CharSp,
            "-b" => BlckSp,
            "-p" => NmPipe,
            "-S" => Socket,
            "-L" | "-h" => SmbLink,
            "-k" => Sticky,
            "-g" => GidSet,
            "-u" => UidSet,
            "-G" => GrpOwn,
            "-O" => UsrOwn,
            "-N" => Modif,
            "-r" => Read,
            "-w" => Write,
            "-x" => Exec,
            "-s" => NoEmpty,
            "-t" => FdTerm,
            "-z" => EmpStr,
            "-n" => NempStr,
            "-o" => OptSet,
            "-v" => VarSet,
            "-R" => RefVar,
            _ => return None,
        })
    }
}

impl fmt::Display for UnTestOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operator inside `[[ … ]]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinTestOp {
    ReMatch, // =~
    Newer,   // -nt
    Older,   // -ot
    DevIno,  // -ef
    Eql,     // -eq
    Neq,     // -ne
    Leq,     // -le
    Geq,     // -ge
    Lss,     // -lt
    Gtr,     // -gt
    Match,   // ==
    NoMatch, // !=
    Before,  // <
    After,   // >
    AndTest, // &&
    OrTest,  // ||
}

impl BinTestOp {
    /// Canonical spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use BinTestOp::*;
        match self {
            ReMatch => "=~",
            Newer => "-nt",
            Older => "-ot",
            DevIno => "-ef",
            Eql => "-eq",
            Neq => "-ne",
            Leq => "-le",
            Geq => "-ge",
            Lss => "-lt",
            Gtr => "-gt",
            Match => "==",
            NoMatch => "!=",
            Before => "<",
            After => ">",
            AndTest => "&&",
            OrTest => "||",
        }
    }

    /// Looks an operator up by its spelling.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        use BinTestOp::*;
        Some(match s {
            "=~" => ReMatch,
            "-nt" => Newer,
            "-ot" => Older,
            "-ef" => DevIno,
            "-eq" => Eql,
            "-ne" => Neq,
            "-le" => Leq,
            "-ge" => Geq,
            "-lt" => Lss,
            "-gt" => Gtr,
            "==" | "=" => Match,
            "!=" => NoMatch,
            "<" => Before,
            ">" => After,
            "&&" => AndTest,
            "||" => OrTest,
            _ => return None,
        })
    }
}

impl fmt::Display for BinTestOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POSIX reserved words, recognized in every dialect.
const POSIX_KEYWORDS: &[&str] = &[
    "if", "then", "elif", "else", "fi", "while", "until", "do", "done", "for", "in", "case",
    "esac", "{", "}", "!",
];

/// Additional reserved words recognized outside POSIX mode.
const BASH_KEYWORDS: &[&str] = &[
    "[[", "]]", "function", "select", "time", "coproc", "let", "eval", "declare", "local",
    "export", "readonly", "typeset", "nameref",
];

/// Whether a literal word is a reserved word at a command-start position in
/// the given dialect.
#[must_use]
pub fn is_keyword(word: &str, lang: crate::source::LangVariant) -> bool {
    POSIX_KEYWORDS.contains(&word)
        || (lang != crate::source::LangVariant::Posix && BASH_KEYWORDS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LangVariant;

    #[test]
    fn spellings_round_trip_through_conversions() {
        assert_eq!(RedirOp::try_from(Token::DashHdoc), Ok(RedirOp::DashHeredoc));
        assert_eq!(Token::from(RedirOp::DashHeredoc), Token::DashHdoc);
        assert_eq!(RedirOp::DashHeredoc.to_string(), "<<-");

        assert_eq!(BinAritOp::try_from(Token::Hdoc), Ok(BinAritOp::Shl));
        assert_eq!(BinAritOp::Shl.to_string(), "<<");

        assert_eq!(
            BinCmdOp::try_from(Token::Semicolon),
            Err(TryFromTokenError(Token::Semicolon))
        );
    }

    #[test]
    fn keyword_recognition_depends_on_dialect() {
        assert!(is_keyword("fi", LangVariant::Posix));
        assert!(is_keyword("fi", LangVariant::Bash));
        assert!(!is_keyword("function", LangVariant::Posix));
        assert!(is_keyword("function", LangVariant::Bash));
        assert!(is_keyword("[[", LangVariant::MirBsd));
        assert!(!is_keyword("grep", LangVariant::Bash));
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!(UnTestOp::from_str_opt("-h"), Some(UnTestOp::SmbLink));
        assert_eq!(UnTestOp::from_str_opt("-L"), Some(UnTestOp::SmbLink));
        assert_eq!(BinTestOp::from_str_opt("="), Some(BinTestOp::Match));
        assert_eq!(BinTestOp::from_str_opt("-kt"), None);
    }
}
