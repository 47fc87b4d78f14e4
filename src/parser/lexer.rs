//! Logos-based lexer for Pkl
//!
//! Fast tokenization using the logos crate. String literals are scanned as a
//! single logos token and then split into `STRING_START`, `STRING_CHARS`,
//! `INTERPOLATION_START` and `STRING_END` tokens; the code inside an
//! interpolation is lexed recursively.

use std::collections::VecDeque;

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    base: u32,
    pending: VecDeque<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, 0)
    }

    /// Lex `input` as if it started at byte `base` of the enclosing document.
    fn with_offset(input: &'a str, base: u32) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            base,
            pending: VecDeque::new(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.base + self.inner.span().start as u32;

        let kind = match logos_token {
            Ok(LogosToken::String) => {
                split_string(text, offset, false, &mut self.pending);
                return self.pending.pop_front();
            }
            Ok(LogosToken::MlString) => {
                split_string(text, offset, true, &mut self.pending);
                return self.pending.pop_front();
            }
            Ok(LogosToken::LineComment) if is_doc_comment(text) => SyntaxKind::DOC_COMMENT,
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token {
            kind,
            text,
            offset: TextSize::new(offset),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with("///") && !text.starts_with("////")
}

// ============================================================================
// String scanning
// ============================================================================

fn lex_string(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let len = scan_string_body(lex.remainder(), false);
    lex.bump(len);
    true
}

fn lex_ml_string(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let len = scan_string_body(lex.remainder(), true);
    lex.bump(len);
    true
}

fn delimiter(multiline: bool) -> &'static str {
    if multiline { "\"\"\"" } else { "\"" }
}

/// Length of an escape sequence starting at the backslash at `s[i]`.
fn escape_len(s: &str, i: usize) -> usize {
    1 + s[i + 1..].chars().next().map_or(0, char::len_utf8)
}

/// Scans a string body (after the opening delimiter). Returns the number of bytes
/// up to and including the closing delimiter. An unterminated single-line string
/// stops before the newline.
fn scan_string_body(s: &str, multiline: bool) -> usize {
    let bytes = s.as_bytes();
    let delim = delimiter(multiline);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'(') => {
                i += 2;
                i += scan_interpolation(&s[i..]).0;
            }
            b'\\' => i += escape_len(s, i),
            b'\n' if !multiline => return i,
            _ if s[i..].starts_with(delim) => return i + delim.len(),
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Scans the code of an interpolation (after `\(`). Returns the consumed length,
/// including the closing paren, and whether that paren was found.
fn scan_interpolation(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' if depth == 0 => return (i + 1, true),
            b')' => {
                depth -= 1;
                i += 1;
            }
            b'"' => {
                let multiline = s[i..].starts_with("\"\"\"");
                i += delimiter(multiline).len();
                i += scan_string_body(&s[i..], multiline);
            }
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

/// Splits a scanned string literal into its component tokens.
fn split_string<'a>(text: &'a str, offset: u32, multiline: bool, out: &mut VecDeque<Token<'a>>) {
    let delim = delimiter(multiline);
    let open = delim.len().min(text.len());
    out.push_back(Token {
        kind: SyntaxKind::STRING_START,
        text: &text[..open],
        offset: TextSize::new(offset),
    });

    let body = &text[open..];
    let body_offset = offset + open as u32;
    let bytes = body.as_bytes();
    let mut chunk_start = 0;
    let mut i = 0;

    let flush = |out: &mut VecDeque<Token<'a>>, from: usize, to: usize| {
        if to > from {
            out.push_back(Token {
                kind: SyntaxKind::STRING_CHARS,
                text: &body[from..to],
                offset: TextSize::new(body_offset + from as u32),
            });
        }
    };

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'(') {
            flush(out, chunk_start, i);
            out.push_back(Token {
                kind: SyntaxKind::INTERPOLATION_START,
                text: &body[i..i + 2],
                offset: TextSize::new(body_offset + i as u32),
            });
            let code_start = i + 2;
            let (len, closed) = scan_interpolation(&body[code_start..]);
            let code_end = if closed {
                code_start + len - 1
            } else {
                code_start + len
            };
            let code = &body[code_start..code_end];
            out.extend(Lexer::with_offset(code, body_offset + code_start as u32));
            if closed {
                out.push_back(Token {
                    kind: SyntaxKind::R_PAREN,
                    text: &body[code_end..code_end + 1],
                    offset: TextSize::new(body_offset + code_end as u32),
                });
            }
            i = code_start + len;
            chunk_start = i;
        } else if bytes[i] == b'\\' {
            i += escape_len(body, i);
        } else if body[i..].starts_with(delim) {
            flush(out, chunk_start, i);
            out.push_back(Token {
                kind: SyntaxKind::STRING_END,
                text: &body[i..i + delim.len()],
                offset: TextSize::new(body_offset + i as u32),
            });
            return;
        } else {
            i += 1;
        }
    }
    flush(out, chunk_start, bytes.len());
}

// ============================================================================
// Logos token definitions
// ============================================================================

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"#![^\n]*")]
    Shebang,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*")]
    Ident,

    #[regex(r"`[^`\n]+`")]
    QuotedIdent,

    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,

    #[token("\"", lex_string)]
    String,

    #[token("\"\"\"", lex_ml_string)]
    MlString,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("?.")]
    QuestionDot,
    #[token("...")]
    Spread,
    #[token("...?")]
    QuestionSpread,
    #[token("->")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("**")]
    StarStar,
    #[token("~/")]
    TildeSlash,
    #[token("!!")]
    BangBang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("|>")]
    PipeGt,
    #[token("??")]
    QuestionQuestion,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("_", priority = 10)]
    Underscore,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("abstract")]
    Abstract,
    #[token("amends")]
    Amends,
    #[token("as")]
    As,
    #[token("class")]
    Class,
    #[token("const")]
    Const,
    #[token("else")]
    Else,
    #[token("extends")]
    Extends,
    #[token("external")]
    External,
    #[token("false")]
    False,
    #[token("fixed")]
    Fixed,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("hidden")]
    Hidden,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("import*")]
    ImportStar,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("let")]
    Let,
    #[token("local")]
    Local,
    #[token("module")]
    Module,
    #[token("new")]
    New,
    #[token("nothing")]
    Nothing,
    #[token("null")]
    Null,
    #[token("open")]
    Open,
    #[token("out")]
    Out,
    #[token("outer")]
    Outer,
    #[token("read")]
    Read,
    #[token("read?")]
    ReadOrNull,
    #[token("read*")]
    ReadStar,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("trace")]
    Trace,
    #[token("true")]
    True,
    #[token("typealias")]
    Typealias,
    #[token("unknown")]
    Unknown,
    #[token("when")]
    When,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Shebang => SyntaxKind::SHEBANG,
            LogosToken::Ident | LogosToken::QuotedIdent => SyntaxKind::IDENT,
            LogosToken::Int => SyntaxKind::INT_NUMBER,
            LogosToken::Float => SyntaxKind::FLOAT_NUMBER,
            // Split by the Lexer before conversion
            LogosToken::String | LogosToken::MlString => SyntaxKind::STRING_START,
            LogosToken::QuestionDot => SyntaxKind::QUESTION_DOT,
            LogosToken::Spread => SyntaxKind::SPREAD,
            LogosToken::QuestionSpread => SyntaxKind::QUESTION_SPREAD,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::StarStar => SyntaxKind::STAR_STAR,
            LogosToken::TildeSlash => SyntaxKind::TILDE_SLASH,
            LogosToken::BangBang => SyntaxKind::BANG_BANG,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::PipeGt => SyntaxKind::PIPE_GT,
            LogosToken::QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::Underscore => SyntaxKind::UNDERSCORE,
            LogosToken::Abstract => SyntaxKind::ABSTRACT_KW,
            LogosToken::Amends => SyntaxKind::AMENDS_KW,
            LogosToken::As => SyntaxKind::AS_KW,
            LogosToken::Class => SyntaxKind::CLASS_KW,
            LogosToken::Const => SyntaxKind::CONST_KW,
            LogosToken::Else => SyntaxKind::ELSE_KW,
            LogosToken::Extends => SyntaxKind::EXTENDS_KW,
            LogosToken::External => SyntaxKind::EXTERNAL_KW,
            LogosToken::False => SyntaxKind::FALSE_KW,
            LogosToken::Fixed => SyntaxKind::FIXED_KW,
            LogosToken::For => SyntaxKind::FOR_KW,
            LogosToken::Function => SyntaxKind::FUNCTION_KW,
            LogosToken::Hidden => SyntaxKind::HIDDEN_KW,
            LogosToken::If => SyntaxKind::IF_KW,
            LogosToken::Import => SyntaxKind::IMPORT_KW,
            LogosToken::ImportStar => SyntaxKind::IMPORT_STAR_KW,
            LogosToken::In => SyntaxKind::IN_KW,
            LogosToken::Is => SyntaxKind::IS_KW,
            LogosToken::Let => SyntaxKind::LET_KW,
            LogosToken::Local => SyntaxKind::LOCAL_KW,
            LogosToken::Module => SyntaxKind::MODULE_KW,
            LogosToken::New => SyntaxKind::NEW_KW,
            LogosToken::Nothing => SyntaxKind::NOTHING_KW,
            LogosToken::Null => SyntaxKind::NULL_KW,
            LogosToken::Open => SyntaxKind::OPEN_KW,
            LogosToken::Out => SyntaxKind::OUT_KW,
            LogosToken::Outer => SyntaxKind::OUTER_KW,
            LogosToken::Read => SyntaxKind::READ_KW,
            LogosToken::ReadOrNull => SyntaxKind::READ_OR_NULL_KW,
            LogosToken::ReadStar => SyntaxKind::READ_STAR_KW,
            LogosToken::Super => SyntaxKind::SUPER_KW,
            LogosToken::This => SyntaxKind::THIS_KW,
            LogosToken::Throw => SyntaxKind::THROW_KW,
            LogosToken::Trace => SyntaxKind::TRACE_KW,
            LogosToken::True => SyntaxKind::TRUE_KW,
            LogosToken::Typealias => SyntaxKind::TYPEALIAS_KW,
            LogosToken::Unknown => SyntaxKind::UNKNOWN_KW,
            LogosToken::When => SyntaxKind::WHEN_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("class Foo extends Bar"),
            vec![
                SyntaxKind::CLASS_KW,
                SyntaxKind::IDENT,
                SyntaxKind::EXTENDS_KW,
                SyntaxKind::IDENT
            ]
        );
        assert_eq!(kinds("`my prop`"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("_"), vec![SyntaxKind::UNDERSCORE]);
        assert_eq!(kinds("_foo"), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn test_multi_char_operators() {
        assert_eq!(
            kinds("a?.b ?? c |> d ~/ e ** f !!"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::QUESTION_DOT,
                SyntaxKind::IDENT,
                SyntaxKind::QUESTION_QUESTION,
                SyntaxKind::IDENT,
                SyntaxKind::PIPE_GT,
                SyntaxKind::IDENT,
                SyntaxKind::TILDE_SLASH,
                SyntaxKind::IDENT,
                SyntaxKind::STAR_STAR,
                SyntaxKind::IDENT,
                SyntaxKind::BANG_BANG,
            ]
        );
        assert_eq!(
            kinds("import* read? read*"),
            vec![
                SyntaxKind::IMPORT_STAR_KW,
                SyntaxKind::READ_OR_NULL_KW,
                SyntaxKind::READ_STAR_KW
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![SyntaxKind::INT_NUMBER]);
        assert_eq!(kinds("0x1F"), vec![SyntaxKind::INT_NUMBER]);
        assert_eq!(kinds("1.5"), vec![SyntaxKind::FLOAT_NUMBER]);
        assert_eq!(kinds("1e3"), vec![SyntaxKind::FLOAT_NUMBER]);
    }

    #[test]
    fn test_doc_comment_is_distinguished() {
        let tokens = tokenize("/// docs\n// plain\n");
        assert_eq!(tokens[0].kind, SyntaxKind::DOC_COMMENT);
        assert_eq!(tokens[2].kind, SyntaxKind::LINE_COMMENT);
    }

    #[test]
    fn test_plain_string_splits_into_parts() {
        let tokens = tokenize(r#""hello""#);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::STRING_START,
                SyntaxKind::STRING_CHARS,
                SyntaxKind::STRING_END
            ]
        );
        assert_eq!(tokens[1].text, "hello");
        assert_eq!(tokens[2].offset, TextSize::new(6));
    }

    #[test]
    fn test_interpolation_is_lexed_as_code() {
        let tokens = tokenize(r#""a \(x + f("y")) b""#);
        let kinds: Vec<_> = tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::STRING_START,
                SyntaxKind::STRING_CHARS,
                SyntaxKind::INTERPOLATION_START,
                SyntaxKind::IDENT,
                SyntaxKind::PLUS,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::STRING_START,
                SyntaxKind::STRING_CHARS,
                SyntaxKind::STRING_END,
                SyntaxKind::R_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::STRING_CHARS,
                SyntaxKind::STRING_END,
            ]
        );
        let x = tokens.iter().find(|t| t.text == "x").map(|t| t.offset);
        assert_eq!(x, Some(TextSize::new(5)));
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let tokens = tokenize("\"abc\nfoo");
        assert_eq!(tokens[0].kind, SyntaxKind::STRING_START);
        assert_eq!(tokens[1].text, "abc");
        assert_eq!(tokens[2].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[3].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_multiline_string() {
        let tokens = tokenize("\"\"\"\nline \"quoted\"\n\"\"\"");
        assert_eq!(tokens[0].text, "\"\"\"");
        assert_eq!(tokens[1].kind, SyntaxKind::STRING_CHARS);
        assert_eq!(tokens[2].kind, SyntaxKind::STRING_END);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_lexing_is_lossless() {
        let input = "x = \"a\\(1)\\n\" // c\n/* b */ y";
        let rebuilt: String = tokenize(input).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }
}
