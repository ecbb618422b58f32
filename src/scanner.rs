// ABOUTME: Turns source text into a token stream

use crate::error::LexError;
use crate::token::{keyword, Token, TokenKind};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1},
    combinator::recognize,
    multi::many0,
    sequence::pair,
    IResult, Parser,
};

fn ident_chars(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Greedy-digit, single-dot number lexing: `3.14` is one float token, but
/// `3.` with no trailing digit stops at the int `3` and leaves the `.` for
/// the next token (so `3.to_str()`-style chains, if ever added, would not
/// be swallowed by the number scanner).
fn number(input: &str) -> IResult<&str, TokenKind> {
    let (rest, int_part) = digit1(input)?;
    if let Ok((rest2, _)) = char::<_, nom::error::Error<&str>>('.').parse(rest) {
        if let Ok((rest3, frac_part)) = digit1::<_, nom::error::Error<&str>>(rest2) {
            let text = format!("{int_part}.{frac_part}");
            let value: f64 = text.parse().expect("digit1 output is always numeric");
            return Ok((rest3, TokenKind::Float(value)));
        }
    }
    let value: i64 = int_part.parse().expect("digit1 output is always numeric");
    Ok((rest, TokenKind::Int(value)))
}

struct Scanner<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn byte_offset(&self) -> usize {
        self.chars[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, line, column));
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            match self.peek() {
                None => break,
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('\n') => {
                    let (line, column) = (self.line, self.column);
                    self.advance();
                    self.push(TokenKind::Newline, line, column);
                }
                Some(ch) if ch.is_ascii_digit() => self.scan_number()?,
                Some('"') => self.scan_string()?,
                Some(ch) if ch.is_alphabetic() || ch == '_' => self.scan_ident(),
                Some(_) => self.scan_operator()?,
            }
        }
        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, line, column);
        Ok(self.tokens)
    }

    fn scan_number(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        let start = self.byte_offset();
        let (rest, kind) =
            number(&self.source[start..]).expect("leading ascii digit guarantees a match");
        let consumed = self.source[start..].len() - rest.len();
        let mut remaining_bytes = consumed;
        while remaining_bytes > 0 {
            let ch = self.advance().expect("consumed bytes came from real chars");
            remaining_bytes -= ch.len_utf8();
        }
        self.push(kind, line, column);
        Ok(())
    }

    fn scan_ident(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.byte_offset();
        let (rest, text) =
            ident_chars(&self.source[start..]).expect("leading ident char guarantees a match");
        let consumed = self.source[start..].len() - rest.len();
        let mut remaining_bytes = consumed;
        while remaining_bytes > 0 {
            let ch = self.advance().expect("consumed bytes came from real chars");
            remaining_bytes -= ch.len_utf8();
        }
        let kind = keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()));
        self.push(kind, line, column);
    }

    fn scan_string(&mut self) -> Result<(), LexError> {
        let (start_line, start_column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    })
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        // Divergence from the escape table: any other escaped
                        // character is emitted literally rather than dropped.
                        Some(other) => value.push(other),
                        None => {
                            return Err(LexError::UnterminatedString {
                                line: start_line,
                                column: start_column,
                            })
                        }
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
        self.push(TokenKind::String(value), start_line, start_column);
        Ok(())
    }

    fn scan_operator(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        let ch = self.peek().expect("caller checked Some(_)");
        let next = self.peek_at(1);

        macro_rules! two {
            ($kind:expr) => {{
                self.advance();
                self.advance();
                self.push($kind, line, column);
                return Ok(());
            }};
        }
        macro_rules! one {
            ($kind:expr) => {{
                self.advance();
                self.push($kind, line, column);
                return Ok(());
            }};
        }

        match (ch, next) {
            ('*', Some('*')) => two!(TokenKind::StarStar),
            ('=', Some('=')) => two!(TokenKind::EqEq),
            ('!', Some('=')) => two!(TokenKind::NotEq),
            ('<', Some('=')) => two!(TokenKind::LtEq),
            ('>', Some('=')) => two!(TokenKind::GtEq),
            ('+', Some('=')) => two!(TokenKind::PlusEq),
            ('-', Some('=')) => two!(TokenKind::MinusEq),
            ('*', Some('=')) => two!(TokenKind::StarEq),
            ('/', Some('=')) => two!(TokenKind::SlashEq),
            ('+', Some('+')) => two!(TokenKind::PlusPlus),
            ('-', Some('-')) => two!(TokenKind::MinusMinus),
            ('=', Some('>')) => two!(TokenKind::Arrow),
            ('+', _) => one!(TokenKind::Plus),
            ('-', _) => one!(TokenKind::Minus),
            ('*', _) => one!(TokenKind::Star),
            ('/', _) => one!(TokenKind::Slash),
            ('%', _) => one!(TokenKind::Percent),
            ('=', _) => one!(TokenKind::Eq),
            ('<', _) => one!(TokenKind::Lt),
            ('>', _) => one!(TokenKind::Gt),
            ('(', _) => one!(TokenKind::LParen),
            (')', _) => one!(TokenKind::RParen),
            ('{', _) => one!(TokenKind::LBrace),
            ('}', _) => one!(TokenKind::RBrace),
            ('[', _) => one!(TokenKind::LBracket),
            (']', _) => one!(TokenKind::RBracket),
            (',', _) => one!(TokenKind::Comma),
            (':', _) => one!(TokenKind::Colon),
            ('.', _) => one!(TokenKind::Dot),
            (ch, _) => Err(LexError::UnexpectedChar { ch, line, column }),
        }
    }
}

pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    Scanner::new(source).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scans_let_statement() {
        assert_eq!(
            kinds("let x = 10"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int(10),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_float_requires_trailing_digit() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Float(3.14), TokenKind::Eof]);
        assert_eq!(
            kinds("3."),
            vec![TokenKind::Int(3), TokenKind::Dot, TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_escape_divergence_emits_char_literally() {
        assert_eq!(
            kinds(r#""a\zb""#),
            vec![TokenKind::String("azb".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_is_lex_error() {
        assert!(matches!(
            scan("\"abc"),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_multi_char_operators_prefer_longest_match() {
        assert_eq!(
            kinds("a += 1"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::PlusEq,
                TokenKind::Int(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(
            kinds("1 # this is a comment\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_char_is_lex_error() {
        assert!(matches!(scan("@"), Err(LexError::UnexpectedChar { .. })));
    }
}
