//! Tokenizer implementation

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use shard_core::Span;

/// Stateless tokenizer over an immutable source buffer
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Source text covered by a token
    pub fn text(&self, token: &Token) -> &'a str {
        token.span.text(self.source)
    }

    /// Advance exactly one token, including whitespace, comments and line ends
    pub fn next_token_raw(&self, cursor: &mut Cursor) -> Token {
        let bytes = self.source.as_bytes();
        let start = *cursor;

        let Some(&c) = bytes.get(start.offset) else {
            return Token {
                kind: TokenKind::EndOfStream,
                span: Span::new(bytes.len(), 0),
                line: start.line,
                column: start.column,
                value: None,
            };
        };
        let next = bytes.get(start.offset + 1).copied();

        let (kind, end) = match c {
            b'\r' | b'\n' => (
                TokenKind::EndOfLine,
                start.offset + line_end_len(bytes, start.offset),
            ),
            b' ' | b'\t' | 0x0b | 0x0c => {
                let end = scan_while(bytes, start.offset, |b| {
                    matches!(b, b' ' | b'\t' | 0x0b | 0x0c)
                });
                (TokenKind::Whitespace, end)
            }
            b'/' if next == Some(b'/') => {
                let end = scan_while(bytes, start.offset, |b| b != b'\n' && b != b'\r');
                (TokenKind::Comment, end)
            }
            b'/' if next == Some(b'*') => {
                let end = match self.source[start.offset + 2..].find("*/") {
                    Some(pos) => start.offset + 2 + pos + 2,
                    None => bytes.len(),
                };
                (TokenKind::Comment, end)
            }
            b'"' => (TokenKind::String, scan_string(bytes, start.offset).0),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                let end =
                    scan_while(bytes, start.offset, |b| b.is_ascii_alphanumeric() || b == b'_');
                (TokenKind::Identifier, end)
            }
            b'0'..=b'9' => (TokenKind::Number, scan_number(bytes, start.offset)),
            _ => match TokenKind::from_punct(c) {
                Some(kind) => (kind, start.offset + 1),
                None => {
                    let width = self.source[start.offset..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    (TokenKind::Punct, start.offset + width)
                }
            },
        };

        let span = Span::from_range(start.offset, end);
        let value = if kind == TokenKind::Number {
            span.text(self.source).parse::<f64>().ok()
        } else {
            None
        };
        self.advance_to(cursor, end);

        Token {
            kind,
            span,
            line: start.line,
            column: start.column,
            value,
        }
    }

    /// Advance to the next significant token.
    ///
    /// Whitespace, comments and line ends are skipped; string tokens have
    /// their surrounding quotes stripped from the span.
    pub fn next_token(&self, cursor: &mut Cursor) -> Token {
        loop {
            let mut token = self.next_token_raw(cursor);
            if token.kind.is_trivia() {
                continue;
            }
            if token.kind == TokenKind::String {
                let (_, terminated) = scan_string(self.source.as_bytes(), token.span.start);
                let trailing = if terminated && token.span.len >= 2 { 1 } else { 0 };
                token.span = Span::new(token.span.start + 1, token.span.len - 1 - trailing);
            }
            return token;
        }
    }

    /// Look at the next significant token without moving `cursor`
    pub fn peek_token(&self, cursor: &Cursor) -> Token {
        let mut lookahead = *cursor;
        self.next_token(&mut lookahead)
    }

    /// Move `cursor` forward to byte offset `end`, keeping line and column in step
    pub fn advance_to(&self, cursor: &mut Cursor, end: usize) {
        let bytes = self.source.as_bytes();
        let end = end.min(bytes.len());
        while cursor.offset < end {
            let b = bytes[cursor.offset];
            if b == b'\r' || b == b'\n' {
                cursor.offset += line_end_len(bytes, cursor.offset);
                cursor.line += 1;
                cursor.column = 1;
            } else {
                let width = self.source[cursor.offset..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
                cursor.offset += width;
                cursor.column += 1;
            }
        }
    }
}

/// Length of the line terminator at `offset`: `\r\n` and `\n\r` count as one
fn line_end_len(bytes: &[u8], offset: usize) -> usize {
    match (bytes[offset], bytes.get(offset + 1)) {
        (b'\r', Some(b'\n')) | (b'\n', Some(b'\r')) => 2,
        _ => 1,
    }
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

/// Returns the end offset of the string starting at `start` and whether it was closed
fn scan_string(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return (i + 1, true),
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

fn scan_number(bytes: &[u8], start: usize) -> usize {
    let end = scan_while(bytes, start, |b| b.is_ascii_digit());
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        scan_while(bytes, end + 1, |b| b.is_ascii_digit())
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_kinds(source: &str) -> Vec<TokenKind> {
        let lexer = Lexer::new(source);
        let mut cursor = Cursor::start();
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token_raw(&mut cursor);
            if token.is_eof() {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            raw_kinds("():;*[]{}=,|#+"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Equals,
                TokenKind::Comma,
                TokenKind::Pipe,
                TokenKind::Hash,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let lexer = Lexer::new("float4 _x1 42 3.25 7.");
        let mut cursor = Cursor::start();

        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.kind, lexer.text(&t)), (TokenKind::Identifier, "float4"));
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.kind, lexer.text(&t)), (TokenKind::Identifier, "_x1"));
        let t = lexer.next_token(&mut cursor);
        assert_eq!(t.value, Some(42.0));
        let t = lexer.next_token(&mut cursor);
        assert_eq!((lexer.text(&t), t.value), ("3.25", Some(3.25)));

        // No fractional digits: the dot is a separate token
        let t = lexer.next_token(&mut cursor);
        assert_eq!(lexer.text(&t), "7");
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.kind, lexer.text(&t)), (TokenKind::Punct, "."));
        assert!(lexer.next_token(&mut cursor).is_eof());
    }

    #[test]
    fn test_line_endings() {
        let lexer = Lexer::new("a\r\nb\n\rc\rd\ne");
        let mut cursor = Cursor::start();
        let lines: Vec<u32> = (0..5).map(|_| lexer.next_token(&mut cursor).line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_columns() {
        let lexer = Lexer::new("ab  cd\n  ef");
        let mut cursor = Cursor::start();
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.line, t.column), (1, 1));
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.line, t.column), (1, 5));
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.line, t.column), (2, 3));
    }

    #[test]
    fn test_comments_track_lines() {
        let lexer = Lexer::new("// line\n/* a\nb\r\nc */ x");
        let mut cursor = Cursor::start();
        let t = lexer.next_token(&mut cursor);
        assert_eq!(lexer.text(&t), "x");
        assert_eq!(t.line, 4);

        assert_eq!(
            raw_kinds("// c\nx"),
            vec![TokenKind::Comment, TokenKind::EndOfLine, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(raw_kinds("/* open [[ "), vec![TokenKind::Comment]);
    }

    #[test]
    fn test_strings() {
        let lexer = Lexer::new(r#""a \"quoted\" word" "open"#);
        let mut cursor = Cursor::start();
        let t = lexer.next_token(&mut cursor);
        assert_eq!(t.kind, TokenKind::String);
        assert_eq!(lexer.text(&t), r#"a \"quoted\" word"#);

        let t = lexer.next_token(&mut cursor);
        assert_eq!(lexer.text(&t), "open");
        assert!(lexer.next_token(&mut cursor).is_eof());
    }

    #[test]
    fn test_raw_string_keeps_quotes() {
        let lexer = Lexer::new(r#""s""#);
        let mut cursor = Cursor::start();
        let t = lexer.next_token_raw(&mut cursor);
        assert_eq!(lexer.text(&t), r#""s""#);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let lexer = Lexer::new("[ [ rx");
        let mut cursor = Cursor::start();
        lexer.next_token(&mut cursor);
        let before = cursor;

        let peeked = lexer.peek_token(&cursor);
        assert_eq!(peeked.kind, TokenKind::LBracket);
        assert_eq!(cursor, before);

        let taken = lexer.next_token(&mut cursor);
        assert_eq!(taken, peeked);
    }

    #[test]
    fn test_non_ascii_is_single_punct() {
        let lexer = Lexer::new("é;");
        let mut cursor = Cursor::start();
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.kind, lexer.text(&t)), (TokenKind::Punct, "é"));
        let t = lexer.next_token(&mut cursor);
        assert_eq!((t.kind, t.column), (TokenKind::Semicolon, 2));
    }

    #[test]
    fn test_end_of_stream_is_sticky() {
        let lexer = Lexer::new("x");
        let mut cursor = Cursor::start();
        lexer.next_token(&mut cursor);
        assert!(lexer.next_token(&mut cursor).is_eof());
        assert!(lexer.next_token(&mut cursor).is_eof());
        assert_eq!(cursor.offset, 1);
    }
}
