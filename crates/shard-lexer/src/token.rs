//! Token definitions

use serde::{Deserialize, Serialize};
use shard_core::Span;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    LParen,
    RParen,
    Colon,
    Semicolon,
    Star,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Equals,
    Comma,
    Pipe,
    Hash,
    /// Any other single character
    Punct,
    Identifier,
    Number,
    String,
    Comment,
    Whitespace,
    EndOfLine,
    EndOfStream,
}

impl TokenKind {
    /// Opening `(`, `{` or `[`
    pub fn is_open(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket)
    }

    /// Closing `)`, `}` or `]`
    pub fn is_close(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket)
    }

    /// Tokens skipped by [`crate::Lexer::next_token`]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::EndOfLine
        )
    }

    pub(crate) fn from_punct(c: u8) -> Option<Self> {
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semicolon,
            b'*' => TokenKind::Star,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'=' => TokenKind::Equals,
            b',' => TokenKind::Comma,
            b'|' => TokenKind::Pipe,
            b'#' => TokenKind::Hash,
            _ => return None,
        };
        Some(kind)
    }
}

/// A single token. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    /// Parsed value of a `Number` token
    pub value: Option<f64>,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }
}
