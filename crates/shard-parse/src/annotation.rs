//! Resource annotation scanner
//!
//! Walks the token stream of a code body looking for annotations of the form
//!
//! ```text
//! [[rx::resGroup0()]] float4 baseColor();
//! ```
//!
//! The shading language itself is never parsed: only `()`, `{}` and `[]`
//! nesting depth is tracked, and annotations are recognized at depth zero.
//! A depth-zero `[` that does not start an annotation marks the end of the
//! code body and hands control back to the section parser.

use serde::{Deserialize, Serialize};
use shard_core::Span;
use shard_lexer::{Cursor, Lexer, Token, TokenKind};
use shard_resource::GroupSlot;

/// Rule deciding which depth-zero `[` ends a code body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeBoundary {
    /// Any depth-zero `[` that is not a well-formed annotation ends the body,
    /// including a top-level array subscript such as `int arr[4];`
    #[default]
    Literal,
    /// Only a `[` that is the first non-blank character of its line ends the
    /// body; other brackets are ordinary punctuation
    LineStart,
}

/// Source range of one recognized annotation, from the opening `[` to the
/// `;` closing its declaration statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSpan {
    pub start: Span,
    pub end: Span,
}

impl ReplaceSpan {
    /// Full byte range covered, inclusive of both tokens
    pub fn range(&self) -> Span {
        self.start.join(self.end)
    }
}

/// A resource declaration found in code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub slot: GroupSlot,
    pub type_name: String,
    pub name: String,
    pub span: ReplaceSpan,
    pub line: u32,
}

/// Outcome of trying to match an annotation at a `[`
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationMatch {
    /// Full match; the cursor is positioned just after the closing `;`
    Matched(Annotation, Cursor),
    /// The `[` is not followed by a second `[`
    NotAnnotation,
    /// `[[` was found but the rest of the grammar did not match
    Malformed,
}

/// Result of scanning one code body
#[derive(Debug, Clone)]
pub struct CodeScan {
    /// Byte range of the code body
    pub content: Span,
    /// Where the section parser resumes: the boundary `[` or end of input
    pub end: Cursor,
    pub annotations: Vec<Annotation>,
}

/// Scan a code body starting at `start`
pub fn scan_code(lexer: &Lexer<'_>, start: Cursor, boundary: CodeBoundary) -> CodeScan {
    let mut cursor = start;
    let mut depth: usize = 0;
    let mut annotations = Vec::new();

    loop {
        let token = lexer.next_token(&mut cursor);
        match token.kind {
            TokenKind::EndOfStream => {
                return CodeScan {
                    content: Span::from_range(start.offset, lexer.len()),
                    end: cursor,
                    annotations,
                };
            }
            TokenKind::LBracket if depth == 0 => match match_annotation(lexer, &token, cursor) {
                AnnotationMatch::Matched(annotation, after) => {
                    annotations.push(annotation);
                    cursor = after;
                }
                result => {
                    if result == AnnotationMatch::Malformed {
                        log::debug!("Malformed annotation at line {}", token.line);
                    }
                    if boundary == CodeBoundary::Literal || starts_line(lexer, &token) {
                        return CodeScan {
                            content: Span::from_range(start.offset, token.span.start),
                            end: Cursor::new(token.span.start, token.line, token.column),
                            annotations,
                        };
                    }
                    depth += 1;
                }
            },
            kind if kind.is_open() => depth += 1,
            kind if kind.is_close() => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
}

/// Try to match `[ rx :: <group> ( ) ] ] <Type> <name> ( ) ;` starting at
/// `open`, with `cursor` just past it. The caller's cursor is never moved.
pub fn match_annotation(lexer: &Lexer<'_>, open: &Token, cursor: Cursor) -> AnnotationMatch {
    let mut cursor = cursor;
    if lexer.next_token(&mut cursor).kind != TokenKind::LBracket {
        return AnnotationMatch::NotAnnotation;
    }

    match match_body(lexer, &mut cursor) {
        Some((slot, type_token, name_token, semicolon)) => AnnotationMatch::Matched(
            Annotation {
                slot,
                type_name: lexer.text(&type_token).to_string(),
                name: lexer.text(&name_token).to_string(),
                span: ReplaceSpan {
                    start: open.span,
                    end: semicolon.span,
                },
                line: open.line,
            },
            cursor,
        ),
        None => AnnotationMatch::Malformed,
    }
}

fn match_body(lexer: &Lexer<'_>, cursor: &mut Cursor) -> Option<(GroupSlot, Token, Token, Token)> {
    let rx = expect(lexer, cursor, TokenKind::Identifier)?;
    if lexer.text(&rx) != "rx" {
        return None;
    }
    expect(lexer, cursor, TokenKind::Colon)?;
    expect(lexer, cursor, TokenKind::Colon)?;
    let group = expect(lexer, cursor, TokenKind::Identifier)?;
    let slot = GroupSlot::from_key(lexer.text(&group))?;
    expect(lexer, cursor, TokenKind::LParen)?;
    expect(lexer, cursor, TokenKind::RParen)?;
    expect(lexer, cursor, TokenKind::RBracket)?;
    expect(lexer, cursor, TokenKind::RBracket)?;

    let type_token = expect(lexer, cursor, TokenKind::Identifier)?;
    let name_token = expect(lexer, cursor, TokenKind::Identifier)?;
    expect(lexer, cursor, TokenKind::LParen)?;
    expect(lexer, cursor, TokenKind::RParen)?;
    let semicolon = expect(lexer, cursor, TokenKind::Semicolon)?;

    Some((slot, type_token, name_token, semicolon))
}

fn expect(lexer: &Lexer<'_>, cursor: &mut Cursor, kind: TokenKind) -> Option<Token> {
    let token = lexer.next_token(cursor);
    (token.kind == kind).then_some(token)
}

/// True if only spaces or tabs precede `token` on its line
fn starts_line(lexer: &Lexer<'_>, token: &Token) -> bool {
    lexer.source().as_bytes()[..token.span.start]
        .iter()
        .rev()
        .take_while(|&&b| b != b'\n' && b != b'\r')
        .all(|&b| b == b' ' || b == b'\t')
}
