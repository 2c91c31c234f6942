//! Section parser for the hybrid `[Category]` / `key = value` / code format

use crate::annotation::{scan_code, Annotation, CodeBoundary};
use serde::{Deserialize, Serialize};
use shard_core::{Diagnostics, Result, ShardError, Span};
use shard_lexer::{Cursor, Lexer, TokenKind};
use shard_resource::GroupSlot;
use std::fmt;

/// Known section categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    RenderProgram,
    Code,
    ResGroup,
    Material,
    SamplerState,
    DepthStencil,
    RasterState,
}

impl Category {
    pub fn parse(name: &str) -> Option<Self> {
        let category = match name {
            "RenderProgram" => Category::RenderProgram,
            "Code" => Category::Code,
            "ResGroup" => Category::ResGroup,
            "Material" => Category::Material,
            "SamplerState" => Category::SamplerState,
            "DepthStencil" => Category::DepthStencil,
            "RasterState" => Category::RasterState,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Inferred kind of a `key = value` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Number,
    String,
    Bool,
}

impl ValueKind {
    /// Digits only is a number, `true`/`false` is a bool, anything else a string
    pub fn infer(value: &str) -> Self {
        if value.is_empty() {
            ValueKind::String
        } else if value.bytes().all(|b| b.is_ascii_digit()) {
            ValueKind::Number
        } else if value == "true" || value == "false" {
            ValueKind::Bool
        } else {
            ValueKind::String
        }
    }
}

/// One `key = value` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    pub kind: ValueKind,
    pub line: u32,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>, line: u32) -> Self {
        let value = value.into();
        Self {
            key: key.into(),
            kind: ValueKind::infer(&value),
            value,
            line,
        }
    }
}

/// Raw code body of a `[Code]` section
#[derive(Debug, Clone)]
pub struct CodeContent {
    pub span: Span,
    /// Line of the first body line in the file
    pub line: u32,
    pub annotations: Vec<Annotation>,
}

/// One parsed section
#[derive(Debug, Clone)]
pub struct SectionRecord {
    pub category: Category,
    /// Line of the `[Category]` header
    pub line: u32,
    pub entries: Vec<KeyValue>,
    /// Present for `[Code]` sections only
    pub code: Option<CodeContent>,
}

impl SectionRecord {
    /// Last value for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

/// Cursor-driven scanner over a whole file
pub struct SectionParser<'a> {
    lexer: Lexer<'a>,
    cursor: Cursor,
    code_boundary: CodeBoundary,
    diagnostics: Diagnostics,
}

impl<'a> SectionParser<'a> {
    pub fn new(source: &'a str, file_name: &str, code_boundary: CodeBoundary) -> Self {
        Self {
            lexer: Lexer::new(source),
            cursor: Cursor::start(),
            code_boundary,
            diagnostics: Diagnostics::new(file_name),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Parse the next known section.
    ///
    /// Unknown or malformed sections are reported as warnings and skipped.
    /// Returns `Ok(None)` at end of input and an error on a line missing `=`.
    pub fn next_section(&mut self) -> Result<Option<SectionRecord>> {
        loop {
            self.skip_blank();
            match self.peek_byte() {
                None => return Ok(None),
                Some(b'#') => self.skip_line(),
                Some(b'[') => {
                    let line = self.cursor.line;
                    let Some(name) = self.read_header() else {
                        self.skip_section_body();
                        continue;
                    };
                    match Category::parse(&name) {
                        Some(Category::Code) => return self.read_code_section(line).map(Some),
                        Some(category) => {
                            let entries = self.read_entries()?;
                            return Ok(Some(SectionRecord {
                                category,
                                line,
                                entries,
                                code: None,
                            }));
                        }
                        None => {
                            self.diagnostics
                                .warning(line, format!("unknown section [{}] skipped", name));
                            self.skip_section_body();
                        }
                    }
                }
                Some(_) => {
                    self.diagnostics
                        .warning(self.cursor.line, "text outside of any section ignored");
                    self.skip_line();
                }
            }
        }
    }

    /// Read `[Name]` at the cursor, leaving the cursor at the end of the line
    fn read_header(&mut self) -> Option<String> {
        let line = self.cursor.line;
        let source = self.lexer.source();
        let start = self.cursor.offset + 1;
        let line_end = self.line_end(self.cursor.offset);
        let text = &source[start..line_end];

        let Some(close) = text.find(']') else {
            self.diagnostics
                .warning(line, "section header is missing a closing ']'");
            self.skip_line();
            return None;
        };
        if text[..close].contains('[') {
            self.diagnostics
                .warning(line, "nested '[' in section header");
            self.skip_line();
            return None;
        }
        let name = text[..close].trim().to_string();

        // Only whitespace or a `#` comment may follow the header
        let mut after = self.cursor;
        self.lexer.advance_to(&mut after, start + close + 1);
        let mut trailing = self.lexer.next_token_raw(&mut after);
        while trailing.kind == TokenKind::Whitespace {
            trailing = self.lexer.next_token_raw(&mut after);
        }
        if !matches!(
            trailing.kind,
            TokenKind::EndOfLine | TokenKind::EndOfStream | TokenKind::Hash
        ) {
            self.diagnostics.warning(
                line,
                format!("unexpected text after section header [{}]", name),
            );
        }
        self.skip_line();

        if name.is_empty() {
            self.diagnostics.warning(line, "empty section header");
            return None;
        }
        Some(name)
    }

    fn read_entries(&mut self) -> Result<Vec<KeyValue>> {
        let mut entries = Vec::new();
        loop {
            self.skip_blank();
            match self.peek_byte() {
                None | Some(b'[') => return Ok(entries),
                Some(b'#') => self.skip_line(),
                Some(_) => entries.push(self.read_key_value()?),
            }
        }
    }

    fn read_key_value(&mut self) -> Result<KeyValue> {
        let line = self.cursor.line;
        let (key, value, line_end) = self.split_key_value();
        let key = key.to_string();
        let Some(value) = value else {
            return Err(self.syntax_error(line, format!("expected '=' after '{}'", key)));
        };
        if key.is_empty() {
            return Err(self.syntax_error(line, "missing key before '='".to_string()));
        }
        let entry = KeyValue::new(key, value, line);
        self.lexer.advance_to(&mut self.cursor, line_end);
        Ok(entry)
    }

    /// Split the line at the cursor into key and value without moving the cursor
    fn split_key_value(&self) -> (&'a str, Option<&'a str>, usize) {
        let source = self.lexer.source();
        let start = self.cursor.offset;
        let line_end = self.line_end(start);

        let key_end = source[start..line_end]
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .map_or(line_end, |pos| start + pos);
        let key = &source[start..key_end];
        let value = source[key_end..line_end]
            .trim_start_matches([' ', '\t'])
            .strip_prefix('=')
            .map(str::trim);
        (key, value, line_end)
    }

    /// `[Code]`: read slot bindings, then hand the rest of the buffer to the
    /// annotation scanner and resume where it stops
    fn read_code_section(&mut self, line: u32) -> Result<SectionRecord> {
        let mut entries = Vec::new();
        loop {
            let mark = self.cursor;
            self.skip_spaces();
            match self.peek_byte() {
                Some(b'\r') | Some(b'\n') => {
                    self.lexer.next_token_raw(&mut self.cursor);
                    continue;
                }
                None => {
                    self.cursor = mark;
                    break;
                }
                _ => {}
            }

            let line = self.cursor.line;
            let (key, value, line_end) = self.split_key_value();
            match value {
                Some(value) if is_code_binding_key(key) => {
                    entries.push(KeyValue::new(key, value, line));
                    self.lexer.advance_to(&mut self.cursor, line_end);
                }
                _ => {
                    self.cursor = mark;
                    break;
                }
            }
        }

        let body_start = self.cursor;
        let scan = scan_code(&self.lexer, body_start, self.code_boundary);
        log::debug!(
            "Code body at line {}: {} byte(s), {} annotation(s)",
            body_start.line,
            scan.content.len,
            scan.annotations.len()
        );
        self.cursor = scan.end;

        Ok(SectionRecord {
            category: Category::Code,
            line,
            entries,
            code: Some(CodeContent {
                span: scan.content,
                line: body_start.line,
                annotations: scan.annotations,
            }),
        })
    }

    fn skip_section_body(&mut self) {
        loop {
            self.skip_blank();
            match self.peek_byte() {
                None | Some(b'[') => return,
                Some(_) => self.skip_line(),
            }
        }
    }

    /// Skip whitespace and line ends
    fn skip_blank(&mut self) {
        loop {
            let mut next = self.cursor;
            let token = self.lexer.next_token_raw(&mut next);
            match token.kind {
                TokenKind::Whitespace | TokenKind::EndOfLine => self.cursor = next,
                _ => return,
            }
        }
    }

    /// Skip whitespace on the current line only
    fn skip_spaces(&mut self) {
        let mut next = self.cursor;
        if self.lexer.next_token_raw(&mut next).kind == TokenKind::Whitespace {
            self.cursor = next;
        }
    }

    /// Move to the end of the current line, leaving the line end unconsumed
    fn skip_line(&mut self) {
        let end = self.line_end(self.cursor.offset);
        self.lexer.advance_to(&mut self.cursor, end);
    }

    fn line_end(&self, from: usize) -> usize {
        let source = self.lexer.source();
        source[from..]
            .find(['\r', '\n'])
            .map_or(source.len(), |pos| from + pos)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.lexer.source().as_bytes().get(self.cursor.offset).copied()
    }

    fn syntax_error(&self, line: u32, message: String) -> ShardError {
        ShardError::SyntaxError {
            file: self.diagnostics.file.clone(),
            line,
            message,
        }
    }
}

fn is_code_binding_key(key: &str) -> bool {
    key == "name" || GroupSlot::from_key(key).is_some()
}
