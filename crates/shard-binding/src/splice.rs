//! Source splicing: comment out annotations in a code body

use serde::{Deserialize, Serialize};
use shard_core::{Result, ShardError, Span};
use shard_parse::CodeBlock;

/// Options controlling how spliced text is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceOptions {
    /// Prepend blank lines so body line numbers match the shader file
    #[serde(default)]
    pub pad_lines: bool,
}

/// A code body with every annotation wrapped in a block comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplicedBody {
    pub text: String,
    /// Range of the replayed body within `text`, excluding padding
    pub body: Span,
    /// Ranges within `text` of the original annotation bytes, each wrapped
    /// in `/*` and `*/`
    pub commented: Vec<Span>,
}

impl SplicedBody {
    /// Recover the original body by removing the comment delimiters
    pub fn restore(&self) -> String {
        restore(&self.text, self.body, &self.commented)
    }
}

/// Strip the comment delimiters around `commented` ranges of `body` in `text`
pub(crate) fn restore(text: &str, body: Span, commented: &[Span]) -> String {
    let mut out = String::with_capacity(body.len);
    let mut pos = body.start;
    for span in commented {
        out.push_str(&text[pos..span.start - 2]);
        out.push_str(span.text(text));
        pos = span.end() + 2;
    }
    out.push_str(&text[pos..body.end()]);
    out
}

/// Replay a code body from `source`, wrapping every replace span in
/// `/* ... */` and copying all other bytes verbatim
pub fn splice_body(block: &CodeBlock, source: &str, options: SpliceOptions) -> Result<SplicedBody> {
    let body = block.span;
    if body.end() > source.len() {
        return Err(splice_error(block, "code body lies outside the source"));
    }

    let mut text = String::with_capacity(body.len + block.replace_spans.len() * 4 + 64);
    if options.pad_lines {
        for _ in 1..block.line_offset {
            text.push('\n');
        }
    }
    let body_start = text.len();

    let mut commented = Vec::with_capacity(block.replace_spans.len());
    let mut pos = body.start;
    for span in &block.replace_spans {
        let range = span.range();
        if range.start < pos || range.end() > body.end() {
            return Err(splice_error(
                block,
                format!("annotation at byte {} is out of order or outside the body", range.start),
            ));
        }
        let annotation = range.text(source);
        if annotation.contains("*/") {
            return Err(splice_error(
                block,
                format!("annotation `{}` contains `*/` and cannot be commented out", annotation),
            ));
        }

        text.push_str(&source[pos..range.start]);
        text.push_str("/*");
        commented.push(Span::new(text.len(), annotation.len()));
        text.push_str(annotation);
        text.push_str("*/");
        pos = range.end();
    }
    text.push_str(&source[pos..body.end()]);

    let body_len = text.len() - body_start;
    Ok(SplicedBody {
        text,
        body: Span::new(body_start, body_len),
        commented,
    })
}

pub(crate) fn splice_error(block: &CodeBlock, message: impl Into<String>) -> ShardError {
    ShardError::SpliceError {
        block: block.name.clone(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_parse::{parse, ShaderFileModel};

    fn model(source: &str) -> ShaderFileModel {
        parse(source, "test.shard").unwrap()
    }

    #[test]
    fn test_scenario_comments_only_annotation() {
        let source = "[ResGroup]\nname = Foo\nbaseColor = float4\n[Code]\nname=C\nresGroup0=Foo\n\
                      [[rx::resGroup0()]] float4 baseColor();\n\
                      float4 main() { return baseColor(); }\n";
        let model = model(source);
        let block = &model.code_blocks[0];
        let spliced = splice_body(block, source, SpliceOptions::default()).unwrap();

        assert_eq!(
            spliced.text,
            "/*[[rx::resGroup0()]] float4 baseColor();*/\nfloat4 main() { return baseColor(); }\n"
        );
        assert_eq!(spliced.commented.len(), 1);
        assert_eq!(spliced.restore(), block.text(source));
    }

    #[test]
    fn test_restore_multiple_annotations() {
        let source = "[Code]\nname=C\nstatic const float k = 1;\n\
                      [[rx::resGroup0()]] float a();\n\
                      void f() { int x[2]; }\n\
                      [[rx::dynResGroup1()]]\n  Texture2D t\n  ();\n\
                      float4 main() { return a(); }\n";
        let model = model(source);
        let block = &model.code_blocks[0];
        assert_eq!(block.replace_spans.len(), 2);

        let spliced = splice_body(block, source, SpliceOptions::default()).unwrap();
        assert_eq!(spliced.restore(), block.text(source));
        assert!(spliced.text.contains("/*[[rx::dynResGroup1()]]\n  Texture2D t\n  ();*/"));
        for span in &spliced.commented {
            let inner = span.text(&spliced.text);
            assert!(inner.starts_with("[["));
            assert!(inner.ends_with(';'));
        }
    }

    #[test]
    fn test_pad_lines() {
        let source = "[Code]\nname=C\n\nfloat4 main();\n";
        let model = model(source);
        let block = &model.code_blocks[0];
        let spliced = splice_body(block, source, SpliceOptions { pad_lines: true }).unwrap();

        let padding = (block.line_offset - 1) as usize;
        assert!(spliced.text[..padding].chars().all(|c| c == '\n'));
        assert_eq!(spliced.body.start, padding);
        assert_eq!(spliced.restore(), block.text(source));
    }

    #[test]
    fn test_comment_terminator_in_annotation() {
        let source = "[Code]\nname=C\n[[rx::resGroup0()]] float /*x*/ a();\n";
        let model = model(source);
        let block = &model.code_blocks[0];
        assert_eq!(block.replace_spans.len(), 1);
        let err = splice_body(block, source, SpliceOptions::default()).unwrap_err();
        assert!(matches!(err, ShardError::SpliceError { .. }));
    }

    #[test]
    fn test_empty_body() {
        let source = "[Code]\nname=C\n";
        let model = model(source);
        let spliced = splice_body(&model.code_blocks[0], source, SpliceOptions::default()).unwrap();
        assert!(spliced.text.is_empty());
        assert!(spliced.commented.is_empty());
    }
}
