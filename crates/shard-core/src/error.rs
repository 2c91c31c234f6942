//! Error types for Shard

use thiserror::Error;

/// The main error type for Shard operations
#[derive(Debug, Error)]
pub enum ShardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{file}:{line}: syntax error: {message}")]
    SyntaxError {
        file: String,
        line: u32,
        message: String,
    },

    #[error("Duplicate {kind} '{name}' in resource group {group}")]
    DuplicateResource {
        group: String,
        kind: String,
        name: String,
    },

    #[error(
        "Type mismatch for '{name}' in resource group {group}: \
         declared as {expected}, used as {found}"
    )]
    TypeMismatch {
        group: String,
        name: String,
        expected: String,
        found: String,
    },

    #[error("Unknown constant type '{type_name}' for '{name}'")]
    UnknownConstantType { name: String, type_name: String },

    #[error("Resource '{name}' is not declared in resource group {group}")]
    UndeclaredResource { group: String, name: String },

    #[error("Code block not found: {0}")]
    CodeBlockNotFound(String),

    #[error("Render program '{program}' has no code block: {reason}")]
    MissingCodeBlock { program: String, reason: String },

    #[error("Splice error in code block {block}: {message}")]
    SpliceError { block: String, message: String },

    #[error("Compilation of '{entry_point}' failed:\n{message}")]
    CompileError {
        entry_point: String,
        message: String,
    },

    #[error("Reflection of '{entry_point}' failed: {message}")]
    ReflectError {
        entry_point: String,
        message: String,
    },

    #[error("Cross-compilation of '{entry_point}' to {dialect} failed: {message}")]
    CrossCompileError {
        entry_point: String,
        dialect: String,
        message: String,
    },

    #[error("Validation failed for {file}: {summary}")]
    ValidationError { file: String, summary: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Shard operations
pub type Result<T> = std::result::Result<T, ShardError>;

impl From<toml::de::Error> for ShardError {
    fn from(err: toml::de::Error) -> Self {
        ShardError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ShardError {
    fn from(err: toml::ser::Error) -> Self {
        ShardError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_names_declaration() {
        let err = ShardError::TypeMismatch {
            group: "Foo".to_string(),
            name: "baseColor".to_string(),
            expected: "float4".to_string(),
            found: "float2".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("baseColor"));
        assert!(text.contains("float4"));
        assert!(text.contains("float2"));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = ShardError::SyntaxError {
            file: "lit.shard".to_string(),
            line: 12,
            message: "expected '='".to_string(),
        };
        assert_eq!(err.to_string(), "lit.shard:12: syntax error: expected '='");
    }
}
