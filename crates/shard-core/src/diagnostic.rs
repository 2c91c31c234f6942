//! Diagnostics collected while processing one input file

use crate::error::ShardError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single diagnostic message tied to a source line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.line, self.severity, self.message
        )
    }
}

/// All diagnostics for one input file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub file: String,
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty report for a file
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            entries: Vec::new(),
        }
    }

    /// Record a diagnostic, forwarding it to the log
    pub fn push(&mut self, severity: Severity, line: u32, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity,
            file: self.file.clone(),
            line,
            message: message.into(),
        };
        match severity {
            Severity::Error => log::error!("{}", diagnostic),
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Info => log::info!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn error(&mut self, line: u32, message: impl Into<String>) {
        self.push(Severity::Error, line, message);
    }

    pub fn warning(&mut self, line: u32, message: impl Into<String>) {
        self.push(Severity::Warning, line, message);
    }

    pub fn info(&mut self, line: u32, message: impl Into<String>) {
        self.push(Severity::Info, line, message);
    }

    /// Check if the file is usable (no errors)
    pub fn is_valid(&self) -> bool {
        !self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        let total = self.entries.len();
        if total == 0 {
            return "No diagnostics.".to_string();
        }

        format!(
            "{} diagnostic(s): {} error(s), {} warning(s)",
            total,
            self.error_count(),
            self.warning_count(),
        )
    }

    /// Turn recorded errors into a fatal error for the file
    pub fn ensure_valid(&self) -> Result<(), ShardError> {
        if self.is_valid() {
            return Ok(());
        }
        let details = self
            .errors()
            .map(|d| format!("line {}: {}", d.line, d.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ShardError::ValidationError {
            file: self.file.clone(),
            summary: format!("{} ({})", self.summary(), details),
        })
    }
}
