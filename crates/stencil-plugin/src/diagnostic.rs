//! Error reporting
//!
//! User-facing problems found while lowering are reported here instead of
//! aborting, so one compilation can surface every diagnostic in a file.
//! Callers use checkpoints to ask "did anything new go wrong" without looking
//! at diagnostic contents.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use termcolor::WriteColor;

use crate::error::{ErrorClass, LowerError};

/// Byte range of a call site within a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub file_id: usize,
    pub start: u32,
    pub end: u32,
}

impl SourceLocation {
    pub fn new(file_id: usize, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }
}

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// Get the error code for a lowering error
pub fn error_code(error: &LowerError) -> ErrorCode {
    match error {
        LowerError::DuplicateFunction { .. } => ErrorCode("L0001"),
        LowerError::UnknownFunction { .. } => ErrorCode("L0002"),
        LowerError::ArityMismatch { .. } => ErrorCode("L0003"),
        LowerError::TypeMismatch { .. } => ErrorCode("L0004"),
        LowerError::PluginConfiguration { .. } => ErrorCode("L0005"),
        LowerError::UnregisteredRuntime { .. } => ErrorCode("L0006"),
        LowerError::UnsupportedBackend { .. } => ErrorCode("L0007"),
        LowerError::InvalidArgument { .. } => ErrorCode("L0008"),
        LowerError::Internal { .. } => ErrorCode("L0009"),
    }
}

/// A diagnostic keyed to a source location
#[derive(Debug, Clone)]
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    pub fn with_primary_label(
        mut self,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        let range = location.start as usize..location.end as usize;
        let label = Label::primary(location.file_id, range).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Build the diagnostic for a lowering error at `location`
    pub fn from_lower_error(error: &LowerError, location: SourceLocation) -> Self {
        let severity = match error.class() {
            ErrorClass::Internal => Severity::Bug,
            _ => Severity::Error,
        };
        let label = match error {
            LowerError::ArityMismatch { .. } => "wrong number of arguments",
            LowerError::TypeMismatch { .. } => "argument type not accepted",
            LowerError::UnsupportedBackend { .. } => "not available for this backend",
            LowerError::InvalidArgument { .. } => "invalid argument",
            LowerError::UnknownFunction { .. } => "unknown function",
            _ => "while lowering this call",
        };
        let diag = Diagnostic::new(severity, error.to_string())
            .with_code(error_code(error))
            .with_primary_label(location, label);
        match error {
            LowerError::UnsupportedBackend { .. } => {
                diag.with_note("the function is only implemented for some backends")
            }
            _ => diag,
        }
    }

    pub fn severity(&self) -> Severity {
        self.inner.severity
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn is_error(&self) -> bool {
        self.inner.severity >= Severity::Error
    }

    /// Get the underlying codespan diagnostic (for custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Render the diagnostic against its source
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Convert to JSON for tooling
    pub fn to_json(
        &self,
        files: &SimpleFiles<String, String>,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Bug => "bug",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let location = file.location((), label.range.start).ok()?;
                Some(JsonLabel {
                    file: file.name().to_string(),
                    line: location.line_number,
                    column: location.column_number,
                    message: label.message.clone(),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Opaque marker returned by [`ErrorReporter::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    error_count: usize,
}

/// Sink for user-facing diagnostics
pub trait ErrorReporter {
    /// Record a diagnostic
    fn report(&mut self, diagnostic: Diagnostic);

    /// Marker for the current error count
    fn checkpoint(&self) -> Checkpoint;

    /// Have any errors been reported since `checkpoint` was taken?
    fn errors_since(&self, checkpoint: Checkpoint) -> bool;
}

/// In-memory reporter that keeps every diagnostic
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Render every diagnostic in report order
    pub fn emit_all(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        for diag in &self.diagnostics {
            diag.emit(writer, files)?;
        }
        Ok(())
    }
}

impl ErrorReporter for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            error_count: self.error_count,
        }
    }

    fn errors_since(&self, checkpoint: Checkpoint) -> bool {
        self.error_count > checkpoint.error_count
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(
    name: impl Into<String>,
    source: impl Into<String>,
) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}
