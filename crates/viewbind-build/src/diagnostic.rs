use std::fmt::{self, Display};

///
/// Severity
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

///
/// DiagnosticKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum DiagnosticKind {
    ArtifactWriteFailure,
    DuplicateSlotOnSameClass,
    InvalidDeclarationSite,
    SourceUnavailable,
}

///
/// Location
/// source position of the element a diagnostic is attributed to
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A location naming only the file.
    #[must_use]
    pub fn file(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            // columns are zero-based in spans, one-based for humans
            write!(f, "{}:{}:{}", self.file, self.line, self.column + 1)
        }
    }
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub location: Option<Location>,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(kind: DiagnosticKind, location: Option<Location>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            location,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(
        kind: DiagnosticKind,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            location,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_attributes_to_source_position() {
        let diag = Diagnostic::error(
            DiagnosticKind::InvalidDeclarationSite,
            Some(Location::new("src/home.rs", 12, 4)),
            "field `title` must not be private",
        );

        assert_eq!(
            diag.to_string(),
            "src/home.rs:12:5: error: field `title` must not be private"
        );
    }

    #[test]
    fn display_without_line_names_file_only() {
        let diag = Diagnostic::warning(
            DiagnosticKind::SourceUnavailable,
            Some(Location::file("src/gone.rs")),
            "skipped",
        );

        assert_eq!(diag.to_string(), "src/gone.rs: warning: skipped");
        assert!(!diag.is_error());
    }
}
