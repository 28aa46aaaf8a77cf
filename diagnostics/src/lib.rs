//! Shared diagnostics model and rendering utilities.
//!
//! The data structures here are intentionally minimal and deterministic so
//! they can be rendered identically wherever a bundle error surfaces.
//!
//! ```
//! use diagnostics::render::{render_diagnostic, SourceProvider};
//! use diagnostics::{Diagnostic, Severity, Span};
//!
//! struct SingleFile {
//!   name: String,
//!   text: String,
//! }
//!
//! impl SourceProvider for SingleFile {
//!   fn file_text(&self, name: &str) -> Option<&str> {
//!     (name == self.name).then_some(self.text.as_str())
//!   }
//! }
//!
//! let provider = SingleFile {
//!   name: "example.js".into(),
//!   text: "let x = 1;".into(),
//! };
//! let diag = Diagnostic::new(
//!   Severity::Error,
//!   "TEST0001",
//!   "an example error",
//!   Some(Span::new("example.js", 4, 5)),
//! );
//! let rendered = render_diagnostic(&provider, &diag);
//! assert!(rendered.contains("TEST0001"));
//! assert!(rendered.contains("--> example.js:1:5"));
//! ```

pub mod render;

use bundle_js::err::BundleError;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A byte span within a named file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
  pub file: String,
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn new(file: impl Into<String>, start: usize, end: usize) -> Span {
    Span {
      file: file.into(),
      start,
      end,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Severity {
  Error,
  Warning,
  Note,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A user-facing diagnostic with an optional primary span and notes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub span: Option<Span>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    code: &'static str,
    message: impl Into<String>,
    span: Option<Span>,
  ) -> Diagnostic {
    Diagnostic {
      code,
      severity,
      message: message.into(),
      span,
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    Diagnostic::new(Severity::Error, code, message, span)
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Diagnostic {
    self.notes.push(note.into());
    self
  }
}

/// Converts a [`BundleError`] into a renderable [`Diagnostic`].
pub fn diagnostic_from_bundle_error(err: &BundleError) -> Diagnostic {
  let span = match (&err.file, &err.loc) {
    (Some(file), Some(loc)) => Some(Span::new(file.clone(), loc.0, loc.1)),
    (Some(file), None) => Some(Span::new(file.clone(), 0, 0)),
    _ => None,
  };
  Diagnostic::error(err.code(), err.typ.message(), span)
}

/// A diagnostic for a host-level failure (I/O, invalid invocation).
pub fn host_error(message: impl Into<String>) -> Diagnostic {
  Diagnostic::error("HOST0001", message, None)
}

#[cfg(test)]
mod tests {
  use super::*;
  use bundle_js::err::BundleErrorType;
  use bundle_js::loc::Loc;

  #[test]
  fn converts_bundle_error() {
    let err = BundleError::at(
      BundleErrorType::NoSuchExport {
        name: "deep".into(),
        module: "b.js".into(),
        importer: "a.js".into(),
      },
      "a.js",
      Loc(10, 14),
    );
    let diagnostic = diagnostic_from_bundle_error(&err);
    assert_eq!(diagnostic.code, "BUNDLE0003");
    assert_eq!(diagnostic.span, Some(Span::new("a.js", 10, 14)));
    assert!(diagnostic.message.contains("deep"));
  }

  #[test]
  fn errors_without_files_have_no_span() {
    let err = BundleError::new(BundleErrorType::NotSupported("x"));
    let diagnostic = diagnostic_from_bundle_error(&err);
    assert!(diagnostic.span.is_none());
  }
}
