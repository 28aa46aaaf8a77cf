use crate::Diagnostic;
use std::cmp::max;
use std::fmt::Write;

/// Provides access to source text for rendering diagnostics.
///
/// Returning `None` lets consumers degrade gracefully when a file is
/// unavailable (external modules, host errors).
pub trait SourceProvider {
  fn file_text(&self, file: &str) -> Option<&str>;
}

/// Renders a diagnostic into a human-readable string with caret
/// highlighting, in the `error[CODE]: … --> file:line:col` shape.
pub fn render_diagnostic(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  )
  .unwrap();

  if let Some(span) = &diagnostic.span {
    let text = provider.file_text(&span.file);
    let (line, col) = text
      .map(|text| line_and_column(text, span.start))
      .unwrap_or((1, span.start + 1));
    writeln!(output, " --> {}:{}:{}", span.file, line, col).unwrap();
    if let Some(text) = text {
      render_snippet(&mut output, text, span.start, span.end);
    }
  }

  for note in &diagnostic.notes {
    writeln!(output, "= note: {}", note).unwrap();
  }
  output
}

fn render_snippet(output: &mut String, text: &str, start: usize, end: usize) {
  let start = start.min(text.len());
  let end = end.clamp(start, text.len());
  let line_start = text[..start].rfind('\n').map(|at| at + 1).unwrap_or(0);
  let line_end = text[start..]
    .find('\n')
    .map(|at| start + at)
    .unwrap_or(text.len());
  let line_no = text[..start].bytes().filter(|b| *b == b'\n').count() + 1;
  let gutter = line_no.to_string();

  writeln!(output, "{} |", " ".repeat(gutter.len())).unwrap();
  writeln!(output, "{} | {}", gutter, &text[line_start..line_end]).unwrap();
  let caret_offset = start - line_start;
  let caret_len = max(1, end.min(line_end) - start);
  writeln!(
    output,
    "{} | {}{}",
    " ".repeat(gutter.len()),
    " ".repeat(caret_offset),
    "^".repeat(caret_len)
  )
  .unwrap();
}

fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
  let offset = offset.min(text.len());
  let line = text[..offset].bytes().filter(|b| *b == b'\n').count() + 1;
  let line_start = text[..offset].rfind('\n').map(|at| at + 1).unwrap_or(0);
  (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Severity;
  use crate::Span;

  struct OneFile(&'static str, &'static str);

  impl SourceProvider for OneFile {
    fn file_text(&self, file: &str) -> Option<&str> {
      (file == self.0).then_some(self.1)
    }
  }

  #[test]
  fn renders_caret_under_span() {
    let provider = OneFile("test.js", "let x = 1;");
    let diagnostic = Diagnostic::new(
      Severity::Error,
      "TEST0001",
      "unused variable",
      Some(Span::new("test.js", 4, 5)),
    );
    let rendered = render_diagnostic(&provider, &diagnostic);
    let expected =
      "error[TEST0001]: unused variable\n --> test.js:1:5\n  |\n1 | let x = 1;\n  |     ^\n";
    assert_eq!(rendered, expected);
  }

  #[test]
  fn renders_line_and_column_on_later_lines() {
    let provider = OneFile("m.js", "const a = 1;\nconst b = oops;\n");
    let diagnostic = Diagnostic::new(
      Severity::Error,
      "TEST0002",
      "bad",
      Some(Span::new("m.js", 23, 27)),
    );
    let rendered = render_diagnostic(&provider, &diagnostic);
    assert!(rendered.contains(" --> m.js:2:11"));
    assert!(rendered.contains("^^^^"));
  }

  #[test]
  fn missing_files_render_without_snippet() {
    struct NoFiles;
    impl SourceProvider for NoFiles {
      fn file_text(&self, _file: &str) -> Option<&str> {
        None
      }
    }
    let diagnostic = Diagnostic::new(
      Severity::Error,
      "TEST0003",
      "gone",
      Some(Span::new("missing.js", 3, 4)),
    )
    .with_note("a note");
    let rendered = render_diagnostic(&NoFiles, &diagnostic);
    assert!(rendered.contains(" --> missing.js:1:4"));
    assert!(rendered.contains("= note: a note"));
    assert!(!rendered.contains('^'));
  }
}
