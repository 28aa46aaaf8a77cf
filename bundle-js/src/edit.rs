//! Textual overlay on a source slice.
//!
//! Rendering rewrites identifiers and strips keywords in place while leaving
//! everything else byte-identical, so the buffer works as a sparse list of
//! non-overlapping edits over the original text rather than a rope. Offsets
//! are relative to the slice the buffer was created over.

use crate::loc::Loc;

#[derive(Debug)]
struct Edit {
  start: usize,
  end: usize,
  text: String,
}

#[derive(Debug)]
pub struct EditBuffer<'a> {
  original: &'a str,
  edits: Vec<Edit>,
  prefix: String,
  suffix: String,
  sourcemap_locations: Vec<usize>,
}

impl<'a> EditBuffer<'a> {
  pub fn new(original: &'a str) -> EditBuffer<'a> {
    EditBuffer {
      original,
      edits: Vec::new(),
      prefix: String::new(),
      suffix: String::new(),
      sourcemap_locations: Vec::new(),
    }
  }

  /// Replaces `loc` with `text`. Ranges must not overlap other edits.
  pub fn overwrite(&mut self, loc: Loc, text: impl Into<String>) {
    debug_assert!(loc.1 <= self.original.len());
    self.edits.push(Edit {
      start: loc.0,
      end: loc.1,
      text: text.into(),
    });
  }

  /// Deletes `loc` from the output.
  pub fn remove(&mut self, loc: Loc) {
    self.overwrite(loc, "");
  }

  pub fn prepend(&mut self, text: impl Into<String>) {
    let text = text.into();
    self.prefix = text + &self.prefix;
  }

  pub fn append(&mut self, text: impl Into<String>) {
    self.suffix.push_str(&text.into());
  }

  /// Records an offset that downstream source-map emission should anchor.
  pub fn add_sourcemap_location(&mut self, offset: usize) {
    self.sourcemap_locations.push(offset);
  }

  pub fn sourcemap_locations(&self) -> &[usize] {
    &self.sourcemap_locations
  }

  /// Applies all edits and returns the rewritten text, whitespace-trimmed at
  /// both ends.
  pub fn render(mut self) -> String {
    self.edits.sort_by_key(|e| (e.start, e.end));
    let mut out = self.prefix;
    let mut cursor = 0;
    for edit in &self.edits {
      // Overlapping edits indicate a rendering bug; the later one wins the
      // overlapping region in release builds.
      debug_assert!(edit.start >= cursor, "overlapping edits");
      if edit.start > cursor {
        out.push_str(&self.original[cursor..edit.start]);
      }
      out.push_str(&edit.text);
      cursor = edit.end.max(cursor);
    }
    if cursor < self.original.len() {
      out.push_str(&self.original[cursor..]);
    }
    out.push_str(&self.suffix);
    out.trim().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn applies_edits_in_offset_order() {
    let mut buffer = EditBuffer::new("const util = helper();");
    buffer.overwrite(Loc(6, 10), "_util");
    buffer.overwrite(Loc(13, 19), "_helper");
    assert_eq!(buffer.render(), "const _util = _helper();");
  }

  #[test]
  fn removes_and_wraps() {
    let mut buffer = EditBuffer::new("export var answer = 42;");
    buffer.remove(Loc(0, 7));
    buffer.append(" // tail");
    buffer.prepend("/* head */ ");
    assert_eq!(buffer.render(), "/* head */ var answer = 42; // tail");
  }

  #[test]
  fn trims_surrounding_whitespace() {
    let mut buffer = EditBuffer::new("  let a = 1;\n");
    buffer.add_sourcemap_location(2);
    assert_eq!(buffer.sourcemap_locations(), &[2]);
    assert_eq!(buffer.render(), "let a = 1;");
  }
}
