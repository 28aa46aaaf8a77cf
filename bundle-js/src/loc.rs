use crate::err::SyntaxError;
use crate::err::SyntaxErrorType;
use crate::token::TT;
use std::cmp::max;
use std::cmp::min;

/// A half-open range of UTF-8 byte offsets within a single source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1 - self.0
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  pub fn contains(&self, offset: usize) -> bool {
    offset >= self.0 && offset < self.1
  }

  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }
}

/// Computes the 1-based line and column of a byte offset within `source`.
///
/// Columns count bytes, matching how editors address plain-ASCII sources;
/// offsets past the end clamp to the final position.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
  let offset = offset.min(source.len());
  let mut line = 1;
  let mut line_start = 0;
  for (i, b) in source.bytes().enumerate() {
    if i >= offset {
      break;
    }
    if b == b'\n' {
      line += 1;
      line_start = i + 1;
    }
  }
  (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extend_covers_both_ranges() {
    let mut a = Loc(4, 7);
    a.extend(Loc(1, 5));
    assert_eq!(a, Loc(1, 7));
    a.extend(Loc(9, 12));
    assert_eq!(a, Loc(1, 12));
  }

  #[test]
  fn line_col_counts_from_one() {
    let src = "let a;\nlet b;\n";
    assert_eq!(line_col(src, 0), (1, 1));
    assert_eq!(line_col(src, 4), (1, 5));
    assert_eq!(line_col(src, 7), (2, 1));
    assert_eq!(line_col(src, 11), (2, 5));
    assert_eq!(line_col(src, 1000), (3, 1));
  }
}
