//! Identifier deconfliction for the flattened output scope.

use crate::ident::is_id_continue;
use crate::ident::is_reserved_word;
use ahash::HashSet;

/// Rewrites an arbitrary string into a legal identifier: illegal characters
/// become `_`, and a leading digit or reserved word gains a `_` prefix.
/// Idempotent: applying it twice changes nothing.
pub fn make_legal_identifier(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    out.push(if is_id_continue(c) { c } else { '_' });
  }
  if out.is_empty() {
    return "_".to_string();
  }
  if out.starts_with(|c: char| c.is_ascii_digit()) || is_reserved_word(&out) {
    out.insert(0, '_');
  }
  out
}

/// Prefixes `_` until `name` no longer collides with `taken`.
pub fn deconflict(name: &str, taken: &HashSet<String>) -> String {
  let mut candidate = name.to_string();
  while taken.contains(&candidate) {
    candidate.insert(0, '_');
  }
  candidate
}

/// The shared used-name set for one bundle. Every canonical name must pass
/// through here exactly once so the flattened scope stays collision-free.
#[derive(Default)]
pub struct NameAllocator {
  used: HashSet<String>,
}

impl NameAllocator {
  pub fn new() -> NameAllocator {
    NameAllocator::default()
  }

  /// Reserves a name without claiming it for any binding. Used for assumed
  /// globals, which must keep their spelling.
  pub fn reserve(&mut self, name: impl Into<String>) {
    self.used.insert(name.into());
  }

  pub fn is_taken(&self, name: &str) -> bool {
    self.used.contains(name)
  }

  /// Claims a unique name derived from `base`.
  pub fn claim(&mut self, base: &str) -> String {
    let name = deconflict(base, &self.used);
    self.used.insert(name.clone());
    name
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legalises_paths() {
    assert_eq!(make_legal_identifier("foo"), "foo");
    assert_eq!(make_legal_identifier("foo-bar.js"), "foo_bar_js");
    assert_eq!(make_legal_identifier("123"), "_123");
    assert_eq!(make_legal_identifier("default"), "_default");
    assert_eq!(make_legal_identifier(""), "_");
  }

  #[test]
  fn legalise_is_idempotent() {
    for input in ["foo", "foo-bar.js", "123", "default", "", "_if", "$"] {
      let once = make_legal_identifier(input);
      assert_eq!(make_legal_identifier(&once), once);
    }
  }

  #[test]
  fn allocator_prefixes_until_unique() {
    let mut allocator = NameAllocator::new();
    assert_eq!(allocator.claim("util"), "util");
    assert_eq!(allocator.claim("util"), "_util");
    assert_eq!(allocator.claim("util"), "__util");
    assert_eq!(allocator.claim("other"), "other");
  }

  #[test]
  fn reserved_names_are_never_claimed() {
    let mut allocator = NameAllocator::new();
    allocator.reserve("Math");
    assert_eq!(allocator.claim("Math"), "_Math");
    assert!(allocator.is_taken("Math"));
  }
}
