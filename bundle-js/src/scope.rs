//! Lexical scope tree.
//!
//! One tree is built per statement during analysis; the module's own
//! top-level names live outside the tree and act as the implicit root.
//! Scopes are arena-allocated and addressed by index, so parent links are
//! plain handles rather than reference-counted cells.

use ahash::HashSet;
use ahash::HashSetExt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeKind {
  // Block-like scopes: blocks, for-heads, catch clauses, switch bodies.
  Block,
  // Function-like scopes: function/method/arrow bodies and parameter lists.
  // These mark the boundary between load-time ("strong") and deferred
  // ("weak") execution.
  Function,
}

#[derive(Debug)]
pub struct Scope {
  pub kind: ScopeKind,
  pub parent: Option<ScopeId>,
  declarations: HashSet<String>,
}

impl Scope {
  pub fn declares(&self, name: &str) -> bool {
    self.declarations.contains(name)
  }
}

#[derive(Debug, Default)]
pub struct ScopeTree {
  scopes: Vec<Scope>,
}

impl ScopeTree {
  pub fn new() -> ScopeTree {
    ScopeTree::default()
  }

  pub fn create(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
    let id = ScopeId(self.scopes.len());
    self.scopes.push(Scope {
      kind,
      parent,
      declarations: HashSet::new(),
    });
    id
  }

  pub fn get(&self, id: ScopeId) -> &Scope {
    &self.scopes[id.0]
  }

  pub fn declare(&mut self, id: ScopeId, name: impl Into<String>) {
    self.scopes[id.0].declarations.insert(name.into());
  }

  /// Resolves a name against the scope chain. `None` means the name falls
  /// through to the module's top level (or is a global).
  pub fn resolve(&self, mut id: ScopeId, name: &str) -> Option<ScopeId> {
    loop {
      if self.get(id).declares(name) {
        return Some(id);
      }
      id = self.get(id).parent?;
    }
  }

  /// Whether any scope on the chain from `id` to the root crosses a function
  /// boundary. References below a boundary execute lazily.
  pub fn crosses_function_boundary(&self, mut id: ScopeId) -> bool {
    loop {
      let scope = self.get(id);
      if scope.kind == ScopeKind::Function {
        return true;
      }
      match scope.parent {
        Some(parent) => id = parent,
        None => return false,
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_through_chain() {
    let mut tree = ScopeTree::new();
    let root = tree.create(ScopeKind::Block, None);
    let func = tree.create(ScopeKind::Function, Some(root));
    let inner = tree.create(ScopeKind::Block, Some(func));
    tree.declare(root, "outer");
    tree.declare(func, "param");
    tree.declare(inner, "local");

    assert_eq!(tree.resolve(inner, "local"), Some(inner));
    assert_eq!(tree.resolve(inner, "param"), Some(func));
    assert_eq!(tree.resolve(inner, "outer"), Some(root));
    assert_eq!(tree.resolve(inner, "missing"), None);
  }

  #[test]
  fn detects_function_boundaries() {
    let mut tree = ScopeTree::new();
    let root = tree.create(ScopeKind::Block, None);
    let func = tree.create(ScopeKind::Function, Some(root));
    let block = tree.create(ScopeKind::Block, Some(func));
    let sibling = tree.create(ScopeKind::Block, Some(root));

    assert!(!tree.crosses_function_boundary(root));
    assert!(tree.crosses_function_boundary(func));
    assert!(tree.crosses_function_boundary(block));
    assert!(!tree.crosses_function_boundary(sibling));
  }
}
