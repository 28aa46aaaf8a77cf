//! Per-statement static analysis.
//!
//! Each top-level statement owns the four identifier sets driving
//! tree-shaking, plus the list of source references that rendering rewrites.
//! Granularity is the top-level statement: nothing inside function bodies is
//! shaken, but references inside them still contribute (weak) dependencies.

use crate::ast::*;
use crate::loc::Loc;
use crate::scope::ScopeId;
use crate::scope::ScopeKind;
use crate::scope::ScopeTree;
use ahash::HashSet;
use ahash::HashSetExt;
use std::collections::BTreeSet;

/// An identifier occurrence that resolved to the module's top level. `loc`
/// addresses exactly the identifier token, so rendering can overwrite it
/// in place. Shorthand occurrences (`{ a }`) expand to `a: <new>` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
  pub name: String,
  pub loc: Loc,
  pub is_write: bool,
  pub shorthand: bool,
}

pub struct Statement {
  pub node: Stmt,
  pub index: usize,
  /// The byte range rendering re-slices. For split declarators this covers
  /// the declarator only; `var_kind` carries the reconstructed keyword.
  pub loc: Loc,
  pub var_kind: Option<VarDeclKind>,
  pub scope: ScopeTree,
  pub root_scope: ScopeId,
  pub defines: BTreeSet<String>,
  pub modifies: BTreeSet<String>,
  pub depends_on: BTreeSet<String>,
  pub strongly_depends_on: BTreeSet<String>,
  pub references: Vec<Reference>,
  pub is_included: bool,
  pub is_import_declaration: bool,
  pub is_export_declaration: bool,
}

impl Statement {
  pub fn new(node: Stmt, index: usize, loc: Loc, var_kind: Option<VarDeclKind>) -> Statement {
    let is_import_declaration = matches!(node, Stmt::Import(_));
    let is_export_declaration = matches!(
      node,
      Stmt::ExportAll(_) | Stmt::ExportDecl(_) | Stmt::ExportDefault(_) | Stmt::ExportList(_)
    );
    let mut scope = ScopeTree::new();
    let root_scope = scope.create(ScopeKind::Block, None);
    let mut defines = BTreeSet::new();
    compute_defines(&node, &mut defines);
    Statement {
      node,
      index,
      loc,
      var_kind,
      scope,
      root_scope,
      defines,
      modifies: BTreeSet::new(),
      depends_on: BTreeSet::new(),
      strongly_depends_on: BTreeSet::new(),
      references: Vec::new(),
      is_included: false,
      is_import_declaration,
      is_export_declaration,
    }
  }

  /// `export * from '…'`, resolved on demand as an export delegate.
  pub fn is_export_all(&self) -> bool {
    matches!(self.node, Stmt::ExportAll(_))
  }

  /// Computes the reference sets against the module's top-level names.
  /// Returns the free identifiers that resolved to nothing: the assumed
  /// globals.
  pub fn analyse(&mut self, module_scope: &HashSet<String>) -> HashSet<String> {
    let node = self.node.clone();
    let mut walker = RefWalker {
      module_scope,
      own_defines: &self.defines,
      tree: &mut self.scope,
      stack: vec![self.root_scope],
      depends_on: BTreeSet::new(),
      strongly_depends_on: BTreeSet::new(),
      modifies: BTreeSet::new(),
      references: Vec::new(),
      unknowns: HashSet::new(),
    };
    walker.walk_stmt(&node);
    self.depends_on = walker.depends_on;
    self.strongly_depends_on = walker.strongly_depends_on;
    self.modifies = walker.modifies;
    self.references = walker.references;
    walker.unknowns
  }
}

/// Names a top-level statement contributes to the module scope: lexical
/// declarations at the statement root plus `var`s hoisted out of any nested
/// blocks (function bodies excluded).
pub fn compute_defines(stmt: &Stmt, out: &mut BTreeSet<String>) {
  match stmt {
    Stmt::Var(decl) => {
      for declarator in &decl.declarators {
        pat_names(&declarator.pat, &mut |id| {
          out.insert(id.name.clone());
        });
      }
    }
    Stmt::Func(decl) => {
      out.insert(decl.name.name.clone());
    }
    Stmt::Class(decl) => {
      out.insert(decl.name.name.clone());
    }
    Stmt::ExportDecl(export) => compute_defines(&export.decl, out),
    Stmt::ExportDefault(export) => match &export.decl {
      DefaultDecl::Func {
        name: Some(name), ..
      }
      | DefaultDecl::Class {
        name: Some(name), ..
      } => {
        out.insert(name.name.clone());
      }
      _ => {}
    },
    Stmt::Import(_) | Stmt::ExportAll(_) | Stmt::ExportList(_) => {}
    other => hoist_var_names(other, &mut |id| {
      out.insert(id.name.clone());
    }),
  }
}

/// Collects `var`-declared names reachable without crossing a function
/// boundary. Function declarations in nested blocks are block-scoped in
/// module (strict) code and do not hoist.
fn hoist_var_names(stmt: &Stmt, f: &mut impl FnMut(&Ident)) {
  match stmt {
    Stmt::Var(decl) => {
      if decl.kind == VarDeclKind::Var {
        for declarator in &decl.declarators {
          pat_names(&declarator.pat, f);
        }
      }
    }
    Stmt::Block(block) => {
      for stmt in &block.body {
        hoist_var_names(stmt, f);
      }
    }
    Stmt::If(s) => {
      hoist_var_names(&s.cons, f);
      if let Some(alt) = &s.alt {
        hoist_var_names(alt, f);
      }
    }
    Stmt::For(s) => {
      if let Some(ForInit::Var(decl)) = &s.init {
        if decl.kind == VarDeclKind::Var {
          for declarator in &decl.declarators {
            pat_names(&declarator.pat, f);
          }
        }
      }
      hoist_var_names(&s.body, f);
    }
    Stmt::ForInOf(s) => {
      if let ForHead::Var(decl) = &s.left {
        if decl.kind == VarDeclKind::Var {
          for declarator in &decl.declarators {
            pat_names(&declarator.pat, f);
          }
        }
      }
      hoist_var_names(&s.body, f);
    }
    Stmt::While(s) => hoist_var_names(&s.body, f),
    Stmt::DoWhile(s) => hoist_var_names(&s.body, f),
    Stmt::Labeled(s) => hoist_var_names(&s.body, f),
    Stmt::Switch(s) => {
      for case in &s.cases {
        for stmt in &case.body {
          hoist_var_names(stmt, f);
        }
      }
    }
    Stmt::Try(s) => {
      for stmt in &s.block {
        hoist_var_names(stmt, f);
      }
      if let Some(catch) = &s.catch {
        for stmt in &catch.body {
          hoist_var_names(stmt, f);
        }
      }
      if let Some(finally) = &s.finally {
        for stmt in finally {
          hoist_var_names(stmt, f);
        }
      }
    }
    _ => {}
  }
}

/// Every binding identifier a pattern introduces.
pub fn pat_names(pat: &Pat, f: &mut impl FnMut(&Ident)) {
  match pat {
    Pat::Id(id) => f(id),
    Pat::Array(array) => {
      for element in array.elements.iter().flatten() {
        pat_names(element, f);
      }
    }
    Pat::Object(object) => {
      for prop in &object.props {
        pat_names(&prop.value, f);
      }
      if let Some(rest) = &object.rest {
        pat_names(rest, f);
      }
    }
    Pat::Assign(assign) => pat_names(&assign.target, f),
    Pat::Rest(rest) => pat_names(&rest.target, f),
    Pat::Expr(_) => {}
  }
}

struct RefWalker<'a> {
  module_scope: &'a HashSet<String>,
  own_defines: &'a BTreeSet<String>,
  tree: &'a mut ScopeTree,
  stack: Vec<ScopeId>,
  depends_on: BTreeSet<String>,
  strongly_depends_on: BTreeSet<String>,
  modifies: BTreeSet<String>,
  references: Vec<Reference>,
  unknowns: HashSet<String>,
}

impl<'a> RefWalker<'a> {
  fn cur(&self) -> ScopeId {
    *self.stack.last().unwrap()
  }

  fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
    let id = self.tree.create(kind, Some(self.cur()));
    self.stack.push(id);
    id
  }

  fn pop_scope(&mut self) {
    self.stack.pop();
  }

  fn resolves_locally(&self, name: &str) -> bool {
    self.tree.resolve(self.cur(), name).is_some()
  }

  fn depend(&mut self, name: &str) {
    if self.own_defines.contains(name) {
      return;
    }
    self.depends_on.insert(name.to_string());
    if !self.tree.crosses_function_boundary(self.cur()) {
      self.strongly_depends_on.insert(name.to_string());
    }
  }

  fn read(&mut self, id: &Ident, shorthand: bool) {
    if self.resolves_locally(&id.name) {
      return;
    }
    if self.module_scope.contains(&id.name) {
      self.references.push(Reference {
        name: id.name.clone(),
        loc: id.loc,
        is_write: false,
        shorthand,
      });
    } else {
      self.unknowns.insert(id.name.clone());
    }
    self.depend(&id.name);
  }

  fn write(&mut self, id: &Ident, also_reads: bool) {
    if self.resolves_locally(&id.name) {
      return;
    }
    if self.module_scope.contains(&id.name) {
      self.references.push(Reference {
        name: id.name.clone(),
        loc: id.loc,
        is_write: true,
        shorthand: false,
      });
    } else {
      self.unknowns.insert(id.name.clone());
    }
    if !self.own_defines.contains(&id.name) {
      self.modifies.insert(id.name.clone());
    }
    if also_reads {
      self.depend(&id.name);
    }
  }

  /// A binding identifier introduced at the statement root: not a dependency,
  /// but still a rename site.
  fn declaration(&mut self, id: &Ident, shorthand: bool) {
    if self.resolves_locally(&id.name) {
      return;
    }
    if self.module_scope.contains(&id.name) {
      self.references.push(Reference {
        name: id.name.clone(),
        loc: id.loc,
        is_write: false,
        shorthand,
      });
    }
  }

  fn declare_lexical(&mut self, stmts: &[Stmt]) {
    let scope = self.cur();
    for stmt in stmts {
      match stmt {
        Stmt::Var(decl) if decl.kind != VarDeclKind::Var => {
          let tree = &mut self.tree;
          for declarator in &decl.declarators {
            pat_names(&declarator.pat, &mut |id| {
              tree.declare(scope, id.name.clone());
            });
          }
        }
        Stmt::Func(decl) => self.tree.declare(scope, decl.name.name.clone()),
        Stmt::Class(decl) => self.tree.declare(scope, decl.name.name.clone()),
        _ => {}
      }
    }
  }

  fn declare_pat(&mut self, pat: &Pat) {
    let scope = self.cur();
    let tree = &mut self.tree;
    pat_names(pat, &mut |id| {
      tree.declare(scope, id.name.clone());
    });
  }

  fn enter_function(&mut self, name: Option<&Ident>, params: &[Pat], body: &[Stmt]) {
    self.push_scope(ScopeKind::Function);
    if let Some(name) = name {
      let scope = self.cur();
      self.tree.declare(scope, name.name.clone());
    }
    for param in params {
      self.declare_pat(param);
    }
    {
      let scope = self.cur();
      let tree = &mut self.tree;
      for stmt in body {
        hoist_var_names(stmt, &mut |id| {
          tree.declare(scope, id.name.clone());
        });
      }
    }
    self.declare_lexical(body);
    for param in params {
      self.walk_pat_defaults(param);
    }
    for stmt in body {
      self.walk_stmt(stmt);
    }
    self.pop_scope();
  }

  fn enter_arrow(&mut self, params: &[Pat], body: &ArrowBody) {
    self.push_scope(ScopeKind::Function);
    for param in params {
      self.declare_pat(param);
    }
    match body {
      ArrowBody::Block(stmts) => {
        {
          let scope = self.cur();
          let tree = &mut self.tree;
          for stmt in stmts {
            hoist_var_names(stmt, &mut |id| {
              tree.declare(scope, id.name.clone());
            });
          }
        }
        self.declare_lexical(stmts);
        for param in params {
          self.walk_pat_defaults(param);
        }
        for stmt in stmts {
          self.walk_stmt(stmt);
        }
      }
      ArrowBody::Expr(expr) => {
        for param in params {
          self.walk_pat_defaults(param);
        }
        self.walk_expr(expr);
      }
    }
    self.pop_scope();
  }

  /// Walks the expressions inside a binding pattern: defaults and computed
  /// keys. The bound names themselves are declarations, not references.
  fn walk_pat_defaults(&mut self, pat: &Pat) {
    match pat {
      Pat::Id(_) => {}
      Pat::Array(array) => {
        for element in array.elements.iter().flatten() {
          self.walk_pat_defaults(element);
        }
      }
      Pat::Object(object) => {
        for prop in &object.props {
          if let PropKey::Computed(key) = &prop.key {
            self.walk_expr(key);
          }
          self.walk_pat_defaults(&prop.value);
        }
        if let Some(rest) = &object.rest {
          self.walk_pat_defaults(rest);
        }
      }
      Pat::Assign(assign) => {
        self.walk_pat_defaults(&assign.target);
        self.walk_expr(&assign.default);
      }
      Pat::Rest(rest) => self.walk_pat_defaults(&rest.target),
      Pat::Expr(expr) => self.walk_expr(expr),
    }
  }

  /// Walks a declarator pattern at the statement root, where bound names are
  /// module-level rename sites.
  fn walk_declared_pat(&mut self, pat: &Pat) {
    match pat {
      Pat::Id(id) => self.declaration(id, false),
      Pat::Array(array) => {
        for element in array.elements.iter().flatten() {
          self.walk_declared_pat(element);
        }
      }
      Pat::Object(object) => {
        for prop in &object.props {
          if let PropKey::Computed(key) = &prop.key {
            self.walk_expr(key);
          }
          if prop.shorthand {
            if let Pat::Id(id) = &prop.value {
              self.declaration(id, true);
              continue;
            }
            if let Pat::Assign(assign) = &prop.value {
              if let Pat::Id(id) = assign.target.as_ref() {
                self.declaration(id, true);
                self.walk_expr(&assign.default);
                continue;
              }
            }
          }
          self.walk_declared_pat(&prop.value);
        }
        if let Some(rest) = &object.rest {
          self.walk_declared_pat(rest);
        }
      }
      Pat::Assign(assign) => {
        self.walk_declared_pat(&assign.target);
        self.walk_expr(&assign.default);
      }
      Pat::Rest(rest) => self.walk_declared_pat(&rest.target),
      Pat::Expr(expr) => self.walk_expr(expr),
    }
  }

  /// Walks a destructuring *assignment* target: bound names are writes.
  fn walk_assigned_pat(&mut self, pat: &Pat) {
    match pat {
      Pat::Id(id) => self.write(id, false),
      Pat::Array(array) => {
        for element in array.elements.iter().flatten() {
          self.walk_assigned_pat(element);
        }
      }
      Pat::Object(object) => {
        for prop in &object.props {
          if let PropKey::Computed(key) = &prop.key {
            self.walk_expr(key);
          }
          self.walk_assigned_pat(&prop.value);
        }
        if let Some(rest) = &object.rest {
          self.walk_assigned_pat(rest);
        }
      }
      Pat::Assign(assign) => {
        self.walk_assigned_pat(&assign.target);
        self.walk_expr(&assign.default);
      }
      Pat::Rest(rest) => self.walk_assigned_pat(&rest.target),
      Pat::Expr(expr) => self.write_expr_target(expr),
    }
  }

  /// An assignment whose target is an arbitrary expression (`a.b.c = x`).
  /// The mutation is attributed to the root identifier of the member chain.
  fn write_expr_target(&mut self, expr: &Expr) {
    match expr {
      Expr::Id(id) => self.write(id, true),
      Expr::Member(member) => {
        if let MemberProp::Computed(index) = &member.prop {
          self.walk_expr(index);
        }
        self.write_expr_target(&member.object);
      }
      other => self.walk_expr(other),
    }
  }

  fn walk_var_decl(&mut self, decl: &VarDecl) {
    // Locally-declared names resolve in the tree and are skipped; names that
    // fall through to the module scope are rename sites.
    for declarator in &decl.declarators {
      self.walk_declared_pat(&declarator.pat);
      if let Some(init) = &declarator.init {
        self.walk_expr(init);
      }
    }
  }

  fn walk_block(&mut self, stmts: &[Stmt]) {
    self.push_scope(ScopeKind::Block);
    self.declare_lexical(stmts);
    for stmt in stmts {
      self.walk_stmt(stmt);
    }
    self.pop_scope();
  }

  fn walk_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::Block(block) => self.walk_block(&block.body),
      Stmt::Break(_) | Stmt::Continue(_) | Stmt::Debugger(_) | Stmt::Empty(_) => {}
      Stmt::Class(decl) => {
        self.declaration(&decl.name, false);
        self.walk_class(&decl.class);
      }
      Stmt::DoWhile(s) => {
        self.walk_stmt(&s.body);
        self.walk_expr(&s.test);
      }
      Stmt::ExportAll(_) | Stmt::Import(_) => {}
      Stmt::ExportDecl(export) => self.walk_stmt(&export.decl),
      Stmt::ExportDefault(export) => match &export.decl {
        DefaultDecl::Func { name, func, .. } => {
          if let Some(name) = name {
            self.declaration(name, false);
          }
          self.enter_function(None, &func.params, &func.body);
        }
        DefaultDecl::Class { name, class, .. } => {
          if let Some(name) = name {
            self.declaration(name, false);
          }
          self.walk_class(class);
        }
        DefaultDecl::Expr(expr) => self.walk_expr(expr),
      },
      Stmt::ExportList(export) => {
        // Exported locals must exist; the statement itself is never emitted.
        let names: Vec<String> = export
          .specifiers
          .iter()
          .map(|s| s.local.name.clone())
          .collect();
        for name in names {
          self.depend(&name);
        }
      }
      Stmt::Expr(s) => self.walk_expr(&s.expr),
      Stmt::For(s) => {
        self.push_scope(ScopeKind::Block);
        match &s.init {
          Some(ForInit::Var(decl)) => {
            if decl.kind != VarDeclKind::Var {
              let scope = self.cur();
              let tree = &mut self.tree;
              for declarator in &decl.declarators {
                pat_names(&declarator.pat, &mut |id| {
                  tree.declare(scope, id.name.clone());
                });
              }
            }
            self.walk_var_decl(decl);
          }
          Some(ForInit::Expr(expr)) => self.walk_expr(expr),
          None => {}
        }
        if let Some(test) = &s.test {
          self.walk_expr(test);
        }
        if let Some(update) = &s.update {
          self.walk_expr(update);
        }
        self.walk_stmt(&s.body);
        self.pop_scope();
      }
      Stmt::ForInOf(s) => {
        self.push_scope(ScopeKind::Block);
        match &s.left {
          ForHead::Var(decl) => {
            if decl.kind != VarDeclKind::Var {
              let scope = self.cur();
              let tree = &mut self.tree;
              for declarator in &decl.declarators {
                pat_names(&declarator.pat, &mut |id| {
                  tree.declare(scope, id.name.clone());
                });
              }
            }
            self.walk_var_decl(decl);
          }
          ForHead::Pat(pat) => self.walk_assigned_pat(pat),
        }
        self.walk_expr(&s.right);
        self.walk_stmt(&s.body);
        self.pop_scope();
      }
      Stmt::Func(decl) => {
        self.declaration(&decl.name, false);
        self.enter_function(None, &decl.func.params, &decl.func.body);
      }
      Stmt::If(s) => {
        self.walk_expr(&s.test);
        self.walk_stmt(&s.cons);
        if let Some(alt) = &s.alt {
          self.walk_stmt(alt);
        }
      }
      Stmt::Labeled(s) => self.walk_stmt(&s.body),
      Stmt::Return(s) => {
        if let Some(arg) = &s.arg {
          self.walk_expr(arg);
        }
      }
      Stmt::Switch(s) => {
        self.walk_expr(&s.disc);
        self.push_scope(ScopeKind::Block);
        for case in &s.cases {
          self.declare_lexical(&case.body);
        }
        for case in &s.cases {
          if let Some(test) = &case.test {
            self.walk_expr(test);
          }
          for stmt in &case.body {
            self.walk_stmt(stmt);
          }
        }
        self.pop_scope();
      }
      Stmt::Throw(s) => self.walk_expr(&s.arg),
      Stmt::Try(s) => {
        self.walk_block(&s.block);
        if let Some(catch) = &s.catch {
          self.push_scope(ScopeKind::Block);
          if let Some(param) = &catch.param {
            self.declare_pat(param);
            self.walk_pat_defaults(param);
          }
          self.declare_lexical(&catch.body);
          for stmt in &catch.body {
            self.walk_stmt(stmt);
          }
          self.pop_scope();
        }
        if let Some(finally) = &s.finally {
          self.walk_block(finally);
        }
      }
      Stmt::Var(decl) => self.walk_var_decl(decl),
      Stmt::While(s) => {
        self.walk_expr(&s.test);
        self.walk_stmt(&s.body);
      }
    }
  }

  fn walk_class(&mut self, class: &Class) {
    if let Some(extends) = &class.extends {
      self.walk_expr(extends);
    }
    for member in &class.members {
      if let PropKey::Computed(key) = &member.key {
        self.walk_expr(key);
      }
      match &member.kind {
        ClassMemberKind::Method { func, .. } => {
          self.enter_function(None, &func.params, &func.body);
        }
        ClassMemberKind::Field { value } => {
          if let Some(value) = value {
            // Field initialisers run at construction, not at load.
            self.push_scope(ScopeKind::Function);
            self.walk_expr(value);
            self.pop_scope();
          }
        }
      }
    }
  }

  fn walk_args(&mut self, args: &[Arg]) {
    for arg in args {
      self.walk_expr(&arg.expr);
    }
  }

  fn walk_expr(&mut self, expr: &Expr) {
    match expr {
      Expr::Array(array) => {
        for element in array.elements.iter().flatten() {
          self.walk_expr(&element.expr);
        }
      }
      Expr::Arrow(arrow) => self.enter_arrow(&arrow.params, &arrow.body),
      Expr::Assign(assign) => {
        match &assign.target {
          AssignTarget::Expr(target) => match target.as_ref() {
            Expr::Id(id) => self.write(id, assign.op != AssignOp::Assign),
            other => self.write_expr_target(other),
          },
          AssignTarget::Pat(pat) => self.walk_assigned_pat(pat),
        }
        self.walk_expr(&assign.value);
      }
      Expr::Await(await_expr) => self.walk_expr(&await_expr.arg),
      Expr::Binary(binary) => {
        self.walk_expr(&binary.left);
        self.walk_expr(&binary.right);
      }
      Expr::Call(call) => {
        self.walk_expr(&call.callee);
        self.walk_args(&call.args);
      }
      Expr::Class(class_expr) => {
        // A class expression's name is only visible inside its own body.
        if let Some(name) = &class_expr.name {
          self.push_scope(ScopeKind::Block);
          let scope = self.cur();
          self.tree.declare(scope, name.name.clone());
          self.walk_class(&class_expr.class);
          self.pop_scope();
        } else {
          self.walk_class(&class_expr.class);
        }
      }
      Expr::Cond(cond) => {
        self.walk_expr(&cond.test);
        self.walk_expr(&cond.cons);
        self.walk_expr(&cond.alt);
      }
      Expr::Func(func_expr) => {
        self.enter_function(
          func_expr.name.as_ref(),
          &func_expr.func.params,
          &func_expr.func.body,
        );
      }
      Expr::Id(id) => self.read(id, false),
      Expr::ImportCall(call) => self.walk_expr(&call.arg),
      Expr::ImportMeta(_)
      | Expr::Lit(_)
      | Expr::NewTarget(_)
      | Expr::Super(_)
      | Expr::This(_) => {}
      Expr::Member(member) => {
        self.walk_expr(&member.object);
        if let MemberProp::Computed(index) = &member.prop {
          self.walk_expr(index);
        }
      }
      Expr::New(new) => {
        self.walk_expr(&new.callee);
        if let Some(args) = &new.args {
          self.walk_args(args);
        }
      }
      Expr::Object(object) => {
        for member in &object.members {
          match member {
            ObjectMember::Prop { key, value, .. } => {
              if let PropKey::Computed(key) = key {
                self.walk_expr(key);
              }
              self.walk_expr(value);
            }
            ObjectMember::Shorthand { name, default, .. } => {
              self.read(name, true);
              if let Some(default) = default {
                self.walk_expr(default);
              }
            }
            ObjectMember::Method { key, func, .. } => {
              if let PropKey::Computed(key) = key {
                self.walk_expr(key);
              }
              self.enter_function(None, &func.params, &func.body);
            }
            ObjectMember::Spread { expr, .. } => self.walk_expr(expr),
          }
        }
      }
      Expr::Seq(seq) => {
        for expr in &seq.exprs {
          self.walk_expr(expr);
        }
      }
      Expr::TaggedTemplate(tagged) => {
        self.walk_expr(&tagged.tag);
        for expr in &tagged.template.substitutions {
          self.walk_expr(expr);
        }
      }
      Expr::Template(template) => {
        for expr in &template.substitutions {
          self.walk_expr(expr);
        }
      }
      Expr::Unary(unary) => self.walk_expr(&unary.arg),
      Expr::Update(update) => match update.arg.as_ref() {
        Expr::Id(id) => self.write(id, true),
        other => self.write_expr_target(other),
      },
      Expr::Yield(yield_expr) => {
        if let Some(arg) = &yield_expr.arg {
          self.walk_expr(arg);
        }
      }
    }
  }
}
