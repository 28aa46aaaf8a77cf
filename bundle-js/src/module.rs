//! One parsed module: its statements, import/export tables, and name maps.

use crate::ast::*;
use crate::err::BundleError;
use crate::err::BundleErrorType;
use crate::err::BundleResult;
use crate::lex::Comment;
use crate::loc::Loc;
use crate::names::make_legal_identifier;
use crate::statement::Statement;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use std::collections::BTreeMap;

/// Handle into the bundle's module arena. Import bindings store handles, not
/// references, so the registry stays the single owner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ModuleId(pub usize);

/// Handle to one statement of one module.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StmtRef {
  pub module: ModuleId,
  pub index: usize,
}

#[derive(Clone, Debug)]
pub struct ImportBinding {
  pub source: String,
  /// `default`, `*`, or a named export of the source module.
  pub name: String,
  pub local_name: String,
  pub loc: Loc,
  /// Filled in lazily on first traversal.
  pub module: Option<ModuleId>,
}

#[derive(Clone, Debug)]
pub struct DefaultExport {
  pub statement: usize,
  /// `export default function foo() {}` declares `foo`.
  pub declared_name: Option<String>,
  /// `export default foo;` re-exports the binding `foo`.
  pub identifier: Option<String>,
  pub is_declaration: bool,
  pub is_anonymous: bool,
  /// Set post-analysis when `identifier` is reassigned later in the module;
  /// importers must then go through a snapshot binding.
  pub is_modified: bool,
}

#[derive(Clone, Debug)]
pub enum ExportKind {
  Default(DefaultExport),
  /// `export var x = …`, `export function f() {}`
  Declaration { statement: usize, local_name: String },
  /// `export { a as b }`, with or without a `from` clause.
  Reexport {
    local_name: String,
    exported_name: String,
  },
}

#[derive(Clone, Debug)]
pub struct ExportBinding {
  pub kind: ExportKind,
  pub is_used: bool,
}

impl ExportBinding {
  /// The local binding importers of this export should chase.
  pub fn local_name(&self) -> String {
    match &self.kind {
      ExportKind::Declaration { local_name, .. } => local_name.clone(),
      ExportKind::Reexport { local_name, .. } => local_name.clone(),
      ExportKind::Default(default) => {
        if let Some(declared) = &default.declared_name {
          declared.clone()
        } else if let (Some(identifier), false) = (&default.identifier, default.is_modified) {
          identifier.clone()
        } else {
          "default".to_string()
        }
      }
    }
  }
}

#[derive(Clone, Debug)]
pub struct ExportDelegate {
  pub statement: usize,
  pub source: String,
  pub module: Option<ModuleId>,
}

pub struct Module {
  pub id: String,
  pub source: String,
  pub statements: Vec<Statement>,
  pub comments: Vec<Comment>,
  pub imports: HashMap<String, ImportBinding>,
  pub exports: BTreeMap<String, ExportBinding>,
  pub export_delegates: Vec<ExportDelegate>,
  /// Names resolved through `export *`, keyed to the winning delegate.
  pub export_alls: BTreeMap<String, usize>,
  pub definitions: HashMap<String, usize>,
  pub modifications: HashMap<String, Vec<usize>>,
  pub suggested_names: HashMap<String, String>,
  pub canonical_names: HashMap<String, String>,
  /// Memoised `mark` results; an entry is inserted (empty) before descending,
  /// which is what makes cycles terminate.
  pub definition_promises: HashMap<String, Vec<StmtRef>>,
  pub is_external: bool,
  pub needs_default: bool,
  pub needs_named: bool,
  pub needs_all: bool,
  /// An external module imported for side effects only still has to appear
  /// as an import statement in the output.
  pub needs_bare: bool,
  /// External imports the bundle actually uses, in discovery order.
  pub imported_by_bundle: Vec<ImportBinding>,
  pub all_statements_marked: bool,
}

impl Module {
  pub fn new(id: String, source: String, program: Program) -> BundleResult<Module> {
    let mut module = Module {
      id,
      source,
      statements: Vec::new(),
      comments: program.comments,
      imports: HashMap::new(),
      exports: BTreeMap::new(),
      export_delegates: Vec::new(),
      export_alls: BTreeMap::new(),
      definitions: HashMap::new(),
      modifications: HashMap::new(),
      suggested_names: HashMap::new(),
      canonical_names: HashMap::new(),
      definition_promises: HashMap::new(),
      is_external: false,
      needs_default: false,
      needs_named: false,
      needs_all: false,
      needs_bare: false,
      imported_by_bundle: Vec::new(),
      all_statements_marked: false,
    };

    for node in program.body {
      module.add_statement(node);
    }
    for index in 0..module.statements.len() {
      module.register_imports_exports(index)?;
    }
    Ok(module)
  }

  pub fn external(id: String) -> Module {
    Module {
      id,
      source: String::new(),
      statements: Vec::new(),
      comments: Vec::new(),
      imports: HashMap::new(),
      exports: BTreeMap::new(),
      export_delegates: Vec::new(),
      export_alls: BTreeMap::new(),
      definitions: HashMap::new(),
      modifications: HashMap::new(),
      suggested_names: HashMap::new(),
      canonical_names: HashMap::new(),
      definition_promises: HashMap::new(),
      is_external: true,
      needs_default: false,
      needs_named: false,
      needs_all: false,
      needs_bare: false,
      imported_by_bundle: Vec::new(),
      all_statements_marked: true,
    }
  }

  /// Appends a top-level node as one or more statements. A variable
  /// declaration with several declarators is split into one statement per
  /// declarator, which is the granularity dead declarations are dropped at.
  fn add_statement(&mut self, node: Stmt) {
    match node {
      Stmt::Var(decl) if decl.declarators.len() > 1 => {
        for declarator in decl.declarators {
          let loc = declarator.loc;
          let index = self.statements.len();
          self.statements.push(Statement::new(
            Stmt::Var(VarDecl {
              loc,
              kind: decl.kind,
              declarators: vec![declarator],
            }),
            index,
            loc,
            Some(decl.kind),
          ));
        }
      }
      Stmt::ExportDecl(export) => match *export.decl {
        Stmt::Var(decl) if decl.declarators.len() > 1 => {
          for declarator in decl.declarators {
            let loc = declarator.loc;
            let index = self.statements.len();
            self.statements.push(Statement::new(
              Stmt::ExportDecl(ExportDeclStmt {
                loc,
                decl: Box::new(Stmt::Var(VarDecl {
                  loc,
                  kind: decl.kind,
                  declarators: vec![declarator],
                })),
              }),
              index,
              loc,
              Some(decl.kind),
            ));
          }
        }
        inner => {
          let loc = export.loc;
          let index = self.statements.len();
          self.statements.push(Statement::new(
            Stmt::ExportDecl(ExportDeclStmt {
              loc,
              decl: Box::new(inner),
            }),
            index,
            loc,
            None,
          ));
        }
      },
      node => {
        let loc = node.loc();
        let index = self.statements.len();
        self.statements.push(Statement::new(node, index, loc, None));
      }
    }
  }

  fn add_import(
    &mut self,
    local_name: &str,
    name: &str,
    source: &str,
    loc: Loc,
  ) -> BundleResult<()> {
    if self.imports.contains_key(local_name) {
      return Err(BundleError::at(
        BundleErrorType::DuplicateImport {
          local_name: local_name.to_string(),
        },
        self.id.clone(),
        loc,
      ));
    }
    self.imports.insert(local_name.to_string(), ImportBinding {
      source: source.to_string(),
      name: name.to_string(),
      local_name: local_name.to_string(),
      loc,
      module: None,
    });
    Ok(())
  }

  fn add_export(&mut self, exported_name: &str, kind: ExportKind) {
    self.exports.insert(exported_name.to_string(), ExportBinding {
      kind,
      is_used: false,
    });
  }

  fn register_imports_exports(&mut self, index: usize) -> BundleResult<()> {
    let node = self.statements[index].node.clone();
    match &node {
      Stmt::Import(decl) => {
        let source = decl.source.value.clone();
        if let Some(default) = &decl.default {
          self.add_import(&default.name, "default", &source, default.loc)?;
        }
        if let Some(namespace) = &decl.namespace {
          self.add_import(&namespace.name, "*", &source, namespace.loc)?;
        }
        for specifier in &decl.named {
          self.add_import(
            &specifier.local.name,
            &specifier.imported.name,
            &source,
            specifier.local.loc,
          )?;
        }
      }
      Stmt::ExportAll(decl) => {
        self.export_delegates.push(ExportDelegate {
          statement: index,
          source: decl.source.value.clone(),
          module: None,
        });
      }
      Stmt::ExportList(decl) => {
        for specifier in &decl.specifiers {
          self.add_export(&specifier.exported.name, ExportKind::Reexport {
            local_name: specifier.local.name.clone(),
            exported_name: specifier.exported.name.clone(),
          });
          if let Some(source) = &decl.source {
            // A re-export from another module is an import in disguise.
            self.add_import(
              &specifier.local.name,
              &specifier.local.name,
              &source.value,
              specifier.local.loc,
            )?;
          }
        }
      }
      Stmt::ExportDecl(export) => match export.decl.as_ref() {
        Stmt::Var(decl) => {
          for declarator in &decl.declarators {
            let mut names = Vec::new();
            crate::statement::pat_names(&declarator.pat, &mut |id| {
              names.push(id.name.clone());
            });
            for name in names {
              self.add_export(&name, ExportKind::Declaration {
                statement: index,
                local_name: name.clone(),
              });
            }
          }
        }
        Stmt::Func(decl) => {
          self.add_export(&decl.name.name, ExportKind::Declaration {
            statement: index,
            local_name: decl.name.name.clone(),
          });
        }
        Stmt::Class(decl) => {
          self.add_export(&decl.name.name, ExportKind::Declaration {
            statement: index,
            local_name: decl.name.name.clone(),
          });
        }
        _ => {}
      },
      Stmt::ExportDefault(export) => {
        let (declared_name, identifier, is_declaration, is_anonymous) = match &export.decl {
          DefaultDecl::Func { name, .. } => {
            (name.as_ref().map(|n| n.name.clone()), None, true, name.is_none())
          }
          DefaultDecl::Class { name, .. } => {
            (name.as_ref().map(|n| n.name.clone()), None, true, name.is_none())
          }
          DefaultDecl::Expr(expr) => match expr.as_ref() {
            Expr::Id(id) => (None, Some(id.name.clone()), false, false),
            _ => (None, None, false, true),
          },
        };
        self.add_export("default", ExportKind::Default(DefaultExport {
          statement: index,
          declared_name,
          identifier,
          is_declaration,
          is_anonymous,
          is_modified: false,
        }));
      }
      _ => {}
    }
    Ok(())
  }

  /// Runs per-statement analysis: builds the module scope, computes the four
  /// sets per statement, fills `definitions`/`modifications`, and finalises
  /// the default export's `is_modified`. Returns the free names that
  /// resolved nowhere — the assumed globals.
  pub fn analyse(&mut self) -> BundleResult<HashSet<String>> {
    let mut module_scope: HashSet<String> = HashSet::new();
    for statement in &self.statements {
      for name in &statement.defines {
        module_scope.insert(name.clone());
      }
    }
    for (local_name, binding) in &self.imports {
      if module_scope.contains(local_name) {
        return Err(BundleError::at(
          BundleErrorType::DuplicateImport {
            local_name: local_name.clone(),
          },
          self.id.clone(),
          binding.loc,
        ));
      }
      module_scope.insert(local_name.clone());
    }

    let mut unknowns = HashSet::new();
    for statement in &mut self.statements {
      unknowns.extend(statement.analyse(&module_scope));
    }

    for (index, statement) in self.statements.iter().enumerate() {
      for name in &statement.defines {
        self.definitions.insert(name.clone(), index);
      }
      for name in &statement.modifies {
        self
          .modifications
          .entry(name.clone())
          .or_insert_with(Vec::new)
          .push(index);
      }
    }

    if let Some(binding) = self.exports.get_mut("default") {
      if let ExportKind::Default(default) = &mut binding.kind {
        if let Some(identifier) = &default.identifier {
          default.is_modified = self.modifications.contains_key(identifier);
        }
      }
    }
    Ok(unknowns)
  }

  /// Records a name suggestion from an importer. First suggestion wins;
  /// later ones would already have observers.
  pub fn suggest_name(&mut self, name: &str, suggestion: &str) {
    if !self.suggested_names.contains_key(name) {
      self
        .suggested_names
        .insert(name.to_string(), make_legal_identifier(suggestion));
    }
  }

  /// Forces a canonical name, bypassing resolution.
  pub fn rename(&mut self, name: &str, replacement: &str) {
    self
      .canonical_names
      .insert(name.to_string(), replacement.to_string());
  }

  /// A readable base name for this module's anonymous default export,
  /// derived from its id relative to the entry module's directory.
  pub fn derived_default_name(&self, entry_dir: &str) -> String {
    let relative = if !entry_dir.is_empty() && self.id.starts_with(entry_dir) {
      self.id[entry_dir.len()..].trim_start_matches('/')
    } else {
      self.id.rsplit('/').next().unwrap_or(&self.id)
    };
    let base = relative.strip_suffix(".js").unwrap_or(relative);
    let mut name = make_legal_identifier(base);
    while self.definitions.contains_key(&name) || self.imports.contains_key(&name) {
      name.insert(0, '_');
    }
    name
  }
}
