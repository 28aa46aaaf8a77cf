//! The module registry and the demand-driven marking traversal.
//!
//! `build` fetches the entry module and walks it statement by statement;
//! every name a surviving statement depends on is resolved through the
//! import/export tables, loading further modules as the edges are
//! discovered. The traversal is synchronous: the loader blocks, and the
//! memo entry inserted before each descent doubles as the cycle sentinel.

use crate::ast::Stmt;
use crate::err::BundleError;
use crate::err::BundleErrorType;
use crate::err::BundleResult;
use crate::loader::Loader;
use crate::module::ExportKind;
use crate::module::Module;
use crate::module::ModuleId;
use crate::module::StmtRef;
use crate::names::NameAllocator;
use crate::parse::parse;
use ahash::HashSet;
use ahash::HashSetExt;
use ahash::HashMap;
use ahash::HashMapExt;
use tracing::debug;
use tracing::trace;

pub struct Bundle<'a> {
  loader: &'a dyn Loader,
  pub modules: Vec<Module>,
  module_ids: HashMap<String, ModuleId>,
  pub entry: Option<ModuleId>,
  /// Free names that resolved to no module binding anywhere in the graph.
  /// They keep their spelling; canonical names deconflict against them.
  pub assumed_globals: HashSet<String>,
  /// Modules imported via `import * as ns`, in discovery order. Each gets a
  /// namespace object in the output.
  pub internal_namespace_modules: Vec<ModuleId>,
  pub allocator: NameAllocator,
  /// Execution order for rendering: dependencies first, entry last.
  pub ordered_modules: Vec<ModuleId>,
  canonical_in_progress: HashSet<(usize, String)>,
}

impl<'a> Bundle<'a> {
  pub fn new(loader: &'a dyn Loader) -> Bundle<'a> {
    Bundle {
      loader,
      modules: Vec::new(),
      module_ids: HashMap::new(),
      entry: None,
      assumed_globals: HashSet::new(),
      internal_namespace_modules: Vec::new(),
      allocator: NameAllocator::new(),
      ordered_modules: Vec::new(),
      canonical_in_progress: HashSet::new(),
    }
  }

  pub fn module(&self, id: ModuleId) -> &Module {
    &self.modules[id.0]
  }

  pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
    &mut self.modules[id.0]
  }

  pub fn entry_module(&self) -> &Module {
    self.module(self.entry.expect("bundle has not been built"))
  }

  /// Resolves, loads, parses, and analyses a module, memoised by id.
  /// Unresolvable specifiers register an external placeholder instead.
  pub fn fetch_module(
    &mut self,
    source: &str,
    importer: Option<ModuleId>,
  ) -> BundleResult<ModuleId> {
    let importer_id = importer.map(|m| self.modules[m.0].id.clone());
    let resolved = self.loader.resolve(source, importer_id.as_deref());

    let key = match &resolved {
      Some(id) => id.clone(),
      None => source.to_string(),
    };
    if let Some(&existing) = self.module_ids.get(&key) {
      return Ok(existing);
    }

    let module = match resolved {
      Some(id) => {
        let text = self.loader.load(&id).map_err(|err| {
          debug!(module = %id, error = %err, "module not found");
          BundleError::in_file(
            BundleErrorType::ModuleNotFound {
              source: source.to_string(),
              importer: importer_id.clone(),
            },
            id.clone(),
          )
        })?;
        let program = parse(&text).map_err(|err| BundleError::from_syntax(err, id.clone()))?;
        let mut module = Module::new(id.clone(), text, program)?;
        let unknowns = module.analyse()?;
        self.assumed_globals.extend(unknowns);
        debug!(module = %id, statements = module.statements.len(), "fetched module");
        module
      }
      None => {
        debug!(module = %key, "external module");
        Module::external(key.clone())
      }
    };

    let id = ModuleId(self.modules.len());
    self.modules.push(module);
    self.module_ids.insert(key, id);
    Ok(id)
  }

  /// Builds the graph from `entry` and marks every reachable statement.
  /// Rendering order is the module execution order; the statement lists the
  /// marking calls return are their own product, not stored here.
  pub fn build(&mut self, entry: &str) -> BundleResult<()> {
    let entry_id = self.fetch_module(entry, None)?;
    self.entry = Some(entry_id);
    self.mark_all_statements(entry_id)?;
    self.mark_modifier_statements()?;
    self.ordered_modules = self.sort_modules();
    Ok(())
  }

  /// Includes the minimal set of statements satisfying `name` in `module_id`.
  /// Memoised per `(module, name)`; re-entry during the same resolution
  /// yields an empty list, which shortcuts cycles.
  pub fn mark(&mut self, module_id: ModuleId, name: &str) -> BundleResult<Vec<StmtRef>> {
    if let Some(cached) = self.modules[module_id.0].definition_promises.get(name) {
      return Ok(cached.clone());
    }
    trace!(module = %self.modules[module_id.0].id, name, "marking");
    self.modules[module_id.0]
      .definition_promises
      .insert(name.to_string(), Vec::new());
    let result = self.mark_uncached(module_id, name)?;
    self.modules[module_id.0]
      .definition_promises
      .insert(name.to_string(), result.clone());
    Ok(result)
  }

  fn mark_uncached(&mut self, module_id: ModuleId, name: &str) -> BundleResult<Vec<StmtRef>> {
    if let Some(binding) = self.modules[module_id.0].imports.get(name).cloned() {
      return self.mark_import(module_id, binding);
    }

    let mut reorder_default = false;
    let statement = if name == "default" {
      let default = match self.modules[module_id.0].exports.get("default").map(|e| &e.kind) {
        Some(ExportKind::Default(default)) => Some(default.clone()),
        _ => None,
      };
      match default {
        Some(default) => {
          if default.is_declaration {
            if let Some(declared) = &default.declared_name {
              return self.mark(module_id, declared);
            }
          }
          reorder_default = default.identifier.is_some() && default.is_modified;
          Some(default.statement)
        }
        None => None,
      }
    } else {
      self.modules[module_id.0].definitions.get(name).copied()
    };

    let Some(index) = statement else {
      return Ok(Vec::new());
    };
    if self.modules[module_id.0].statements[index].is_included {
      return Ok(Vec::new());
    }
    let mut list = self.mark_statement(StmtRef {
      module: module_id,
      index,
    })?;
    if reorder_default {
      reinsert_default_statement(&mut list, module_id, index);
    }
    Ok(list)
  }

  fn mark_import(
    &mut self,
    module_id: ModuleId,
    mut binding: crate::module::ImportBinding,
  ) -> BundleResult<Vec<StmtRef>> {
    let target = match binding.module {
      Some(target) => target,
      None => {
        let target = self.fetch_module(&binding.source, Some(module_id))?;
        if let Some(stored) = self.modules[module_id.0].imports.get_mut(&binding.local_name) {
          stored.module = Some(target);
        }
        target
      }
    };
    binding.module = Some(target);

    if binding.name == "default" {
      let mut suggestion = self.modules[module_id.0]
        .suggested_names
        .get(&binding.local_name)
        .cloned()
        .unwrap_or_else(|| binding.local_name.clone());
      while !self.modules[target.0].is_external
        && self.modules[target.0].imports.contains_key(&suggestion)
      {
        suggestion.insert(0, '_');
      }
      self.modules[target.0].suggest_name("default", &suggestion);
    } else if binding.name == "*" {
      let local = binding.local_name.clone();
      self.modules[target.0].suggest_name("*", &local);
      self
        .modules[target.0]
        .suggest_name("default", &format!("{}__default", local));
    }

    if self.modules[target.0].is_external {
      let external = &mut self.modules[target.0];
      match binding.name.as_str() {
        "default" => external.needs_default = true,
        "*" => external.needs_all = true,
        _ => external.needs_named = true,
      }
      external.imported_by_bundle.push(binding);
      return Ok(Vec::new());
    }

    if binding.name == "*" {
      if !self.internal_namespace_modules.contains(&target) {
        self.internal_namespace_modules.push(target);
      }
      return self.mark_all_statements(target);
    }

    let export_local = match self.modules[target.0].exports.get(&binding.name) {
      Some(export) => Some(export.local_name()),
      None => None,
    };
    if let Some(local) = export_local {
      self.modules[target.0]
        .exports
        .get_mut(&binding.name)
        .expect("export looked up above")
        .is_used = true;
      return self.mark(target, &local);
    }

    self.mark_through_delegates(target, &binding.name, module_id)
  }

  /// Resolves `name` through `export * from` delegates, first match wins.
  /// The winning delegate is recorded so ordering sees the edge.
  fn mark_through_delegates(
    &mut self,
    module_id: ModuleId,
    name: &str,
    importer: ModuleId,
  ) -> BundleResult<Vec<StmtRef>> {
    let count = self.modules[module_id.0].export_delegates.len();
    for delegate_index in 0..count {
      let (source, target) = {
        let delegate = &self.modules[module_id.0].export_delegates[delegate_index];
        (delegate.source.clone(), delegate.module)
      };
      let target = match target {
        Some(target) => target,
        None => {
          let target = self.fetch_module(&source, Some(module_id))?;
          self.modules[module_id.0].export_delegates[delegate_index].module = Some(target);
          target
        }
      };
      let result = self.mark(target, name)?;
      if !result.is_empty() {
        debug!(
          module = %self.modules[module_id.0].id,
          name,
          delegate = %self.modules[target.0].id,
          "resolved through export delegate"
        );
        let module = &mut self.modules[module_id.0];
        module.export_alls.insert(name.to_string(), delegate_index);
        let statement_index = module.export_delegates[delegate_index].statement;
        let statement = &mut module.statements[statement_index];
        statement.depends_on.insert(name.to_string());
        statement.strongly_depends_on.insert(name.to_string());
        return Ok(result);
      }
    }
    Err(BundleError::in_file(
      BundleErrorType::NoSuchExport {
        name: name.to_string(),
        module: self.modules[module_id.0].id.clone(),
        importer: self.modules[importer.0].id.clone(),
      },
      self.modules[importer.0].id.clone(),
    ))
  }

  /// Flips a statement to included and pulls in everything it depends on.
  /// Returns dependencies before the statement itself.
  pub fn mark_statement(&mut self, stmt_ref: StmtRef) -> BundleResult<Vec<StmtRef>> {
    let deps: Vec<String> = {
      let statement = &mut self.modules[stmt_ref.module.0].statements[stmt_ref.index];
      if statement.is_included {
        return Ok(Vec::new());
      }
      statement.is_included = true;
      statement.depends_on.iter().cloned().collect()
    };
    let mut result = Vec::new();
    for dep in deps {
      result.extend(self.mark(stmt_ref.module, &dep)?);
    }
    result.push(stmt_ref);
    Ok(result)
  }

  /// Marks a module's statements in source order: the entry module, and any
  /// module reached through a namespace or side-effect import.
  pub fn mark_all_statements(&mut self, module_id: ModuleId) -> BundleResult<Vec<StmtRef>> {
    if self.modules[module_id.0].all_statements_marked {
      return Ok(Vec::new());
    }
    self.modules[module_id.0].all_statements_marked = true;
    let is_entry = self.entry == Some(module_id);

    enum Action {
      MarkStatement,
      SideEffectImport(String),
      Skip,
    }

    let mut result = Vec::new();
    for index in 0..self.modules[module_id.0].statements.len() {
      let action = {
        let statement = &self.modules[module_id.0].statements[index];
        match &statement.node {
          Stmt::Import(decl) if decl.is_bare() => Action::SideEffectImport(decl.source.value.clone()),
          Stmt::Import(_) => Action::Skip,
          Stmt::ExportAll(_) => Action::Skip,
          // Export lists pull their referenced names in, but only the entry
          // module's exports are part of the bundle's surface.
          Stmt::ExportList(_) if !is_entry => Action::Skip,
          _ => Action::MarkStatement,
        }
      };
      match action {
        Action::SideEffectImport(source) => {
          let target = self.fetch_module(&source, Some(module_id))?;
          if self.modules[target.0].is_external {
            self.modules[target.0].needs_bare = true;
          } else {
            result.extend(self.mark_all_statements(target)?);
          }
        }
        Action::MarkStatement => {
          result.extend(self.mark_statement(StmtRef {
            module: module_id,
            index,
          })?);
        }
        Action::Skip => {}
      }
    }
    Ok(result)
  }

  /// Fix-point pass including statements that reassign or mutate an included
  /// binding. `export default foo; foo = 2` needs the assignment even though
  /// nothing depends on it.
  fn mark_modifier_statements(&mut self) -> BundleResult<()> {
    loop {
      let mut settled = true;
      for module_index in 0..self.modules.len() {
        let module_id = ModuleId(module_index);
        if self.modules[module_index].is_external {
          continue;
        }
        for index in 0..self.modules[module_index].statements.len() {
          let names: Vec<String> = {
            let statement = &self.modules[module_index].statements[index];
            if statement.is_included
              || statement.is_import_declaration
              || statement.is_export_all()
            {
              continue;
            }
            statement.modifies.iter().cloned().collect()
          };
          if names.is_empty() {
            continue;
          }
          let should_mark = names
            .iter()
            .any(|name| self.modification_target_is_included(module_id, name));
          if should_mark {
            self.mark_statement(StmtRef {
              module: module_id,
              index,
            })?;
            settled = false;
          }
        }
      }
      if settled {
        return Ok(());
      }
    }
  }

  fn modification_target_is_included(&self, module_id: ModuleId, name: &str) -> bool {
    let module = &self.modules[module_id.0];
    if let Some(&index) = module.definitions.get(name) {
      if module.statements[index].is_included {
        return true;
      }
    }
    for binding in module.exports.values() {
      let matches = match &binding.kind {
        ExportKind::Declaration { local_name, .. } => local_name == name,
        ExportKind::Reexport { local_name, .. } => local_name == name,
        ExportKind::Default(default) => {
          default.identifier.as_deref() == Some(name)
            || default.declared_name.as_deref() == Some(name)
        }
      };
      if !matches {
        continue;
      }
      if binding.is_used {
        return true;
      }
      if let ExportKind::Default(default) = &binding.kind {
        if module.statements[default.statement].is_included {
          return true;
        }
      }
    }
    // Mutating an imported binding keeps the mutation when the exporter's
    // definition survived.
    if let Some(binding) = module.imports.get(name) {
      if let Some(target) = binding.module {
        let exporter = &self.modules[target.0];
        if let Some(export) = exporter.exports.get(&binding.name) {
          let local = export.local_name();
          if let Some(&index) = exporter.definitions.get(&local) {
            return exporter.statements[index].is_included;
          }
        }
      }
    }
    false
  }

  /// Execution order: depth-first over dependency edges in statement order,
  /// dependencies before dependents, entry last. Back edges in cycles are
  /// simply not followed.
  fn sort_modules(&self) -> Vec<ModuleId> {
    let entry = match self.entry {
      Some(entry) => entry,
      None => return Vec::new(),
    };
    let mut visited = HashSet::new();
    let mut ordered = Vec::new();
    self.visit_module(entry, &mut visited, &mut ordered);
    ordered
  }

  fn visit_module(
    &self,
    module_id: ModuleId,
    visited: &mut HashSet<ModuleId>,
    ordered: &mut Vec<ModuleId>,
  ) {
    if !visited.insert(module_id) {
      return;
    }
    let module = &self.modules[module_id.0];
    if module.is_external {
      return;
    }
    for statement in &module.statements {
      let source = match &statement.node {
        Stmt::Import(decl) => Some(&decl.source.value),
        Stmt::ExportAll(decl) => Some(&decl.source.value),
        Stmt::ExportList(decl) => decl.source.as_ref().map(|s| &s.value),
        _ => None,
      };
      let Some(source) = source else { continue };
      let Some(resolved) = self.loader.resolve(source, Some(&module.id)) else {
        continue;
      };
      if let Some(&dependency) = self.module_ids.get(&resolved) {
        self.visit_module(dependency, visited, ordered);
      }
    }
    ordered.push(module_id);
  }

  /// Follows imports to the statement defining `name`, if any. Rejects
  /// `default` and `*`, whose defining statement is not a meaningful notion.
  pub fn find_defining_statement(
    &self,
    module_id: ModuleId,
    name: &str,
  ) -> BundleResult<Option<StmtRef>> {
    if name == "default" || name == "*" {
      return Err(BundleError::in_file(
        BundleErrorType::NotSupported("findDefiningStatement on `default` or `*`"),
        self.modules[module_id.0].id.clone(),
      ));
    }
    let module = &self.modules[module_id.0];
    if let Some(&index) = module.definitions.get(name) {
      return Ok(Some(StmtRef {
        module: module_id,
        index,
      }));
    }
    if let Some(binding) = module.imports.get(name) {
      if let Some(target) = binding.module {
        return self.find_defining_statement(target, &binding.name);
      }
    }
    Ok(None)
  }

  /// The identifier `local_name` is emitted as, resolved across module
  /// boundaries and deconflicted through the shared allocator. Idempotent
  /// per `(module, name)`.
  pub fn get_canonical_name(&mut self, module_id: ModuleId, local_name: &str) -> String {
    let was_namespace = local_name == "*";

    if local_name == "default" {
      let special = match self.modules[module_id.0].exports.get("default").map(|e| &e.kind) {
        Some(ExportKind::Default(default)) => {
          default.is_modified
            || !self.modules[module_id.0]
              .suggested_names
              .contains_key("default")
        }
        _ => false,
      };
      if special {
        if let Some(cached) = self.modules[module_id.0].canonical_names.get("default") {
          return cached.clone();
        }
        let entry_dir = self.entry_dir();
        let derived = self.modules[module_id.0].derived_default_name(&entry_dir);
        let claimed = self.allocator.claim(&derived);
        debug!(module = %self.modules[module_id.0].id, name = %claimed, "derived default name");
        self.modules[module_id.0].rename("default", &claimed);
        return claimed;
      }
    }

    let local = match self.modules[module_id.0].suggested_names.get(local_name) {
      Some(suggestion) => suggestion.clone(),
      None => local_name.to_string(),
    };

    if let Some(cached) = self.modules[module_id.0].canonical_names.get(&local) {
      return cached.clone();
    }

    let progress_key = (module_id.0, local.clone());
    if !self.canonical_in_progress.insert(progress_key.clone()) {
      return local;
    }

    let canonical = if was_namespace {
      // The suggestion is claimed directly; a namespace has no binding of
      // its own to chase.
      self.allocator.claim(&local)
    } else if let Some(binding) = self.modules[module_id.0].imports.get(&local).cloned() {
      match binding.module {
        None => self.allocator.claim(&local),
        Some(target) if binding.name == "*" => self.get_canonical_name(target, "*"),
        Some(target) => {
          let exporter_local = if self.modules[target.0].is_external {
            binding.name.clone()
          } else if let Some(export) = self.modules[target.0].exports.get(&binding.name) {
            export.local_name()
          } else if let Some(&delegate_index) =
            self.modules[target.0].export_alls.get(&binding.name)
          {
            // Resolved through `export *`: chase the delegate that won.
            let delegate_module = self.modules[target.0].export_delegates[delegate_index].module;
            match delegate_module {
              Some(delegate) => {
                let name = self.get_canonical_name(delegate, &binding.name);
                self.canonical_in_progress.remove(&progress_key);
                self.modules[module_id.0].rename(&local, &name);
                return name;
              }
              None => binding.name.clone(),
            }
          } else {
            binding.name.clone()
          };
          self.get_canonical_name(target, &exporter_local)
        }
      }
    } else {
      self.allocator.claim(&local)
    };

    self.canonical_in_progress.remove(&progress_key);
    self.modules[module_id.0].rename(&local, &canonical);
    canonical
  }

  fn entry_dir(&self) -> String {
    let entry = match self.entry {
      Some(entry) => entry,
      None => return String::new(),
    };
    let id = &self.modules[entry.0].id;
    match id.rfind('/') {
      Some(at) => id[..at].to_string(),
      None => String::new(),
    }
  }
}

/// `export default foo; foo += 1` — the naive dependency expansion would
/// emit the default-export statement after every statement affecting `foo`.
/// Put it back immediately after the last earlier statement from its own
/// module.
fn reinsert_default_statement(list: &mut Vec<StmtRef>, module_id: ModuleId, index: usize) {
  let default_ref = StmtRef {
    module: module_id,
    index,
  };
  list.retain(|r| *r != default_ref);
  let position = list
    .iter()
    .rposition(|r| r.module == module_id && r.index < index);
  match position {
    Some(at) => list.insert(at + 1, default_ref),
    None => list.push(default_ref),
  }
}
