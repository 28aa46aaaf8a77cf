//! Serialises a built bundle into one flat module.
//!
//! Statements are re-sliced from their original source with identifier
//! references rewritten to canonical names; module boundaries disappear.
//! Canonical resolution is lazy and happens here, in execution order, so the
//! first binding to claim a name keeps it and later collisions get the `_`
//! prefix.

use crate::ast::DefaultDecl;
use crate::ast::Expr;
use crate::ast::Stmt;
use crate::bundle::Bundle;
use crate::edit::EditBuffer;
use crate::err::BundleResult;
use crate::loc::Loc;
use crate::module::ModuleId;
use itertools::Itertools;

pub fn render(bundle: &mut Bundle) -> BundleResult<String> {
  // Assumed globals keep their spelling; nothing may claim them.
  let globals: Vec<String> = bundle.assumed_globals.iter().cloned().collect();
  for global in globals {
    bundle.allocator.reserve(global);
  }

  let mut lines: Vec<String> = Vec::new();

  for index in 0..bundle.modules.len() {
    if bundle.modules[index].is_external {
      lines.extend(render_external_imports(bundle, ModuleId(index)));
    }
  }

  for module_id in bundle.ordered_modules.clone() {
    for index in 0..bundle.modules[module_id.0].statements.len() {
      if !bundle.modules[module_id.0].statements[index].is_included {
        continue;
      }
      if let Some(text) = render_statement(bundle, module_id, index) {
        lines.push(text);
      }
    }
    if bundle.internal_namespace_modules.contains(&module_id) {
      lines.push(render_namespace(bundle, module_id));
    }
  }

  lines.extend(render_entry_exports(bundle));

  Ok(lines.join("\n\n") + "\n")
}

fn render_external_imports(bundle: &mut Bundle, module_id: ModuleId) -> Vec<String> {
  let (needs_default, needs_named, needs_all, needs_bare, source) = {
    let module = &bundle.modules[module_id.0];
    (
      module.needs_default,
      module.needs_named,
      module.needs_all,
      module.needs_bare,
      module.id.clone(),
    )
  };
  let mut lines = Vec::new();
  if !(needs_default || needs_named || needs_all) {
    if needs_bare {
      lines.push(format!("import '{}';", source));
    }
    return lines;
  }

  let default_name = needs_default.then(|| bundle.get_canonical_name(module_id, "default"));
  let namespace_name = needs_all.then(|| bundle.get_canonical_name(module_id, "*"));
  let named = if needs_named {
    let imported: Vec<String> = bundle.modules[module_id.0]
      .imported_by_bundle
      .iter()
      .map(|binding| binding.name.clone())
      .filter(|name| name != "default" && name != "*")
      .unique()
      .collect();
    let mut specifiers = Vec::new();
    for name in imported {
      let canonical = bundle.get_canonical_name(module_id, &name);
      specifiers.push(if canonical == name {
        name
      } else {
        format!("{} as {}", name, canonical)
      });
    }
    Some(format!("{{ {} }}", specifiers.join(", ")))
  } else {
    None
  };

  match (default_name, namespace_name, named) {
    (Some(default), Some(namespace), named) => {
      lines.push(format!(
        "import {}, * as {} from '{}';",
        default, namespace, source
      ));
      if let Some(named) = named {
        lines.push(format!("import {} from '{}';", named, source));
      }
    }
    (Some(default), None, Some(named)) => {
      lines.push(format!("import {}, {} from '{}';", default, named, source));
    }
    (Some(default), None, None) => {
      lines.push(format!("import {} from '{}';", default, source));
    }
    (None, Some(namespace), named) => {
      lines.push(format!("import * as {} from '{}';", namespace, source));
      if let Some(named) = named {
        lines.push(format!("import {} from '{}';", named, source));
      }
    }
    (None, None, Some(named)) => {
      lines.push(format!("import {} from '{}';", named, source));
    }
    (None, None, None) => {}
  }
  lines
}

fn render_statement(bundle: &mut Bundle, module_id: ModuleId, index: usize) -> Option<String> {
  let (loc, var_kind, references, node) = {
    let statement = &bundle.modules[module_id.0].statements[index];
    (
      statement.loc,
      statement.var_kind,
      statement.references.clone(),
      statement.node.clone(),
    )
  };
  if matches!(
    node,
    Stmt::Import(_) | Stmt::ExportAll(_) | Stmt::ExportList(_)
  ) {
    return None;
  }

  let source_slice = bundle.modules[module_id.0].source[loc.0..loc.1].to_string();

  // Resolve canonical names up front; resolution mutates the name caches.
  let mut edits: Vec<(Loc, String)> = Vec::new();
  for reference in &references {
    let canonical = bundle.get_canonical_name(module_id, &reference.name);
    if canonical != reference.name {
      let relative = Loc(reference.loc.0 - loc.0, reference.loc.1 - loc.0);
      let text = if reference.shorthand {
        format!("{}: {}", reference.name, canonical)
      } else {
        canonical
      };
      edits.push((relative, text));
    }
  }

  let mut buffer = EditBuffer::new(&source_slice);
  buffer.add_sourcemap_location(loc.0);
  for (relative, text) in edits {
    buffer.overwrite(relative, text);
  }

  if let Some(kind) = var_kind {
    // A split declarator; reconstruct the declaration around it.
    buffer.prepend(format!("{} ", kind.as_str()));
    buffer.append(";");
    return Some(buffer.render());
  }

  match &node {
    Stmt::ExportDecl(export) => {
      // `export var x = 1` → `var x = 1`.
      buffer.remove(Loc(0, export.decl.loc().0 - loc.0));
    }
    Stmt::ExportDefault(export) => match &export.decl {
      DefaultDecl::Func {
        name: Some(_),
        loc: decl_loc,
        ..
      }
      | DefaultDecl::Class {
        name: Some(_),
        loc: decl_loc,
        ..
      } => {
        // The declaration stands on its own; the entry's export surface
        // re-exports it by name.
        buffer.remove(Loc(0, decl_loc.0 - loc.0));
      }
      DefaultDecl::Func {
        name: None,
        loc: decl_loc,
        ..
      }
      | DefaultDecl::Class {
        name: None,
        loc: decl_loc,
        ..
      } => {
        let name = bundle.get_canonical_name(module_id, "default");
        buffer.overwrite(Loc(0, decl_loc.0 - loc.0), format!("var {} = ", name));
        buffer.append(";");
      }
      DefaultDecl::Expr(expr) => {
        let name = bundle.get_canonical_name(module_id, "default");
        if let Expr::Id(id) = expr.as_ref() {
          // When the default is a plain alias of an included binding, the
          // statement vanishes entirely.
          if bundle.get_canonical_name(module_id, &id.name) == name {
            return None;
          }
        }
        buffer.overwrite(Loc(0, expr.loc().0 - loc.0), format!("var {} = ", name));
        if !source_slice.trim_end().ends_with(';') {
          buffer.append(";");
        }
      }
    },
    _ => {}
  }
  Some(buffer.render())
}

/// `import * as ns` modules materialise as a plain object over their
/// canonical exports.
fn render_namespace(bundle: &mut Bundle, module_id: ModuleId) -> String {
  let name = bundle.get_canonical_name(module_id, "*");
  let exports: Vec<(String, String)> = bundle.modules[module_id.0]
    .exports
    .iter()
    .map(|(exported, binding)| (exported.clone(), binding.local_name()))
    .collect();
  if exports.is_empty() {
    return format!("var {} = {{}};", name);
  }
  let mut props = Vec::new();
  for (exported, local) in exports {
    let canonical = bundle.get_canonical_name(module_id, &local);
    props.push(format!("  {}: {}", exported, canonical));
  }
  format!("var {} = {{\n{}\n}};", name, props.join(",\n"))
}

fn render_entry_exports(bundle: &mut Bundle) -> Vec<String> {
  let Some(entry) = bundle.entry else {
    return Vec::new();
  };
  let exports: Vec<(String, String)> = bundle.modules[entry.0]
    .exports
    .iter()
    .map(|(exported, binding)| (exported.clone(), binding.local_name()))
    .collect();

  let mut lines = Vec::new();
  let mut specifiers = Vec::new();
  for (exported, local) in exports {
    if exported == "default" {
      let name = bundle.get_canonical_name(entry, &local);
      lines.push(format!("export default {};", name));
    } else {
      let canonical = bundle.get_canonical_name(entry, &local);
      specifiers.push(if canonical == exported {
        canonical
      } else {
        format!("{} as {}", canonical, exported)
      });
    }
  }
  if !specifiers.is_empty() {
    // Named exports precede the default, independent of declaration order.
    lines.insert(0, format!("export {{ {} }};", specifiers.join(", ")));
  }
  lines
}
