use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;
use bundle_js::Bundle;

fn fixture() -> MemoryLoader {
  MemoryLoader::new()
    .with_file(
      "main.js",
      "import { a } from './a';\nimport { b } from './b';\nconsole.log(a, b);\n",
    )
    .with_file(
      "a.js",
      "import { shared } from './shared';\nexport const a = shared + 1;\n",
    )
    .with_file(
      "b.js",
      "import { shared } from './shared';\nexport const b = shared + 2;\n",
    )
    .with_file("shared.js", "export const shared = 10;\nexport const spare = 0;\n")
}

// Memoisation: any number of calls return the identical sequence.
#[test]
fn mark_is_idempotent() {
  let loader = fixture();
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  let entry = graph.entry.unwrap();
  for name in ["a", "b", "console"] {
    let first = graph.mark(entry, name).unwrap();
    let second = graph.mark(entry, name).unwrap();
    let third = graph.mark(entry, name).unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);
  }
}

// Closure: every dependency of an included statement resolves to an included
// statement (or falls through to a global).
#[test]
fn included_statements_are_closed_over_dependencies() {
  let loader = fixture();
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  for module in &graph.modules {
    for statement in &module.statements {
      if !statement.is_included {
        continue;
      }
      for name in &statement.depends_on {
        if let Some(&definition) = module.definitions.get(name) {
          assert!(
            module.statements[definition].is_included,
            "{} depends on `{}` whose definition is excluded",
            module.id, name
          );
        } else {
          assert!(
            module.imports.contains_key(name) || graph.assumed_globals.contains(name),
            "{} depends on `{}` which resolves nowhere",
            module.id,
            name
          );
        }
      }
    }
  }
}

// Inclusion is monotone: marking again never clears a flag.
#[test]
fn inclusion_is_monotone() {
  let loader = fixture();
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  let included_before: Vec<(usize, usize)> = graph
    .modules
    .iter()
    .enumerate()
    .flat_map(|(m, module)| {
      module
        .statements
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_included)
        .map(move |(i, _)| (m, i))
    })
    .collect();
  let entry = graph.entry.unwrap();
  graph.mark(entry, "a").unwrap();
  graph.mark_all_statements(entry).unwrap();
  for (m, i) in included_before {
    assert!(graph.modules[m].statements[i].is_included);
  }
}

// Defines and imports are disjoint keyed sets.
#[test]
fn defines_and_imports_are_disjoint() {
  let loader = fixture();
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  for module in &graph.modules {
    for statement in &module.statements {
      for name in &statement.defines {
        assert!(
          !module.imports.contains_key(name),
          "{} defines and imports `{}`",
          module.id,
          name
        );
      }
    }
  }
}

// Statement order within a module is preserved in the output.
#[test]
fn output_preserves_per_module_statement_order() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { z } from './m';\nconsole.log(z);\n",
    )
    .with_file(
      "m.js",
      "export const x = 1;\nexport const y = x + 1;\nexport const z = y + x;\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  let x_at = out.find("const x = 1;").unwrap();
  let y_at = out.find("const y = x + 1;").unwrap();
  let z_at = out.find("const z = y + x;").unwrap();
  assert!(x_at < y_at);
  assert!(y_at < z_at);
}

// No two surviving bindings share an emitted name.
#[test]
fn canonical_names_are_globally_unique() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { id as idA } from './a';\nimport { id as idB } from './b';\nimport { id as idC } from './c';\nconsole.log(idA(), idB(), idC());\n",
    )
    .with_file("a.js", "export function id() { return 'a'; }\n")
    .with_file("b.js", "export function id() { return 'b'; }\n")
    .with_file("c.js", "export function id() { return 'c'; }\n");
  let out = bundle("main.js", &loader).unwrap();
  assert_eq!(out.matches("function id()").count(), 1);
  assert_eq!(out.matches("function _id()").count(), 1);
  assert_eq!(out.matches("function __id()").count(), 1);
}
