use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;

#[test]
fn modified_default_keeps_textual_order() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "let foo = 1;\nexport default foo;\nfoo = 2;\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  let decl_at = out.find("let foo = 1;").unwrap();
  let snapshot_at = out.find("var main = foo;").unwrap();
  let assign_at = out.find("foo = 2;").unwrap();
  assert!(decl_at < snapshot_at);
  assert!(snapshot_at < assign_at);
  assert!(out.contains("export default main;"));
}

#[test]
fn imported_modified_default_is_snapshotted_in_place() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import value from './counter';\nconsole.log(value);\n")
    .with_file("counter.js", "let count = 0;\nexport default count;\ncount += 1;\n");
  let out = bundle("main.js", &loader).unwrap();
  let decl_at = out.find("let count = 0;").unwrap();
  let snapshot_at = out.find("var counter = count;").unwrap();
  let bump_at = out.find("count += 1;").unwrap();
  assert!(decl_at < snapshot_at);
  assert!(snapshot_at < bump_at);
  assert!(out.contains("console.log(counter);"));
}

#[test]
fn anonymous_default_takes_the_importers_name() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import helper from './helper';\nhelper();\n")
    .with_file("helper.js", "export default function () { return 1; }\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("var helper = function () { return 1; };"));
  assert!(out.contains("helper();"));
}

#[test]
fn named_default_declaration_keeps_its_own_name() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import h from './helper';\nh();\n")
    .with_file("helper.js", "export default function helper() { return 1; }\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("function helper() { return 1; }"));
  assert!(!out.contains("export default function"));
  assert!(out.contains("helper();"));
}

#[test]
fn unmodified_identifier_default_aliases_directly() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import thing from './thing';\nconsole.log(thing);\n")
    .with_file("thing.js", "const real = { a: 1 };\nexport default real;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const real = { a: 1 };"));
  // Importers alias the binding; no snapshot var is needed.
  assert!(!out.contains("var thing"));
  assert!(out.contains("console.log(real);"));
}

#[test]
fn default_expression_gets_a_derived_name() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import config from './config';\nconsole.log(config.port);\n")
    .with_file("config.js", "export default { port: 8080 };\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("var config = { port: 8080 };"));
  assert!(out.contains("console.log(config.port);"));
}

#[test]
fn entry_default_expression_is_reexported() {
  let loader = MemoryLoader::new().with_file("main.js", "export default 40 + 2;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("var main = 40 + 2;"));
  assert!(out.contains("export default main;"));
}
