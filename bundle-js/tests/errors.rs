use bundle_js::bundle;
use bundle_js::err::BundleErrorType;
use bundle_js::loader::MemoryLoader;
use bundle_js::Bundle;

#[test]
fn duplicate_import_is_rejected() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { a } from './x';\nimport { a } from './y';\nconsole.log(a);\n",
    )
    .with_file("x.js", "export const a = 1;\n")
    .with_file("y.js", "export const a = 2;\n");
  let err = bundle("main.js", &loader).unwrap_err();
  match err.typ {
    BundleErrorType::DuplicateImport { local_name } => assert_eq!(local_name, "a"),
    other => panic!("expected DuplicateImport, got {:?}", other),
  }
  assert_eq!(err.file.as_deref(), Some("main.js"));
  assert!(err.loc.is_some());
}

#[test]
fn import_colliding_with_declaration_is_rejected() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { a } from './x';\nconst a = 1;\nconsole.log(a);\n",
    )
    .with_file("x.js", "export const a = 1;\n");
  let err = bundle("main.js", &loader).unwrap_err();
  assert!(matches!(
    err.typ,
    BundleErrorType::DuplicateImport { .. }
  ));
}

#[test]
fn missing_modules_propagate_from_the_loader() {
  let loader = MemoryLoader::new().with_file("main.js", "import { x } from './gone';\nconsole.log(x);\n");
  let err = bundle("main.js", &loader).unwrap_err();
  match err.typ {
    BundleErrorType::ModuleNotFound { source, importer } => {
      assert_eq!(source, "./gone");
      assert_eq!(importer.as_deref(), Some("main.js"));
    }
    other => panic!("expected ModuleNotFound, got {:?}", other),
  }
}

#[test]
fn missing_entry_is_an_error() {
  let loader = MemoryLoader::new();
  let err = bundle("main.js", &loader).unwrap_err();
  assert!(matches!(err.typ, BundleErrorType::ModuleNotFound { .. }));
}

#[test]
fn parse_errors_carry_file_and_location() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { b } from './broken';\nconsole.log(b);\n")
    .with_file("broken.js", "export const = 1;\n");
  let err = bundle("main.js", &loader).unwrap_err();
  assert!(matches!(err.typ, BundleErrorType::Parse(_)));
  assert_eq!(err.file.as_deref(), Some("broken.js"));
  assert!(err.loc.is_some());
}

#[test]
fn find_defining_statement_rejects_default_and_star() {
  let loader = MemoryLoader::new().with_file("main.js", "export default 1;\n");
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  let entry = graph.entry.unwrap();
  let err = graph.find_defining_statement(entry, "default").unwrap_err();
  assert!(matches!(err.typ, BundleErrorType::NotSupported(_)));
  let err = graph.find_defining_statement(entry, "*").unwrap_err();
  assert!(matches!(err.typ, BundleErrorType::NotSupported(_)));
}

#[test]
fn find_defining_statement_follows_imports() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { a } from './m';\nconsole.log(a);\n")
    .with_file("m.js", "export const a = 1;\n");
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  let entry = graph.entry.unwrap();
  let found = graph
    .find_defining_statement(entry, "a")
    .unwrap()
    .expect("definition found");
  assert_eq!(graph.modules[found.module.0].id, "m.js");
}
