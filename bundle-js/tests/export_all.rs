use bundle_js::bundle;
use bundle_js::err::BundleErrorType;
use bundle_js::loader::MemoryLoader;
use bundle_js::Bundle;

#[test]
fn resolves_names_through_delegates() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { deep } from './a';\nconsole.log(deep);\n")
    .with_file("a.js", "export * from './b';\n")
    .with_file("b.js", "export const deep = 7;\nexport const shallow = 1;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const deep = 7;"));
  assert!(!out.contains("shallow"));
}

#[test]
fn records_the_winning_delegate() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { deep } from './a';\nconsole.log(deep);\n")
    .with_file("a.js", "export * from './b';\n")
    .with_file("b.js", "export const deep = 7;\n");
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  let a = graph
    .modules
    .iter()
    .find(|m| m.id == "a.js")
    .expect("a.js was fetched");
  let delegate = a.export_alls.get("deep").expect("delegate recorded");
  assert_eq!(a.export_delegates[*delegate].source, "./b");
  // The delegate edge becomes visible to ordering.
  let export_all_stmt = &a.statements[a.export_delegates[*delegate].statement];
  assert!(export_all_stmt.depends_on.contains("deep"));
  assert!(export_all_stmt.strongly_depends_on.contains("deep"));
}

#[test]
fn first_delegate_wins_in_order() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { dup } from './a';\nconsole.log(dup);\n")
    .with_file("a.js", "export * from './b';\nexport * from './c';\n")
    .with_file("b.js", "export const dup = 'from-b';\n")
    .with_file("c.js", "export const dup = 'from-c';\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("'from-b'"));
  assert!(!out.contains("'from-c'"));
}

#[test]
fn direct_exports_shadow_delegates() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { x } from './a';\nconsole.log(x);\n")
    .with_file("a.js", "export * from './b';\nexport const x = 'direct';\n")
    .with_file("b.js", "export const x = 'delegated';\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("'direct'"));
  assert!(!out.contains("'delegated'"));
}

#[test]
fn missing_name_in_every_delegate_is_an_error() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { ghost } from './a';\nconsole.log(ghost);\n")
    .with_file("a.js", "export * from './b';\n")
    .with_file("b.js", "export const real = 1;\n");
  let err = bundle("main.js", &loader).unwrap_err();
  match err.typ {
    BundleErrorType::NoSuchExport {
      name,
      module,
      importer,
    } => {
      assert_eq!(name, "ghost");
      assert_eq!(module, "a.js");
      assert_eq!(importer, "main.js");
    }
    other => panic!("expected NoSuchExport, got {:?}", other),
  }
}

#[test]
fn reexport_lists_chase_their_source() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { renamed } from './facade';\nconsole.log(renamed);\n")
    .with_file("facade.js", "export { original as renamed } from './impl';\n")
    .with_file("impl.js", "export const original = 'ok';\nexport const spare = 0;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const original = 'ok';"));
  assert!(!out.contains("spare"));
  assert!(out.contains("console.log(original);"));
}
