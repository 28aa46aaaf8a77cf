use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;

#[test]
fn drops_unreferenced_declarations() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { a } from './m';\nconsole.log(a);\n")
    .with_file("m.js", "export const a = 1;\nexport const b = 2;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const a = 1;"));
  assert!(out.contains("console.log(a);"));
  assert!(!out.contains("const b"));
}

#[test]
fn splits_declarators_for_elimination() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { kept } from './m';\nconsole.log(kept);\n")
    .with_file("m.js", "export var kept = 1, dropped = 2;\n")
    ;
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("var kept = 1;"));
  assert!(!out.contains("dropped"));
}

#[test]
fn pulls_in_transitive_dependencies() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { greet } from './greet';\ngreet('world');\n")
    .with_file(
      "greet.js",
      "import { exclaim } from './exclaim';\n\
       export function greet(name) { return exclaim('hello ' + name); }\n\
       export function unused() { return exclaim('nope'); }\n",
    )
    .with_file(
      "exclaim.js",
      "export function exclaim(s) { return s + '!'; }\nexport const LOUD = true;\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("function greet(name)"));
  assert!(out.contains("function exclaim(s)"));
  assert!(!out.contains("function unused"));
  assert!(!out.contains("LOUD"));
}

#[test]
fn keeps_statements_modifying_included_bindings() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { total } from './acc';\nconsole.log(total);\n")
    .with_file(
      "acc.js",
      "export let total = 0;\ntotal += 10;\nlet unrelated = 0;\nunrelated += 1;\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("let total = 0;"));
  assert!(out.contains("total += 10;"));
  assert!(!out.contains("unrelated"));
}

#[test]
fn strips_export_keywords_from_surviving_declarations() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { f } from './m';\nexport const result = f();\n",
    )
    .with_file("m.js", "export function f() { return 3; }\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("function f() { return 3; }"));
  assert!(!out.contains("export function"));
  assert!(out.contains("const result = f();"));
  assert!(out.contains("export { result };"));
}

#[test]
fn dependency_statements_precede_dependents() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { b } from './b';\nconsole.log(b);\n")
    .with_file("b.js", "import { a } from './a';\nexport const b = a + 1;\n")
    .with_file("a.js", "export const a = 1;\n");
  let out = bundle("main.js", &loader).unwrap();
  let a_at = out.find("const a = 1;").unwrap();
  let b_at = out.find("const b = a + 1;").unwrap();
  let log_at = out.find("console.log(b);").unwrap();
  assert!(a_at < b_at);
  assert!(b_at < log_at);
}
