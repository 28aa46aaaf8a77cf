use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;
use bundle_js::names::make_legal_identifier;
use proptest::prelude::*;

#[test]
fn colliding_top_level_names_are_deconflicted() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { util as utilA } from './a';\n\
       import { util as utilB } from './b';\n\
       console.log(utilA(), utilB());\n",
    )
    .with_file("a.js", "export function util() { return 'a'; }\n")
    .with_file("b.js", "export function util() { return 'b'; }\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("function util() { return 'a'; }"));
  assert!(out.contains("function _util() { return 'b'; }"));
  assert!(out.contains("console.log(util(), _util());"));
}

#[test]
fn namespace_imports_of_colliding_modules() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import * as one from './one';\n\
       import * as two from './two';\n\
       console.log(one.util, two.util);\n",
    )
    .with_file("one.js", "export const util = 1;\n")
    .with_file("two.js", "export const util = 2;\n");
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const util = 1;"));
  assert!(out.contains("const _util = 2;"));
  assert!(out.contains("util: util"));
  assert!(out.contains("util: _util"));
  assert!(out.contains("console.log(one.util, two.util);"));
}

#[test]
fn internal_references_follow_the_rename() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { double } from './a';\nimport { helper } from './b';\nconsole.log(double(2), helper());\n",
    )
    .with_file(
      "a.js",
      "function helper(n) { return n * 2; }\nexport function double(n) { return helper(n); }\n",
    )
    .with_file("b.js", "export function helper() { return 'b'; }\n");
  let out = bundle("main.js", &loader).unwrap();
  // a.js keeps `helper`; b.js gets the prefix, and every reference follows.
  assert!(out.contains("function helper(n) { return n * 2; }"));
  assert!(out.contains("function _helper() { return 'b'; }"));
  assert!(out.contains("return helper(n);"));
  assert!(out.contains("console.log(double(2), _helper());"));
}

#[test]
fn shorthand_properties_expand_on_rename() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { size } from './a';\nimport { pack } from './b';\nconsole.log(pack(), size);\n",
    )
    .with_file("a.js", "export const size = 1;\n")
    .with_file(
      "b.js",
      "const size = 99;\nexport function pack() { return { size }; }\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  // b.js's local `size` collides and is renamed; its shorthand expands.
  assert!(out.contains("const size = 1;"));
  assert!(out.contains("const _size = 99;"));
  assert!(out.contains("{ size: _size }"));
}

// Round-trip law: the canonical name of a binding does not depend on the
// shape of the import path that reached it.
#[test]
fn canonical_names_are_path_independent() {
  let direct = MemoryLoader::new()
    .with_file("main.js", "import { value } from './lib';\nconsole.log(value);\n")
    .with_file("lib.js", "export const value = 1;\n");
  let through_list = MemoryLoader::new()
    .with_file("main.js", "import { value } from './facade';\nconsole.log(value);\n")
    .with_file("facade.js", "export { value } from './lib';\n")
    .with_file("lib.js", "export const value = 1;\n");
  let through_star = MemoryLoader::new()
    .with_file("main.js", "import { value } from './facade';\nconsole.log(value);\n")
    .with_file("facade.js", "export * from './lib';\n")
    .with_file("lib.js", "export const value = 1;\n");

  for loader in [&direct, &through_list, &through_star] {
    let out = bundle("main.js", loader).unwrap();
    assert!(out.contains("const value = 1;"), "{}", out);
    assert!(out.contains("console.log(value);"), "{}", out);
  }
}

proptest! {
  // `makeLegalIdentifier` is idempotent for arbitrary input.
  #[test]
  fn make_legal_identifier_is_idempotent(s in ".{0,40}") {
    let once = make_legal_identifier(&s);
    prop_assert_eq!(make_legal_identifier(&once), once.clone());
    // And always produces something usable.
    prop_assert!(!once.is_empty());
  }
}
