use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;
use bundle_js::Bundle;

#[test]
fn free_names_become_assumed_globals() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "const biggest = Math.max(1, 2);\nconsole.log(biggest);\n",
  );
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  assert!(graph.assumed_globals.contains("Math"));
  assert!(graph.assumed_globals.contains("console"));
  assert!(!graph.assumed_globals.contains("biggest"));
}

#[test]
fn globals_are_never_renamed() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "const biggest = Math.max(1, 2);\nconsole.log(biggest);\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("Math.max(1, 2)"));
  assert!(out.contains("console.log(biggest);"));
}

#[test]
fn local_bindings_move_out_of_a_globals_way() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { Math as MathUtils } from './math';\nconsole.log(MathUtils.twice(2), Math.PI);\n",
    )
    .with_file("math.js", "export const Math = { twice: (n) => n * 2 };\n");
  let out = bundle("main.js", &loader).unwrap();
  // The module-local `Math` yields to the real global.
  assert!(out.contains("const _Math = { twice: (n) => n * 2 };"));
  assert!(out.contains("console.log(_Math.twice(2), Math.PI);"));
}

#[test]
fn writes_to_undeclared_names_are_tolerated() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "window.flag = true;\nconsole.log(window.flag);\n",
  );
  let mut graph = Bundle::new(&loader);
  graph.build("main.js").unwrap();
  assert!(graph.assumed_globals.contains("window"));
}
