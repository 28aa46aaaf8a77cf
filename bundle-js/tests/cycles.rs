use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;

#[test]
fn mutual_imports_terminate() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { fx } from './x';\nimport { fy } from './y';\nconsole.log(fx(), fy());\n",
    )
    .with_file(
      "x.js",
      "import { fy } from './y';\nexport function fx(n) { return n ? fy(0) : 'x'; }\n",
    )
    .with_file(
      "y.js",
      "import { fx } from './x';\nexport function fy(n) { return n ? fx(0) : 'y'; }\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  assert_eq!(out.matches("function fx").count(), 1);
  assert_eq!(out.matches("function fy").count(), 1);
}

#[test]
fn self_import_cycle_through_reexport() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import { a } from './a';\nconsole.log(a);\n")
    .with_file(
      "a.js",
      "import { helper } from './b';\nexport const a = helper();\n",
    )
    .with_file(
      "b.js",
      "import { a } from './a';\nexport function helper() { return () => a; }\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  assert_eq!(out.matches("const a = helper();").count(), 1);
  assert_eq!(out.matches("function helper").count(), 1);
}

#[test]
fn cyclic_side_effect_imports_terminate() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import './a';\nconsole.log('main');\n")
    .with_file("a.js", "import './b';\nconsole.log('a');\n")
    .with_file("b.js", "import './a';\nconsole.log('b');\n");
  let out = bundle("main.js", &loader).unwrap();
  let b_at = out.find("console.log('b');").unwrap();
  let a_at = out.find("console.log('a');").unwrap();
  let main_at = out.find("console.log('main');").unwrap();
  assert!(b_at < a_at);
  assert!(a_at < main_at);
}
