use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;

#[test]
fn bare_imports_keep_every_statement_of_the_target() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import './setup';\nconsole.log('ready');\n")
    .with_file(
      "setup.js",
      "const registry = [];\nregistry.push('boot');\nconsole.log('setup done');\n",
    );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("const registry = [];"));
  assert!(out.contains("registry.push('boot');"));
  assert!(out.contains("console.log('setup done');"));
}

#[test]
fn side_effect_modules_run_in_import_order() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import './first';\nimport './second';\nconsole.log('main');\n",
    )
    .with_file("first.js", "console.log('first');\n")
    .with_file("second.js", "console.log('second');\n");
  let out = bundle("main.js", &loader).unwrap();
  let first_at = out.find("console.log('first');").unwrap();
  let second_at = out.find("console.log('second');").unwrap();
  let main_at = out.find("console.log('main');").unwrap();
  assert!(first_at < second_at);
  assert!(second_at < main_at);
}

#[test]
fn side_effect_chains_execute_depth_first() {
  let loader = MemoryLoader::new()
    .with_file("main.js", "import './outer';\nconsole.log('main');\n")
    .with_file("outer.js", "import './inner';\nconsole.log('outer');\n")
    .with_file("inner.js", "console.log('inner');\n");
  let out = bundle("main.js", &loader).unwrap();
  let inner_at = out.find("console.log('inner');").unwrap();
  let outer_at = out.find("console.log('outer');").unwrap();
  let main_at = out.find("console.log('main');").unwrap();
  assert!(inner_at < outer_at);
  assert!(outer_at < main_at);
}
