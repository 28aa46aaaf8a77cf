use bundle_js::bundle;
use bundle_js::loader::FsLoader;
use std::fs;

#[test]
fn bundles_from_the_filesystem() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(
    dir.path().join("main.js"),
    "import { a } from './lib/m';\nconsole.log(a);\n",
  )
  .unwrap();
  fs::create_dir(dir.path().join("lib")).unwrap();
  fs::write(
    dir.path().join("lib/m.js"),
    "export const a = 1;\nexport const b = 2;\n",
  )
  .unwrap();

  let entry = dir.path().join("main.js").to_string_lossy().into_owned();
  let out = bundle(&entry, &FsLoader::new()).unwrap();
  assert!(out.contains("const a = 1;"));
  assert!(!out.contains("const b"));
}

#[test]
fn missing_files_report_the_resolved_path() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(
    dir.path().join("main.js"),
    "import { x } from './nope';\nconsole.log(x);\n",
  )
  .unwrap();
  let entry = dir.path().join("main.js").to_string_lossy().into_owned();
  let err = bundle(&entry, &FsLoader::new()).unwrap_err();
  assert!(err.file.as_deref().unwrap().ends_with("nope.js"));
}
