use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::time::Duration;

fn bundle_js_cli() -> Command {
  Command::cargo_bin("bundle-js-cli").unwrap()
}

#[test]
fn bundles_to_stdout() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(
    dir.path().join("main.js"),
    "import { a } from './m';\nconsole.log(a);\n",
  )
  .unwrap();
  fs::write(
    dir.path().join("m.js"),
    "export const a = 1;\nexport const b = 2;\n",
  )
  .unwrap();

  bundle_js_cli()
    .timeout(Duration::from_secs(10))
    .arg("--input")
    .arg(dir.path().join("main.js"))
    .assert()
    .success()
    .stdout(predicate::str::contains("const a = 1;"))
    .stdout(predicate::str::contains("console.log(a);"))
    .stdout(predicate::str::contains("const b = 2;").not())
    .stderr(predicate::str::is_empty());
}

#[test]
fn writes_output_file() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("main.js"), "export const answer = 42;\n").unwrap();
  let out = dir.path().join("bundle.js");

  bundle_js_cli()
    .timeout(Duration::from_secs(10))
    .arg("--input")
    .arg(dir.path().join("main.js"))
    .arg("--output")
    .arg(&out)
    .assert()
    .success();

  let bundled = fs::read_to_string(&out).unwrap();
  assert!(bundled.contains("const answer = 42;"));
  assert!(bundled.contains("export { answer };"));
}

#[test]
fn missing_module_renders_diagnostic() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(
    dir.path().join("main.js"),
    "import { x } from './gone';\nconsole.log(x);\n",
  )
  .unwrap();

  bundle_js_cli()
    .timeout(Duration::from_secs(10))
    .arg("--input")
    .arg(dir.path().join("main.js"))
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("BUNDLE0004"))
    .stderr(predicate::str::contains("could not load"));
}

#[test]
fn parse_error_points_at_the_file() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("broken.js"), "const = 1;\n").unwrap();

  bundle_js_cli()
    .timeout(Duration::from_secs(10))
    .arg("--input")
    .arg(dir.path().join("broken.js"))
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("BUNDLE0001"))
    .stderr(predicate::str::contains("broken.js:1:"));
}
