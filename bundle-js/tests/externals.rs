use bundle_js::bundle;
use bundle_js::loader::MemoryLoader;

#[test]
fn unresolved_specifiers_stay_as_imports() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "import fs from 'node:fs';\nimport { join } from 'path';\nconsole.log(fs, join('a', 'b'));\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("import fs from 'node:fs';"));
  assert!(out.contains("import { join } from 'path';"));
  assert!(out.contains("console.log(fs, join('a', 'b'));"));
}

#[test]
fn external_namespace_imports_survive() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "import * as os from 'os';\nconsole.log(os.platform());\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("import * as os from 'os';"));
  assert!(out.contains("console.log(os.platform());"));
}

#[test]
fn external_bare_imports_survive() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "import 'polyfill';\nconsole.log('after');\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("import 'polyfill';"));
}

#[test]
fn external_names_are_deconflicted_via_aliases() {
  let loader = MemoryLoader::new()
    .with_file(
      "main.js",
      "import { join } from 'path';\nimport { join as joinLocal } from './strings';\nconsole.log(join('a'), joinLocal('b'));\n",
    )
    .with_file("strings.js", "export function join(s) { return s; }\n");
  let out = bundle("main.js", &loader).unwrap();
  // The external import claims `join` first; the local binding yields.
  assert!(out.contains("import { join } from 'path';"));
  assert!(out.contains("function _join(s) { return s; }"));
  assert!(out.contains("console.log(join('a'), _join('b'));"));
}

#[test]
fn default_and_named_imports_combine() {
  let loader = MemoryLoader::new().with_file(
    "main.js",
    "import React, { useState } from 'react';\nconsole.log(React, useState);\n",
  );
  let out = bundle("main.js", &loader).unwrap();
  assert!(out.contains("import React, { useState } from 'react';"));
}
