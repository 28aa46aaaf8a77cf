//! A scope-hoisting, tree-shaking ES module bundler.
//!
//! Given an entry module, the bundler builds the module graph, marks the
//! statements actually reachable from the entry, and emits one flat program
//! with no module wrappers: every surviving top-level declaration is hoisted
//! into a single lexical scope, renamed where it would collide.
//!
//! ```
//! use bundle_js::loader::MemoryLoader;
//!
//! let loader = MemoryLoader::new()
//!   .with_file("main.js", "import { a } from './m'; console.log(a);")
//!   .with_file("m.js", "export const a = 1;\nexport const b = 2;");
//! let out = bundle_js::bundle("main.js", &loader).unwrap();
//! assert!(out.contains("const a = 1;"));
//! assert!(!out.contains("const b"));
//! ```

use err::BundleResult;
use loader::Loader;
use tracing::info_span;

pub mod ast;
pub mod bundle;
pub mod edit;
pub mod err;
pub mod ident;
pub mod lex;
pub mod loader;
pub mod loc;
pub mod module;
pub mod names;
pub mod parse;
pub mod render;
pub mod scope;
pub mod statement;
pub mod token;

pub use bundle::Bundle;
pub use err::BundleError;
pub use err::BundleErrorType;
pub use parse::parse;

/// Bundles the module graph rooted at `entry` into a single flat module.
pub fn bundle(entry: &str, loader: &dyn Loader) -> BundleResult<String> {
  let span = info_span!("bundle", entry);
  let _guard = span.enter();
  let mut bundle = Bundle::new(loader);
  bundle.build(entry)?;
  render::render(&mut bundle)
}
