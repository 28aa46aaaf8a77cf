//! Module resolution and source loading.
//!
//! The bundler core is loader-agnostic: anything that can turn a specifier
//! into a module id and an id into source text will do. Specifiers the
//! resolver declines (`None`) become external modules whose imports survive
//! into the output.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fs;
use std::path::Path;

use ahash::HashMap;
use ahash::HashMapExt;

#[derive(Clone, Debug)]
pub struct LoadError {
  pub message: String,
}

impl Display for LoadError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for LoadError {}

pub trait Loader {
  /// Maps a specifier to a module id, relative to the importing module.
  /// `None` marks the specifier as external.
  fn resolve(&self, source: &str, importer: Option<&str>) -> Option<String>;

  /// Reads the source text for a previously resolved id.
  fn load(&self, id: &str) -> Result<String, LoadError>;
}

/// Lexically normalises `.` and `..` segments. Does not consult the
/// filesystem, so symlinks are taken at face value.
fn normalize_path(path: &str) -> String {
  let absolute = path.starts_with('/');
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if segments.last().is_some_and(|s| *s != "..") {
          segments.pop();
        } else if !absolute {
          segments.push("..");
        }
      }
      other => segments.push(other),
    }
  }
  let joined = segments.join("/");
  if absolute {
    format!("/{}", joined)
  } else {
    joined
  }
}

fn dirname(id: &str) -> &str {
  match id.rfind('/') {
    Some(at) => &id[..at],
    None => "",
  }
}

fn resolve_relative(source: &str, importer: Option<&str>) -> Option<String> {
  let joined = match importer {
    // The entry specifier is trusted as-is.
    None => source.to_string(),
    Some(importer) if source.starts_with("./") || source.starts_with("../") => {
      let dir = dirname(importer);
      if dir.is_empty() {
        source.to_string()
      } else {
        format!("{}/{}", dir, source)
      }
    }
    Some(_) if source.starts_with('/') => source.to_string(),
    // Bare specifier: external.
    Some(_) => return None,
  };
  let mut id = normalize_path(&joined);
  if !id.ends_with(".js") {
    id.push_str(".js");
  }
  Some(id)
}

/// Loads modules from the filesystem; ids are paths.
#[derive(Default)]
pub struct FsLoader;

impl FsLoader {
  pub fn new() -> FsLoader {
    FsLoader
  }
}

impl Loader for FsLoader {
  fn resolve(&self, source: &str, importer: Option<&str>) -> Option<String> {
    resolve_relative(source, importer)
  }

  fn load(&self, id: &str) -> Result<String, LoadError> {
    fs::read_to_string(Path::new(id)).map_err(|err| LoadError {
      message: format!("failed to read {}: {}", id, err),
    })
  }
}

/// An in-memory module tree, used by tests and embedders.
#[derive(Default)]
pub struct MemoryLoader {
  files: HashMap<String, String>,
}

impl MemoryLoader {
  pub fn new() -> MemoryLoader {
    MemoryLoader {
      files: HashMap::new(),
    }
  }

  pub fn with_file(mut self, id: impl Into<String>, source: impl Into<String>) -> MemoryLoader {
    self.add_file(id, source);
    self
  }

  pub fn add_file(&mut self, id: impl Into<String>, source: impl Into<String>) {
    self.files.insert(id.into(), source.into());
  }
}

impl Loader for MemoryLoader {
  fn resolve(&self, source: &str, importer: Option<&str>) -> Option<String> {
    resolve_relative(source, importer)
  }

  fn load(&self, id: &str) -> Result<String, LoadError> {
    self.files.get(id).cloned().ok_or_else(|| LoadError {
      message: format!("no such module: {}", id),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_relative_specifiers() {
    let loader = MemoryLoader::new();
    assert_eq!(
      loader.resolve("./util", Some("src/main.js")),
      Some("src/util.js".to_string())
    );
    assert_eq!(
      loader.resolve("../shared/a.js", Some("src/deep/mod.js")),
      Some("src/shared/a.js".to_string())
    );
    assert_eq!(loader.resolve("main.js", None), Some("main.js".to_string()));
  }

  #[test]
  fn bare_specifiers_are_external() {
    let loader = MemoryLoader::new();
    assert_eq!(loader.resolve("lodash", Some("src/main.js")), None);
    assert_eq!(loader.resolve("@scope/pkg", Some("src/main.js")), None);
  }

  #[test]
  fn appends_js_suffix() {
    let loader = MemoryLoader::new();
    assert_eq!(
      loader.resolve("./m", Some("a.js")),
      Some("m.js".to_string())
    );
    assert_eq!(
      loader.resolve("./m.js", Some("a.js")),
      Some("m.js".to_string())
    );
  }
}
