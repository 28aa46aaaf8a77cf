use anyhow::Context;
use bundle_js::loader::FsLoader;
use clap::Parser;
use diagnostics::diagnostic_from_bundle_error;
use diagnostics::host_error;
use diagnostics::render::render_diagnostic;
use diagnostics::render::SourceProvider;
use diagnostics::Diagnostic;
use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io::stdout;
use std::io::Write;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
  name = "bundle-js",
  about = "Scope-hoisting, tree-shaking ES module bundler"
)]
struct Cli {
  /// Entry module to bundle.
  #[arg(short, long)]
  input: PathBuf,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Log traversal events to stderr (honours RUST_LOG).
  #[arg(long)]
  verbose: bool,
}

#[derive(Default)]
struct LoadedSources {
  files: HashMap<String, String>,
}

impl SourceProvider for LoadedSources {
  fn file_text(&self, file: &str) -> Option<&str> {
    self.files.get(file).map(String::as_str)
  }
}

/// Renders the diagnostic with a source snippet where the file is still
/// readable, then exits non-zero.
fn exit_with_diagnostic(diagnostic: Diagnostic) -> ! {
  let mut provider = LoadedSources::default();
  if let Some(span) = &diagnostic.span {
    if let Ok(text) = fs::read_to_string(&span.file) {
      provider.files.insert(span.file.clone(), text);
    }
  }
  eprintln!("{}", render_diagnostic(&provider, &diagnostic));
  process::exit(1);
}

fn main() {
  let args = Cli::parse();
  if args.verbose {
    tracing_subscriber::fmt()
      .with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bundle_js=debug")),
      )
      .with_writer(std::io::stderr)
      .init();
  }

  let loader = FsLoader::new();
  let entry = args.input.to_string_lossy().into_owned();

  let output = match bundle_js::bundle(&entry, &loader) {
    Ok(output) => output,
    Err(err) => exit_with_diagnostic(diagnostic_from_bundle_error(&err)),
  };

  let write_result = match args.output.as_ref() {
    Some(path) => File::create(path)
      .and_then(|mut file| file.write_all(output.as_bytes()))
      .with_context(|| format!("failed to write {}", path.display())),
    None => stdout()
      .write_all(output.as_bytes())
      .context("failed to write to stdout"),
  };
  if let Err(err) = write_result {
    exit_with_diagnostic(host_error(format!("{:#}", err)));
  }
}
