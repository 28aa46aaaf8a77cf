use bundle_js::loader::MemoryLoader;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

/// A linear chain of modules, each exporting one live and one dead function.
fn chain(depth: usize) -> MemoryLoader {
  let mut loader =
    MemoryLoader::new().with_file("main.js", "import { f1 } from './m1';\nconsole.log(f1());\n");
  for i in 1..=depth {
    let source = if i == depth {
      format!(
        "export function f{i}() {{ return {i}; }}\nexport function dead{i}() {{ return 0; }}\n"
      )
    } else {
      let next = i + 1;
      format!(
        "import {{ f{next} }} from './m{next}';\n\
         export function f{i}() {{ return f{next}() + {i}; }}\n\
         export function dead{i}() {{ return 0; }}\n"
      )
    };
    loader.add_file(format!("m{i}.js"), source);
  }
  loader
}

fn bench_bundle(c: &mut Criterion) {
  let shallow = chain(10);
  c.bench_function("bundle_chain_10", |b| {
    b.iter(|| bundle_js::bundle("main.js", &shallow).unwrap())
  });

  let deep = chain(100);
  c.bench_function("bundle_chain_100", |b| {
    b.iter(|| bundle_js::bundle("main.js", &deep).unwrap())
  });
}

criterion_group!(benches, bench_bundle);
criterion_main!(benches);
