use super::parse;
use crate::ast::*;

fn body(source: &str) -> Vec<Stmt> {
  parse(source).expect(source).body
}

fn first(source: &str) -> Stmt {
  body(source).into_iter().next().expect(source)
}

#[test]
fn parses_imports() {
  let Stmt::Import(import) = first("import a, { b as c, default as d } from './m';") else {
    panic!("expected import");
  };
  assert_eq!(import.default.as_ref().unwrap().name, "a");
  assert!(import.namespace.is_none());
  assert_eq!(import.named.len(), 2);
  assert_eq!(import.named[0].imported.name, "b");
  assert_eq!(import.named[0].local.name, "c");
  assert_eq!(import.named[1].imported.name, "default");
  assert_eq!(import.named[1].local.name, "d");
  assert_eq!(import.source.value, "./m");
  assert!(!import.is_bare());
}

#[test]
fn parses_namespace_and_bare_imports() {
  let Stmt::Import(ns) = first("import * as ns from 'pkg';") else {
    panic!();
  };
  assert_eq!(ns.namespace.as_ref().unwrap().name, "ns");
  assert_eq!(ns.source.value, "pkg");

  let Stmt::Import(bare) = first("import './side-effect.js';") else {
    panic!();
  };
  assert!(bare.is_bare());
}

#[test]
fn parses_export_forms() {
  let stmts = body(
    "export var a = 1;\n\
     export function f() {}\n\
     export { a as b };\n\
     export { c } from './c';\n\
     export * from './d';\n\
     export default a;\n",
  );
  assert!(matches!(&stmts[0], Stmt::ExportDecl(e) if matches!(*e.decl, Stmt::Var(_))));
  assert!(matches!(&stmts[1], Stmt::ExportDecl(e) if matches!(*e.decl, Stmt::Func(_))));
  let Stmt::ExportList(list) = &stmts[2] else {
    panic!();
  };
  assert_eq!(list.specifiers[0].local.name, "a");
  assert_eq!(list.specifiers[0].exported.name, "b");
  assert!(list.source.is_none());
  let Stmt::ExportList(reexport) = &stmts[3] else {
    panic!();
  };
  assert_eq!(reexport.source.as_ref().unwrap().value, "./c");
  assert!(matches!(&stmts[4], Stmt::ExportAll(_)));
  let Stmt::ExportDefault(default) = &stmts[5] else {
    panic!();
  };
  assert!(matches!(&default.decl, DefaultDecl::Expr(e) if matches!(e.as_ref(), Expr::Id(_))));
}

#[test]
fn splits_are_not_done_by_parser() {
  let Stmt::Var(decl) = first("var a = 1, b = 2;") else {
    panic!();
  };
  assert_eq!(decl.declarators.len(), 2);
  assert_eq!(decl.kind, VarDeclKind::Var);
}

#[test]
fn parses_arrow_functions() {
  let Stmt::Expr(s) = first("const_ => const_ + 1;") else {
    panic!();
  };
  assert!(matches!(s.expr, Expr::Arrow(_)));

  let Stmt::Var(decl) = first("let f = async (a, { b } = {}) => a + b;") else {
    panic!();
  };
  let Some(Expr::Arrow(arrow)) = &decl.declarators[0].init else {
    panic!();
  };
  assert!(arrow.is_async);
  assert_eq!(arrow.params.len(), 2);
  assert!(matches!(&arrow.body, ArrowBody::Expr(_)));
}

#[test]
fn paren_expr_is_not_arrow() {
  let Stmt::Expr(s) = first("(a, b);") else {
    panic!();
  };
  assert!(matches!(s.expr, Expr::Seq(_)));
}

#[test]
fn parses_operator_precedence() {
  let Stmt::Expr(s) = first("a + b * c ** d ** e;") else {
    panic!();
  };
  let Expr::Binary(add) = &s.expr else {
    panic!();
  };
  assert_eq!(add.op, BinaryOp::Add);
  let Expr::Binary(mul) = add.right.as_ref() else {
    panic!();
  };
  assert_eq!(mul.op, BinaryOp::Mul);
  // `**` is right-associative.
  let Expr::Binary(exp) = mul.right.as_ref() else {
    panic!();
  };
  assert_eq!(exp.op, BinaryOp::Exp);
  assert!(matches!(exp.right.as_ref(), Expr::Binary(inner) if inner.op == BinaryOp::Exp));
}

#[test]
fn parses_destructuring_assignment() {
  let Stmt::Expr(s) = first("[a, b.c] = xs;") else {
    panic!();
  };
  let Expr::Assign(assign) = &s.expr else {
    panic!();
  };
  let AssignTarget::Pat(pat) = &assign.target else {
    panic!("expected pattern target");
  };
  let Pat::Array(array) = pat.as_ref() else {
    panic!();
  };
  assert!(matches!(array.elements[0], Some(Pat::Id(_))));
  assert!(matches!(array.elements[1], Some(Pat::Expr(_))));
}

#[test]
fn parses_for_of_with_declaration() {
  let Stmt::ForInOf(stmt) = first("for (const x of xs) use(x);") else {
    panic!();
  };
  assert!(stmt.is_of);
  assert!(matches!(&stmt.left, ForHead::Var(d) if d.kind == VarDeclKind::Const));
}

#[test]
fn parses_templates_and_tagged_templates() {
  let Stmt::Expr(s) = first("tag`a${x + 1}b${y}c`;") else {
    panic!();
  };
  let Expr::TaggedTemplate(tagged) = &s.expr else {
    panic!();
  };
  assert_eq!(tagged.template.substitutions.len(), 2);
}

#[test]
fn parses_regex_vs_division() {
  let Stmt::Var(decl) = first("const re = /ab[/]c/g;") else {
    panic!();
  };
  assert!(matches!(
    decl.declarators[0].init,
    Some(Expr::Lit(LitExpr {
      kind: LitKind::Regex,
      ..
    }))
  ));

  let Stmt::Expr(s) = first("a / b / c;") else {
    panic!();
  };
  assert!(matches!(&s.expr, Expr::Binary(b) if b.op == BinaryOp::Div));
}

#[test]
fn parses_classes() {
  let Stmt::Class(decl) = first(
    "class A extends B {\n\
       static x = 1;\n\
       constructor(a) { this.a = a; }\n\
       get value() { return this.a; }\n\
       async *gen() { yield 1; }\n\
     }",
  ) else {
    panic!();
  };
  assert_eq!(decl.name.name, "A");
  assert!(decl.class.extends.is_some());
  assert_eq!(decl.class.members.len(), 4);
  assert!(decl.class.members[0].is_static);
  assert!(matches!(
    decl.class.members[0].kind,
    ClassMemberKind::Field { .. }
  ));
}

#[test]
fn asi_terminates_statements() {
  let stmts = body("let a = 1\nlet b = 2\nreturn_()\n");
  assert_eq!(stmts.len(), 3);
}

#[test]
fn reports_syntax_errors() {
  assert!(parse("let = 1;").is_err());
  assert!(parse("import from;").is_err());
  assert!(parse("export;").is_err());
  assert!(parse("a +").is_err());
}

#[test]
fn decodes_string_literals() {
  use super::decode_string_literal;
  assert_eq!(decode_string_literal("'./m'"), "./m");
  assert_eq!(decode_string_literal("\"a\\nb\""), "a\nb");
  assert_eq!(decode_string_literal("'\\u0041\\x42'"), "AB");
  assert_eq!(decode_string_literal("'\\u{1F600}'"), "\u{1F600}");
}
