//! A compact ECMAScript AST.
//!
//! Every node records the half-open byte range it was parsed from; rendering
//! works by re-slicing the original source, so nodes do not store raw text.
//! Parentheses are not represented; a parenthesized expression is its inner
//! expression with a wider `loc`.

use crate::lex::Comment;
use crate::loc::Loc;

#[derive(Clone, Debug)]
pub struct Program {
  pub loc: Loc,
  pub body: Vec<Stmt>,
  pub comments: Vec<Comment>,
}

/// An identifier occurrence: a binding, a reference, or a label, depending on
/// position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
  pub loc: Loc,
  pub name: String,
}

/// A string literal with its decoded value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrLit {
  pub loc: Loc,
  pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarDeclKind {
  Var,
  Let,
  Const,
}

impl VarDeclKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      VarDeclKind::Var => "var",
      VarDeclKind::Let => "let",
      VarDeclKind::Const => "const",
    }
  }
}

#[derive(Clone, Debug)]
pub enum Stmt {
  Block(BlockStmt),
  Break(BreakStmt),
  Class(ClassDecl),
  Continue(ContinueStmt),
  Debugger(DebuggerStmt),
  DoWhile(DoWhileStmt),
  Empty(EmptyStmt),
  ExportAll(ExportAllDecl),
  ExportDecl(ExportDeclStmt),
  ExportDefault(ExportDefaultDecl),
  ExportList(ExportListDecl),
  Expr(ExprStmt),
  For(ForStmt),
  ForInOf(ForInOfStmt),
  Func(FuncDecl),
  If(IfStmt),
  Import(ImportDecl),
  Labeled(LabeledStmt),
  Return(ReturnStmt),
  Switch(SwitchStmt),
  Throw(ThrowStmt),
  Try(TryStmt),
  Var(VarDecl),
  While(WhileStmt),
}

impl Stmt {
  pub fn loc(&self) -> Loc {
    match self {
      Stmt::Block(s) => s.loc,
      Stmt::Break(s) => s.loc,
      Stmt::Class(s) => s.loc,
      Stmt::Continue(s) => s.loc,
      Stmt::Debugger(s) => s.loc,
      Stmt::DoWhile(s) => s.loc,
      Stmt::Empty(s) => s.loc,
      Stmt::ExportAll(s) => s.loc,
      Stmt::ExportDecl(s) => s.loc,
      Stmt::ExportDefault(s) => s.loc,
      Stmt::ExportList(s) => s.loc,
      Stmt::Expr(s) => s.loc,
      Stmt::For(s) => s.loc,
      Stmt::ForInOf(s) => s.loc,
      Stmt::Func(s) => s.loc,
      Stmt::If(s) => s.loc,
      Stmt::Import(s) => s.loc,
      Stmt::Labeled(s) => s.loc,
      Stmt::Return(s) => s.loc,
      Stmt::Switch(s) => s.loc,
      Stmt::Throw(s) => s.loc,
      Stmt::Try(s) => s.loc,
      Stmt::Var(s) => s.loc,
      Stmt::While(s) => s.loc,
    }
  }
}

#[derive(Clone, Debug)]
pub struct BlockStmt {
  pub loc: Loc,
  pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct BreakStmt {
  pub loc: Loc,
  pub label: Option<Ident>,
}

#[derive(Clone, Debug)]
pub struct ContinueStmt {
  pub loc: Loc,
  pub label: Option<Ident>,
}

#[derive(Clone, Debug)]
pub struct DebuggerStmt {
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct DoWhileStmt {
  pub loc: Loc,
  pub body: Box<Stmt>,
  pub test: Expr,
}

#[derive(Clone, Debug)]
pub struct EmptyStmt {
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ExprStmt {
  pub loc: Loc,
  pub expr: Expr,
}

#[derive(Clone, Debug)]
pub struct IfStmt {
  pub loc: Loc,
  pub test: Expr,
  pub cons: Box<Stmt>,
  pub alt: Option<Box<Stmt>>,
}

#[derive(Clone, Debug)]
pub struct LabeledStmt {
  pub loc: Loc,
  pub label: Ident,
  pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct ReturnStmt {
  pub loc: Loc,
  pub arg: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct ThrowStmt {
  pub loc: Loc,
  pub arg: Expr,
}

#[derive(Clone, Debug)]
pub struct WhileStmt {
  pub loc: Loc,
  pub test: Expr,
  pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct ForStmt {
  pub loc: Loc,
  pub init: Option<ForInit>,
  pub test: Option<Expr>,
  pub update: Option<Expr>,
  pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub enum ForInit {
  Var(VarDecl),
  Expr(Expr),
}

#[derive(Clone, Debug)]
pub struct ForInOfStmt {
  pub loc: Loc,
  pub is_of: bool,
  pub left: ForHead,
  pub right: Expr,
  pub body: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub enum ForHead {
  Var(VarDecl),
  Pat(Pat),
}

#[derive(Clone, Debug)]
pub struct SwitchStmt {
  pub loc: Loc,
  pub disc: Expr,
  pub cases: Vec<SwitchCase>,
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
  pub loc: Loc,
  pub test: Option<Expr>,
  pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct TryStmt {
  pub loc: Loc,
  pub block: Vec<Stmt>,
  pub catch: Option<CatchClause>,
  pub finally: Option<Vec<Stmt>>,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
  pub loc: Loc,
  pub param: Option<Pat>,
  pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct VarDecl {
  pub loc: Loc,
  pub kind: VarDeclKind,
  pub declarators: Vec<VarDeclarator>,
}

#[derive(Clone, Debug)]
pub struct VarDeclarator {
  pub loc: Loc,
  pub pat: Pat,
  pub init: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
  pub loc: Loc,
  pub name: Ident,
  pub func: Func,
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
  pub loc: Loc,
  pub name: Ident,
  pub class: Class,
}

/// Shared function payload for declarations, expressions, and methods.
#[derive(Clone, Debug)]
pub struct Func {
  pub loc: Loc,
  pub is_async: bool,
  pub is_generator: bool,
  pub params: Vec<Pat>,
  pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct Class {
  pub loc: Loc,
  pub extends: Option<Box<Expr>>,
  pub members: Vec<ClassMember>,
}

#[derive(Clone, Debug)]
pub struct ClassMember {
  pub loc: Loc,
  pub is_static: bool,
  pub key: PropKey,
  pub kind: ClassMemberKind,
}

#[derive(Clone, Debug)]
pub enum ClassMemberKind {
  Method { kind: MethodKind, func: Func },
  Field { value: Option<Expr> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
  Method,
  Get,
  Set,
}

#[derive(Clone, Debug)]
pub enum PropKey {
  Ident(Ident),
  Str(StrLit),
  Num { loc: Loc },
  Computed(Box<Expr>),
}

// Imports and exports. Aliases are always present, even when implicit, so
// downstream passes never special-case the shorthand forms.

#[derive(Clone, Debug)]
pub struct ImportDecl {
  pub loc: Loc,
  pub default: Option<Ident>,
  pub namespace: Option<Ident>,
  pub named: Vec<ImportSpecifier>,
  pub source: StrLit,
}

impl ImportDecl {
  /// `import 'module'` — imported for side effects only.
  pub fn is_bare(&self) -> bool {
    self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
  }
}

#[derive(Clone, Debug)]
pub struct ImportSpecifier {
  pub loc: Loc,
  pub imported: Ident,
  pub local: Ident,
}

#[derive(Clone, Debug)]
pub struct ExportAllDecl {
  pub loc: Loc,
  pub source: StrLit,
}

#[derive(Clone, Debug)]
pub struct ExportDeclStmt {
  pub loc: Loc,
  pub decl: Box<Stmt>,
}

#[derive(Clone, Debug)]
pub struct ExportDefaultDecl {
  pub loc: Loc,
  pub decl: DefaultDecl,
}

#[derive(Clone, Debug)]
pub enum DefaultDecl {
  Func {
    loc: Loc,
    name: Option<Ident>,
    func: Func,
  },
  Class {
    loc: Loc,
    name: Option<Ident>,
    class: Class,
  },
  Expr(Box<Expr>),
}

#[derive(Clone, Debug)]
pub struct ExportListDecl {
  pub loc: Loc,
  pub specifiers: Vec<ExportSpecifier>,
  pub source: Option<StrLit>,
}

#[derive(Clone, Debug)]
pub struct ExportSpecifier {
  pub loc: Loc,
  pub local: Ident,
  pub exported: Ident,
}

// Expressions.

#[derive(Clone, Debug)]
pub enum Expr {
  Array(ArrayExpr),
  Arrow(ArrowFunc),
  Assign(AssignExpr),
  Await(AwaitExpr),
  Binary(BinaryExpr),
  Call(CallExpr),
  Class(ClassExpr),
  Cond(CondExpr),
  Func(FuncExpr),
  Id(Ident),
  ImportCall(ImportCallExpr),
  ImportMeta(ImportMetaExpr),
  Lit(LitExpr),
  Member(MemberExpr),
  New(NewExpr),
  NewTarget(NewTargetExpr),
  Object(ObjectExpr),
  Seq(SeqExpr),
  Super(SuperExpr),
  TaggedTemplate(TaggedTemplateExpr),
  Template(TemplateExpr),
  This(ThisExpr),
  Unary(UnaryExpr),
  Update(UpdateExpr),
  Yield(YieldExpr),
}

impl Expr {
  pub fn loc(&self) -> Loc {
    match self {
      Expr::Array(e) => e.loc,
      Expr::Arrow(e) => e.loc,
      Expr::Assign(e) => e.loc,
      Expr::Await(e) => e.loc,
      Expr::Binary(e) => e.loc,
      Expr::Call(e) => e.loc,
      Expr::Class(e) => e.loc,
      Expr::Cond(e) => e.loc,
      Expr::Func(e) => e.loc,
      Expr::Id(e) => e.loc,
      Expr::ImportCall(e) => e.loc,
      Expr::ImportMeta(e) => e.loc,
      Expr::Lit(e) => e.loc,
      Expr::Member(e) => e.loc,
      Expr::New(e) => e.loc,
      Expr::NewTarget(e) => e.loc,
      Expr::Object(e) => e.loc,
      Expr::Seq(e) => e.loc,
      Expr::Super(e) => e.loc,
      Expr::TaggedTemplate(e) => e.loc,
      Expr::Template(e) => e.loc,
      Expr::This(e) => e.loc,
      Expr::Unary(e) => e.loc,
      Expr::Update(e) => e.loc,
      Expr::Yield(e) => e.loc,
    }
  }

  pub fn set_loc(&mut self, loc: Loc) {
    match self {
      Expr::Array(e) => e.loc = loc,
      Expr::Arrow(e) => e.loc = loc,
      Expr::Assign(e) => e.loc = loc,
      Expr::Await(e) => e.loc = loc,
      Expr::Binary(e) => e.loc = loc,
      Expr::Call(e) => e.loc = loc,
      Expr::Class(e) => e.loc = loc,
      Expr::Cond(e) => e.loc = loc,
      Expr::Func(e) => e.loc = loc,
      Expr::Id(e) => e.loc = loc,
      Expr::ImportCall(e) => e.loc = loc,
      Expr::ImportMeta(e) => e.loc = loc,
      Expr::Lit(e) => e.loc = loc,
      Expr::Member(e) => e.loc = loc,
      Expr::New(e) => e.loc = loc,
      Expr::NewTarget(e) => e.loc = loc,
      Expr::Object(e) => e.loc = loc,
      Expr::Seq(e) => e.loc = loc,
      Expr::Super(e) => e.loc = loc,
      Expr::TaggedTemplate(e) => e.loc = loc,
      Expr::Template(e) => e.loc = loc,
      Expr::This(e) => e.loc = loc,
      Expr::Unary(e) => e.loc = loc,
      Expr::Update(e) => e.loc = loc,
      Expr::Yield(e) => e.loc = loc,
    }
  }
}

#[derive(Clone, Debug)]
pub struct ArrayExpr {
  pub loc: Loc,
  // `None` is an elision (`[, x]`).
  pub elements: Vec<Option<Arg>>,
}

#[derive(Clone, Debug)]
pub struct Arg {
  pub spread: bool,
  pub expr: Expr,
}

#[derive(Clone, Debug)]
pub struct ArrowFunc {
  pub loc: Loc,
  pub is_async: bool,
  pub params: Vec<Pat>,
  pub body: ArrowBody,
}

#[derive(Clone, Debug)]
pub enum ArrowBody {
  Expr(Box<Expr>),
  Block(Vec<Stmt>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
  Assign,
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Exp,
  Shl,
  Shr,
  Ushr,
  BitAnd,
  BitOr,
  BitXor,
  And,
  Or,
  Nullish,
}

#[derive(Clone, Debug)]
pub struct AssignExpr {
  pub loc: Loc,
  pub op: AssignOp,
  pub target: AssignTarget,
  pub value: Box<Expr>,
}

#[derive(Clone, Debug)]
pub enum AssignTarget {
  Expr(Box<Expr>),
  Pat(Box<Pat>),
}

#[derive(Clone, Debug)]
pub struct AwaitExpr {
  pub loc: Loc,
  pub arg: Box<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Exp,
  Eq,
  Neq,
  StrictEq,
  StrictNeq,
  Lt,
  Gt,
  Le,
  Ge,
  Shl,
  Shr,
  Ushr,
  BitAnd,
  BitOr,
  BitXor,
  And,
  Or,
  Nullish,
  In,
  Instanceof,
}

#[derive(Clone, Debug)]
pub struct BinaryExpr {
  pub loc: Loc,
  pub op: BinaryOp,
  pub left: Box<Expr>,
  pub right: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct CallExpr {
  pub loc: Loc,
  pub callee: Box<Expr>,
  pub args: Vec<Arg>,
  pub optional: bool,
}

#[derive(Clone, Debug)]
pub struct ClassExpr {
  pub loc: Loc,
  pub name: Option<Ident>,
  pub class: Class,
}

#[derive(Clone, Debug)]
pub struct CondExpr {
  pub loc: Loc,
  pub test: Box<Expr>,
  pub cons: Box<Expr>,
  pub alt: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct FuncExpr {
  pub loc: Loc,
  pub name: Option<Ident>,
  pub func: Func,
}

#[derive(Clone, Debug)]
pub struct ImportCallExpr {
  pub loc: Loc,
  pub arg: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct ImportMetaExpr {
  pub loc: Loc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
  BigInt,
  Bool,
  Null,
  Num,
  Regex,
  Str,
}

#[derive(Clone, Debug)]
pub struct LitExpr {
  pub loc: Loc,
  pub kind: LitKind,
}

#[derive(Clone, Debug)]
pub struct MemberExpr {
  pub loc: Loc,
  pub object: Box<Expr>,
  pub prop: MemberProp,
  pub optional: bool,
}

#[derive(Clone, Debug)]
pub enum MemberProp {
  Static(Ident),
  Computed(Box<Expr>),
}

#[derive(Clone, Debug)]
pub struct NewExpr {
  pub loc: Loc,
  pub callee: Box<Expr>,
  // `None` when the argument list is omitted entirely (`new Foo`).
  pub args: Option<Vec<Arg>>,
}

#[derive(Clone, Debug)]
pub struct NewTargetExpr {
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ObjectExpr {
  pub loc: Loc,
  pub members: Vec<ObjectMember>,
}

#[derive(Clone, Debug)]
pub enum ObjectMember {
  Prop {
    loc: Loc,
    key: PropKey,
    value: Expr,
  },
  // `{ a }`, and the cover-grammar form `{ a = 1 }` that is only valid when
  // reinterpreted as a destructuring pattern.
  Shorthand {
    loc: Loc,
    name: Ident,
    default: Option<Expr>,
  },
  Method {
    loc: Loc,
    kind: MethodKind,
    key: PropKey,
    func: Func,
  },
  Spread {
    loc: Loc,
    expr: Expr,
  },
}

#[derive(Clone, Debug)]
pub struct SeqExpr {
  pub loc: Loc,
  pub exprs: Vec<Expr>,
}

#[derive(Clone, Debug)]
pub struct SuperExpr {
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct TaggedTemplateExpr {
  pub loc: Loc,
  pub tag: Box<Expr>,
  pub template: TemplateExpr,
}

#[derive(Clone, Debug)]
pub struct TemplateExpr {
  pub loc: Loc,
  pub substitutions: Vec<Expr>,
}

#[derive(Clone, Debug)]
pub struct ThisExpr {
  pub loc: Loc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
  BitNot,
  Delete,
  Minus,
  Not,
  Plus,
  Typeof,
  Void,
}

#[derive(Clone, Debug)]
pub struct UnaryExpr {
  pub loc: Loc,
  pub op: UnaryOp,
  pub arg: Box<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOp {
  Dec,
  Inc,
}

#[derive(Clone, Debug)]
pub struct UpdateExpr {
  pub loc: Loc,
  pub op: UpdateOp,
  pub prefix: bool,
  pub arg: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct YieldExpr {
  pub loc: Loc,
  pub delegate: bool,
  pub arg: Option<Box<Expr>>,
}

// Patterns.

#[derive(Clone, Debug)]
pub enum Pat {
  Array(ArrayPat),
  Assign(AssignPat),
  // A non-identifier assignment target such as `a.b` in `[a.b] = c`. Only
  // produced by reinterpreting expressions; never by declaration parsing.
  Expr(Box<Expr>),
  Id(Ident),
  Object(ObjectPat),
  Rest(RestPat),
}

impl Pat {
  pub fn loc(&self) -> Loc {
    match self {
      Pat::Array(p) => p.loc,
      Pat::Assign(p) => p.loc,
      Pat::Expr(e) => e.loc(),
      Pat::Id(p) => p.loc,
      Pat::Object(p) => p.loc,
      Pat::Rest(p) => p.loc,
    }
  }
}

#[derive(Clone, Debug)]
pub struct ArrayPat {
  pub loc: Loc,
  // `None` is an elision.
  pub elements: Vec<Option<Pat>>,
}

#[derive(Clone, Debug)]
pub struct AssignPat {
  pub loc: Loc,
  pub target: Box<Pat>,
  pub default: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct ObjectPat {
  pub loc: Loc,
  pub props: Vec<ObjectPatProp>,
  pub rest: Option<Box<Pat>>,
}

/// One property of an object pattern. Shorthand (`{ a }`) is represented with
/// `shorthand` set and `key`/`value` naming the same identifier.
#[derive(Clone, Debug)]
pub struct ObjectPatProp {
  pub loc: Loc,
  pub key: PropKey,
  pub value: Pat,
  pub shorthand: bool,
}

#[derive(Clone, Debug)]
pub struct RestPat {
  pub loc: Loc,
  pub target: Box<Pat>,
}
