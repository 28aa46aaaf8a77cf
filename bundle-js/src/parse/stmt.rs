use super::expr::expr_to_pat;
use super::Parser;
use crate::ast::*;
use crate::err::SyntaxErrorType;
use crate::err::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_stmt(&mut self, top_level: bool) -> SyntaxResult<Stmt> {
    let t = self.peek();
    match t.typ {
      TT::BraceOpen => {
        let (body, loc) = self.parse_block_with_loc()?;
        Ok(Stmt::Block(BlockStmt { loc, body }))
      }
      TT::Semicolon => {
        self.consume();
        Ok(Stmt::Empty(EmptyStmt { loc: t.loc }))
      }
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst => {
        let decl = self.parse_var_decl(false)?;
        let loc = self.finish_stmt(decl.loc)?;
        Ok(Stmt::Var(VarDecl { loc, ..decl }))
      }
      TT::KeywordFunction => {
        self.consume();
        self.parse_func_decl(t.loc, false)
      }
      TT::KeywordClass => {
        self.consume();
        self.parse_class_decl(t.loc)
      }
      TT::KeywordIf => self.parse_if(),
      TT::KeywordWhile => self.parse_while(),
      TT::KeywordDo => self.parse_do_while(),
      TT::KeywordFor => self.parse_for(),
      TT::KeywordSwitch => self.parse_switch(),
      TT::KeywordTry => self.parse_try(),
      TT::KeywordReturn => self.parse_return(),
      TT::KeywordThrow => self.parse_throw(),
      TT::KeywordBreak | TT::KeywordContinue => self.parse_break_continue(),
      TT::KeywordDebugger => {
        self.consume();
        let loc = self.finish_stmt(t.loc)?;
        Ok(Stmt::Debugger(DebuggerStmt { loc }))
      }
      TT::KeywordImport => {
        let [_, second] = self.peek_n::<2>();
        if top_level && !matches!(second.typ, TT::ParenOpen | TT::Dot) {
          self.parse_import_stmt()
        } else {
          self.parse_expr_stmt()
        }
      }
      TT::KeywordExport => {
        if !top_level {
          return Err(t.error(SyntaxErrorType::UnexpectedToken));
        }
        self.parse_export_stmt()
      }
      TT::Identifier => {
        let [first, second] = self.peek_n::<2>();
        if second.typ == TT::Colon {
          self.consume();
          self.consume();
          let label = Ident {
            loc: first.loc,
            name: self.string(first.loc),
          };
          let body = self.parse_stmt(false)?;
          let mut loc = first.loc;
          loc.extend(body.loc());
          return Ok(Stmt::Labeled(LabeledStmt {
            loc,
            label,
            body: Box::new(body),
          }));
        }
        if self.str(first.loc) == "async"
          && second.typ == TT::KeywordFunction
          && !second.preceded_by_line_terminator
        {
          self.consume();
          self.consume();
          return self.parse_func_decl(first.loc, true);
        }
        self.parse_expr_stmt()
      }
      _ => self.parse_expr_stmt(),
    }
  }

  /// Consumes the statement terminator: an explicit semicolon, or an inserted
  /// one before `}`, EOF, or a line break.
  pub(crate) fn finish_stmt(&mut self, mut loc: Loc) -> SyntaxResult<Loc> {
    let t = self.peek();
    if t.typ == TT::Semicolon {
      self.consume();
      loc.extend(t.loc);
      return Ok(loc);
    }
    if t.typ == TT::EOF || t.typ == TT::BraceClose || t.preceded_by_line_terminator {
      return Ok(loc);
    }
    Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon)))
  }

  fn parse_expr_stmt(&mut self) -> SyntaxResult<Stmt> {
    let expr = self.parse_expr(false)?;
    let loc = self.finish_stmt(expr.loc())?;
    Ok(Stmt::Expr(ExprStmt { loc, expr }))
  }

  /// Parses `{ stmt* }`, returning the body and the full braced range.
  fn parse_block_with_loc(&mut self) -> SyntaxResult<(Vec<Stmt>, Loc)> {
    let start = self.require(TT::BraceOpen)?;
    let mut body = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BraceClose).match_loc() {
        break loc;
      }
      body.push(self.parse_stmt(false)?);
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok((body, loc))
  }

  pub fn parse_block_body(&mut self) -> SyntaxResult<(Vec<Stmt>, Loc)> {
    self.parse_block_with_loc()
  }

  /// Parses declarators after the `var`/`let`/`const` keyword. Inside a `for`
  /// head, `in` is not an operator.
  fn parse_var_decl(&mut self, for_head: bool) -> SyntaxResult<VarDecl> {
    let kind_tok = self.consume();
    let kind = match kind_tok.typ {
      TT::KeywordVar => VarDeclKind::Var,
      TT::KeywordLet => VarDeclKind::Let,
      _ => VarDeclKind::Const,
    };
    let mut loc = kind_tok.loc;
    let mut declarators = Vec::new();
    loop {
      let pat = self.parse_pat()?;
      let mut dloc = pat.loc();
      let init = if self.consume_if(TT::Equals).is_match() {
        let e = self.parse_assign_expr(for_head)?;
        dloc.extend(e.loc());
        Some(e)
      } else {
        None
      };
      loc.extend(dloc);
      declarators.push(VarDeclarator {
        loc: dloc,
        pat,
        init,
      });
      if !self.consume_if(TT::Comma).is_match() {
        break;
      }
    }
    Ok(VarDecl {
      loc,
      kind,
      declarators,
    })
  }

  fn parse_func_decl(&mut self, start: Loc, is_async: bool) -> SyntaxResult<Stmt> {
    let is_generator = self.consume_if(TT::Asterisk).is_match();
    let name_tok = self.require_identifier()?;
    let name = Ident {
      loc: name_tok.loc,
      name: self.string(name_tok.loc),
    };
    let func = self.parse_func_payload(start, is_async, is_generator)?;
    let mut loc = start;
    loc.extend(func.loc);
    Ok(Stmt::Func(FuncDecl { loc, name, func }))
  }

  fn parse_class_decl(&mut self, start: Loc) -> SyntaxResult<Stmt> {
    let name_tok = self.require_identifier()?;
    let name = Ident {
      loc: name_tok.loc,
      name: self.string(name_tok.loc),
    };
    let class = self.parse_class_payload()?;
    let mut loc = start;
    loc.extend(class.loc);
    Ok(Stmt::Class(ClassDecl { loc, name, class }))
  }

  /// Parses `(params) { body }` for functions and methods.
  pub fn parse_func_payload(
    &mut self,
    start: Loc,
    is_async: bool,
    is_generator: bool,
  ) -> SyntaxResult<Func> {
    self.require(TT::ParenOpen)?;
    let mut params = Vec::new();
    loop {
      if self.consume_if(TT::ParenClose).is_match() {
        break;
      }
      if let Some(dots) = self.consume_if(TT::DotDotDot).match_loc() {
        let target = self.parse_pat()?;
        let mut loc = dots;
        loc.extend(target.loc());
        params.push(Pat::Rest(RestPat {
          loc,
          target: Box::new(target),
        }));
      } else {
        params.push(self.parse_pat_with_default()?);
      }
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::ParenClose)?;
        break;
      }
    }
    let (body, body_loc) = self.parse_block_with_loc()?;
    let mut loc = start;
    loc.extend(body_loc);
    Ok(Func {
      loc,
      is_async,
      is_generator,
      params,
      body,
    })
  }

  /// Parses an optional `extends` clause and the class body. The `class`
  /// keyword and name have already been consumed.
  pub fn parse_class_payload(&mut self) -> SyntaxResult<Class> {
    let extends = if self.consume_if(TT::KeywordExtends).is_match() {
      Some(Box::new(self.parse_lhs_expr()?))
    } else {
      None
    };
    let start = self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BraceClose).match_loc() {
        break loc;
      }
      if self.consume_if(TT::Semicolon).is_match() {
        continue;
      }
      members.push(self.parse_class_member()?);
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Class {
      loc,
      extends,
      members,
    })
  }

  fn parse_class_member(&mut self) -> SyntaxResult<ClassMember> {
    let start = self.peek().loc;
    let mut is_static = false;
    if self.peek_contextual("static") {
      let [_, second] = self.peek_n::<2>();
      if !matches!(
        second.typ,
        TT::ParenOpen | TT::Equals | TT::Semicolon | TT::BraceClose
      ) {
        self.consume();
        is_static = true;
      }
    }
    let t = self.peek();
    let [_, second] = self.peek_n::<2>();
    let modifier_applies = !matches!(
      second.typ,
      TT::ParenOpen | TT::Equals | TT::Semicolon | TT::BraceClose
    );
    if t.typ == TT::Identifier && modifier_applies {
      let word = self.string(t.loc);
      if word == "get" || word == "set" {
        self.consume();
        let key = self.parse_prop_key()?;
        let func = self.parse_func_payload(t.loc, false, false)?;
        let mut loc = start;
        loc.extend(func.loc);
        return Ok(ClassMember {
          loc,
          is_static,
          key,
          kind: ClassMemberKind::Method {
            kind: if word == "get" {
              MethodKind::Get
            } else {
              MethodKind::Set
            },
            func,
          },
        });
      }
      if word == "async" && !second.preceded_by_line_terminator {
        self.consume();
        let is_generator = self.consume_if(TT::Asterisk).is_match();
        let key = self.parse_prop_key()?;
        let func = self.parse_func_payload(t.loc, true, is_generator)?;
        let mut loc = start;
        loc.extend(func.loc);
        return Ok(ClassMember {
          loc,
          is_static,
          key,
          kind: ClassMemberKind::Method {
            kind: MethodKind::Method,
            func,
          },
        });
      }
    }
    if t.typ == TT::Asterisk {
      self.consume();
      let key = self.parse_prop_key()?;
      let func = self.parse_func_payload(t.loc, false, true)?;
      let mut loc = start;
      loc.extend(func.loc);
      return Ok(ClassMember {
        loc,
        is_static,
        key,
        kind: ClassMemberKind::Method {
          kind: MethodKind::Method,
          func,
        },
      });
    }
    let key = self.parse_prop_key()?;
    if self.peek().typ == TT::ParenOpen {
      let func = self.parse_func_payload(t.loc, false, false)?;
      let mut loc = start;
      loc.extend(func.loc);
      return Ok(ClassMember {
        loc,
        is_static,
        key,
        kind: ClassMemberKind::Method {
          kind: MethodKind::Method,
          func,
        },
      });
    }
    // Field, with optional initialiser.
    let mut loc = start;
    let value = if self.consume_if(TT::Equals).is_match() {
      let e = self.parse_assign_expr(false)?;
      loc.extend(e.loc());
      Some(e)
    } else {
      None
    };
    if let Some(semi) = self.consume_if(TT::Semicolon).match_loc() {
      loc.extend(semi);
    }
    Ok(ClassMember {
      loc,
      is_static,
      key,
      kind: ClassMemberKind::Field { value },
    })
  }

  fn parse_if(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordIf)?;
    self.require(TT::ParenOpen)?;
    let test = self.parse_expr(false)?;
    self.require(TT::ParenClose)?;
    let cons = self.parse_stmt(false)?;
    let mut loc = start.loc;
    loc.extend(cons.loc());
    let alt = if self.consume_if(TT::KeywordElse).is_match() {
      let alt = self.parse_stmt(false)?;
      loc.extend(alt.loc());
      Some(Box::new(alt))
    } else {
      None
    };
    Ok(Stmt::If(IfStmt {
      loc,
      test,
      cons: Box::new(cons),
      alt,
    }))
  }

  fn parse_while(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordWhile)?;
    self.require(TT::ParenOpen)?;
    let test = self.parse_expr(false)?;
    self.require(TT::ParenClose)?;
    let body = self.parse_stmt(false)?;
    let mut loc = start.loc;
    loc.extend(body.loc());
    Ok(Stmt::While(WhileStmt {
      loc,
      test,
      body: Box::new(body),
    }))
  }

  fn parse_do_while(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordDo)?;
    let body = self.parse_stmt(false)?;
    self.require(TT::KeywordWhile)?;
    self.require(TT::ParenOpen)?;
    let test = self.parse_expr(false)?;
    let close = self.require(TT::ParenClose)?;
    let mut loc = start.loc;
    loc.extend(close.loc);
    let loc = self.finish_stmt(loc)?;
    Ok(Stmt::DoWhile(DoWhileStmt {
      loc,
      body: Box::new(body),
      test,
    }))
  }

  fn parse_for(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordFor)?;
    self.require(TT::ParenOpen)?;
    let t = self.peek();

    // Declaration head: may turn out to be a for-in/for-of left side.
    if matches!(t.typ, TT::KeywordVar | TT::KeywordLet | TT::KeywordConst) {
      let kind_tok = self.consume();
      let kind = match kind_tok.typ {
        TT::KeywordVar => VarDeclKind::Var,
        TT::KeywordLet => VarDeclKind::Let,
        _ => VarDeclKind::Const,
      };
      let pat = self.parse_pat()?;
      let next = self.peek();
      if next.typ == TT::KeywordIn || (next.typ == TT::Identifier && self.str(next.loc) == "of") {
        let is_of = next.typ != TT::KeywordIn;
        self.consume();
        let right = self.parse_assign_expr(false)?;
        self.require(TT::ParenClose)?;
        let body = self.parse_stmt(false)?;
        let mut loc = start.loc;
        loc.extend(body.loc());
        let mut decl_loc = kind_tok.loc;
        decl_loc.extend(pat.loc());
        return Ok(Stmt::ForInOf(ForInOfStmt {
          loc,
          is_of,
          left: ForHead::Var(VarDecl {
            loc: decl_loc,
            kind,
            declarators: vec![VarDeclarator {
              loc: pat.loc(),
              pat,
              init: None,
            }],
          }),
          right,
          body: Box::new(body),
        }));
      }
      // Plain C-style loop; finish the declarator list.
      let mut decl_loc = kind_tok.loc;
      let mut declarators = Vec::new();
      let mut first_pat = Some(pat);
      loop {
        let pat = match first_pat.take() {
          Some(p) => p,
          None => self.parse_pat()?,
        };
        let mut dloc = pat.loc();
        let init = if self.consume_if(TT::Equals).is_match() {
          let e = self.parse_assign_expr(true)?;
          dloc.extend(e.loc());
          Some(e)
        } else {
          None
        };
        decl_loc.extend(dloc);
        declarators.push(VarDeclarator {
          loc: dloc,
          pat,
          init,
        });
        if !self.consume_if(TT::Comma).is_match() {
          break;
        }
      }
      let init = ForInit::Var(VarDecl {
        loc: decl_loc,
        kind,
        declarators,
      });
      return self.parse_for_tail(start.loc, Some(init));
    }

    if self.peek().typ == TT::Semicolon {
      return self.parse_for_tail(start.loc, None);
    }

    let e = self.parse_expr(true)?;
    let next = self.peek();
    if next.typ == TT::KeywordIn || (next.typ == TT::Identifier && self.str(next.loc) == "of") {
      let is_of = next.typ != TT::KeywordIn;
      self.consume();
      let left = ForHead::Pat(expr_to_pat(e)?);
      let right = self.parse_assign_expr(false)?;
      self.require(TT::ParenClose)?;
      let body = self.parse_stmt(false)?;
      let mut loc = start.loc;
      loc.extend(body.loc());
      return Ok(Stmt::ForInOf(ForInOfStmt {
        loc,
        is_of,
        left,
        right,
        body: Box::new(body),
      }));
    }
    self.parse_for_tail(start.loc, Some(ForInit::Expr(e)))
  }

  fn parse_for_tail(&mut self, start: Loc, init: Option<ForInit>) -> SyntaxResult<Stmt> {
    self.require(TT::Semicolon)?;
    let test = if self.peek().typ != TT::Semicolon {
      Some(self.parse_expr(false)?)
    } else {
      None
    };
    self.require(TT::Semicolon)?;
    let update = if self.peek().typ != TT::ParenClose {
      Some(self.parse_expr(false)?)
    } else {
      None
    };
    self.require(TT::ParenClose)?;
    let body = self.parse_stmt(false)?;
    let mut loc = start;
    loc.extend(body.loc());
    Ok(Stmt::For(ForStmt {
      loc,
      init,
      test,
      update,
      body: Box::new(body),
    }))
  }

  fn parse_switch(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordSwitch)?;
    self.require(TT::ParenOpen)?;
    let disc = self.parse_expr(false)?;
    self.require(TT::ParenClose)?;
    self.require(TT::BraceOpen)?;
    let mut cases = Vec::new();
    let end = loop {
      let t = self.peek();
      match t.typ {
        TT::BraceClose => {
          self.consume();
          break t.loc;
        }
        TT::KeywordCase | TT::KeywordDefault => {
          self.consume();
          let test = if t.typ == TT::KeywordCase {
            Some(self.parse_expr(false)?)
          } else {
            None
          };
          self.require(TT::Colon)?;
          let mut body = Vec::new();
          let mut case_loc = t.loc;
          loop {
            let next = self.peek();
            if matches!(
              next.typ,
              TT::KeywordCase | TT::KeywordDefault | TT::BraceClose
            ) {
              break;
            }
            let stmt = self.parse_stmt(false)?;
            case_loc.extend(stmt.loc());
            body.push(stmt);
          }
          cases.push(SwitchCase {
            loc: case_loc,
            test,
            body,
          });
        }
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("switch case"))),
      }
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Stmt::Switch(SwitchStmt { loc, disc, cases }))
  }

  fn parse_try(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordTry)?;
    let (block, mut loc_end) = self.parse_block_with_loc()?;
    let mut catch = None;
    let mut finally = None;
    if let Some(catch_loc) = self.consume_if(TT::KeywordCatch).match_loc() {
      let param = if self.consume_if(TT::ParenOpen).is_match() {
        let p = self.parse_pat()?;
        self.require(TT::ParenClose)?;
        Some(p)
      } else {
        None
      };
      let (body, body_loc) = self.parse_block_with_loc()?;
      let mut loc = catch_loc;
      loc.extend(body_loc);
      loc_end.extend(loc);
      catch = Some(CatchClause { loc, param, body });
    }
    if self.consume_if(TT::KeywordFinally).is_match() {
      let (body, body_loc) = self.parse_block_with_loc()?;
      loc_end.extend(body_loc);
      finally = Some(body);
    }
    if catch.is_none() && finally.is_none() {
      return Err(
        start
          .loc
          .error(SyntaxErrorType::TryStatementHasNoCatchOrFinally, None),
      );
    }
    let mut loc = start.loc;
    loc.extend(loc_end);
    Ok(Stmt::Try(TryStmt {
      loc,
      block,
      catch,
      finally,
    }))
  }

  fn parse_return(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordReturn)?;
    let t = self.peek();
    let arg = if t.preceded_by_line_terminator
      || matches!(t.typ, TT::Semicolon | TT::BraceClose | TT::EOF)
    {
      None
    } else {
      Some(self.parse_expr(false)?)
    };
    let mut loc = start.loc;
    if let Some(arg) = &arg {
      loc.extend(arg.loc());
    }
    let loc = self.finish_stmt(loc)?;
    Ok(Stmt::Return(ReturnStmt { loc, arg }))
  }

  fn parse_throw(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordThrow)?;
    let t = self.peek();
    if t.preceded_by_line_terminator {
      return Err(t.error(SyntaxErrorType::LineTerminatorAfterThrow));
    }
    let arg = self.parse_expr(false)?;
    let mut loc = start.loc;
    loc.extend(arg.loc());
    let loc = self.finish_stmt(loc)?;
    Ok(Stmt::Throw(ThrowStmt { loc, arg }))
  }

  fn parse_break_continue(&mut self) -> SyntaxResult<Stmt> {
    let start = self.consume();
    let t = self.peek();
    let label = if t.typ == TT::Identifier && !t.preceded_by_line_terminator {
      self.consume();
      Some(Ident {
        loc: t.loc,
        name: self.string(t.loc),
      })
    } else {
      None
    };
    let mut loc = start.loc;
    if let Some(label) = &label {
      loc.extend(label.loc);
    }
    let loc = self.finish_stmt(loc)?;
    Ok(if start.typ == TT::KeywordBreak {
      Stmt::Break(BreakStmt { loc, label })
    } else {
      Stmt::Continue(ContinueStmt { loc, label })
    })
  }
}
