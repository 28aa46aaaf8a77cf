use super::decode_string_literal;
use super::Parser;
use crate::ast::*;
use crate::err::SyntaxErrorType;
use crate::err::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::token::TT;

/// Whether a token can appear as a property or member name. Keywords are
/// valid in name position (`a.default`, `{ class: 1 }`).
fn is_name_token(typ: TT) -> bool {
  matches!(
    typ,
    TT::Identifier
      | TT::KeywordAwait
      | TT::KeywordBreak
      | TT::KeywordCase
      | TT::KeywordCatch
      | TT::KeywordClass
      | TT::KeywordConst
      | TT::KeywordContinue
      | TT::KeywordDebugger
      | TT::KeywordDefault
      | TT::KeywordDelete
      | TT::KeywordDo
      | TT::KeywordElse
      | TT::KeywordEnum
      | TT::KeywordExport
      | TT::KeywordExtends
      | TT::KeywordFinally
      | TT::KeywordFor
      | TT::KeywordFunction
      | TT::KeywordIf
      | TT::KeywordImport
      | TT::KeywordIn
      | TT::KeywordInstanceof
      | TT::KeywordLet
      | TT::KeywordNew
      | TT::KeywordReturn
      | TT::KeywordSuper
      | TT::KeywordSwitch
      | TT::KeywordThis
      | TT::KeywordThrow
      | TT::KeywordTry
      | TT::KeywordTypeof
      | TT::KeywordVar
      | TT::KeywordVoid
      | TT::KeywordWhile
      | TT::KeywordWith
      | TT::KeywordYield
      | TT::LiteralTrue
      | TT::LiteralFalse
      | TT::LiteralNull
  )
}

fn assign_op(typ: TT) -> Option<AssignOp> {
  Some(match typ {
    TT::Equals => AssignOp::Assign,
    TT::PlusEquals => AssignOp::Add,
    TT::HyphenEquals => AssignOp::Sub,
    TT::AsteriskEquals => AssignOp::Mul,
    TT::SlashEquals => AssignOp::Div,
    TT::PercentEquals => AssignOp::Rem,
    TT::AsteriskAsteriskEquals => AssignOp::Exp,
    TT::ChevronLeftChevronLeftEquals => AssignOp::Shl,
    TT::ChevronRightChevronRightEquals => AssignOp::Shr,
    TT::ChevronRightChevronRightChevronRightEquals => AssignOp::Ushr,
    TT::AmpersandEquals => AssignOp::BitAnd,
    TT::BarEquals => AssignOp::BitOr,
    TT::CaretEquals => AssignOp::BitXor,
    TT::AmpersandAmpersandEquals => AssignOp::And,
    TT::BarBarEquals => AssignOp::Or,
    TT::QuestionQuestionEquals => AssignOp::Nullish,
    _ => return None,
  })
}

// Binding powers; `**` is the only right-associative binary operator.
fn binary_op(typ: TT, no_in: bool) -> Option<(BinaryOp, u8, bool)> {
  Some(match typ {
    TT::QuestionQuestion => (BinaryOp::Nullish, 1, false),
    TT::BarBar => (BinaryOp::Or, 1, false),
    TT::AmpersandAmpersand => (BinaryOp::And, 2, false),
    TT::Bar => (BinaryOp::BitOr, 3, false),
    TT::Caret => (BinaryOp::BitXor, 4, false),
    TT::Ampersand => (BinaryOp::BitAnd, 5, false),
    TT::EqualsEquals => (BinaryOp::Eq, 6, false),
    TT::ExclamationEquals => (BinaryOp::Neq, 6, false),
    TT::EqualsEqualsEquals => (BinaryOp::StrictEq, 6, false),
    TT::ExclamationEqualsEquals => (BinaryOp::StrictNeq, 6, false),
    TT::ChevronLeft => (BinaryOp::Lt, 7, false),
    TT::ChevronRight => (BinaryOp::Gt, 7, false),
    TT::ChevronLeftEquals => (BinaryOp::Le, 7, false),
    TT::ChevronRightEquals => (BinaryOp::Ge, 7, false),
    TT::KeywordIn if !no_in => (BinaryOp::In, 7, false),
    TT::KeywordIn => return None,
    TT::KeywordInstanceof => (BinaryOp::Instanceof, 7, false),
    TT::ChevronLeftChevronLeft => (BinaryOp::Shl, 8, false),
    TT::ChevronRightChevronRight => (BinaryOp::Shr, 8, false),
    TT::ChevronRightChevronRightChevronRight => (BinaryOp::Ushr, 8, false),
    TT::Plus => (BinaryOp::Add, 9, false),
    TT::Hyphen => (BinaryOp::Sub, 9, false),
    TT::Asterisk => (BinaryOp::Mul, 10, false),
    TT::Slash => (BinaryOp::Div, 10, false),
    TT::Percent => (BinaryOp::Rem, 10, false),
    TT::AsteriskAsterisk => (BinaryOp::Exp, 11, true),
    _ => return None,
  })
}

impl<'a> Parser<'a> {
  /// Parses a full expression, comma sequences included. `no_in` suppresses
  /// the `in` operator, as required inside `for` initialisers.
  pub fn parse_expr(&mut self, no_in: bool) -> SyntaxResult<Expr> {
    let first = self.parse_assign_expr(no_in)?;
    if self.peek().typ != TT::Comma {
      return Ok(first);
    }
    let mut loc = first.loc();
    let mut exprs = vec![first];
    while self.consume_if(TT::Comma).is_match() {
      let next = self.parse_assign_expr(no_in)?;
      loc.extend(next.loc());
      exprs.push(next);
    }
    Ok(Expr::Seq(SeqExpr { loc, exprs }))
  }

  pub fn parse_assign_expr(&mut self, no_in: bool) -> SyntaxResult<Expr> {
    if self.peek().typ == TT::KeywordYield {
      return self.parse_yield_expr(no_in);
    }
    if let Some(arrow) = self.try_parse_arrow(no_in)? {
      return Ok(arrow);
    }
    let left = self.parse_cond_expr(no_in)?;
    let t = self.peek();
    let Some(op) = assign_op(t.typ) else {
      return Ok(left);
    };
    self.consume();
    let value = self.parse_assign_expr(no_in)?;
    let target = if op == AssignOp::Assign {
      match &left {
        Expr::Array(_) | Expr::Object(_) => AssignTarget::Pat(Box::new(expr_to_pat(left)?)),
        _ => expr_to_simple_target(left)?,
      }
    } else {
      expr_to_simple_target(left)?
    };
    let mut loc = match &target {
      AssignTarget::Expr(e) => e.loc(),
      AssignTarget::Pat(p) => p.loc(),
    };
    loc.extend(value.loc());
    Ok(Expr::Assign(AssignExpr {
      loc,
      op,
      target,
      value: Box::new(value),
    }))
  }

  fn parse_yield_expr(&mut self, no_in: bool) -> SyntaxResult<Expr> {
    let start = self.require(TT::KeywordYield)?;
    let delegate = self.consume_if(TT::Asterisk).is_match();
    let t = self.peek();
    let has_arg = delegate
      || (!t.preceded_by_line_terminator
        && !matches!(
          t.typ,
          TT::ParenClose
            | TT::BracketClose
            | TT::BraceClose
            | TT::Comma
            | TT::Semicolon
            | TT::Colon
            | TT::EOF
        ));
    let mut loc = start.loc;
    let arg = if has_arg {
      let e = self.parse_assign_expr(no_in)?;
      loc.extend(e.loc());
      Some(Box::new(e))
    } else {
      None
    };
    Ok(Expr::Yield(YieldExpr {
      loc,
      delegate,
      arg,
    }))
  }

  /// Attempts to parse an arrow function at the current position, restoring
  /// the checkpoint on failure. Cheap lookahead gates keep the backtracking
  /// off the hot path.
  fn try_parse_arrow(&mut self, no_in: bool) -> SyntaxResult<Option<Expr>> {
    let t = self.peek();
    let candidate = match t.typ {
      TT::ParenOpen => true,
      TT::Identifier => {
        let [first, second] = self.peek_n::<2>();
        second.typ == TT::EqualsChevronRight
          || (self.str(first.loc) == "async"
            && !second.preceded_by_line_terminator
            && matches!(second.typ, TT::Identifier | TT::ParenOpen))
      }
      _ => false,
    };
    if !candidate {
      return Ok(None);
    }
    let cp = self.checkpoint();
    match self.parse_arrow(no_in) {
      Ok(arrow) => Ok(Some(arrow)),
      Err(_) => {
        self.restore_checkpoint(cp);
        Ok(None)
      }
    }
  }

  fn parse_arrow(&mut self, no_in: bool) -> SyntaxResult<Expr> {
    let start = self.peek();
    let mut is_async = false;
    if self.peek_contextual("async") {
      let [_, second] = self.peek_n::<2>();
      // `async => x` uses `async` as the parameter name, not as a modifier.
      if second.typ != TT::EqualsChevronRight
        && matches!(second.typ, TT::Identifier | TT::ParenOpen)
      {
        self.consume();
        is_async = true;
      }
    }
    let params = if self.peek().typ == TT::ParenOpen {
      self.parse_arrow_params()?
    } else {
      let t = self.require_identifier()?;
      vec![Pat::Id(Ident {
        loc: t.loc,
        name: self.string(t.loc),
      })]
    };
    let arrow_tok = self.peek();
    if arrow_tok.preceded_by_line_terminator {
      // A line terminator before `=>` makes this not an arrow function.
      return Err(arrow_tok.error(SyntaxErrorType::RequiredTokenNotFound(
        TT::EqualsChevronRight,
      )));
    }
    self.require(TT::EqualsChevronRight)?;
    let mut loc = start.loc;
    let body = if self.peek().typ == TT::BraceOpen {
      let (body, end) = self.parse_block_body()?;
      loc.extend(end);
      ArrowBody::Block(body)
    } else {
      let e = self.parse_assign_expr(no_in)?;
      loc.extend(e.loc());
      ArrowBody::Expr(Box::new(e))
    };
    Ok(Expr::Arrow(ArrowFunc {
      loc,
      is_async,
      params,
      body,
    }))
  }

  fn parse_arrow_params(&mut self) -> SyntaxResult<Vec<Pat>> {
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
    Ok(params)
  }

  fn parse_cond_expr(&mut self, no_in: bool) -> SyntaxResult<Expr> {
    let test = self.parse_binary_expr(0, no_in)?;
    if !self.consume_if(TT::Question).is_match() {
      return Ok(test);
    }
    let cons = self.parse_assign_expr(false)?;
    self.require(TT::Colon)?;
    let alt = self.parse_assign_expr(no_in)?;
    let mut loc = test.loc();
    loc.extend(alt.loc());
    Ok(Expr::Cond(CondExpr {
      loc,
      test: Box::new(test),
      cons: Box::new(cons),
      alt: Box::new(alt),
    }))
  }

  fn parse_binary_expr(&mut self, min_prec: u8, no_in: bool) -> SyntaxResult<Expr> {
    let mut left = self.parse_unary_expr()?;
    loop {
      let t = self.peek();
      let Some((op, prec, right_assoc)) = binary_op(t.typ, no_in) else {
        break;
      };
      if prec < min_prec {
        break;
      }
      self.consume();
      let next_min = if right_assoc { prec } else { prec + 1 };
      let right = self.parse_binary_expr(next_min, no_in)?;
      let mut loc = left.loc();
      loc.extend(right.loc());
      left = Expr::Binary(BinaryExpr {
        loc,
        op,
        left: Box::new(left),
        right: Box::new(right),
      });
    }
    Ok(left)
  }

  fn parse_unary_expr(&mut self) -> SyntaxResult<Expr> {
    let t = self.peek();
    let op = match t.typ {
      TT::Exclamation => Some(UnaryOp::Not),
      TT::Tilde => Some(UnaryOp::BitNot),
      TT::Plus => Some(UnaryOp::Plus),
      TT::Hyphen => Some(UnaryOp::Minus),
      TT::KeywordTypeof => Some(UnaryOp::Typeof),
      TT::KeywordVoid => Some(UnaryOp::Void),
      TT::KeywordDelete => Some(UnaryOp::Delete),
      _ => None,
    };
    if let Some(op) = op {
      self.consume();
      let arg = self.parse_unary_expr()?;
      let mut loc = t.loc;
      loc.extend(arg.loc());
      return Ok(Expr::Unary(UnaryExpr {
        loc,
        op,
        arg: Box::new(arg),
      }));
    }
    match t.typ {
      TT::KeywordAwait => {
        self.consume();
        let arg = self.parse_unary_expr()?;
        let mut loc = t.loc;
        loc.extend(arg.loc());
        Ok(Expr::Await(AwaitExpr {
          loc,
          arg: Box::new(arg),
        }))
      }
      TT::PlusPlus | TT::HyphenHyphen => {
        self.consume();
        let arg = self.parse_unary_expr()?;
        let mut loc = t.loc;
        loc.extend(arg.loc());
        Ok(Expr::Update(UpdateExpr {
          loc,
          op: if t.typ == TT::PlusPlus {
            UpdateOp::Inc
          } else {
            UpdateOp::Dec
          },
          prefix: true,
          arg: Box::new(arg),
        }))
      }
      _ => self.parse_postfix_expr(),
    }
  }

  fn parse_postfix_expr(&mut self) -> SyntaxResult<Expr> {
    let e = self.parse_lhs_expr()?;
    let t = self.peek();
    if matches!(t.typ, TT::PlusPlus | TT::HyphenHyphen) && !t.preceded_by_line_terminator {
      self.consume();
      let mut loc = e.loc();
      loc.extend(t.loc);
      return Ok(Expr::Update(UpdateExpr {
        loc,
        op: if t.typ == TT::PlusPlus {
          UpdateOp::Inc
        } else {
          UpdateOp::Dec
        },
        prefix: false,
        arg: Box::new(e),
      }));
    }
    Ok(e)
  }

  pub(crate) fn parse_lhs_expr(&mut self) -> SyntaxResult<Expr> {
    let base = if self.peek().typ == TT::KeywordNew {
      self.parse_new_expr()?
    } else {
      self.parse_primary_expr()?
    };
    self.parse_member_chain(base, true)
  }

  fn parse_new_expr(&mut self) -> SyntaxResult<Expr> {
    let start = self.require(TT::KeywordNew)?;
    if self.consume_if(TT::Dot).is_match() {
      let target = self.require_contextual("target")?;
      let mut loc = start.loc;
      loc.extend(target.loc);
      return Ok(Expr::NewTarget(NewTargetExpr { loc }));
    }
    let callee = if self.peek().typ == TT::KeywordNew {
      self.parse_new_expr()?
    } else {
      let primary = self.parse_primary_expr()?;
      self.parse_member_chain(primary, false)?
    };
    let mut loc = start.loc;
    loc.extend(callee.loc());
    let args = if self.peek().typ == TT::ParenOpen {
      let (args, end) = self.parse_args()?;
      loc.extend(end);
      Some(args)
    } else {
      None
    };
    Ok(Expr::New(NewExpr {
      loc,
      callee: Box::new(callee),
      args,
    }))
  }

  fn parse_member_chain(&mut self, mut e: Expr, allow_call: bool) -> SyntaxResult<Expr> {
    loop {
      let t = self.peek();
      match t.typ {
        TT::Dot => {
          self.consume();
          let name = self.parse_member_name()?;
          let mut loc = e.loc();
          loc.extend(name.loc);
          e = Expr::Member(MemberExpr {
            loc,
            object: Box::new(e),
            prop: MemberProp::Static(name),
            optional: false,
          });
        }
        TT::QuestionDot => {
          self.consume();
          let next = self.peek();
          match next.typ {
            TT::ParenOpen => {
              let (args, end) = self.parse_args()?;
              let mut loc = e.loc();
              loc.extend(end);
              e = Expr::Call(CallExpr {
                loc,
                callee: Box::new(e),
                args,
                optional: true,
              });
            }
            TT::BracketOpen => {
              self.consume();
              let index = self.parse_expr(false)?;
              let end = self.require(TT::BracketClose)?;
              let mut loc = e.loc();
              loc.extend(end.loc);
              e = Expr::Member(MemberExpr {
                loc,
                object: Box::new(e),
                prop: MemberProp::Computed(Box::new(index)),
                optional: true,
              });
            }
            _ => {
              let name = self.parse_member_name()?;
              let mut loc = e.loc();
              loc.extend(name.loc);
              e = Expr::Member(MemberExpr {
                loc,
                object: Box::new(e),
                prop: MemberProp::Static(name),
                optional: true,
              });
            }
          }
        }
        TT::BracketOpen => {
          self.consume();
          let index = self.parse_expr(false)?;
          let end = self.require(TT::BracketClose)?;
          let mut loc = e.loc();
          loc.extend(end.loc);
          e = Expr::Member(MemberExpr {
            loc,
            object: Box::new(e),
            prop: MemberProp::Computed(Box::new(index)),
            optional: false,
          });
        }
        TT::ParenOpen if allow_call => {
          let (args, end) = self.parse_args()?;
          let mut loc = e.loc();
          loc.extend(end);
          e = Expr::Call(CallExpr {
            loc,
            callee: Box::new(e),
            args,
            optional: false,
          });
        }
        TT::LiteralTemplateComplete | TT::LiteralTemplateHead => {
          let template = self.parse_template_literal()?;
          let mut loc = e.loc();
          loc.extend(template.loc);
          e = Expr::TaggedTemplate(TaggedTemplateExpr {
            loc,
            tag: Box::new(e),
            template,
          });
        }
        _ => break,
      }
    }
    Ok(e)
  }

  fn parse_member_name(&mut self) -> SyntaxResult<Ident> {
    let t = self.consume();
    if !is_name_token(t.typ) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("member name")));
    }
    Ok(Ident {
      loc: t.loc,
      name: self.string(t.loc),
    })
  }

  fn parse_args(&mut self) -> SyntaxResult<(Vec<Arg>, Loc)> {
    self.require(TT::ParenOpen)?;
    let mut args = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::ParenClose).match_loc() {
        break loc;
      }
      let spread = self.consume_if(TT::DotDotDot).is_match();
      let expr = self.parse_assign_expr(false)?;
      args.push(Arg { spread, expr });
      if !self.consume_if(TT::Comma).is_match() {
        break self.require(TT::ParenClose)?.loc;
      }
    };
    Ok((args, end))
  }

  fn parse_template_literal(&mut self) -> SyntaxResult<TemplateExpr> {
    let head = self.consume();
    let mut loc = head.loc;
    let mut substitutions = Vec::new();
    if head.typ == TT::LiteralTemplateComplete {
      return Ok(TemplateExpr { loc, substitutions });
    }
    debug_assert_eq!(head.typ, TT::LiteralTemplateHead);
    loop {
      substitutions.push(self.parse_expr(false)?);
      let cont = self.consume_with_mode(LexMode::TemplateContinue);
      loc.extend(cont.loc);
      match cont.typ {
        TT::LiteralTemplateMiddle => {}
        TT::LiteralTemplateTail => break,
        _ => return Err(cont.error(SyntaxErrorType::ExpectedSyntax("template continuation"))),
      }
    }
    Ok(TemplateExpr { loc, substitutions })
  }

  fn parse_primary_expr(&mut self) -> SyntaxResult<Expr> {
    let t = self.peek();
    match t.typ {
      TT::ParenOpen => {
        self.consume();
        let mut e = self.parse_expr(false)?;
        let end = self.require(TT::ParenClose)?;
        let mut loc = t.loc;
        loc.extend(end.loc);
        e.set_loc(loc);
        Ok(e)
      }
      TT::Identifier => {
        // `async function` expressions; plain `async` falls through to an
        // identifier reference.
        if self.str(t.loc) == "async" {
          let [_, second] = self.peek_n::<2>();
          if second.typ == TT::KeywordFunction && !second.preceded_by_line_terminator {
            self.consume();
            return self.parse_func_expr(t.loc, true);
          }
        }
        self.consume();
        Ok(Expr::Id(Ident {
          loc: t.loc,
          name: self.string(t.loc),
        }))
      }
      TT::KeywordThis => {
        self.consume();
        Ok(Expr::This(ThisExpr { loc: t.loc }))
      }
      TT::KeywordSuper => {
        self.consume();
        Ok(Expr::Super(SuperExpr { loc: t.loc }))
      }
      TT::LiteralTrue | TT::LiteralFalse => {
        self.consume();
        Ok(Expr::Lit(LitExpr {
          loc: t.loc,
          kind: LitKind::Bool,
        }))
      }
      TT::LiteralNull => {
        self.consume();
        Ok(Expr::Lit(LitExpr {
          loc: t.loc,
          kind: LitKind::Null,
        }))
      }
      TT::LiteralNumber => {
        self.consume();
        Ok(Expr::Lit(LitExpr {
          loc: t.loc,
          kind: LitKind::Num,
        }))
      }
      TT::LiteralBigInt => {
        self.consume();
        Ok(Expr::Lit(LitExpr {
          loc: t.loc,
          kind: LitKind::BigInt,
        }))
      }
      TT::LiteralString => {
        self.consume();
        Ok(Expr::Lit(LitExpr {
          loc: t.loc,
          kind: LitKind::Str,
        }))
      }
      TT::Slash | TT::SlashEquals => {
        let regex = self.peek_with_mode(LexMode::SlashIsRegex);
        if regex.typ != TT::LiteralRegex {
          return Err(regex.error(SyntaxErrorType::UnexpectedToken));
        }
        self.consume_with_mode(LexMode::SlashIsRegex);
        Ok(Expr::Lit(LitExpr {
          loc: regex.loc,
          kind: LitKind::Regex,
        }))
      }
      TT::LiteralTemplateComplete | TT::LiteralTemplateHead => {
        let template = self.parse_template_literal()?;
        Ok(Expr::Template(template))
      }
      TT::BracketOpen => self.parse_array_literal(),
      TT::BraceOpen => self.parse_object_literal(),
      TT::KeywordFunction => {
        self.consume();
        self.parse_func_expr(t.loc, false)
      }
      TT::KeywordClass => {
        self.consume();
        let name = if self.peek().typ == TT::Identifier {
          let n = self.consume();
          Some(Ident {
            loc: n.loc,
            name: self.string(n.loc),
          })
        } else {
          None
        };
        let class = self.parse_class_payload()?;
        let mut loc = t.loc;
        loc.extend(class.loc);
        Ok(Expr::Class(ClassExpr { loc, name, class }))
      }
      TT::KeywordImport => {
        self.consume();
        if self.consume_if(TT::Dot).is_match() {
          let meta = self.require_contextual("meta")?;
          let mut loc = t.loc;
          loc.extend(meta.loc);
          return Ok(Expr::ImportMeta(ImportMetaExpr { loc }));
        }
        self.require(TT::ParenOpen)?;
        let arg = self.parse_assign_expr(false)?;
        let end = self.require(TT::ParenClose)?;
        let mut loc = t.loc;
        loc.extend(end.loc);
        Ok(Expr::ImportCall(ImportCallExpr {
          loc,
          arg: Box::new(arg),
        }))
      }
      TT::EOF => Err(t.error(SyntaxErrorType::UnexpectedEnd)),
      _ => Err(t.error(SyntaxErrorType::UnexpectedToken)),
    }
  }

  fn parse_func_expr(&mut self, start: Loc, is_async: bool) -> SyntaxResult<Expr> {
    let is_generator = self.consume_if(TT::Asterisk).is_match();
    let name = if self.peek().typ == TT::Identifier {
      let n = self.consume();
      Some(Ident {
        loc: n.loc,
        name: self.string(n.loc),
      })
    } else {
      None
    };
    let func = self.parse_func_payload(start, is_async, is_generator)?;
    let mut loc = start;
    loc.extend(func.loc);
    Ok(Expr::Func(FuncExpr { loc, name, func }))
  }

  fn parse_array_literal(&mut self) -> SyntaxResult<Expr> {
    let start = self.require(TT::BracketOpen)?;
    let mut elements = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BracketClose).match_loc() {
        break loc;
      }
      if self.consume_if(TT::Comma).is_match() {
        elements.push(None);
        continue;
      }
      let spread = self.consume_if(TT::DotDotDot).is_match();
      let expr = self.parse_assign_expr(false)?;
      elements.push(Some(Arg { spread, expr }));
      if !self.consume_if(TT::Comma).is_match() {
        break self.require(TT::BracketClose)?.loc;
      }
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Expr::Array(ArrayExpr { loc, elements }))
  }

  fn parse_object_literal(&mut self) -> SyntaxResult<Expr> {
    let start = self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BraceClose).match_loc() {
        break loc;
      }
      members.push(self.parse_object_member()?);
      if !self.consume_if(TT::Comma).is_match() {
        break self.require(TT::BraceClose)?.loc;
      }
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Expr::Object(ObjectExpr { loc, members }))
  }

  fn parse_object_member(&mut self) -> SyntaxResult<ObjectMember> {
    let t = self.peek();
    if let Some(dots) = self.consume_if(TT::DotDotDot).match_loc() {
      let expr = self.parse_assign_expr(false)?;
      let mut loc = dots;
      loc.extend(expr.loc());
      return Ok(ObjectMember::Spread { loc, expr });
    }
    // Modifier words are only modifiers when a key follows.
    let [_, second] = self.peek_n::<2>();
    let modifier_applies = !matches!(
      second.typ,
      TT::Colon | TT::Comma | TT::ParenOpen | TT::BraceClose | TT::Equals
    );
    if t.typ == TT::Identifier && modifier_applies {
      let word = self.string(t.loc);
      if word == "get" || word == "set" {
        self.consume();
        let key = self.parse_prop_key()?;
        let func = self.parse_func_payload(t.loc, false, false)?;
        let mut loc = t.loc;
        loc.extend(func.loc);
        return Ok(ObjectMember::Method {
          loc,
          kind: if word == "get" {
            MethodKind::Get
          } else {
            MethodKind::Set
          },
          key,
          func,
        });
      }
      if word == "async" {
        self.consume();
        let is_generator = self.consume_if(TT::Asterisk).is_match();
        let key = self.parse_prop_key()?;
        let func = self.parse_func_payload(t.loc, true, is_generator)?;
        let mut loc = t.loc;
        loc.extend(func.loc);
        return Ok(ObjectMember::Method {
          loc,
          kind: MethodKind::Method,
          key,
          func,
        });
      }
    }
    if t.typ == TT::Asterisk {
      self.consume();
      let key = self.parse_prop_key()?;
      let func = self.parse_func_payload(t.loc, false, true)?;
      let mut loc = t.loc;
      loc.extend(func.loc);
      return Ok(ObjectMember::Method {
        loc,
        kind: MethodKind::Method,
        key,
        func,
      });
    }
    let key = self.parse_prop_key()?;
    let next = self.peek();
    match next.typ {
      TT::ParenOpen => {
        let func = self.parse_func_payload(t.loc, false, false)?;
        let mut loc = t.loc;
        loc.extend(func.loc);
        Ok(ObjectMember::Method {
          loc,
          kind: MethodKind::Method,
          key,
          func,
        })
      }
      TT::Colon => {
        self.consume();
        let value = self.parse_assign_expr(false)?;
        let mut loc = t.loc;
        loc.extend(value.loc());
        Ok(ObjectMember::Prop { loc, key, value })
      }
      TT::Equals => {
        // Cover grammar: only meaningful when this literal is reinterpreted
        // as a destructuring pattern.
        let PropKey::Ident(name) = key else {
          return Err(next.error(SyntaxErrorType::InvalidAssignmentTarget));
        };
        self.consume();
        let default = self.parse_assign_expr(false)?;
        let mut loc = name.loc;
        loc.extend(default.loc());
        Ok(ObjectMember::Shorthand {
          loc,
          name,
          default: Some(default),
        })
      }
      _ => {
        let PropKey::Ident(name) = key else {
          return Err(next.error(SyntaxErrorType::ExpectedSyntax("property value")));
        };
        Ok(ObjectMember::Shorthand {
          loc: name.loc,
          name,
          default: None,
        })
      }
    }
  }

  pub fn parse_prop_key(&mut self) -> SyntaxResult<PropKey> {
    let t = self.peek();
    match t.typ {
      TT::BracketOpen => {
        self.consume();
        let e = self.parse_assign_expr(false)?;
        self.require(TT::BracketClose)?;
        Ok(PropKey::Computed(Box::new(e)))
      }
      TT::LiteralString => {
        self.consume();
        Ok(PropKey::Str(StrLit {
          loc: t.loc,
          value: decode_string_literal(self.str(t.loc)),
        }))
      }
      TT::LiteralNumber | TT::LiteralBigInt => {
        self.consume();
        Ok(PropKey::Num { loc: t.loc })
      }
      typ if is_name_token(typ) => {
        self.consume();
        Ok(PropKey::Ident(Ident {
          loc: t.loc,
          name: self.string(t.loc),
        }))
      }
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("property name"))),
    }
  }
}

fn expr_to_simple_target(e: Expr) -> SyntaxResult<AssignTarget> {
  match &e {
    Expr::Id(_) | Expr::Member(_) => Ok(AssignTarget::Expr(Box::new(e))),
    _ => Err(
      e.loc()
        .error(SyntaxErrorType::InvalidAssignmentTarget, None),
    ),
  }
}

/// Reinterprets an expression parsed under the cover grammar as a
/// destructuring pattern (`[a, b] = …`, `({ a = 1 } = …)`).
pub fn expr_to_pat(e: Expr) -> SyntaxResult<Pat> {
  match e {
    Expr::Id(id) => Ok(Pat::Id(id)),
    Expr::Member(_) => Ok(Pat::Expr(Box::new(e))),
    Expr::Assign(assign) if assign.op == AssignOp::Assign => {
      let target = match assign.target {
        AssignTarget::Expr(e) => expr_to_pat(*e)?,
        AssignTarget::Pat(p) => *p,
      };
      Ok(Pat::Assign(AssignPat {
        loc: assign.loc,
        target: Box::new(target),
        default: assign.value,
      }))
    }
    Expr::Array(array) => {
      let mut elements = Vec::new();
      for element in array.elements {
        elements.push(match element {
          None => None,
          Some(Arg { spread: true, expr }) => {
            let loc = expr.loc();
            Some(Pat::Rest(RestPat {
              loc,
              target: Box::new(expr_to_pat(expr)?),
            }))
          }
          Some(Arg {
            spread: false,
            expr,
          }) => Some(expr_to_pat(expr)?),
        });
      }
      Ok(Pat::Array(ArrayPat {
        loc: array.loc,
        elements,
      }))
    }
    Expr::Object(object) => {
      let mut props = Vec::new();
      let mut rest = None;
      for member in object.members {
        match member {
          ObjectMember::Shorthand { loc, name, default } => {
            let value = match default {
              None => Pat::Id(name.clone()),
              Some(default) => Pat::Assign(AssignPat {
                loc,
                target: Box::new(Pat::Id(name.clone())),
                default: Box::new(default),
              }),
            };
            props.push(ObjectPatProp {
              loc,
              key: PropKey::Ident(name),
              value,
              shorthand: true,
            });
          }
          ObjectMember::Prop { loc, key, value } => {
            props.push(ObjectPatProp {
              loc,
              key,
              value: expr_to_pat(value)?,
              shorthand: false,
            });
          }
          ObjectMember::Spread { expr, .. } => {
            rest = Some(Box::new(expr_to_pat(expr)?));
          }
          ObjectMember::Method { loc, .. } => {
            return Err(loc.error(SyntaxErrorType::InvalidAssignmentTarget, None));
          }
        }
      }
      Ok(Pat::Object(ObjectPat {
        loc: object.loc,
        props,
        rest,
      }))
    }
    other => Err(
      other
        .loc()
        .error(SyntaxErrorType::InvalidAssignmentTarget, None),
    ),
  }
}
