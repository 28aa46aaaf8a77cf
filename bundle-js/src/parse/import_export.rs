use super::decode_string_literal;
use super::Parser;
use crate::ast::*;
use crate::err::SyntaxErrorType;
use crate::err::SyntaxResult;
use crate::token::Token;
use crate::token::TT;

/// Tokens acceptable as the *imported* / *exported* name of a specifier.
/// `import { default as d }` and `export { x as default }` make keywords
/// legal in name position here.
fn specifier_name(parser: &Parser, t: Token) -> Option<Ident> {
  let text = parser.str(t.loc);
  let is_word = t.typ == TT::Identifier
    || text
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
  if is_word && !text.is_empty() && !text.starts_with(|c: char| c.is_ascii_digit()) {
    Some(Ident {
      loc: t.loc,
      name: text.to_string(),
    })
  } else {
    None
  }
}

impl<'a> Parser<'a> {
  fn require_specifier_name(&mut self) -> SyntaxResult<Ident> {
    let t = self.consume();
    specifier_name(self, t)
      .ok_or_else(|| t.error(SyntaxErrorType::ExpectedSyntax("import/export name")))
  }

  fn require_module_specifier(&mut self) -> SyntaxResult<StrLit> {
    let t = self.require(TT::LiteralString)?;
    Ok(StrLit {
      loc: t.loc,
      value: decode_string_literal(self.str(t.loc)),
    })
  }

  pub fn parse_import_stmt(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordImport)?;
    let mut default = None;
    let mut namespace = None;
    let mut named = Vec::new();

    if self.peek().typ != TT::LiteralString {
      let t = self.peek();
      match t.typ {
        TT::Identifier => {
          self.consume();
          default = Some(Ident {
            loc: t.loc,
            name: self.string(t.loc),
          });
          if self.consume_if(TT::Comma).is_match() {
            match self.peek().typ {
              TT::Asterisk => namespace = Some(self.parse_namespace_clause()?),
              TT::BraceOpen => named = self.parse_named_imports()?,
              _ => {
                return Err(
                  self
                    .peek()
                    .error(SyntaxErrorType::ExpectedSyntax("import clause")),
                )
              }
            }
          }
        }
        TT::Asterisk => namespace = Some(self.parse_namespace_clause()?),
        TT::BraceOpen => named = self.parse_named_imports()?,
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("import clause"))),
      }
      self.require_contextual("from")?;
    }

    let source = self.require_module_specifier()?;
    let mut loc = start.loc;
    loc.extend(source.loc);
    let loc = self.finish_stmt(loc)?;
    Ok(Stmt::Import(ImportDecl {
      loc,
      default,
      namespace,
      named,
      source,
    }))
  }

  fn parse_namespace_clause(&mut self) -> SyntaxResult<Ident> {
    self.require(TT::Asterisk)?;
    self.require_contextual("as")?;
    let t = self.require_identifier()?;
    Ok(Ident {
      loc: t.loc,
      name: self.string(t.loc),
    })
  }

  fn parse_named_imports(&mut self) -> SyntaxResult<Vec<ImportSpecifier>> {
    self.require(TT::BraceOpen)?;
    let mut specifiers = Vec::new();
    loop {
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      }
      let imported = self.require_specifier_name()?;
      let local = if self.peek_contextual("as") {
        self.consume();
        let t = self.require_identifier()?;
        Ident {
          loc: t.loc,
          name: self.string(t.loc),
        }
      } else {
        // Without an alias the imported name must itself be a legal binding.
        if imported.name == "default" || crate::ident::is_reserved_word(&imported.name) {
          return Err(
            imported
              .loc
              .error(SyntaxErrorType::ExpectedSyntax("as"), None),
          );
        }
        imported.clone()
      };
      let mut loc = imported.loc;
      loc.extend(local.loc);
      specifiers.push(ImportSpecifier {
        loc,
        imported,
        local,
      });
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::BraceClose)?;
        break;
      }
    }
    Ok(specifiers)
  }

  pub fn parse_export_stmt(&mut self) -> SyntaxResult<Stmt> {
    let start = self.require(TT::KeywordExport)?;
    let t = self.peek();
    match t.typ {
      TT::Asterisk => {
        self.consume();
        self.require_contextual("from")?;
        let source = self.require_module_specifier()?;
        let mut loc = start.loc;
        loc.extend(source.loc);
        let loc = self.finish_stmt(loc)?;
        Ok(Stmt::ExportAll(ExportAllDecl { loc, source }))
      }
      TT::BraceOpen => {
        let specifiers = self.parse_export_specifiers()?;
        let mut loc = start.loc;
        let source = if self.peek_contextual("from") {
          self.consume();
          let source = self.require_module_specifier()?;
          loc.extend(source.loc);
          Some(source)
        } else {
          None
        };
        if let Some(last) = specifiers.last() {
          loc.extend(last.loc);
        }
        let loc = self.finish_stmt(loc)?;
        Ok(Stmt::ExportList(ExportListDecl {
          loc,
          specifiers,
          source,
        }))
      }
      TT::KeywordDefault => {
        self.consume();
        self.parse_export_default(start.loc)
      }
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst | TT::KeywordFunction
      | TT::KeywordClass => {
        let decl = self.parse_stmt(true)?;
        let mut loc = start.loc;
        loc.extend(decl.loc());
        Ok(Stmt::ExportDecl(ExportDeclStmt {
          loc,
          decl: Box::new(decl),
        }))
      }
      TT::Identifier if self.str(t.loc) == "async" => {
        let decl = self.parse_stmt(true)?;
        let mut loc = start.loc;
        loc.extend(decl.loc());
        Ok(Stmt::ExportDecl(ExportDeclStmt {
          loc,
          decl: Box::new(decl),
        }))
      }
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("export clause"))),
    }
  }

  fn parse_export_specifiers(&mut self) -> SyntaxResult<Vec<ExportSpecifier>> {
    self.require(TT::BraceOpen)?;
    let mut specifiers = Vec::new();
    loop {
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      }
      let local = self.require_specifier_name()?;
      let exported = if self.peek_contextual("as") {
        self.consume();
        self.require_specifier_name()?
      } else {
        local.clone()
      };
      let mut loc = local.loc;
      loc.extend(exported.loc);
      specifiers.push(ExportSpecifier {
        loc,
        local,
        exported,
      });
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::BraceClose)?;
        break;
      }
    }
    Ok(specifiers)
  }

  fn parse_export_default(&mut self, start: crate::loc::Loc) -> SyntaxResult<Stmt> {
    let t = self.peek();
    let decl = match t.typ {
      TT::KeywordFunction => {
        self.consume();
        self.parse_default_func(t.loc, false)?
      }
      TT::Identifier if self.str(t.loc) == "async" => {
        let [_, second] = self.peek_n::<2>();
        if second.typ == TT::KeywordFunction && !second.preceded_by_line_terminator {
          self.consume();
          self.consume();
          self.parse_default_func(t.loc, true)?
        } else {
          let e = self.parse_assign_expr(false)?;
          DefaultDecl::Expr(Box::new(e))
        }
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
        DefaultDecl::Class { loc, name, class }
      }
      _ => {
        let e = self.parse_assign_expr(false)?;
        DefaultDecl::Expr(Box::new(e))
      }
    };
    let mut loc = start;
    let needs_semi = matches!(decl, DefaultDecl::Expr(_));
    match &decl {
      DefaultDecl::Func { loc: dloc, .. } | DefaultDecl::Class { loc: dloc, .. } => {
        loc.extend(*dloc)
      }
      DefaultDecl::Expr(e) => loc.extend(e.loc()),
    }
    let loc = if needs_semi {
      self.finish_stmt(loc)?
    } else {
      loc
    };
    Ok(Stmt::ExportDefault(ExportDefaultDecl { loc, decl }))
  }

  fn parse_default_func(
    &mut self,
    start: crate::loc::Loc,
    is_async: bool,
  ) -> SyntaxResult<DefaultDecl> {
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
    Ok(DefaultDecl::Func { loc, name, func })
  }
}
