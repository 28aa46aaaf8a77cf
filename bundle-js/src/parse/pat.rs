use super::Parser;
use crate::ast::ArrayPat;
use crate::ast::AssignPat;
use crate::ast::Ident;
use crate::ast::ObjectPat;
use crate::ast::ObjectPatProp;
use crate::ast::Pat;
use crate::ast::PropKey;
use crate::ast::RestPat;
use crate::err::SyntaxErrorType;
use crate::err::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_pat(&mut self) -> SyntaxResult<Pat> {
    let t = self.peek();
    match t.typ {
      TT::Identifier => {
        self.consume();
        Ok(Pat::Id(Ident {
          loc: t.loc,
          name: self.string(t.loc),
        }))
      }
      TT::BracketOpen => self.parse_array_pat(),
      TT::BraceOpen => self.parse_object_pat(),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("binding pattern"))),
    }
  }

  /// Parses a pattern with an optional `= default` initialiser, as found in
  /// parameter lists and destructuring positions.
  pub fn parse_pat_with_default(&mut self) -> SyntaxResult<Pat> {
    let pat = self.parse_pat()?;
    if self.consume_if(TT::Equals).is_match() {
      let default = self.parse_assign_expr(false)?;
      let mut loc = pat.loc();
      loc.extend(default.loc());
      return Ok(Pat::Assign(AssignPat {
        loc,
        target: Box::new(pat),
        default: Box::new(default),
      }));
    }
    Ok(pat)
  }

  fn parse_array_pat(&mut self) -> SyntaxResult<Pat> {
    let start = self.require(TT::BracketOpen)?;
    let mut elements = Vec::new();
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BracketClose).match_loc() {
        break loc;
      }
      if self.consume_if(TT::Comma).is_match() {
        // Elision, or the comma after an element parsed below.
        continue;
      }
      if let Some(dots) = self.consume_if(TT::DotDotDot).match_loc() {
        let target = self.parse_pat()?;
        let mut loc = dots;
        loc.extend(target.loc());
        elements.push(Some(Pat::Rest(RestPat {
          loc,
          target: Box::new(target),
        })));
      } else {
        elements.push(Some(self.parse_pat_with_default()?));
      }
      if !self.consume_if(TT::Comma).is_match() {
        break self.require(TT::BracketClose)?.loc;
      }
    };
    // Elisions are dropped rather than kept as holes; they bind nothing.
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Pat::Array(ArrayPat { loc, elements }))
  }

  fn parse_object_pat(&mut self) -> SyntaxResult<Pat> {
    let start = self.require(TT::BraceOpen)?;
    let mut props = Vec::new();
    let mut rest = None;
    let end = loop {
      if let Some(loc) = self.consume_if(TT::BraceClose).match_loc() {
        break loc;
      }
      if self.consume_if(TT::DotDotDot).is_match() {
        rest = Some(Box::new(self.parse_pat()?));
      } else {
        props.push(self.parse_object_pat_prop()?);
      }
      if !self.consume_if(TT::Comma).is_match() {
        break self.require(TT::BraceClose)?.loc;
      }
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(Pat::Object(ObjectPat { loc, props, rest }))
  }

  fn parse_object_pat_prop(&mut self) -> SyntaxResult<ObjectPatProp> {
    let t = self.peek();
    // Shorthand: `{ a }` or `{ a = default }`.
    if t.typ == TT::Identifier {
      let [_, after] = self.peek_n::<2>();
      if after.typ != TT::Colon {
        self.consume();
        let name = Ident {
          loc: t.loc,
          name: self.string(t.loc),
        };
        let mut value = Pat::Id(name.clone());
        let mut loc = t.loc;
        if self.consume_if(TT::Equals).is_match() {
          let default = self.parse_assign_expr(false)?;
          loc.extend(default.loc());
          value = Pat::Assign(AssignPat {
            loc,
            target: Box::new(value),
            default: Box::new(default),
          });
        }
        return Ok(ObjectPatProp {
          loc,
          key: PropKey::Ident(name),
          value,
          shorthand: true,
        });
      }
    }
    let key = self.parse_prop_key()?;
    self.require(TT::Colon)?;
    let value = self.parse_pat_with_default()?;
    let mut loc = prop_key_loc(&key);
    loc.extend(value.loc());
    Ok(ObjectPatProp {
      loc,
      key,
      value,
      shorthand: false,
    })
  }
}

pub fn prop_key_loc(key: &PropKey) -> Loc {
  match key {
    PropKey::Ident(i) => i.loc,
    PropKey::Str(s) => s.loc,
    PropKey::Num { loc } => *loc,
    PropKey::Computed(e) => e.loc(),
  }
}
