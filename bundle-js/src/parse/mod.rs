use crate::ast::Program;
use crate::err::SyntaxError;
use crate::err::SyntaxErrorType;
use crate::err::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

mod expr;
mod import_export;
mod pat;
mod stmt;
#[cfg(test)]
mod tests;

/// Parses a complete module source.
pub fn parse(source: &str) -> SyntaxResult<Program> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer);
  parser.parse_program()
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(typ, Some(self.typ))
  }
}

pub struct ParserCheckpoint {
  next_tok_i: usize,
}

struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
}

/// Recursive-descent parser over a buffered token stream.
///
/// Tokens are buffered so the parser can checkpoint and backtrack (needed for
/// arrow-function parameter lists). Lexing is mode-sensitive; requesting a
/// token under a different mode than it was buffered with re-lexes from that
/// position.
pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<BufferedToken>,
  next_tok_i: usize,
}

impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser {
      lexer,
      buf: Vec::new(),
      next_tok_i: 0,
    }
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    self.lexer.str(loc)
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  fn reset_to(&mut self, n: usize) {
    self.next_tok_i = n;
    self.buf.truncate(n);
    match self.buf.last() {
      Some(t) => self.lexer.set_next(t.token.loc.1),
      None => self.lexer.set_next(0),
    };
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    if self
      .buf
      .get(self.next_tok_i)
      .is_some_and(|t| t.lex_mode != mode)
    {
      self.reset_to(self.next_tok_i);
    }
    debug_assert!(self.next_tok_i <= self.buf.len());
    if self.buf.len() == self.next_tok_i {
      let token = lex_next(&mut self.lexer, mode);
      self.buf.push(BufferedToken {
        token,
        lex_mode: mode,
      });
    }
    let t = self.buf[self.next_tok_i].token;
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| true).1
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_n<const N: usize>(&mut self) -> [Token; N] {
    let cp = self.checkpoint();
    let tokens: [Token; N] = std::array::from_fn(|_| self.forward(LexMode::Standard, |_| true).1);
    self.restore_checkpoint(cp);
    tokens
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    let (matched, t) = self.forward(LexMode::Standard, |t| t.typ == typ);
    MaybeToken {
      typ: t.typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }

  /// Requires and consumes an identifier token, returning its text.
  pub fn require_identifier(&mut self) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != TT::Identifier {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
    }
    Ok(t)
  }

  /// Requires the contextual keyword `word` (lexed as a plain identifier).
  pub fn require_contextual(&mut self, word: &'static str) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != TT::Identifier || self.str(t.loc) != word {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax(word)));
    }
    Ok(t)
  }

  /// Whether the next token is the contextual keyword `word`.
  pub fn peek_contextual(&mut self, word: &str) -> bool {
    let t = self.peek();
    t.typ == TT::Identifier && self.str(t.loc) == word
  }

  fn parse_program(&mut self) -> SyntaxResult<Program> {
    let mut body = Vec::new();
    while self.peek().typ != TT::EOF {
      body.push(self.parse_stmt(true)?);
    }
    Ok(Program {
      loc: self.source_range(),
      body,
      comments: self.lexer.take_comments(),
    })
  }
}

/// Decodes the value of a string literal token, delimiters included.
///
/// Handles the common escapes; unknown escapes decode to the escaped
/// character, matching how the runtime would.
pub fn decode_string_literal(raw: &str) -> String {
  let inner = &raw[1..raw.len() - 1];
  if !inner.contains('\\') {
    return inner.to_string();
  }
  let mut out = String::with_capacity(inner.len());
  let mut chars = inner.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      None => break,
      Some('n') => out.push('\n'),
      Some('t') => out.push('\t'),
      Some('r') => out.push('\r'),
      Some('b') => out.push('\x08'),
      Some('f') => out.push('\x0c'),
      Some('v') => out.push('\x0b'),
      Some('0') => out.push('\0'),
      Some('x') => {
        let hex: String = chars.by_ref().take(2).collect();
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
          Some(c) => out.push(c),
          None => out.push_str(&hex),
        }
      }
      Some('u') => {
        let mut rest = chars.clone();
        if rest.next() == Some('{') {
          let hex: String = rest.by_ref().take_while(|c| *c != '}').collect();
          if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            out.push(c);
          }
          chars = rest;
        } else {
          let hex: String = chars.by_ref().take(4).collect();
          match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            Some(c) => out.push(c),
            None => out.push_str(&hex),
          }
        }
      }
      // Line continuation: an escaped line terminator produces nothing.
      Some('\n') => {}
      Some('\r') => {
        let mut rest = chars.clone();
        if rest.next() == Some('\n') {
          chars = rest;
        }
      }
      Some(other) => out.push(other),
    }
  }
  out
}
