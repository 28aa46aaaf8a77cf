use crate::loc::Loc;
use crate::token::TT;
use std::error::Error;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

/// A stable classification of syntax errors produced by the parser.
///
/// Diagnostic codes (prefix `PS`) are assigned per variant and are stable.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedSyntax(&'static str),
  InvalidAssignmentTarget,
  LineTerminatorAfterThrow,
  LineTerminatorInString,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
  UnexpectedToken,
}

impl SyntaxErrorType {
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedSyntax(_) => "PS0001",
      SyntaxErrorType::InvalidAssignmentTarget => "PS0002",
      SyntaxErrorType::LineTerminatorAfterThrow => "PS0003",
      SyntaxErrorType::LineTerminatorInString => "PS0004",
      SyntaxErrorType::MalformedLiteralNumber => "PS0005",
      SyntaxErrorType::RequiredTokenNotFound(_) => "PS0006",
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => "PS0007",
      SyntaxErrorType::UnexpectedEnd => "PS0008",
      SyntaxErrorType::UnexpectedToken => "PS0009",
    }
  }

  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidAssignmentTarget => "invalid assignment target".into(),
      SyntaxErrorType::LineTerminatorAfterThrow => {
        "line terminator not allowed after `throw`".into()
      }
      SyntaxErrorType::LineTerminatorInString => {
        "line terminator not allowed in string literal".into()
      }
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => {
        "try statement requires a catch or finally block".into()
      }
      SyntaxErrorType::UnexpectedEnd => "unexpected end of input".into(),
      SyntaxErrorType::UnexpectedToken => actual_token
        .map(|tok| format!("unexpected token {:?}", tok))
        .unwrap_or_else(|| "unexpected token".into()),
    }
  }
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.typ.message(self.actual_token))
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors surfaced by graph construction, marking, and rendering.
///
/// All variants carry the file they arose in (where known) and a source
/// location when one is available. Codes (prefix `BUNDLE`) are stable:
/// - `BUNDLE0001`: [`BundleErrorType::Parse`]
/// - `BUNDLE0002`: [`BundleErrorType::DuplicateImport`]
/// - `BUNDLE0003`: [`BundleErrorType::NoSuchExport`]
/// - `BUNDLE0004`: [`BundleErrorType::ModuleNotFound`]
/// - `BUNDLE0005`: [`BundleErrorType::NotSupported`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BundleErrorType {
  Parse(SyntaxErrorType),
  DuplicateImport { local_name: String },
  NoSuchExport {
    name: String,
    module: String,
    importer: String,
  },
  ModuleNotFound {
    source: String,
    importer: Option<String>,
  },
  NotSupported(&'static str),
}

impl BundleErrorType {
  pub fn code(&self) -> &'static str {
    match self {
      BundleErrorType::Parse(_) => "BUNDLE0001",
      BundleErrorType::DuplicateImport { .. } => "BUNDLE0002",
      BundleErrorType::NoSuchExport { .. } => "BUNDLE0003",
      BundleErrorType::ModuleNotFound { .. } => "BUNDLE0004",
      BundleErrorType::NotSupported(_) => "BUNDLE0005",
    }
  }

  pub fn message(&self) -> String {
    match self {
      BundleErrorType::Parse(typ) => typ.message(None),
      BundleErrorType::DuplicateImport { local_name } => {
        format!("duplicated import `{}`", local_name)
      }
      BundleErrorType::NoSuchExport {
        name,
        module,
        importer,
      } => format!(
        "module `{}` does not export `{}` (imported by `{}`)",
        module, name, importer
      ),
      BundleErrorType::ModuleNotFound { source, importer } => match importer {
        Some(importer) => format!("could not load `{}` (imported by `{}`)", source, importer),
        None => format!("could not load entry module `{}`", source),
      },
      BundleErrorType::NotSupported(what) => format!("not supported: {}", what),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleError {
  pub typ: BundleErrorType,
  pub file: Option<String>,
  pub loc: Option<Loc>,
}

impl BundleError {
  pub fn new(typ: BundleErrorType) -> BundleError {
    BundleError {
      typ,
      file: None,
      loc: None,
    }
  }

  pub fn in_file(typ: BundleErrorType, file: impl Into<String>) -> BundleError {
    BundleError {
      typ,
      file: Some(file.into()),
      loc: None,
    }
  }

  pub fn at(typ: BundleErrorType, file: impl Into<String>, loc: Loc) -> BundleError {
    BundleError {
      typ,
      file: Some(file.into()),
      loc: Some(loc),
    }
  }

  pub fn from_syntax(err: SyntaxError, file: impl Into<String>) -> BundleError {
    BundleError {
      typ: BundleErrorType::Parse(err.typ),
      file: Some(file.into()),
      loc: Some(err.loc),
    }
  }

  pub fn code(&self) -> &'static str {
    self.typ.code()
  }
}

impl Display for BundleError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.typ.message())?;
    if let Some(file) = &self.file {
      write!(f, " in {}", file)?;
    }
    if let Some(loc) = &self.loc {
      write!(f, " at [{}:{}]", loc.0, loc.1)?;
    }
    Ok(())
  }
}

impl Error for BundleError {}

pub type BundleResult<T> = Result<T, BundleError>;
