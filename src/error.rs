use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::token::{Span, Token};

#[derive(Debug, Error)]
pub enum FourierError {
    /// The expression text could not be compiled. Carries the parser diagnostic.
    #[error("Invalid expression: {0}")]
    InvalidExpression(#[from] ExpressionError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Invalid sampling interval [{x_start}, {x_end}]: ends must be finite and distinct")]
    InvalidInterval { x_start: f64, x_end: f64 },
}

#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("Unexpected char '{ch}' at pos {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Invalid number '{text}' at pos {pos}")]
    InvalidNumber { text: String, pos: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found '{found}' at pos {span}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        span: Span,
    },
    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEOF { expected: String, span: Span },
    #[error("Undefined symbol '{name}' at pos {span}")]
    UnknownIdentifier { name: String, span: Span },
    #[error("Undefined function '{name}' at pos {span}")]
    UnknownFunction { name: String, span: Span },
    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        function: String,
        expected: String,
        found: usize,
        span: Span,
    },
    #[error("Expression is nested too deeply at pos {span}")]
    TooDeep { span: Span },
}

impl LexError {
    pub fn span(&self) -> Range<usize> {
        match self {
            LexError::UnexpectedChar { ch, pos } => *pos..*pos + ch.len_utf8(),
            LexError::InvalidNumber { text, pos } => *pos..*pos + text.len(),
        }
    }
}

impl ParseError {
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEOF { span, .. }
            | ParseError::UnknownIdentifier { span, .. }
            | ParseError::UnknownFunction { span, .. }
            | ParseError::ArityMismatch { span, .. }
            | ParseError::TooDeep { span } => span.range(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } => "unexpected token",
            ParseError::UnexpectedEOF { .. } => "expression ends here",
            ParseError::UnknownIdentifier { .. } => "only `t` and `pi` are defined",
            ParseError::UnknownFunction { .. } => {
                "supported: sin, cos, sqrt, abs, exp, log, pow"
            }
            ParseError::ArityMismatch { .. } => "wrong number of arguments",
            ParseError::TooDeep { .. } => "nesting limit reached here",
        }
    }
}

impl ExpressionError {
    /// Byte range of the offending source text.
    pub fn span(&self) -> Range<usize> {
        match self {
            ExpressionError::Lex(e) => e.span(),
            ExpressionError::Parse(e) => e.span(),
        }
    }

    /// Render a caret-annotated, colourless diagnostic against `source`.
    pub fn report(&self, source: &str) -> String {
        let span = self.span();
        let label = match self {
            ExpressionError::Lex(_) => "unexpected input",
            ExpressionError::Parse(e) => e.label(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, span.clone())
            .with_config(Config::default().with_color(false))
            .with_message(self.to_string())
            .with_label(Label::new(span).with_message(label))
            .finish()
            .write(Source::from(source), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl FourierError {
    /// Human-readable diagnostic. Expression errors point into `source`.
    pub fn report(&self, source: &str) -> String {
        match self {
            FourierError::InvalidExpression(e) => e.report(source),
            FourierError::Config(_) | FourierError::InvalidInterval { .. } => self.to_string(),
        }
    }
}

impl From<LexError> for FourierError {
    fn from(e: LexError) -> Self {
        FourierError::InvalidExpression(e.into())
    }
}

impl From<ParseError> for FourierError {
    fn from(e: ParseError) -> Self {
        FourierError::InvalidExpression(e.into())
    }
}
