use ariadne::{ColorGenerator, Label, Report, ReportKind};
use thiserror::Error;

use std::ops::Range;

/// Lexer failures. `UnknownCharacter` is the logos default error and is
/// recoverable: `tokenize` drops the offending character like whitespace.
#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexicalError {
    #[error("invalid number: more than one decimal point")]
    InvalidNumber,
    #[default]
    #[error("unrecognized character")]
    UnknownCharacter,
}

/// A fatal parse failure. The span points at the offending token, or at
/// `len..len` when the input ended too early.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("syntax error at offset {}: {message}", .span.start)]
pub struct SyntaxError {
    pub message: String,
    pub span: Range<usize>,
}

impl SyntaxError {
    /// Builds an ariadne report for rendering against the source file.
    pub fn report<'a>(&self, file: String) -> Report<'a, (String, Range<usize>)> {
        Report::build(ReportKind::Error, (file.clone(), self.span.clone()))
            .with_code("SyntaxError")
            .with_label(
                Label::new((file, self.span.clone()))
                    .with_message(self.message.clone())
                    .with_color(ColorGenerator::new().next()),
            )
            .with_message("failed to parse the program")
            .finish()
    }
}

/// Evaluation failures. Every variant aborts the whole `evaluate` call;
/// there is no in-language exception handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("undefined name '{0}'")]
    Name(String),
    #[error("function '{0}' completed without returning a value")]
    MissingReturn(String),
    #[error("type error: {0}")]
    Type(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(&'static str),
}
