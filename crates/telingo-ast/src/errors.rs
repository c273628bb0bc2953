#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    #[diagnostic(code(telingo::parse::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Invalid integer literal '{literal}'")]
    #[diagnostic(
        code(telingo::parse::integer),
        help("integer literals must fit into a signed 64-bit value")
    )]
    InvalidInteger {
        literal: String,
        #[label("out of range")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, span: Span, source: &str, filename: &str) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span: (span.start, span.end.saturating_sub(span.start)).into(),
            src: miette::NamedSource::new(filename, source.to_owned()),
        }
    }

    pub fn invalid_integer(
        literal: impl Into<String>,
        span: Span,
        source: &str,
        filename: &str,
    ) -> Self {
        ParseError::InvalidInteger {
            literal: literal.into(),
            span: (span.start, span.end.saturating_sub(span.start)).into(),
            src: miette::NamedSource::new(filename, source.to_owned()),
        }
    }

    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Syntax { span, .. } | ParseError::InvalidInteger { span, .. } => {
                span.offset()
            }
        }
    }
}
