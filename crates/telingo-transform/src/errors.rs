#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use telingo_ast::ast::Span;
use telingo_ast::errors::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("future atoms not supported in this context: {atom}")]
    FutureNotAllowed { atom: String, span: Span },
    #[error("past atoms not supported in this context: {atom}")]
    PastNotAllowed { atom: String, span: Span },
    #[error("unexpected {kind} '{node}' where a function term was expected")]
    UnexpectedNode {
        kind: &'static str,
        node: String,
        span: Span,
    },
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl TransformError {
    pub fn span(&self) -> Option<Span> {
        match self {
            TransformError::FutureNotAllowed { span, .. }
            | TransformError::PastNotAllowed { span, .. }
            | TransformError::UnexpectedNode { span, .. } => Some(*span),
            TransformError::Unsupported(_) => None,
        }
    }
}

/// A transform error enriched with source text for pretty-printed diagnostics.
#[derive(Debug, Error, Diagnostic)]
#[error("{inner}")]
#[allow(unused_assignments)]
pub struct SpannedTransformError {
    #[source_code]
    pub src: NamedSource<String>,
    pub inner: TransformError,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl SpannedTransformError {
    pub fn new(err: TransformError, source: &str, filename: &str) -> Self {
        let span = err
            .span()
            .map(|s| SourceSpan::new(s.start.into(), s.end.saturating_sub(s.start)));
        Self {
            src: NamedSource::new(filename, source.to_string()),
            inner: err,
            span,
        }
    }
}

/// Failure of the source-level driver: either a file does not parse or its
/// statements cannot be rewritten.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceTransformError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transform(#[from] SpannedTransformError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_future_not_allowed() {
        let err = TransformError::FutureNotAllowed {
            atom: "q'".into(),
            span: Span::new(5, 7),
        };
        assert_eq!(
            err.to_string(),
            "future atoms not supported in this context: q'"
        );
        assert_eq!(err.span(), Some(Span::new(5, 7)));
    }

    #[test]
    fn unsupported_has_no_span() {
        let err = TransformError::Unsupported("regrounding".into());
        assert_eq!(err.to_string(), "Unsupported: regrounding");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn spanned_error_carries_label_and_source() {
        let err = TransformError::PastNotAllowed {
            atom: "'p".into(),
            span: Span::new(0, 2),
        };
        let spanned = SpannedTransformError::new(err, "'p :- q.", "test.lp");
        assert_eq!(
            spanned.to_string(),
            "past atoms not supported in this context: 'p"
        );
        let span = spanned.span.expect("span should be attached");
        assert_eq!(span.offset(), 0);
        assert_eq!(span.len(), 2);
        assert_eq!(spanned.src.name(), "test.lp");
    }
}
