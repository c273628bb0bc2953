//! Rewriting of temporal atoms.
//!
//! A predicate name may carry prime markers: every leading `'` refers one
//! state into the past and every trailing `'` one state into the future.
//! Rewriting strips the markers and appends the time argument, possibly
//! redirecting future heads to a placeholder predicate.

use telingo_ast::ast::{BinaryOperator, Function, Span, Term, UnaryOperator};
use tracing::trace;

use crate::errors::TransformError;
use crate::registry::{FutureKey, FutureRegistry};

/// Name of the program parameter holding the current time point.
pub const TIME_PARAMETER: &str = "__t";
/// Prefix of placeholder predicates standing in for future head atoms.
pub const FUTURE_PREFIX: &str = "__future_";
/// Predicate marking the last state of the horizon.
pub const FINAL_PREDICATE: &str = "__final";
/// Prefix of variables in synthesized rules.
pub const VARIABLE_PREFIX: &str = "X";

const MARKER: char = '\'';

/// Placeholder predicate name for future occurrences of `name`.
pub fn future_name(name: &str) -> String {
    format!("{FUTURE_PREFIX}{name}")
}

/// The constant term standing for the current time point.
pub fn time_term(parameter: &str, span: Span) -> Term {
    Term::function(parameter, Vec::new(), span)
}

/// `parameter + shift`.
pub fn shifted_time(parameter: &str, shift: i64, span: Span) -> Term {
    Term::binary(
        BinaryOperator::Plus,
        time_term(parameter, span),
        Term::number(shift, span),
        span,
    )
}

/// A predicate name split into its base name and prime markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalName<'a> {
    pub base: &'a str,
    pub previous: usize,
    pub next: usize,
}

impl<'a> TemporalName<'a> {
    pub fn parse(name: &'a str) -> Self {
        let without_previous = name.trim_start_matches(MARKER);
        let base = without_previous.trim_end_matches(MARKER);
        Self {
            base,
            previous: name.len() - without_previous.len(),
            next: without_previous.len() - base.len(),
        }
    }

    /// Net time offset: positive for the future, negative for the past.
    pub fn shift(&self) -> i64 {
        self.next as i64 - self.previous as i64
    }
}

/// Position-dependent flags controlling how a temporal atom is rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermPolicy {
    /// Replace future atoms by their placeholder predicate.
    pub redirect_future: bool,
    pub forbid_future: bool,
    pub forbid_past: bool,
    /// The atom occurs in a disjunctive head.
    pub disjunctive: bool,
}

/// Rewrites a single symbolic atom in place.
#[derive(Debug, Clone, Copy)]
pub struct TermRewriter<'p> {
    parameter: &'p str,
}

impl<'p> TermRewriter<'p> {
    pub fn new(parameter: &'p str) -> Self {
        Self { parameter }
    }

    /// Rewrite `term`, registering redirected future atoms in `registry`.
    ///
    /// Returns the shift of the atom when it refers to the future without
    /// being redirected (future atoms in constraint bodies), zero otherwise.
    pub fn rewrite(
        &self,
        term: &mut Term,
        policy: TermPolicy,
        registry: &mut FutureRegistry,
    ) -> Result<i64, TransformError> {
        match term {
            Term::Function(function) => self.rewrite_function(function, true, policy, registry),
            // classical negation
            Term::UnaryOperation {
                op: UnaryOperator::Minus,
                argument,
                ..
            } => match argument.as_mut() {
                Term::Function(function) => {
                    self.rewrite_function(function, false, policy, registry)
                }
                other => Err(unexpected(other)),
            },
            other => Err(unexpected(other)),
        }
    }

    fn rewrite_function(
        &self,
        function: &mut Function,
        positive: bool,
        policy: TermPolicy,
        registry: &mut FutureRegistry,
    ) -> Result<i64, TransformError> {
        let temporal = TemporalName::parse(&function.name);
        let shift = temporal.shift();
        let base = temporal.base.to_string();
        let span = function.span;
        let arity = function.arguments.len();

        if shift == 0 {
            function.name = base;
            function.arguments.push(time_term(self.parameter, span));
            return Ok(0);
        }
        if shift > 0 && policy.forbid_future {
            return Err(TransformError::FutureNotAllowed {
                atom: function.to_string(),
                span,
            });
        }
        if shift < 0 && policy.forbid_past {
            return Err(TransformError::PastNotAllowed {
                atom: function.to_string(),
                span,
            });
        }

        let mut pending = 0;
        if shift > 0 && policy.redirect_future {
            trace!(name = %base, arity, shift, positive, "redirecting future atom");
            let key = FutureKey::new(base.as_str(), arity, shift).with_sign(positive);
            registry.register(key, policy.disjunctive);
            function.name = future_name(&base);
            function.arguments.push(Term::number(shift, span));
        } else {
            function.name = base;
            if shift > 0 {
                pending = shift;
            }
        }
        function
            .arguments
            .push(shifted_time(self.parameter, shift, span));
        Ok(pending)
    }
}

fn unexpected(term: &Term) -> TransformError {
    TransformError::UnexpectedNode {
        kind: term.kind(),
        node: term.to_string(),
        span: term.span(),
    }
}
