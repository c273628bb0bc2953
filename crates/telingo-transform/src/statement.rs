//! Statement-level rewriting.
//!
//! Walks every statement of a temporal program, rewrites its atoms with the
//! position-dependent [`TermPolicy`], renames program parts, and guards
//! constraints that look into the future with the finality marker.

use indexmap::IndexMap;
use telingo_ast::ast::{
    Atom, BodyLiteral, ConditionalLiteral, Head, Literal, Rule, Sign, Span, Statement, Term,
};
use tracing::debug;

use crate::errors::TransformError;
use crate::registry::FutureRegistry;
use crate::term::{time_term, TermPolicy, TermRewriter, FINAL_PREDICATE, TIME_PARAMETER};

pub const BASE_PART: &str = "base";
pub const STATIC_PART: &str = "static";
pub const FINAL_PART: &str = "final";
pub const INITIAL_PART: &str = "initial";
pub const DYNAMIC_PART: &str = "dynamic";

/// Program part, parameter and maximum future shift a constraint was
/// collected under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RegroundKey {
    pub part: String,
    pub parameter: String,
    pub max_shift: i64,
}

/// A constraint whose body refers to the future.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DeferredConstraint {
    /// The rewritten constraint as emitted, guarded by the finality marker.
    pub guarded: Rule,
    /// The same constraint without the guard.
    pub unguarded: Rule,
}

/// Constraints referring to the future, grouped by [`RegroundKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegroundLedger {
    entries: IndexMap<RegroundKey, Vec<DeferredConstraint>>,
}

impl RegroundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: RegroundKey, constraint: DeferredConstraint) {
        self.entries.entry(key).or_default().push(constraint);
    }

    pub fn get(&self, key: &RegroundKey) -> Option<&[DeferredConstraint]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegroundKey, &[DeferredConstraint])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of recorded constraints over all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The `__final` literal, either bare (to be completed by the term
/// rewriter) or already carrying the time parameter.
fn final_literal(parameter: Option<&str>, span: Span) -> Literal {
    let arguments = parameter
        .map(|p| vec![time_term(p, span)])
        .unwrap_or_default();
    Literal::new(
        Sign::NoSign,
        Atom::Symbolic(Term::function(FINAL_PREDICATE, arguments, span)),
        span,
    )
}

/// Syntactic position of the literal being rewritten.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    head: bool,
    constraint: bool,
    disjunction: bool,
}

impl Context {
    fn for_rule(rule: &Rule) -> Self {
        let constraint = match &rule.head {
            Head::Literal(lit) => lit.atom == Atom::Boolean(false) || lit.sign != Sign::NoSign,
            _ => false,
        };
        Self {
            head: true,
            constraint,
            disjunction: matches!(rule.head, Head::Disjunction { .. }),
        }
    }

    fn body(self) -> Self {
        Self {
            head: false,
            ..self
        }
    }

    /// Negated head literals are treated like body literals.
    fn literal(self, sign: Sign) -> Self {
        Self {
            head: self.head && sign == Sign::NoSign,
            ..self
        }
    }

    fn policy(self) -> TermPolicy {
        if self.head {
            TermPolicy {
                redirect_future: true,
                forbid_future: false,
                forbid_past: true,
                disjunctive: self.disjunction,
            }
        } else if self.constraint {
            TermPolicy::default()
        } else {
            TermPolicy {
                forbid_future: true,
                ..TermPolicy::default()
            }
        }
    }
}

/// Recursive descent over one rule or external declaration.
struct Walker<'a> {
    terms: TermRewriter<'a>,
    registry: &'a mut FutureRegistry,
    max_shift: i64,
}

impl<'a> Walker<'a> {
    fn new(parameter: &'a str, registry: &'a mut FutureRegistry) -> Self {
        Self {
            terms: TermRewriter::new(parameter),
            registry,
            max_shift: 0,
        }
    }

    fn atom(&mut self, term: &mut Term, ctx: Context) -> Result<(), TransformError> {
        let pending = self.terms.rewrite(term, ctx.policy(), self.registry)?;
        self.max_shift = self.max_shift.max(pending);
        Ok(())
    }

    fn literal(&mut self, literal: &mut Literal, ctx: Context) -> Result<(), TransformError> {
        let ctx = ctx.literal(literal.sign);
        match &mut literal.atom {
            Atom::Symbolic(term) => self.atom(term, ctx),
            Atom::Boolean(_) | Atom::Comparison { .. } => Ok(()),
        }
    }

    fn conditional(
        &mut self,
        conditional: &mut ConditionalLiteral,
        ctx: Context,
    ) -> Result<(), TransformError> {
        self.literal(&mut conditional.literal, ctx)?;
        for lit in &mut conditional.condition {
            self.literal(lit, ctx.body())?;
        }
        Ok(())
    }

    fn head(&mut self, head: &mut Head, ctx: Context) -> Result<(), TransformError> {
        match head {
            Head::Literal(lit) => self.literal(lit, ctx),
            Head::Disjunction { elements, .. } => {
                for element in elements {
                    self.conditional(element, ctx)?;
                }
                Ok(())
            }
            Head::Aggregate(aggregate) => {
                for element in &mut aggregate.elements {
                    self.conditional(element, ctx)?;
                }
                Ok(())
            }
        }
    }

    fn body(&mut self, body: &mut [BodyLiteral], ctx: Context) -> Result<(), TransformError> {
        for element in body {
            match element {
                BodyLiteral::Literal(lit) => self.literal(lit, ctx)?,
                BodyLiteral::Conditional(conditional) => self.conditional(conditional, ctx)?,
                BodyLiteral::Aggregate { aggregate, .. } => {
                    for agg_element in &mut aggregate.elements {
                        for lit in &mut agg_element.condition {
                            self.literal(lit, ctx)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Rewrites the statements of temporal programs one at a time.
///
/// The rewriter is stateful: it tracks the current program part, and
/// whether that part is the `final` part, across calls.
#[derive(Debug, Clone)]
pub struct StatementRewriter {
    parameter: String,
    part: String,
    in_final: bool,
    uses_final: bool,
}

impl Default for StatementRewriter {
    fn default() -> Self {
        Self::new(TIME_PARAMETER)
    }
}

impl StatementRewriter {
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            part: BASE_PART.to_string(),
            in_final: false,
            uses_final: false,
        }
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Name of the part subsequent statements belong to, after renaming.
    pub fn current_part(&self) -> &str {
        &self.part
    }

    /// Whether any emitted statement refers to the finality marker.
    pub fn uses_final(&self) -> bool {
        self.uses_final
    }

    /// Rewrite `statement` in place.
    pub fn rewrite(
        &mut self,
        statement: &mut Statement,
        registry: &mut FutureRegistry,
        ledger: &mut RegroundLedger,
    ) -> Result<(), TransformError> {
        if self.in_final {
            let span = statement.span();
            if let Some(body) = statement.body_mut() {
                body.push(BodyLiteral::Literal(final_literal(None, span)));
                self.uses_final = true;
            }
        }

        match statement {
            Statement::Rule(rule) => self.rewrite_rule(rule, registry, ledger),
            Statement::External { atom, body, .. } => {
                let mut walker = Walker::new(&self.parameter, registry);
                let ctx = Context::default();
                walker.atom(atom, ctx)?;
                walker.body(body, ctx)
            }
            Statement::Program {
                name, parameters, ..
            } => {
                self.in_final = name.as_str() == FINAL_PART;
                if self.in_final || name.as_str() == BASE_PART {
                    *name = STATIC_PART.to_string();
                }
                parameters.push(self.parameter.clone());
                self.part = name.clone();
                debug!(part = %self.part, final_part = self.in_final, "entering program part");
                Ok(())
            }
            Statement::ShowSignature { arity, .. } | Statement::ProjectSignature { arity, .. } => {
                *arity += 1;
                Ok(())
            }
            Statement::ShowNothing { .. } | Statement::Const { .. } => Ok(()),
        }
    }

    fn rewrite_rule(
        &mut self,
        rule: &mut Rule,
        registry: &mut FutureRegistry,
        ledger: &mut RegroundLedger,
    ) -> Result<(), TransformError> {
        let ctx = Context::for_rule(rule);
        let mut walker = Walker::new(&self.parameter, registry);
        walker.head(&mut rule.head, ctx)?;
        walker.body(&mut rule.body, ctx.body())?;
        let max_shift = walker.max_shift;

        if max_shift > 0 && !self.in_final {
            let unguarded = rule.clone();
            rule.body.push(BodyLiteral::Literal(final_literal(
                Some(&self.parameter),
                rule.span,
            )));
            self.uses_final = true;
            debug!(part = %self.part, max_shift, "constraint refers to the future");
            ledger.record(
                RegroundKey {
                    part: self.part.clone(),
                    parameter: self.parameter.clone(),
                    max_shift,
                },
                DeferredConstraint {
                    guarded: rule.clone(),
                    unguarded,
                },
            );
        }
        Ok(())
    }
}
