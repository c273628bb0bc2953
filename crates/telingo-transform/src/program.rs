//! Whole-program driver: rewrites every input and appends the static part
//! that restores redirected future atoms.

use indexmap::IndexSet;
use telingo_ast::ast::{BodyLiteral, Head, Literal, Rule, Span, Statement, Term};
use tracing::{debug, info, warn};

use crate::errors::{SourceTransformError, SpannedTransformError, TransformError};
use crate::parts::{collect_program_parts, ProgramPart};
use crate::registry::{FutureKey, FutureRegistry};
use crate::statement::{RegroundLedger, StatementRewriter, STATIC_PART};
use crate::term::{
    future_name, shifted_time, time_term, FINAL_PREDICATE, TIME_PARAMETER, VARIABLE_PREFIX,
};

/// A predicate signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Signature {
    pub name: String,
    pub arity: usize,
}

impl Signature {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// A part that would have to be re-grounded at a later step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RegroundPart {
    pub name: String,
    pub parameter: String,
    pub max_shift: i64,
}

/// Result of transforming a temporal program.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    /// Rewritten statements followed by the synthesized static part.
    pub statements: Vec<Statement>,
    /// Placeholder predicates whose atoms beyond the current step must be
    /// assumed false.
    pub future_signatures: Vec<Signature>,
    pub program_parts: Vec<ProgramPart>,
    /// Always empty: constraints referring to the future are only enforced
    /// in the final state. See [`TransformOutput::deferred_constraints`].
    pub reground_parts: Vec<RegroundPart>,
    /// Constraints referring to the future, guarded by the finality marker.
    pub deferred_constraints: RegroundLedger,
}

impl TransformOutput {
    pub fn render(&self) -> String {
        telingo_ast::render_program(&self.statements)
    }
}

/// Incremental driver accepting one parsed input at a time.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    rewriter: StatementRewriter,
    registry: FutureRegistry,
    ledger: RegroundLedger,
    statements: Vec<Statement>,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(parameter: impl Into<String>) -> Self {
        Self {
            rewriter: StatementRewriter::new(parameter),
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &FutureRegistry {
        &self.registry
    }

    pub fn add_statement(&mut self, mut statement: Statement) -> Result<(), TransformError> {
        self.rewriter
            .rewrite(&mut statement, &mut self.registry, &mut self.ledger)?;
        self.statements.push(statement);
        Ok(())
    }

    pub fn add_program(
        &mut self,
        statements: impl IntoIterator<Item = Statement>,
    ) -> Result<(), TransformError> {
        for statement in statements {
            self.add_statement(statement)?;
        }
        Ok(())
    }

    /// Append the synthesized static part and collect the program parts.
    pub fn finish(self) -> TransformOutput {
        let Transformer {
            rewriter,
            registry,
            ledger,
            mut statements,
        } = self;
        let parameter = rewriter.parameter();

        if rewriter.uses_final() || !registry.is_empty() {
            statements.push(Statement::Program {
                name: STATIC_PART.to_string(),
                parameters: vec![parameter.to_string()],
                span: Span::default(),
            });
        }
        if rewriter.uses_final() {
            statements.push(Statement::External {
                atom: Term::function(
                    FINAL_PREDICATE,
                    vec![time_term(parameter, Span::default())],
                    Span::default(),
                ),
                body: Vec::new(),
                span: Span::default(),
            });
        }

        let mut future_signatures = IndexSet::new();
        for (key, disjunctive) in registry.iter() {
            debug!(
                name = %key.name,
                arity = key.arity,
                shift = key.shift,
                positive = key.positive,
                disjunctive,
                "restoring future atom"
            );
            statements.extend(restoration_statements(key, disjunctive, parameter));
            future_signatures.insert(Signature::new(future_name(&key.name), key.arity + 2));
        }

        for (key, constraints) in ledger.iter() {
            warn!(
                part = %key.part,
                max_shift = key.max_shift,
                constraints = constraints.len(),
                "constraints referring to the future are only enforced in the final state"
            );
        }

        let program_parts = collect_program_parts(&statements);
        info!(
            statements = statements.len(),
            future_predicates = registry.len(),
            parts = program_parts.len(),
            "transformed temporal program"
        );

        TransformOutput {
            statements,
            future_signatures: future_signatures.into_iter().collect(),
            program_parts,
            reground_parts: Vec::new(),
            deferred_constraints: ledger,
        }
    }
}

/// Rules tying a redirected future predicate back to the original one.
///
/// For `p/n` with shift `s` this is always
/// `p(X0..,t) :- __future_p(X0..,s,t).`; disjunctive predicates
/// additionally get `#external p(X0..,(t+s)): __future_p(X0..,s,(t+s)).`
/// and `__future_p(X0..,s,(t+s)) :- p(X0..,(t+s)).`
///
/// Every atom carries the sign of the key, so `-p'` is restored by
/// `-p(X0..,t) :- -__future_p(X0..,s,t).`
pub fn restoration_statements(
    key: &FutureKey,
    disjunctive: bool,
    parameter: &str,
) -> Vec<Statement> {
    let span = Span::default();
    let variables: Vec<Term> = (0..key.arity)
        .map(|i| Term::variable(format!("{VARIABLE_PREFIX}{i}"), span))
        .collect();
    let atom = |name: &str, extra: Vec<Term>| {
        let mut arguments = variables.clone();
        arguments.extend(extra);
        let function = Term::function(name, arguments, span);
        if key.positive {
            function
        } else {
            function.classically_negated()
        }
    };
    let placeholder = future_name(&key.name);
    let shift = || Term::number(key.shift, span);

    let mut out = Vec::with_capacity(3);
    if disjunctive {
        let later = || shifted_time(parameter, key.shift, span);
        out.push(Statement::External {
            atom: atom(&key.name, vec![later()]),
            body: vec![BodyLiteral::Literal(Literal::positive(atom(
                &placeholder,
                vec![shift(), later()],
            )))],
            span,
        });
        out.push(Statement::Rule(Rule {
            head: Head::Literal(Literal::positive(atom(&placeholder, vec![shift(), later()]))),
            body: vec![BodyLiteral::Literal(Literal::positive(atom(
                &key.name,
                vec![later()],
            )))],
            span,
        }));
    }
    out.push(Statement::Rule(Rule {
        head: Head::Literal(Literal::positive(atom(
            &key.name,
            vec![time_term(parameter, span)],
        ))),
        body: vec![BodyLiteral::Literal(Literal::positive(atom(
            &placeholder,
            vec![shift(), time_term(parameter, span)],
        )))],
        span,
    }));
    out
}

/// Transform parsed inputs with the default time parameter.
pub fn transform<I>(inputs: I) -> Result<TransformOutput, TransformError>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = Statement>,
{
    let mut transformer = Transformer::with_parameter(TIME_PARAMETER);
    for input in inputs {
        transformer.add_program(input)?;
    }
    Ok(transformer.finish())
}

/// A named program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Parse and transform program texts, attaching source locations to
/// failures.
pub fn transform_sources(
    sources: &[SourceFile],
) -> Result<TransformOutput, SourceTransformError> {
    let mut transformer = Transformer::new();
    for source in sources {
        let statements = telingo_ast::parse(&source.text, &source.name)?;
        debug!(file = %source.name, statements = statements.len(), "parsed input");
        transformer
            .add_program(statements)
            .map_err(|err| SpannedTransformError::new(err, &source.text, &source.name))?;
    }
    Ok(transformer.finish())
}
