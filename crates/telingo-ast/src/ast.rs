use std::fmt;

/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Default negation applied to a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Sign {
    #[default]
    NoSign,
    Negation,
    DoubleNegation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum UnaryOperator {
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiplication,
    Division,
    Modulo,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum AggregateFunction {
    Count,
    Sum,
    SumPlus,
    Min,
    Max,
}

/// A function term `name(arguments...)`; constants are functions without
/// arguments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Function {
    pub name: String,
    pub arguments: Vec<Term>,
    pub span: Span,
}

impl Function {
    pub fn new(name: impl Into<String>, arguments: Vec<Term>, span: Span) -> Self {
        Self {
            name: name.into(),
            arguments,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Term {
    Number {
        value: i64,
        span: Span,
    },
    String {
        value: String,
        span: Span,
    },
    /// Named variable; the anonymous variable is spelled `_`.
    Variable {
        name: String,
        span: Span,
    },
    Function(Function),
    UnaryOperation {
        op: UnaryOperator,
        argument: Box<Term>,
        span: Span,
    },
    BinaryOperation {
        op: BinaryOperator,
        left: Box<Term>,
        right: Box<Term>,
        span: Span,
    },
    Interval {
        left: Box<Term>,
        right: Box<Term>,
        span: Span,
    },
    Tuple {
        elements: Vec<Term>,
        span: Span,
    },
}

impl Term {
    pub fn number(value: i64, span: Span) -> Self {
        Term::Number { value, span }
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Term::Variable {
            name: name.into(),
            span,
        }
    }

    pub fn function(name: impl Into<String>, arguments: Vec<Term>, span: Span) -> Self {
        Term::Function(Function::new(name, arguments, span))
    }

    /// Classical negation `-term`, spanning the same source as `term`.
    pub fn classically_negated(self) -> Self {
        let span = self.span();
        Term::UnaryOperation {
            op: UnaryOperator::Minus,
            argument: Box::new(self),
            span,
        }
    }

    pub fn binary(op: BinaryOperator, left: Term, right: Term, span: Span) -> Self {
        Term::BinaryOperation {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Term::Number { span, .. }
            | Term::String { span, .. }
            | Term::Variable { span, .. }
            | Term::UnaryOperation { span, .. }
            | Term::BinaryOperation { span, .. }
            | Term::Interval { span, .. }
            | Term::Tuple { span, .. } => *span,
            Term::Function(f) => f.span,
        }
    }

    /// Node kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Number { .. } => "number",
            Term::String { .. } => "string",
            Term::Variable { .. } => "variable",
            Term::Function(_) => "function",
            Term::UnaryOperation { .. } => "unary operation",
            Term::BinaryOperation { .. } => "binary operation",
            Term::Interval { .. } => "interval",
            Term::Tuple { .. } => "tuple",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Atom {
    Boolean(bool),
    Symbolic(Term),
    Comparison {
        op: ComparisonOperator,
        left: Term,
        right: Term,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Literal {
    pub sign: Sign,
    pub atom: Atom,
    pub span: Span,
}

impl Literal {
    pub fn new(sign: Sign, atom: Atom, span: Span) -> Self {
        Self { sign, atom, span }
    }

    /// A positive literal over a symbolic atom.
    pub fn positive(term: Term) -> Self {
        let span = term.span();
        Self::new(Sign::NoSign, Atom::Symbolic(term), span)
    }
}

/// `literal : condition`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ConditionalLiteral {
    pub literal: Literal,
    pub condition: Vec<Literal>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Guard {
    pub op: ComparisonOperator,
    pub term: Term,
}

/// Choice aggregate `l { elements } u` in rule heads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Aggregate {
    pub left_guard: Option<Guard>,
    pub elements: Vec<ConditionalLiteral>,
    pub right_guard: Option<Guard>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BodyAggregateElement {
    pub terms: Vec<Term>,
    pub condition: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BodyAggregate {
    pub function: AggregateFunction,
    pub left_guard: Option<Guard>,
    pub elements: Vec<BodyAggregateElement>,
    pub right_guard: Option<Guard>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Head {
    Literal(Literal),
    Disjunction {
        elements: Vec<ConditionalLiteral>,
        span: Span,
    },
    Aggregate(Aggregate),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum BodyLiteral {
    Literal(Literal),
    Conditional(ConditionalLiteral),
    Aggregate {
        sign: Sign,
        aggregate: BodyAggregate,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Rule {
    pub head: Head,
    pub body: Vec<BodyLiteral>,
    pub span: Span,
}

/// Top-level statement of a logic program.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Statement {
    Rule(Rule),
    /// `#external atom : body.`
    External {
        atom: Term,
        body: Vec<BodyLiteral>,
        span: Span,
    },
    /// `#program name(parameters).`
    Program {
        name: String,
        parameters: Vec<String>,
        span: Span,
    },
    /// `#show name/arity.`
    ShowSignature {
        name: String,
        arity: usize,
        positive: bool,
        span: Span,
    },
    /// `#show.`
    ShowNothing { span: Span },
    /// `#project name/arity.`
    ProjectSignature {
        name: String,
        arity: usize,
        positive: bool,
        span: Span,
    },
    /// `#const name = value.`
    Const {
        name: String,
        value: Term,
        span: Span,
    },
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Rule(rule) => rule.span,
            Statement::External { span, .. }
            | Statement::Program { span, .. }
            | Statement::ShowSignature { span, .. }
            | Statement::ShowNothing { span }
            | Statement::ProjectSignature { span, .. }
            | Statement::Const { span, .. } => *span,
        }
    }

    /// Node kind name used in diagnostics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Rule(_) => "rule",
            Statement::External { .. } => "external",
            Statement::Program { .. } => "program",
            Statement::ShowSignature { .. } => "show signature",
            Statement::ShowNothing { .. } => "show",
            Statement::ProjectSignature { .. } => "project signature",
            Statement::Const { .. } => "const",
        }
    }

    /// Mutable access to the body of statements that have one.
    pub fn body_mut(&mut self) -> Option<&mut Vec<BodyLiteral>> {
        match self {
            Statement::Rule(rule) => Some(&mut rule.body),
            Statement::External { body, .. } => Some(body),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------
// Printing
// ---------------------------------------------------------------

fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::NoSign => Ok(()),
            Sign::Negation => f.write_str("not "),
            Sign::DoubleNegation => f.write_str("not not "),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "\\",
            BinaryOperator::Power => "**",
        })
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterEqual => ">=",
        })
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunction::Count => "#count",
            AggregateFunction::Sum => "#sum",
            AggregateFunction::SumPlus => "#sum+",
            AggregateFunction::Min => "#min",
            AggregateFunction::Max => "#max",
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            write_separated(f, &self.arguments, ",")?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Number { value, .. } => write!(f, "{value}"),
            Term::String { value, .. } => write!(f, "\"{value}\""),
            Term::Variable { name, .. } => f.write_str(name),
            Term::Function(func) => write!(f, "{func}"),
            Term::UnaryOperation {
                op: UnaryOperator::Minus,
                argument,
                ..
            } => write!(f, "-{argument}"),
            Term::BinaryOperation {
                op, left, right, ..
            } => write!(f, "({left}{op}{right})"),
            Term::Interval { left, right, .. } => write!(f, "({left}..{right})"),
            Term::Tuple { elements, .. } => {
                f.write_str("(")?;
                write_separated(f, elements, ",")?;
                if elements.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Boolean(true) => f.write_str("#true"),
            Atom::Boolean(false) => f.write_str("#false"),
            Atom::Symbolic(term) => write!(f, "{term}"),
            Atom::Comparison { op, left, right } => write!(f, "{left}{op}{right}"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign, self.atom)
    }
}

impl fmt::Display for ConditionalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)?;
        if !self.condition.is_empty() {
            f.write_str(": ")?;
            write_separated(f, &self.condition, ", ")?;
        }
        Ok(())
    }
}

fn write_left_guard(f: &mut fmt::Formatter<'_>, guard: &Option<Guard>) -> fmt::Result {
    match guard {
        Some(g) => write!(f, "{} {} ", g.term, g.op),
        None => Ok(()),
    }
}

fn write_right_guard(f: &mut fmt::Formatter<'_>, guard: &Option<Guard>) -> fmt::Result {
    match guard {
        Some(g) => write!(f, " {} {}", g.op, g.term),
        None => Ok(()),
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_left_guard(f, &self.left_guard)?;
        f.write_str("{ ")?;
        write_separated(f, &self.elements, "; ")?;
        f.write_str(" }")?;
        write_right_guard(f, &self.right_guard)
    }
}

impl fmt::Display for BodyAggregateElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_separated(f, &self.terms, ",")?;
        if !self.condition.is_empty() {
            f.write_str(": ")?;
            write_separated(f, &self.condition, ", ")?;
        }
        Ok(())
    }
}

impl fmt::Display for BodyAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_left_guard(f, &self.left_guard)?;
        write!(f, "{} {{ ", self.function)?;
        write_separated(f, &self.elements, "; ")?;
        f.write_str(" }")?;
        write_right_guard(f, &self.right_guard)
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Literal(lit) => write!(f, "{lit}"),
            Head::Disjunction { elements, .. } => write_separated(f, elements, "; "),
            Head::Aggregate(agg) => write!(f, "{agg}"),
        }
    }
}

impl fmt::Display for BodyLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyLiteral::Literal(lit) => write!(f, "{lit}"),
            BodyLiteral::Conditional(cond) => write!(f, "{cond}"),
            BodyLiteral::Aggregate {
                sign, aggregate, ..
            } => write!(f, "{sign}{aggregate}"),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            f.write_str(" :- ")?;
            write_separated(f, &self.body, "; ")?;
        }
        f.write_str(".")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Rule(rule) => write!(f, "{rule}"),
            Statement::External { atom, body, .. } => {
                write!(f, "#external {atom}")?;
                if !body.is_empty() {
                    f.write_str(": ")?;
                    write_separated(f, body, "; ")?;
                }
                f.write_str(".")
            }
            Statement::Program {
                name, parameters, ..
            } => {
                write!(f, "#program {name}")?;
                if !parameters.is_empty() {
                    write!(f, "({})", parameters.join(","))?;
                }
                f.write_str(".")
            }
            Statement::ShowSignature {
                name,
                arity,
                positive,
                ..
            } => {
                let neg = if *positive { "" } else { "-" };
                write!(f, "#show {neg}{name}/{arity}.")
            }
            Statement::ShowNothing { .. } => f.write_str("#show."),
            Statement::ProjectSignature {
                name,
                arity,
                positive,
                ..
            } => {
                let neg = if *positive { "" } else { "-" };
                write!(f, "#project {neg}{name}/{arity}.")
            }
            Statement::Const { name, value, .. } => write!(f, "#const {name}={value}."),
        }
    }
}

/// Render a statement sequence as program text, one statement per line.
pub fn render_program(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&statement.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn function_without_arguments_prints_as_constant() {
        let t = Term::function("a", vec![], span());
        assert_eq!(t.to_string(), "a");
    }

    #[test]
    fn binary_operations_are_parenthesised() {
        let t = Term::function(
            "p",
            vec![
                Term::variable("X", span()),
                Term::binary(
                    BinaryOperator::Plus,
                    Term::variable("__t", span()),
                    Term::number(2, span()),
                    span(),
                ),
            ],
            span(),
        );
        assert_eq!(t.to_string(), "p(X,(__t+2))");
    }

    #[test]
    fn unary_tuple_keeps_trailing_comma() {
        let t = Term::Tuple {
            elements: vec![Term::number(1, span())],
            span: span(),
        };
        assert_eq!(t.to_string(), "(1,)");
    }

    #[test]
    fn constraint_prints_false_head() {
        let rule = Rule {
            head: Head::Literal(Literal::new(Sign::NoSign, Atom::Boolean(false), span())),
            body: vec![BodyLiteral::Literal(Literal::new(
                Sign::Negation,
                Atom::Symbolic(Term::function("a", vec![], span())),
                span(),
            ))],
            span: span(),
        };
        assert_eq!(Statement::Rule(rule).to_string(), "#false :- not a.");
    }

    #[test]
    fn program_directive_lists_parameters() {
        let stmt = Statement::Program {
            name: "static".into(),
            parameters: vec!["__t".into()],
            span: span(),
        };
        assert_eq!(stmt.to_string(), "#program static(__t).");
        let base = Statement::Program {
            name: "base".into(),
            parameters: vec![],
            span: span(),
        };
        assert_eq!(base.to_string(), "#program base.");
    }

    #[test]
    fn negative_show_signature() {
        let stmt = Statement::ShowSignature {
            name: "p".into(),
            arity: 2,
            positive: false,
            span: span(),
        };
        assert_eq!(stmt.to_string(), "#show -p/2.");
    }

    #[test]
    fn body_mut_only_for_rules_and_externals() {
        let mut ext = Statement::External {
            atom: Term::function("e", vec![], span()),
            body: vec![],
            span: span(),
        };
        assert!(ext.body_mut().is_some());
        let mut show = Statement::ShowNothing { span: span() };
        assert!(show.body_mut().is_none());
    }
}
