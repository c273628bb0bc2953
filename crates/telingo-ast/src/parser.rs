#![allow(clippy::result_large_err)]

use pest::Parser;
use pest_derive::Parser;

use crate::ast;
use crate::ast::*;
use crate::errors::ParseError;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct ProgramParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

/// Name of the part that statements belong to before any `#program`
/// directive.
pub const BASE_PART: &str = "base";

fn span_from(pair: &Pair<'_>) -> Span {
    let s = pair.as_span();
    Span::new(s.start(), s.end())
}

/// Source text and file name threaded through the builders for diagnostics.
#[derive(Clone, Copy)]
struct Source<'s> {
    text: &'s str,
    filename: &'s str,
}

impl Source<'_> {
    fn integer(&self, pair: &Pair<'_>) -> Result<i64, ParseError> {
        pair.as_str().parse().map_err(|_| {
            ParseError::invalid_integer(pair.as_str(), span_from(pair), self.text, self.filename)
        })
    }

    fn unexpected(&self, pair: &Pair<'_>, what: &str) -> ParseError {
        ParseError::syntax(
            format!("unexpected {what} '{}'", pair.as_str()),
            span_from(pair),
            self.text,
            self.filename,
        )
    }
}

/// Parse program text into its statement sequence.
///
/// Like gringo, the result always starts with a `#program base.` directive
/// so that every statement belongs to a named program part.
pub fn parse(source: &str, filename: &str) -> Result<Vec<Statement>, ParseError> {
    let src = Source {
        text: source,
        filename,
    };
    let pairs = ProgramParser::parse(Rule::program, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        ParseError::syntax(format!("{e}"), Span::new(start, end), source, filename)
    })?;

    let mut statements = vec![Statement::Program {
        name: BASE_PART.to_string(),
        parameters: Vec::new(),
        span: Span::new(0, 0),
    }];

    let program_pair = pairs.into_iter().next().unwrap();
    for pair in program_pair.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        statements.push(parse_statement(pair, src)?);
    }
    Ok(statements)
}

fn parse_statement(pair: Pair<'_>, src: Source<'_>) -> Result<Statement, ParseError> {
    let span = span_from(&pair);
    match pair.as_rule() {
        Rule::rule => {
            let mut inner = pair.into_inner();
            let head = parse_head(inner.next().unwrap(), src)?;
            let body = match inner.next() {
                Some(body) => parse_body(body, src)?,
                None => Vec::new(),
            };
            Ok(Statement::Rule(ast::Rule { head, body, span }))
        }
        Rule::constraint => {
            let body = parse_body(pair.into_inner().next().unwrap(), src)?;
            let head = Head::Literal(Literal::new(
                Sign::NoSign,
                Atom::Boolean(false),
                Span::new(span.start, span.start),
            ));
            Ok(Statement::Rule(ast::Rule { head, body, span }))
        }
        Rule::program_decl => {
            let mut inner = pair.into_inner();
            let name = inner.next().unwrap().as_str().to_string();
            let parameters = inner.map(|p| p.as_str().to_string()).collect();
            Ok(Statement::Program {
                name,
                parameters,
                span,
            })
        }
        Rule::external_decl => {
            let mut inner = pair.into_inner();
            let atom = parse_symbolic(inner.next().unwrap(), src)?;
            let body = match inner.next() {
                Some(body) => parse_body(body, src)?,
                None => Vec::new(),
            };
            Ok(Statement::External { atom, body, span })
        }
        Rule::show_sig | Rule::project_sig => {
            let is_show = pair.as_rule() == Rule::show_sig;
            let mut inner = pair.into_inner();
            let (name, positive) = parse_signed_name(inner.next().unwrap());
            let arity_pair = inner.next().unwrap();
            let arity = usize::try_from(src.integer(&arity_pair)?)
                .map_err(|_| src.unexpected(&arity_pair, "arity"))?;
            if is_show {
                Ok(Statement::ShowSignature {
                    name,
                    arity,
                    positive,
                    span,
                })
            } else {
                Ok(Statement::ProjectSignature {
                    name,
                    arity,
                    positive,
                    span,
                })
            }
        }
        Rule::show_nothing => Ok(Statement::ShowNothing { span }),
        Rule::const_decl => {
            let mut inner = pair.into_inner();
            let name = inner.next().unwrap().as_str().to_string();
            let value = parse_term(inner.next().unwrap(), src)?;
            Ok(Statement::Const { name, value, span })
        }
        _ => Err(src.unexpected(&pair, "statement")),
    }
}

fn parse_signed_name(pair: Pair<'_>) -> (String, bool) {
    let mut positive = true;
    let mut name = String::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::neg_op => positive = false,
            _ => name = p.as_str().to_string(),
        }
    }
    (name, positive)
}

// ---------------------------------------------------------------
// Heads and bodies
// ---------------------------------------------------------------

fn parse_head(pair: Pair<'_>, src: Source<'_>) -> Result<Head, ParseError> {
    let inner = pair.into_inner().next().unwrap();
    let span = span_from(&inner);
    match inner.as_rule() {
        Rule::disjunction => {
            let mut elements = inner
                .into_inner()
                .map(|p| parse_cond_literal(p, src))
                .collect::<Result<Vec<_>, _>>()?;
            if elements.len() == 1 && elements[0].condition.is_empty() {
                Ok(Head::Literal(elements.remove(0).literal))
            } else {
                Ok(Head::Disjunction { elements, span })
            }
        }
        Rule::choice => {
            let mut left_guard = None;
            let mut right_guard = None;
            let mut elements = Vec::new();
            for p in inner.into_inner() {
                match p.as_rule() {
                    Rule::left_guard => left_guard = Some(parse_guard(p, src)?),
                    Rule::right_guard => right_guard = Some(parse_guard(p, src)?),
                    Rule::choice_elements => {
                        for e in p.into_inner() {
                            elements.push(parse_cond_literal(e, src)?);
                        }
                    }
                    _ => return Err(src.unexpected(&p, "choice element")),
                }
            }
            Ok(Head::Aggregate(Aggregate {
                left_guard,
                elements,
                right_guard,
                span,
            }))
        }
        _ => Err(src.unexpected(&inner, "head")),
    }
}

/// Guards without an explicit operator default to `<=`.
fn parse_guard(pair: Pair<'_>, src: Source<'_>) -> Result<Guard, ParseError> {
    let mut op = ComparisonOperator::LessEqual;
    let mut term = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::cmp_op => op = parse_cmp_op(&p),
            _ => term = Some(parse_term(p, src)?),
        }
    }
    Ok(Guard {
        op,
        term: term.unwrap(),
    })
}

fn parse_body(pair: Pair<'_>, src: Source<'_>) -> Result<Vec<BodyLiteral>, ParseError> {
    let mut body = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::cond_literal => {
                let cond = parse_cond_literal(p, src)?;
                if cond.condition.is_empty() {
                    body.push(BodyLiteral::Literal(cond.literal));
                } else {
                    body.push(BodyLiteral::Conditional(cond));
                }
            }
            Rule::body_aggregate => body.push(parse_body_aggregate(p, src)?),
            _ => return Err(src.unexpected(&p, "body element")),
        }
    }
    Ok(body)
}

fn parse_body_aggregate(pair: Pair<'_>, src: Source<'_>) -> Result<BodyLiteral, ParseError> {
    let span = span_from(&pair);
    let mut sign = Sign::NoSign;
    let mut function = AggregateFunction::Count;
    let mut left_guard = None;
    let mut right_guard = None;
    let mut elements = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::sign => sign = parse_sign(p),
            Rule::left_guard => left_guard = Some(parse_guard(p, src)?),
            Rule::right_guard => right_guard = Some(parse_guard(p, src)?),
            Rule::agg_function => {
                function = match p.as_str() {
                    "#count" => AggregateFunction::Count,
                    "#sum+" => AggregateFunction::SumPlus,
                    "#sum" => AggregateFunction::Sum,
                    "#min" => AggregateFunction::Min,
                    "#max" => AggregateFunction::Max,
                    _ => return Err(src.unexpected(&p, "aggregate function")),
                }
            }
            Rule::agg_elements => {
                for e in p.into_inner() {
                    let mut terms = Vec::new();
                    let mut condition = Vec::new();
                    for part in e.into_inner() {
                        match part.as_rule() {
                            Rule::agg_terms => {
                                for t in part.into_inner() {
                                    terms.push(parse_term(t, src)?);
                                }
                            }
                            Rule::condition => condition = parse_condition(part, src)?,
                            _ => return Err(src.unexpected(&part, "aggregate element")),
                        }
                    }
                    elements.push(BodyAggregateElement { terms, condition });
                }
            }
            _ => return Err(src.unexpected(&p, "aggregate")),
        }
    }
    Ok(BodyLiteral::Aggregate {
        sign,
        aggregate: BodyAggregate {
            function,
            left_guard,
            elements,
            right_guard,
            span,
        },
        span,
    })
}

// ---------------------------------------------------------------
// Literals
// ---------------------------------------------------------------

fn parse_cond_literal(pair: Pair<'_>, src: Source<'_>) -> Result<ConditionalLiteral, ParseError> {
    let span = span_from(&pair);
    let mut inner = pair.into_inner();
    let literal = parse_literal(inner.next().unwrap(), src)?;
    let condition = match inner.next() {
        Some(cond) => parse_condition(cond, src)?,
        None => Vec::new(),
    };
    Ok(ConditionalLiteral {
        literal,
        condition,
        span,
    })
}

fn parse_condition(pair: Pair<'_>, src: Source<'_>) -> Result<Vec<Literal>, ParseError> {
    pair.into_inner().map(|p| parse_literal(p, src)).collect()
}

fn parse_sign(pair: Pair<'_>) -> Sign {
    match pair.into_inner().count() {
        1 => Sign::Negation,
        _ => Sign::DoubleNegation,
    }
}

fn parse_literal(pair: Pair<'_>, src: Source<'_>) -> Result<Literal, ParseError> {
    let span = span_from(&pair);
    let mut sign = Sign::NoSign;
    let mut atom = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::sign => sign = parse_sign(p),
            Rule::boolean => atom = Some(Atom::Boolean(p.as_str() == "#true")),
            Rule::comparison => {
                let mut inner = p.into_inner();
                let left = parse_term(inner.next().unwrap(), src)?;
                let op = parse_cmp_op(&inner.next().unwrap());
                let right = parse_term(inner.next().unwrap(), src)?;
                atom = Some(Atom::Comparison { op, left, right });
            }
            Rule::symbolic => atom = Some(Atom::Symbolic(parse_symbolic(p, src)?)),
            _ => return Err(src.unexpected(&p, "literal")),
        }
    }
    Ok(Literal::new(sign, atom.unwrap(), span))
}

/// Symbolic atoms with classical negation become a unary minus applied to
/// the function term.
fn parse_symbolic(pair: Pair<'_>, src: Source<'_>) -> Result<Term, ParseError> {
    let span = span_from(&pair);
    let mut negated = false;
    let mut function = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::neg_op => negated = true,
            Rule::function => function = Some(parse_function(p, src)?),
            _ => return Err(src.unexpected(&p, "atom")),
        }
    }
    let term = Term::Function(function.unwrap());
    if negated {
        Ok(Term::UnaryOperation {
            op: UnaryOperator::Minus,
            argument: Box::new(term),
            span,
        })
    } else {
        Ok(term)
    }
}

fn parse_cmp_op(pair: &Pair<'_>) -> ComparisonOperator {
    match pair.as_str() {
        "=" | "==" => ComparisonOperator::Equal,
        "!=" => ComparisonOperator::NotEqual,
        "<" => ComparisonOperator::LessThan,
        "<=" => ComparisonOperator::LessEqual,
        ">" => ComparisonOperator::GreaterThan,
        _ => ComparisonOperator::GreaterEqual,
    }
}

// ---------------------------------------------------------------
// Terms
// ---------------------------------------------------------------

fn parse_function(pair: Pair<'_>, src: Source<'_>) -> Result<Function, ParseError> {
    let span = span_from(&pair);
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let arguments = match inner.next() {
        Some(args) => args
            .into_inner()
            .map(|t| parse_term(t, src))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(Function::new(name, arguments, span))
}

fn fold_binary<'a>(
    pair: Pair<'a>,
    src: Source<'_>,
    op_of: fn(&str) -> BinaryOperator,
) -> Result<Term, ParseError> {
    let span = span_from(&pair);
    let mut inner = pair.into_inner();
    let mut result = parse_term(inner.next().unwrap(), src)?;
    while let Some(op_pair) = inner.next() {
        let rhs = parse_term(inner.next().unwrap(), src)?;
        result = Term::binary(op_of(op_pair.as_str()), result, rhs, span);
    }
    Ok(result)
}

fn parse_term(pair: Pair<'_>, src: Source<'_>) -> Result<Term, ParseError> {
    let span = span_from(&pair);
    match pair.as_rule() {
        Rule::term => {
            let mut inner = pair.into_inner();
            let left = parse_term(inner.next().unwrap(), src)?;
            match inner.nth(1) {
                Some(right) => Ok(Term::Interval {
                    left: Box::new(left),
                    right: Box::new(parse_term(right, src)?),
                    span,
                }),
                None => Ok(left),
            }
        }
        Rule::sum => fold_binary(pair, src, |op| match op {
            "-" => BinaryOperator::Minus,
            _ => BinaryOperator::Plus,
        }),
        Rule::product => fold_binary(pair, src, |op| match op {
            "/" => BinaryOperator::Division,
            "\\" => BinaryOperator::Modulo,
            _ => BinaryOperator::Multiplication,
        }),
        Rule::power => {
            let mut inner = pair.into_inner();
            let base = parse_term(inner.next().unwrap(), src)?;
            match inner.nth(1) {
                Some(exponent) => Ok(Term::binary(
                    BinaryOperator::Power,
                    base,
                    parse_term(exponent, src)?,
                    span,
                )),
                None => Ok(base),
            }
        }
        Rule::unary => {
            let mut inner = pair.into_inner();
            let first = inner.next().unwrap();
            if first.as_rule() != Rule::neg_op {
                return parse_term(first, src);
            }
            match parse_term(inner.next().unwrap(), src)? {
                Term::Number { value, .. } => Ok(Term::number(-value, span)),
                argument => Ok(Term::UnaryOperation {
                    op: UnaryOperator::Minus,
                    argument: Box::new(argument),
                    span,
                }),
            }
        }
        Rule::function => Ok(Term::Function(parse_function(pair, src)?)),
        Rule::variable | Rule::anonymous => Ok(Term::variable(pair.as_str(), span)),
        Rule::number => Ok(Term::number(src.integer(&pair)?, span)),
        Rule::string => {
            let raw = pair.as_str();
            Ok(Term::String {
                value: raw[1..raw.len() - 1].to_string(),
                span,
            })
        }
        Rule::tuple => {
            let mut elements = Vec::new();
            let mut trailing_comma = false;
            for p in pair.into_inner() {
                match p.as_rule() {
                    Rule::tuple_comma => trailing_comma = true,
                    _ => elements.push(parse_term(p, src)?),
                }
            }
            if elements.len() == 1 && !trailing_comma {
                Ok(elements.remove(0))
            } else {
                Ok(Term::Tuple { elements, span })
            }
        }
        _ => Err(src.unexpected(&pair, "term")),
    }
}
