use std::fmt;
use std::ops::Neg;

/// Result of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

impl fmt::Display for SatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SatResult::Sat => "SATISFIABLE",
            SatResult::Unsat => "UNSATISFIABLE",
            SatResult::Unknown => "UNKNOWN",
        })
    }
}

/// A ground term as reported by the solver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Symbol {
    Infimum,
    Number(i64),
    String(String),
    /// Function symbol; tuples have an empty name. `positive` is false for
    /// classically negated atoms.
    Function {
        name: String,
        arguments: Vec<Symbol>,
        positive: bool,
    },
    Supremum,
}

impl Symbol {
    pub fn function(name: impl Into<String>, arguments: Vec<Symbol>) -> Self {
        Symbol::Function {
            name: name.into(),
            arguments,
            positive: true,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::function(name, Vec::new())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[Symbol] {
        match self {
            Symbol::Function { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// The last argument, if it is a number. Rewritten atoms carry their
    /// time point there.
    pub fn time(&self) -> Option<i64> {
        match self.arguments().last() {
            Some(Symbol::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// The symbol with its last argument removed.
    pub fn without_time(&self) -> Symbol {
        match self {
            Symbol::Function {
                name,
                arguments,
                positive,
            } => Symbol::Function {
                name: name.clone(),
                arguments: arguments[..arguments.len().saturating_sub(1)].to_vec(),
                positive: *positive,
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Infimum => f.write_str("#inf"),
            Symbol::Supremum => f.write_str("#sup"),
            Symbol::Number(n) => write!(f, "{n}"),
            Symbol::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Symbol::Function {
                name,
                arguments,
                positive,
            } => {
                if !positive {
                    f.write_str("-")?;
                }
                f.write_str(name)?;
                if !arguments.is_empty() || name.is_empty() {
                    f.write_str("(")?;
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    if name.is_empty() && arguments.len() == 1 {
                        f.write_str(",")?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

/// Solver literal handle; negative values denote negated atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolverLiteral(pub i32);

impl Neg for SolverLiteral {
    type Output = SolverLiteral;

    fn neg(self) -> SolverLiteral {
        SolverLiteral(-self.0)
    }
}

/// A ground atom together with its literal in the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundAtom {
    pub symbol: Symbol,
    pub literal: SolverLiteral,
}

/// A program part to ground with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct GroundPart {
    pub name: String,
    pub arguments: Vec<i64>,
}

impl GroundPart {
    pub fn new(name: impl Into<String>, arguments: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A stable model as delivered by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Running number of the model within its solve call, starting at 1.
    pub number: u64,
    /// Shown atoms.
    pub symbols: Vec<Symbol>,
}

/// The grounding and solving engine driven by the incremental loop.
pub trait Control {
    type Error: std::error::Error;

    /// Ground the given parts, adding to the existing ground program.
    fn ground(&mut self, parts: &[GroundPart]) -> Result<(), Self::Error>;

    /// Fix the truth value of an external atom.
    fn assign_external(&mut self, atom: &Symbol, value: bool) -> Result<(), Self::Error>;

    /// Permanently make an external atom false.
    fn release_external(&mut self, atom: &Symbol) -> Result<(), Self::Error>;

    /// Drop ground state that can no longer change any result.
    fn cleanup(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Ground atoms over the predicate `name/arity`, of either sign.
    fn atoms_matching(
        &mut self,
        name: &str,
        arity: usize,
    ) -> Result<Vec<GroundAtom>, Self::Error>;

    /// Solve under `assumptions`, passing every model to `on_model`.
    /// Enumeration stops early once `on_model` returns false.
    fn solve(
        &mut self,
        assumptions: &[SolverLiteral],
        on_model: &mut dyn FnMut(&Model) -> bool,
    ) -> Result<SatResult, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_function_symbols() {
        let s = Symbol::function("p", vec![Symbol::constant("a"), Symbol::Number(3)]);
        assert_eq!(s.to_string(), "p(a,3)");
        assert_eq!(Symbol::constant("q").to_string(), "q");
    }

    #[test]
    fn display_negated_and_tuple_symbols() {
        let neg = Symbol::Function {
            name: "p".into(),
            arguments: vec![Symbol::Number(-1)],
            positive: false,
        };
        assert_eq!(neg.to_string(), "-p(-1)");
        let tuple = Symbol::function("", vec![Symbol::Number(1)]);
        assert_eq!(tuple.to_string(), "(1,)");
        let pair = Symbol::function("", vec![Symbol::Number(1), Symbol::Number(2)]);
        assert_eq!(pair.to_string(), "(1,2)");
    }

    #[test]
    fn display_special_symbols() {
        assert_eq!(Symbol::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(Symbol::Infimum.to_string(), "#inf");
        assert_eq!(Symbol::Supremum.to_string(), "#sup");
    }

    #[test]
    fn time_is_last_numeric_argument() {
        let s = Symbol::function("on", vec![Symbol::constant("a"), Symbol::Number(4)]);
        assert_eq!(s.time(), Some(4));
        assert_eq!(s.without_time().to_string(), "on(a)");

        let no_time = Symbol::function("p", vec![Symbol::constant("a")]);
        assert_eq!(no_time.time(), None);
        assert_eq!(Symbol::Number(2).time(), None);
    }

    #[test]
    fn literal_negation() {
        assert_eq!(-SolverLiteral(7), SolverLiteral(-7));
        assert_eq!(-(-SolverLiteral(7)), SolverLiteral(7));
    }

    #[test]
    fn sat_result_display() {
        assert_eq!(SatResult::Sat.to_string(), "SATISFIABLE");
        assert_eq!(SatResult::Unsat.to_string(), "UNSATISFIABLE");
        assert_eq!(SatResult::Unknown.to_string(), "UNKNOWN");
    }
}
