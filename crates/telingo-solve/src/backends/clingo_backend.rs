use std::collections::HashMap;

use clingo::{ClingoError, Part, ShowType, SolveMode, SolveResult, SymbolType, TruthValue};
use thiserror::Error;
use tracing::debug;

use telingo_ast::ast::Statement;

use crate::control::{Control, GroundAtom, GroundPart, Model, SatResult, SolverLiteral, Symbol};

#[derive(Debug, Error)]
pub enum ClingoBackendError {
    #[error("clingo error: {0}")]
    Clingo(#[from] ClingoError),
    #[error("number {0} does not fit into a clingo symbol")]
    NumberRange(i64),
    #[error("arity {0} does not fit into a clingo signature")]
    Arity(usize),
    #[error("control is no longer available after a failed solve call")]
    Detached,
}

/// [`Control`] backed by the clingo library.
pub struct ClingoControl {
    control: Option<clingo::Control>,
    /// Parameter count of every declared program part.
    part_arity: HashMap<String, usize>,
    /// Literals returned by `atoms_matching`, keyed by their integer value.
    literals: HashMap<i32, clingo::SolverLiteral>,
}

impl ClingoControl {
    /// Create a control object; `arguments` are clingo command-line options
    /// such as `"0"` to enumerate all models.
    pub fn new(arguments: Vec<String>) -> Result<Self, ClingoBackendError> {
        Ok(Self {
            control: Some(clingo::control(arguments)?),
            part_arity: HashMap::new(),
            literals: HashMap::new(),
        })
    }

    /// Add rewritten statements to the program.
    pub fn add_program(&mut self, statements: &[Statement]) -> Result<(), ClingoBackendError> {
        for statement in statements {
            if let Statement::Program {
                name, parameters, ..
            } = statement
            {
                self.part_arity.insert(name.clone(), parameters.len());
            }
        }
        let text = telingo_ast::render_program(statements);
        self.inner_mut()?.add("base", &[], &text)?;
        Ok(())
    }

    fn inner(&self) -> Result<&clingo::Control, ClingoBackendError> {
        self.control.as_ref().ok_or(ClingoBackendError::Detached)
    }

    fn inner_mut(&mut self) -> Result<&mut clingo::Control, ClingoBackendError> {
        self.control.as_mut().ok_or(ClingoBackendError::Detached)
    }

    /// Ground atoms over `name/arity` with the given sign.
    fn atoms_with_signature(
        &self,
        name: &str,
        arity: usize,
        positive: bool,
    ) -> Result<Vec<(clingo::Symbol, clingo::SolverLiteral)>, ClingoBackendError> {
        let arity = u32::try_from(arity).map_err(|_| ClingoBackendError::Arity(arity))?;
        let signature = clingo::Signature::new(name, arity, positive)?;
        let mut out = Vec::new();
        for atom in self.inner()?.symbolic_atoms()?.iter_with_signature(&signature)? {
            out.push((atom.symbol()?, atom.literal()?));
        }
        Ok(out)
    }

    /// Literal of a ground atom, if it was grounded.
    fn lookup(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<clingo::SolverLiteral>, ClingoBackendError> {
        let Symbol::Function {
            name,
            arguments,
            positive,
        } = symbol
        else {
            return Ok(None);
        };
        let wanted = to_clingo(symbol)?;
        Ok(self
            .atoms_with_signature(name, arguments.len(), *positive)?
            .into_iter()
            .find(|(candidate, _)| *candidate == wanted)
            .map(|(_, literal)| literal))
    }

    fn set_external(
        &mut self,
        atom: &Symbol,
        value: Option<bool>,
    ) -> Result<(), ClingoBackendError> {
        let Some(literal) = self.lookup(atom)? else {
            debug!(%atom, "external atom not grounded, ignoring");
            return Ok(());
        };
        let ctl = self.inner_mut()?;
        match value {
            Some(true) => ctl.assign_external(literal, TruthValue::True)?,
            Some(false) => ctl.assign_external(literal, TruthValue::False)?,
            None => ctl.release_external(literal)?,
        }
        Ok(())
    }
}

fn number(value: i64) -> Result<clingo::Symbol, ClingoBackendError> {
    let n = i32::try_from(value).map_err(|_| ClingoBackendError::NumberRange(value))?;
    Ok(clingo::Symbol::create_number(n))
}

fn to_clingo(symbol: &Symbol) -> Result<clingo::Symbol, ClingoBackendError> {
    Ok(match symbol {
        Symbol::Infimum => clingo::Symbol::create_infimum(),
        Symbol::Supremum => clingo::Symbol::create_supremum(),
        Symbol::Number(n) => number(*n)?,
        Symbol::String(s) => clingo::Symbol::create_string(s)?,
        Symbol::Function {
            name,
            arguments,
            positive,
        } => {
            let args = arguments
                .iter()
                .map(to_clingo)
                .collect::<Result<Vec<_>, _>>()?;
            clingo::Symbol::create_function(name, &args, *positive)?
        }
    })
}

fn from_clingo(symbol: clingo::Symbol) -> Result<Symbol, ClingoError> {
    Ok(match symbol.symbol_type()? {
        SymbolType::Infimum => Symbol::Infimum,
        SymbolType::Supremum => Symbol::Supremum,
        SymbolType::Number => Symbol::Number(i64::from(symbol.number()?)),
        SymbolType::String => Symbol::String(symbol.string()?.to_string()),
        SymbolType::Function => Symbol::Function {
            name: symbol.name()?.to_string(),
            arguments: symbol
                .arguments()?
                .into_iter()
                .map(from_clingo)
                .collect::<Result<Vec<_>, _>>()?,
            positive: symbol.is_positive()?,
        },
    })
}

impl Control for ClingoControl {
    type Error = ClingoBackendError;

    fn ground(&mut self, parts: &[GroundPart]) -> Result<(), Self::Error> {
        let mut clingo_parts = Vec::with_capacity(parts.len());
        for part in parts {
            // bind as many leading window arguments as the part declares
            let arity = self
                .part_arity
                .get(&part.name)
                .copied()
                .unwrap_or(part.arguments.len())
                .min(part.arguments.len());
            let args = part.arguments[..arity]
                .iter()
                .map(|a| number(*a))
                .collect::<Result<Vec<_>, _>>()?;
            clingo_parts.push(Part::new(&part.name, args)?);
        }
        self.inner_mut()?.ground(&clingo_parts)?;
        Ok(())
    }

    fn assign_external(&mut self, atom: &Symbol, value: bool) -> Result<(), Self::Error> {
        self.set_external(atom, Some(value))
    }

    fn release_external(&mut self, atom: &Symbol) -> Result<(), Self::Error> {
        self.set_external(atom, None)
    }

    fn cleanup(&mut self) -> Result<(), Self::Error> {
        self.inner_mut()?.cleanup()?;
        self.literals.clear();
        Ok(())
    }

    fn atoms_matching(
        &mut self,
        name: &str,
        arity: usize,
    ) -> Result<Vec<GroundAtom>, Self::Error> {
        let mut out = Vec::new();
        for positive in [true, false] {
            for (symbol, literal) in self.atoms_with_signature(name, arity, positive)? {
                let integer = literal.get_integer();
                self.literals.insert(integer, literal);
                out.push(GroundAtom {
                    symbol: from_clingo(symbol)?,
                    literal: SolverLiteral(integer),
                });
            }
        }
        Ok(out)
    }

    fn solve(
        &mut self,
        assumptions: &[SolverLiteral],
        on_model: &mut dyn FnMut(&Model) -> bool,
    ) -> Result<SatResult, Self::Error> {
        // assumptions refer to literals handed out by atoms_matching
        let literals: Vec<clingo::SolverLiteral> = assumptions
            .iter()
            .filter_map(|lit| {
                let positive = self.literals.get(&lit.0.abs()).copied()?;
                Some(if lit.0 < 0 { positive.negate() } else { positive })
            })
            .collect();

        let ctl = self.control.take().ok_or(ClingoBackendError::Detached)?;
        let mut handle = ctl.solve(SolveMode::YIELD, &literals)?;
        loop {
            let Some(model) = handle.model()? else {
                break;
            };
            let model = Model {
                number: model.number()?,
                symbols: model
                    .symbols(ShowType::SHOWN)?
                    .into_iter()
                    .map(from_clingo)
                    .collect::<Result<Vec<_>, _>>()?,
            };
            if !on_model(&model) {
                break;
            }
            handle.resume()?;
        }
        let result = handle.get()?;
        self.control = Some(handle.close()?);

        Ok(if result.contains(SolveResult::SATISFIABLE) {
            SatResult::Sat
        } else if result.contains(SolveResult::UNSATISFIABLE) {
            SatResult::Unsat
        } else {
            SatResult::Unknown
        })
    }
}
